//! Defines the command-line arguments and subcommands for the veridiff CLI.
//!
//! This module uses the `clap` crate with its "derive" feature to create a
//! declarative and type-safe argument parsing structure. One subcommand per
//! comparator; options mirror the recognized comparison attributes.

use clap::{Parser, Subcommand};
use std::path::PathBuf;

use crate::config::Metric;

/// The main CLI argument structure.
#[derive(Debug, Parser)]
#[command(
    name = "veridiff",
    version,
    about = "Tolerance-based file and image comparison for automated output verification."
)]
pub struct VeridiffArgs {
    #[command(subcommand)]
    pub command: Command,
}

/// An enumeration of all available CLI subcommands.
#[derive(Debug, Subcommand)]
pub enum Command {
    /// Compare two files line by line, with an allowed count of differing lines.
    Diff {
        /// The expected file.
        #[arg(required = true)]
        expected: PathBuf,
        /// The actual file.
        #[arg(required = true)]
        actual: PathBuf,
        /// Maximum allowed count of differing lines.
        #[arg(long, default_value_t = 0)]
        lines_diff: usize,
        /// Compare line-sorted content instead of positional content.
        #[arg(long)]
        sort: bool,
        /// Transparently gunzip gzip-compressed inputs.
        #[arg(long)]
        decompress: bool,
    },
    /// Check that every line of the patterns file occurs in the data file.
    Contains {
        /// File whose lines are required to be present.
        #[arg(required = true)]
        patterns: PathBuf,
        /// File that is scanned for the required lines.
        #[arg(required = true)]
        file: PathBuf,
        /// Maximum allowed count of missing lines.
        #[arg(long, default_value_t = 0)]
        lines_diff: usize,
        /// Transparently gunzip gzip-compressed inputs.
        #[arg(long)]
        decompress: bool,
    },
    /// Compare two files by byte size within absolute/relative tolerances.
    Delta {
        #[arg(required = true)]
        file1: PathBuf,
        #[arg(required = true)]
        file2: PathBuf,
        /// Maximum allowed absolute byte-size difference.
        #[arg(long)]
        delta: Option<u64>,
        /// Maximum allowed size difference relative to the first file's size.
        #[arg(long)]
        delta_frac: Option<f64>,
        /// Transparently gunzip gzip-compressed inputs.
        #[arg(long)]
        decompress: bool,
    },
    /// Match each line of the data file against the corresponding pattern line.
    ReMatch {
        /// File of per-line regex patterns.
        #[arg(required = true)]
        patterns: PathBuf,
        /// File whose lines are matched.
        #[arg(required = true)]
        file: PathBuf,
        /// Maximum allowed count of non-matching lines.
        #[arg(long, default_value_t = 0)]
        lines_diff: usize,
        /// Sort the data lines before matching.
        #[arg(long)]
        sort: bool,
        /// Transparently gunzip gzip-compressed inputs.
        #[arg(long)]
        decompress: bool,
    },
    /// Match the whole data file against a single multiline-aware pattern.
    ReMatchMultiline {
        /// File holding the pattern; `.` matches embedded newlines.
        #[arg(required = true)]
        pattern: PathBuf,
        /// File whose content is matched.
        #[arg(required = true)]
        file: PathBuf,
        /// Transparently gunzip gzip-compressed inputs.
        #[arg(long)]
        decompress: bool,
    },
    /// Compare two images under a named distance metric.
    ImageDiff {
        #[arg(required = true)]
        file1: PathBuf,
        #[arg(required = true)]
        file2: PathBuf,
        /// Distance metric: mad, mse, rms, fro, or iou.
        #[arg(long, default_value = "mad")]
        metric: Metric,
        /// Maximum allowed distance for a pass.
        #[arg(long, default_value_t = 0.0)]
        eps: f64,
        /// Transparently gunzip gzip-compressed inputs.
        #[arg(long)]
        decompress: bool,
    },
}

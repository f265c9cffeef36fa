//! The veridiff command-line interface.
//!
//! Parses arguments, builds a [`CompareConfig`] from the subcommand options,
//! and dispatches to the path-based comparators in [`crate::verify`]. Exits
//! nonzero when the comparison fails.

use clap::Parser;
use std::path::Path;
use std::process;

use crate::cli::args::{Command, VeridiffArgs};
use crate::config::CompareConfig;
use crate::verify;

pub mod args;
pub mod output;

/// The main entry point for the CLI.
pub fn run() {
    let args = VeridiffArgs::parse();

    let (label, result) = match args.command {
        Command::Diff {
            expected,
            actual,
            lines_diff,
            sort,
            decompress,
        } => {
            let config = CompareConfig {
                lines_diff,
                sort,
                decompress,
                ..CompareConfig::default()
            };
            (
                describe("diff", &expected, &actual),
                verify::files_diff(&expected, &actual, &config),
            )
        }
        Command::Contains {
            patterns,
            file,
            lines_diff,
            decompress,
        } => {
            let config = CompareConfig {
                lines_diff,
                decompress,
                ..CompareConfig::default()
            };
            (
                describe("contains", &patterns, &file),
                verify::files_contains(&patterns, &file, &config),
            )
        }
        Command::Delta {
            file1,
            file2,
            delta,
            delta_frac,
            decompress,
        } => {
            let config = CompareConfig {
                delta,
                delta_frac,
                decompress,
                ..CompareConfig::default()
            };
            (
                describe("delta", &file1, &file2),
                verify::files_delta(&file1, &file2, &config),
            )
        }
        Command::ReMatch {
            patterns,
            file,
            lines_diff,
            sort,
            decompress,
        } => {
            let config = CompareConfig {
                lines_diff,
                sort,
                decompress,
                ..CompareConfig::default()
            };
            (
                describe("re-match", &patterns, &file),
                verify::files_re_match(&patterns, &file, &config),
            )
        }
        Command::ReMatchMultiline {
            pattern,
            file,
            decompress,
        } => {
            let config = CompareConfig {
                decompress,
                ..CompareConfig::default()
            };
            (
                describe("re-match-multiline", &pattern, &file),
                verify::files_re_match_multiline(&pattern, &file, &config),
            )
        }
        Command::ImageDiff {
            file1,
            file2,
            metric,
            eps,
            decompress,
        } => {
            let config = CompareConfig {
                metric,
                eps,
                decompress,
                ..CompareConfig::default()
            };
            (
                describe("image-diff", &file1, &file2),
                verify::files_image_diff(&file1, &file2, &config),
            )
        }
    };

    match result {
        Ok(()) => output::print_pass(&label),
        Err(e) => {
            output::print_fail(&label, e);
            process::exit(1);
        }
    }
}

fn describe(mode: &str, a: &Path, b: &Path) -> String {
    format!("{mode} {} vs {}", a.display(), b.display())
}

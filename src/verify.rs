//! Path-based comparison entry points.
//!
//! Each function reads both files fully, applies the `decompress` option,
//! validates the configuration, and dispatches to the byte-level comparators
//! in [`crate::compare`] or [`crate::pixels`]. Success is silent; failure is
//! a [`VerifyError`] describing the violated threshold or pattern.

use std::path::Path;

use crate::compare;
use crate::config::CompareConfig;
use crate::diagnostics::VerifyError;
use crate::payload::Payload;
use crate::pixels::{self, PixelGrid};

/// Reads both payloads, gunzipping them when `decompress` is set.
fn load_pair(
    file1: impl AsRef<Path>,
    file2: impl AsRef<Path>,
    config: &CompareConfig,
) -> Result<(Payload, Payload), VerifyError> {
    config.validate()?;
    let mut a = Payload::from_path(file1)?;
    let mut b = Payload::from_path(file2)?;
    if config.decompress {
        a = a.decompressed()?;
        b = b.decompressed()?;
    }
    Ok((a, b))
}

/// Line-diff comparison of two files; fails when more than `lines_diff`
/// lines differ. See [`compare::diff`].
pub fn files_diff(
    file1: impl AsRef<Path>,
    file2: impl AsRef<Path>,
    config: &CompareConfig,
) -> Result<(), VerifyError> {
    let (a, b) = load_pair(file1, file2, config)?;
    compare::diff(&a, &b, config)
}

/// Containment comparison: every line of `file1` must occur in `file2`.
/// See [`compare::contains`].
pub fn files_contains(
    file1: impl AsRef<Path>,
    file2: impl AsRef<Path>,
    config: &CompareConfig,
) -> Result<(), VerifyError> {
    let (patterns, data) = load_pair(file1, file2, config)?;
    compare::contains(&patterns, &data, config)
}

/// Size-delta comparison of two files. See [`compare::size_delta`].
pub fn files_delta(
    file1: impl AsRef<Path>,
    file2: impl AsRef<Path>,
    config: &CompareConfig,
) -> Result<(), VerifyError> {
    let (a, b) = load_pair(file1, file2, config)?;
    compare::size_delta(&a, &b, config)
}

/// Per-line regex comparison: line `i` of `file1` must match line `i` of
/// `file2`. See [`compare::re_match`].
pub fn files_re_match(
    file1: impl AsRef<Path>,
    file2: impl AsRef<Path>,
    config: &CompareConfig,
) -> Result<(), VerifyError> {
    let (patterns, data) = load_pair(file1, file2, config)?;
    compare::re_match(&patterns, &data, config)
}

/// Whole-payload regex comparison with `.` matching embedded newlines.
/// See [`compare::re_match_multiline`].
pub fn files_re_match_multiline(
    file1: impl AsRef<Path>,
    file2: impl AsRef<Path>,
    config: &CompareConfig,
) -> Result<(), VerifyError> {
    let (patterns, data) = load_pair(file1, file2, config)?;
    compare::re_match_multiline(&patterns, &data, config)
}

/// Image comparison: decodes both files and fails when the distance under
/// `config.metric` exceeds `config.eps`. See [`pixels::compare_grids`].
pub fn files_image_diff(
    file1: impl AsRef<Path>,
    file2: impl AsRef<Path>,
    config: &CompareConfig,
) -> Result<(), VerifyError> {
    let (a, b) = load_pair(file1, file2, config)?;
    let grid_a = PixelGrid::decode(a.as_bytes())?;
    let grid_b = PixelGrid::decode(b.as_bytes())?;
    pixels::compare_grids(&grid_a, &grid_b, config.metric, config.eps)
}

//! Byte-level comparators over in-memory payloads.
//!
//! Each comparator is a pure function of `(payload pair, config)`; success is
//! `Ok(())`, failure a [`VerifyError::Mismatch`] naming the threshold that
//! was exceeded. Payloads are compared as bytes throughout, so content that
//! is not valid UTF-8 is an ordinary mismatch rather than a decode error.
//!
//! The path-based entry points in [`crate::verify`] handle reading files and
//! the `decompress` option, then dispatch here.

use difference::Changeset;
use regex::bytes::RegexBuilder;

use crate::config::CompareConfig;
use crate::diagnostics::VerifyError;
use crate::mismatch;
use crate::payload::Payload;

/// Maximum number of diff lines rendered into a mismatch help text.
const DIFF_HELP_LIMIT: usize = 40;

// =============================================================================
// LINE DIFF
// =============================================================================

/// Counts differing lines between two payloads, positionally, after optional
/// sorting. Unequal line counts contribute the surplus lines to the count.
pub fn count_differing_lines(a: &Payload, b: &Payload, sort: bool) -> usize {
    let mut lines_a = a.lines();
    let mut lines_b = b.lines();
    if sort {
        lines_a.sort_unstable();
        lines_b.sort_unstable();
    }
    let positional = lines_a
        .iter()
        .zip(lines_b.iter())
        .filter(|(x, y)| x != y)
        .count();
    positional + lines_a.len().abs_diff(lines_b.len())
}

/// Line-diff comparison: fails when the number of differing lines exceeds
/// `lines_diff`. Byte-identical payloads always pass.
pub fn diff(expected: &Payload, actual: &Payload, config: &CompareConfig) -> Result<(), VerifyError> {
    if expected.as_bytes() == actual.as_bytes() {
        return Ok(());
    }
    let differing = count_differing_lines(expected, actual, config.sort);
    if differing > config.lines_diff {
        return Err(mismatch!(
            "{} differing lines exceed the allowed lines_diff of {}",
            differing,
            config.lines_diff
        )
        .with_help(render_diff(expected, actual)));
    }
    Ok(())
}

/// Renders a line diff between two payloads for use as mismatch help text.
fn render_diff(expected: &Payload, actual: &Payload) -> String {
    let changeset = Changeset::new(&expected.text_lossy(), &actual.text_lossy(), "\n");
    let mut out = Vec::new();
    'outer: for diff in &changeset.diffs {
        let (prefix, text) = match diff {
            difference::Difference::Same(x) => ("  ", x),
            difference::Difference::Add(x) => ("+ ", x),
            difference::Difference::Rem(x) => ("- ", x),
        };
        for line in text.lines() {
            if out.len() >= DIFF_HELP_LIMIT {
                out.push("  ...".to_string());
                break 'outer;
            }
            out.push(format!("{prefix}{line}"));
        }
    }
    out.join("\n")
}

// =============================================================================
// CONTAINMENT
// =============================================================================

/// Containment comparison: every line of `patterns` must occur as a byte
/// substring of `data`; up to `lines_diff` lines may be missing.
pub fn contains(
    patterns: &Payload,
    data: &Payload,
    config: &CompareConfig,
) -> Result<(), VerifyError> {
    let haystack = data.as_bytes();
    let missing: Vec<String> = patterns
        .lines()
        .into_iter()
        .filter(|line| !contains_subslice(haystack, line))
        .map(|line| String::from_utf8_lossy(line).into_owned())
        .collect();
    if missing.len() > config.lines_diff {
        return Err(mismatch!(
            "{} required lines missing from payload (allowed: {})",
            missing.len(),
            config.lines_diff
        )
        .with_help(format!("missing lines:\n{}", missing.join("\n"))));
    }
    Ok(())
}

fn contains_subslice(haystack: &[u8], needle: &[u8]) -> bool {
    if needle.is_empty() {
        return true;
    }
    haystack
        .windows(needle.len())
        .any(|window| window == needle)
}

// =============================================================================
// SIZE DELTA
// =============================================================================

/// Size-delta comparison over byte lengths. Only explicitly supplied bounds
/// are checked; each supplied bound must individually hold (strict AND). No
/// bound supplied means the comparison always passes.
///
/// The relative bound is the size difference divided by the *first* payload's
/// size.
pub fn size_delta(a: &Payload, b: &Payload, config: &CompareConfig) -> Result<(), VerifyError> {
    let size_a = a.len() as u64;
    let size_b = b.len() as u64;
    let difference = size_a.abs_diff(size_b);

    if let Some(delta) = config.delta {
        if difference > delta {
            return Err(mismatch!(
                "byte-size difference of {} exceeds the allowed delta of {} ({} vs {} bytes)",
                difference,
                delta,
                size_a,
                size_b
            ));
        }
    }
    if let Some(delta_frac) = config.delta_frac {
        let fraction = if size_a == 0 {
            if difference == 0 {
                0.0
            } else {
                f64::INFINITY
            }
        } else {
            difference as f64 / size_a as f64
        };
        if fraction > delta_frac {
            return Err(mismatch!(
                "relative size difference of {} exceeds the allowed delta_frac of {} ({} vs {} bytes)",
                fraction,
                delta_frac,
                size_a,
                size_b
            ));
        }
    }
    Ok(())
}

// =============================================================================
// REGEX MATCH
// =============================================================================

/// Compiles one pattern line as an anchored byte regex.
fn compile_pattern(pattern: &[u8], multiline: bool) -> Result<regex::bytes::Regex, VerifyError> {
    let pattern = String::from_utf8_lossy(pattern);
    RegexBuilder::new(&format!(r"\A(?:{pattern})"))
        .multi_line(multiline)
        .dot_matches_new_line(multiline)
        .build()
        .map_err(|e| crate::config_err!("invalid regex '{}': {}", pattern, e))
}

/// Per-line regex comparison: line `i` of `patterns` must match (anchored at
/// the line start) line `i` of `data`. Line counts must agree; up to
/// `lines_diff` non-matching lines are allowed. With `sort`, the data lines
/// are sorted before matching.
pub fn re_match(
    patterns: &Payload,
    data: &Payload,
    config: &CompareConfig,
) -> Result<(), VerifyError> {
    let pattern_lines = patterns.lines();
    let mut data_lines = data.lines();
    if config.sort {
        data_lines.sort_unstable();
    }
    if pattern_lines.len() != data_lines.len() {
        return Err(mismatch!(
            "line count mismatch: {} pattern lines vs {} data lines",
            pattern_lines.len(),
            data_lines.len()
        ));
    }
    let mut unmatched = 0usize;
    let mut first_unmatched = None;
    for (pattern, line) in pattern_lines.iter().zip(data_lines.iter()) {
        let regex = compile_pattern(pattern, false)?;
        if !regex.is_match(line) {
            unmatched += 1;
            if first_unmatched.is_none() {
                first_unmatched = Some(format!(
                    "pattern '{}' did not match line '{}'",
                    String::from_utf8_lossy(pattern),
                    String::from_utf8_lossy(line)
                ));
            }
        }
    }
    if unmatched > config.lines_diff {
        let mut err = mismatch!(
            "{} lines failed to match their pattern (allowed: {})",
            unmatched,
            config.lines_diff
        );
        if let Some(first) = first_unmatched {
            err = err.with_help(first);
        }
        return Err(err);
    }
    Ok(())
}

/// Whole-payload regex comparison: `data` must match `patterns` as a single
/// anchored pattern with `.` matching embedded newlines. With `sort`, the
/// data lines are sorted and rejoined before matching; `lines_diff` is not
/// applicable here.
pub fn re_match_multiline(
    patterns: &Payload,
    data: &Payload,
    config: &CompareConfig,
) -> Result<(), VerifyError> {
    let mut pattern = patterns.text_lossy();
    // patterns authored in files usually carry a trailing newline
    if pattern.ends_with('\n') {
        pattern.pop();
        if pattern.ends_with('\r') {
            pattern.pop();
        }
    }
    let regex = compile_pattern(pattern.as_bytes(), true)?;
    let matched = if config.sort {
        let mut lines = data.lines();
        lines.sort_unstable();
        regex.is_match(&lines.join(&b"\n"[..]))
    } else {
        regex.is_match(data.as_bytes())
    };
    if !matched {
        return Err(mismatch!(
            "payload does not match the multiline pattern '{}'",
            pattern
        ));
    }
    Ok(())
}

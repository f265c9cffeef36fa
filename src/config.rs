//! Comparison configuration.
//!
//! The original verification attributes arrive as loosely-typed mappings from
//! a test harness; here they are a single explicit struct with documented
//! defaults. Unknown keys are rejected at construction and out-of-range
//! values are rejected by [`CompareConfig::validate`], never silently
//! defaulted. Options irrelevant to the invoked comparator are simply
//! ignored, so one config can be reused across modes.

use std::str::FromStr;

use serde::Deserialize;

use crate::config_err;
use crate::diagnostics::VerifyError;

/// Named image-distance function.
///
/// `eps` is interpreted per metric; the scales are not normalized against
/// each other.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Metric {
    /// Mean absolute pixel-value difference.
    #[default]
    Mad,
    /// Mean squared difference.
    Mse,
    /// Root of the mean squared difference.
    Rms,
    /// Frobenius norm of the difference matrix.
    Fro,
    /// One minus the matched-label intersection-over-union.
    Iou,
}

impl Metric {
    pub fn as_str(&self) -> &'static str {
        match self {
            Metric::Mad => "mad",
            Metric::Mse => "mse",
            Metric::Rms => "rms",
            Metric::Fro => "fro",
            Metric::Iou => "iou",
        }
    }
}

impl std::fmt::Display for Metric {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for Metric {
    type Err = VerifyError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "mad" => Ok(Metric::Mad),
            "mse" => Ok(Metric::Mse),
            "rms" => Ok(Metric::Rms),
            "fro" => Ok(Metric::Fro),
            "iou" => Ok(Metric::Iou),
            other => Err(config_err!(
                "unknown metric '{}' (expected one of: mad, mse, rms, fro, iou)",
                other
            )),
        }
    }
}

/// All recognized comparison options, with their defaults.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct CompareConfig {
    /// Maximum allowed count of differing (or missing, for containment)
    /// lines.
    pub lines_diff: usize,
    /// Compare line-sorted content instead of positional content.
    pub sort: bool,
    /// Transparently gunzip payloads that carry the gzip magic bytes.
    pub decompress: bool,
    /// Maximum allowed absolute byte-size difference. `None` = unchecked.
    pub delta: Option<u64>,
    /// Maximum allowed size difference relative to the first payload's size.
    /// `None` = unchecked.
    pub delta_frac: Option<f64>,
    /// Image-distance function.
    pub metric: Metric,
    /// Maximum allowed image distance for a pass.
    pub eps: f64,
}

impl Default for CompareConfig {
    fn default() -> Self {
        Self {
            lines_diff: 0,
            sort: false,
            decompress: false,
            delta: None,
            delta_frac: None,
            metric: Metric::default(),
            eps: 0.0,
        }
    }
}

impl CompareConfig {
    /// Parses a config from a YAML attribute mapping, rejecting unknown keys.
    pub fn from_yaml(source: &str) -> Result<Self, VerifyError> {
        let config: CompareConfig = serde_yaml::from_str(source)
            .map_err(|e| config_err!("invalid attribute mapping: {}", e))?;
        config.validate()?;
        Ok(config)
    }

    /// Parses a config from a JSON attribute mapping, rejecting unknown keys.
    pub fn from_json(source: &str) -> Result<Self, VerifyError> {
        let config: CompareConfig = serde_json::from_str(source)
            .map_err(|e| config_err!("invalid attribute mapping: {}", e))?;
        config.validate()?;
        Ok(config)
    }

    /// Rejects out-of-range option values.
    pub fn validate(&self) -> Result<(), VerifyError> {
        if !self.eps.is_finite() || self.eps < 0.0 {
            return Err(config_err!(
                "eps must be a finite non-negative number, got {}",
                self.eps
            ));
        }
        if let Some(frac) = self.delta_frac {
            if !frac.is_finite() || frac < 0.0 {
                return Err(config_err!(
                    "delta_frac must be a finite non-negative number, got {}",
                    frac
                ));
            }
        }
        Ok(())
    }
}

//! Unified, `miette`-based diagnostic system for veridiff.
//!
//! Every comparator in this crate reports failure through [`VerifyError`].
//! Success is silent (`Ok(())`); failure carries a human-readable message
//! naming the threshold or pattern that was violated, plus an optional help
//! text (for line comparisons, a rendered diff).
//!
//! # Error construction macros
//!
//! - **Use `mismatch!` for comparison failures.**
//!   - `mismatch!("{} differing lines (allowed: {})", count, allowed)`
//! - **Use `config_err!` for invalid configuration.**
//!   - `config_err!("eps must be non-negative, got {}", eps)`
//!
//! Both accept `format!`-style arguments. A help text can be attached
//! afterwards with [`VerifyError::with_help`].

use std::path::PathBuf;

use miette::Diagnostic;
use thiserror::Error;

/// Type-safe error classification that corresponds to [`VerifyError`]
/// variants. Used by tests to match on the kind of failure without string
/// matching.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorType {
    /// A comparator's pass condition was not met.
    Mismatch,
    /// An image payload could not be decoded.
    Decode,
    /// Invalid or out-of-range configuration.
    Config,
    /// A payload could not be read from disk.
    Io,
}

impl ErrorType {
    pub fn as_str(&self) -> &'static str {
        match self {
            ErrorType::Mismatch => "Mismatch",
            ErrorType::Decode => "Decode",
            ErrorType::Config => "Config",
            ErrorType::Io => "Io",
        }
    }
}

impl std::fmt::Display for ErrorType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Unified error type for all veridiff failure modes.
#[derive(Debug, Error)]
pub enum VerifyError {
    /// The two payloads are not equal enough under the selected comparator.
    #[error("Comparison failed: {message}")]
    Mismatch { message: String, help: Option<String> },

    /// An image payload could not be decoded into a pixel grid.
    #[error("Image decode failed: {message}")]
    Decode {
        message: String,
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync + 'static>>,
    },

    /// The supplied configuration is invalid; never silently defaulted.
    #[error("Invalid configuration: {message}")]
    Config { message: String },

    /// A payload could not be read.
    #[error("Failed to read {}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

impl VerifyError {
    /// Returns the type-safe classification for this error.
    pub fn error_type(&self) -> ErrorType {
        match self {
            VerifyError::Mismatch { .. } => ErrorType::Mismatch,
            VerifyError::Decode { .. } => ErrorType::Decode,
            VerifyError::Config { .. } => ErrorType::Config,
            VerifyError::Io { .. } => ErrorType::Io,
        }
    }

    /// Attaches a help text (rendered diff, hint) to a `Mismatch` error.
    /// No-op for other variants.
    pub fn with_help(self, text: impl Into<String>) -> Self {
        match self {
            VerifyError::Mismatch { message, .. } => VerifyError::Mismatch {
                message,
                help: Some(text.into()),
            },
            other => other,
        }
    }

    /// Wraps an image codec error.
    pub fn decode(
        message: impl Into<String>,
        source: impl std::error::Error + Send + Sync + 'static,
    ) -> Self {
        VerifyError::Decode {
            message: message.into(),
            source: Some(Box::new(source)),
        }
    }

    /// Wraps an I/O error with the offending path.
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        VerifyError::Io {
            path: path.into(),
            source,
        }
    }
}

impl Diagnostic for VerifyError {
    fn code<'a>(&'a self) -> Option<Box<dyn std::fmt::Display + 'a>> {
        None
    }

    fn help<'a>(&'a self) -> Option<Box<dyn std::fmt::Display + 'a>> {
        match self {
            VerifyError::Mismatch { help, .. } => help
                .as_ref()
                .map(|h| Box::new(h) as Box<dyn std::fmt::Display + 'a>),
            _ => None,
        }
    }
}

/// Constructs a `VerifyError::Mismatch` with a formatted message and no help.
#[macro_export]
macro_rules! mismatch {
    ($msg:expr $(, $arg:expr)* $(,)?) => {
        $crate::VerifyError::Mismatch {
            message: format!($msg $(, $arg)*),
            help: None,
        }
    };
}

/// Constructs a `VerifyError::Config` with a formatted message.
#[macro_export]
macro_rules! config_err {
    ($msg:expr $(, $arg:expr)* $(,)?) => {
        $crate::VerifyError::Config {
            message: format!($msg $(, $arg)*),
        }
    };
}

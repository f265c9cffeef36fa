pub use crate::config::{CompareConfig, Metric};
pub use crate::diagnostics::{ErrorType, VerifyError};
pub use crate::verify::{
    files_contains, files_delta, files_diff, files_image_diff, files_re_match,
    files_re_match_multiline,
};

pub mod cli;
pub mod compare;
pub mod config;
pub mod diagnostics;
pub mod payload;
pub mod pixels;
pub mod verify;

//! Policy set errors.

use super::error_code::{self, ConchErrorCode};

/// Errors raised while importing, exporting or addressing policies.
#[derive(Debug, thiserror::Error)]
pub enum PolicyError {
    /// Malformed definition. Carries the parser's message verbatim.
    #[error("{message}")]
    Import { message: String },

    #[error("Policy index {index} out of range (size {size})")]
    IndexOutOfRange { index: usize, size: usize },

    #[error("Cannot export policy '{title}': {message}")]
    Export { title: String, message: String },

    #[error("Policy I/O error on {path}: {message}")]
    Io { path: String, message: String },
}

impl ConchErrorCode for PolicyError {
    fn error_code(&self) -> &'static str {
        match self {
            Self::Import { .. } => error_code::POLICY_IMPORT_ERROR,
            Self::IndexOutOfRange { .. } => error_code::POLICY_NOT_FOUND,
            Self::Export { .. } | Self::Io { .. } => error_code::POLICY_EXPORT_ERROR,
        }
    }
}

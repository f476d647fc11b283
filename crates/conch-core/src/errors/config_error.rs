//! Configuration errors.

use super::error_code::{self, ConchErrorCode};

/// Errors that can occur during configuration loading and validation.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Config file not found: {path}")]
    FileNotFound { path: String },

    #[error("Config parse error in {path}: {message}")]
    ParseError { path: String, message: String },

    #[error("Config validation failed for {field}: {message}")]
    ValidationFailed { field: String, message: String },

    #[error("Daemon unavailable at {address}: {message}")]
    DaemonUnavailable { address: String, message: String },
}

impl ConchErrorCode for ConfigError {
    fn error_code(&self) -> &'static str {
        match self {
            Self::DaemonUnavailable { .. } => error_code::DAEMON_UNAVAILABLE,
            _ => error_code::CONFIG_ERROR,
        }
    }
}

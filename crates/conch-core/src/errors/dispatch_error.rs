//! Dispatch errors and their aggregation.

use super::error_code::{self, ConchErrorCode};
use super::{ConfigError, EngineError, PolicyError, StorageError};

/// Errors returned by the execution router.
/// Aggregates subsystem errors via `From` conversions.
#[derive(Debug, thiserror::Error)]
pub enum DispatchError {
    /// The requested report kinds, format and display cannot be combined.
    #[error("{reason}")]
    InvalidCombination { reason: String },

    #[error("Policy not found: index {index}")]
    PolicyNotFound { index: usize },

    #[error("No file given")]
    EmptyFileList,

    #[error("Empty file path")]
    EmptyPath,

    #[error("No policy given")]
    EmptyPolicyList,

    #[error("Invalid option '{option}': {message}")]
    InvalidOption { option: String, message: String },

    #[error("Engine error: {0}")]
    Engine(#[from] EngineError),

    #[error("Storage error: {0}")]
    Storage(#[from] StorageError),

    #[error("Policy error: {0}")]
    Policy(#[from] PolicyError),

    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),
}

impl ConchErrorCode for DispatchError {
    fn error_code(&self) -> &'static str {
        match self {
            Self::InvalidCombination { .. } => error_code::INVALID_COMBINATION,
            Self::PolicyNotFound { .. } => error_code::POLICY_NOT_FOUND,
            Self::EmptyFileList
            | Self::EmptyPath
            | Self::EmptyPolicyList
            | Self::InvalidOption { .. } => error_code::INVALID_ARGUMENT,
            Self::Engine(e) => e.error_code(),
            Self::Storage(e) => e.error_code(),
            Self::Policy(e) => e.error_code(),
            Self::Config(e) => e.error_code(),
        }
    }
}

//! Errors reported by analysis engines and daemon clients.

use super::error_code::{self, ConchErrorCode};

#[derive(Debug, thiserror::Error)]
pub enum EngineError {
    #[error("Engine rejected {operation}: {message}")]
    Rejected { operation: String, message: String },

    #[error("File not known to the engine: {file}")]
    UnknownFile { file: String },

    #[error("Connection error: {message}")]
    Connection { message: String },

    #[error("Unsupported operation: {operation}")]
    Unsupported { operation: String },
}

impl EngineError {
    pub fn rejected(operation: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Rejected {
            operation: operation.into(),
            message: message.into(),
        }
    }
}

impl ConchErrorCode for EngineError {
    fn error_code(&self) -> &'static str {
        match self {
            Self::Connection { .. } => error_code::DAEMON_UNAVAILABLE,
            _ => error_code::ENGINE_ERROR,
        }
    }
}

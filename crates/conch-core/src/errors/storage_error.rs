//! Storage errors.

use super::error_code::{self, ConchErrorCode};

/// Errors raised by the report cache and its backends.
#[derive(Debug, thiserror::Error)]
pub enum StorageError {
    #[error("SQLite error: {message}")]
    SqliteError { message: String },

    #[error("Migration of {schema} schema failed at version {version}: {message}")]
    MigrationFailed {
        schema: String,
        version: u32,
        message: String,
    },

    #[error("UI record already exists: {filepath}/{filename}")]
    DuplicateUiRecord { filename: String, filepath: String },

    #[error("UI record not found: {filepath}/{filename}")]
    UiRecordNotFound { filename: String, filepath: String },

    #[error("Compression error ({scheme}): {message}")]
    Compression { scheme: String, message: String },

    #[error("Unknown compression tag {tag}")]
    UnknownCompression { tag: i64 },

    #[error("Table not initialized: {table}")]
    TableMissing { table: String },

    #[error("Corrupt record: {message}")]
    CorruptRecord { message: String },

    #[error("Database I/O error: {message}")]
    Io { message: String },
}

impl ConchErrorCode for StorageError {
    fn error_code(&self) -> &'static str {
        match self {
            Self::MigrationFailed { .. } => error_code::MIGRATION_FAILED,
            Self::DuplicateUiRecord { .. } => error_code::DUPLICATE_RECORD,
            Self::UiRecordNotFound { .. } => error_code::RECORD_NOT_FOUND,
            Self::Compression { .. } | Self::UnknownCompression { .. } => {
                error_code::COMPRESSION_ERROR
            }
            _ => error_code::STORAGE_ERROR,
        }
    }
}

//! Query functions over a `rusqlite::Connection`.

pub mod reports;
pub mod ui_files;

use conch_core::errors::StorageError;

pub(crate) fn sqlite_err(e: rusqlite::Error) -> StorageError {
    StorageError::SqliteError {
        message: e.to_string(),
    }
}

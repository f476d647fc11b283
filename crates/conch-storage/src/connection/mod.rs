//! SQLite connections: one serialized writer, a few readers.

pub mod readers;
pub mod settings;
pub mod writer;

use std::path::{Path, PathBuf};
use std::sync::Mutex;

use conch_core::errors::StorageError;
use rusqlite::Connection;

use self::readers::{Readers, READER_COUNT};
use self::settings::{configure, journal_mode, optimize, Role};

/// Owns the writer connection and, for a file-backed database, the readers.
/// In-memory databases have no readers: another in-memory connection would
/// be another database, so reads share the writer.
pub struct DatabaseManager {
    writer: Mutex<Connection>,
    readers: Option<Readers>,
    path: Option<PathBuf>,
}

impl DatabaseManager {
    /// Open (creating if needed) the database file and its parent directory.
    /// Schemas are not touched.
    pub fn open(path: &Path) -> Result<Self, StorageError> {
        if let Some(dir) = path.parent().filter(|d| !d.as_os_str().is_empty()) {
            std::fs::create_dir_all(dir).map_err(|e| StorageError::Io {
                message: format!("cannot create {}: {e}", dir.display()),
            })?;
        }

        let writer = Connection::open(path).map_err(|e| StorageError::SqliteError {
            message: format!("cannot open {}: {e}", path.display()),
        })?;
        configure(&writer, Role::Writer)?;
        // The writer created the file; readers can only open an existing one.
        let readers = Readers::open(path, READER_COUNT)?;

        Ok(Self {
            writer: Mutex::new(writer),
            readers: Some(readers),
            path: Some(path.to_path_buf()),
        })
    }

    pub fn open_in_memory() -> Result<Self, StorageError> {
        let writer = Connection::open_in_memory().map_err(|e| StorageError::SqliteError {
            message: e.to_string(),
        })?;
        configure(&writer, Role::Writer)?;
        Ok(Self {
            writer: Mutex::new(writer),
            readers: None,
            path: None,
        })
    }

    pub fn with_writer<F, T>(&self, f: F) -> Result<T, StorageError>
    where
        F: FnOnce(&Connection) -> Result<T, StorageError>,
    {
        let conn = self.writer.lock().map_err(|_| StorageError::SqliteError {
            message: "writer poisoned".to_string(),
        })?;
        f(&conn)
    }

    pub fn with_reader<F, T>(&self, f: F) -> Result<T, StorageError>
    where
        F: FnOnce(&Connection) -> Result<T, StorageError>,
    {
        match &self.readers {
            Some(readers) => readers.read(f),
            None => self.with_writer(f),
        }
    }

    /// Number of dedicated read connections (0 in memory).
    pub fn reader_count(&self) -> usize {
        self.readers.as_ref().map_or(0, Readers::len)
    }

    /// Journal mode of the writer: `wal` on disk, `memory` in memory.
    pub fn journal_mode(&self) -> Result<String, StorageError> {
        self.with_writer(journal_mode)
    }

    /// `None` for in-memory databases.
    pub fn path(&self) -> Option<&Path> {
        self.path.as_deref()
    }
}

impl Drop for DatabaseManager {
    fn drop(&mut self) {
        if let Ok(conn) = self.writer.lock() {
            if let Err(e) = optimize(&conn) {
                tracing::debug!(error = %e, "optimize on close failed");
            }
        }
    }
}

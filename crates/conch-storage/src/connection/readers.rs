//! Read-only connections handed out in turn.

use std::path::Path;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;

use conch_core::errors::StorageError;
use rusqlite::{Connection, OpenFlags};

use super::settings::{configure, Role};

/// Readers opened next to the writer of a file-backed database.
pub const READER_COUNT: usize = 2;

pub struct Readers {
    slots: Box<[Mutex<Connection>]>,
    turn: AtomicUsize,
}

impl Readers {
    /// Open `count` read-only connections (at least one) on an existing file.
    pub fn open(path: &Path, count: usize) -> Result<Self, StorageError> {
        let flags = OpenFlags::SQLITE_OPEN_READ_ONLY | OpenFlags::SQLITE_OPEN_NO_MUTEX;
        let slots = (0..count.max(1))
            .map(|_| {
                let conn = Connection::open_with_flags(path, flags).map_err(|e| {
                    StorageError::SqliteError {
                        message: format!("cannot open reader on {}: {e}", path.display()),
                    }
                })?;
                configure(&conn, Role::Reader)?;
                Ok(Mutex::new(conn))
            })
            .collect::<Result<Vec<_>, StorageError>>()?;
        Ok(Self {
            slots: slots.into_boxed_slice(),
            turn: AtomicUsize::new(0),
        })
    }

    /// Run `f` on the next reader.
    pub fn read<F, T>(&self, f: F) -> Result<T, StorageError>
    where
        F: FnOnce(&Connection) -> Result<T, StorageError>,
    {
        let slot = self.turn.fetch_add(1, Ordering::Relaxed) % self.slots.len();
        let conn = self.slots[slot]
            .lock()
            .map_err(|_| StorageError::SqliteError {
                message: format!("reader {slot} poisoned"),
            })?;
        f(&conn)
    }

    pub fn len(&self) -> usize {
        self.slots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }
}

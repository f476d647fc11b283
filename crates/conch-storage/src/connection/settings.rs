//! Per-connection SQLite settings.

use conch_core::errors::StorageError;
use rusqlite::Connection;

/// What a connection is used for. Decides the pragmas it gets.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Role {
    /// The single connection every write goes through.
    Writer,
    /// A read-only connection of the reader set.
    Reader,
}

impl Role {
    fn pragmas(self) -> &'static str {
        match self {
            // WAL lets readers proceed while the writer commits.
            Role::Writer => {
                "PRAGMA journal_mode = WAL;
                 PRAGMA synchronous = NORMAL;
                 PRAGMA foreign_keys = ON;
                 PRAGMA cache_size = -8000;
                 PRAGMA busy_timeout = 5000;"
            }
            Role::Reader => {
                "PRAGMA query_only = ON;
                 PRAGMA cache_size = -4000;
                 PRAGMA busy_timeout = 5000;"
            }
        }
    }
}

pub fn configure(conn: &Connection, role: Role) -> Result<(), StorageError> {
    conn.execute_batch(role.pragmas())
        .map_err(|e| StorageError::SqliteError {
            message: format!("cannot configure {role:?} connection: {e}"),
        })
}

/// Current journal mode, lowercased (`wal`, `memory`, ...).
pub fn journal_mode(conn: &Connection) -> Result<String, StorageError> {
    conn.pragma_query_value(None, "journal_mode", |row| row.get::<_, String>(0))
        .map(|mode| mode.to_ascii_lowercase())
        .map_err(|e| StorageError::SqliteError {
            message: e.to_string(),
        })
}

/// Refresh query planner statistics before the writer goes away.
pub fn optimize(conn: &Connection) -> Result<(), StorageError> {
    conn.execute_batch("PRAGMA analysis_limit = 400; PRAGMA optimize;")
        .map_err(|e| StorageError::SqliteError {
            message: format!("optimize failed: {e}"),
        })
}

//! ui_file table queries.

use conch_core::errors::StorageError;
use rusqlite::{params, Connection, OptionalExtension};

use super::sqlite_err;
use crate::store::UiFileRecord;

pub fn exists(conn: &Connection, filename: &str, filepath: &str) -> Result<bool, StorageError> {
    conn.query_row(
        "SELECT EXISTS(SELECT 1 FROM ui_file WHERE filename = ?1 AND filepath = ?2)",
        params![filename, filepath],
        |row| row.get(0),
    )
    .map_err(sqlite_err)
}

/// Plain insert; the primary key rejects duplicates.
pub fn insert(conn: &Connection, record: &UiFileRecord) -> Result<(), StorageError> {
    conn.execute(
        "INSERT INTO ui_file
         (filename, filepath, policy, display, analyzed, implementation_valid, policy_valid)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)",
        params![
            record.filename,
            record.filepath,
            record.policy_id,
            record.display_id,
            record.analyzed,
            record.implementation_valid,
            record.policy_valid,
        ],
    )
    .map_err(sqlite_err)?;
    Ok(())
}

/// Returns the number of rows updated (0 when the key is unknown).
pub fn update(conn: &Connection, record: &UiFileRecord) -> Result<usize, StorageError> {
    conn.execute(
        "UPDATE ui_file
         SET policy = ?3, display = ?4, analyzed = ?5, implementation_valid = ?6, policy_valid = ?7
         WHERE filename = ?1 AND filepath = ?2",
        params![
            record.filename,
            record.filepath,
            record.policy_id,
            record.display_id,
            record.analyzed,
            record.implementation_valid,
            record.policy_valid,
        ],
    )
    .map_err(sqlite_err)
}

pub fn get(
    conn: &Connection,
    filename: &str,
    filepath: &str,
) -> Result<Option<UiFileRecord>, StorageError> {
    conn.query_row(
        "SELECT filename, filepath, policy, display, analyzed, implementation_valid, policy_valid
         FROM ui_file WHERE filename = ?1 AND filepath = ?2",
        params![filename, filepath],
        |row| {
            Ok(UiFileRecord {
                filename: row.get(0)?,
                filepath: row.get(1)?,
                policy_id: row.get(2)?,
                display_id: row.get(3)?,
                analyzed: row.get(4)?,
                implementation_valid: row.get(5)?,
                policy_valid: row.get(6)?,
            })
        },
    )
    .optional()
    .map_err(sqlite_err)
}

pub fn delete(conn: &Connection, filename: &str, filepath: &str) -> Result<usize, StorageError> {
    conn.execute(
        "DELETE FROM ui_file WHERE filename = ?1 AND filepath = ?2",
        params![filename, filepath],
    )
    .map_err(sqlite_err)
}

/// All `(filename, filepath)` keys, sorted.
pub fn keys(conn: &Connection) -> Result<Vec<(String, String)>, StorageError> {
    let mut stmt = conn
        .prepare_cached("SELECT filename, filepath FROM ui_file ORDER BY filepath, filename")
        .map_err(sqlite_err)?;
    let rows = stmt
        .query_map([], |row| Ok((row.get(0)?, row.get(1)?)))
        .map_err(sqlite_err)?;
    rows.collect::<Result<Vec<_>, _>>().map_err(sqlite_err)
}

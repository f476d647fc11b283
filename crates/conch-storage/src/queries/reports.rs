//! report table queries: upsert by dedup key, lookup, existence, removal.

use conch_core::errors::StorageError;
use conch_core::types::{CacheKey, Compression};
use rusqlite::{params, Connection, OptionalExtension};

use super::sqlite_err;
use crate::store::StoredReport;

/// Insert a report, or overwrite payload and compression tag of the record
/// with the same dedup key. One statement, so a reader never sees a
/// half-written record.
pub fn upsert(
    conn: &Connection,
    key: &CacheKey,
    payload: &[u8],
    compression: Compression,
) -> Result<(), StorageError> {
    conn.prepare_cached(
        "INSERT INTO report
         (tool, format, filename, file_last_modification, report, compression)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6)
         ON CONFLICT(tool, format, filename, file_last_modification)
         DO UPDATE SET report = excluded.report, compression = excluded.compression",
    )
    .and_then(|mut stmt| {
        stmt.execute(params![
            key.kind.index() as i64,
            key.format.index() as i64,
            key.filename,
            key.last_modification,
            payload,
            compression.tag(),
        ])
    })
    .map_err(sqlite_err)?;
    Ok(())
}

/// Fetch the stored payload and its compression tag.
pub fn get(conn: &Connection, key: &CacheKey) -> Result<Option<StoredReport>, StorageError> {
    let row: Option<(Vec<u8>, i64)> = conn
        .prepare_cached(
            "SELECT report, compression FROM report
             WHERE tool = ?1 AND format = ?2 AND filename = ?3 AND file_last_modification = ?4",
        )
        .and_then(|mut stmt| {
            stmt.query_row(
                params![
                    key.kind.index() as i64,
                    key.format.index() as i64,
                    key.filename,
                    key.last_modification,
                ],
                |row| Ok((row.get(0)?, row.get(1)?)),
            )
            .optional()
        })
        .map_err(sqlite_err)?;

    match row {
        Some((payload, tag)) => {
            let compression =
                Compression::from_tag(tag).ok_or(StorageError::UnknownCompression { tag })?;
            Ok(Some(StoredReport {
                payload,
                compression,
            }))
        }
        None => Ok(None),
    }
}

/// Existence check by full key, without reading the payload.
pub fn exists(conn: &Connection, key: &CacheKey) -> Result<bool, StorageError> {
    conn.prepare_cached(
        "SELECT EXISTS(SELECT 1 FROM report
         WHERE tool = ?1 AND format = ?2 AND filename = ?3 AND file_last_modification = ?4)",
    )
    .and_then(|mut stmt| {
        stmt.query_row(
            params![
                key.kind.index() as i64,
                key.format.index() as i64,
                key.filename,
                key.last_modification,
            ],
            |row| row.get(0),
        )
    })
    .map_err(sqlite_err)
}

/// Delete every record of `filename`, all kinds and formats.
pub fn delete_by_filename(conn: &Connection, filename: &str) -> Result<usize, StorageError> {
    conn.execute("DELETE FROM report WHERE filename = ?1", params![filename])
        .map_err(sqlite_err)
}

/// Distinct filenames with at least one report, sorted.
pub fn distinct_filenames(conn: &Connection) -> Result<Vec<String>, StorageError> {
    let mut stmt = conn
        .prepare_cached("SELECT DISTINCT filename FROM report ORDER BY filename")
        .map_err(sqlite_err)?;
    let rows = stmt
        .query_map([], |row| row.get(0))
        .map_err(sqlite_err)?;
    rows.collect::<Result<Vec<String>, _>>().map_err(sqlite_err)
}

//! Schema definitions and versioning shared by SQL backends.
//!
//! Two schemas are versioned independently in the `schema_version` table:
//! the report table and the UI table. Each has a "create" path (fresh
//! database, latest layout in one step) and an "update" path (ordered steps
//! from the stored version). Both are idempotent.

pub mod report_v001;
pub mod report_v002;
pub mod ui_v001;

use std::fmt;

use conch_core::errors::StorageError;
use rusqlite::{params, Connection, OptionalExtension};

/// Bookkeeping table holding one version row per schema.
pub const SCHEMA_VERSION_SQL: &str = r#"
CREATE TABLE IF NOT EXISTS schema_version (
    name TEXT PRIMARY KEY,
    version INTEGER NOT NULL
) STRICT;
"#;

/// An independently versioned schema.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Schema {
    Report,
    Ui,
}

impl Schema {
    pub fn name(self) -> &'static str {
        match self {
            Schema::Report => "report",
            Schema::Ui => "ui",
        }
    }

    /// Latest version of the schema.
    pub fn latest_version(self) -> u32 {
        match self {
            Schema::Report => 2,
            Schema::Ui => 1,
        }
    }

    /// DDL creating the latest layout on an empty database.
    pub fn create_sql(self) -> &'static str {
        match self {
            Schema::Report => report_v002::CREATE_SQL,
            Schema::Ui => ui_v001::MIGRATION_SQL,
        }
    }

    /// Ordered `(version, sql)` steps above `from`.
    pub fn update_steps(self, from: u32) -> Vec<(u32, &'static str)> {
        let steps: &[(u32, &'static str)] = match self {
            Schema::Report => &[
                (1, report_v001::MIGRATION_SQL),
                (2, report_v002::MIGRATION_SQL),
            ],
            Schema::Ui => &[(1, ui_v001::MIGRATION_SQL)],
        };
        steps.iter().copied().filter(|(v, _)| *v > from).collect()
    }
}

impl fmt::Display for Schema {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

fn migration_error(schema: Schema, version: u32, e: impl fmt::Display) -> StorageError {
    StorageError::MigrationFailed {
        schema: schema.name().to_string(),
        version,
        message: e.to_string(),
    }
}

/// Stored version of `schema`, 0 when the schema was never created.
pub fn current_version(conn: &Connection, schema: Schema) -> Result<u32, StorageError> {
    conn.execute_batch(SCHEMA_VERSION_SQL)
        .map_err(|e| migration_error(schema, 0, e))?;
    let version: Option<u32> = conn
        .query_row(
            "SELECT version FROM schema_version WHERE name = ?1",
            params![schema.name()],
            |row| row.get(0),
        )
        .optional()
        .map_err(|e| StorageError::SqliteError {
            message: e.to_string(),
        })?;
    Ok(version.unwrap_or(0))
}

fn set_version(conn: &Connection, schema: Schema, version: u32) -> Result<(), StorageError> {
    conn.execute(
        "INSERT INTO schema_version (name, version) VALUES (?1, ?2)
         ON CONFLICT(name) DO UPDATE SET version = excluded.version",
        params![schema.name(), version],
    )
    .map_err(|e| migration_error(schema, version, e))?;
    Ok(())
}

/// Create the latest layout if the schema does not exist yet.
/// A no-op on an existing schema, whatever its version.
pub fn create(conn: &Connection, schema: Schema) -> Result<(), StorageError> {
    if current_version(conn, schema)? != 0 {
        return Ok(());
    }
    let latest = schema.latest_version();
    let tx = conn
        .unchecked_transaction()
        .map_err(|e| migration_error(schema, latest, e))?;
    tx.execute_batch(schema.create_sql())
        .map_err(|e| migration_error(schema, latest, e))?;
    set_version(&tx, schema, latest)?;
    tx.commit().map_err(|e| migration_error(schema, latest, e))?;
    tracing::info!(schema = schema.name(), version = latest, "created schema");
    Ok(())
}

/// Apply every pending step. A no-op on a current schema.
pub fn update(conn: &Connection, schema: Schema) -> Result<(), StorageError> {
    let from = current_version(conn, schema)?;
    for (version, sql) in schema.update_steps(from) {
        let tx = conn
            .unchecked_transaction()
            .map_err(|e| migration_error(schema, version, e))?;
        tx.execute_batch(sql)
            .map_err(|e| migration_error(schema, version, e))?;
        set_version(&tx, schema, version)?;
        tx.commit().map_err(|e| migration_error(schema, version, e))?;
        tracing::info!(schema = schema.name(), version, "applied migration");
    }
    Ok(())
}

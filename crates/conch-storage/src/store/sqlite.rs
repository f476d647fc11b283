//! SQLite backend.

use std::path::Path;

use conch_core::errors::StorageError;
use conch_core::types::{CacheKey, Compression};

use super::{ReportStore, StoredReport, UiFileRecord};
use crate::connection::writer::with_immediate_transaction;
use crate::connection::DatabaseManager;
use crate::queries::{reports, ui_files};
use crate::schema::{self, Schema};

/// Report store backed by a SQLite database.
pub struct SqliteStore {
    db: DatabaseManager,
}

impl SqliteStore {
    /// Open (or create) a database file. Schemas are not touched; call
    /// `ReportCache::init` or the create/update methods.
    pub fn open(path: &Path) -> Result<Self, StorageError> {
        let db = DatabaseManager::open(path)?;
        tracing::debug!(path = %path.display(), "opened report database");
        Ok(Self { db })
    }

    pub fn open_in_memory() -> Result<Self, StorageError> {
        Ok(Self {
            db: DatabaseManager::open_in_memory()?,
        })
    }

    /// Access to the underlying connections, for maintenance and tests.
    pub fn database(&self) -> &DatabaseManager {
        &self.db
    }

    /// Stored version of a schema (0 if never created).
    pub fn schema_version(&self, schema: Schema) -> Result<u32, StorageError> {
        self.db.with_writer(|conn| schema::current_version(conn, schema))
    }
}

impl ReportStore for SqliteStore {
    fn create_report_table(&self) -> Result<(), StorageError> {
        self.db.with_writer(|conn| schema::create(conn, Schema::Report))
    }

    fn update_report_table(&self) -> Result<(), StorageError> {
        self.db.with_writer(|conn| schema::update(conn, Schema::Report))
    }

    fn create_ui_table(&self) -> Result<(), StorageError> {
        self.db.with_writer(|conn| schema::create(conn, Schema::Ui))
    }

    fn update_ui_table(&self) -> Result<(), StorageError> {
        self.db.with_writer(|conn| schema::update(conn, Schema::Ui))
    }

    fn save_report(
        &self,
        key: &CacheKey,
        payload: &[u8],
        compression: Compression,
    ) -> Result<(), StorageError> {
        self.db.with_writer(|conn| {
            with_immediate_transaction(conn, |tx| reports::upsert(tx, key, payload, compression))
        })
    }

    fn remove_report(&self, filename: &str) -> Result<usize, StorageError> {
        self.db
            .with_writer(|conn| reports::delete_by_filename(conn, filename))
    }

    fn get_report(&self, key: &CacheKey) -> Result<Option<StoredReport>, StorageError> {
        self.db.with_reader(|conn| reports::get(conn, key))
    }

    fn file_is_registered(&self, key: &CacheKey) -> Result<bool, StorageError> {
        self.db.with_reader(|conn| reports::exists(conn, key))
    }

    fn get_elements(&self) -> Result<Vec<String>, StorageError> {
        self.db.with_reader(reports::distinct_filenames)
    }

    fn ui_add_file(&self, record: &UiFileRecord) -> Result<(), StorageError> {
        self.db.with_writer(|conn| {
            with_immediate_transaction(conn, |tx| {
                if ui_files::exists(tx, &record.filename, &record.filepath)? {
                    return Err(StorageError::DuplicateUiRecord {
                        filename: record.filename.clone(),
                        filepath: record.filepath.clone(),
                    });
                }
                ui_files::insert(tx, record)
            })
        })
    }

    fn ui_update_file(&self, record: &UiFileRecord) -> Result<(), StorageError> {
        let updated = self.db.with_writer(|conn| ui_files::update(conn, record))?;
        if updated == 0 {
            return Err(StorageError::UiRecordNotFound {
                filename: record.filename.clone(),
                filepath: record.filepath.clone(),
            });
        }
        Ok(())
    }

    fn ui_get_file(
        &self,
        filename: &str,
        filepath: &str,
    ) -> Result<Option<UiFileRecord>, StorageError> {
        self.db
            .with_reader(|conn| ui_files::get(conn, filename, filepath))
    }

    fn ui_remove_file(&self, filename: &str, filepath: &str) -> Result<(), StorageError> {
        let removed = self
            .db
            .with_writer(|conn| ui_files::delete(conn, filename, filepath))?;
        if removed == 0 {
            return Err(StorageError::UiRecordNotFound {
                filename: filename.to_string(),
                filepath: filepath.to_string(),
            });
        }
        Ok(())
    }

    fn ui_get_elements(&self) -> Result<Vec<(String, String)>, StorageError> {
        self.db.with_reader(ui_files::keys)
    }

    fn backend_name(&self) -> &'static str {
        "sqlite"
    }
}

//! ReportCache: the public face of the store.
//!
//! Wraps a [`ReportStore`] backend with payload codecs and an accumulating
//! error log. Failing operations return their error and also append its
//! message to the log; successes never clear it.

use std::sync::Mutex;

use conch_core::config::StorageConfig;
use conch_core::errors::StorageError;
use conch_core::types::{CacheKey, Compression};

use crate::compression::{compress, decompress};
use crate::store::{MemoryStore, ReportStore, SqliteStore, UiFileRecord};

/// A cache hit: the decoded report and the scheme it was stored with.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CachedReport {
    pub report: String,
    pub compression: Compression,
}

pub struct ReportCache {
    store: Box<dyn ReportStore>,
    /// Scheme used by [`ReportCache::save`].
    compression: Compression,
    errors: Mutex<Vec<String>>,
}

impl ReportCache {
    pub fn new(store: Box<dyn ReportStore>) -> Self {
        Self {
            store,
            compression: Compression::default(),
            errors: Mutex::new(Vec::new()),
        }
    }

    pub fn with_compression(mut self, compression: Compression) -> Self {
        self.compression = compression;
        self
    }

    /// Scheme applied to reports saved with [`ReportCache::save`].
    pub fn compression(&self) -> Compression {
        self.compression
    }

    /// Cache over an in-memory SQLite database.
    pub fn open_in_memory() -> Result<Self, StorageError> {
        Ok(Self::new(Box::new(SqliteStore::open_in_memory()?)))
    }

    /// Build the cache the configuration asks for: a SQLite file under the
    /// configured directory, or a memory store when storage is disabled or no
    /// location can be resolved. Schemas are initialized.
    pub fn from_config(config: &StorageConfig) -> Result<Self, StorageError> {
        let store: Box<dyn ReportStore> = if !config.effective_enabled() {
            Box::new(MemoryStore::new())
        } else if let Some(path) = config.database_path() {
            Box::new(SqliteStore::open(&path)?)
        } else {
            tracing::warn!("no database location available, caching in memory");
            Box::new(MemoryStore::new())
        };
        let cache = Self::new(store).with_compression(config.effective_compression());
        cache.init()?;
        Ok(cache)
    }

    pub fn backend_name(&self) -> &'static str {
        self.store.backend_name()
    }

    /// Record a failure in the error log and pass it through.
    fn track<T>(&self, result: Result<T, StorageError>) -> Result<T, StorageError> {
        if let Err(ref e) = result {
            tracing::warn!(backend = self.store.backend_name(), error = %e, "storage operation failed");
            if let Ok(mut errors) = self.errors.lock() {
                errors.push(e.to_string());
            }
        }
        result
    }

    // ---- Schema ----

    /// Create or migrate both schemas.
    pub fn init(&self) -> Result<(), StorageError> {
        self.init_report()?;
        self.init_ui()
    }

    pub fn init_report(&self) -> Result<(), StorageError> {
        self.create_report_table()?;
        self.update_report_table()
    }

    pub fn init_ui(&self) -> Result<(), StorageError> {
        self.create_ui_table()?;
        self.update_ui_table()
    }

    pub fn create_report_table(&self) -> Result<(), StorageError> {
        self.track(self.store.create_report_table())
    }

    pub fn update_report_table(&self) -> Result<(), StorageError> {
        self.track(self.store.update_report_table())
    }

    pub fn create_ui_table(&self) -> Result<(), StorageError> {
        self.track(self.store.create_ui_table())
    }

    pub fn update_ui_table(&self) -> Result<(), StorageError> {
        self.track(self.store.update_ui_table())
    }

    // ---- Reports ----

    /// Store `report` under `key`, compressed with `compression`.
    /// Overwrites payload and tag of an existing record with the same key.
    pub fn save_report(
        &self,
        key: &CacheKey,
        report: &str,
        compression: Compression,
    ) -> Result<(), StorageError> {
        let result = compress(report.as_bytes(), compression)
            .and_then(|payload| self.store.save_report(key, &payload, compression));
        self.track(result)
    }

    /// Store `report` under `key` with the cache's configured compression.
    pub fn save(&self, key: &CacheKey, report: &str) -> Result<(), StorageError> {
        self.save_report(key, report, self.compression)
    }

    /// Remove every report of `filename`, all kinds and formats.
    pub fn remove_report(&self, filename: &str) -> Result<usize, StorageError> {
        self.track(self.store.remove_report(filename))
    }

    /// `None` on a miss. `Some` with an empty report is a cached empty report.
    pub fn get_report(&self, key: &CacheKey) -> Result<Option<CachedReport>, StorageError> {
        let result = self.store.get_report(key).and_then(|stored| match stored {
            Some(stored) => {
                let bytes = decompress(&stored.payload, stored.compression)?;
                let report = String::from_utf8(bytes).map_err(|e| StorageError::CorruptRecord {
                    message: format!("report for {} is not UTF-8: {e}", key.filename),
                })?;
                Ok(Some(CachedReport {
                    report,
                    compression: stored.compression,
                }))
            }
            None => Ok(None),
        });
        self.track(result)
    }

    /// Existence check by full key; the payload is not read.
    pub fn file_is_registered(&self, key: &CacheKey) -> Result<bool, StorageError> {
        self.track(self.store.file_is_registered(key))
    }

    /// Filenames with at least one stored report.
    pub fn get_elements(&self) -> Result<Vec<String>, StorageError> {
        self.track(self.store.get_elements())
    }

    // ---- UI ----

    pub fn ui_add_file(&self, record: &UiFileRecord) -> Result<(), StorageError> {
        self.track(self.store.ui_add_file(record))
    }

    pub fn ui_update_file(&self, record: &UiFileRecord) -> Result<(), StorageError> {
        self.track(self.store.ui_update_file(record))
    }

    pub fn ui_get_file(
        &self,
        filename: &str,
        filepath: &str,
    ) -> Result<Option<UiFileRecord>, StorageError> {
        self.track(self.store.ui_get_file(filename, filepath))
    }

    pub fn ui_remove_file(&self, filename: &str, filepath: &str) -> Result<(), StorageError> {
        self.track(self.store.ui_remove_file(filename, filepath))
    }

    pub fn ui_get_elements(&self) -> Result<Vec<(String, String)>, StorageError> {
        self.track(self.store.ui_get_elements())
    }

    // ---- Errors ----

    /// Messages of past failures, oldest first.
    pub fn get_errors(&self) -> Vec<String> {
        self.errors.lock().map(|e| e.clone()).unwrap_or_default()
    }
}

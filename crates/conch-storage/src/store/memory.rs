//! In-memory backend, used when persistence is disabled.

use std::sync::RwLock;

use conch_core::errors::StorageError;
use conch_core::types::{CacheKey, Compression};
use rustc_hash::FxHashMap;

use super::{ReportStore, StoredReport, UiFileRecord};

#[derive(Default)]
struct Tables {
    reports: Option<FxHashMap<CacheKey, StoredReport>>,
    ui_files: Option<FxHashMap<(String, String), UiFileRecord>>,
}

/// Report store living only as long as the process.
///
/// Tables must be created before use, like the SQL backend, so callers see
/// the same lifecycle whatever backend they run on.
#[derive(Default)]
pub struct MemoryStore {
    tables: RwLock<Tables>,
}

fn missing_table(name: &str) -> StorageError {
    StorageError::TableMissing {
        table: name.to_string(),
    }
}

fn poisoned() -> StorageError {
    StorageError::SqliteError {
        message: "memory store lock poisoned".to_string(),
    }
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn read<T>(&self, f: impl FnOnce(&Tables) -> Result<T, StorageError>) -> Result<T, StorageError> {
        let guard = self.tables.read().map_err(|_| poisoned())?;
        f(&guard)
    }

    fn write<T>(
        &self,
        f: impl FnOnce(&mut Tables) -> Result<T, StorageError>,
    ) -> Result<T, StorageError> {
        let mut guard = self.tables.write().map_err(|_| poisoned())?;
        f(&mut guard)
    }
}

impl ReportStore for MemoryStore {
    fn create_report_table(&self) -> Result<(), StorageError> {
        self.write(|t| {
            t.reports.get_or_insert_with(FxHashMap::default);
            Ok(())
        })
    }

    fn update_report_table(&self) -> Result<(), StorageError> {
        self.create_report_table()
    }

    fn create_ui_table(&self) -> Result<(), StorageError> {
        self.write(|t| {
            t.ui_files.get_or_insert_with(FxHashMap::default);
            Ok(())
        })
    }

    fn update_ui_table(&self) -> Result<(), StorageError> {
        self.create_ui_table()
    }

    fn save_report(
        &self,
        key: &CacheKey,
        payload: &[u8],
        compression: Compression,
    ) -> Result<(), StorageError> {
        self.write(|t| {
            let reports = t.reports.as_mut().ok_or_else(|| missing_table("report"))?;
            reports.insert(
                key.clone(),
                StoredReport {
                    payload: payload.to_vec(),
                    compression,
                },
            );
            Ok(())
        })
    }

    fn remove_report(&self, filename: &str) -> Result<usize, StorageError> {
        self.write(|t| {
            let reports = t.reports.as_mut().ok_or_else(|| missing_table("report"))?;
            let before = reports.len();
            reports.retain(|key, _| key.filename != filename);
            Ok(before - reports.len())
        })
    }

    fn get_report(&self, key: &CacheKey) -> Result<Option<StoredReport>, StorageError> {
        self.read(|t| {
            let reports = t.reports.as_ref().ok_or_else(|| missing_table("report"))?;
            Ok(reports.get(key).cloned())
        })
    }

    fn file_is_registered(&self, key: &CacheKey) -> Result<bool, StorageError> {
        self.read(|t| {
            let reports = t.reports.as_ref().ok_or_else(|| missing_table("report"))?;
            Ok(reports.contains_key(key))
        })
    }

    fn get_elements(&self) -> Result<Vec<String>, StorageError> {
        self.read(|t| {
            let reports = t.reports.as_ref().ok_or_else(|| missing_table("report"))?;
            let mut names: Vec<String> = reports.keys().map(|k| k.filename.clone()).collect();
            names.sort();
            names.dedup();
            Ok(names)
        })
    }

    fn ui_add_file(&self, record: &UiFileRecord) -> Result<(), StorageError> {
        self.write(|t| {
            let files = t.ui_files.as_mut().ok_or_else(|| missing_table("ui_file"))?;
            let key = (record.filename.clone(), record.filepath.clone());
            if files.contains_key(&key) {
                return Err(StorageError::DuplicateUiRecord {
                    filename: record.filename.clone(),
                    filepath: record.filepath.clone(),
                });
            }
            files.insert(key, record.clone());
            Ok(())
        })
    }

    fn ui_update_file(&self, record: &UiFileRecord) -> Result<(), StorageError> {
        self.write(|t| {
            let files = t.ui_files.as_mut().ok_or_else(|| missing_table("ui_file"))?;
            match files.get_mut(&(record.filename.clone(), record.filepath.clone())) {
                Some(existing) => {
                    *existing = record.clone();
                    Ok(())
                }
                None => Err(StorageError::UiRecordNotFound {
                    filename: record.filename.clone(),
                    filepath: record.filepath.clone(),
                }),
            }
        })
    }

    fn ui_get_file(
        &self,
        filename: &str,
        filepath: &str,
    ) -> Result<Option<UiFileRecord>, StorageError> {
        self.read(|t| {
            let files = t.ui_files.as_ref().ok_or_else(|| missing_table("ui_file"))?;
            Ok(files
                .get(&(filename.to_string(), filepath.to_string()))
                .cloned())
        })
    }

    fn ui_remove_file(&self, filename: &str, filepath: &str) -> Result<(), StorageError> {
        self.write(|t| {
            let files = t.ui_files.as_mut().ok_or_else(|| missing_table("ui_file"))?;
            files
                .remove(&(filename.to_string(), filepath.to_string()))
                .map(|_| ())
                .ok_or_else(|| StorageError::UiRecordNotFound {
                    filename: filename.to_string(),
                    filepath: filepath.to_string(),
                })
        })
    }

    fn ui_get_elements(&self) -> Result<Vec<(String, String)>, StorageError> {
        self.read(|t| {
            let files = t.ui_files.as_ref().ok_or_else(|| missing_table("ui_file"))?;
            let mut keys: Vec<(String, String)> = files.keys().cloned().collect();
            keys.sort_by(|a, b| (&a.1, &a.0).cmp(&(&b.1, &b.0)));
            Ok(keys)
        })
    }

    fn backend_name(&self) -> &'static str {
        "memory"
    }
}

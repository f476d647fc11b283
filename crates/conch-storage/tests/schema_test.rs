//! Schema creation, idempotent updates and the v1 -> v2 report migration.

use conch_core::types::{CacheKey, Compression, Format, ReportKind};
use conch_storage::schema::{self, report_v001, Schema};
use conch_storage::{ReportCache, ReportStore, SqliteStore};
use rusqlite::Connection;
use tempfile::tempdir;

#[test]
fn create_and_update_are_idempotent() {
    let store = SqliteStore::open_in_memory().unwrap();
    for _ in 0..3 {
        store.create_report_table().unwrap();
        store.update_report_table().unwrap();
        store.create_ui_table().unwrap();
        store.update_ui_table().unwrap();
    }
    assert_eq!(store.schema_version(Schema::Report).unwrap(), 2);
    assert_eq!(store.schema_version(Schema::Ui).unwrap(), 1);
}

#[test]
fn schemas_are_versioned_independently() {
    let store = SqliteStore::open_in_memory().unwrap();
    store.create_ui_table().unwrap();
    assert_eq!(store.schema_version(Schema::Ui).unwrap(), 1);
    assert_eq!(store.schema_version(Schema::Report).unwrap(), 0);
}

#[test]
fn update_from_nothing_builds_latest_report_layout() {
    let store = SqliteStore::open_in_memory().unwrap();
    store.update_report_table().unwrap();
    assert_eq!(store.schema_version(Schema::Report).unwrap(), 2);

    let cache = ReportCache::new(Box::new(store));
    let k = CacheKey::new(ReportKind::MediaConch, Format::Xml, "a.mkv", "t");
    cache.save_report(&k, "<r/>", Compression::Zstd).unwrap();
    assert_eq!(cache.get_report(&k).unwrap().unwrap().report, "<r/>");
}

#[test]
fn v1_rows_survive_migration_as_uncompressed() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("legacy.db");

    {
        let conn = Connection::open(&path).unwrap();
        conn.execute_batch(schema::SCHEMA_VERSION_SQL).unwrap();
        conn.execute_batch(report_v001::MIGRATION_SQL).unwrap();
        conn.execute(
            "INSERT INTO schema_version (name, version) VALUES ('report', 1)",
            [],
        )
        .unwrap();
        conn.execute(
            "INSERT INTO report (tool, format, filename, file_last_modification, report)
             VALUES (0, 0, '/media/old.mkv', 'then', CAST('<legacy/>' AS BLOB))",
            [],
        )
        .unwrap();
    }

    let store = SqliteStore::open(&path).unwrap();
    assert_eq!(store.schema_version(Schema::Report).unwrap(), 1);
    // create on an existing schema must not bump its version
    store.create_report_table().unwrap();
    assert_eq!(store.schema_version(Schema::Report).unwrap(), 1);

    store.update_report_table().unwrap();
    assert_eq!(store.schema_version(Schema::Report).unwrap(), 2);

    let cache = ReportCache::new(Box::new(store));
    let k = CacheKey::new(ReportKind::MediaConch, Format::Xml, "/media/old.mkv", "then");
    let hit = cache.get_report(&k).unwrap().unwrap();
    assert_eq!(hit.report, "<legacy/>");
    assert_eq!(hit.compression, Compression::None);
}

#[test]
fn reports_survive_reopen() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("nested").join("conch.db");
    let k = CacheKey::new(ReportKind::MediaTrace, Format::Xml, "/media/a.mkv", "t1");

    {
        let cache = ReportCache::new(Box::new(SqliteStore::open(&path).unwrap()));
        cache.init().unwrap();
        cache.save_report(&k, "<trace/>", Compression::Zstd).unwrap();
    }

    let cache = ReportCache::new(Box::new(SqliteStore::open(&path).unwrap()));
    cache.init().unwrap();
    assert!(cache.file_is_registered(&k).unwrap());
    assert_eq!(cache.get_report(&k).unwrap().unwrap().report, "<trace/>");
}

#[test]
fn schema_version_table_lists_both_schemas() {
    let conn = Connection::open_in_memory().unwrap();
    schema::create(&conn, Schema::Report).unwrap();
    schema::create(&conn, Schema::Ui).unwrap();
    let names: Vec<String> = conn
        .prepare("SELECT name FROM schema_version ORDER BY name")
        .unwrap()
        .query_map([], |row| row.get(0))
        .unwrap()
        .collect::<Result<_, _>>()
        .unwrap();
    assert_eq!(names, vec!["report".to_string(), "ui".to_string()]);
}

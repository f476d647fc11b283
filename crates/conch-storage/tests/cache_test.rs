//! ReportCache behaviour, run against both backends.

use conch_core::types::{CacheKey, Compression, Format, ReportKind};
use conch_storage::{MemoryStore, ReportCache, ReportStore, SqliteStore};
use proptest::prelude::*;

fn caches() -> Vec<ReportCache> {
    let stores: Vec<Box<dyn ReportStore>> = vec![
        Box::new(SqliteStore::open_in_memory().unwrap()),
        Box::new(MemoryStore::new()),
    ];
    stores
        .into_iter()
        .map(|store| {
            let cache = ReportCache::new(store);
            cache.init().unwrap();
            cache
        })
        .collect()
}

fn key(kind: ReportKind, format: Format, file: &str) -> CacheKey {
    CacheKey::new(kind, format, file, "2024-03-01 10:00:00")
}

#[test]
fn miss_is_none_not_error() {
    for cache in caches() {
        let k = key(ReportKind::MediaConch, Format::Xml, "/media/a.mkv");
        assert_eq!(cache.get_report(&k).unwrap(), None, "{}", cache.backend_name());
        assert!(!cache.file_is_registered(&k).unwrap());
        assert!(cache.get_errors().is_empty());
    }
}

#[test]
fn cached_empty_report_is_distinguishable_from_miss() {
    for cache in caches() {
        let k = key(ReportKind::MediaTrace, Format::Xml, "/media/empty.mkv");
        cache.save_report(&k, "", Compression::Zstd).unwrap();
        let hit = cache.get_report(&k).unwrap().unwrap();
        assert_eq!(hit.report, "");
        assert_eq!(hit.compression, Compression::Zstd);
    }
}

#[test]
fn second_save_overwrites_without_duplicating() {
    for cache in caches() {
        let k = key(ReportKind::MediaConch, Format::Xml, "/media/a.mkv");
        cache.save_report(&k, "<first/>", Compression::None).unwrap();
        cache.save_report(&k, "<second/>", Compression::Zstd).unwrap();

        let hit = cache.get_report(&k).unwrap().unwrap();
        assert_eq!(hit.report, "<second/>");
        assert_eq!(hit.compression, Compression::Zstd);
        assert_eq!(cache.get_elements().unwrap(), vec!["/media/a.mkv".to_string()]);
    }

    let store = SqliteStore::open_in_memory().unwrap();
    let cache = ReportCache::new(Box::new(store));
    cache.init().unwrap();
    let k = key(ReportKind::MediaInfo, Format::Text, "/media/b.mkv");
    cache.save_report(&k, "one", Compression::None).unwrap();
    cache.save_report(&k, "two", Compression::None).unwrap();
    assert_eq!(cache.get_report(&k).unwrap().unwrap().report, "two");
}

#[test]
fn key_components_are_all_significant() {
    for cache in caches() {
        let base = key(ReportKind::MediaConch, Format::Xml, "/media/a.mkv");
        cache.save_report(&base, "base", Compression::None).unwrap();

        let other_kind = key(ReportKind::MediaInfo, Format::Xml, "/media/a.mkv");
        let other_format = key(ReportKind::MediaConch, Format::Text, "/media/a.mkv");
        let other_stamp = CacheKey::new(ReportKind::MediaConch, Format::Xml, "/media/a.mkv", "later");
        for k in [&other_kind, &other_format, &other_stamp] {
            assert!(!cache.file_is_registered(k).unwrap());
        }
        assert!(cache.file_is_registered(&base).unwrap());
    }
}

#[test]
fn remove_report_clears_every_kind_and_format_of_the_file() {
    for cache in caches() {
        for kind in ReportKind::ALL {
            for format in [Format::Xml, Format::Text, Format::Html] {
                cache
                    .save_report(&key(kind, format, "/media/a.mkv"), "r", Compression::Zstd)
                    .unwrap();
            }
        }
        cache
            .save_report(&key(ReportKind::MediaConch, Format::Xml, "/media/keep.mkv"), "k", Compression::None)
            .unwrap();

        assert_eq!(cache.remove_report("/media/a.mkv").unwrap(), 9);

        for kind in ReportKind::ALL {
            for format in Format::ALL {
                assert!(!cache.file_is_registered(&key(kind, format, "/media/a.mkv")).unwrap());
            }
        }
        assert_eq!(cache.get_elements().unwrap(), vec!["/media/keep.mkv".to_string()]);
    }
}

#[test]
fn get_elements_lists_distinct_filenames() {
    for cache in caches() {
        cache.save_report(&key(ReportKind::MediaConch, Format::Xml, "b.mkv"), "x", Compression::None).unwrap();
        cache.save_report(&key(ReportKind::MediaTrace, Format::Xml, "b.mkv"), "y", Compression::None).unwrap();
        cache.save_report(&key(ReportKind::MediaConch, Format::Xml, "a.mkv"), "z", Compression::None).unwrap();
        assert_eq!(
            cache.get_elements().unwrap(),
            vec!["a.mkv".to_string(), "b.mkv".to_string()]
        );
    }
}

#[test]
fn failures_accumulate_in_error_log() {
    // Tables never created: every call fails and is logged.
    let stores: Vec<Box<dyn ReportStore>> = vec![
        Box::new(SqliteStore::open_in_memory().unwrap()),
        Box::new(MemoryStore::new()),
    ];
    for store in stores {
        let cache = ReportCache::new(store);
        let k = key(ReportKind::MediaConch, Format::Xml, "a.mkv");
        assert!(cache.save_report(&k, "r", Compression::None).is_err());
        assert!(cache.get_report(&k).is_err());
        assert_eq!(cache.get_errors().len(), 2);

        cache.init().unwrap();
        cache.save_report(&k, "r", Compression::None).unwrap();
        assert_eq!(cache.get_errors().len(), 2, "successes do not reset the log");
    }
}

proptest! {
    #[test]
    fn save_then_get_returns_identical_payload(
        report in "\\PC{0,400}",
        zstd in any::<bool>(),
        kind_idx in 0usize..ReportKind::COUNT,
        format_idx in 0usize..Format::COUNT,
    ) {
        let compression = if zstd { Compression::Zstd } else { Compression::None };
        let k = CacheKey::new(
            ReportKind::from_index(kind_idx).unwrap(),
            Format::from_index(format_idx).unwrap(),
            "/media/prop.mkv",
            "stamp",
        );
        for cache in caches() {
            cache.save_report(&k, &report, compression).unwrap();
            let hit = cache.get_report(&k).unwrap().unwrap();
            prop_assert_eq!(&hit.report, &report);
            prop_assert_eq!(hit.compression, compression);
        }
    }
}

#[test]
fn from_config_opens_configured_database() {
    let dir = tempfile::tempdir().unwrap();
    let mut storage = conch_core::config::StorageConfig::default();
    storage.set_database_directory(dir.path().join("dbdir").display().to_string());
    storage.set_database_filename("x.db");
    storage.compression = Some("none".to_string());

    let cache = ReportCache::from_config(&storage).unwrap();
    assert_eq!(cache.backend_name(), "sqlite");
    assert_eq!(cache.compression(), Compression::None);
    assert!(dir.path().join("dbdir").join("x.db").exists());

    let k = key(ReportKind::MediaInfo, Format::Xml, "a.mkv");
    cache.save(&k, "<report/>").unwrap();
    let hit = cache.get_report(&k).unwrap().unwrap();
    assert_eq!(hit.report, "<report/>");
    assert_eq!(hit.compression, Compression::None);
}

#[test]
fn from_config_with_storage_disabled_stays_in_memory() {
    let dir = tempfile::tempdir().unwrap();
    let mut storage = conch_core::config::StorageConfig::default();
    storage.enabled = Some(false);
    storage.set_database_directory(dir.path().display().to_string());

    let cache = ReportCache::from_config(&storage).unwrap();
    assert_eq!(cache.backend_name(), "memory");
    assert_eq!(cache.compression(), Compression::Zstd);
    assert!(!dir.path().join("conch.db").exists());
    assert!(cache.get_elements().unwrap().is_empty());
}

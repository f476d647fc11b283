//! Tests for the configuration system.

use std::sync::Mutex;

use conch_core::config::ConchConfig;
use conch_core::errors::ConfigError;
use conch_core::types::Compression;

/// Serializes tests that touch environment variables.
static ENV_MUTEX: Mutex<()> = Mutex::new(());

fn clear_conch_env_vars() {
    for key in [
        "CONCH_DAEMON_ENABLED",
        "CONCH_DAEMON_ADDRESS",
        "CONCH_DAEMON_PORT",
        "CONCH_STORAGE_DIRECTORY",
        "CONCH_STORAGE_COMPRESSION",
        "CONCH_POLICIES_DIRECTORY",
    ] {
        std::env::remove_var(key);
    }
}

/// Point `HOME` at an empty directory so no user config leaks in.
fn isolated_home() -> tempfile::TempDir {
    let home = tempfile::TempDir::new().unwrap();
    std::env::set_var("HOME", home.path());
    home
}

#[test]
fn defaults_without_any_file() {
    let _lock = ENV_MUTEX.lock().unwrap();
    clear_conch_env_vars();
    let _home = isolated_home();

    let config = ConchConfig::load(None).unwrap();
    assert!(!config.daemon.effective_enabled());
    assert_eq!(config.daemon_address(), ("127.0.0.1".to_string(), 80));
    assert!(config.storage.effective_enabled());
    assert_eq!(config.storage.effective_compression(), Compression::Zstd);
    assert!(config
        .storage
        .database_path()
        .unwrap()
        .ends_with(".conch/conch.db"));
}

#[test]
fn explicit_file_overrides_user_file_and_env_overrides_both() {
    let _lock = ENV_MUTEX.lock().unwrap();
    clear_conch_env_vars();
    let home = isolated_home();

    let user_dir = home.path().join(".conch");
    std::fs::create_dir_all(&user_dir).unwrap();
    std::fs::write(
        user_dir.join("config.toml"),
        r#"
[daemon]
enabled = true
address = "10.0.0.1"
port = 4000
"#,
    )
    .unwrap();

    let explicit = home.path().join("custom.toml");
    std::fs::write(
        &explicit,
        r#"
[daemon]
port = 5000

[storage]
compression = "none"
"#,
    )
    .unwrap();

    std::env::set_var("CONCH_DAEMON_ADDRESS", "192.168.1.2");

    let config = ConchConfig::load(Some(&explicit)).unwrap();
    assert!(config.daemon.effective_enabled());
    assert_eq!(config.daemon_address(), ("192.168.1.2".to_string(), 5000));
    assert_eq!(config.storage.effective_compression(), Compression::None);

    clear_conch_env_vars();
}

#[test]
fn missing_explicit_file_is_an_error() {
    let _lock = ENV_MUTEX.lock().unwrap();
    clear_conch_env_vars();
    let home = isolated_home();

    let err = ConchConfig::load(Some(&home.path().join("absent.toml"))).unwrap_err();
    assert!(matches!(err, ConfigError::FileNotFound { .. }));
}

#[test]
fn invalid_toml_reports_path() {
    let _lock = ENV_MUTEX.lock().unwrap();
    clear_conch_env_vars();
    let home = isolated_home();

    let path = home.path().join("broken.toml");
    std::fs::write(&path, "[daemon\nport = ").unwrap();
    match ConchConfig::load(Some(&path)).unwrap_err() {
        ConfigError::ParseError { path: p, .. } => assert!(p.ends_with("broken.toml")),
        other => panic!("expected parse error, got {other:?}"),
    }
}

#[test]
fn validation_rejects_bad_values() {
    assert!(matches!(
        ConchConfig::from_toml("[daemon]\nport = 0\n"),
        Err(ConfigError::ValidationFailed { .. })
    ));
    assert!(matches!(
        ConchConfig::from_toml("[storage]\ncompression = \"lzma\"\n"),
        Err(ConfigError::ValidationFailed { .. })
    ));
    assert!(matches!(
        ConchConfig::from_toml("[storage]\nfilename = \"  \"\n"),
        Err(ConfigError::ValidationFailed { .. })
    ));
}

#[test]
fn toml_roundtrip_preserves_values() {
    let config = ConchConfig::from_toml(
        r#"
[daemon]
enabled = true
port = 8080

[policies]
directory = "/srv/policies"
"#,
    )
    .unwrap();
    let reparsed = ConchConfig::from_toml(&config.to_toml().unwrap()).unwrap();
    assert_eq!(reparsed.daemon.port, Some(8080));
    assert_eq!(reparsed.daemon.enabled, Some(true));
    assert_eq!(reparsed.policies.directory.as_deref(), Some("/srv/policies"));
}

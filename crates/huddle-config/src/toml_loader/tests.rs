//! Tests for TOML config loading, creation, and path resolution.

use super::*;
use crate::schema::LogLevel;
use std::path::Path;

#[test]
fn load_from_nonexistent_returns_file_not_found() {
    let result = load_from_path(Path::new("/tmp/nonexistent_huddle_config.toml"));
    let err = result.unwrap_err();
    assert!(matches!(err, huddle_common::ConfigError::FileNotFound(_)));
}

#[test]
fn load_valid_partial_toml() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("config.toml");
    std::fs::write(
        &path,
        r#"
[relay]
url = "wss://relay.example.org/ws"

[call]
ring_timeout_secs = 30
"#,
    )
    .unwrap();

    let config = load_from_path(&path).unwrap();
    assert_eq!(config.relay.url, "wss://relay.example.org/ws");
    assert_eq!(config.call.ring_timeout_secs, Some(30));
    // Defaults preserved
    assert_eq!(config.relay.connect_timeout_secs, 15);
    assert!(config.chat.sound_cue);
    assert!(config.media.video && config.media.audio);
    assert!(config.profile.display_name.is_none());
}

#[test]
fn load_invalid_toml_returns_parse_error() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("config.toml");
    std::fs::write(&path, "this is not valid toml {{{").unwrap();

    let err = load_from_path(&path).unwrap_err();
    assert!(matches!(err, huddle_common::ConfigError::ParseError(_)));
}

#[test]
fn load_keeps_out_of_range_values_for_validation() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("config.toml");
    std::fs::write(&path, "[call]\nring_timeout_secs = 1\n").unwrap();

    let config = load_from_path(&path).unwrap();
    assert_eq!(config.call.ring_timeout_secs, Some(1));
    assert!(crate::validation::validate(&config).is_err());
}

#[test]
fn create_and_load_default_config() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("huddle").join("config.toml");

    assert!(create_default_config(&path).unwrap());
    assert!(path.exists());

    let config = load_from_path(&path).unwrap();
    assert_eq!(config.relay.url, "ws://127.0.0.1:8080/ws");
    assert_eq!(config.logging.level, LogLevel::Info);
    assert!(config.call.ring_timeout_secs.is_none());
}

#[test]
fn default_template_parses_and_validates() {
    let config: crate::schema::HuddleConfig =
        toml::from_str(&super::template::default_config_toml()).unwrap();
    assert!(crate::validation::validate(&config).is_ok());
}

#[test]
fn log_level_parses_uppercase() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("config.toml");
    std::fs::write(&path, "[logging]\nlevel = \"WARNING\"\n").unwrap();

    let config = load_from_path(&path).unwrap();
    assert_eq!(config.logging.level, LogLevel::Warning);
    assert_eq!(config.logging.level.as_directive(), "warn");
}

#[test]
fn seeding_never_overwrites_an_existing_config() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("config.toml");
    let mine = "[relay]\nurl = \"wss://mine.example/ws\"\n";
    std::fs::write(&path, mine).unwrap();

    assert!(!create_default_config(&path).unwrap());
    assert_eq!(std::fs::read_to_string(&path).unwrap(), mine);
}

#[test]
fn seeding_reports_unwritable_location() {
    let dir = tempfile::tempdir().unwrap();
    let blocker = dir.path().join("huddle");
    std::fs::write(&blocker, "not a directory").unwrap();
    let path = blocker.join("config.toml");

    let err = create_default_config(&path).unwrap_err();
    match err {
        huddle_common::ConfigError::WriteFailed { path: failed, .. } => assert_eq!(failed, path),
        other => panic!("expected WriteFailed, got {other:?}"),
    }
}

#[test]
fn config_lives_under_app_directory() {
    let path = paths::config_path_in(Path::new("/home/ann/.config"));
    assert_eq!(path, Path::new("/home/ann/.config/huddle/config.toml"));

    if let Ok(path) = default_config_path() {
        assert!(path.ends_with("huddle/config.toml"));
    }
}

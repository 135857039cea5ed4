//! Integration tests for Settings layered loading.
//!
//! These tests use explicit config files in temp directories. A global config
//! under the user's XDG directory, if present, is layered underneath; the
//! assertions only touch keys the explicit file sets.

use std::fs;

use tempfile::TempDir;

use ktab::application::ApplicationError;
use ktab::config::Settings;
use ktab::domain::Notation;

#[test]
fn given_explicit_config_when_load_then_overrides_lower_layers() {
    // Arrange
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("ktab.toml");
    fs::write(
        &path,
        r#"
max_iterations = 2000
max_worlds = 64
blocking = false
notation = "unicode"
"#,
    )
    .unwrap();

    // Act
    let settings = Settings::load(Some(path.as_path())).expect("load settings");

    // Assert
    assert_eq!(settings.max_iterations, 2000);
    assert_eq!(settings.max_worlds, 64);
    assert!(!settings.blocking);
    assert_eq!(settings.notation, Notation::Unicode);
    let limits = settings.limits();
    assert_eq!(limits.max_worlds, 64);
    assert!(!limits.blocking);
}

#[test]
fn given_missing_explicit_config_when_load_then_config_error() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("absent.toml");

    let result = Settings::load(Some(path.as_path()));

    match result {
        Err(ApplicationError::Config { message }) => assert!(message.contains("absent.toml")),
        other => panic!("expected config error, got {:?}", other),
    }
}

#[test]
fn given_unparsable_toml_when_load_then_config_error() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("broken.toml");
    fs::write(&path, "max_worlds = = 3\n").unwrap();

    let result = Settings::load(Some(path.as_path()));

    assert!(matches!(result, Err(ApplicationError::Config { .. })));
}

#[test]
fn given_unknown_key_when_load_then_config_error() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("typo.toml");
    fs::write(&path, "max_world = 3\n").unwrap();

    let result = Settings::load(Some(path.as_path()));

    assert!(matches!(result, Err(ApplicationError::Config { .. })));
}

#[test]
fn given_zero_ceiling_in_file_when_load_then_config_error() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("zero.toml");
    fs::write(&path, "max_worlds = 0\n").unwrap();

    let result = Settings::load(Some(path.as_path()));

    match result {
        Err(ApplicationError::Config { message }) => assert!(message.contains("max_worlds")),
        other => panic!("expected config error, got {:?}", other),
    }
}

#[test]
fn given_template_when_parsed_then_is_valid_toml_with_defaults_commented() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("template.toml");
    fs::write(&path, Settings::template()).unwrap();

    let settings = Settings::load(Some(path.as_path())).expect("template loads");

    assert!(settings.max_iterations > 0);
    assert!(Settings::template().contains("# max_worlds = 512"));
}

//! KTAB_* environment overrides. Kept in its own test binary because it
//! mutates the process environment.

use std::env;
use std::fs;

use tempfile::TempDir;

use ktab::application::ApplicationError;
use ktab::config::Settings;
use ktab::domain::Notation;

#[test]
fn given_env_vars_when_load_then_override_file_and_reject_garbage() {
    // Arrange
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("ktab.toml");
    fs::write(&path, "max_worlds = 64\nparallel = true\n").unwrap();
    env::set_var("KTAB_MAX_WORLDS", "7");
    env::set_var("KTAB_PARALLEL", "false");
    env::set_var("KTAB_NOTATION", "unicode");

    // Act
    let settings = Settings::load(Some(path.as_path()));

    // Assert
    let settings = settings.expect("load settings");
    assert_eq!(settings.max_worlds, 7);
    assert!(!settings.parallel);
    assert_eq!(settings.notation, Notation::Unicode);

    // Arrange: malformed value
    env::set_var("KTAB_MAX_WORLDS", "many");

    // Act
    let result = Settings::load(Some(path.as_path()));

    // Assert
    assert!(matches!(result, Err(ApplicationError::Config { .. })));

    env::remove_var("KTAB_MAX_WORLDS");
    env::remove_var("KTAB_PARALLEL");
    env::remove_var("KTAB_NOTATION");
}

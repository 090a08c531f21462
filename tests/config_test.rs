//! Integration tests for Settings layered loading.
//!
//! These tests use temp directories for the `--config` layer. They assume no
//! MANVIEW_* variables are set; environment overrides are tested in
//! `config_env_test.rs`, which runs in its own process.

use std::fs;
use std::path::PathBuf;

use tempfile::TempDir;

use manview::config::{ListingStrategy, Settings};

// ============================================================
// Settings::load() with an explicit config file
// ============================================================

#[test]
fn given_config_file_when_load_then_overrides_defaults() {
    // Arrange
    let temp = TempDir::new().unwrap();
    let path = temp.path().join("manview.toml");
    fs::write(
        &path,
        r#"
artifact_dir = "/tmp/manview-pages"

[render]
width = 100

[man]
listing = "scan"
"#,
    )
    .unwrap();

    // Act
    let settings = Settings::load(Some(&path)).expect("load settings");

    // Assert
    assert_eq!(settings.render.width, 100);
    assert_eq!(settings.man.listing, ListingStrategy::Scan);
    assert_eq!(
        settings.artifact_dir,
        Some(PathBuf::from("/tmp/manview-pages"))
    );
}

#[test]
fn given_partial_config_file_when_load_then_unspecified_fields_keep_defaults() {
    let temp = TempDir::new().unwrap();
    let path = temp.path().join("manview.toml");
    fs::write(&path, "[render]\ndark = false\n").unwrap();

    let settings = Settings::load(Some(&path)).expect("load settings");

    assert!(!settings.render.dark);
    assert_eq!(settings.man.command, "man");
}

#[test]
fn given_missing_config_file_when_load_then_config_error() {
    let temp = TempDir::new().unwrap();

    let err = Settings::load(Some(&temp.path().join("absent.toml"))).unwrap_err();

    assert!(err.to_string().contains("absent.toml"), "got: {err}");
}

#[test]
fn given_invalid_toml_when_load_then_config_error() {
    let temp = TempDir::new().unwrap();
    let path = temp.path().join("manview.toml");
    fs::write(&path, "[render\nwidth = ").unwrap();

    let err = Settings::load(Some(&path)).unwrap_err();

    assert!(err.to_string().contains("parse"), "got: {err}");
}

#[test]
fn given_too_narrow_width_when_load_then_rejected() {
    let temp = TempDir::new().unwrap();
    let path = temp.path().join("manview.toml");
    fs::write(&path, "[render]\nwidth = 5\n").unwrap();

    let err = Settings::load(Some(&path)).unwrap_err();

    assert!(err.to_string().contains("render.width"), "got: {err}");
}

#[test]
fn given_env_var_in_artifact_dir_when_load_then_expanded() {
    // Arrange
    let temp = TempDir::new().unwrap();
    let path = temp.path().join("manview.toml");
    fs::write(&path, "artifact_dir = \"$HOME/manview-pages\"\n").unwrap();
    let home = std::env::var("HOME").expect("HOME should be set");

    // Act
    let settings = Settings::load(Some(&path)).expect("load settings");

    // Assert
    assert_eq!(
        settings.artifact_dir,
        Some(PathBuf::from(format!("{home}/manview-pages")))
    );
}

#![allow(clippy::unwrap_used)]
#![allow(missing_docs)]

use assert_cmd::cargo_bin_cmd;
use predicates::prelude::{PredicateBooleanExt, predicate};

#[test]
fn test_config_init_writes_default_file() {
    // Arrange
    let dir = tempfile::tempdir().unwrap();

    // Act
    let mut cmd = cargo_bin_cmd!("cartelera");
    cmd.args(["config", "init", "--dir"])
        .arg(dir.path())
        .assert()
        .success()
        .stdout(predicate::str::contains("Wrote default config"));

    // Assert
    let written = std::fs::read_to_string(dir.path().join("config.toml")).unwrap();
    assert!(written.contains("language = \"es-ES\""));
}

#[test]
fn test_config_init_keeps_existing_file() {
    // Arrange
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("config.toml");
    std::fs::write(&path, "[tmdb]\nlanguage = \"en-US\"\n").unwrap();

    // Act
    let mut cmd = cargo_bin_cmd!("cartelera");
    cmd.args(["config", "init", "--dir"])
        .arg(dir.path())
        .assert()
        .success()
        .stdout(predicate::str::contains("Config already exists"));

    // Assert
    let content = std::fs::read_to_string(&path).unwrap();
    assert!(content.contains("en-US"));
}

#[test]
fn test_config_show_masks_api_key() {
    // Arrange
    let dir = tempfile::tempdir().unwrap();
    std::fs::write(
        dir.path().join("config.toml"),
        "[tmdb]\napi_key = \"super-secret\"\n",
    )
    .unwrap();

    // Act & Assert
    let mut cmd = cargo_bin_cmd!("cartelera");
    cmd.args(["config", "show", "--dir"])
        .arg(dir.path())
        .assert()
        .success()
        .stdout(predicate::str::contains("language = \"es-ES\""))
        .stdout(predicate::str::contains("********"))
        .stdout(predicate::str::contains("super-secret").not());
}

#[test]
fn test_config_show_rejects_invalid_toml() {
    // Arrange
    let dir = tempfile::tempdir().unwrap();
    std::fs::write(dir.path().join("config.toml"), "[tmdb\n").unwrap();

    // Act & Assert
    let mut cmd = cargo_bin_cmd!("cartelera");
    cmd.args(["config", "show", "--dir"])
        .arg(dir.path())
        .assert()
        .failure()
        .stderr(predicate::str::contains("failed to load config"));
}

#[test]
fn test_completions_bash() {
    // Arrange & Act & Assert
    let mut cmd = cargo_bin_cmd!("cartelera");
    cmd.args(["completions", "bash"])
        .assert()
        .success()
        .stdout(predicate::str::contains("cartelera"));
}

#[test]
fn test_browse_help() {
    // Arrange & Act & Assert
    let mut cmd = cargo_bin_cmd!("cartelera");
    cmd.args(["browse", "--help"])
        .assert()
        .success()
        .stdout(predicate::str::contains("--language"));
}

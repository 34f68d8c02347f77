//! Integration tests for the conduce binary.

use std::fs;
use std::path::Path;

use assert_cmd::Command;
use predicates::prelude::*;

fn conduce() -> Command {
    Command::cargo_bin("conduce").unwrap()
}

/// Write a config file pointing the correction store into `dir`.
fn write_config(dir: &Path) -> std::path::PathBuf {
    let store_path = dir.join("corrections.json");
    let config_path = dir.join("config.json");

    let config = serde_json::json!({
        "corrections": { "path": store_path }
    });
    fs::write(&config_path, serde_json::to_string(&config).unwrap()).unwrap();

    config_path
}

#[test]
fn help_lists_subcommands() {
    conduce()
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("extract"))
        .stdout(predicate::str::contains("batch"))
        .stdout(predicate::str::contains("corrections"))
        .stdout(predicate::str::contains("config"));
}

#[test]
fn version_prints_name() {
    conduce()
        .arg("--version")
        .assert()
        .success()
        .stdout(predicate::str::contains("conduce"));
}

#[test]
fn extract_rejects_missing_input() {
    conduce()
        .args(["extract", "does-not-exist.pdf"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Input file not found"));
}

#[test]
fn extract_rejects_non_pdf_input() {
    let dir = tempfile::tempdir().unwrap();
    let input = dir.path().join("invoice.txt");
    fs::write(&input, "not a pdf").unwrap();

    conduce()
        .arg("extract")
        .arg(&input)
        .assert()
        .failure()
        .stderr(predicate::str::contains("Unsupported file format"));
}

#[test]
fn extract_rejects_missing_config() {
    conduce()
        .args(["extract", "whatever.pdf", "--config", "no-such-config.json"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Config file not found"));
}

#[test]
fn batch_fails_on_empty_pattern() {
    let dir = tempfile::tempdir().unwrap();
    let pattern = dir.path().join("*.pdf");

    conduce()
        .arg("batch")
        .arg(pattern.to_str().unwrap())
        .assert()
        .failure()
        .stderr(predicate::str::contains("No matching files found"));
}

#[test]
fn corrections_list_starts_empty() {
    let dir = tempfile::tempdir().unwrap();
    let config = write_config(dir.path());

    conduce()
        .args(["corrections", "list"])
        .arg("--config")
        .arg(&config)
        .assert()
        .success()
        .stdout(predicate::str::contains("No learned corrections"));
}

#[test]
fn corrections_add_then_remove() {
    let dir = tempfile::tempdir().unwrap();
    let config = write_config(dir.path());

    conduce()
        .args(["corrections", "add", "TELEFONO SAMS GALAXY A14", "Samsung Galaxy A14"])
        .arg("--config")
        .arg(&config)
        .assert()
        .success()
        .stdout(predicate::str::contains("Remembered"));

    conduce()
        .args(["corrections", "list"])
        .arg("--config")
        .arg(&config)
        .assert()
        .success()
        .stdout(predicate::str::contains("TELEFONO SAMS GALAXY A14"))
        .stdout(predicate::str::contains("Samsung Galaxy A14"));

    conduce()
        .args(["corrections", "remove", "TELEFONO SAMS GALAXY A14"])
        .arg("--config")
        .arg(&config)
        .assert()
        .success()
        .stdout(predicate::str::contains("Removed correction"));

    conduce()
        .args(["corrections", "list"])
        .arg("--config")
        .arg(&config)
        .assert()
        .success()
        .stdout(predicate::str::contains("No learned corrections"));
}

#[test]
fn corrections_remove_unknown_is_harmless() {
    let dir = tempfile::tempdir().unwrap();
    let config = write_config(dir.path());

    conduce()
        .args(["corrections", "remove", "NEVER STORED"])
        .arg("--config")
        .arg(&config)
        .assert()
        .success()
        .stdout(predicate::str::contains("No correction found"));
}

#[test]
fn corrections_clear_requires_force() {
    let dir = tempfile::tempdir().unwrap();
    let config = write_config(dir.path());

    conduce()
        .args(["corrections", "add", "TELEFONO ZTE", "ZTE"])
        .arg("--config")
        .arg(&config)
        .assert()
        .success();

    conduce()
        .args(["corrections", "clear"])
        .arg("--config")
        .arg(&config)
        .assert()
        .failure()
        .stderr(predicate::str::contains("--force"));

    conduce()
        .args(["corrections", "clear", "--force"])
        .arg("--config")
        .arg(&config)
        .assert()
        .success()
        .stdout(predicate::str::contains("Removed 1"));
}

#[test]
fn config_init_get_set_roundtrip() {
    let dir = tempfile::tempdir().unwrap();
    let config = dir.path().join("config.json");

    conduce()
        .args(["config", "init", "--output"])
        .arg(&config)
        .assert()
        .success()
        .stdout(predicate::str::contains("Created configuration file"));

    assert!(config.exists());

    conduce()
        .args(["config", "get", "pdf.max_pages"])
        .arg("--config")
        .arg(&config)
        .assert()
        .success()
        .stdout(predicate::str::diff("0\n"));

    conduce()
        .args(["config", "set", "pdf.max_pages", "7"])
        .arg("--config")
        .arg(&config)
        .assert()
        .success()
        .stdout(predicate::str::contains("Set pdf.max_pages = 7"));

    conduce()
        .args(["config", "get", "pdf.max_pages"])
        .arg("--config")
        .arg(&config)
        .assert()
        .success()
        .stdout(predicate::str::diff("7\n"));
}

#[test]
fn config_get_unknown_key_fails() {
    let dir = tempfile::tempdir().unwrap();
    let config = write_config(dir.path());

    conduce()
        .args(["config", "get", "no.such.key"])
        .arg("--config")
        .arg(&config)
        .assert()
        .failure()
        .stderr(predicate::str::contains("Configuration key not found"));
}

#[test]
fn config_init_refuses_overwrite() {
    let dir = tempfile::tempdir().unwrap();
    let config = dir.path().join("config.json");

    conduce()
        .args(["config", "init", "--output"])
        .arg(&config)
        .assert()
        .success();

    conduce()
        .args(["config", "init", "--output"])
        .arg(&config)
        .assert()
        .failure()
        .stderr(predicate::str::contains("--force"));
}

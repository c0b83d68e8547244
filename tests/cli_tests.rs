//! Binary flag handling.

use assert_cmd::Command;
use predicates::prelude::*;

#[test]
fn help_describes_the_daemon() {
    Command::cargo_bin("marketpulse")
        .unwrap()
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("Market data refresh daemon"))
        .stdout(predicate::str::contains("--config"));
}

#[test]
fn missing_config_file_fails_with_context() {
    Command::cargo_bin("marketpulse")
        .unwrap()
        .args(["--config", "/nonexistent/marketpulse.toml"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("loading config"));
}

#[test]
fn check_config_validates_and_exits() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("config.toml");
    std::fs::write(
        &path,
        r#"
        [scheduler]
        cycle_secs = 30

        [logging]
        level = "debug"
        "#,
    )
    .unwrap();

    Command::cargo_bin("marketpulse")
        .unwrap()
        .args(["--config", path.to_str().unwrap(), "--check-config"])
        .assert()
        .success()
        .stdout(predicate::str::contains("configuration OK"));
}

#[test]
fn check_config_rejects_invalid_values() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("config.toml");
    std::fs::write(
        &path,
        r#"
        [scheduler]
        cycle_secs = 0
        "#,
    )
    .unwrap();

    Command::cargo_bin("marketpulse")
        .unwrap()
        .args(["--config", path.to_str().unwrap(), "--check-config"])
        .assert()
        .failure();
}

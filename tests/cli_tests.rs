use assert_cmd::Command;
use predicates::prelude::*;

#[test]
fn test_help_lists_subcommands() {
    let mut cmd = Command::cargo_bin("gfs-orders").unwrap();
    cmd.arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("materials"))
        .stdout(predicate::str::contains("orders"))
        .stdout(predicate::str::contains("login"))
        .stdout(predicate::str::contains("item"));
}

#[test]
fn test_unknown_subcommand_fails() {
    let mut cmd = Command::cargo_bin("gfs-orders").unwrap();
    cmd.arg("refund").assert().failure();
}

#[test]
fn test_bad_config_file_is_fatal() {
    let dir = tempfile::TempDir::new().unwrap();
    let config = dir.path().join("config.toml");
    std::fs::write(&config, "portal = \"not a table\"").unwrap();

    let mut cmd = Command::cargo_bin("gfs-orders").unwrap();
    cmd.arg("--config")
        .arg(&config)
        .arg("orders")
        .assert()
        .failure()
        .stderr(predicate::str::contains("Error"));
}

#[test]
fn test_on_error_value_is_validated() {
    let mut cmd = Command::cargo_bin("gfs-orders").unwrap();
    cmd.args(["materials", "--on-error", "sometimes"])
        .assert()
        .failure();
}

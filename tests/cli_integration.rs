//! Integration tests for the busnav binary.
//!
//! These run without a bus: everything that needs a connection must fail
//! gracefully and leave the process exit status at success.

use assert_cmd::Command;
use predicates::prelude::*;
use tempfile::TempDir;

/// Get a Command for the busnav binary with an isolated config file
fn busnav(dir: &TempDir) -> Command {
    let mut cmd = Command::cargo_bin("busnav").unwrap();
    cmd.arg("--config").arg(dir.path().join("config.toml"));
    cmd.env_remove("DBUS_SESSION_BUS_ADDRESS");
    cmd
}

#[test]
fn test_help_command() {
    let dir = TempDir::new().unwrap();
    busnav(&dir)
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("Interactive D-Bus object explorer"))
        .stdout(predicate::str::contains("--bus"))
        .stdout(predicate::str::contains("--command"))
        .stdout(predicate::str::contains("--service"));
}

#[test]
fn test_version_command() {
    let dir = TempDir::new().unwrap();
    busnav(&dir)
        .arg("--version")
        .assert()
        .success()
        .stdout(predicate::str::contains("busnav"));
}

#[test]
fn test_help_types() {
    let dir = TempDir::new().unwrap();
    busnav(&dir)
        .args(["-c", "help-types"])
        .assert()
        .success()
        .stdout(predicate::str::contains("uint32 u"))
        .stdout(predicate::str::contains("a{ss}"));
}

#[test]
fn test_pwd_starts_at_root() {
    let dir = TempDir::new().unwrap();
    busnav(&dir)
        .args(["-c", "pwd"])
        .assert()
        .success()
        .stdout("/\n");
}

#[test]
fn test_info_without_connection() {
    let dir = TempDir::new().unwrap();
    busnav(&dir)
        .args(["-c", "info"])
        .assert()
        .success()
        .stdout(predicate::str::contains("bus: not connected"))
        .stdout(predicate::str::contains("path: /"));
}

#[test]
fn test_ls_requires_connection() {
    let dir = TempDir::new().unwrap();
    busnav(&dir)
        .args(["-c", "ls"])
        .assert()
        .success()
        .stderr(predicate::str::contains("not connected"));
}

#[test]
fn test_failed_cd_keeps_path() {
    let dir = TempDir::new().unwrap();
    busnav(&dir)
        .args(["-c", "cd foo", "-c", "pwd"])
        .assert()
        .success()
        .stdout("/\n")
        .stderr(predicate::str::contains("error:"));
}

#[test]
fn test_unknown_command() {
    let dir = TempDir::new().unwrap();
    busnav(&dir)
        .args(["-c", "frobnicate"])
        .assert()
        .success()
        .stderr(predicate::str::contains("unknown command: frobnicate"));
}

#[test]
fn test_exit_stops_script() {
    let dir = TempDir::new().unwrap();
    busnav(&dir)
        .args(["-c", "exit", "-c", "pwd"])
        .assert()
        .success()
        .stdout("");
}

#[test]
fn test_default_config_written() {
    let dir = TempDir::new().unwrap();
    busnav(&dir).args(["-c", "pwd"]).assert().success();
    let contents = std::fs::read_to_string(dir.path().join("config.toml")).unwrap();
    assert!(contents.contains("invoker = \"gdbus\""));
}

#[test]
fn test_invalid_config_falls_back_to_defaults() {
    let dir = TempDir::new().unwrap();
    std::fs::write(dir.path().join("config.toml"), "[logging]\nlevel = \"loud\"\n").unwrap();
    busnav(&dir)
        .args(["-c", "pwd"])
        .assert()
        .success()
        .stdout("/\n")
        .stderr(predicate::str::contains("using defaults"));
}

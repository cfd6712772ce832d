use assert_cmd::Command;
use predicates::prelude::*;

#[test]
fn test_help_flag() {
    let mut cmd = Command::cargo_bin("nettop-notch").unwrap();
    cmd.arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("nettop"))
        .stdout(predicate::str::contains("--interval"))
        .stdout(predicate::str::contains("--threshold"))
        .stdout(predicate::str::contains("--no-ui"));
}

#[test]
fn test_version_flag() {
    let mut cmd = Command::cargo_bin("nettop-notch").unwrap();
    cmd.arg("--version")
        .assert()
        .success()
        .stdout(predicate::str::contains("nettop-notch"));
}

#[test]
fn test_invalid_argument() {
    let mut cmd = Command::cargo_bin("nettop-notch").unwrap();
    cmd.arg("--invalid-flag")
        .assert()
        .failure()
        .stderr(predicate::str::contains("error:"));
}

#[test]
fn test_interval_validation() {
    let mut cmd = Command::cargo_bin("nettop-notch").unwrap();
    cmd.args(["-i", "0.01", "--no-ui"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Interval too small"));

    let mut cmd = Command::cargo_bin("nettop-notch").unwrap();
    cmd.args(["-i", "7200", "--no-ui"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Interval too large"));
}

#[test]
fn test_interval_must_be_numeric() {
    let mut cmd = Command::cargo_bin("nettop-notch").unwrap();
    cmd.args(["-i", "fast"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("error:"));
}

#[test]
fn test_top_validation() {
    let mut cmd = Command::cargo_bin("nettop-notch").unwrap();
    cmd.args(["-t", "0", "--no-ui"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Error"));
}

#[test]
fn test_invalid_group() {
    let mut cmd = Command::cargo_bin("nettop-notch").unwrap();
    cmd.args(["-g", "host"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("invalid value"));
}

#[test]
fn test_invalid_background() {
    let mut cmd = Command::cargo_bin("nettop-notch").unwrap();
    cmd.args(["--bg", "white"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("invalid value"));
}

#[cfg(not(target_os = "macos"))]
#[test]
fn test_missing_nettop_reported() {
    let mut cmd = Command::cargo_bin("nettop-notch").unwrap();
    cmd.env("PATH", "")
        .arg("--no-ui")
        .assert()
        .failure()
        .stderr(predicate::str::contains("was not found in PATH"));
}

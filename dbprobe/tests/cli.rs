//! End-to-end CLI tests.
//!
//! None of these require a live database server: they exercise argument
//! validation, the credential precondition, and failure-path exit codes.

use assert_cmd::Command;
use predicates::prelude::*;

fn dbprobe() -> Command {
    let mut cmd = Command::cargo_bin("dbprobe").unwrap();
    // Keep ambient configuration out of the test environment.
    for var in [
        "DBPROBE_SERVER",
        "DBPROBE_DATABASE",
        "DBPROBE_USERNAME",
        "DBPROBE_PASSWORD",
        "DBPROBE_QUERY",
    ] {
        cmd.env_remove(var);
    }
    cmd
}

#[test]
fn help_lists_the_cli_surface() {
    dbprobe()
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("--server"))
        .stdout(predicate::str::contains("--integrated-auth"))
        .stdout(predicate::str::contains("--query"));
}

#[test]
fn missing_server_is_a_usage_error() {
    dbprobe().args(["--database", "master"]).assert().failure();
}

#[test]
fn empty_username_fails_before_any_connection_attempt() {
    dbprobe()
        .args([
            "--server", "localhost", "--database", "master", "--username", "", "--password", "x",
        ])
        .assert()
        .code(1)
        .stderr(predicate::str::contains("missing credentials"));
}

#[test]
fn username_without_password_is_rejected() {
    dbprobe()
        .args([
            "--server", "localhost", "--database", "master", "--username", "sa",
        ])
        .assert()
        .code(1)
        .stderr(predicate::str::contains("missing credentials"));
}

#[test]
fn empty_server_is_rejected() {
    dbprobe()
        .args(["--server", "", "--database", "master", "--integrated-auth"])
        .assert()
        .code(1)
        .stderr(predicate::str::contains("server"));
}

#[test]
fn unknown_db_type_is_rejected() {
    dbprobe()
        .args([
            "--server", "localhost", "--database", "master", "--db-type", "oracle",
        ])
        .assert()
        .code(1)
        .stderr(predicate::str::contains("unknown database type"));
}

#[test]
fn connection_failure_maps_to_exit_code_one() {
    dbprobe()
        .args([
            "--server",
            "127.0.0.1",
            "--port",
            "9",
            "--database",
            "master",
            "--integrated-auth",
            "--connect-timeout",
            "2",
        ])
        .assert()
        .code(1)
        .stderr(predicate::str::contains("connection failed"));
}

//! Focused CLI argument parsing tests.
//!
//! These never reach a policy file: clap rejects the arguments first, or the
//! command needs no configuration at all.

#![allow(deprecated)] // Command::cargo_bin is deprecated but replacement requires newer assert_cmd

use assert_cmd::Command;
use predicates::prelude::*;

fn warden() -> Command {
    let mut cmd = Command::cargo_bin("warden").unwrap();
    cmd.arg("--no-color");
    cmd
}

// ============================================================================
// Commands That Need No Configuration
// ============================================================================

#[test]
fn version_command_succeeds() {
    warden()
        .arg("version")
        .assert()
        .success()
        .stdout(predicate::str::contains("warden"));
}

#[test]
fn version_flag_shows_version() {
    Command::cargo_bin("warden")
        .unwrap()
        .arg("--version")
        .assert()
        .success()
        .stdout(predicate::str::contains("warden"));
}

#[test]
fn help_flag_shows_usage() {
    Command::cargo_bin("warden")
        .unwrap()
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("check"))
        .stdout(predicate::str::contains("coverage"))
        .stdout(predicate::str::contains("lint"));
}

// ============================================================================
// Argument Parsing Errors
// ============================================================================

#[test]
fn no_command_shows_help() {
    Command::cargo_bin("warden")
        .unwrap()
        .assert()
        .failure()
        .stderr(predicate::str::contains("Usage"));
}

#[test]
fn unknown_command_fails() {
    warden()
        .arg("grant")
        .assert()
        .failure()
        .stderr(predicate::str::contains("unrecognized subcommand"));
}

#[test]
fn check_requires_resource_and_action() {
    warden()
        .args(["check", "user:profile"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("required"));
}

#[test]
fn check_rejects_lowercase_status() {
    warden()
        .args(["check", "user:profile", "read", "--id", "u1", "--status", "active"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("--status"));
}

#[test]
fn check_requester_file_conflicts_with_inline_attributes() {
    warden()
        .args([
            "check",
            "user:profile",
            "read",
            "--requester",
            "alice.json",
            "--role",
            "admin",
        ])
        .assert()
        .failure()
        .stderr(predicate::str::contains("cannot be used with"));
}

#[test]
fn check_rejects_non_rfc3339_instant() {
    warden()
        .args(["check", "report:q3", "read", "--id", "u1", "--at", "noon"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("--at"));
}

#[test]
fn check_rejects_unknown_format() {
    warden()
        .args(["check", "user:profile", "read", "--id", "u1", "--format", "yaml"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("invalid value"));
}

#[test]
fn coverage_fail_under_must_be_a_number() {
    warden()
        .args(["coverage", "--fail-under", "most"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("--fail-under"));
}

#[test]
fn config_requires_subcommand() {
    warden()
        .arg("config")
        .assert()
        .failure()
        .stderr(predicate::str::contains("Usage"));
}

#[test]
fn config_show_rejects_unknown_format() {
    warden()
        .args(["config", "show", "--format", "xml"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("invalid value"));
}

// ============================================================================
// Help Text
// ============================================================================

#[test]
fn check_help_lists_requester_options() {
    warden()
        .args(["check", "--help"])
        .assert()
        .success()
        .stdout(predicate::str::contains("--role"))
        .stdout(predicate::str::contains("--department"))
        .stdout(predicate::str::contains("--abac-only"))
        .stdout(predicate::str::contains("--at"));
}

#[test]
fn lint_help_mentions_strict() {
    warden()
        .args(["lint", "--help"])
        .assert()
        .success()
        .stdout(predicate::str::contains("--strict"));
}

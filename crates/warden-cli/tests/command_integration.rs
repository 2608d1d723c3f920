//! Integration tests for CLI commands.
//!
//! Each test writes its fixtures into a temporary project directory and runs
//! the binary there, with `HOME` pointed inside it so no user config leaks in.

#![allow(deprecated)] // Command::cargo_bin is deprecated but replacement requires newer assert_cmd

use assert_cmd::Command;
use predicates::prelude::*;
use std::fs;
use std::path::Path;
use tempfile::TempDir;

const POLICIES: &str = r#"[
  {
    "id": 1, "name": "admins", "effect": "ALLOW",
    "subject": "role:admin", "resource": "*", "action": "*", "priority": 100
  },
  {
    "id": 2, "name": "no-deletes", "effect": "DENY",
    "subject": "*", "resource": "user:*", "action": "delete", "priority": 50
  },
  {
    "id": 3, "name": "profile-editors", "effect": "ALLOW",
    "subject": "role:user", "resource": "user:profile", "action": "read,update",
    "priority": 10
  },
  {
    "id": 4, "name": "finance-hours", "effect": "ALLOW",
    "subject": "department:finance", "resource": "report:*", "action": "read",
    "conditions": {"time": {"after": "09:00", "before": "17:00"}},
    "priority": 5
  }
]"#;

const ROLES: &str = r#"{
  "permissions": [
    {"resource": "user:profile", "action": "read"},
    {"resource": "user:account", "action": "delete"},
    {"resource": "ledger", "action": "export", "description": "Export the ledger"}
  ],
  "roles": [
    {"name": "viewer", "permissions": ["user:profile:read"]},
    {"name": "auditor", "permissions": ["ledger:export"]}
  ],
  "assignments": {"u9": ["auditor"]}
}"#;

fn project() -> TempDir {
    let temp = TempDir::new().unwrap();
    fs::write(temp.path().join("policies.json"), POLICIES).unwrap();
    fs::write(temp.path().join("roles.json"), ROLES).unwrap();
    temp
}

fn warden(dir: &Path) -> Command {
    let mut cmd = Command::cargo_bin("warden").unwrap();
    cmd.current_dir(dir)
        .env("HOME", dir)
        .env("XDG_CONFIG_HOME", dir.join(".config"))
        .env_remove("RUST_LOG")
        .arg("--no-color");
    cmd
}

// ============================================================================
// Check
// ============================================================================

#[test]
fn check_allows_admin_through_catch_all() {
    let temp = project();

    warden(temp.path())
        .args(["check", "user:account", "delete", "--id", "u1", "--role", "admin"])
        .assert()
        .success()
        .stdout(predicate::str::contains("ALLOWED"))
        .stdout(predicate::str::contains("admins"));
}

#[test]
fn check_deny_policy_outranks_lower_allow() {
    let temp = project();

    warden(temp.path())
        .args(["check", "user:profile", "delete", "--id", "u2", "--role", "user"])
        .assert()
        .code(1)
        .stdout(predicate::str::contains("DENIED"))
        .stdout(predicate::str::contains("no-deletes"));
}

#[test]
fn check_matches_action_list() {
    let temp = project();

    warden(temp.path())
        .args(["check", "user:profile", "update", "--username", "bob", "--role", "user"])
        .assert()
        .success()
        .stdout(predicate::str::contains("profile-editors"));
}

#[test]
fn check_falls_back_to_rbac_when_no_policy_matches() {
    let temp = project();

    warden(temp.path())
        .args(["check", "ledger", "export", "--id", "u9"])
        .assert()
        .success()
        .stdout(predicate::str::contains("RBAC fallback"));
}

#[test]
fn check_abac_only_makes_no_match_final() {
    let temp = project();

    warden(temp.path())
        .args(["check", "ledger", "export", "--id", "u9", "--abac-only"])
        .assert()
        .code(1)
        .stdout(predicate::str::contains("No ABAC policy covers"));
}

#[test]
fn check_abac_only_from_project_config() {
    let temp = project();
    fs::write(
        temp.path().join("warden.toml"),
        "[authorization]\nabac_only = true\n",
    )
    .unwrap();

    warden(temp.path())
        .args(["check", "ledger", "export", "--id", "u9"])
        .assert()
        .code(1);
}

#[test]
fn check_inactive_requester_still_reaches_rbac() {
    let temp = project();
    let args = [
        "check", "ledger", "export", "--id", "u9", "--role", "admin", "--status", "LOCKED",
    ];

    warden(temp.path())
        .args(args)
        .assert()
        .success()
        .stdout(predicate::str::contains("LOCKED"))
        .stdout(predicate::str::contains("RBAC fallback"));

    warden(temp.path())
        .args(args)
        .arg("--abac-only")
        .assert()
        .code(1)
        .stdout(predicate::str::contains("Reactivate the requester account"));
}

#[test]
fn check_time_condition_uses_evaluation_instant() {
    let temp = project();
    let args = ["check", "report:q3", "read", "--id", "u5", "--department", "finance"];

    warden(temp.path())
        .args(args)
        .args(["--at", "2026-10-15T12:00:00Z"])
        .assert()
        .success()
        .stdout(predicate::str::contains("finance-hours"));

    warden(temp.path())
        .args(args)
        .args(["--at", "2026-10-15T20:00:00Z"])
        .assert()
        .code(1);
}

#[test]
fn check_utc_offset_from_environment() {
    let temp = project();

    // 20:00 UTC is 15:00 at UTC-05:00, inside the 09:00-17:00 window.
    warden(temp.path())
        .env("WARDEN_AUTHORIZATION__CONDITION_UTC_OFFSET_MINUTES", "-300")
        .args([
            "check",
            "report:q3",
            "read",
            "--id",
            "u5",
            "--department",
            "finance",
            "--at",
            "2026-10-15T20:00:00Z",
        ])
        .assert()
        .success();
}

#[test]
fn check_reads_requester_file() {
    let temp = project();
    fs::write(
        temp.path().join("alice.json"),
        r#"{"id": "u3", "username": "alice", "roles": ["user"], "status": "ACTIVE"}"#,
    )
    .unwrap();

    warden(temp.path())
        .args(["check", "user:profile", "read", "--requester", "alice.json"])
        .assert()
        .success()
        .stdout(predicate::str::contains("alice"));
}

#[test]
fn check_json_output() {
    let temp = project();

    warden(temp.path())
        .args([
            "check", "user:profile", "read", "--id", "u1", "--role", "user", "--format", "json",
        ])
        .assert()
        .success()
        .stdout(predicate::str::contains(r#""allowed": true"#))
        .stdout(predicate::str::contains(r#""path": "abac""#))
        .stdout(predicate::str::contains(r#""profile-editors""#));
}

#[test]
fn check_requires_an_identity() {
    let temp = project();

    warden(temp.path())
        .args(["check", "user:profile", "read", "--role", "user"])
        .assert()
        .code(2)
        .stderr(predicate::str::contains("--id"));
}

#[test]
fn check_without_roles_file_still_evaluates_abac() {
    let temp = project();
    fs::remove_file(temp.path().join("roles.json")).unwrap();

    warden(temp.path())
        .args(["check", "user:profile", "read", "--id", "u1", "--role", "user"])
        .assert()
        .success();
}

#[test]
fn check_missing_policies_file_is_an_error() {
    let temp = TempDir::new().unwrap();

    warden(temp.path())
        .args(["check", "user:profile", "read", "--id", "u1"])
        .assert()
        .code(2)
        .stderr(predicate::str::contains("Failed to read policies"));
}

#[test]
fn check_uses_sources_from_project_config() {
    let temp = TempDir::new().unwrap();
    let fixtures = temp.path().join("fixtures");
    fs::create_dir(&fixtures).unwrap();
    fs::write(fixtures.join("p.json"), POLICIES).unwrap();
    fs::write(
        temp.path().join("warden.toml"),
        "[sources]\npolicies = \"fixtures/p.json\"\n",
    )
    .unwrap();
    let elsewhere = TempDir::new().unwrap();

    warden(elsewhere.path())
        .args(["--project", temp.path().to_str().unwrap()])
        .args(["check", "user:profile", "read", "--id", "u1", "--role", "admin"])
        .assert()
        .success();
}

// ============================================================================
// Coverage
// ============================================================================

#[test]
fn coverage_full_with_catch_all() {
    let temp = project();

    warden(temp.path())
        .args(["coverage", "--fail-under", "100"])
        .assert()
        .success()
        .stdout(predicate::str::contains("100.0%"));
}

#[test]
fn coverage_reports_missing_permissions() {
    let temp = project();
    fs::write(temp.path().join("empty.json"), "[]").unwrap();

    warden(temp.path())
        .args(["coverage", "--policies", "empty.json"])
        .assert()
        .success()
        .stdout(predicate::str::contains("0.0%"))
        .stdout(predicate::str::contains("ledger:export"))
        .stdout(predicate::str::contains("Export the ledger"));
}

#[test]
fn coverage_fail_under_threshold() {
    let temp = project();
    fs::write(temp.path().join("empty.json"), "[]").unwrap();

    warden(temp.path())
        .args(["coverage", "--policies", "empty.json", "--fail-under", "50"])
        .assert()
        .code(1);
}

#[test]
fn coverage_json_output() {
    let temp = project();
    fs::write(
        temp.path().join("partial.json"),
        r#"[{"id": 1, "name": "profiles", "effect": "ALLOW",
             "subject": "role:viewer", "resource": "user:*", "action": "read"}]"#,
    )
    .unwrap();

    warden(temp.path())
        .args(["coverage", "--policies", "partial.json", "--format", "json"])
        .assert()
        .success()
        .stdout(predicate::str::contains(r#""rbac_count": 3"#))
        .stdout(predicate::str::contains(r#""coverage_percent": 33.3"#))
        .stdout(predicate::str::contains(r#""role": "viewer""#));
}

#[test]
fn coverage_requires_roles_file() {
    let temp = project();
    fs::remove_file(temp.path().join("roles.json")).unwrap();

    warden(temp.path())
        .arg("coverage")
        .assert()
        .code(2)
        .stderr(predicate::str::contains("role catalog"));
}

// ============================================================================
// Lint
// ============================================================================

#[test]
fn lint_clean_policies() {
    let temp = project();

    warden(temp.path())
        .args(["lint", "--strict"])
        .assert()
        .success()
        .stdout(predicate::str::contains("No findings"))
        .stdout(predicate::str::contains("finance-hours"));
}

#[test]
fn lint_reports_findings() {
    let temp = project();
    fs::write(
        temp.path().join("messy.json"),
        r#"[
          {"id": 1, "name": "everything", "effect": "ALLOW",
           "subject": "*", "resource": "*", "action": "*", "priority": 10},
          {"id": 2, "name": "teams", "effect": "DENY",
           "subject": "team:ops", "resource": "user:*", "action": "delete"}
        ]"#,
    )
    .unwrap();

    warden(temp.path())
        .args(["lint", "--policies", "messy.json"])
        .assert()
        .success()
        .stdout(predicate::str::contains("team"))
        .stdout(predicate::str::contains("everything"));

    warden(temp.path())
        .args(["lint", "--policies", "messy.json", "--strict"])
        .assert()
        .code(1);

    warden(temp.path())
        .args(["lint", "--policies", "messy.json", "--format", "json"])
        .assert()
        .success()
        .stdout(predicate::str::contains(r#""kind": "unknown_subject_type""#))
        .stdout(predicate::str::contains(r#""kind": "unreachable""#));
}

// ============================================================================
// Config Commands
// ============================================================================

#[test]
fn config_show_defaults() {
    let temp = TempDir::new().unwrap();

    warden(temp.path())
        .args(["config", "show"])
        .assert()
        .success()
        .stdout(predicate::str::contains("authorization.policy_cache_ttl_secs"))
        .stdout(predicate::str::contains("No warden.toml"));
}

#[test]
fn config_show_formats() {
    let temp = TempDir::new().unwrap();
    fs::write(
        temp.path().join("warden.toml"),
        "[authorization]\nabac_only = true\npolicy_cache_ttl_secs = 15\n",
    )
    .unwrap();

    warden(temp.path())
        .args(["config", "show", "--format", "json"])
        .assert()
        .success()
        .stdout(predicate::str::contains(r#""abac_only": true"#))
        .stdout(predicate::str::contains(r#""policy_cache_ttl_secs": 15"#));

    warden(temp.path())
        .args(["config", "show", "--format", "toml"])
        .assert()
        .success()
        .stdout(predicate::str::contains("[authorization]"))
        .stdout(predicate::str::contains("abac_only = true"));
}

#[test]
fn config_show_honors_environment() {
    let temp = TempDir::new().unwrap();

    warden(temp.path())
        .env("WARDEN_LOGGING__LEVEL", "debug")
        .args(["config", "show", "--format", "json"])
        .assert()
        .success()
        .stdout(predicate::str::contains(r#""level": "debug""#));
}

#[test]
fn config_validate() {
    let temp = TempDir::new().unwrap();

    warden(temp.path())
        .args(["config", "validate"])
        .assert()
        .code(2)
        .stderr(predicate::str::contains("No warden.toml"));

    fs::write(
        temp.path().join("warden.toml"),
        "[authorization]\ncondition_utc_offset_minutes = 60\n",
    )
    .unwrap();

    warden(temp.path())
        .args(["config", "validate"])
        .assert()
        .success()
        .stdout(predicate::str::contains("is valid"));
}

#[test]
fn invalid_config_fails_every_command() {
    let temp = project();
    fs::write(
        temp.path().join("warden.toml"),
        "[authorization]\npolicy_cache_ttl_secs = 0\n",
    )
    .unwrap();

    warden(temp.path())
        .args(["check", "user:profile", "read", "--id", "u1"])
        .assert()
        .code(2)
        .stderr(predicate::str::contains("policy_cache_ttl_secs"));
}

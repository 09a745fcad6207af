//! Integration tests for the `wifimon` CLI binary.
//!
//! Argument parsing, help output, completions, config handling and the
//! errors raised before any request is made. No backend needed.
#![allow(clippy::unwrap_used)]

use std::path::Path;

use assert_cmd::cargo::cargo_bin_cmd;
use predicates::prelude::*;

// ── Helpers ─────────────────────────────────────────────────────────

/// A `wifimon` command whose config and data directories live under `home`.
fn wifimon_cmd(home: &Path) -> assert_cmd::Command {
    let mut cmd = cargo_bin_cmd!("wifimon");
    cmd.env("HOME", home)
        .env("XDG_CONFIG_HOME", home.join("config"))
        .env("XDG_DATA_HOME", home.join("data"))
        .env_remove("WIFIMON_PROFILE")
        .env_remove("WIFIMON_API_URL")
        .env_remove("WIFIMON_OUTPUT")
        .env_remove("WIFIMON_TIMEOUT")
        .env_remove("RUST_LOG");
    cmd
}

/// Pretend `wifimon login` already ran for the default profile.
fn store_token(home: &Path) {
    let dir = home.join("data").join("wifimon").join("default");
    std::fs::create_dir_all(&dir).unwrap();
    std::fs::write(dir.join("access_token"), "stored-jwt").unwrap();
}

fn combined_output(output: &std::process::Output) -> String {
    let stdout = String::from_utf8_lossy(&output.stdout);
    let stderr = String::from_utf8_lossy(&output.stderr);
    format!("{stdout}{stderr}")
}

// ── Basic invocation ────────────────────────────────────────────────

#[test]
fn test_no_args_shows_help() {
    let home = tempfile::tempdir().unwrap();
    let output = wifimon_cmd(home.path()).output().unwrap();
    assert_eq!(output.status.code(), Some(2));
    assert!(combined_output(&output).contains("Usage"));
}

#[test]
fn test_help_flag() {
    let home = tempfile::tempdir().unwrap();
    wifimon_cmd(home.path())
        .arg("--help")
        .assert()
        .success()
        .stdout(
            predicate::str::contains("devices")
                .and(predicate::str::contains("agents"))
                .and(predicate::str::contains("alerts"))
                .and(predicate::str::contains("login")),
        );
}

#[test]
fn test_version_flag() {
    let home = tempfile::tempdir().unwrap();
    wifimon_cmd(home.path())
        .arg("--version")
        .assert()
        .success()
        .stdout(predicate::str::contains("wifimon"));
}

#[test]
fn test_devices_help_lists_subcommands() {
    let home = tempfile::tempdir().unwrap();
    wifimon_cmd(home.path())
        .args(["devices", "--help"])
        .assert()
        .success()
        .stdout(
            predicate::str::contains("set-cap")
                .and(predicate::str::contains("stats"))
                .and(predicate::str::contains("usage")),
        );
}

// ── Shell completions ───────────────────────────────────────────────

#[test]
fn test_completions_bash() {
    let home = tempfile::tempdir().unwrap();
    wifimon_cmd(home.path())
        .args(["completions", "bash"])
        .assert()
        .success()
        .stdout(predicate::str::is_empty().not());
}

#[test]
fn test_completions_zsh() {
    let home = tempfile::tempdir().unwrap();
    wifimon_cmd(home.path())
        .args(["completions", "zsh"])
        .assert()
        .success()
        .stdout(predicate::str::contains("#compdef"));
}

// ── Error cases ─────────────────────────────────────────────────────

#[test]
fn test_invalid_subcommand() {
    let home = tempfile::tempdir().unwrap();
    let output = wifimon_cmd(home.path()).arg("foobar").output().unwrap();
    assert!(!output.status.success());
    assert!(combined_output(&output).contains("foobar"));
}

#[test]
fn test_invalid_output_format() {
    let home = tempfile::tempdir().unwrap();
    let output = wifimon_cmd(home.path())
        .args(["--output", "xml", "devices", "list"])
        .output()
        .unwrap();
    assert_eq!(output.status.code(), Some(2));
}

#[test]
fn test_devices_list_without_login() {
    let home = tempfile::tempdir().unwrap();
    wifimon_cmd(home.path())
        .args(["devices", "list"])
        .assert()
        .code(3)
        .stderr(predicate::str::contains("wifimon login"));
}

#[test]
fn test_invalid_cap_fails_before_any_request() {
    let home = tempfile::tempdir().unwrap();
    store_token(home.path());
    // Port 9 (discard) is never listening; reaching the network would exit 7.
    wifimon_cmd(home.path())
        .args(["--api-url", "http://127.0.0.1:9/api/v1", "devices", "set-cap", "4", "-5"])
        .assert()
        .code(2)
        .stderr(predicate::str::contains("negative"));
}

#[test]
fn test_alert_threshold_must_be_positive_integer() {
    let home = tempfile::tempdir().unwrap();
    store_token(home.path());
    wifimon_cmd(home.path())
        .args([
            "--api-url",
            "http://127.0.0.1:9/api/v1",
            "alerts",
            "create",
            "--title",
            "Quota",
            "--threshold",
            "0",
        ])
        .assert()
        .code(2);
}

#[test]
fn test_short_alert_title_fails_before_any_request() {
    let home = tempfile::tempdir().unwrap();
    store_token(home.path());
    wifimon_cmd(home.path())
        .args([
            "--api-url",
            "http://127.0.0.1:9/api/v1",
            "alerts",
            "create",
            "--title",
            "ab",
            "--threshold",
            "5",
        ])
        .assert()
        .code(2)
        .stderr(predicate::str::contains("at least 3 characters"));
}

#[test]
fn test_delete_requires_yes_without_terminal() {
    let home = tempfile::tempdir().unwrap();
    store_token(home.path());
    wifimon_cmd(home.path())
        .args(["--api-url", "http://127.0.0.1:9/api/v1", "devices", "delete", "4"])
        .assert()
        .code(2)
        .stderr(predicate::str::contains("--yes"));
}

#[test]
fn test_unreachable_backend_exits_with_connection_code() {
    let home = tempfile::tempdir().unwrap();
    wifimon_cmd(home.path())
        .args(["--api-url", "http://127.0.0.1:9/api/v1", "--timeout", "2", "health"])
        .assert()
        .code(predicate::in_iter([7, 8]));
}

#[test]
fn test_logout_without_token_is_noop() {
    let home = tempfile::tempdir().unwrap();
    wifimon_cmd(home.path())
        .arg("logout")
        .assert()
        .success()
        .stderr(predicate::str::contains("nothing to do"));
}

#[test]
fn test_logout_removes_stored_token() {
    let home = tempfile::tempdir().unwrap();
    store_token(home.path());
    wifimon_cmd(home.path()).arg("logout").assert().success();
    assert!(
        !home
            .path()
            .join("data/wifimon/default/access_token")
            .exists()
    );
}

// ── Config ──────────────────────────────────────────────────────────

#[test]
fn test_config_path_uses_xdg() {
    let home = tempfile::tempdir().unwrap();
    wifimon_cmd(home.path())
        .args(["config", "path"])
        .assert()
        .success()
        .stdout(predicate::str::contains("wifimon/config.toml"));
}

#[test]
fn test_config_set_then_show() {
    let home = tempfile::tempdir().unwrap();
    wifimon_cmd(home.path())
        .args(["config", "set", "api_url", "http://10.1.1.1:5000/api/v1"])
        .assert()
        .success();
    wifimon_cmd(home.path())
        .args(["config", "set", "stats-hours", "6"])
        .assert()
        .success();

    let output = wifimon_cmd(home.path())
        .args(["-o", "json", "config", "show"])
        .output()
        .unwrap();
    assert!(output.status.success());
    let json: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(
        json["profiles"]["default"]["api_url"],
        "http://10.1.1.1:5000/api/v1"
    );
    assert_eq!(json["profiles"]["default"]["stats_hours"], 6);
}

#[test]
fn test_config_set_unknown_key() {
    let home = tempfile::tempdir().unwrap();
    wifimon_cmd(home.path())
        .args(["config", "set", "colour", "red"])
        .assert()
        .code(2)
        .stderr(predicate::str::contains("Valid keys"));
}

#[test]
fn test_config_use_unknown_profile() {
    let home = tempfile::tempdir().unwrap();
    wifimon_cmd(home.path())
        .args(["config", "use", "lab"])
        .assert()
        .code(2)
        .stderr(predicate::str::contains("lab"));
}

#[test]
fn test_unknown_profile_flag() {
    let home = tempfile::tempdir().unwrap();
    wifimon_cmd(home.path())
        .args(["--profile", "lab", "devices", "list"])
        .assert()
        .code(2)
        .stderr(predicate::str::contains("config init"));
}

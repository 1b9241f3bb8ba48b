//! Integration tests for the shop CLI
//!
//! These tests exercise the CLI end-to-end using assert_cmd. Nothing here
//! needs a running API: commands either stay local or fail before or at the
//! first request.

use assert_cmd::Command;
use predicates::prelude::*;
use std::fs;
use tempfile::TempDir;

/// Address that refuses connections
const DEAD_API: &str = "http://127.0.0.1:9";

/// Helper to get a shop command isolated to `config_dir`
fn shop(config_dir: &TempDir) -> Command {
    let mut cmd = Command::cargo_bin("shop").unwrap();
    cmd.env("SHOP_CONFIG_DIR", config_dir.path())
        .env_remove("SHOP_API_URL")
        .env_remove("SHOP_TOKEN")
        .env_remove("SHOP_MECHANIC_ID")
        .env_remove("SHOP_AUTHOR")
        .env_remove("SHOP_LOG");
    cmd
}

// ============================================================================
// CLI Basic Tests
// ============================================================================

#[test]
fn test_help_displays() {
    let tmp = TempDir::new().unwrap();
    shop(&tmp)
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("wo"))
        .stdout(predicate::str::contains("board"))
        .stdout(predicate::str::contains("open"));
}

#[test]
fn test_wo_help_lists_lifecycle_actions() {
    let tmp = TempDir::new().unwrap();
    shop(&tmp)
        .args(["wo", "--help"])
        .assert()
        .success()
        .stdout(predicate::str::contains("assign"))
        .stdout(predicate::str::contains("start"))
        .stdout(predicate::str::contains("pause"))
        .stdout(predicate::str::contains("resume"))
        .stdout(predicate::str::contains("complete"));
}

// ============================================================================
// Routing Tests
// ============================================================================

#[test]
fn test_open_home_lists_dashboards() {
    let tmp = TempDir::new().unwrap();
    shop(&tmp)
        .args(["open", "/"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Choose a dashboard:"))
        .stdout(predicate::str::contains("/owner"))
        .stdout(predicate::str::contains("/dispatch"))
        .stdout(predicate::str::contains("/mechanic"));
}

#[test]
fn test_open_owner_shows_placeholder_cards() {
    let tmp = TempDir::new().unwrap();
    shop(&tmp)
        .args(["open", "/owner/"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Owner Dashboard"))
        .stdout(predicate::str::contains("Jobs in progress (soon)"))
        .stdout(predicate::str::contains("/owner/units"));
}

#[test]
fn test_open_role_dashboards() {
    let tmp = TempDir::new().unwrap();
    shop(&tmp)
        .args(["open", "--role", "dispatcher"])
        .assert()
        .success()
        .stdout(predicate::str::contains("(coming soon)."));
    shop(&tmp)
        .args(["open", "/mechanic"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Clock in/out, my jobs, parts locations (coming soon)."));
}

#[test]
fn test_open_unknown_path_fails() {
    let tmp = TempDir::new().unwrap();
    shop(&tmp)
        .args(["open", "/garage"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("No page at '/garage'"));
}

// ============================================================================
// API Configuration Tests
// ============================================================================

#[test]
fn test_missing_api_url_is_reported() {
    let tmp = TempDir::new().unwrap();
    shop(&tmp)
        .args(["units", "list"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("No API URL configured"));
}

#[test]
fn test_unreachable_api_fails_list() {
    let tmp = TempDir::new().unwrap();
    shop(&tmp)
        .args(["--api-url", DEAD_API, "units", "list"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Failed to load units"));
}

#[test]
fn test_invalid_api_url_rejected() {
    let tmp = TempDir::new().unwrap();
    shop(&tmp)
        .args(["config", "set", "api_url", "not a url"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Invalid API URL"));
}

// ============================================================================
// Work Order Form Tests
// ============================================================================

#[test]
fn test_wo_new_requires_title_before_network() {
    let tmp = TempDir::new().unwrap();
    shop(&tmp)
        .args([
            "--api-url",
            DEAD_API,
            "wo",
            "new",
            "--unit",
            "7",
            "--title",
            "  ",
            "--complaint",
            "Grinding noise",
        ])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Title is required"));
}

#[test]
fn test_wo_new_requires_unit() {
    let tmp = TempDir::new().unwrap();
    shop(&tmp)
        .args(["wo", "new", "--title", "Brakes", "--complaint", "Grinding"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Choose a unit"));
}

#[test]
fn test_wo_new_rejects_bad_bay() {
    let tmp = TempDir::new().unwrap();
    shop(&tmp)
        .args([
            "wo", "new", "--unit", "7", "--title", "Brakes", "--complaint", "Grinding", "--bay", "Z",
        ])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Invalid bay"));
}

#[test]
fn test_units_new_requires_number_without_terminal() {
    let tmp = TempDir::new().unwrap();
    shop(&tmp)
        .args(["--api-url", DEAD_API, "units", "new", "--type", "truck"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Unit number is required"));
}

#[test]
fn test_wo_attach_rejects_zero_qty() {
    let tmp = TempDir::new().unwrap();
    shop(&tmp)
        .args(["wo", "attach", "1", "--part", "9", "--qty", "0"])
        .assert()
        .failure();
}

// ============================================================================
// Session Tests
// ============================================================================

#[test]
fn test_login_whoami_logout() {
    let tmp = TempDir::new().unwrap();

    shop(&tmp)
        .args(["whoami"])
        .assert()
        .success()
        .stdout(predicate::str::contains("token"))
        .stdout(predicate::str::contains("none"));

    shop(&tmp)
        .args(["login", "secret-token"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Token saved"));

    let session = fs::read_to_string(tmp.path().join("session.yaml")).unwrap();
    assert!(session.contains("secret-token"));

    shop(&tmp)
        .args(["whoami"])
        .assert()
        .success()
        .stdout(predicate::str::contains("present"));

    shop(&tmp)
        .args(["logout"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Logged out"));
    assert!(!tmp.path().join("session.yaml").exists());
}

#[test]
fn test_login_rejects_blank_token() {
    let tmp = TempDir::new().unwrap();
    shop(&tmp)
        .args(["login", "   "])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Token must not be empty"));
}

// ============================================================================
// Config Tests
// ============================================================================

#[test]
fn test_config_set_and_show() {
    let tmp = TempDir::new().unwrap();

    shop(&tmp)
        .args(["config", "set", "api_url", "http://localhost:8000/api/"])
        .assert()
        .success();
    shop(&tmp)
        .args(["config", "set", "mechanic_id", "3"])
        .assert()
        .success();

    shop(&tmp)
        .args(["config", "show", "api_url"])
        .assert()
        .success()
        .stdout(predicate::str::contains("http://localhost:8000/api"));
    shop(&tmp)
        .args(["config", "show", "mechanic_id"])
        .assert()
        .success()
        .stdout(predicate::str::contains("3"));

    let content = fs::read_to_string(tmp.path().join("config.yaml")).unwrap();
    assert!(content.contains("mechanic_id: 3"));
}

#[test]
fn test_config_unset() {
    let tmp = TempDir::new().unwrap();
    shop(&tmp)
        .args(["config", "set", "author", "Dana"])
        .assert()
        .success();
    shop(&tmp)
        .args(["config", "unset", "author"])
        .assert()
        .success();
    shop(&tmp)
        .args(["config", "show", "author"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("not set"));
}

#[test]
fn test_config_rejects_unknown_key() {
    let tmp = TempDir::new().unwrap();
    shop(&tmp)
        .args(["config", "set", "editor", "vim"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Unknown config key"));
}

#[test]
fn test_config_keys_and_path() {
    let tmp = TempDir::new().unwrap();
    shop(&tmp)
        .args(["config", "keys"])
        .assert()
        .success()
        .stdout(predicate::str::contains("api_url"))
        .stdout(predicate::str::contains("mechanic_id"));
    shop(&tmp)
        .args(["config", "path"])
        .assert()
        .success()
        .stdout(predicate::str::contains("config.yaml"));
}

// ============================================================================
// Completions
// ============================================================================

#[test]
fn test_completions_bash() {
    let tmp = TempDir::new().unwrap();
    shop(&tmp)
        .args(["completions", "bash"])
        .assert()
        .success()
        .stdout(predicate::str::contains("shop"));
}

//! Integration tests for the vault-ami-test CLI surface
//!
//! These tests spawn the binary but never reach AWS: they cover argument
//! parsing, configuration loading and region resolution.

#![allow(clippy::expect_used)]

use std::path::Path;

use assert_cmd::Command;
use predicates::prelude::*;
use vault_ami_test::domain::STABLE_REGIONS;

/// Binary with colors off and an isolated, absent config file.
fn harness(config_dir: &Path) -> Command {
    let mut cmd = Command::new(assert_cmd::cargo::cargo_bin!("vault-ami-test"));
    cmd.env("NO_COLOR", "1")
        .env_remove("VAULT_AMI_TEST_CONFIG")
        .env_remove("AWS_REGION")
        .env_remove("RUST_LOG")
        .arg("--config")
        .arg(config_dir.join("config.yaml"));
    cmd
}

fn write_config(dir: &Path, yaml: &str) {
    std::fs::write(dir.join("config.yaml"), yaml).expect("write config");
}

// --- Help and version tests ---

#[test]
fn test_cli_no_args_shows_help_and_exits_two() {
    let mut cmd = Command::new(assert_cmd::cargo::cargo_bin!("vault-ami-test"));
    cmd.assert().code(2).stderr(predicate::str::contains(
        "End-to-end validation of the Vault machine image",
    ));
}

#[test]
fn test_cli_help_lists_commands() {
    let dir = tempfile::tempdir().expect("tempdir");
    harness(dir.path())
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("run"))
        .stdout(predicate::str::contains("config"))
        .stdout(predicate::str::contains("regions"));
}

#[test]
fn test_cli_version_flag_shows_version() {
    let dir = tempfile::tempdir().expect("tempdir");
    harness(dir.path())
        .arg("--version")
        .assert()
        .success()
        .stdout(predicate::str::contains("vault-ami-test 0.1.0"));
}

#[test]
fn test_run_help_documents_region_env() {
    let dir = tempfile::tempdir().expect("tempdir");
    harness(dir.path())
        .args(["run", "--help"])
        .assert()
        .success()
        .stdout(predicate::str::contains("--region"))
        .stdout(predicate::str::contains("AWS_REGION"));
}

#[test]
fn test_no_color_env_accepts_conventional_values() {
    for value in ["1", "true", "yes"] {
        let dir = tempfile::tempdir().expect("tempdir");
        harness(dir.path())
            .env("NO_COLOR", value)
            .arg("regions")
            .assert()
            .success()
            .stdout(predicate::str::contains("us-east-1"));
    }
}

#[test]
fn test_no_color_flag_accepted() {
    let dir = tempfile::tempdir().expect("tempdir");
    harness(dir.path())
        .env_remove("NO_COLOR")
        .args(["--no-color", "regions"])
        .assert()
        .success();
}

#[test]
fn test_unknown_command_fails() {
    let dir = tempfile::tempdir().expect("tempdir");
    harness(dir.path()).arg("destroy-everything").assert().code(2);
}

// --- Config command ---

#[test]
fn test_config_path_prints_explicit_path() {
    let dir = tempfile::tempdir().expect("tempdir");
    harness(dir.path())
        .args(["config", "path"])
        .assert()
        .success()
        .stdout(predicate::str::contains("config.yaml"));
}

#[test]
fn test_config_path_honours_env_var() {
    let dir = tempfile::tempdir().expect("tempdir");
    let path = dir.path().join("from-env.yaml");
    let mut cmd = Command::new(assert_cmd::cargo::cargo_bin!("vault-ami-test"));
    cmd.env("VAULT_AMI_TEST_CONFIG", &path)
        .args(["config", "path"])
        .assert()
        .success()
        .stdout(predicate::str::contains("from-env.yaml"));
}

#[test]
fn test_config_show_without_file_prints_defaults() {
    let dir = tempfile::tempdir().expect("tempdir");
    harness(dir.path())
        .args(["config", "show"])
        .assert()
        .success()
        .stdout(predicate::str::contains("settle_secs: 30"))
        .stdout(predicate::str::contains("max_attempts: 5"))
        .stdout(predicate::str::contains("prefix: terratest"));
}

#[test]
fn test_config_show_merges_file_over_defaults() {
    let dir = tempfile::tempdir().expect("tempdir");
    write_config(dir.path(), "ssh:\n  settle_secs: 45\n");
    harness(dir.path())
        .args(["config", "show"])
        .assert()
        .success()
        .stdout(predicate::str::contains("settle_secs: 45"))
        .stdout(predicate::str::contains("retry_delay_secs: 5"));
}

#[test]
fn test_config_show_json_is_valid() {
    let dir = tempfile::tempdir().expect("tempdir");
    let output = harness(dir.path())
        .args(["--json", "config", "show"])
        .output()
        .expect("run");
    assert!(output.status.success());
    let value: serde_json::Value = serde_json::from_slice(&output.stdout).expect("json");
    assert_eq!(value["config"]["ssh"]["max_attempts"], 5);
    assert_eq!(value["config"]["terraform"]["host_output"], "vault_public_ip");
}

#[test]
fn test_invalid_config_fails_with_key_name() {
    let dir = tempfile::tempdir().expect("tempdir");
    write_config(dir.path(), "ssh:\n  max_attempts: 0\n");
    harness(dir.path())
        .args(["config", "show"])
        .assert()
        .code(1)
        .stderr(predicate::str::contains("Error:"))
        .stderr(predicate::str::contains("ssh.max_attempts"));
}

#[test]
fn test_invalid_config_json_error_object() {
    let dir = tempfile::tempdir().expect("tempdir");
    write_config(dir.path(), "regions:\n  allowed: [mars-north-1]\n");
    let output = harness(dir.path())
        .args(["--json", "regions"])
        .output()
        .expect("run");
    assert_eq!(output.status.code(), Some(1));
    let value: serde_json::Value = serde_json::from_slice(&output.stderr).expect("json");
    assert_eq!(value["error"], true);
    assert_eq!(value["code"], "invalid_config");
}

// --- Regions command ---

#[test]
fn test_regions_lists_stable_pool() {
    let dir = tempfile::tempdir().expect("tempdir");
    let output = harness(dir.path()).arg("regions").output().expect("run");
    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    let listed: Vec<&str> = stdout.lines().collect();
    assert_eq!(listed, STABLE_REGIONS);
}

#[test]
fn test_regions_respects_forbidden_list() {
    let dir = tempfile::tempdir().expect("tempdir");
    write_config(dir.path(), "regions:\n  forbidden: [us-east-1, sa-east-1]\n");
    harness(dir.path())
        .arg("regions")
        .assert()
        .success()
        .stdout(predicate::str::contains("us-east-2"))
        .stdout(predicate::str::contains("us-east-1\n").not())
        .stdout(predicate::str::contains("sa-east-1").not());
}

#[test]
fn test_resolve_uses_aws_region_verbatim() {
    let dir = tempfile::tempdir().expect("tempdir");
    harness(dir.path())
        .env("AWS_REGION", "eu-north-1")
        .args(["regions", "--resolve"])
        .assert()
        .success()
        .stdout("eu-north-1\n");
}

#[test]
fn test_resolve_without_aws_region_picks_from_pool() {
    let dir = tempfile::tempdir().expect("tempdir");
    let output = harness(dir.path())
        .args(["regions", "--resolve"])
        .output()
        .expect("run");
    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("Random AWS region selected"), "{stdout}");
    let chosen = stdout.lines().last().expect("a region line");
    assert!(STABLE_REGIONS.contains(&chosen), "{chosen}");
}

#[test]
fn test_resolve_json_marks_random_choice() {
    let dir = tempfile::tempdir().expect("tempdir");
    write_config(dir.path(), "regions:\n  allowed: [ap-south-1]\n");
    let output = harness(dir.path())
        .args(["--json", "regions", "--resolve"])
        .output()
        .expect("run");
    assert!(output.status.success());
    let value: serde_json::Value = serde_json::from_slice(&output.stdout).expect("json");
    assert_eq!(value["region"], "ap-south-1");
    assert_eq!(value["random"], true);
}

// --- Run command ---

#[cfg(unix)]
#[test]
fn test_run_stops_before_creating_anything_when_tools_are_missing() {
    let dir = tempfile::tempdir().expect("tempdir");
    harness(dir.path())
        .env("PATH", dir.path())
        .env("AWS_REGION", "us-east-1")
        .arg("run")
        .assert()
        .code(1)
        .stderr(predicate::str::contains("packer is not available"));
}

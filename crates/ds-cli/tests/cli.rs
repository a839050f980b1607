//! Integration tests for the `ds` binary.
//!
//! These never reach the network: every run either stops at argument
//! parsing or at credential checks.

use std::path::Path;
use std::process::{Command, Output};

use tempfile::TempDir;

const CREDENTIAL_VARS: [&str; 6] = [
    "GITHUB_TOKEN",
    "LINEAR_API_KEY",
    "ANTHROPIC_API_KEY",
    "DS_GITHUB_TOKEN",
    "DS_LINEAR_API_KEY",
    "DS_ANTHROPIC_API_KEY",
];

fn ds_binary() -> String {
    env!("CARGO_BIN_EXE_ds").to_string()
}

/// Runs `ds` with an isolated home directory and no credentials in the
/// environment.
fn run_isolated(home: &Path, args: &[&str]) -> Output {
    let mut command = Command::new(ds_binary());
    command
        .env("HOME", home)
        .env_remove("XDG_CONFIG_HOME")
        .env_remove("XDG_DATA_HOME")
        .env_remove("DS_OUTPUT_DIR")
        .env_remove("RUST_LOG")
        .args(args);
    for var in CREDENTIAL_VARS {
        command.env_remove(var);
    }
    command.output().expect("failed to run ds")
}

#[test]
fn test_no_subcommand_prints_help() {
    let temp = TempDir::new().unwrap();
    let output = run_isolated(temp.path(), &[]);

    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("generate"), "help should list generate: {stdout}");
}

#[test]
fn test_generate_help_lists_flags() {
    let temp = TempDir::new().unwrap();
    let output = run_isolated(temp.path(), &["generate", "--help"]);

    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    for flag in ["--date", "--yesterday", "--skip-llm", "--print"] {
        assert!(stdout.contains(flag), "missing {flag} in: {stdout}");
    }
}

#[test]
fn test_generate_without_github_token_fails() {
    let temp = TempDir::new().unwrap();
    let output = run_isolated(temp.path(), &["generate", "--skip-llm"]);

    assert!(!output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(
        stderr.contains("missing GitHub token"),
        "unexpected stderr: {stderr}"
    );
    assert!(
        !temp.path().join(".local/share/ds/output").exists(),
        "nothing should be written on failure"
    );
}

#[test]
fn test_config_file_supplies_credentials() {
    let temp = TempDir::new().unwrap();
    let config_path = temp.path().join("ds.toml");
    std::fs::write(&config_path, "github_token = \"ghp_from_file\"\n").unwrap();

    let output = run_isolated(
        temp.path(),
        &[
            "--config",
            config_path.to_str().unwrap(),
            "generate",
            "--skip-llm",
        ],
    );

    assert!(!output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(
        stderr.contains("missing Linear API key"),
        "GitHub token should come from the file: {stderr}"
    );
}

#[test]
fn test_anthropic_key_required_unless_skipping_llm() {
    let temp = TempDir::new().unwrap();
    let output = Command::new(ds_binary())
        .env("HOME", temp.path())
        .env_remove("XDG_CONFIG_HOME")
        .env_remove("ANTHROPIC_API_KEY")
        .env_remove("DS_ANTHROPIC_API_KEY")
        .env("GITHUB_TOKEN", "ghp_placeholder")
        .env("LINEAR_API_KEY", "lin_api_placeholder")
        .args(["generate", "--date", "2025-03-14"])
        .output()
        .expect("failed to run ds");

    assert!(!output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(
        stderr.contains("missing Anthropic API key"),
        "unexpected stderr: {stderr}"
    );
}

#[test]
fn test_date_and_yesterday_are_exclusive() {
    let temp = TempDir::new().unwrap();
    let output = run_isolated(
        temp.path(),
        &["generate", "--date", "2025-03-14", "--yesterday"],
    );

    assert!(!output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("cannot be used with"), "unexpected stderr: {stderr}");
}

#[test]
fn test_malformed_date_is_rejected() {
    let temp = TempDir::new().unwrap();
    let output = run_isolated(temp.path(), &["generate", "--date", "yesterday"]);

    assert!(!output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("--date"), "unexpected stderr: {stderr}");
}

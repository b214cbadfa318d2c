//! Integration tests for CLI functionality

#![allow(clippy::all, clippy::unwrap_used, clippy::expect_used)]

use helmrepo::TomlRepositoryManager;
use std::process::Command;
use tempfile::TempDir;

fn binary() -> Command {
    Command::new(env!("CARGO_BIN_EXE_helmrepo"))
}

#[test]
fn test_cli_help() {
    let output = binary()
        .arg("--help")
        .output()
        .expect("Failed to execute CLI");

    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("helmrepo"));
    assert!(stdout.contains("add"));
}

#[test]
fn test_version_command() {
    let output = binary()
        .arg("version")
        .output()
        .expect("Failed to execute CLI");

    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains(helmrepo::VERSION));
}

#[tokio::test]
async fn test_non_interactive_add_writes_repositories_file() {
    let temp_dir = TempDir::new().unwrap();
    let repos = temp_dir.path().join("repositories.toml");

    let output = binary()
        .args(["add", "--name", "stable", "--url", "https://charts.example.com"])
        .arg("--repositories-path")
        .arg(&repos)
        .output()
        .expect("Failed to execute CLI");

    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("[OK] Helm repository stable has been added"));

    let stored = TomlRepositoryManager::new(repos).load().await.unwrap();
    assert_eq!(stored.repositories.len(), 1);
    assert_eq!(stored.repositories[0].url, "https://charts.example.com");
}

#[test]
fn test_non_interactive_add_reports_duplicate() {
    let temp_dir = TempDir::new().unwrap();
    let repos = temp_dir.path().join("repositories.toml");

    let add = || {
        binary()
            .args(["add", "--name", "dup", "--url", "https://charts.example.com"])
            .env("HELMREPO_REPOSITORIES", &repos)
            .output()
            .expect("Failed to execute CLI")
    };

    assert!(add().status.success());

    let output = add();
    assert_eq!(output.status.code(), Some(1));
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("[ERROR] Adding helm repository dup has failed"));
    assert!(stderr.contains("already exists"));
}

#[test]
fn test_non_interactive_add_rejects_bad_url() {
    let temp_dir = TempDir::new().unwrap();
    let repos = temp_dir.path().join("repositories.toml");

    let output = binary()
        .args(["add", "--name", "stable", "--url", "not a url"])
        .arg("--repositories-path")
        .arg(&repos)
        .output()
        .expect("Failed to execute CLI");

    assert_eq!(output.status.code(), Some(2));
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("Wrong url format"));
    assert!(!repos.exists());
}

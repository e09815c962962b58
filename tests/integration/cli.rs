use assert_cmd::Command;
use predicates::prelude::*;
use tempfile::TempDir;
use wiremock::MockServer;

use crate::common::{asset_path, config_for, mock_status};

fn selfup() -> Command {
    let mut cmd = Command::cargo_bin("selfup").unwrap();
    cmd.env_remove("SELFUP_CONFIG_PATH").env_remove("RUST_LOG").env("NO_COLOR", "1");
    cmd
}

/// Write a config pointing at `server` and return its directory.
fn write_config(server: &MockServer) -> (TempDir, std::path::PathBuf) {
    let config = config_for(server);
    let temp = TempDir::new().unwrap();
    let path = temp.path().join("config.toml");
    std::fs::write(
        &path,
        format!(
            "[update]\nversion_url = \"{}\"\nrelease_base = \"{}\"\n",
            config.version_url, config.release_base
        ),
    )
    .unwrap();
    (temp, path)
}

#[test]
fn test_version_flag() {
    selfup()
        .arg("--version")
        .assert()
        .success()
        .stdout(predicate::str::contains(env!("CARGO_PKG_VERSION")));
}

#[test]
fn test_positional_arguments_are_rejected() {
    selfup()
        .args(["update-self", "extra", "args"])
        .assert()
        .code(1)
        .stdout(predicate::str::is_empty())
        .stderr(predicate::str::contains(
            "No command line arguments are allowed, got: extra args",
        ));
}

#[test]
fn test_help_lists_fetch_version() {
    selfup()
        .args(["update-self", "--help"])
        .assert()
        .success()
        .stdout(predicate::str::contains("--fetch-version"));
}

#[test]
fn test_invalid_config_file_fails() {
    let temp = TempDir::new().unwrap();
    let path = temp.path().join("config.toml");
    std::fs::write(&path, "[update\n").unwrap();

    selfup()
        .arg("--config")
        .arg(&path)
        .arg("update-self")
        .assert()
        .code(1)
        .stderr(predicate::str::contains("Invalid configuration file"));
}

#[tokio::test(flavor = "multi_thread")]
async fn test_latest_lookup_failure_reports_step() {
    let server = MockServer::start().await;
    mock_status(&server, "/current-version.txt", 503).await;
    let (_dir, config_path) = write_config(&server);

    selfup()
        .arg("--config")
        .arg(&config_path)
        .arg("update-self")
        .assert()
        .code(1)
        .stdout(predicate::str::is_empty())
        .stderr(predicate::str::contains("Network error while fetching latest version"))
        .stderr(predicate::str::contains("was not modified"));
}

#[tokio::test(flavor = "multi_thread")]
async fn test_missing_release_reports_download_failure() {
    let server = MockServer::start().await;
    let config = config_for(&server);
    mock_status(&server, &asset_path(&config, "v0.0.1"), 404).await;
    let (_dir, config_path) = write_config(&server);

    selfup()
        .arg("--no-progress")
        .arg("--config")
        .arg(&config_path)
        .args(["update-self", "--fetch-version", "0.0.1"])
        .assert()
        .code(1)
        .stdout(predicate::str::starts_with("Downloading: "))
        .stderr(predicate::str::contains("Failed to download"))
        .stderr(predicate::str::contains("partial download was discarded"));
}

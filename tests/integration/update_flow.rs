use selfup_cli::core::{BinaryState, SelfupError};
use selfup_cli::test_utils::{RecordingHandoff, init_test_logging, staging_leftovers};
use selfup_cli::update::{BuildInfo, Presentation, SelfUpdater, UpdatePhase, UpdateRequest};
use selfup_cli::utils::HttpFetcher;
use tempfile::TempDir;
use wiremock::MockServer;

use crate::common::{
    NEW_IMAGE, OLD_IMAGE, asset_path, config_for, fake_executable, mock_asset,
    mock_current_version, mock_status,
};

fn updater(
    server: &MockServer,
    exe: &std::path::Path,
    build: BuildInfo,
) -> SelfUpdater<HttpFetcher, RecordingHandoff> {
    SelfUpdater::new(HttpFetcher::new().unwrap(), RecordingHandoff::new(), build, config_for(server))
        .with_executable(exe)
        .with_presentation(Presentation::Plain)
}

#[tokio::test]
async fn test_latest_update_over_http() {
    init_test_logging(None);
    let server = MockServer::start().await;
    let config = config_for(&server);
    mock_current_version(&server, "0.30.0\n").await;
    mock_asset(&server, &asset_path(&config, "0.30.0"), NEW_IMAGE).await;

    let temp = TempDir::new().unwrap();
    let exe = fake_executable(temp.path());
    let mut updater = updater(&server, &exe, BuildInfo::current());

    let mut out = Vec::new();
    let err = updater.run(&UpdateRequest::new("latest"), &mut out).await.unwrap_err();

    assert!(matches!(err, SelfupError::Handoff { .. }));
    assert_eq!(updater.phase(), UpdatePhase::HandingOff);
    assert_eq!(std::fs::read(&exe).unwrap(), NEW_IMAGE);
    assert!(staging_leftovers(temp.path()).is_empty());

    let canonical = std::fs::canonicalize(&exe).unwrap();
    assert_eq!(updater.handoff().executed(), vec![canonical.clone()]);

    let output = String::from_utf8(out).unwrap();
    let lines: Vec<&str> = output.lines().collect();
    assert_eq!(lines.len(), 3);
    assert!(lines[0].starts_with("Downloading: http://"));
    assert!(lines[0].ends_with(&asset_path(&config, "0.30.0")));
    assert_eq!(lines[1], format!("Downloaded to: {}", canonical.display()));
    assert_eq!(lines[2], "Updated to: ");
}

#[tokio::test]
async fn test_explicit_version_requests_v_prefixed_tag() {
    let server = MockServer::start().await;
    let config = config_for(&server);
    mock_asset(&server, &asset_path(&config, "v0.27.1"), NEW_IMAGE).await;

    let temp = TempDir::new().unwrap();
    let exe = fake_executable(temp.path());
    let mut updater = updater(&server, &exe, BuildInfo::current());

    let err = updater.run(&UpdateRequest::new("0.27.1"), &mut Vec::new()).await.unwrap_err();
    assert_eq!(err.binary_state(), BinaryState::Replaced);
    assert_eq!(std::fs::read(&exe).unwrap(), NEW_IMAGE);

    let requests = server.received_requests().await.unwrap();
    assert_eq!(requests.len(), 1);
    assert!(requests[0].url.path().contains("/releases/download/v0.27.1/"));
}

#[tokio::test]
async fn test_missing_release_keeps_old_binary() {
    let server = MockServer::start().await;
    let config = config_for(&server);
    mock_status(&server, &asset_path(&config, "v9.9.9"), 404).await;

    let temp = TempDir::new().unwrap();
    let exe = fake_executable(temp.path());
    let mut updater = updater(&server, &exe, BuildInfo::current());

    let mut out = Vec::new();
    let err = updater.run(&UpdateRequest::new("9.9.9"), &mut out).await.unwrap_err();

    assert!(matches!(err, SelfupError::Download { .. }));
    assert_eq!(err.binary_state(), BinaryState::StagingDiscarded);
    assert_eq!(std::fs::read(&exe).unwrap(), OLD_IMAGE);
    assert!(staging_leftovers(temp.path()).is_empty());
    assert!(updater.handoff().executed().is_empty());

    let output = String::from_utf8(out).unwrap();
    assert_eq!(output.lines().count(), 1);
    assert!(output.starts_with("Downloading: "));
}

#[tokio::test]
async fn test_non_standalone_build_contacts_no_server() {
    let server = MockServer::start().await;

    let temp = TempDir::new().unwrap();
    let exe = fake_executable(temp.path());
    let build = BuildInfo::current().with_standalone(false);
    let mut updater = updater(&server, &exe, build);

    let err = updater.run(&UpdateRequest::new("latest"), &mut Vec::new()).await.unwrap_err();

    assert!(matches!(err, SelfupError::NotSupported));
    assert!(server.received_requests().await.unwrap().is_empty());
    assert_eq!(std::fs::read_dir(temp.path()).unwrap().count(), 1);
    assert_eq!(std::fs::read(&exe).unwrap(), OLD_IMAGE);
}

#[cfg(unix)]
#[tokio::test]
async fn test_symlinked_executable_replaces_target() {
    let server = MockServer::start().await;
    let config = config_for(&server);
    mock_asset(&server, &asset_path(&config, "nightly"), NEW_IMAGE).await;

    let temp = TempDir::new().unwrap();
    let real_dir = temp.path().join("opt");
    let link_dir = temp.path().join("bin");
    std::fs::create_dir_all(&real_dir).unwrap();
    std::fs::create_dir_all(&link_dir).unwrap();
    let exe = fake_executable(&real_dir);
    let link = link_dir.join("selfup");
    std::os::unix::fs::symlink(&exe, &link).unwrap();

    let mut updater = updater(&server, &link, BuildInfo::current());
    updater.run(&UpdateRequest::new("nightly"), &mut Vec::new()).await.unwrap_err();

    assert_eq!(std::fs::read(&exe).unwrap(), NEW_IMAGE);
    assert!(std::fs::symlink_metadata(&link).unwrap().file_type().is_symlink());
    assert!(staging_leftovers(&link_dir).is_empty());
    assert!(staging_leftovers(&real_dir).is_empty());
}

use selfup_cli::utils::{FetchError, Fetcher, HttpFetcher, ProgressBar};
use tempfile::TempDir;
use wiremock::MockServer;

use crate::common::{NEW_IMAGE, mock_asset, mock_status};

#[tokio::test]
async fn test_fetch_bytes_returns_body() {
    let server = MockServer::start().await;
    mock_asset(&server, "/current-version.txt", b"0.30.0\n").await;

    let fetcher = HttpFetcher::new().unwrap();
    let body = fetcher.fetch_bytes(&format!("{}/current-version.txt", server.uri())).await.unwrap();
    assert_eq!(body, b"0.30.0\n");
}

#[tokio::test]
async fn test_non_success_status_is_status_error() {
    let server = MockServer::start().await;
    mock_status(&server, "/missing", 404).await;

    let fetcher = HttpFetcher::new().unwrap();
    let err = fetcher.fetch_bytes(&format!("{}/missing", server.uri())).await.unwrap_err();
    assert!(matches!(err, FetchError::Status { status: 404, .. }));
}

#[tokio::test]
async fn test_download_to_streams_into_file_with_progress() {
    let server = MockServer::start().await;
    mock_asset(&server, "/selfup-linux-amd64", NEW_IMAGE).await;

    let temp = TempDir::new().unwrap();
    let dest = temp.path().join("staged");
    let bar = ProgressBar::hidden();

    let fetcher = HttpFetcher::new().unwrap();
    let written = fetcher
        .download_to(&format!("{}/selfup-linux-amd64", server.uri()), &dest, Some(&bar))
        .await
        .unwrap();

    assert_eq!(written, NEW_IMAGE.len() as u64);
    assert_eq!(std::fs::read(&dest).unwrap(), NEW_IMAGE);
    assert_eq!(bar.position(), NEW_IMAGE.len() as u64);
    assert_eq!(bar.length(), Some(NEW_IMAGE.len() as u64));
}

#[tokio::test]
async fn test_download_to_error_status_writes_nothing() {
    let server = MockServer::start().await;
    mock_status(&server, "/selfup-linux-amd64", 500).await;

    let temp = TempDir::new().unwrap();
    let dest = temp.path().join("staged");

    let fetcher = HttpFetcher::new().unwrap();
    let err = fetcher
        .download_to(&format!("{}/selfup-linux-amd64", server.uri()), &dest, None)
        .await
        .unwrap_err();

    assert!(matches!(err, FetchError::Status { status: 500, .. }));
    assert!(!dest.exists());
}

#[tokio::test]
async fn test_unreachable_host_is_request_error() {
    let fetcher = HttpFetcher::new().unwrap();
    // Port 9 (discard) is closed on test machines
    let err = fetcher.fetch_bytes("http://127.0.0.1:9/current-version.txt").await.unwrap_err();
    assert!(matches!(err, FetchError::Request { .. }));
}

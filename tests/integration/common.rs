//! Shared fixtures for the integration suite.

use std::path::{Path, PathBuf};

use selfup_cli::config::UpdateConfig;
use selfup_cli::update::{Platform, resolver};
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

pub const OLD_IMAGE: &[u8] = b"#!/bin/sh\necho selfup 0.1.0\n";
pub const NEW_IMAGE: &[u8] = b"#!/bin/sh\necho selfup 0.30.0\n";

/// Endpoints served by `server`.
pub fn config_for(server: &MockServer) -> UpdateConfig {
    UpdateConfig {
        version_url: format!("{}/current-version.txt", server.uri()),
        release_base: format!("{}/selfup-dev/selfup", server.uri()),
        ..UpdateConfig::default()
    }
}

/// Path component of the asset URL for `tag` on this platform.
pub fn asset_path(config: &UpdateConfig, tag: &str) -> String {
    let url = resolver::release_url(config, tag, &Platform::current());
    url.split_once("/selfup-dev/")
        .map(|(_, rest)| format!("/selfup-dev/{rest}"))
        .unwrap_or(url)
}

pub async fn mock_current_version(server: &MockServer, body: &str) {
    Mock::given(method("GET"))
        .and(path("/current-version.txt"))
        .respond_with(ResponseTemplate::new(200).set_body_string(body))
        .expect(1)
        .mount(server)
        .await;
}

pub async fn mock_asset(server: &MockServer, asset_path: &str, content: &[u8]) {
    Mock::given(method("GET"))
        .and(path(asset_path))
        .respond_with(ResponseTemplate::new(200).set_body_bytes(content))
        .mount(server)
        .await;
}

pub async fn mock_status(server: &MockServer, request_path: &str, status: u16) {
    Mock::given(method("GET"))
        .and(path(request_path))
        .respond_with(ResponseTemplate::new(status))
        .mount(server)
        .await;
}

/// Write a fake executable named `selfup` into `dir`.
pub fn fake_executable(dir: &Path) -> PathBuf {
    let exe = dir.join("selfup");
    std::fs::write(&exe, OLD_IMAGE).unwrap();
    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;
        std::fs::set_permissions(&exe, std::fs::Permissions::from_mode(0o755)).unwrap();
    }
    exe
}

//! Version token resolution.
//!
//! Turns `latest`, `nightly` or an explicit version into a release tag and
//! the download URL of the asset for the running platform.

use std::fmt;

use tracing::{debug, warn};

use super::build_info::Platform;
use crate::config::UpdateConfig;
use crate::constants::{LATEST_TOKEN, NIGHTLY_TOKEN};
use crate::core::SelfupError;
use crate::utils::http::{FetchError, Fetcher};

/// Operation name reported when the current-version lookup fails.
pub const FETCH_LATEST_OPERATION: &str = "fetching latest version";

/// A user-supplied version request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum VersionToken {
    /// Newest stable release, looked up remotely.
    Latest,
    /// The rolling nightly build.
    Nightly,
    /// A bare version such as `0.27.1`.
    Explicit(String),
}

impl VersionToken {
    /// Classify a raw token. Empty or blank input means [`VersionToken::Latest`].
    #[must_use]
    pub fn parse(raw: &str) -> Self {
        match raw.trim() {
            "" | LATEST_TOKEN => Self::Latest,
            NIGHTLY_TOKEN => Self::Nightly,
            explicit => Self::Explicit(explicit.to_string()),
        }
    }
}

impl fmt::Display for VersionToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Latest => f.write_str(LATEST_TOKEN),
            Self::Nightly => f.write_str(NIGHTLY_TOKEN),
            Self::Explicit(version) => f.write_str(version),
        }
    }
}

/// A concrete release: tag plus the asset URL for this platform.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedRelease {
    tag: String,
    download_url: String,
}

impl ResolvedRelease {
    pub fn tag(&self) -> &str {
        &self.tag
    }

    pub fn download_url(&self) -> &str {
        &self.download_url
    }

    /// Last path segment of the download URL, used to label progress.
    pub fn asset_name(&self) -> &str {
        self.download_url.rsplit('/').next().unwrap_or(&self.download_url)
    }
}

/// Build the download URL for `tag` on `platform`.
///
/// `{release_base}/releases/download/{tag}/{binary_name}-{os}-{arch}`
#[must_use]
pub fn release_url(config: &UpdateConfig, tag: &str, platform: &Platform) -> String {
    format!(
        "{}/releases/download/{}/{}-{}-{}",
        config.release_base.trim_end_matches('/'),
        tag,
        config.binary_name,
        platform.os,
        platform.arch
    )
}

/// Resolves [`VersionToken`]s against the configured endpoints.
pub struct VersionResolver<'a, F> {
    fetcher: &'a F,
    config: &'a UpdateConfig,
    platform: &'a Platform,
}

impl<'a, F: Fetcher> VersionResolver<'a, F> {
    pub fn new(fetcher: &'a F, config: &'a UpdateConfig, platform: &'a Platform) -> Self {
        Self {
            fetcher,
            config,
            platform,
        }
    }

    /// Resolve `token` into a [`ResolvedRelease`].
    ///
    /// Only [`VersionToken::Latest`] touches the network, with exactly one
    /// request. Explicit versions are prefixed with `v` as given; the URL is
    /// not checked for existence here.
    ///
    /// # Errors
    ///
    /// [`SelfupError::Network`] when the `latest` lookup fails or returns a
    /// blank body.
    ///
    /// # Examples
    ///
    /// ```rust,no_run
    /// use selfup_cli::config::UpdateConfig;
    /// use selfup_cli::update::{Platform, VersionResolver, VersionToken};
    /// use selfup_cli::utils::HttpFetcher;
    ///
    /// # async fn example() -> anyhow::Result<()> {
    /// let fetcher = HttpFetcher::new()?;
    /// let config = UpdateConfig::default();
    /// let platform = Platform::from_rust("linux", "x86_64");
    /// let resolver = VersionResolver::new(&fetcher, &config, &platform);
    ///
    /// let release = resolver.resolve(&VersionToken::parse("0.27.1")).await?;
    /// assert_eq!(release.tag(), "v0.27.1");
    /// assert!(release.download_url().ends_with("/releases/download/v0.27.1/selfup-linux-amd64"));
    /// # Ok(())
    /// # }
    /// ```
    pub async fn resolve(&self, token: &VersionToken) -> Result<ResolvedRelease, SelfupError> {
        let tag = match token {
            VersionToken::Nightly => NIGHTLY_TOKEN.to_string(),
            VersionToken::Latest => self.fetch_latest_version().await?,
            VersionToken::Explicit(version) => {
                if semver::Version::parse(version).is_err() {
                    warn!("'{}' is not a semantic version, requesting tag v{} as given", version, version);
                }
                format!("v{version}")
            }
        };

        let download_url = release_url(self.config, &tag, self.platform);
        debug!("Resolved '{}' to tag {} at {}", token, tag, download_url);
        Ok(ResolvedRelease { tag, download_url })
    }

    /// Fetch the newest version from the current-version endpoint.
    ///
    /// The body is trimmed; the result is used verbatim as the tag.
    async fn fetch_latest_version(&self) -> Result<String, SelfupError> {
        let url = &self.config.version_url;
        let network_err = |source| SelfupError::Network {
            operation: FETCH_LATEST_OPERATION.to_string(),
            source,
        };

        let body = self.fetcher.fetch_bytes(url).await.map_err(network_err)?;
        let version = String::from_utf8_lossy(&body).trim().to_string();
        if version.is_empty() {
            return Err(network_err(FetchError::EmptyBody { url: url.clone() }));
        }

        debug!("Latest available version: {}", version);
        Ok(version)
    }
}

//! HTTP transport used by the resolver and installer
//!
//! The [`Fetcher`] trait is the seam between the update logic and the
//! network. [`HttpFetcher`] is the `reqwest`-backed implementation the binary
//! uses; tests substitute an in-memory fetcher.

use std::future::Future;
use std::path::{Path, PathBuf};

use thiserror::Error;
use tokio::io::AsyncWriteExt;
use tracing::debug;

use crate::constants::BINARY_NAME;
use crate::utils::progress::ProgressBar;

/// Transport-level failure.
#[derive(Error, Debug)]
pub enum FetchError {
    /// The HTTP client could not be constructed.
    #[error("failed to build HTTP client")]
    Client(#[source] reqwest::Error),

    /// Connecting, sending or reading the response failed.
    #[error("request to {url} failed")]
    Request {
        url: String,
        #[source]
        source: reqwest::Error,
    },

    /// The server answered with a non-success status.
    #[error("{url} returned HTTP {status}")]
    Status { url: String, status: u16 },

    /// The server answered successfully but sent nothing.
    #[error("{url} returned an empty body")]
    EmptyBody { url: String },

    /// The body ended before `Content-Length` bytes arrived.
    #[error("transfer of {url} ended after {received} of {expected} bytes")]
    Truncated {
        url: String,
        received: u64,
        expected: u64,
    },

    /// Writing the body to disk failed.
    #[error("failed to write {}", path.display())]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Fetch a URL into memory or onto disk.
pub trait Fetcher {
    /// Return the whole response body.
    fn fetch_bytes(&self, url: &str) -> impl Future<Output = Result<Vec<u8>, FetchError>> + Send;

    /// Stream the response body into `dest`, truncating it first, and
    /// advance `progress` as bytes arrive. Returns the number of bytes
    /// written.
    fn download_to(
        &self,
        url: &str,
        dest: &Path,
        progress: Option<&ProgressBar>,
    ) -> impl Future<Output = Result<u64, FetchError>> + Send;
}

/// `reqwest`-backed [`Fetcher`].
#[derive(Clone)]
pub struct HttpFetcher {
    client: reqwest::Client,
}

impl HttpFetcher {
    /// Build a client identifying itself as `selfup/<version>`.
    pub fn new() -> Result<Self, FetchError> {
        let client = reqwest::Client::builder()
            .user_agent(format!("{}/{}", BINARY_NAME, env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(FetchError::Client)?;
        Ok(Self { client })
    }

    async fn get(&self, url: &str) -> Result<reqwest::Response, FetchError> {
        debug!("GET {}", url);
        let response = self.client.get(url).send().await.map_err(|source| FetchError::Request {
            url: url.to_string(),
            source,
        })?;

        let status = response.status();
        if !status.is_success() {
            return Err(FetchError::Status {
                url: url.to_string(),
                status: status.as_u16(),
            });
        }
        Ok(response)
    }
}

impl Fetcher for HttpFetcher {
    async fn fetch_bytes(&self, url: &str) -> Result<Vec<u8>, FetchError> {
        let response = self.get(url).await?;
        let body = response.bytes().await.map_err(|source| FetchError::Request {
            url: url.to_string(),
            source,
        })?;
        debug!("Fetched {} bytes from {}", body.len(), url);
        Ok(body.to_vec())
    }

    async fn download_to(
        &self,
        url: &str,
        dest: &Path,
        progress: Option<&ProgressBar>,
    ) -> Result<u64, FetchError> {
        let mut response = self.get(url).await?;
        let expected = response.content_length();
        if let (Some(bar), Some(len)) = (progress, expected) {
            bar.set_length(len);
        }

        let write_err = |source| FetchError::Write {
            path: dest.to_path_buf(),
            source,
        };
        let mut file = tokio::fs::File::create(dest).await.map_err(write_err)?;

        let mut received: u64 = 0;
        while let Some(chunk) = response.chunk().await.map_err(|source| FetchError::Request {
            url: url.to_string(),
            source,
        })? {
            file.write_all(&chunk).await.map_err(write_err)?;
            received += chunk.len() as u64;
            if let Some(bar) = progress {
                bar.set_position(received);
            }
        }

        if let Some(expected) = expected {
            if received < expected {
                return Err(FetchError::Truncated {
                    url: url.to_string(),
                    received,
                    expected,
                });
            }
        }

        file.flush().await.map_err(write_err)?;
        file.sync_all().await.map_err(write_err)?;
        debug!("Wrote {} bytes from {} to {}", received, url, dest.display());
        Ok(received)
    }
}

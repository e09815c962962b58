//! In-memory [`Fetcher`] for tests.

use std::collections::HashMap;
use std::path::Path;
use std::sync::Mutex;

use crate::utils::http::{FetchError, Fetcher};
use crate::utils::progress::ProgressBar;

/// Canned response for one URL.
#[derive(Debug, Clone)]
pub enum MockResponse {
    /// 200 with this body.
    Body(Vec<u8>),
    /// Non-success HTTP status.
    Status(u16),
    /// Sends `partial` then stops short of `expected` bytes.
    Truncated { partial: Vec<u8>, expected: u64 },
}

/// A [`Fetcher`] serving canned responses and recording every requested URL.
///
/// URLs without a response answer 404.
#[derive(Debug, Default)]
pub struct MockFetcher {
    responses: HashMap<String, MockResponse>,
    calls: Mutex<Vec<String>>,
    progress: Mutex<Vec<bool>>,
}

impl MockFetcher {
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn with_body(mut self, url: &str, body: &[u8]) -> Self {
        self.responses.insert(url.to_string(), MockResponse::Body(body.to_vec()));
        self
    }

    #[must_use]
    pub fn with_status(mut self, url: &str, status: u16) -> Self {
        self.responses.insert(url.to_string(), MockResponse::Status(status));
        self
    }

    #[must_use]
    pub fn with_truncated(mut self, url: &str, partial: &[u8], expected: u64) -> Self {
        self.responses.insert(
            url.to_string(),
            MockResponse::Truncated {
                partial: partial.to_vec(),
                expected,
            },
        );
        self
    }

    /// Every requested URL, in order.
    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().map(|calls| calls.clone()).unwrap_or_default()
    }

    pub fn call_count(&self) -> usize {
        self.calls().len()
    }

    /// For each `download_to` call, whether a progress bar was passed.
    pub fn progress_reported(&self) -> Vec<bool> {
        self.progress.lock().map(|p| p.clone()).unwrap_or_default()
    }

    fn respond(&self, url: &str) -> Option<MockResponse> {
        if let Ok(mut calls) = self.calls.lock() {
            calls.push(url.to_string());
        }
        self.responses.get(url).cloned()
    }
}

fn not_found(url: &str) -> FetchError {
    FetchError::Status {
        url: url.to_string(),
        status: 404,
    }
}

impl Fetcher for MockFetcher {
    async fn fetch_bytes(&self, url: &str) -> Result<Vec<u8>, FetchError> {
        match self.respond(url) {
            Some(MockResponse::Body(body)) => Ok(body),
            Some(MockResponse::Status(status)) => Err(FetchError::Status {
                url: url.to_string(),
                status,
            }),
            Some(MockResponse::Truncated { partial, expected }) => Err(FetchError::Truncated {
                url: url.to_string(),
                received: partial.len() as u64,
                expected,
            }),
            None => Err(not_found(url)),
        }
    }

    async fn download_to(
        &self,
        url: &str,
        dest: &Path,
        progress: Option<&ProgressBar>,
    ) -> Result<u64, FetchError> {
        if let Ok(mut reported) = self.progress.lock() {
            reported.push(progress.is_some());
        }
        let write_err = |source| FetchError::Write {
            path: dest.to_path_buf(),
            source,
        };

        match self.respond(url) {
            Some(MockResponse::Body(body)) => {
                if let Some(bar) = progress {
                    bar.set_length(body.len() as u64);
                }
                std::fs::write(dest, &body).map_err(write_err)?;
                if let Some(bar) = progress {
                    bar.set_position(body.len() as u64);
                }
                Ok(body.len() as u64)
            }
            Some(MockResponse::Truncated { partial, expected }) => {
                if let Some(bar) = progress {
                    bar.set_length(expected);
                }
                std::fs::write(dest, &partial).map_err(write_err)?;
                Err(FetchError::Truncated {
                    url: url.to_string(),
                    received: partial.len() as u64,
                    expected,
                })
            }
            Some(MockResponse::Status(status)) => Err(FetchError::Status {
                url: url.to_string(),
                status,
            }),
            None => Err(not_found(url)),
        }
    }
}

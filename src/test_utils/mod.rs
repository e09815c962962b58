//! Test utilities for selfup
//!
//! Available to unit tests and, through the `test-utils` feature, to the
//! integration suite.
//!
//! - [`MockFetcher`]: in-memory [`Fetcher`](crate::utils::Fetcher) with canned
//!   responses and a call log
//! - [`RecordingHandoff`]: a [`ProcessHandoff`](crate::update::ProcessHandoff)
//!   that records the path instead of replacing the test process
//! - [`staging_leftovers`]: lists staging files left in a directory
//!
//! # Example
//!
//! ```rust,no_run
//! use selfup_cli::test_utils::MockFetcher;
//!
//! let fetcher = MockFetcher::new()
//!     .with_body("https://updates.test/current-version.txt", b"0.30.0\n")
//!     .with_status("https://releases.test/missing", 404);
//! assert_eq!(fetcher.call_count(), 0);
//! ```

pub mod fetcher;
pub mod handoff;

pub use fetcher::{MockFetcher, MockResponse};
pub use handoff::RecordingHandoff;

use std::path::{Path, PathBuf};
use std::sync::Once;
use tracing::Level;
use tracing_subscriber::EnvFilter;

use crate::constants::STAGING_PREFIX;

/// Global flag to ensure logging is only initialized once in tests
static INIT_LOGGING: Once = Once::new();

/// Initialize logging for tests.
///
/// Only the first call has an effect. `level` wins over `RUST_LOG`; with
/// neither set nothing is logged.
///
/// ```bash
/// RUST_LOG=selfup_cli=debug cargo test
/// ```
pub fn init_test_logging(level: Option<Level>) {
    INIT_LOGGING.call_once(|| {
        let filter = if let Some(level) = level {
            EnvFilter::new(level.to_string())
        } else if std::env::var("RUST_LOG").is_ok() {
            EnvFilter::from_default_env()
        } else {
            return;
        };

        let _ = tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_test_writer()
            .with_target(true)
            .with_thread_ids(false)
            .with_ansi(true)
            .try_init();
    });
}

/// Files in `dir` whose name starts with the staging prefix.
pub fn staging_leftovers(dir: &Path) -> Vec<PathBuf> {
    let Ok(entries) = std::fs::read_dir(dir) else {
        return Vec::new();
    };
    entries
        .filter_map(Result::ok)
        .filter(|entry| entry.file_name().to_string_lossy().starts_with(STAGING_PREFIX))
        .map(|entry| entry.path())
        .collect()
}

//! Progress indicators for downloads
//!
//! A thin wrapper over `indicatif` so the rest of the crate never touches
//! styles or templates directly.
//!
//! # Environment Variables
//!
//! - `SELFUP_NO_PROGRESS`: Set to any value to disable all progress indicators
//!
//! # Examples
//!
//! ```rust
//! use selfup_cli::utils::progress::ProgressBar;
//!
//! let progress = ProgressBar::download("selfup-linux-amd64");
//! progress.set_length(1024);
//! progress.set_position(512);
//! progress.finish_with_message("done");
//! ```

use indicatif::{ProgressBar as IndicatifBar, ProgressStyle as IndicatifStyle};

use crate::constants::NO_PROGRESS_ENV;

/// Whether progress bars were switched off through the environment.
pub fn is_progress_disabled() -> bool {
    std::env::var_os(NO_PROGRESS_ENV).is_some()
}

/// A byte-counting progress bar that renders to stderr.
#[derive(Clone)]
pub struct ProgressBar {
    inner: IndicatifBar,
}

impl ProgressBar {
    /// Create a download bar labelled with `prefix`.
    ///
    /// The length starts unknown (spinner-like) and is filled in once the
    /// response's `Content-Length` is known.
    pub fn download(prefix: impl Into<String>) -> Self {
        let bar = if is_progress_disabled() {
            IndicatifBar::hidden()
        } else {
            let bar = IndicatifBar::no_length();
            bar.set_style(download_style());
            bar
        };
        bar.set_prefix(prefix.into());
        Self { inner: bar }
    }

    /// Create a bar that never draws. Used by tests and quiet callers.
    pub fn hidden() -> Self {
        Self {
            inner: IndicatifBar::hidden(),
        }
    }

    pub fn set_length(&self, len: u64) {
        self.inner.set_length(len);
    }

    pub fn set_position(&self, pos: u64) {
        self.inner.set_position(pos);
    }

    pub fn position(&self) -> u64 {
        self.inner.position()
    }

    pub fn length(&self) -> Option<u64> {
        self.inner.length()
    }

    pub fn finish_with_message(&self, msg: impl Into<String>) {
        self.inner.finish_with_message(msg.into());
    }

    pub fn abandon(&self) {
        self.inner.abandon();
    }
}

fn download_style() -> IndicatifStyle {
    IndicatifStyle::default_bar()
        .template("{prefix:.bold.cyan} [{bar:40.cyan/blue}] {bytes}/{total_bytes} ({eta}) {msg}")
        .unwrap_or_else(|_| IndicatifStyle::default_bar())
        .progress_chars("━╸━")
}

//! A hand-off that records instead of exec-ing.

use std::convert::Infallible;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use crate::core::SelfupError;
use crate::update::ProcessHandoff;

/// Records every path it is asked to exec and fails with
/// [`SelfupError::Handoff`], so the calling test keeps running.
#[derive(Debug, Default)]
pub struct RecordingHandoff {
    executed: Mutex<Vec<PathBuf>>,
}

impl RecordingHandoff {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn executed(&self) -> Vec<PathBuf> {
        self.executed.lock().map(|paths| paths.clone()).unwrap_or_default()
    }
}

impl ProcessHandoff for RecordingHandoff {
    fn exec(&self, path: &Path) -> Result<Infallible, SelfupError> {
        if let Ok(mut executed) = self.executed.lock() {
            executed.push(path.to_path_buf());
        }
        Err(SelfupError::Handoff {
            path: path.to_path_buf(),
            source: std::io::Error::other("recording hand-off does not exec"),
        })
    }
}

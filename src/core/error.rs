//! Error handling for selfup
//!
//! The error system follows two rules:
//! 1. **Strongly-typed errors** ([`SelfupError`]) so callers and tests can tell
//!    every failure step apart
//! 2. **User-friendly messages** ([`ErrorContext`]) with details and an
//!    actionable suggestion for CLI users
//!
//! # Where did it fail?
//!
//! A self-update has three very different failure outcomes for the user, and
//! the reporting must keep them apart. [`SelfupError::binary_state`] maps every
//! error onto a [`BinaryState`]:
//!
//! - [`BinaryState::Untouched`] - failed before the download started
//! - [`BinaryState::StagingDiscarded`] - failed during or right after the
//!   transfer; the partial download was thrown away
//! - [`BinaryState::Replaced`] - the new binary is installed but the process
//!   could not restart into it
//!
//! # Examples
//!
//! ```rust,no_run
//! use selfup_cli::core::{BinaryState, ErrorContext, SelfupError};
//!
//! let error = SelfupError::NotSupported;
//! assert_eq!(error.binary_state(), BinaryState::Untouched);
//!
//! let context = ErrorContext::new(error)
//!     .with_suggestion("Update the application that ships this tool");
//! context.display();
//! ```

use colored::Colorize;
use std::fmt;
use std::path::PathBuf;
use thiserror::Error;

use crate::utils::http::FetchError;

/// What is on disk at the executable's path after a failure.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BinaryState {
    /// Nothing was downloaded or written; the old binary is in place.
    Untouched,
    /// The transfer or commit failed; the old binary is in place and the
    /// staging file was deleted.
    StagingDiscarded,
    /// The new binary is installed but is not running yet.
    Replaced,
}

impl BinaryState {
    /// One-line description shown to users under `details:`.
    #[must_use]
    pub const fn describe(self) -> &'static str {
        match self {
            Self::Untouched => "The installed binary was not modified",
            Self::StagingDiscarded => {
                "The installed binary was not modified and the partial download was discarded"
            }
            Self::Replaced => {
                "The new binary is installed, but it could not be restarted automatically"
            }
        }
    }
}

/// The main error type for selfup operations.
///
/// Each variant corresponds to exactly one step of the update sequence so
/// the step that failed is always visible in the message.
#[derive(Error, Debug)]
pub enum SelfupError {
    /// Stray positional arguments were passed to `update-self`.
    #[error("No command line arguments are allowed, got: {args}")]
    Usage {
        /// The rejected arguments, space separated
        args: String,
    },

    /// The current-version lookup failed.
    #[error("Network error while {operation}")]
    Network {
        /// The network operation that failed (e.g. "fetching latest version")
        operation: String,
        /// Underlying transport failure
        #[source]
        source: FetchError,
    },

    /// The running executable's own path could not be determined.
    #[error("Failed to {operation}")]
    PathResolution {
        /// What was being resolved
        operation: String,
        /// Underlying IO failure
        #[source]
        source: std::io::Error,
    },

    /// This build cannot replace itself.
    #[error(
        "This is not a standalone selfup executable. You must update the application that ships it instead"
    )]
    NotSupported,

    /// The staging file next to the executable could not be created.
    #[error("Failed to create staging file in {}", dir.display())]
    TempFile {
        /// Directory the staging file was created in
        dir: PathBuf,
        /// Underlying IO failure
        #[source]
        source: std::io::Error,
    },

    /// The binary transfer failed.
    #[error("Failed to download {url}")]
    Download {
        /// The URL being downloaded
        url: String,
        /// Underlying transport failure
        #[source]
        source: FetchError,
    },

    /// The fully staged binary could not be moved over the executable.
    #[error("Failed to move the new binary into place at {}", path.display())]
    Commit {
        /// Final executable path
        path: PathBuf,
        /// Underlying IO failure
        #[source]
        source: std::io::Error,
    },

    /// The new binary is installed but exec into it failed.
    #[error("Updated {} but could not restart into it", path.display())]
    Handoff {
        /// Path of the freshly installed binary
        path: PathBuf,
        /// Underlying OS failure
        #[source]
        source: std::io::Error,
    },

    /// The global configuration file is unreadable or malformed.
    #[error("Invalid configuration file {}: {reason}", path.display())]
    Config {
        /// Path of the configuration file
        path: PathBuf,
        /// Parser or IO message
        reason: String,
    },
}

impl SelfupError {
    /// Report what the failure left on disk.
    #[must_use]
    pub const fn binary_state(&self) -> BinaryState {
        match self {
            Self::Download { .. } | Self::Commit { .. } => BinaryState::StagingDiscarded,
            Self::Handoff { .. } => BinaryState::Replaced,
            Self::Usage { .. }
            | Self::Network { .. }
            | Self::PathResolution { .. }
            | Self::NotSupported
            | Self::TempFile { .. }
            | Self::Config { .. } => BinaryState::Untouched,
        }
    }
}

/// Error context wrapper that provides user-friendly error information.
///
/// Printed by the CLI as colored `error:`, `details:` and `suggestion:` lines.
#[derive(Debug)]
pub struct ErrorContext {
    /// The underlying error message
    pub message: String,
    /// Optional suggestion for resolving the error
    pub suggestion: Option<String>,
    /// Optional additional details about the error
    pub details: Option<String>,
}

impl ErrorContext {
    /// Create a new error context from a [`SelfupError`].
    #[must_use]
    pub fn new(error: SelfupError) -> Self {
        Self::from_message(error.to_string())
    }

    /// Create a context for an error that has no [`SelfupError`] behind it.
    #[must_use]
    pub fn from_message(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            suggestion: None,
            details: None,
        }
    }

    /// Add a suggestion for resolving the error
    pub fn with_suggestion(mut self, suggestion: impl Into<String>) -> Self {
        self.suggestion = Some(suggestion.into());
        self
    }

    /// Add additional details explaining the error
    pub fn with_details(mut self, details: impl Into<String>) -> Self {
        self.details = Some(details.into());
        self
    }

    /// Display the error context to stderr with terminal colors
    ///
    /// - Error message: Red and bold
    /// - Details: Yellow
    /// - Suggestion: Green
    pub fn display(&self) {
        eprintln!("{}: {}", "error".red().bold(), self.message);

        if let Some(details) = &self.details {
            eprintln!("{}: {}", "details".yellow(), details);
        }

        if let Some(suggestion) = &self.suggestion {
            eprintln!("{}: {}", "suggestion".green(), suggestion);
        }
    }
}

impl fmt::Display for ErrorContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.message)?;

        if let Some(details) = &self.details {
            write!(f, "\nDetails: {details}")?;
        }

        if let Some(suggestion) = &self.suggestion {
            write!(f, "\nSuggestion: {suggestion}")?;
        }

        Ok(())
    }
}

impl std::error::Error for ErrorContext {}

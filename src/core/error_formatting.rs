//! Error formatting utilities for selfup
//!
//! Converts any error reaching `main` into a clear message with the on-disk
//! outcome and a next step for the user.

use super::error::{ErrorContext, SelfupError};

/// Convert any error into a user-friendly format with contextual suggestions
///
/// Walks the error chain looking for a [`SelfupError`]. When one is found the
/// context carries the [`BinaryState`](super::BinaryState) description and the root cause; anything
/// else falls back to the plain message chain.
#[must_use]
pub fn user_friendly_error(error: anyhow::Error) -> ErrorContext {
    for cause in error.chain() {
        if let Some(selfup_error) = cause.downcast_ref::<SelfupError>() {
            return create_error_context(selfup_error);
        }
    }

    let message = error.to_string();
    let mut context = ErrorContext::from_message(message);
    if let Some(root) = error.chain().skip(1).last() {
        context = context.with_details(root.to_string());
    }
    context
}

/// Build the context for a known [`SelfupError`].
#[must_use]
pub fn create_error_context(error: &SelfupError) -> ErrorContext {
    let state = error.binary_state();
    let mut details = state.describe().to_string();
    if let Some(cause) = root_cause(error) {
        details = format!("{details}. Cause: {cause}");
    }

    let suggestion = match error {
        SelfupError::Usage { .. } => {
            "Run `selfup update-self --fetch-version <VERSION>` without positional arguments"
        }
        SelfupError::Network { .. } => {
            "Check your internet connection, or pass an explicit version with --fetch-version"
        }
        SelfupError::PathResolution { .. } => {
            "Reinstall selfup from the release page; its own location could not be determined"
        }
        SelfupError::NotSupported => {
            "Update the whole application that bundles selfup using its package manager or installer"
        }
        SelfupError::TempFile { .. } | SelfupError::Commit { .. } => {
            "Check that you can write to the directory containing selfup and that the disk is not full"
        }
        SelfupError::Download { .. } => {
            "Verify the requested version exists for your platform and try again"
        }
        SelfupError::Handoff { .. } => "Run `selfup --version` to confirm the new version",
        SelfupError::Config { .. } => {
            "Fix the syntax in the configuration file or remove it to use defaults"
        }
    };

    ErrorContext::from_message(error.to_string())
        .with_details(details)
        .with_suggestion(suggestion)
}

fn root_cause(error: &SelfupError) -> Option<String> {
    let mut current: &dyn std::error::Error = std::error::Error::source(error)?;
    while let Some(next) = current.source() {
        current = next;
    }
    Some(current.to_string())
}

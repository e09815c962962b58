//! Global constants used throughout the selfup codebase.
//!
//! Endpoint defaults, naming patterns and environment variable names live
//! here so the resolver, installer and CLI agree on them.

/// Name of the executable as published on the release host.
///
/// Release assets are named `{BINARY_NAME}-{os}-{arch}`.
pub const BINARY_NAME: &str = "selfup";

/// Plain-text endpoint that serves the newest stable version identifier.
pub const DEFAULT_VERSION_URL: &str = "https://selfup.dev/current-version.txt";

/// Base URL of the release host. Download URLs are built as
/// `{base}/releases/download/{tag}/{asset}`.
pub const DEFAULT_RELEASE_BASE: &str = "https://github.com/selfup-dev/selfup";

/// Version token that resolves through the current-version endpoint.
pub const LATEST_TOKEN: &str = "latest";

/// Version token that maps directly onto the rolling nightly tag.
pub const NIGHTLY_TOKEN: &str = "nightly";

/// Prefix of the staging file created next to the running executable.
///
/// A random suffix is appended per run, so anything matching
/// `{STAGING_PREFIX}*` in the executable's directory is a leftover.
pub const STAGING_PREFIX: &str = ".selfup-staging.";

/// Argument passed to the replacement binary after hand-off.
pub const HANDOFF_VERIFY_ARG: &str = "--version";

/// Environment variable overriding the global config file location.
pub const CONFIG_PATH_ENV: &str = "SELFUP_CONFIG_PATH";

/// Environment variable that disables progress bars when set to any value.
pub const NO_PROGRESS_ENV: &str = "SELFUP_NO_PROGRESS";

//! selfup - a standalone command-line tool that can replace itself
//!
//! The crate implements the whole self-update sequence for a single
//! self-contained executable: turn a version token into a release URL,
//! download the replacement next to the running binary, swap it in with an
//! atomic rename and re-execute the new image in place of the current
//! process.
//!
//! # Architecture Overview
//!
//! ```text
//! cli::update_self ──► update::SelfUpdater
//!                         ├── preflight   (ExecutableImage + BuildInfo)
//!                         ├── resolver    (VersionResolver ─► Fetcher)
//!                         ├── installer   (StagingFile ─► Fetcher ─► rename)
//!                         └── handoff     (execve / spawn-and-exit)
//! ```
//!
//! # Core Modules
//!
//! - [`cli`] - Command-line interface and the `update-self` subcommand
//! - [`config`] - Global configuration (`~/.selfup/config.toml`)
//! - [`core`] - Error types and user-friendly error reporting
//! - [`update`] - Resolution, atomic installation and process hand-off
//! - [`utils`] - Progress bars and the HTTP transport
//!
//! # Command-Line Usage
//!
//! ```bash
//! # Update to the newest stable release
//! selfup update-self
//!
//! # Update to the rolling nightly build
//! selfup update-self --fetch-version nightly
//!
//! # Install an exact release
//! selfup update-self --fetch-version 0.27.1
//! ```

pub mod cli;
pub mod config;
pub mod constants;
pub mod core;
pub mod update;
pub mod utils;

// test_utils module is available for both unit tests and integration tests
#[cfg(any(test, feature = "test-utils"))]
pub mod test_utils;

//! Integration test suite for selfup
//!
//! End-to-end tests against a local `wiremock` server and the built binary.
//!
//! ```bash
//! cargo test --test integration
//! ```
//!
//! # Test Organization
//!
//! - **cli**: The `selfup` binary's argument handling, exit codes and error output
//! - **config**: Loading the global config file from disk and the environment
//! - **http_fetcher**: The `reqwest` transport against a mock HTTP server
//! - **update_flow**: Resolution, staging, commit and hand-off over real HTTP

mod cli;
mod common;
mod config;
mod http_fetcher;
mod update_flow;

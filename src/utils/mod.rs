//! Supporting utilities
//!
//! - [`http`] - The [`Fetcher`] transport seam and its `reqwest` implementation
//! - [`progress`] - Download progress bars

pub mod http;
pub mod progress;

pub use http::{FetchError, Fetcher, HttpFetcher};
pub use progress::ProgressBar;

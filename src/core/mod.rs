//! Core types and error handling for selfup
//!
//! - [`SelfupError`] - one variant per step of the self-update sequence
//! - [`BinaryState`] - what a failure left on disk
//! - [`ErrorContext`] / [`user_friendly_error`] - CLI-facing error rendering

pub mod error;
pub mod error_formatting;

pub use error::{BinaryState, ErrorContext, SelfupError};
pub use error_formatting::{create_error_context, user_friendly_error};

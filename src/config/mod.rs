//! Configuration management for selfup
//!
//! - `global` - The user-wide `~/.selfup/config.toml` file
//! - `update` - The `[update]` table: endpoints, asset naming and progress
//!
//! ```toml
//! [update]
//! version_url = "https://selfup.dev/current-version.txt"
//! release_base = "https://github.com/selfup-dev/selfup"
//! ```

pub mod global;
pub mod update;

pub use global::GlobalConfig;
pub use update::UpdateConfig;

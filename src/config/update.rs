use serde::{Deserialize, Serialize};

use crate::constants::{BINARY_NAME, DEFAULT_RELEASE_BASE, DEFAULT_VERSION_URL};

/// Configuration settings for selfup's update behavior.
///
/// Lives under the `[update]` table of the global config file. Every field
/// has a compiled-in default, so the table (and the file) are optional.
///
/// # TOML Example
/// ```toml
/// [update]
/// version_url = "https://mirror.example.com/current-version.txt"
/// release_base = "https://mirror.example.com/selfup"
/// binary_name = "selfup"
/// show_progress = true
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UpdateConfig {
    /// Plain-text endpoint returning the newest stable version.
    #[serde(default = "default_version_url")]
    pub version_url: String,

    /// Release host base URL. Assets are fetched from
    /// `{release_base}/releases/download/{tag}/{binary_name}-{os}-{arch}`.
    #[serde(default = "default_release_base")]
    pub release_base: String,

    /// Asset name prefix on the release host.
    #[serde(default = "default_binary_name")]
    pub binary_name: String,

    /// Draw a progress bar when stdout is a terminal.
    ///
    /// When `false` the plain two-line status output is used everywhere.
    #[serde(default = "default_show_progress")]
    pub show_progress: bool,
}

impl Default for UpdateConfig {
    fn default() -> Self {
        Self {
            version_url: default_version_url(),
            release_base: default_release_base(),
            binary_name: default_binary_name(),
            show_progress: default_show_progress(),
        }
    }
}

fn default_version_url() -> String {
    DEFAULT_VERSION_URL.to_string()
}

fn default_release_base() -> String {
    DEFAULT_RELEASE_BASE.to_string()
}

fn default_binary_name() -> String {
    BINARY_NAME.to_string()
}

const fn default_show_progress() -> bool {
    true
}

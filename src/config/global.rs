//! Global configuration management for selfup.
//!
//! The global configuration file (`~/.selfup/config.toml`) lets users and
//! mirrors point the updater at different endpoints without rebuilding.
//!
//! # Configuration File Location
//!
//! - **Unix/macOS**: `~/.selfup/config.toml`
//! - **Windows**: `%LOCALAPPDATA%\selfup\config.toml`
//!
//! The location can be overridden using the `SELFUP_CONFIG_PATH` environment
//! variable or the global `--config` flag. A missing file means defaults.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use tokio::fs;
use tracing::debug;

use super::update::UpdateConfig;
use crate::constants::CONFIG_PATH_ENV;
use crate::core::SelfupError;

/// Global configuration for selfup.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct GlobalConfig {
    /// Endpoint and presentation settings for `update-self`.
    #[serde(default)]
    pub update: UpdateConfig,
}

impl GlobalConfig {
    /// Load from `SELFUP_CONFIG_PATH` or the default location.
    pub async fn load() -> Result<Self, SelfupError> {
        Self::load_with_optional(None).await
    }

    /// Load from `path` when given, otherwise from the environment override or
    /// default location. A missing file yields the default configuration.
    pub async fn load_with_optional(path: Option<PathBuf>) -> Result<Self, SelfupError> {
        let path = match path {
            Some(path) => Some(path),
            None => Self::default_path(),
        };

        match path {
            Some(path) if path.exists() => Self::load_from(&path).await,
            Some(path) => {
                debug!("No config file at {}, using defaults", path.display());
                Ok(Self::default())
            }
            None => {
                debug!("Unable to determine config location, using defaults");
                Ok(Self::default())
            }
        }
    }

    /// Parse the TOML file at `path`.
    pub async fn load_from(path: &Path) -> Result<Self, SelfupError> {
        let content = fs::read_to_string(path).await.map_err(|e| SelfupError::Config {
            path: path.to_path_buf(),
            reason: e.to_string(),
        })?;

        let config = toml::from_str(&content).map_err(|e| SelfupError::Config {
            path: path.to_path_buf(),
            reason: e.message().to_string(),
        })?;
        debug!("Loaded config from {}", path.display());
        Ok(config)
    }

    /// Resolve the config file location.
    ///
    /// `SELFUP_CONFIG_PATH` wins; otherwise the platform default.
    pub fn default_path() -> Option<PathBuf> {
        if let Some(path) = std::env::var_os(CONFIG_PATH_ENV) {
            return Some(PathBuf::from(path));
        }

        let config_dir = if cfg!(target_os = "windows") {
            dirs::data_local_dir()?.join("selfup")
        } else {
            dirs::home_dir()?.join(".selfup")
        };

        Some(config_dir.join("config.toml"))
    }
}

//! Command-line interface for selfup.
//!
//! # Available Commands
//!
//! - `update-self` - Replace the running binary with a published release
//!
//! # Global Options
//!
//! - `-v, --verbose` - Debug logging on stderr
//! - `-q, --quiet` - No logging at all
//! - `-c, --config <PATH>` - Use a different global config file
//! - `--no-progress` - Print plain status lines instead of a progress bar
//!
//! ```bash
//! selfup update-self
//! selfup update-self --fetch-version nightly
//! selfup --no-progress update-self --fetch-version 0.27.1
//! selfup --version
//! ```
//!
//! `RUST_LOG` overrides the level chosen by `--verbose`/`--quiet`.

pub mod update_self;

use std::path::PathBuf;

use anyhow::Result;
use clap::{Parser, Subcommand};

/// Runtime configuration derived from the global flags.
///
/// Built by [`Cli::build_config`] and handed to commands, so tests can
/// construct one directly without touching the process environment.
///
/// # Examples
///
/// ```rust
/// use selfup_cli::cli::CliConfig;
///
/// let config = CliConfig {
///     no_progress: true,
///     config_path: Some("/etc/selfup/config.toml".into()),
///     ..CliConfig::new()
/// };
/// assert_eq!(config.log_level, None);
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CliConfig {
    /// Tracing filter directive, `None` to disable logging.
    pub log_level: Option<String>,

    /// Force the plain two-line presentation.
    pub no_progress: bool,

    /// Explicit global config file path.
    pub config_path: Option<PathBuf>,
}

impl CliConfig {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

/// Root command.
#[derive(Parser, Debug)]
#[command(
    name = "selfup",
    about = "Keep the selfup executable up to date",
    version,
    long_about = "selfup replaces its own executable with a published release and restarts into it."
)]
pub struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Show debug logs on stderr
    #[arg(short, long, global = true, conflicts_with = "quiet")]
    verbose: bool,

    /// Suppress all logging
    #[arg(short, long, global = true)]
    quiet: bool,

    /// Path to the global config file (default: ~/.selfup/config.toml)
    #[arg(short, long, global = true, value_name = "PATH")]
    config: Option<PathBuf>,

    /// Disable progress bars
    #[arg(long, global = true)]
    no_progress: bool,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Update the running selfup binary to another release.
    ///
    /// Downloads the release next to the executable, swaps it in atomically
    /// and re-executes it with `--version`.
    UpdateSelf(update_self::UpdateSelfCommand),
}

impl Cli {
    /// Execute with the configuration implied by the parsed flags.
    pub async fn execute(self) -> Result<()> {
        let config = self.build_config();
        self.execute_with_config(config).await
    }

    /// Translate the global flags into a [`CliConfig`].
    ///
    /// `--verbose` selects `debug`, `--quiet` disables logging, otherwise only
    /// warnings are logged so the command's own output stays clean.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use clap::Parser;
    /// use selfup_cli::cli::Cli;
    ///
    /// let cli = Cli::parse_from(["selfup", "--verbose", "update-self"]);
    /// assert_eq!(cli.build_config().log_level.as_deref(), Some("debug"));
    /// ```
    #[must_use]
    pub fn build_config(&self) -> CliConfig {
        let log_level = if self.verbose {
            Some("debug".to_string())
        } else if self.quiet {
            None
        } else {
            Some("warn".to_string())
        };

        CliConfig {
            log_level,
            no_progress: self.no_progress,
            config_path: self.config.clone(),
        }
    }

    pub async fn execute_with_config(self, config: CliConfig) -> Result<()> {
        match self.command {
            Commands::UpdateSelf(cmd) => cmd.execute(&config).await,
        }
    }
}

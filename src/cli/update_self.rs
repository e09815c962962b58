//! The `update-self` command.
//!
//! ```bash
//! selfup update-self                            # newest stable release
//! selfup update-self --fetch-version nightly    # rolling nightly build
//! selfup update-self --fetch-version 0.27.1     # release tag v0.27.1
//! ```
//!
//! On success the process is replaced by the new binary running `--version`,
//! so the last line printed is `Updated to: selfup <version>`.

use anyhow::{Context, Result};
use clap::Args;
use tracing::debug;

use super::CliConfig;
use crate::config::GlobalConfig;
use crate::constants::LATEST_TOKEN;
use crate::core::SelfupError;
use crate::update::{BuildInfo, ExecHandoff, SelfUpdater, UpdateRequest};
use crate::utils::HttpFetcher;

/// Arguments of `selfup update-self`.
#[derive(Args, Debug)]
pub struct UpdateSelfCommand {
    /// Version to install: `latest`, `nightly` or a version like `0.27.1`
    #[arg(long, value_name = "VERSION", default_value = LATEST_TOKEN)]
    pub fetch_version: String,

    /// Rejected; captured so they can be reported
    #[arg(hide = true)]
    pub args: Vec<String>,
}

impl UpdateSelfCommand {
    /// Reject stray positional arguments.
    pub fn validate(&self) -> Result<(), SelfupError> {
        if self.args.is_empty() {
            Ok(())
        } else {
            Err(SelfupError::Usage {
                args: self.args.join(" "),
            })
        }
    }

    pub async fn execute(self, config: &CliConfig) -> Result<()> {
        self.validate()?;

        let mut global = GlobalConfig::load_with_optional(config.config_path.clone()).await?;
        if config.no_progress {
            global.update.show_progress = false;
        }
        debug!("Update endpoints: {:?}", global.update);

        let fetcher = HttpFetcher::new().context("Failed to initialize HTTP client")?;
        let mut updater = SelfUpdater::new(
            fetcher,
            ExecHandoff::selfup(),
            BuildInfo::current(),
            global.update,
        );

        let request = UpdateRequest::new(&self.fetch_version);
        let mut stdout = std::io::stdout();
        match updater.run(&request, &mut stdout).await {
            Ok(never) => match never {},
            Err(e) => Err(e.into()),
        }
    }
}

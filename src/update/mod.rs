//! Self-update of the running selfup executable.
//!
//! `selfup update-self` replaces the binary on disk with a published release
//! and then turns the running process into the new binary.
//!
//! # Components
//!
//! - [`VersionResolver`]: maps `latest`, `nightly` or an explicit version to a
//!   release tag and download URL
//! - [`AtomicInstaller`]: downloads into a staging file beside the executable
//!   and renames it over the executable
//! - [`ProcessHandoff`]: execs the installed binary with `--version`
//! - [`SelfUpdater`]: runs the three in order and tracks the [`UpdatePhase`]
//!
//! # Update Flow
//!
//! ```text
//! Idle
//!  └─► Validating    locate executable, resolve symlinks, require standalone build
//!       └─► Resolving      token → tag → download URL (one request for `latest`)
//!            └─► Downloading    stream into .selfup-staging.XXXXXX beside the binary
//!                 └─► Committing     copy permissions, fsync, rename over the binary
//!                      └─► HandingOff      exec <binary> --version
//! ```
//!
//! Validation runs before resolution, so an ineligible build makes no network
//! requests. Every failure before `Committing` completes leaves the installed
//! binary byte-for-byte unchanged.
//!
//! # Examples
//!
//! ```rust,no_run
//! use selfup_cli::config::UpdateConfig;
//! use selfup_cli::update::{BuildInfo, ExecHandoff, SelfUpdater, UpdateRequest};
//! use selfup_cli::utils::HttpFetcher;
//!
//! # async fn example() -> anyhow::Result<()> {
//! let mut updater = SelfUpdater::new(
//!     HttpFetcher::new()?,
//!     ExecHandoff::selfup(),
//!     BuildInfo::current(),
//!     UpdateConfig::default(),
//! );
//! let request = UpdateRequest::new("nightly");
//! // Only returns on failure
//! let err = updater.run(&request, &mut std::io::stdout()).await.unwrap_err();
//! eprintln!("{err}");
//! # Ok(())
//! # }
//! ```

pub mod build_info;
pub mod handoff;
pub mod installer;
pub mod resolver;

use std::convert::Infallible;
use std::fmt;
use std::io::Write;
use std::path::PathBuf;

use tracing::{debug, info};

use crate::config::UpdateConfig;
use crate::core::SelfupError;
use crate::utils::http::Fetcher;

pub use build_info::{BuildInfo, Platform};
pub use handoff::{ExecHandoff, ProcessHandoff};
pub use installer::{AtomicInstaller, ExecutableImage, Presentation, StagingFile};
pub use resolver::{ResolvedRelease, VersionResolver, VersionToken};

/// Step of the update operation most recently entered.
///
/// After a failed [`SelfUpdater::run`] the phase names the step that failed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UpdatePhase {
    Idle,
    Validating,
    Resolving,
    Downloading,
    Committing,
    HandingOff,
}

impl fmt::Display for UpdatePhase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Idle => "idle",
            Self::Validating => "validating",
            Self::Resolving => "resolving",
            Self::Downloading => "downloading",
            Self::Committing => "committing",
            Self::HandingOff => "handing off",
        };
        f.write_str(name)
    }
}

/// A request to update to a given version token.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UpdateRequest {
    token: VersionToken,
}

impl UpdateRequest {
    /// `raw` is `latest`, `nightly` or a bare version. Empty means `latest`.
    pub fn new(raw: &str) -> Self {
        Self {
            token: VersionToken::parse(raw),
        }
    }

    pub fn token(&self) -> &VersionToken {
        &self.token
    }
}

/// Drives one self-update from version token to process hand-off.
pub struct SelfUpdater<F, H> {
    fetcher: F,
    handoff: H,
    build: BuildInfo,
    config: UpdateConfig,
    executable: Option<PathBuf>,
    presentation: Presentation,
    phase: UpdatePhase,
}

impl<F: Fetcher, H: ProcessHandoff> SelfUpdater<F, H> {
    /// Create an updater for the running executable.
    ///
    /// The presentation mode is detected from the terminal and
    /// `config.show_progress`; override it with [`Self::with_presentation`].
    ///
    /// # Arguments
    ///
    /// * `fetcher` - Transport for the version lookup and the download
    /// * `handoff` - How to become the new binary once it is installed
    /// * `build` - Facts about the running build, usually [`BuildInfo::current`]
    /// * `config` - Endpoints and asset naming from the `[update]` table
    ///
    /// # Examples
    ///
    /// ```rust,no_run
    /// use selfup_cli::config::UpdateConfig;
    /// use selfup_cli::update::{BuildInfo, ExecHandoff, Presentation, SelfUpdater, UpdatePhase};
    /// use selfup_cli::utils::HttpFetcher;
    ///
    /// # fn example() -> anyhow::Result<()> {
    /// let updater = SelfUpdater::new(
    ///     HttpFetcher::new()?,
    ///     ExecHandoff::selfup(),
    ///     BuildInfo::current(),
    ///     UpdateConfig::default(),
    /// )
    /// .with_executable("/usr/local/bin/selfup")
    /// .with_presentation(Presentation::Plain);
    ///
    /// assert_eq!(updater.phase(), UpdatePhase::Idle);
    /// # Ok(())
    /// # }
    /// ```
    pub fn new(fetcher: F, handoff: H, build: BuildInfo, config: UpdateConfig) -> Self {
        let presentation = Presentation::detect(config.show_progress);
        Self {
            fetcher,
            handoff,
            build,
            config,
            executable: None,
            presentation,
            phase: UpdatePhase::Idle,
        }
    }

    /// Update the file at `path` instead of the running executable.
    #[must_use]
    pub fn with_executable(mut self, path: impl Into<PathBuf>) -> Self {
        self.executable = Some(path.into());
        self
    }

    #[must_use]
    pub fn with_presentation(mut self, presentation: Presentation) -> Self {
        self.presentation = presentation;
        self
    }

    pub fn phase(&self) -> UpdatePhase {
        self.phase
    }

    pub fn fetcher(&self) -> &F {
        &self.fetcher
    }

    pub fn handoff(&self) -> &H {
        &self.handoff
    }

    /// Run the update, writing status lines to `out`.
    ///
    /// Never returns `Ok`: on success the process becomes the new binary.
    pub async fn run<W: Write>(
        &mut self,
        request: &UpdateRequest,
        out: &mut W,
    ) -> Result<Infallible, SelfupError> {
        let result = self.run_phases(request, out).await;
        if let Err(e) = &result {
            debug!("Self-update failed while {}: {}", self.phase, e);
        }
        result
    }

    async fn run_phases<W: Write>(
        &mut self,
        request: &UpdateRequest,
        out: &mut W,
    ) -> Result<Infallible, SelfupError> {
        let installer = AtomicInstaller::new(&self.fetcher, &self.build, self.presentation);

        self.phase = UpdatePhase::Validating;
        debug!("Validating {} build {}", self.build.platform, self.build.version);
        let image = installer.preflight(self.executable.as_deref())?;

        self.phase = UpdatePhase::Resolving;
        let resolver = VersionResolver::new(&self.fetcher, &self.config, &self.build.platform);
        let release = resolver.resolve(request.token()).await?;
        info!("Updating {} to {}", image.path().display(), release.tag());
        if is_same_version(&self.build.version, release.tag()) {
            info!("Version {} is already running, reinstalling", self.build.version);
        }

        self.phase = UpdatePhase::Downloading;
        let staging = installer.stage(&image, &release, out).await?;

        self.phase = UpdatePhase::Committing;
        installer.commit(staging, &image, out)?;

        self.phase = UpdatePhase::HandingOff;
        let _ = write!(out, "Updated to: ");
        let _ = out.flush();
        self.handoff.exec(image.path())
    }
}

/// Compare the running version with a release tag, ignoring a `v` prefix.
fn is_same_version(current: &str, tag: &str) -> bool {
    let tag = tag.strip_prefix('v').unwrap_or(tag);
    match (semver::Version::parse(current), semver::Version::parse(tag)) {
        (Ok(current), Ok(tag)) => current == tag,
        _ => false,
    }
}

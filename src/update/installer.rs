//! Atomic replacement of the running executable.
//!
//! The replacement is always downloaded into a [`StagingFile`] created in the
//! executable's own directory and then renamed over the executable. Because
//! both names live on one filesystem the rename is atomic: the executable
//! path holds either the complete old image or the complete new one.
//!
//! ```text
//! preflight ──► create staging ──► download into staging ──► copy perms ──► rename
//!     │               │                     │                                  │
//! PathResolution   TempFile             Download                            Commit
//! NotSupported
//! ```

use std::io::{IsTerminal, Write};
use std::path::{Path, PathBuf};

use tempfile::NamedTempFile;
use tracing::{debug, info};

use super::build_info::BuildInfo;
use super::resolver::ResolvedRelease;
use crate::constants::STAGING_PREFIX;
use crate::core::SelfupError;
use crate::utils::http::Fetcher;
use crate::utils::progress::{ProgressBar, is_progress_disabled};

/// The on-disk file backing the running process.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExecutableImage {
    path: PathBuf,
    dir: PathBuf,
}

impl ExecutableImage {
    /// Locate the running executable via the platform's current-exe
    /// primitive, never `argv[0]`, and resolve symlinks.
    pub fn current() -> Result<Self, SelfupError> {
        let exe = std::env::current_exe().map_err(|source| SelfupError::PathResolution {
            operation: "determine the path to the running executable".to_string(),
            source,
        })?;
        Self::resolve(&exe)
    }

    /// Canonicalize `path` into an [`ExecutableImage`].
    pub fn resolve(path: &Path) -> Result<Self, SelfupError> {
        let resolve_err = |source| SelfupError::PathResolution {
            operation: format!("resolve symlinks in {}", path.display()),
            source,
        };

        let canonical = std::fs::canonicalize(path).map_err(resolve_err)?;
        let metadata = std::fs::metadata(&canonical).map_err(resolve_err)?;
        if !metadata.is_file() {
            return Err(resolve_err(std::io::Error::new(
                std::io::ErrorKind::InvalidInput,
                format!("{} is not a regular file", canonical.display()),
            )));
        }

        let dir = canonical.parent().map(Path::to_path_buf).ok_or_else(|| {
            resolve_err(std::io::Error::new(
                std::io::ErrorKind::InvalidInput,
                "executable has no parent directory",
            ))
        })?;

        Ok(Self {
            path: canonical,
            dir,
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Directory holding the executable; staging files are created here.
    pub fn dir(&self) -> &Path {
        &self.dir
    }
}

/// Temporary file receiving the download before it is committed.
///
/// Dropping a `StagingFile` deletes it, so every exit path that does not
/// reach [`StagingFile::commit`] leaves nothing behind.
#[derive(Debug)]
pub struct StagingFile {
    file: NamedTempFile,
}

impl StagingFile {
    /// Create a fresh staging file in `dir`, named `{STAGING_PREFIX}<random>`.
    pub fn create_in(dir: &Path) -> Result<Self, SelfupError> {
        let file = tempfile::Builder::new().prefix(STAGING_PREFIX).tempfile_in(dir).map_err(
            |source| SelfupError::TempFile {
                dir: dir.to_path_buf(),
                source,
            },
        )?;
        debug!("Created staging file {}", file.path().display());
        Ok(Self { file })
    }

    pub fn path(&self) -> &Path {
        self.file.path()
    }

    /// Give the staged binary the executable's permissions and rename it
    /// over the executable.
    ///
    /// On failure the staging file is removed and the executable is left as
    /// it was.
    pub fn commit(self, image: &ExecutableImage) -> Result<(), SelfupError> {
        let commit_err = |source| SelfupError::Commit {
            path: image.path().to_path_buf(),
            source,
        };

        let permissions = std::fs::metadata(image.path()).map_err(commit_err)?.permissions();
        std::fs::set_permissions(self.path(), permissions).map_err(commit_err)?;
        self.file.as_file().sync_all().map_err(commit_err)?;

        // PersistError hands the temp file back; dropping it removes the path.
        self.file.persist(image.path()).map_err(|e| commit_err(e.error))?;
        sync_dir(image.dir());
        info!("Installed new binary at {}", image.path().display());
        Ok(())
    }
}

/// Flush the directory entry so the rename survives a crash.
///
/// The rename already happened, so a failure here is only logged.
#[cfg(unix)]
fn sync_dir(dir: &Path) {
    if let Err(e) = std::fs::File::open(dir).and_then(|d| d.sync_all()) {
        tracing::warn!("Failed to sync directory {}: {}", dir.display(), e);
    }
}

#[cfg(not(unix))]
fn sync_dir(_dir: &Path) {}

/// How download progress is shown.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Presentation {
    /// Two status lines around a plain download.
    Plain,
    /// A byte progress bar.
    Progress,
}

impl Presentation {
    /// Use a progress bar only when stdout is a terminal, progress is enabled
    /// in config and `SELFUP_NO_PROGRESS` is unset.
    #[must_use]
    pub fn detect(show_progress: bool) -> Self {
        if show_progress && !is_progress_disabled() && std::io::stdout().is_terminal() {
            Self::Progress
        } else {
            Self::Plain
        }
    }
}

/// Stages and commits the replacement binary.
pub struct AtomicInstaller<'a, F> {
    fetcher: &'a F,
    build: &'a BuildInfo,
    presentation: Presentation,
}

impl<'a, F: Fetcher> AtomicInstaller<'a, F> {
    /// Borrow the transport and build facts for one update.
    ///
    /// `presentation` is usually [`Presentation::detect`].
    pub fn new(fetcher: &'a F, build: &'a BuildInfo, presentation: Presentation) -> Self {
        Self {
            fetcher,
            build,
            presentation,
        }
    }

    /// Check every precondition that must hold before touching the network.
    ///
    /// `executable` overrides the current-exe lookup. Performs no writes.
    pub fn preflight(&self, executable: Option<&Path>) -> Result<ExecutableImage, SelfupError> {
        let image = match executable {
            Some(path) => ExecutableImage::resolve(path)?,
            None => ExecutableImage::current()?,
        };
        debug!("Running executable resolved to {}", image.path().display());

        if !self.build.standalone {
            return Err(SelfupError::NotSupported);
        }
        Ok(image)
    }

    /// Download `release` into a new staging file next to `image`.
    ///
    /// In [`Presentation::Plain`] mode writes `Downloading: <url>` to `out`
    /// first. The returned file is not committed yet.
    pub async fn stage<W: Write>(
        &self,
        image: &ExecutableImage,
        release: &ResolvedRelease,
        out: &mut W,
    ) -> Result<StagingFile, SelfupError> {
        let staging = StagingFile::create_in(image.dir())?;
        let url = release.download_url();
        let download_err = |source| SelfupError::Download {
            url: url.to_string(),
            source,
        };

        match self.presentation {
            Presentation::Plain => {
                let _ = writeln!(out, "Downloading: {url}");
                let _ = out.flush();
                let bytes = self
                    .fetcher
                    .download_to(url, staging.path(), None)
                    .await
                    .map_err(download_err)?;
                debug!("Downloaded {} bytes", bytes);
            }
            Presentation::Progress => {
                let bar = ProgressBar::download(release.asset_name());
                match self.fetcher.download_to(url, staging.path(), Some(&bar)).await {
                    Ok(bytes) => {
                        bar.finish_with_message(release.tag().to_string());
                        debug!("Downloaded {} bytes", bytes);
                    }
                    Err(source) => {
                        bar.abandon();
                        return Err(download_err(source));
                    }
                }
            }
        }

        Ok(staging)
    }

    /// Rename `staging` over the executable. In [`Presentation::Plain`] mode
    /// writes `Downloaded to: <path>` to `out` afterwards.
    pub fn commit<W: Write>(
        &self,
        staging: StagingFile,
        image: &ExecutableImage,
        out: &mut W,
    ) -> Result<(), SelfupError> {
        staging.commit(image)?;
        if self.presentation == Presentation::Plain {
            let _ = writeln!(out, "Downloaded to: {}", image.path().display());
        }
        Ok(())
    }

    /// Stage and commit in one step.
    ///
    /// On error the executable at `image` still holds the previous binary and
    /// no staging file is left in its directory.
    ///
    /// # Arguments
    ///
    /// * `image` - The executable to replace, from [`AtomicInstaller::preflight`]
    /// * `release` - Where to download the replacement from
    /// * `out` - Receives the plain-mode status lines
    ///
    /// # Examples
    ///
    /// ```rust,no_run
    /// use selfup_cli::config::UpdateConfig;
    /// use selfup_cli::update::{AtomicInstaller, BuildInfo, Presentation, VersionResolver, VersionToken};
    /// use selfup_cli::utils::HttpFetcher;
    ///
    /// # async fn example() -> anyhow::Result<()> {
    /// let fetcher = HttpFetcher::new()?;
    /// let build = BuildInfo::current();
    /// let config = UpdateConfig::default();
    ///
    /// let installer = AtomicInstaller::new(&fetcher, &build, Presentation::Plain);
    /// let image = installer.preflight(None)?;
    /// let release = VersionResolver::new(&fetcher, &config, &build.platform)
    ///     .resolve(&VersionToken::Nightly)
    ///     .await?;
    ///
    /// installer.install(&image, &release, &mut std::io::stdout()).await?;
    /// # Ok(())
    /// # }
    /// ```
    pub async fn install<W: Write>(
        &self,
        image: &ExecutableImage,
        release: &ResolvedRelease,
        out: &mut W,
    ) -> Result<(), SelfupError> {
        let staging = self.stage(image, release, out).await?;
        self.commit(staging, image, out)
    }
}

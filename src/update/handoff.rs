//! Handing the process over to the freshly installed binary.

use std::convert::Infallible;
use std::path::Path;
use std::process::Command;

use tracing::debug;

use crate::constants::{BINARY_NAME, HANDOFF_VERIFY_ARG};
use crate::core::SelfupError;

/// Replaces the current process image with the binary at a path.
///
/// Implementations never return on success.
pub trait ProcessHandoff {
    fn exec(&self, path: &Path) -> Result<Infallible, SelfupError>;
}

/// Re-executes the installed binary as `<program_name> --version`.
///
/// On Unix the process image is replaced in place, keeping the pid. Other
/// platforms run the new binary as a child and exit with its status.
#[derive(Debug, Clone)]
pub struct ExecHandoff {
    program_name: String,
}

impl ExecHandoff {
    /// `program_name` becomes `argv[0]` of the new process.
    pub fn new(program_name: impl Into<String>) -> Self {
        Self {
            program_name: program_name.into(),
        }
    }

    /// Hand off as the published binary name, [`BINARY_NAME`].
    ///
    /// # Examples
    ///
    /// ```rust
    /// use selfup_cli::update::ExecHandoff;
    ///
    /// assert_eq!(ExecHandoff::selfup().program_name(), "selfup");
    /// ```
    pub fn selfup() -> Self {
        Self::new(BINARY_NAME)
    }

    pub fn program_name(&self) -> &str {
        &self.program_name
    }
}

impl ProcessHandoff for ExecHandoff {
    #[cfg(unix)]
    fn exec(&self, path: &Path) -> Result<Infallible, SelfupError> {
        use std::os::unix::process::CommandExt;

        debug!("exec {} {} (argv[0]={})", path.display(), HANDOFF_VERIFY_ARG, self.program_name);
        let source = Command::new(path).arg0(&self.program_name).arg(HANDOFF_VERIFY_ARG).exec();
        Err(SelfupError::Handoff {
            path: path.to_path_buf(),
            source,
        })
    }

    #[cfg(not(unix))]
    fn exec(&self, path: &Path) -> Result<Infallible, SelfupError> {
        debug!("spawn {} {}", path.display(), HANDOFF_VERIFY_ARG);
        let status = Command::new(path).arg(HANDOFF_VERIFY_ARG).status().map_err(|source| {
            SelfupError::Handoff {
                path: path.to_path_buf(),
                source,
            }
        })?;
        std::process::exit(status.code().unwrap_or(1))
    }
}

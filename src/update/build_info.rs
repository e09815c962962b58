//! Facts about the running build that decide whether and what to update.

use std::fmt;

/// Operating system and CPU architecture in release-asset naming.
///
/// Release assets follow the `{os}-{arch}` convention used by most
/// cross-compiled release pipelines (`linux-amd64`, `darwin-arm64`, ...),
/// which differs from Rust's `std::env::consts` names for a few targets.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Platform {
    pub os: String,
    pub arch: String,
}

impl Platform {
    /// The platform this binary was compiled for.
    #[must_use]
    pub fn current() -> Self {
        Self::from_rust(std::env::consts::OS, std::env::consts::ARCH)
    }

    /// Map Rust target identifiers onto release-asset identifiers.
    #[must_use]
    pub fn from_rust(os: &str, arch: &str) -> Self {
        let os = match os {
            "macos" => "darwin",
            other => other,
        };
        let arch = match arch {
            "x86_64" => "amd64",
            "aarch64" => "arm64",
            "x86" => "386",
            other => other,
        };
        Self {
            os: os.to_string(),
            arch: arch.to_string(),
        }
    }
}

impl fmt::Display for Platform {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}-{}", self.os, self.arch)
    }
}

/// Build-time capabilities of the running executable.
///
/// `standalone` is the self-replacement capability. It is a plain field so
/// tests can construct non-standalone builds without recompiling.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BuildInfo {
    /// Version of the running binary (`CARGO_PKG_VERSION`).
    pub version: String,
    /// Whether this build ships as a single executable that may overwrite itself.
    pub standalone: bool,
    /// Platform used to pick the release asset.
    pub platform: Platform,
}

impl BuildInfo {
    /// Describe the running build. `standalone` follows the cargo feature of
    /// the same name.
    #[must_use]
    pub fn current() -> Self {
        Self {
            version: env!("CARGO_PKG_VERSION").to_string(),
            standalone: cfg!(feature = "standalone"),
            platform: Platform::current(),
        }
    }

    #[must_use]
    pub fn with_standalone(mut self, standalone: bool) -> Self {
        self.standalone = standalone;
        self
    }

    #[must_use]
    pub fn with_platform(mut self, platform: Platform) -> Self {
        self.platform = platform;
        self
    }
}

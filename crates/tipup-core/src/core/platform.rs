use std::env;

use crate::core::errors::InstallError;

/// Closed classification of the platforms the build procedure knows about.
///
/// Every platform-specific choice (build script, home-directory strategy,
/// bootstrap detection, environment key casing) consumes this variant
/// instead of branching on `env::consts::OS` by convention.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Platform {
    /// Unix-like systems built with the shell script.
    DefaultUnix,
    /// The console-only system built with the batch script.
    ConsoleOnly,
    /// The rare specialized system with its own shell variant.
    Specialized,
}

impl Platform {
    /// Classifies the platform this process is running on.
    ///
    /// # Errors
    /// Returns [`InstallError::UnsupportedPlatform`] when the operating
    /// system is not one the build procedure supports.
    pub fn current() -> Result<Self, InstallError> {
        Self::classify(env::consts::OS)
    }

    /// # Errors
    /// Returns [`InstallError::UnsupportedPlatform`] for operating systems
    /// without a build procedure; never silently defaults.
    pub fn classify(os: &str) -> Result<Self, InstallError> {
        match os {
            "windows" => Ok(Platform::ConsoleOnly),
            "plan9" => Ok(Platform::Specialized),
            "linux" | "macos" | "ios" | "android" | "freebsd" | "netbsd" | "openbsd"
            | "dragonfly" | "solaris" | "illumos" | "aix" => Ok(Platform::DefaultUnix),
            other => Err(InstallError::UnsupportedPlatform(other.to_string())),
        }
    }

    /// Name of the build script under `<root>/src`.
    #[must_use]
    pub fn make_script(self) -> &'static str {
        match self {
            Platform::DefaultUnix => "make.bash",
            Platform::ConsoleOnly => "make.bat",
            Platform::Specialized => "make.rc",
        }
    }

    #[must_use]
    pub fn exe_suffix(self) -> &'static str {
        match self {
            Platform::ConsoleOnly => ".exe",
            _ => "",
        }
    }

    /// Whether subprocess environments on this platform resolve keys
    /// case-insensitively.
    #[must_use]
    pub fn case_insensitive_env(self) -> bool {
        self == Platform::ConsoleOnly
    }

    #[must_use]
    pub fn path_list_separator(self) -> char {
        match self {
            Platform::ConsoleOnly => ';',
            _ => ':',
        }
    }
}

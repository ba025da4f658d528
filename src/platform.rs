//! Host platform detection.
//!
//! The daemon connection strategy depends on the operating system the action
//! runs on. Detection accepts both Rust (`std::env::consts::OS`) and CI runner
//! style identifiers.

use std::fmt;

/// Operating system family the action is running on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Platform {
    /// Microsoft Windows.
    Windows,
    /// Linux and any other unrecognised system.
    Linux,
    /// Apple macOS.
    Mac,
}

impl Platform {
    /// Detect the platform of the running process.
    #[must_use]
    pub fn detect() -> Self {
        Self::from_os_identifier(std::env::consts::OS)
    }

    /// Map an operating system identifier to a platform.
    ///
    /// `win32`/`windows` map to [`Platform::Windows`] and `darwin`/`macos` map
    /// to [`Platform::Mac`]. Everything else falls through to
    /// [`Platform::Linux`].
    #[must_use]
    pub fn from_os_identifier(os: &str) -> Self {
        match os {
            "win32" | "windows" => Self::Windows,
            "darwin" | "macos" => Self::Mac,
            _ => Self::Linux,
        }
    }

    /// Return the lowercase platform name used in diagnostics.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Windows => "windows",
            Self::Linux => "linux",
            Self::Mac => "mac",
        }
    }
}

impl fmt::Display for Platform {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

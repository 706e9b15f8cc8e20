/*!
 * Platform Capabilities
 * Runtime family detection resolved once at startup
 */

use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::OnceLock;

/// Family of the hosting runtime, derived from the compile-time target
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum RuntimeFamily {
    Unix,
    Windows,
    Unknown,
}

impl fmt::Display for RuntimeFamily {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RuntimeFamily::Unix => write!(f, "unix"),
            RuntimeFamily::Windows => write!(f, "windows"),
            RuntimeFamily::Unknown => write!(f, "unknown"),
        }
    }
}

/// Capability descriptor for the current platform
///
/// Resolved once and queried by the injector and the system-call interrupt
/// controller instead of scattering target checks through the call paths.
#[derive(Debug, Clone, Copy, Serialize)]
pub struct Platform {
    pub family: RuntimeFamily,
    pub os: &'static str,
}

static PLATFORM: OnceLock<Platform> = OnceLock::new();

impl Platform {
    /// Get the process-wide platform descriptor
    pub fn current() -> &'static Platform {
        PLATFORM.get_or_init(Self::detect)
    }

    fn detect() -> Self {
        let family = if cfg!(unix) {
            RuntimeFamily::Unix
        } else if cfg!(windows) {
            RuntimeFamily::Windows
        } else {
            RuntimeFamily::Unknown
        };

        Self {
            family,
            os: std::env::consts::OS,
        }
    }

    /// Whether pending-condition injection into registered threads is available
    pub fn supports_injection(&self) -> bool {
        matches!(self.family, RuntimeFamily::Unix | RuntimeFamily::Windows)
    }

    /// Whether the wake-signal path can break blocking system calls
    pub fn supports_wake_signal(&self) -> bool {
        self.family == RuntimeFamily::Unix
    }
}

//! Host platform classification.
//!
//! Detected once at startup and passed around as a value.

use serde::Serialize;
use std::fmt;
use std::str::FromStr;

/// Which leak probe, if any, applies to the host.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum PlatformFamily {
    /// macOS: capture sessions cannot leak OS resources, nothing to measure.
    Exempt,
    /// Linux and other Unix hosts: count open Unix sockets.
    Descriptors,
    /// Windows: count GDI objects.
    GuiHandles,
}

impl PlatformFamily {
    pub fn detect() -> Self {
        Self::from_os_name(std::env::consts::OS)
    }

    /// Maps a `std::env::consts::OS` value to its family.
    pub fn from_os_name(os: &str) -> Self {
        match os {
            "macos" => Self::Exempt,
            "windows" => Self::GuiHandles,
            _ => Self::Descriptors,
        }
    }

    pub fn is_exempt(self) -> bool {
        self == Self::Exempt
    }

    /// Why the family is exempt, if it is.
    pub fn skip_reason(self) -> Option<&'static str> {
        match self {
            Self::Exempt => Some("No possible leak on macOS."),
            Self::Descriptors | Self::GuiHandles => None,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Exempt => "exempt",
            Self::Descriptors => "descriptors",
            Self::GuiHandles => "gui-handles",
        }
    }
}

impl fmt::Display for PlatformFamily {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, thiserror::Error)]
#[error("Unknown platform family '{0}' (expected exempt, descriptors or gui-handles)")]
pub struct UnknownPlatform(pub String);

impl FromStr for PlatformFamily {
    type Err = UnknownPlatform;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "exempt" | "macos" => Ok(Self::Exempt),
            "descriptors" | "linux" => Ok(Self::Descriptors),
            "gui-handles" | "windows" => Ok(Self::GuiHandles),
            other => Err(UnknownPlatform(other.to_string())),
        }
    }
}

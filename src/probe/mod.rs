//! Resource probes — count OS resources attributed to this process.
//!
//! The harness only sees the `ResourceProbe` trait. Which concrete probe
//! runs is decided once from the platform family.

mod gdi_handles;
mod unix_sockets;

pub use gdi_handles::GdiHandleProbe;
pub use unix_sockets::{count_process_lines, UnixSocketProbe};

use crate::platform::PlatformFamily;
use serde::Serialize;
use std::fmt;
use std::path::PathBuf;

/// One sample from a probe.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(transparent)]
pub struct ResourceReading(pub u64);

impl fmt::Display for ResourceReading {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A zero-argument counter of OS resources held by the current process.
///
/// Two reads with no allocation or release in between must agree.
pub trait ResourceProbe {
    fn name(&self) -> &str;

    fn read(&self) -> Result<ResourceReading, ProbeError>;
}

/// Any counting closure is a probe, which is how tests script readings.
impl<F> ResourceProbe for F
where
    F: Fn() -> Result<u64, ProbeError>,
{
    fn name(&self) -> &str {
        "custom"
    }

    fn read(&self) -> Result<ResourceReading, ProbeError> {
        self().map(ResourceReading)
    }
}

/// Picks the probe for `family`. The exempt family has none.
pub fn select_probe(
    family: PlatformFamily,
    lsof_path: Option<PathBuf>,
) -> Result<Option<Box<dyn ResourceProbe>>, ProbeError> {
    let probe: Option<Box<dyn ResourceProbe>> = match family {
        PlatformFamily::Exempt => None,
        PlatformFamily::Descriptors => {
            let probe = match lsof_path {
                Some(path) => UnixSocketProbe::with_lsof(path),
                None => UnixSocketProbe::locate()?,
            };
            Some(Box::new(probe))
        }
        PlatformFamily::GuiHandles => Some(Box::new(GdiHandleProbe::new())),
    };

    if let Some(probe) = &probe {
        log::info!("[PROBE] Using {} probe for {} platform", probe.name(), family);
    }
    Ok(probe)
}

#[derive(Debug, thiserror::Error)]
pub enum ProbeError {
    #[error("'{tool}' not found on PATH: {reason}")]
    ToolNotFound { tool: &'static str, reason: String },

    #[error("Failed to run {tool}: {source}")]
    Spawn {
        tool: String,
        #[source]
        source: std::io::Error,
    },

    #[error("{tool} exited with status {status}: {stderr}")]
    NonZeroExit {
        tool: String,
        status: i32,
        stderr: String,
    },

    #[error("{probe} probe is not available on this platform")]
    Unsupported { probe: &'static str },

    #[error("OS call {call} failed: {reason}")]
    OsCall { call: &'static str, reason: String },
}

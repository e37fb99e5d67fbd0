//! Screen capture domain — public API.
//!
//! This module owns the capture session whose lifecycle is under test.
//! External code should only use the types and functions exported here.

mod region;
mod screenshot;
mod session;

pub use region::{crop_region, encode_png, CropError, Region};
pub use screenshot::XcapBackend;
pub use session::{with_session, CaptureSession};

use image::RgbaImage;

/// What a single capture call grabs.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CaptureTarget {
    /// The primary monitor (falls back to the first monitor).
    Primary,
    /// A monitor by its enumeration index.
    Monitor(usize),
    /// A rectangle of the primary monitor.
    Region(Region),
}

/// Source of display connections and pixels.
///
/// The session owns a `Handle` between `acquire` and `release`. What the
/// handle holds on to at the OS level is up to the backend; dropping it
/// without `release` falls back to the handle's own `Drop`.
pub trait CaptureBackend {
    type Handle;

    /// Opens the underlying display resource.
    fn acquire(&self) -> Result<Self::Handle, CaptureError>;

    /// Grabs full-monitor pixels for `target`. Region targets are cropped
    /// by the session, so backends only see `Primary` or `Monitor`.
    fn grab(&self, handle: &Self::Handle, target: CaptureTarget) -> Result<RgbaImage, CaptureError>;

    /// Returns the display resource to the OS.
    fn release(&self, handle: Self::Handle);
}

#[derive(Debug, thiserror::Error)]
pub enum CaptureError {
    #[error("Failed to enumerate monitors: {0}")]
    MonitorEnumeration(String),

    #[error("No monitor found")]
    NoMonitor,

    #[error("Monitor {index} not found ({available} available)")]
    InvalidMonitor { index: usize, available: usize },

    #[error("Screen capture failed: {0}")]
    CaptureFailed(String),

    #[error("Capture session is closed")]
    SessionClosed,

    #[error(transparent)]
    Crop(#[from] CropError),

    #[error("Failed to write screenshot: {0}")]
    Io(#[from] std::io::Error),
}

//! Full-screen capture using the `xcap` crate.
//!
//! This is the infrastructure layer — it talks to the OS.
//! The session handle is the enumerated monitor list. It is plain monitor
//! metadata: `xcap` opens and closes its own display connection inside
//! every enumeration and every capture, so releasing or dropping the
//! handle returns nothing to the OS.

use super::{CaptureBackend, CaptureError, CaptureTarget};
use image::RgbaImage;
use xcap::Monitor;

/// Real capture backend for the current host.
#[derive(Debug, Default, Clone, Copy)]
pub struct XcapBackend;

impl XcapBackend {
    pub fn new() -> Self {
        Self
    }

    fn pick<'a>(monitors: &'a [Monitor], target: CaptureTarget) -> Result<&'a Monitor, CaptureError> {
        match target {
            CaptureTarget::Monitor(index) => {
                monitors.get(index).ok_or(CaptureError::InvalidMonitor {
                    index,
                    available: monitors.len(),
                })
            }
            CaptureTarget::Primary | CaptureTarget::Region(_) => monitors
                .iter()
                .find(|m| m.is_primary().unwrap_or(false))
                // Fallback: if no monitor reports as primary, use the first one
                .or_else(|| monitors.first())
                .ok_or(CaptureError::NoMonitor),
        }
    }
}

impl CaptureBackend for XcapBackend {
    type Handle = Vec<Monitor>;

    fn acquire(&self) -> Result<Self::Handle, CaptureError> {
        let monitors =
            Monitor::all().map_err(|e| CaptureError::MonitorEnumeration(e.to_string()))?;
        if monitors.is_empty() {
            return Err(CaptureError::NoMonitor);
        }
        log::debug!("[SESSION] Acquired display with {} monitor(s)", monitors.len());
        Ok(monitors)
    }

    fn grab(&self, handle: &Self::Handle, target: CaptureTarget) -> Result<RgbaImage, CaptureError> {
        Self::pick(handle, target)?
            .capture_image()
            .map_err(|e| CaptureError::CaptureFailed(e.to_string()))
    }

    fn release(&self, handle: Self::Handle) {
        log::debug!("[SESSION] Releasing monitor list ({} monitor(s))", handle.len());
        drop(handle);
    }
}

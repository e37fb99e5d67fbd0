//! GDI object count via `GetGuiResources` (Win32).
//!
//! Only functional on Windows. Every screen grab goes through a device
//! context and a bitmap, so an unreleased session shows up here.

use super::{ProbeError, ResourceProbe, ResourceReading};

#[derive(Debug, Default, Clone, Copy)]
pub struct GdiHandleProbe;

impl GdiHandleProbe {
    pub fn new() -> Self {
        Self
    }
}

impl ResourceProbe for GdiHandleProbe {
    fn name(&self) -> &str {
        "gdi-handles"
    }

    fn read(&self) -> Result<ResourceReading, ProbeError> {
        let count = gdi_object_count(std::process::id())?;
        log::debug!("[PROBE] {} GDI object(s) in use", count);
        Ok(ResourceReading(u64::from(count)))
    }
}

#[cfg(target_os = "windows")]
fn gdi_object_count(pid: u32) -> Result<u32, ProbeError> {
    use windows::Win32::Foundation::CloseHandle;
    use windows::Win32::System::Threading::{
        GetGuiResources, OpenProcess, GR_GDIOBJECTS, PROCESS_QUERY_INFORMATION,
    };

    // Safety: the handle is only used within this function and closed
    // before returning, so it cannot outlive the process it refers to.
    unsafe {
        let process =
            OpenProcess(PROCESS_QUERY_INFORMATION, false, pid).map_err(|e| ProbeError::OsCall {
                call: "OpenProcess",
                reason: e.to_string(),
            })?;

        let count = GetGuiResources(process, GR_GDIOBJECTS);

        // The probe itself must not leak.
        if let Err(e) = CloseHandle(process) {
            log::warn!("[PROBE] CloseHandle failed: {}", e);
        }

        Ok(count)
    }
}

#[cfg(not(target_os = "windows"))]
fn gdi_object_count(_pid: u32) -> Result<u32, ProbeError> {
    Err(ProbeError::Unsupported {
        probe: "gdi-handles",
    })
}

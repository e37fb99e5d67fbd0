//! Capture session lifecycle.
//!
//! A session holds one backend handle from `open` until `close`. Closing
//! is idempotent. Dropping an open session does NOT run the backend's
//! explicit release; only `close` and `with_session` guarantee that.

use super::region::{crop_region, encode_png};
use super::{CaptureBackend, CaptureError, CaptureTarget};
use image::DynamicImage;
use std::path::{Path, PathBuf};

pub struct CaptureSession<'a, B: CaptureBackend> {
    backend: &'a B,
    handle: Option<B::Handle>,
}

impl<'a, B: CaptureBackend> CaptureSession<'a, B> {
    /// Acquires the backend's display resource eagerly.
    pub fn open(backend: &'a B) -> Result<Self, CaptureError> {
        let handle = backend.acquire()?;
        Ok(Self {
            backend,
            handle: Some(handle),
        })
    }

    pub fn is_open(&self) -> bool {
        self.handle.is_some()
    }

    /// Captures `target` and returns its pixels.
    pub fn capture(&self, target: CaptureTarget) -> Result<DynamicImage, CaptureError> {
        let handle = self.handle.as_ref().ok_or(CaptureError::SessionClosed)?;

        match target {
            CaptureTarget::Region(region) => {
                let full = self.backend.grab(handle, CaptureTarget::Primary)?;
                Ok(crop_region(&DynamicImage::ImageRgba8(full), region)?)
            }
            other => Ok(DynamicImage::ImageRgba8(self.backend.grab(handle, other)?)),
        }
    }

    /// Captures the primary monitor and writes it to `path` as PNG.
    pub fn shot(&self, path: impl AsRef<Path>) -> Result<PathBuf, CaptureError> {
        let path = path.as_ref();
        let image = self.capture(CaptureTarget::Primary)?;
        let png_bytes = encode_png(&image)?;
        std::fs::write(path, &png_bytes)?;

        log::info!(
            "[SESSION] Saved {}x{} screenshot to {} — {} bytes",
            image.width(),
            image.height(),
            path.display(),
            png_bytes.len()
        );
        Ok(path.to_path_buf())
    }

    /// Releases the display resource. Calling it again is a no-op.
    pub fn close(&mut self) {
        if let Some(handle) = self.handle.take() {
            self.backend.release(handle);
            log::debug!("[SESSION] Closed");
        }
    }
}

impl<B: CaptureBackend> Drop for CaptureSession<'_, B> {
    fn drop(&mut self) {
        if self.handle.is_some() {
            log::warn!("[SESSION] Dropped without close, display handle left to its own drop");
        }
    }
}

/// Closes the wrapped session on every exit path, unwinding included.
struct ScopedSession<'a, B: CaptureBackend>(CaptureSession<'a, B>);

impl<B: CaptureBackend> Drop for ScopedSession<'_, B> {
    fn drop(&mut self) {
        self.0.close();
    }
}

/// Scoped acquisition: opens a session, hands it to `f`, and closes it
/// exactly once however `f` exits.
pub fn with_session<'a, B, T, E, F>(backend: &'a B, f: F) -> Result<T, E>
where
    B: CaptureBackend,
    E: From<CaptureError>,
    F: FnOnce(&mut CaptureSession<'a, B>) -> Result<T, E>,
{
    let mut scoped = ScopedSession(CaptureSession::open(backend)?);
    f(&mut scoped.0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::capture::Region;
    use image::RgbaImage;
    use std::cell::Cell;

    /// Counts live handles; a handle is only returned by `release`.
    #[derive(Default)]
    struct CountingBackend {
        acquired: Cell<u32>,
        released: Cell<u32>,
        fail_grab: bool,
    }

    impl CountingBackend {
        fn live(&self) -> u32 {
            self.acquired.get() - self.released.get()
        }
    }

    impl CaptureBackend for CountingBackend {
        type Handle = u32;

        fn acquire(&self) -> Result<u32, CaptureError> {
            self.acquired.set(self.acquired.get() + 1);
            Ok(self.acquired.get())
        }

        fn grab(&self, _handle: &u32, _target: CaptureTarget) -> Result<RgbaImage, CaptureError> {
            if self.fail_grab {
                return Err(CaptureError::CaptureFailed("grab refused".to_string()));
            }
            Ok(RgbaImage::new(40, 30))
        }

        fn release(&self, _handle: u32) {
            self.released.set(self.released.get() + 1);
        }
    }

    #[test]
    fn close_twice_releases_once() {
        let backend = CountingBackend::default();
        let mut session = CaptureSession::open(&backend).unwrap();
        session.close();
        session.close();
        assert!(!session.is_open());
        assert_eq!(backend.released.get(), 1);
        assert_eq!(backend.live(), 0);
    }

    #[test]
    fn drop_without_close_skips_release() {
        let backend = CountingBackend::default();
        {
            let session = CaptureSession::open(&backend).unwrap();
            session.capture(CaptureTarget::Primary).unwrap();
        }
        assert_eq!(backend.live(), 1);
    }

    #[test]
    fn capture_after_close_fails() {
        let backend = CountingBackend::default();
        let mut session = CaptureSession::open(&backend).unwrap();
        session.close();
        let result = session.capture(CaptureTarget::Primary);
        assert!(matches!(result, Err(CaptureError::SessionClosed)));
    }

    #[test]
    fn region_capture_is_cropped() {
        let backend = CountingBackend::default();
        let session = CaptureSession::open(&backend).unwrap();
        let image = session
            .capture(CaptureTarget::Region(Region::new(5, 5, 10, 20)))
            .unwrap();
        assert_eq!((image.width(), image.height()), (10, 20));
    }

    #[test]
    fn region_outside_monitor_fails() {
        let backend = CountingBackend::default();
        let session = CaptureSession::open(&backend).unwrap();
        let result = session.capture(CaptureTarget::Region(Region::new(30, 0, 20, 10)));
        assert!(matches!(result, Err(CaptureError::Crop(_))));
    }

    #[test]
    fn scoped_session_releases_on_success() {
        let backend = CountingBackend::default();
        let size = with_session(&backend, |session| {
            let image = session.capture(CaptureTarget::Primary)?;
            Ok::<_, CaptureError>(image.width())
        })
        .unwrap();
        assert_eq!(size, 40);
        assert_eq!(backend.released.get(), 1);
    }

    #[test]
    fn scoped_session_releases_on_error() {
        let backend = CountingBackend {
            fail_grab: true,
            ..Default::default()
        };
        let result = with_session(&backend, |session| session.capture(CaptureTarget::Primary));
        assert!(matches!(result, Err(CaptureError::CaptureFailed(_))));
        assert_eq!(backend.released.get(), 1);
        assert_eq!(backend.live(), 0);
    }

    #[test]
    fn scoped_session_tolerates_inner_close() {
        let backend = CountingBackend::default();
        with_session(&backend, |session| {
            session.close();
            Ok::<_, CaptureError>(())
        })
        .unwrap();
        assert_eq!(backend.released.get(), 1);
    }
}

//! The four capture session usage patterns under test.
//!
//! Explicit or scoped release must bring the resource count back to
//! baseline. The release-less patterns are allowed to leak; they are
//! documented here, not fixed.

use crate::capture::{with_session, CaptureBackend, CaptureError, CaptureSession, CaptureTarget};
use serde::Serialize;
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Scenario {
    BoundWithoutClose,
    BoundWithClose,
    UnboundWithoutClose,
    ScopedAcquisition,
}

impl Scenario {
    /// Fixed table, in reporting order.
    pub const ALL: [Scenario; 4] = [
        Scenario::BoundWithoutClose,
        Scenario::BoundWithClose,
        Scenario::UnboundWithoutClose,
        Scenario::ScopedAcquisition,
    ];

    pub fn name(self) -> &'static str {
        match self {
            Self::BoundWithoutClose => "bound_without_close",
            Self::BoundWithClose => "bound_with_close",
            Self::UnboundWithoutClose => "unbound_without_close",
            Self::ScopedAcquisition => "scoped_acquisition",
        }
    }

    pub fn leaks_expected(self) -> bool {
        match self {
            Self::BoundWithoutClose | Self::UnboundWithoutClose => true,
            Self::BoundWithClose | Self::ScopedAcquisition => false,
        }
    }

    pub fn pattern(self) -> &'static str {
        match self {
            Self::BoundWithoutClose => "open, capture, let the session go out of scope",
            Self::BoundWithClose => "open, capture, close twice",
            Self::UnboundWithoutClose => "open and capture in one expression",
            Self::ScopedAcquisition => "open through with_session, released on every exit path",
        }
    }

    /// Executes the pattern once against `backend`.
    pub fn run<B: CaptureBackend>(self, backend: &B) -> Result<(), CaptureError> {
        match self {
            Self::BoundWithoutClose => bound_without_close(backend),
            Self::BoundWithClose => bound_with_close(backend),
            Self::UnboundWithoutClose => unbound_without_close(backend),
            Self::ScopedAcquisition => scoped_acquisition(backend),
        }
    }
}

impl fmt::Display for Scenario {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// The session falls out of scope still open.
fn bound_without_close<B: CaptureBackend>(backend: &B) -> Result<(), CaptureError> {
    let session = CaptureSession::open(backend)?;
    session.capture(CaptureTarget::Primary)?;
    Ok(())
}

fn bound_with_close<B: CaptureBackend>(backend: &B) -> Result<(), CaptureError> {
    let mut session = CaptureSession::open(backend)?;
    session.capture(CaptureTarget::Primary)?;
    session.close();
    // second close is a no-op
    session.close();
    Ok(())
}

/// The session is a temporary nobody can close.
fn unbound_without_close<B: CaptureBackend>(backend: &B) -> Result<(), CaptureError> {
    CaptureSession::open(backend)?.capture(CaptureTarget::Primary)?;
    Ok(())
}

fn scoped_acquisition<B: CaptureBackend>(backend: &B) -> Result<(), CaptureError> {
    with_session(backend, |session| session.capture(CaptureTarget::Primary).map(drop))
}

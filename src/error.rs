//! Crate-level error type.
//!
//! Domain errors live next to their modules and convert into
//! `HarnessError` with `?`.

use thiserror::Error;

pub use crate::capture::CaptureError;
pub use crate::config::ConfigError;
pub use crate::probe::ProbeError;

#[derive(Debug, Error)]
pub enum HarnessError {
    /// The OS introspection call itself failed.
    #[error("Probe error: {0}")]
    Probe(#[from] ProbeError),

    /// The scenario could not run its capture session.
    #[error("Capture error: {0}")]
    Capture(#[from] CaptureError),

    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// The finished report could not be rendered.
    #[error("Report error: {0}")]
    Report(#[from] serde_json::Error),
}

//! capture-leaks — resource leak harness for screen capture sessions.
//!
//! Wires together:
//! - Host classification (platform.rs)
//! - OS resource probes (probe/)
//! - Capture session domain (capture/)
//! - Scenario table, runner and suite (scenario.rs, harness.rs, suite.rs)

pub mod capture;
pub mod config;
pub mod error;
pub mod harness;
pub mod platform;
pub mod probe;
pub mod scenario;
pub mod suite;

pub use capture::{with_session, CaptureBackend, CaptureError, CaptureSession, CaptureTarget};
pub use config::HarnessConfig;
pub use error::HarnessError;
pub use harness::{measure, run_scenario, Measurement, Outcome, REPETITIONS};
pub use platform::PlatformFamily;
pub use probe::{select_probe, ProbeError, ResourceProbe, ResourceReading};
pub use scenario::Scenario;
pub use suite::{run_suite, CaseReport, CaseResult, SuiteReport};

/// Initialises `env_logger`, defaulting to `info` when `RUST_LOG` is unset.
///
/// Safe to call more than once; later calls are ignored.
pub fn init_logging() {
    let _ = env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"))
        .format_timestamp_millis()
        .try_init();
}

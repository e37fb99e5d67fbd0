//! Scenario runner: sample before, run, sample after.
//!
//! The runner never decides *why* a count moved. It samples the probe
//! after each execution and compares the peak with the baseline.

use crate::capture::CaptureBackend;
use crate::error::HarnessError;
use crate::probe::{ResourceProbe, ResourceReading};
use crate::scenario::Scenario;
use serde::Serialize;

/// Executions per scenario.
pub const REPETITIONS: usize = 5;

/// Probe readings for one scenario run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Measurement {
    pub baseline: ResourceReading,
    /// One reading after each execution, in order.
    pub samples: Vec<ResourceReading>,
    /// Running maximum of `samples`.
    pub peak: ResourceReading,
}

impl Measurement {
    /// Judges the readings against the scenario's expectation.
    ///
    /// A leaky scenario passes as an expected failure when the peak rose
    /// above baseline. A non-leaky one must never exceed baseline, not
    /// even transiently, so its peak has to equal it exactly.
    pub fn verdict(&self, leaks_expected: bool) -> Outcome {
        match (leaks_expected, self.peak > self.baseline) {
            (true, true) => Outcome::ExpectedFailure,
            (true, false) => Outcome::UnexpectedPass,
            (false, _) if self.peak == self.baseline => Outcome::Passed,
            (false, _) => Outcome::Failed,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Outcome {
    /// No growth where none was expected.
    Passed,
    /// A known leak reproduced. Tolerated.
    ExpectedFailure,
    /// A known leak no longer reproduces. Reported, not fatal.
    UnexpectedPass,
    /// Growth where none was expected.
    Failed,
}

impl Outcome {
    pub fn is_blocking(self) -> bool {
        self == Self::Failed
    }

    pub fn label(self) -> &'static str {
        match self {
            Self::Passed => "PASS",
            Self::ExpectedFailure => "XFAIL",
            Self::UnexpectedPass => "XPASS",
            Self::Failed => "FAIL",
        }
    }
}

/// Takes a baseline, then runs `execute` `REPETITIONS` times, sampling
/// `probe` after each run.
///
/// The first probe or execution error aborts the measurement.
pub fn measure<P, F, E>(probe: &P, mut execute: F) -> Result<Measurement, HarnessError>
where
    P: ResourceProbe + ?Sized,
    F: FnMut() -> Result<(), E>,
    E: Into<HarnessError>,
{
    let baseline = probe.read()?;
    let mut samples = Vec::with_capacity(REPETITIONS);

    for round in 1..=REPETITIONS {
        execute().map_err(Into::<HarnessError>::into)?;
        let reading = probe.read()?;
        log::debug!("[HARNESS] Round {}/{}: {} -> {}", round, REPETITIONS, baseline, reading);
        samples.push(reading);
    }

    let peak = samples.iter().copied().fold(ResourceReading(0), ResourceReading::max);

    Ok(Measurement {
        baseline,
        samples,
        peak,
    })
}

/// Measures `scenario` against `backend` and judges the result.
pub fn run_scenario<P, B>(
    probe: &P,
    backend: &B,
    scenario: Scenario,
) -> Result<(Measurement, Outcome), HarnessError>
where
    P: ResourceProbe + ?Sized,
    B: CaptureBackend,
{
    log::debug!("[HARNESS] Running {} ({})", scenario, scenario.pattern());

    let measurement = measure(probe, || scenario.run(backend))?;
    let outcome = measurement.verdict(scenario.leaks_expected());

    match outcome {
        Outcome::Passed | Outcome::ExpectedFailure => log::info!(
            "[HARNESS] {} {}: baseline {}, peak {}",
            outcome.label(),
            scenario,
            measurement.baseline,
            measurement.peak
        ),
        Outcome::UnexpectedPass => log::warn!(
            "[HARNESS] {} {}: known leak did not reproduce (baseline {}, peak {})",
            outcome.label(),
            scenario,
            measurement.baseline,
            measurement.peak
        ),
        Outcome::Failed => log::warn!(
            "[HARNESS] {} {}: resources grew from {} to {}",
            outcome.label(),
            scenario,
            measurement.baseline,
            measurement.peak
        ),
    }

    Ok((measurement, outcome))
}

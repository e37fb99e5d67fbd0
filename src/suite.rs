//! Runs the whole scenario table under platform gating.
//!
//! Cases are independent: an error in one is recorded and the next one
//! still runs.

use crate::capture::CaptureBackend;
use crate::harness::{self, Measurement, Outcome};
use crate::platform::PlatformFamily;
use crate::probe::ResourceProbe;
use crate::scenario::Scenario;
use serde::Serialize;
use std::fmt;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum CaseResult {
    Skipped { reason: String },
    Measured { measurement: Measurement, outcome: Outcome },
    Errored { message: String },
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CaseReport {
    pub scenario: Scenario,
    pub leaks_expected: bool,
    #[serde(flatten)]
    pub result: CaseResult,
}

impl CaseReport {
    pub fn outcome(&self) -> Option<Outcome> {
        match &self.result {
            CaseResult::Measured { outcome, .. } => Some(*outcome),
            CaseResult::Skipped { .. } | CaseResult::Errored { .. } => None,
        }
    }

    /// Failed verdicts and aborted cases block; everything else is tolerated.
    pub fn is_blocking(&self) -> bool {
        match &self.result {
            CaseResult::Measured { outcome, .. } => outcome.is_blocking(),
            CaseResult::Errored { .. } => true,
            CaseResult::Skipped { .. } => false,
        }
    }
}

impl fmt::Display for CaseReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.result {
            CaseResult::Skipped { reason } => write!(f, "SKIP  {:<22} {}", self.scenario.name(), reason),
            CaseResult::Measured {
                measurement,
                outcome,
            } => {
                let samples: Vec<String> =
                    measurement.samples.iter().map(|s| s.to_string()).collect();
                write!(
                    f,
                    "{:<5} {:<22} baseline {} peak {} [{}]",
                    outcome.label(),
                    self.scenario.name(),
                    measurement.baseline,
                    measurement.peak,
                    samples.join(", ")
                )
            }
            CaseResult::Errored { message } => write!(f, "ERROR {:<22} {}", self.scenario.name(), message),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SuiteReport {
    pub platform: PlatformFamily,
    /// Name of the probe used, `None` when nothing was measured.
    pub probe: Option<String>,
    pub cases: Vec<CaseReport>,
}

impl SuiteReport {
    pub fn has_blocking_failure(&self) -> bool {
        self.cases.iter().any(CaseReport::is_blocking)
    }

    pub fn count(&self, outcome: Outcome) -> usize {
        self.cases
            .iter()
            .filter(|case| case.outcome() == Some(outcome))
            .count()
    }

    pub fn skipped(&self) -> usize {
        self.cases
            .iter()
            .filter(|case| matches!(case.result, CaseResult::Skipped { .. }))
            .count()
    }

    pub fn errored(&self) -> usize {
        self.cases
            .iter()
            .filter(|case| matches!(case.result, CaseResult::Errored { .. }))
            .count()
    }

    pub fn summary(&self) -> String {
        format!(
            "{} passed, {} xfailed, {} xpassed, {} failed, {} errors, {} skipped",
            self.count(Outcome::Passed),
            self.count(Outcome::ExpectedFailure),
            self.count(Outcome::UnexpectedPass),
            self.count(Outcome::Failed),
            self.errored(),
            self.skipped()
        )
    }
}

/// Runs every scenario in `Scenario::ALL` order.
///
/// On the exempt platform all cases are skipped and `probe` is never read.
pub fn run_suite<B: CaptureBackend>(
    platform: PlatformFamily,
    probe: Option<&dyn ResourceProbe>,
    backend: &B,
) -> SuiteReport {
    let cases = Scenario::ALL
        .into_iter()
        .map(|scenario| CaseReport {
            scenario,
            leaks_expected: scenario.leaks_expected(),
            result: run_case(platform, probe, backend, scenario),
        })
        .collect();

    let report = SuiteReport {
        platform,
        probe: probe
            .filter(|_| !platform.is_exempt())
            .map(|p| p.name().to_string()),
        cases,
    };
    log::info!("[SUITE] {}", report.summary());
    report
}

fn run_case<B: CaptureBackend>(
    platform: PlatformFamily,
    probe: Option<&dyn ResourceProbe>,
    backend: &B,
    scenario: Scenario,
) -> CaseResult {
    if let Some(reason) = platform.skip_reason() {
        log::debug!("[SUITE] Skipping {}: {}", scenario, reason);
        return CaseResult::Skipped {
            reason: reason.to_string(),
        };
    }

    let Some(probe) = probe else {
        return CaseResult::Errored {
            message: format!("no resource probe available for {} platform", platform),
        };
    };

    match harness::run_scenario(probe, backend, scenario) {
        Ok((measurement, outcome)) => CaseResult::Measured {
            measurement,
            outcome,
        },
        Err(e) => {
            log::error!("[SUITE] {} aborted: {}", scenario, e);
            CaseResult::Errored {
                message: e.to_string(),
            }
        }
    }
}

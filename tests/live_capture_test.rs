//! Live leak check against the real display and the host's probe.
//!
//! `xcap` holds no connection between captures, so the patterns that never
//! close report XPASS here while the closing ones must PASS.
//! Needs a display server (and `lsof` on Unix), so it is ignored by default.
//! Run with: cargo test --test live_capture_test -- --ignored --nocapture

use capture_leaks_lib::capture::XcapBackend;
use capture_leaks_lib::{
    run_suite, select_probe, with_session, CaptureTarget, HarnessConfig, Outcome, Scenario,
};

fn display_available(backend: &XcapBackend) -> bool {
    with_session(backend, |session| session.capture(CaptureTarget::Primary).map(drop)).is_ok()
}

#[test]
#[ignore = "requires a display server"]
fn xcap_sessions_do_not_leak_on_this_host() {
    let config = HarnessConfig::from_env().expect("Invalid environment");
    let backend = XcapBackend::new();

    if config.platform.is_exempt() {
        eprintln!("SKIP: {}", config.platform.skip_reason().unwrap_or_default());
        return;
    }
    if !display_available(&backend) {
        eprintln!("SKIP: No display available.");
        return;
    }

    let probe = select_probe(config.platform, config.lsof_path.clone())
        .expect("Probe selection failed")
        .expect("Non-exempt platform must have a probe");

    let report = run_suite(config.platform, Some(probe.as_ref()), &backend);
    for case in &report.cases {
        eprintln!("[LIVE] {}", case);
    }

    assert_eq!(report.cases.len(), Scenario::ALL.len());
    for case in &report.cases {
        let expected = if case.scenario.leaks_expected() {
            Outcome::UnexpectedPass
        } else {
            Outcome::Passed
        };
        assert_eq!(case.outcome(), Some(expected), "{}", case);
    }
    assert_eq!(report.count(Outcome::Passed), 2);
    assert_eq!(report.count(Outcome::UnexpectedPass), 2);
    assert!(!report.has_blocking_failure());
}

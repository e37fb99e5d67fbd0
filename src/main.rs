//! capture-leaks CLI — runs the scenario table against the real display.
//!
//! Exit status: 0 when every case passed or failed as expected,
//! 1 on a blocking failure, 2 when the harness could not start.

use capture_leaks_lib::capture::XcapBackend;
use capture_leaks_lib::{
    run_suite, select_probe, HarnessConfig, HarnessError, PlatformFamily, SuiteReport,
};
use clap::Parser;
use std::path::PathBuf;
use std::process::ExitCode;

#[derive(Debug, Parser)]
#[command(name = "capture-leaks", version, about = "Check capture sessions for OS resource leaks")]
struct Cli {
    /// Print the report as JSON
    #[arg(long)]
    json: bool,

    /// Override platform detection: exempt, descriptors or gui-handles
    #[arg(long)]
    platform: Option<PlatformFamily>,

    /// Path to the lsof binary used by the descriptor probe
    #[arg(long, value_name = "PATH")]
    lsof: Option<PathBuf>,
}

fn main() -> ExitCode {
    capture_leaks_lib::init_logging();
    let cli = Cli::parse();

    let result = run(cli);
    if let Err(e) = &result {
        log::error!("capture-leaks could not run: {}", e);
    }
    ExitCode::from(exit_status(&result))
}

/// 1 when the report has a blocking failure, 2 when there is no report.
fn exit_status(result: &Result<SuiteReport, HarnessError>) -> u8 {
    match result {
        Ok(report) if report.has_blocking_failure() => 1,
        Ok(_) => 0,
        Err(_) => 2,
    }
}

fn run(cli: Cli) -> Result<SuiteReport, HarnessError> {
    let mut config = HarnessConfig::from_env()?;
    if let Some(platform) = cli.platform {
        config.platform = platform;
    }
    if let Some(lsof) = cli.lsof {
        config.lsof_path = Some(lsof);
    }

    log::info!("capture-leaks starting on {} platform", config.platform);

    let probe = select_probe(config.platform, config.lsof_path.clone())?;
    let backend = XcapBackend::new();
    let report = run_suite(config.platform, probe.as_deref(), &backend);

    if cli.json {
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        for case in &report.cases {
            println!("{case}");
        }
        println!("{}", report.summary());
    }

    Ok(report)
}

//! Unix socket count via `lsof -U`.
//!
//! Each X11/Wayland display connection shows up as one Unix socket owned
//! by this process, so a session that never returns its connection makes
//! this count grow.

use super::{ProbeError, ResourceProbe, ResourceReading};
use regex::Regex;
use std::path::PathBuf;
use std::process::Command;
use std::sync::LazyLock;

/// `-U` lists Unix sockets only. `-K i` drops the per-thread (TID) rows
/// newer Linux builds print, which would repeat each socket once per thread.
const LSOF_ARGS: [&str; 3] = ["-U", "-K", "i"];

/// Command name, then the PID column.
static PID_COLUMN: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"^\S+\s+(\d+)\s").unwrap());

pub struct UnixSocketProbe {
    lsof: PathBuf,
    pid: u32,
}

impl UnixSocketProbe {
    /// Finds `lsof` on `PATH`.
    pub fn locate() -> Result<Self, ProbeError> {
        let lsof = which::which("lsof").map_err(|e| ProbeError::ToolNotFound {
            tool: "lsof",
            reason: e.to_string(),
        })?;
        Ok(Self::with_lsof(lsof))
    }

    pub fn with_lsof(lsof: PathBuf) -> Self {
        Self {
            lsof,
            pid: std::process::id(),
        }
    }
}

impl ResourceProbe for UnixSocketProbe {
    fn name(&self) -> &str {
        "unix-sockets"
    }

    fn read(&self) -> Result<ResourceReading, ProbeError> {
        let output = Command::new(&self.lsof)
            .args(LSOF_ARGS)
            .output()
            .map_err(|source| ProbeError::Spawn {
                tool: self.lsof.display().to_string(),
                source,
            })?;

        let stdout = String::from_utf8_lossy(&output.stdout);

        // lsof exits 1 when some entries could not be inspected; the
        // listing it did produce is still usable.
        if !output.status.success() && stdout.trim().is_empty() {
            return Err(ProbeError::NonZeroExit {
                tool: self.lsof.display().to_string(),
                status: output.status.code().unwrap_or(-1),
                stderr: String::from_utf8_lossy(&output.stderr).trim().to_string(),
            });
        }

        let count = count_process_lines(&stdout, self.pid);

        log::debug!("[PROBE] {} Unix socket(s) open", count);
        Ok(ResourceReading(count))
    }
}

/// Counts the lines of an `lsof` listing whose PID column is exactly `pid`.
pub fn count_process_lines(listing: &str, pid: u32) -> u64 {
    listing
        .lines()
        .filter_map(|line| PID_COLUMN.captures(line))
        .filter(|caps| caps[1].parse::<u32>().is_ok_and(|owner| owner == pid))
        .count() as u64
}

//! Headless Inkscape invocation.
//!
//! Inkscape is treated as an opaque collaborator: the service only depends
//! on its command-line contract (accepts an input path, writes a PNG at the
//! requested output path, exits non-zero on failure, may hang indefinitely).
//! The invocation is therefore bounded by a hard wall-clock timeout, and the
//! result is reported as a structured [`ConvertOutcome`] so callers branch
//! on data instead of error types.

use std::path::Path;
use std::process::Stdio;
use std::time::Duration;

use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::process::Command;
use tokio::time::timeout;
use tracing::{debug, trace, warn};

use crate::config::Config;

/// How a single converter invocation ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ConvertOutcome {
    /// Exit code, if the process exited on its own. `None` when it was
    /// killed (timeout) or terminated by a signal.
    pub exit_code: Option<i32>,
    /// The wall-clock bound expired before the process exited.
    pub timed_out: bool,
    /// The process was forcibly killed and reaped by us.
    pub killed: bool,
}

impl ConvertOutcome {
    /// A clean exit with code zero.
    pub fn success(&self) -> bool {
        !self.timed_out && self.exit_code == Some(0)
    }
}

/// Runs Inkscape exports with a bounded wait.
#[derive(Debug, Clone)]
pub struct InkscapeService {
    binary: String,
    timeout: Duration,
}

impl InkscapeService {
    pub fn new(binary: impl Into<String>, timeout: Duration) -> Self {
        Self {
            binary: binary.into(),
            timeout,
        }
    }

    pub fn from_config(cfg: &Config) -> Self {
        Self::new(cfg.inkscape_bin.clone(), cfg.convert_timeout())
    }

    /// Rasterize `input` to a PNG at `output`.
    ///
    /// Invoked as
    /// `inkscape <input> --export-type=png --export-filename=<output> --export-dpi=96`
    /// (96 dpi is standard web resolution). On timeout expiry the child is
    /// killed and reaped before this returns.
    ///
    /// `Err` means the process could not be spawned or awaited at all;
    /// everything the converter itself reports ends up in the returned
    /// [`ConvertOutcome`].
    pub async fn rasterize(&self, input: &Path, output: &Path) -> std::io::Result<ConvertOutcome> {
        let mut cmd = Command::new(&self.binary);
        cmd.arg(input)
            .arg("--export-type=png")
            .arg(format!("--export-filename={}", output.display()))
            .arg("--export-dpi=96")
            .stdin(Stdio::null())
            .stdout(Stdio::null())
            .stderr(Stdio::piped())
            .kill_on_drop(true);

        debug!(
            binary = %self.binary,
            input = %input.display(),
            output = %output.display(),
            "starting inkscape export"
        );

        let mut child = cmd.spawn()?;

        // Drain stderr in the background so the child can never block on a
        // full pipe; lines surface in the server logs only.
        if let Some(stderr) = child.stderr.take() {
            tokio::spawn(async move {
                let mut lines = BufReader::new(stderr).lines();
                while let Ok(Some(line)) = lines.next_line().await {
                    trace!(inkscape_stderr = %line, "inkscape log");
                }
            });
        }

        let waited = timeout(self.timeout, child.wait()).await;
        match waited {
            Ok(status) => {
                let status = status?;
                Ok(ConvertOutcome {
                    exit_code: status.code(),
                    timed_out: false,
                    killed: false,
                })
            }
            Err(_) => {
                warn!(
                    input = %input.display(),
                    timeout_secs = self.timeout.as_secs(),
                    "inkscape exceeded wall-clock bound; killing"
                );
                if let Err(err) = child.kill().await {
                    warn!(error = %err, "failed to kill inkscape after timeout");
                }
                Ok(ConvertOutcome {
                    exit_code: None,
                    timed_out: true,
                    killed: true,
                })
            }
        }
    }
}

// ── Tests ────────────────────────────────────────────────────────────────────

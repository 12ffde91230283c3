// src/exec/backend.rs

//! Pluggable process runner abstraction.
//!
//! Channels talk to a `ProcessRunner` instead of spawning processes
//! themselves. This makes it easy to swap in a fake runner in tests while
//! keeping the production implementation here.
//!
//! - `RealProcessRunner` spawns the command with `tokio::process::Command`,
//!   captures stdout/stderr and enforces the per-command timeout.
//! - Tests can provide their own `ProcessRunner` that records invocations
//!   and returns scripted outputs.

use std::future::Future;
use std::pin::Pin;
use std::process::Stdio;

use tokio::process::Command;
use tracing::{debug, info, warn};

use super::command::{CommandSpec, ProcessOutput};

/// Trait abstracting how external commands are executed.
///
/// Implementations must never fail: "command not found", non-zero exit and
/// timeout all come back as a [`ProcessOutput`] with a non-zero code.
pub trait ProcessRunner: Send + Sync {
    fn run(&self, spec: CommandSpec) -> Pin<Box<dyn Future<Output = ProcessOutput> + Send + '_>>;
}

/// Real process runner used in production.
#[derive(Debug, Clone, Default)]
pub struct RealProcessRunner;

impl RealProcessRunner {
    pub fn new() -> Self {
        Self
    }
}

impl ProcessRunner for RealProcessRunner {
    fn run(&self, spec: CommandSpec) -> Pin<Box<dyn Future<Output = ProcessOutput> + Send + '_>> {
        Box::pin(run_command(spec))
    }
}

/// Run a single external command to completion (or timeout).
pub async fn run_command(spec: CommandSpec) -> ProcessOutput {
    info!(cmd = %spec, timeout_secs = spec.timeout.as_secs(), "starting external command");

    let mut cmd = Command::new(&spec.program);
    cmd.args(&spec.args)
        .stdin(Stdio::null())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        // Dropping the future on timeout kills the child.
        .kill_on_drop(true);

    if let Some(dir) = &spec.cwd {
        cmd.current_dir(dir);
    }

    match tokio::time::timeout(spec.timeout, cmd.output()).await {
        Ok(Ok(output)) => {
            let code = output.status.code().unwrap_or(-1);
            let result = ProcessOutput {
                code,
                stdout: String::from_utf8_lossy(&output.stdout).into_owned(),
                stderr: String::from_utf8_lossy(&output.stderr).into_owned(),
            };

            info!(cmd = %spec, exit_code = code, success = result.is_success(), "external command exited");
            if !result.stderr.is_empty() {
                debug!(cmd = %spec, "stderr: {}", result.stderr.trim_end());
            }
            result
        }
        Ok(Err(e)) => {
            warn!(cmd = %spec, error = %e, "failed to spawn external command");
            ProcessOutput::failure(1, e.to_string())
        }
        Err(_) => {
            warn!(cmd = %spec, timeout_secs = spec.timeout.as_secs(), "external command timed out");
            ProcessOutput::timed_out(spec.timeout)
        }
    }
}

// src/exec/command.rs

use std::ffi::OsString;
use std::fmt;
use std::path::PathBuf;
use std::time::Duration;

/// Timeout family for messaging and logging actions.
pub const MESSAGING_TIMEOUT: Duration = Duration::from_secs(30);

/// Timeout for the branch/pull-request workflow script.
pub const PR_SCRIPT_TIMEOUT: Duration = Duration::from_secs(120);

/// A fully-specified external command invocation: argv, timeout and an
/// optional working directory. No shell is involved.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandSpec {
    pub program: OsString,
    pub args: Vec<OsString>,
    pub timeout: Duration,
    pub cwd: Option<PathBuf>,
}

impl CommandSpec {
    pub fn new(program: impl Into<OsString>) -> Self {
        Self {
            program: program.into(),
            args: Vec::new(),
            timeout: MESSAGING_TIMEOUT,
            cwd: None,
        }
    }

    pub fn arg(mut self, arg: impl Into<OsString>) -> Self {
        self.args.push(arg.into());
        self
    }

    pub fn args<I, S>(mut self, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<OsString>,
    {
        self.args.extend(args.into_iter().map(Into::into));
        self
    }

    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn current_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.cwd = Some(dir.into());
        self
    }

    /// Program followed by arguments, lossily converted for logging and
    /// matching in tests.
    pub fn argv(&self) -> Vec<String> {
        std::iter::once(&self.program)
            .chain(self.args.iter())
            .map(|s| s.to_string_lossy().into_owned())
            .collect()
    }
}

impl fmt::Display for CommandSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.argv().join(" "))
    }
}

/// Normalized result of an external command.
///
/// Spawn failures and timeouts are folded in here as a non-zero `code` with a
/// descriptive `stderr`, so callers treat every failure as data.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProcessOutput {
    pub code: i32,
    pub stdout: String,
    pub stderr: String,
}

impl ProcessOutput {
    pub fn success(stdout: impl Into<String>) -> Self {
        Self {
            code: 0,
            stdout: stdout.into(),
            stderr: String::new(),
        }
    }

    pub fn failure(code: i32, stderr: impl Into<String>) -> Self {
        Self {
            code,
            stdout: String::new(),
            stderr: stderr.into(),
        }
    }

    pub fn timed_out(timeout: Duration) -> Self {
        Self::failure(1, format!("Command timed out after {}s", timeout.as_secs()))
    }

    pub fn is_success(&self) -> bool {
        self.code == 0
    }

    /// `stderr` if the command said anything, else `fallback`.
    pub fn stderr_or(&self, fallback: &str) -> String {
        if self.stderr.trim().is_empty() {
            fallback.to_string()
        } else {
            self.stderr.clone()
        }
    }
}

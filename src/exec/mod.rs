// src/exec/mod.rs

//! Process execution layer.
//!
//! Every external program the channels need (mail sender, SMS script,
//! worklog appender, PR workflow script, `git`) runs through here.
//!
//! - [`command`] defines `CommandSpec` (argv + timeout + cwd) and the
//!   normalized `ProcessOutput`.
//! - [`backend`] provides the `ProcessRunner` trait and the concrete
//!   `RealProcessRunner`, which tests replace with a fake.

pub mod backend;
pub mod command;

pub use backend::{ProcessRunner, RealProcessRunner, run_command};
pub use command::{CommandSpec, MESSAGING_TIMEOUT, PR_SCRIPT_TIMEOUT, ProcessOutput};

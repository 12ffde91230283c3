// tests/process_runner.rs

#![cfg(unix)]

mod common;
use crate::common::{init_tracing, with_timeout};

use std::time::Duration;

use wrapup::exec::{CommandSpec, ProcessRunner, RealProcessRunner};

#[tokio::test]
async fn captures_exit_code_and_both_streams() {
    init_tracing();
    let spec = CommandSpec::new("sh").args(["-c", "echo out; echo err >&2; exit 3"]);

    let output = with_timeout(RealProcessRunner::new().run(spec)).await;

    assert_eq!(output.code, 3);
    assert_eq!(output.stdout.trim(), "out");
    assert_eq!(output.stderr.trim(), "err");
    assert!(!output.is_success());
}

#[tokio::test]
async fn runs_in_the_requested_directory() {
    init_tracing();
    let dir = tempfile::tempdir().expect("tempdir");
    let spec = CommandSpec::new("pwd").current_dir(dir.path());

    let output = with_timeout(RealProcessRunner::new().run(spec)).await;

    assert!(output.is_success());
    let reported = std::fs::canonicalize(output.stdout.trim()).expect("pwd output");
    let expected = std::fs::canonicalize(dir.path()).expect("tempdir path");
    assert_eq!(reported, expected);
}

#[tokio::test]
async fn slow_command_is_killed_at_its_timeout() {
    init_tracing();
    let spec = CommandSpec::new("sleep")
        .arg("10")
        .timeout(Duration::from_secs(1));

    let output = with_timeout(RealProcessRunner::new().run(spec)).await;

    assert_eq!(output.code, 1);
    assert_eq!(output.stderr, "Command timed out after 1s");
}

#[tokio::test]
async fn missing_program_is_reported_not_raised() {
    init_tracing();
    let spec = CommandSpec::new("/nonexistent/wrapup-tool");

    let output = with_timeout(RealProcessRunner::new().run(spec)).await;

    assert_eq!(output.code, 1);
    assert!(!output.stderr.is_empty());
    assert_eq!(output.stderr_or("fallback"), output.stderr);
}

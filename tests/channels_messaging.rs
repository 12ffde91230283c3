// tests/channels_messaging.rs

mod common;
use crate::common::{ConfigFileBuilder, FakeRunner, SummaryBuilder, init_tracing, test_context};

use std::error::Error;
use std::path::PathBuf;
use std::sync::{Arc, Mutex};

use wrapup::channels::{email, slack, sms};
use wrapup::exec::ProcessOutput;
use wrapup::fs::mock::MockFileSystem;
use wrapup::outcome::{Delivered, DeliveryStatus, Outcome};

type TestResult = Result<(), Box<dyn Error>>;

fn body_file_arg(argv: &[String]) -> Option<PathBuf> {
    argv.iter()
        .position(|a| a == "--body-file")
        .and_then(|i| argv.get(i + 1))
        .map(PathBuf::from)
}

#[tokio::test]
async fn email_disabled_is_skipped_without_side_effects() -> TestResult {
    init_tracing();
    let runner = FakeRunner::new();
    let fs = MockFileSystem::new();
    let ctx = test_context(
        SummaryBuilder::default().build(),
        ConfigFileBuilder::new().build(),
        &runner,
        &fs,
    );

    let outcome = email::run(&ctx).await?;

    assert_eq!(outcome, Outcome::skipped("Email disabled"));
    assert_eq!(runner.call_count(), 0);
    Ok(())
}

#[tokio::test]
async fn email_without_recipients_is_an_error() -> TestResult {
    init_tracing();
    let runner = FakeRunner::new();
    let fs = MockFileSystem::new();
    let ctx = test_context(
        SummaryBuilder::default().build(),
        ConfigFileBuilder::new().enable_email().build(),
        &runner,
        &fs,
    );

    let outcome = email::run(&ctx).await?;

    assert_eq!(outcome, Outcome::error("No email recipients configured"));
    assert_eq!(runner.call_count(), 0);
    Ok(())
}

#[tokio::test]
async fn email_sends_override_body_through_temp_file_and_removes_it() -> TestResult {
    init_tracing();
    let seen_body = Arc::new(Mutex::new(None::<String>));
    let seen = Arc::clone(&seen_body);

    let runner = FakeRunner::new().respond_with(move |spec| {
        let body = body_file_arg(&spec.argv()).and_then(|p| std::fs::read_to_string(p).ok());
        *seen.lock().unwrap() = body;
        None
    });
    let fs = MockFileSystem::new();
    let config = ConfigFileBuilder::new()
        .project_name("acme-api")
        .email_to("ada@example.com")
        .email_to("bob@example.com")
        .email_cc("lead@example.com")
        .fake_tools()
        .build();
    let summary = SummaryBuilder::default().email("Email-specific body").build();
    let ctx = test_context(summary, config, &runner, &fs);

    let outcome = email::run(&ctx).await?;

    assert_eq!(
        outcome,
        Outcome::Success(Delivered::Email {
            recipients: vec!["ada@example.com".into(), "bob@example.com".into()],
            cc: vec!["lead@example.com".into()],
        })
    );

    let argvs = runner.argvs();
    assert_eq!(argvs.len(), 1);
    let argv = &argvs[0];
    assert_eq!(&argv[..5], &[
        "ruby",
        "/tools/gmail_manager.rb",
        "--send",
        "--to",
        "ada@example.com,bob@example.com",
    ]);
    assert!(argv.contains(&"Work Session Update: acme-api".to_string()));
    assert_eq!(&argv[argv.len() - 2..], &["--cc", "lead@example.com"]);

    assert_eq!(seen_body.lock().unwrap().as_deref(), Some("Email-specific body"));

    let body_path = body_file_arg(argv).ok_or("no --body-file argument")?;
    assert!(!body_path.exists(), "temp body file must be removed");
    Ok(())
}

#[tokio::test]
async fn email_failure_keeps_stderr_exit_code_and_recipients() -> TestResult {
    init_tracing();
    let runner = FakeRunner::new()
        .when_arg("--send", ProcessOutput::failure(2, "SMTP auth failed"));
    let fs = MockFileSystem::new();
    let ctx = test_context(
        SummaryBuilder::default().build(),
        ConfigFileBuilder::new().email_to("ada@example.com").fake_tools().build(),
        &runner,
        &fs,
    );

    let outcome = email::run(&ctx).await?;

    match outcome {
        Outcome::Error(failure) => {
            assert_eq!(failure.reason, "SMTP auth failed");
            assert_eq!(failure.exit_code, Some(2));
            assert_eq!(
                failure.attempted_recipients,
                Some(vec!["ada@example.com".to_string()])
            );
        }
        other => panic!("expected error outcome, got {other:?}"),
    }

    let body_path = body_file_arg(&runner.argvs()[0]).ok_or("no --body-file argument")?;
    assert!(!body_path.exists(), "temp body file must be removed on failure too");
    Ok(())
}

#[tokio::test]
async fn email_failure_without_stderr_uses_generic_reason() -> TestResult {
    init_tracing();
    let runner = FakeRunner::new().when_arg("--send", ProcessOutput::failure(1, ""));
    let fs = MockFileSystem::new();
    let ctx = test_context(
        SummaryBuilder::default().build(),
        ConfigFileBuilder::new().email_to("ada@example.com").build(),
        &runner,
        &fs,
    );

    let outcome = email::run(&ctx).await?;

    assert_eq!(outcome.reason(), Some("Email sending failed"));
    Ok(())
}

#[tokio::test]
async fn sms_sends_one_message_per_recipient() -> TestResult {
    init_tracing();
    let runner = FakeRunner::new();
    let fs = MockFileSystem::new();
    let config = ConfigFileBuilder::new()
        .sms_to("Ann", "+4711111111")
        .sms_to("Ben", "+4722222222")
        .fake_tools()
        .build();
    let summary = SummaryBuilder::new("full", "It's done").build();
    let ctx = test_context(summary, config, &runner, &fs);

    let outcome = sms::run(&ctx).await?;

    let report = match outcome {
        Outcome::Success(Delivered::FanOut(report)) => report,
        other => panic!("expected fan-out success, got {other:?}"),
    };
    assert_eq!((report.total, report.successful, report.failed), (2, 2, 0));

    assert_eq!(runner.argvs(), vec![
        vec!["/tools/send_message.sh".to_string(), "+4711111111".into(), "Its done".into()],
        vec!["/tools/send_message.sh".to_string(), "+4722222222".into(), "Its done".into()],
    ]);
    Ok(())
}

#[tokio::test]
async fn sms_one_failing_recipient_is_partial_success() -> TestResult {
    init_tracing();
    let runner = FakeRunner::new()
        .when_arg("+4722222222", ProcessOutput::failure(1, "Messages app unavailable"));
    let fs = MockFileSystem::new();
    let config = ConfigFileBuilder::new()
        .sms_to("Ann", "+4711111111")
        .sms_to("Ben", "+4722222222")
        .build();
    let ctx = test_context(SummaryBuilder::default().build(), config, &runner, &fs);

    let outcome = sms::run(&ctx).await?;

    let report = match outcome {
        Outcome::PartialSuccess(report) => report,
        other => panic!("expected partial success, got {other:?}"),
    };
    assert_eq!((report.total, report.successful, report.failed), (2, 1, 1));
    assert_eq!(report.details[0].status, DeliveryStatus::Success);
    assert_eq!(report.details[1].status, DeliveryStatus::Error);
    assert_eq!(report.details[1].recipient, "Ben Tester");
    assert_eq!(report.details[1].reason.as_deref(), Some("Messages app unavailable"));
    assert_eq!(report.details[0].exit_code, None);
    assert_eq!(report.details[1].exit_code, Some(1));
    assert_eq!(runner.call_count(), 2);
    Ok(())
}

#[tokio::test]
async fn sms_without_recipients_is_an_error() -> TestResult {
    init_tracing();
    let runner = FakeRunner::new();
    let fs = MockFileSystem::new();
    let ctx = test_context(
        SummaryBuilder::default().build(),
        ConfigFileBuilder::new().enable_sms().build(),
        &runner,
        &fs,
    );

    let outcome = sms::run(&ctx).await?;

    assert_eq!(outcome, Outcome::error("No SMS recipients configured"));
    assert_eq!(runner.call_count(), 0);
    Ok(())
}

#[tokio::test]
async fn sms_long_content_is_truncated_to_max_length() -> TestResult {
    init_tracing();
    let runner = FakeRunner::new();
    let fs = MockFileSystem::new();
    let config = ConfigFileBuilder::new()
        .sms_to("Ann", "+4711111111")
        .sms_max_length(20)
        .build();
    let summary = SummaryBuilder::default().sms(&"x".repeat(50)).build();
    let ctx = test_context(summary, config, &runner, &fs);

    sms::run(&ctx).await?;

    let sent = runner.argvs()[0][2].clone();
    assert_eq!(sent.chars().count(), 20);
    assert!(sent.ends_with("..."));
    assert_eq!(&sent[..17], "x".repeat(17));
    Ok(())
}

#[test]
fn truncate_message_leaves_short_content_alone() {
    assert_eq!(sms::truncate_message("short", 20), "short");
    assert_eq!(sms::truncate_message(&"y".repeat(20), 20), "y".repeat(20));
}

#[test]
fn truncate_message_counts_characters_not_bytes() {
    let content = "æøå".repeat(10);
    let truncated = sms::truncate_message(&content, 10);
    assert_eq!(truncated.chars().count(), 10);
    assert!(truncated.starts_with("æøåæøåæ"));
}

#[tokio::test]
async fn slack_requires_a_channel() -> TestResult {
    init_tracing();
    let runner = FakeRunner::new();
    let fs = MockFileSystem::new();
    let ctx = test_context(
        SummaryBuilder::default().build(),
        ConfigFileBuilder::new().slack("  ", &[]).build(),
        &runner,
        &fs,
    );

    let outcome = slack::run(&ctx).await?;

    assert_eq!(outcome, Outcome::error("No Slack channel configured"));
    Ok(())
}

#[tokio::test]
async fn slack_composes_mentions_and_reports_pending() -> TestResult {
    init_tracing();
    let runner = FakeRunner::new();
    let fs = MockFileSystem::new();
    let ctx = test_context(
        SummaryBuilder::default().slack("Shipped the fix").build(),
        ConfigFileBuilder::new().slack("#dev", &["U1", "U2"]).build(),
        &runner,
        &fs,
    );

    let outcome = slack::run(&ctx).await?;

    match outcome {
        Outcome::Success(Delivered::Slack { channel, content, message }) => {
            assert_eq!(channel, "#dev");
            assert_eq!(content, "<@U1> <@U2>\n\nShipped the fix");
            assert!(message.contains("pending"));
        }
        other => panic!("expected slack success, got {other:?}"),
    }
    assert_eq!(runner.call_count(), 0);
    Ok(())
}

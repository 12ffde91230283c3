// src/report.rs

//! Tally and human-readable report for one dispatch.
//!
//! Both are pure functions of the [`OutcomeMap`]. Follow-up steps are listed
//! in the report but left out of the tally.

use crate::outcome::{Delivered, DeliveryStatus, FanOutReport, Outcome, OutcomeMap, StepResult};

const RULE_WIDTH: usize = 70;

/// Aggregate counts over the delivery channels. A partial success counts half
/// towards `success` and half towards `error`; warnings count as errors.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Tally {
    pub total: usize,
    pub success: f64,
    pub skipped: usize,
    pub error: f64,
}

impl Tally {
    pub fn from_outcomes(outcomes: &OutcomeMap) -> Self {
        let mut tally = Tally::default();

        for (_, outcome) in outcomes.delivery() {
            tally.total += 1;
            match outcome {
                Outcome::Success(_) => tally.success += 1.0,
                Outcome::Skipped { .. } => tally.skipped += 1,
                Outcome::PartialSuccess(_) => {
                    tally.success += 0.5;
                    tally.error += 0.5;
                }
                Outcome::Warning { .. } | Outcome::Error(_) => tally.error += 1.0,
            }
        }

        tally
    }

    /// Success count as shown in the report (fractional part dropped).
    pub fn success_shown(&self) -> u64 {
        self.success.trunc() as u64
    }

    /// Error count as shown in the report (fractional part dropped).
    pub fn errors_shown(&self) -> u64 {
        self.error.trunc() as u64
    }

    pub fn totals_line(&self) -> String {
        format!(
            "Success: {}, Skipped: {}, Errors: {}",
            self.success_shown(),
            self.skipped,
            self.errors_shown()
        )
    }
}

fn icon(outcome: &Outcome) -> &'static str {
    match outcome {
        Outcome::Success(_) => "✅",
        Outcome::Skipped { .. } => "⏭️",
        Outcome::PartialSuccess(_) | Outcome::Warning { .. } => "⚠️",
        Outcome::Error(_) => "❌",
    }
}

/// Render the final wrap-up report.
pub fn render(outcomes: &OutcomeMap) -> String {
    let heavy = "=".repeat(RULE_WIDTH);
    let mut lines = vec![
        heavy.clone(),
        "TASK WRAP-UP SUMMARY".to_string(),
        heavy.clone(),
        String::new(),
    ];

    for (channel, outcome) in outcomes.iter() {
        lines.push(format!(
            "{} {}: {}",
            icon(outcome),
            channel.to_uppercase(),
            outcome.status()
        ));
        lines.extend(detail_lines(outcome).into_iter().map(|line| format!("   {line}")));
        lines.push(String::new());
    }

    let tally = Tally::from_outcomes(outcomes);
    lines.push("-".repeat(RULE_WIDTH));
    lines.push(format!("Total: {} channels", tally.total));
    lines.push(tally.totals_line());
    lines.push(heavy);

    lines.join("\n")
}

fn detail_lines(outcome: &Outcome) -> Vec<String> {
    match outcome {
        Outcome::Success(delivered) => success_lines(delivered),
        Outcome::Skipped { reason } => vec![format!("Reason: {reason}")],
        Outcome::Warning {
            reason,
            parent_branch,
        } => vec![format!("Warning: {reason} ({parent_branch})")],
        Outcome::PartialSuccess(report) => fan_out_lines(report),
        Outcome::Error(failure) => {
            let mut lines = vec![format!("Error: {}", failure.reason)];
            if let Some(code) = failure.exit_code {
                lines.push(format!("Exit code: {code}"));
            }
            lines
        }
    }
}

fn success_lines(delivered: &Delivered) -> Vec<String> {
    match delivered {
        Delivered::Email { recipients, .. } => {
            vec![format!("Recipients: {}", recipients.join(", "))]
        }
        Delivered::FanOut(report) => fan_out_lines(report),
        Delivered::Worklog { date, .. } => vec![format!("Date: {date}")],
        Delivered::PullRequest(pr) => {
            let mut lines = Vec::new();
            if let Some(url) = &pr.pr_url {
                lines.push(format!("PR: {url}"));
            }
            for (label, step) in [("Checkout", &pr.checkout), ("Cleanup", &pr.cleanup)] {
                if let Some(StepResult::Error { reason, .. }) = step {
                    lines.push(format!("{label} failed: {reason}"));
                }
            }
            lines
        }
        Delivered::Slack { .. } | Delivered::Documentation { .. } | Delivered::Pending { .. } => {
            Vec::new()
        }
    }
}

fn fan_out_lines(report: &FanOutReport) -> Vec<String> {
    let mut lines = vec![format!("Sent: {}/{}", report.successful, report.total)];
    for detail in &report.details {
        if detail.status == DeliveryStatus::Error {
            lines.push(format!(
                "Failed: {} ({})",
                detail.recipient,
                detail.reason.as_deref().unwrap_or("unknown error")
            ));
        }
    }
    lines
}

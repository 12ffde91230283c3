// src/outcome.rs

//! Normalized per-channel results.
//!
//! Every channel task, whatever it does internally, reports exactly one
//! [`Outcome`]. The serialized shape (`{"status": "...", ...}`) is what the
//! CLI prints under `results`.

use serde::ser::SerializeMap;
use serde::{Serialize, Serializer};

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum Outcome {
    /// The channel's action completed.
    Success(Delivered),
    /// Disabled or not applicable. Not a failure.
    Skipped { reason: String },
    /// Expected degraded condition; proceeds on a safe default.
    Warning { reason: String, parent_branch: String },
    /// Some sub-units of a fan-out channel failed.
    #[serde(rename = "partial")]
    PartialSuccess(FanOutReport),
    /// The channel's action did not complete.
    Error(Failure),
}

/// Coarse classification used by the tally and the report.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum OutcomeKind {
    Success,
    Skipped,
    Warning,
    PartialSuccess,
    Error,
}

impl Outcome {
    pub fn skipped(reason: impl Into<String>) -> Self {
        Outcome::Skipped {
            reason: reason.into(),
        }
    }

    pub fn error(reason: impl Into<String>) -> Self {
        Outcome::Error(Failure::new(reason))
    }

    /// Success when nobody failed, partial otherwise.
    pub fn from_fan_out(report: FanOutReport) -> Self {
        if report.failed == 0 {
            Outcome::Success(Delivered::FanOut(report))
        } else {
            Outcome::PartialSuccess(report)
        }
    }

    pub fn kind(&self) -> OutcomeKind {
        match self {
            Outcome::Success(_) => OutcomeKind::Success,
            Outcome::Skipped { .. } => OutcomeKind::Skipped,
            Outcome::Warning { .. } => OutcomeKind::Warning,
            Outcome::PartialSuccess(_) => OutcomeKind::PartialSuccess,
            Outcome::Error(_) => OutcomeKind::Error,
        }
    }

    /// Status word as it appears in the JSON result and the report.
    pub fn status(&self) -> &'static str {
        match self.kind() {
            OutcomeKind::Success => "success",
            OutcomeKind::Skipped => "skipped",
            OutcomeKind::Warning => "warning",
            OutcomeKind::PartialSuccess => "partial",
            OutcomeKind::Error => "error",
        }
    }

    pub fn is_success(&self) -> bool {
        matches!(self, Outcome::Success(_))
    }

    /// Human-readable reason for non-success outcomes.
    pub fn reason(&self) -> Option<&str> {
        match self {
            Outcome::Skipped { reason } | Outcome::Warning { reason, .. } => Some(reason),
            Outcome::Error(failure) => Some(&failure.reason),
            Outcome::Success(_) | Outcome::PartialSuccess(_) => None,
        }
    }
}

/// Channel-specific evidence carried by a successful outcome.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum Delivered {
    Email {
        recipients: Vec<String>,
        cc: Vec<String>,
    },
    FanOut(FanOutReport),
    Slack {
        channel: String,
        content: String,
        message: String,
    },
    Worklog {
        date: String,
        description: String,
        client: String,
        #[serde(skip_serializing_if = "Option::is_none")]
        hours: Option<f64>,
    },
    Documentation {
        strategy: String,
        paths: Vec<String>,
        request_file: String,
        message: String,
    },
    PullRequest(PullRequestReport),
    /// Integration present but not wired to a backend yet.
    Pending { message: String },
}

/// Per-recipient results of a channel that sends one message per recipient.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FanOutReport {
    pub total: usize,
    pub successful: usize,
    pub failed: usize,
    pub details: Vec<RecipientResult>,
}

impl FanOutReport {
    pub fn from_details(details: Vec<RecipientResult>) -> Self {
        let successful = details
            .iter()
            .filter(|d| d.status == DeliveryStatus::Success)
            .count();
        Self {
            total: details.len(),
            successful,
            failed: details.len() - successful,
            details,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RecipientResult {
    pub recipient: String,
    pub phone: String,
    pub status: DeliveryStatus,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reason: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub exit_code: Option<i32>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum DeliveryStatus {
    Success,
    Error,
}

/// Diagnostic payload of an `Error` outcome.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Failure {
    pub reason: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub exit_code: Option<i32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub stderr: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub attempted_recipients: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub parent_branch: Option<String>,
}

impl Failure {
    pub fn new(reason: impl Into<String>) -> Self {
        Self {
            reason: reason.into(),
            exit_code: None,
            stderr: None,
            attempted_recipients: None,
            parent_branch: None,
        }
    }

    pub fn exit_code(mut self, code: i32) -> Self {
        self.exit_code = Some(code);
        self
    }

    pub fn stderr(mut self, stderr: impl Into<String>) -> Self {
        self.stderr = Some(stderr.into());
        self
    }

    pub fn attempted_recipients(mut self, recipients: Vec<String>) -> Self {
        self.attempted_recipients = Some(recipients);
        self
    }

    pub fn parent_branch(mut self, branch: impl Into<String>) -> Self {
        self.parent_branch = Some(branch.into());
        self
    }
}

impl From<Failure> for Outcome {
    fn from(failure: Failure) -> Self {
        Outcome::Error(failure)
    }
}

/// Successful pull request run, with its best-effort follow-up steps.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PullRequestReport {
    pub parent_branch: String,
    pub feature_branch: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub pr_url: Option<String>,
    /// `None` when `auto_checkout_parent` is off.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub checkout: Option<StepResult>,
    /// `None` when `cleanup_session_state` is off.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cleanup: Option<StepResult>,
}

/// Result of a nested best-effort step. A failed step never changes the
/// parent outcome.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum StepResult {
    Success {
        detail: String,
    },
    Error {
        reason: String,
        #[serde(skip_serializing_if = "Option::is_none")]
        stderr: Option<String>,
    },
}

impl StepResult {
    pub fn is_success(&self) -> bool {
        matches!(self, StepResult::Success { .. })
    }
}

/// Outcome per channel, kept in dispatch order.
///
/// Delivery channels come first, follow-up steps (the pull request workflow)
/// after them. Both are reported; only delivery channels are tallied.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct OutcomeMap {
    entries: Vec<(String, Outcome)>,
    follow_ups: Vec<(String, Outcome)>,
}

impl OutcomeMap {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert or replace the outcome for delivery channel `channel`.
    pub fn insert(&mut self, channel: impl Into<String>, outcome: Outcome) {
        upsert(&mut self.entries, channel.into(), outcome);
    }

    /// Insert or replace the outcome of a follow-up step.
    pub fn insert_follow_up(&mut self, step: impl Into<String>, outcome: Outcome) {
        upsert(&mut self.follow_ups, step.into(), outcome);
    }

    pub fn get(&self, channel: &str) -> Option<&Outcome> {
        self.iter()
            .find(|(name, _)| *name == channel)
            .map(|(_, outcome)| outcome)
    }

    pub fn contains(&self, channel: &str) -> bool {
        self.get(channel).is_some()
    }

    /// Number of entries, follow-ups included.
    pub fn len(&self) -> usize {
        self.entries.len() + self.follow_ups.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Every entry: delivery channels, then follow-ups.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &Outcome)> {
        self.entries
            .iter()
            .chain(self.follow_ups.iter())
            .map(|(name, outcome)| (name.as_str(), outcome))
    }

    /// Delivery channels only.
    pub fn delivery(&self) -> impl Iterator<Item = (&str, &Outcome)> {
        self.entries
            .iter()
            .map(|(name, outcome)| (name.as_str(), outcome))
    }

    pub fn channels(&self) -> impl Iterator<Item = &str> {
        self.iter().map(|(name, _)| name)
    }
}

fn upsert(entries: &mut Vec<(String, Outcome)>, name: String, outcome: Outcome) {
    match entries.iter_mut().find(|(existing, _)| *existing == name) {
        Some(entry) => entry.1 = outcome,
        None => entries.push((name, outcome)),
    }
}

impl FromIterator<(String, Outcome)> for OutcomeMap {
    fn from_iter<I: IntoIterator<Item = (String, Outcome)>>(iter: I) -> Self {
        let mut map = OutcomeMap::new();
        for (channel, outcome) in iter {
            map.insert(channel, outcome);
        }
        map
    }
}

// Serialized as a JSON object in report order.
impl Serialize for OutcomeMap {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.len()))?;
        for (channel, outcome) in self.iter() {
            map.serialize_entry(channel, outcome)?;
        }
        map.end()
    }
}

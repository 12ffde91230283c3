// src/session/workflow.rs

//! Pull request workflow.
//!
//! ```text
//! NoState ──(state missing/invalid)──► Degraded   (Warning outcome)
//!    │
//!    └──(valid state)──► Invoking ──exit 0──► Success ─► checkout? ─► cleanup?
//!                            │
//!                            └──exit != 0──► Failed  (Error outcome, no side effects)
//! ```
//!
//! No retries happen here. Checkout and cleanup are best-effort: their
//! failures are attached as nested step results and never downgrade the
//! successful pull request.

use std::sync::LazyLock;

use regex::Regex;
use tracing::{info, warn};

use crate::config::PullRequestConfig;
use crate::dispatch::DispatchContext;
use crate::exec::{CommandSpec, MESSAGING_TIMEOUT, PR_SCRIPT_TIMEOUT, ProcessOutput};
use crate::outcome::{Delivered, Failure, Outcome, PullRequestReport, StepResult};

use super::state::{SessionState, state_path};

static PR_URL: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"https://github\.com[^\s]+").expect("PR URL pattern is valid")
});

/// Exit codes of the branch/pull-request script.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PrExitCode {
    Success,
    CliMissing,
    NotAuthenticated,
    UncommittedChanges,
    NoCommitsToPush,
    PushFailed,
    PrCreationFailed,
    Unknown(i32),
}

impl PrExitCode {
    pub fn from_code(code: i32) -> Self {
        match code {
            0 => PrExitCode::Success,
            10 => PrExitCode::CliMissing,
            11 => PrExitCode::NotAuthenticated,
            12 => PrExitCode::UncommittedChanges,
            13 => PrExitCode::NoCommitsToPush,
            20 => PrExitCode::PushFailed,
            30 => PrExitCode::PrCreationFailed,
            other => PrExitCode::Unknown(other),
        }
    }

    pub fn code(self) -> i32 {
        match self {
            PrExitCode::Success => 0,
            PrExitCode::CliMissing => 10,
            PrExitCode::NotAuthenticated => 11,
            PrExitCode::UncommittedChanges => 12,
            PrExitCode::NoCommitsToPush => 13,
            PrExitCode::PushFailed => 20,
            PrExitCode::PrCreationFailed => 30,
            PrExitCode::Unknown(code) => code,
        }
    }

    /// User-facing explanation of a failure code.
    pub fn message(self) -> String {
        match self {
            PrExitCode::Success => "Pull request created".to_string(),
            PrExitCode::CliMissing => {
                "GitHub CLI (gh) is not installed. Install with: brew install gh".to_string()
            }
            PrExitCode::NotAuthenticated => {
                "Not authenticated with GitHub. Run: gh auth login".to_string()
            }
            PrExitCode::UncommittedChanges => {
                "Uncommitted changes detected. Please commit all changes before creating PR."
                    .to_string()
            }
            PrExitCode::NoCommitsToPush => {
                "No commits to push. The feature branch has no commits compared to parent branch."
                    .to_string()
            }
            PrExitCode::PushFailed => {
                "Failed to push branch to remote. Check your network connection and permissions."
                    .to_string()
            }
            PrExitCode::PrCreationFailed => {
                "Failed to create pull request. Check GitHub CLI output for details.".to_string()
            }
            PrExitCode::Unknown(code) => format!("Unknown error (exit code {code})"),
        }
    }
}

/// Drives one pull request attempt for the current session.
#[derive(Debug)]
pub struct SessionWorkflow<'a> {
    ctx: &'a DispatchContext,
}

impl<'a> SessionWorkflow<'a> {
    pub fn new(ctx: &'a DispatchContext) -> Self {
        Self { ctx }
    }

    fn config(&self) -> &PullRequestConfig {
        &self.ctx.config.pull_request
    }

    pub async fn run(&self) -> Outcome {
        match SessionState::load(self.ctx.fs.as_ref(), &self.ctx.project_root) {
            None => self.degraded(),
            Some(state) => self.invoke(&state).await,
        }
    }

    fn degraded(&self) -> Outcome {
        let parent_branch = self.config().default_parent_branch.clone();
        warn!(%parent_branch, "no session state; falling back to default parent branch");
        Outcome::Warning {
            reason: "No session state found, using default parent branch".to_string(),
            parent_branch,
        }
    }

    async fn invoke(&self, state: &SessionState) -> Outcome {
        let cfg = self.config();
        let title = build_title(cfg, state);
        let body = build_body(cfg, &self.ctx.summary.full_summary);

        let mut spec = CommandSpec::new(self.ctx.config.tools.pr_script())
            .arg(&state.parent_branch)
            .arg(&state.feature_branch)
            .arg(&title)
            .arg(&body)
            .timeout(PR_SCRIPT_TIMEOUT)
            .current_dir(&self.ctx.project_root);
        if cfg.draft {
            spec = spec.arg("true");
        }

        info!(
            parent = %state.parent_branch,
            feature = %state.feature_branch,
            %title,
            draft = cfg.draft,
            "invoking pull request script"
        );
        let output = self.ctx.runner.run(spec).await;

        match PrExitCode::from_code(output.code) {
            PrExitCode::Success => self.on_success(state, &output).await,
            failure => self.on_failure(state, failure, output),
        }
    }

    async fn on_success(&self, state: &SessionState, output: &ProcessOutput) -> Outcome {
        let pr_url = extract_pr_url(&output.stdout);
        info!(pr_url = ?pr_url, "pull request created");

        let checkout = if self.config().auto_checkout_parent {
            Some(self.checkout_parent(&state.parent_branch).await)
        } else {
            None
        };

        let cleanup = if self.config().cleanup_session_state {
            Some(self.cleanup_state())
        } else {
            None
        };

        Outcome::Success(Delivered::PullRequest(PullRequestReport {
            parent_branch: state.parent_branch.clone(),
            feature_branch: state.feature_branch.clone(),
            pr_url,
            checkout,
            cleanup,
        }))
    }

    fn on_failure(&self, state: &SessionState, code: PrExitCode, output: ProcessOutput) -> Outcome {
        warn!(exit_code = code.code(), "pull request script failed");
        Failure::new(code.message())
            .exit_code(code.code())
            .stderr(output.stderr)
            .parent_branch(&state.parent_branch)
            .into()
    }

    async fn checkout_parent(&self, parent_branch: &str) -> StepResult {
        let spec = CommandSpec::new("git")
            .args(["checkout", parent_branch])
            .timeout(MESSAGING_TIMEOUT)
            .current_dir(&self.ctx.project_root);
        let output = self.ctx.runner.run(spec).await;

        if output.is_success() {
            StepResult::Success {
                detail: format!("Checked out {parent_branch}"),
            }
        } else {
            warn!(%parent_branch, exit_code = output.code, "checkout of parent branch failed");
            StepResult::Error {
                reason: format!("Failed to checkout {parent_branch}"),
                stderr: Some(output.stderr),
            }
        }
    }

    fn cleanup_state(&self) -> StepResult {
        let path = state_path(&self.ctx.project_root);

        if !self.ctx.fs.exists(&path) {
            return StepResult::Success {
                detail: "Session state already absent".to_string(),
            };
        }

        match self.ctx.fs.remove_file(&path) {
            Ok(()) => StepResult::Success {
                detail: "Session state removed".to_string(),
            },
            Err(e) => {
                warn!(path = ?path, error = %e, "failed to remove session state");
                StepResult::Error {
                    reason: format!("Failed to remove session state: {e}"),
                    stderr: None,
                }
            }
        }
    }
}

/// Title precedence: template, then the linked issue, then the feature branch.
pub fn build_title(cfg: &PullRequestConfig, state: &SessionState) -> String {
    let issue_number = state.issue_number.as_ref().map(|n| n.to_string());

    if let Some(template) = cfg.title_template.as_deref().filter(|t| !t.trim().is_empty()) {
        return template
            .replace("{issue_number}", issue_number.as_deref().unwrap_or(""))
            .replace("{issue_title}", state.issue_title.as_deref().unwrap_or(""))
            .replace("{feature_branch}", &state.feature_branch)
            .replace("{parent_branch}", &state.parent_branch);
    }

    match (issue_number, &state.issue_title) {
        (Some(number), Some(title)) => format!("#{number}: {title}"),
        (Some(number), None) => format!("Issue #{number}"),
        (None, _) => state.feature_branch.clone(),
    }
}

pub fn build_body(cfg: &PullRequestConfig, full_summary: &str) -> String {
    match cfg.body_template.as_deref().filter(|t| !t.trim().is_empty()) {
        Some(template) => template.replace("{summary}", full_summary),
        None => full_summary.to_string(),
    }
}

/// First GitHub URL printed by the script, if any.
pub fn extract_pr_url(stdout: &str) -> Option<String> {
    PR_URL.find(stdout).map(|m| m.as_str().to_string())
}

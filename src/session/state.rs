// src/session/state.rs

use std::fmt;
use std::path::{Path, PathBuf};

use serde_json::Value;
use tracing::{debug, warn};

use crate::fs::FileSystem;

/// Session-state file written by the task-start step, relative to the
/// project root.
pub const SESSION_STATE_FILE: &str = ".task_session_state.json";

/// The only schema version this engine understands.
pub const SESSION_SCHEMA_VERSION: &str = "1.0";

/// Validated in-progress branch/issue context.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionState {
    pub schema_version: String,
    pub feature_branch: String,
    pub parent_branch: String,
    pub created_at: String,
    pub issue_number: Option<IssueNumber>,
    pub issue_title: Option<String>,
}

/// Issue numbers show up both as JSON numbers and as strings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum IssueNumber {
    Number(u64),
    Text(String),
}

impl fmt::Display for IssueNumber {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            IssueNumber::Number(n) => write!(f, "{n}"),
            IssueNumber::Text(s) => f.write_str(s),
        }
    }
}

pub fn state_path(project_root: &Path) -> PathBuf {
    project_root.join(SESSION_STATE_FILE)
}

impl SessionState {
    /// Load the session state from `project_root`.
    ///
    /// Returns `None` when the file is missing, unreadable, not JSON, has the
    /// wrong schema version, or lacks a required field.
    pub fn load(fs: &dyn FileSystem, project_root: &Path) -> Option<Self> {
        let path = state_path(project_root);

        if !fs.exists(&path) {
            debug!(path = ?path, "no session state file");
            return None;
        }

        let contents = match fs.read_to_string(&path) {
            Ok(c) => c,
            Err(e) => {
                warn!(path = ?path, error = %e, "unreadable session state; ignoring");
                return None;
            }
        };

        let state = Self::from_json(&contents);
        if state.is_none() {
            warn!(path = ?path, "invalid session state; ignoring");
        }
        state
    }

    /// Parse and validate a session-state document.
    ///
    /// The required fields must be non-empty strings. Optional fields of an
    /// unexpected shape are dropped rather than invalidating the state.
    pub fn from_json(contents: &str) -> Option<Self> {
        let doc: Value = serde_json::from_str(contents).ok()?;

        if doc.get("schema_version").and_then(Value::as_str) != Some(SESSION_SCHEMA_VERSION) {
            return None;
        }

        Some(Self {
            schema_version: SESSION_SCHEMA_VERSION.to_string(),
            feature_branch: required(&doc, "feature_branch")?,
            parent_branch: required(&doc, "parent_branch")?,
            created_at: required(&doc, "created_at")?,
            issue_number: doc.get("issue_number").and_then(IssueNumber::from_value),
            issue_title: doc
                .get("github_issue")
                .and_then(|issue| issue.get("title"))
                .and_then(Value::as_str)
                .filter(|title| !title.is_empty())
                .map(str::to_string),
        })
    }
}

impl IssueNumber {
    /// Narrow a JSON value to an issue number; zero, empty and non-scalar
    /// values mean "no issue".
    fn from_value(value: &Value) -> Option<Self> {
        match value {
            Value::Number(n) => match n.as_u64() {
                Some(0) => None,
                Some(n) => Some(IssueNumber::Number(n)),
                None => Some(IssueNumber::Text(n.to_string())),
            },
            Value::String(s) if !s.is_empty() => Some(IssueNumber::Text(s.clone())),
            _ => None,
        }
    }
}

fn required(doc: &Value, field: &str) -> Option<String> {
    doc.get(field)
        .and_then(Value::as_str)
        .filter(|v| !v.is_empty())
        .map(str::to_string)
}

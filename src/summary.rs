// src/summary.rs

//! The generated wrap-up summary handed to every channel.
//!
//! Produced upstream (git history, todo lists, ...) and read-only here.
//! Channels pick their own override field and fall back to the full or
//! concise text.

use std::collections::BTreeSet;
use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::errors::Result;

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Summary {
    pub full_summary: String,
    pub concise_summary: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email_summary: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sms_summary: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub slack_summary: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub worklog_summary: Option<String>,

    #[serde(default)]
    pub sources_used: BTreeSet<String>,
}

impl Summary {
    /// Read a summary JSON document from disk.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let contents = fs::read_to_string(path.as_ref())?;
        let summary = serde_json::from_str(&contents)?;
        Ok(summary)
    }

    pub fn email_text(&self) -> &str {
        self.email_summary.as_deref().unwrap_or(&self.full_summary)
    }

    pub fn sms_text(&self) -> &str {
        self.sms_summary.as_deref().unwrap_or(&self.concise_summary)
    }

    pub fn slack_text(&self) -> &str {
        self.slack_summary.as_deref().unwrap_or(&self.full_summary)
    }

    pub fn worklog_text(&self) -> &str {
        self.worklog_summary
            .as_deref()
            .unwrap_or(&self.concise_summary)
    }
}

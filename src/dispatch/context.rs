// src/dispatch/context.rs

use std::fmt;
use std::path::PathBuf;
use std::sync::Arc;

use chrono::NaiveDate;

use crate::config::ConfigFile;
use crate::exec::{ProcessRunner, RealProcessRunner};
use crate::fs::{FileSystem, RealFileSystem};
use crate::summary::Summary;

/// Everything a channel task may read during one dispatch.
///
/// Shared read-only across all tasks (behind an `Arc`); tasks hold no
/// mutable state of their own, so no locking is involved.
pub struct DispatchContext {
    pub summary: Summary,
    pub config: ConfigFile,
    pub runner: Arc<dyn ProcessRunner>,
    pub fs: Arc<dyn FileSystem>,
    /// Directory holding the session-state file and the documentation
    /// request marker. Also the working directory for `git` and the PR script.
    pub project_root: PathBuf,
    /// Work date recorded by the worklog channel.
    pub today: NaiveDate,
    /// Session length supplied by the caller, in minutes.
    pub duration_minutes: Option<u32>,
}

impl DispatchContext {
    /// Production context: real processes, real filesystem, local clock,
    /// current working directory as project root.
    pub fn new(summary: Summary, config: ConfigFile) -> Self {
        Self {
            summary,
            config,
            runner: Arc::new(RealProcessRunner::new()),
            fs: Arc::new(RealFileSystem),
            project_root: std::env::current_dir().unwrap_or_else(|_| PathBuf::from(".")),
            today: chrono::Local::now().date_naive(),
            duration_minutes: None,
        }
    }

    pub fn with_runner(mut self, runner: Arc<dyn ProcessRunner>) -> Self {
        self.runner = runner;
        self
    }

    pub fn with_fs(mut self, fs: Arc<dyn FileSystem>) -> Self {
        self.fs = fs;
        self
    }

    pub fn with_project_root(mut self, root: impl Into<PathBuf>) -> Self {
        self.project_root = root.into();
        self
    }

    pub fn with_today(mut self, today: NaiveDate) -> Self {
        self.today = today;
        self
    }

    pub fn with_duration_minutes(mut self, minutes: Option<u32>) -> Self {
        self.duration_minutes = minutes;
        self
    }
}

impl fmt::Debug for DispatchContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DispatchContext")
            .field("project_root", &self.project_root)
            .field("today", &self.today)
            .field("duration_minutes", &self.duration_minutes)
            .field("fs", &self.fs)
            .finish_non_exhaustive()
    }
}

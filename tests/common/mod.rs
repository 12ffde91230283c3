#![allow(dead_code)]

use std::path::Path;
use std::sync::Arc;

use chrono::NaiveDate;

use wrapup::config::ConfigFile;
use wrapup::dispatch::DispatchContext;
use wrapup::fs::mock::MockFileSystem;
use wrapup::summary::Summary;

pub use wrapup_test_utils::builders::{ConfigFileBuilder, SummaryBuilder};
pub use wrapup_test_utils::fake_runner::FakeRunner;
pub use wrapup_test_utils::{init_tracing, with_timeout};

pub const PROJECT_ROOT: &str = "/work/project";

pub fn fixed_today() -> NaiveDate {
    NaiveDate::from_ymd_opt(2025, 3, 14).expect("valid date")
}

/// Context wired to a fake runner and an in-memory filesystem.
pub fn test_context(
    summary: Summary,
    config: ConfigFile,
    runner: &FakeRunner,
    fs: &MockFileSystem,
) -> DispatchContext {
    DispatchContext::new(summary, config)
        .with_runner(Arc::new(runner.clone()))
        .with_fs(Arc::new(fs.clone()))
        .with_project_root(PROJECT_ROOT)
        .with_today(fixed_today())
}

/// Write a valid session-state document into `fs` under `root`.
pub fn seed_session_state(fs: &MockFileSystem, root: &Path, parent: &str, feature: &str) {
    let doc = serde_json::json!({
        "schema_version": "1.0",
        "feature_branch": feature,
        "parent_branch": parent,
        "created_at": "2025-03-14T09:00:00Z",
        "issue_number": 42,
        "github_issue": { "title": "Fix login redirect" }
    });
    fs.add_file(
        root.join(".task_session_state.json"),
        doc.to_string().into_bytes(),
    );
}

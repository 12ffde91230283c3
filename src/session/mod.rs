// src/session/mod.rs

//! Session-scoped source-control workflow.
//!
//! - [`state`] loads and validates the persisted session state.
//! - [`workflow`] runs the branch/PR script and the follow-up checkout and
//!   cleanup steps.

pub mod state;
pub mod workflow;

pub use state::{IssueNumber, SESSION_SCHEMA_VERSION, SESSION_STATE_FILE, SessionState, state_path};
pub use workflow::{PrExitCode, SessionWorkflow, build_body, build_title, extract_pr_url};

// src/config/mod.rs

//! Configuration loading and validation for wrapup.
//!
//! Responsibilities:
//! - Define the serde-backed data model (`model.rs`).
//! - Load a config file from disk, JSON or TOML (`loader.rs`).
//! - Validate structural invariants such as the worker pool size (`validate.rs`).

pub mod loader;
pub mod model;
pub mod validate;

pub use loader::{default_config_path, load_and_validate, load_from_path};
pub use model::{
    CommunicationSection, ConfigFile, DocumentationConfig, EmailConfig, EmailRecipient,
    ExecutionSection, OptionalActions, PullRequestConfig, RawConfigFile, SlackConfig, SmsConfig,
    SmsRecipient, Toggle, ToolsSection, WorklogConfig,
};

// src/errors.rs

//! Crate-wide error aliases and helpers.
//!
//! These only cover failures that stop a run before dispatch begins (bad
//! config, unreadable summary). Everything that goes wrong *inside* a channel
//! is reported as an [`Outcome`](crate::outcome::Outcome) instead.

use thiserror::Error;

#[derive(Error, Debug)]
pub enum WrapupError {
    #[error("Configuration error: {0}")]
    ConfigError(String),

    #[error("Invalid worker pool size: {0} (must be >= 1)")]
    InvalidWorkerPool(usize),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("TOML parsing error: {0}")]
    TomlError(#[from] toml::de::Error),

    #[error("JSON parsing error: {0}")]
    JsonError(#[from] serde_json::Error),

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

pub use anyhow::Error;
pub type Result<T> = std::result::Result<T, WrapupError>;

// src/config/validate.rs

use crate::config::model::{ConfigFile, RawConfigFile};
use crate::errors::{Result, WrapupError};

impl TryFrom<RawConfigFile> for ConfigFile {
    type Error = crate::errors::WrapupError;

    fn try_from(raw: RawConfigFile) -> std::result::Result<Self, Self::Error> {
        validate_raw_config(&raw)?;
        Ok(ConfigFile::new_unchecked(raw))
    }
}

fn validate_raw_config(cfg: &RawConfigFile) -> Result<()> {
    validate_execution(cfg)?;
    validate_sms(cfg)?;
    validate_pull_request(cfg)?;
    Ok(())
}

fn validate_execution(cfg: &RawConfigFile) -> Result<()> {
    if cfg.execution.max_parallel_workers == 0 {
        return Err(WrapupError::InvalidWorkerPool(0));
    }

    if cfg.execution.dispatch_timeout_secs == Some(0) {
        return Err(WrapupError::ConfigError(
            "execution.dispatch_timeout_secs must be >= 1 (got 0)".to_string(),
        ));
    }

    Ok(())
}

fn validate_sms(cfg: &RawConfigFile) -> Result<()> {
    // Truncation keeps `max_length - 3` chars and appends "...".
    let max_length = cfg.communication.sms.max_length;
    if max_length < 4 {
        return Err(WrapupError::ConfigError(format!(
            "communication.sms.max_length must be >= 4 (got {max_length})"
        )));
    }
    Ok(())
}

fn validate_pull_request(cfg: &RawConfigFile) -> Result<()> {
    if cfg.pull_request.default_parent_branch.trim().is_empty() {
        return Err(WrapupError::ConfigError(
            "pull_request.default_parent_branch cannot be empty".to_string(),
        ));
    }
    Ok(())
}

// src/config/loader.rs

use std::fs;
use std::path::{Path, PathBuf};

use crate::config::model::{ConfigFile, RawConfigFile};
use crate::errors::Result;

/// Load a configuration file from a given path and return the raw `RawConfigFile`.
///
/// `*.toml` files are parsed as TOML, everything else as JSON (the format the
/// wrap-up skill stores in `.task_wrapup_skill_data.json`). This only performs
/// deserialization; use [`load_and_validate`] for the structural checks.
pub fn load_from_path(path: impl AsRef<Path>) -> Result<RawConfigFile> {
    let path = path.as_ref();
    let contents = fs::read_to_string(path)?;

    let config: RawConfigFile = if is_toml(path) {
        toml::from_str(&contents)?
    } else {
        serde_json::from_str(&contents)?
    };

    Ok(config)
}

/// Load a configuration file from path and run structural validation.
///
/// This is the recommended entry point for the rest of the application:
///
/// - Reads JSON or TOML.
/// - Applies defaults (handled by `serde` + `Default` impls).
/// - Checks worker pool size, SMS cap, parent branch and dispatch timeout.
///
/// Channel-level requirements (recipients, Slack channel) are left to the
/// channel tasks, which report them as `Error` outcomes.
pub fn load_and_validate(path: impl AsRef<Path>) -> Result<ConfigFile> {
    let raw_config = load_from_path(&path)?;
    let config = ConfigFile::try_from(raw_config)?;
    Ok(config)
}

/// Default config location: `.task_wrapup_skill_data.json` in the current
/// working directory.
pub fn default_config_path() -> PathBuf {
    PathBuf::from(".task_wrapup_skill_data.json")
}

fn is_toml(path: &Path) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| ext.eq_ignore_ascii_case("toml"))
}

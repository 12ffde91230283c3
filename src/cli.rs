// src/cli.rs

//! CLI argument parsing using `clap`.

use std::path::PathBuf;

use clap::{Parser, ValueEnum};

/// Command-line arguments for `wrapup`.
#[derive(Debug, Clone, Parser)]
#[command(
    name = "wrapup",
    version,
    about = "Fan a work-session summary out to every configured channel.",
    long_about = None
)]
pub struct CliArgs {
    /// Path to the summary JSON file.
    #[arg(long, value_name = "PATH")]
    pub summary: PathBuf,

    /// Path to the config file (JSON, or TOML when it ends in `.toml`).
    ///
    /// Default: `.task_wrapup_skill_data.json` in the current working directory.
    #[arg(long, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Run channels one at a time instead of in parallel.
    #[arg(long)]
    pub sequential: bool,

    /// Project root holding the session state file. Defaults to the current
    /// working directory.
    #[arg(long, value_name = "DIR")]
    pub project_root: Option<PathBuf>,

    /// Session length recorded in the worklog, in minutes.
    #[arg(long, value_name = "MINUTES")]
    pub duration_minutes: Option<u32>,

    /// Logging level (error, warn, info, debug, trace).
    ///
    /// If omitted, `WRAPUP_LOG` or a default level will be used.
    #[arg(long, value_enum, value_name = "LEVEL")]
    pub log_level: Option<LogLevel>,

    /// Load and validate inputs, print the channel plan, send nothing.
    #[arg(long)]
    pub dry_run: bool,
}

/// Log level as exposed on the CLI.
#[derive(Debug, Copy, Clone, ValueEnum)]
pub enum LogLevel {
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

/// Convenience wrapper around `CliArgs::parse()`.
pub fn parse() -> CliArgs {
    CliArgs::parse()
}

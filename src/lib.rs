// src/lib.rs

pub mod channels;
pub mod cli;
pub mod config;
pub mod dispatch;
pub mod errors;
pub mod exec;
pub mod fs;
pub mod logging;
pub mod outcome;
pub mod report;
pub mod session;
pub mod summary;
pub mod types;

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result};
use serde::Serialize;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info};

use crate::channels::is_enabled;
use crate::cli::CliArgs;
use crate::config::{ConfigFile, default_config_path, load_and_validate};
use crate::dispatch::{DispatchContext, DispatchOptions, Dispatcher};
use crate::outcome::OutcomeMap;
use crate::summary::Summary;
use crate::types::{ChannelKind, DispatchMode};

/// JSON document printed on stdout after a dispatch.
#[derive(Debug, Serialize)]
pub struct RunResult<'a> {
    pub status: &'static str,
    pub results: &'a OutcomeMap,
    pub summary: &'a str,
}

/// High-level entry point used by `main.rs`.
///
/// This wires together:
/// - config and summary loading
/// - the dispatcher (worker pool, mode, overall timeout)
/// - Ctrl-C → batch cancellation
/// - the pull request follow-up after the delivery batch
/// - report rendering and output
pub async fn run(args: CliArgs) -> Result<()> {
    let config_path = args.config.clone().unwrap_or_else(default_config_path);
    let cfg = load_and_validate(&config_path)
        .with_context(|| format!("loading config {}", config_path.display()))?;
    let summary = Summary::load(&args.summary)
        .with_context(|| format!("loading summary {}", args.summary.display()))?;

    let mut options = DispatchOptions::from_config(&cfg.execution);
    if args.sequential {
        options = options.with_mode(DispatchMode::Sequential);
    }
    let dispatcher = Dispatcher::new(options)?;

    if args.dry_run {
        print_dry_run(&cfg, &options);
        return Ok(());
    }

    let project_root = match args.project_root {
        Some(root) => root,
        None => std::env::current_dir().unwrap_or_else(|_| PathBuf::from(".")),
    };
    let ctx = DispatchContext::new(summary, cfg)
        .with_project_root(project_root)
        .with_duration_minutes(args.duration_minutes);

    // Ctrl-C → stop starting new channels.
    let cancel = CancellationToken::new();
    {
        let cancel = cancel.clone();
        tokio::spawn(async move {
            if let Err(e) = tokio::signal::ctrl_c().await {
                eprintln!("failed to listen for Ctrl+C: {e}");
                return;
            }
            info!("interrupt received; cancelling dispatch");
            cancel.cancel();
        });
    }

    let outcomes = dispatcher.wrap_up(Arc::new(ctx), cancel).await;
    let report = report::render(&outcomes);

    let result = RunResult {
        status: "success",
        results: &outcomes,
        summary: &report,
    };
    println!("{}", serde_json::to_string(&result)?);
    eprintln!("\n{report}");

    Ok(())
}

/// Simple dry-run output: which channels would act, and how.
fn print_dry_run(cfg: &ConfigFile, options: &DispatchOptions) {
    println!("wrapup dry-run");
    println!("  project_name = {:?}", cfg.project_name);
    println!("  mode = {:?}", options.mode);
    println!("  max_workers = {}", options.max_workers);
    if let Some(timeout) = options.overall_timeout {
        println!("  overall_timeout = {}s", timeout.as_secs());
    }
    println!();

    println!("channels ({}):", ChannelKind::ALL.len());
    for kind in ChannelKind::ALL {
        let state = if is_enabled(kind, cfg) {
            "enabled"
        } else {
            "disabled"
        };
        if kind.is_follow_up() {
            println!("  - {kind}: {state} (follow-up)");
        } else {
            println!("  - {kind}: {state}");
        }
    }

    debug!("dry-run complete (no dispatch)");
}

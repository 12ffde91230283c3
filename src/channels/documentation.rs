// src/channels/documentation.rs

use std::path::PathBuf;

use anyhow::Result;
use tracing::{info, warn};

use crate::dispatch::DispatchContext;
use crate::outcome::{Delivered, Outcome};

/// Marker file picked up by the documentation updater.
pub const DOC_REQUEST_FILE: &str = ".task_wrapup_doc_update_request.md";

/// Drop a documentation update request into the project root.
pub async fn run(ctx: &DispatchContext) -> Result<Outcome> {
    let cfg = &ctx.config.documentation;

    if !cfg.enabled {
        return Ok(Outcome::skipped("Documentation disabled"));
    }

    if !cfg.auto_update {
        return Ok(Outcome::skipped("Auto-update disabled"));
    }

    let request = render_request(
        ctx.config.project_name_or("Project"),
        &chrono::Local::now().format("%Y-%m-%d %H:%M:%S").to_string(),
        &cfg.strategy,
        &ctx.summary.full_summary,
        &cfg.paths,
    );

    let request_file = request_path(ctx);
    if let Err(e) = ctx.fs.write(&request_file, request.as_bytes()) {
        warn!(path = ?request_file, error = %e, "failed to write documentation request");
        return Ok(Outcome::error(format!(
            "Failed to create documentation update request: {e}"
        )));
    }

    info!(path = ?request_file, strategy = %cfg.strategy, "documentation request created");

    let request_file = request_file.display().to_string();
    Ok(Outcome::Success(Delivered::Documentation {
        strategy: cfg.strategy.clone(),
        paths: cfg.paths.clone(),
        message: format!("Documentation update request created: {request_file}"),
        request_file,
    }))
}

pub fn request_path(ctx: &DispatchContext) -> PathBuf {
    ctx.project_root.join(DOC_REQUEST_FILE)
}

fn render_request(
    project: &str,
    timestamp: &str,
    strategy: &str,
    session_summary: &str,
    paths: &[String],
) -> String {
    let targets = paths
        .iter()
        .map(|p| format!("- {p}"))
        .collect::<Vec<_>>()
        .join("\n");

    format!(
        "# Documentation Update Request\n\
         \n\
         Project: {project}\n\
         Date: {timestamp}\n\
         Strategy: {strategy}\n\
         \n\
         ## Session Summary\n\
         \n\
         {session_summary}\n\
         \n\
         ## Target Documentation Files\n\
         \n\
         {targets}\n\
         \n\
         ## Instructions\n\
         \n\
         Please update the following documentation based on this session:\n\
         \n\
         1. **CHANGELOG.md**: Add entry for today's changes\n\
         2. **README.md**: Update any sections affected by changes (if applicable)\n\
         3. Other specified paths: Update as needed based on context\n\
         \n\
         Use the {strategy} strategy to merge this information.\n"
    )
}

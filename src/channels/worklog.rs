// src/channels/worklog.rs

use anyhow::Result;
use tracing::{info, warn};

use crate::config::WorklogConfig;
use crate::dispatch::DispatchContext;
use crate::exec::{CommandSpec, MESSAGING_TIMEOUT};
use crate::outcome::{Delivered, Failure, Outcome};

/// Append a worklog entry for today through the external worklog manager.
pub async fn run(ctx: &DispatchContext) -> Result<Outcome> {
    let cfg = &ctx.config.worklog;

    if !cfg.enabled {
        return Ok(Outcome::skipped("Worklog disabled"));
    }

    let description = ctx.summary.worklog_text().to_string();
    let date = ctx.today.format("%Y-%m-%d").to_string();
    let client = ctx.config.project_name.clone();
    let hours = effective_minutes(cfg, ctx.duration_minutes).map(minutes_to_hours);

    let mut spec = CommandSpec::new("python3")
        .arg(ctx.config.tools.worklog_script())
        .args(["add", "--date", date.as_str(), "--description", description.as_str()])
        .timeout(MESSAGING_TIMEOUT);

    if !client.is_empty() {
        spec = spec.arg("--client").arg(&client);
    }

    if let Some(hours) = hours {
        spec = spec.arg("--hours").arg(format_hours(hours));
    }

    let output = ctx.runner.run(spec).await;

    if output.is_success() {
        info!(%date, ?hours, "worklog entry added");
        Ok(Outcome::Success(Delivered::Worklog {
            date,
            description,
            client,
            hours,
        }))
    } else {
        warn!(exit_code = output.code, "worklog entry failed");
        Ok(Failure::new(output.stderr_or("Worklog entry failed"))
            .exit_code(output.code)
            .stderr(output.stderr)
            .into())
    }
}

/// Caller-supplied duration applies only when the config expects one to be
/// asked for; otherwise the configured default is used.
pub fn effective_minutes(cfg: &WorklogConfig, supplied: Option<u32>) -> Option<u32> {
    match supplied {
        Some(minutes) if cfg.prompt_for_duration => Some(minutes),
        _ => cfg.default_duration_minutes,
    }
}

pub fn minutes_to_hours(minutes: u32) -> f64 {
    f64::from(minutes) / 60.0
}

/// Render hours the way the worklog manager expects (`1.5`, `1.0`, `0.25`).
pub fn format_hours(hours: f64) -> String {
    format!("{hours:?}")
}

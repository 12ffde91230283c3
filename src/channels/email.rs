// src/channels/email.rs

use std::io::Write;

use anyhow::{Context, Result};
use tracing::{info, warn};

use crate::dispatch::DispatchContext;
use crate::exec::{CommandSpec, MESSAGING_TIMEOUT};
use crate::outcome::{Delivered, Failure, Outcome};

/// Send the summary by email through the external mail sender.
///
/// The body is handed over as a temp file; the file lives exactly as long as
/// this function's scope and is removed on every exit path.
pub async fn run(ctx: &DispatchContext) -> Result<Outcome> {
    let cfg = &ctx.config.communication.email;

    if !cfg.enabled {
        return Ok(Outcome::skipped("Email disabled"));
    }

    if cfg.recipients.is_empty() {
        return Ok(Outcome::error("No email recipients configured"));
    }

    let to: Vec<String> = cfg.recipients.iter().map(|r| r.email.clone()).collect();
    let cc: Vec<String> = cfg.cc.iter().map(|r| r.email.clone()).collect();
    let subject = format!(
        "Work Session Update: {}",
        ctx.config.project_name_or("Project")
    );

    let mut body_file = tempfile::Builder::new()
        .prefix("wrapup-email-")
        .suffix(".txt")
        .tempfile()
        .context("creating email body file")?;
    body_file
        .write_all(ctx.summary.email_text().as_bytes())
        .context("writing email body file")?;
    body_file.flush().context("flushing email body file")?;

    let mut spec = CommandSpec::new("ruby")
        .arg(ctx.config.tools.email_script())
        .arg("--send")
        .arg("--to")
        .arg(to.join(","))
        .arg("--subject")
        .arg(subject)
        .arg("--body-file")
        .arg(body_file.path())
        .timeout(MESSAGING_TIMEOUT);

    if !cc.is_empty() {
        spec = spec.arg("--cc").arg(cc.join(","));
    }

    let output = ctx.runner.run(spec).await;

    if output.is_success() {
        info!(recipients = to.len(), cc = cc.len(), "email sent");
        Ok(Outcome::Success(Delivered::Email { recipients: to, cc }))
    } else {
        warn!(exit_code = output.code, "email sending failed");
        Ok(Failure::new(output.stderr_or("Email sending failed"))
            .exit_code(output.code)
            .stderr(output.stderr)
            .attempted_recipients(to)
            .into())
    }
}

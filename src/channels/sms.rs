// src/channels/sms.rs

use anyhow::Result;
use tracing::{debug, info, warn};

use crate::dispatch::DispatchContext;
use crate::exec::{CommandSpec, MESSAGING_TIMEOUT};
use crate::outcome::{DeliveryStatus, FanOutReport, Outcome, RecipientResult};

/// Marker appended to truncated messages.
const ELLIPSIS: &str = "...";

/// Text each recipient one at a time. Never a group message.
///
/// A failure for one recipient does not stop the others; the outcome is
/// `Success` only if nobody failed, `PartialSuccess` otherwise.
pub async fn run(ctx: &DispatchContext) -> Result<Outcome> {
    let cfg = &ctx.config.communication.sms;

    if !cfg.enabled {
        return Ok(Outcome::skipped("SMS disabled"));
    }

    if cfg.recipients.is_empty() {
        return Ok(Outcome::error("No SMS recipients configured"));
    }

    let script = ctx.config.tools.sms_script();
    let mut details = Vec::with_capacity(cfg.recipients.len());

    for recipient in &cfg.recipients {
        let content = prepare_message(ctx.summary.sms_text(), cfg.max_length);
        let name = recipient.display_name();

        let spec = CommandSpec::new(&script)
            .arg(&recipient.phone)
            .arg(content)
            .timeout(MESSAGING_TIMEOUT);
        let output = ctx.runner.run(spec).await;

        if output.is_success() {
            debug!(recipient = %name, "sms sent");
            details.push(RecipientResult {
                recipient: name,
                phone: recipient.phone.clone(),
                status: DeliveryStatus::Success,
                reason: None,
                exit_code: None,
            });
        } else {
            warn!(recipient = %name, exit_code = output.code, "sms sending failed");
            details.push(RecipientResult {
                recipient: name,
                phone: recipient.phone.clone(),
                status: DeliveryStatus::Error,
                reason: Some(output.stderr_or("SMS sending failed")),
                exit_code: Some(output.code),
            });
        }
    }

    let report = FanOutReport::from_details(details);
    info!(
        total = report.total,
        successful = report.successful,
        failed = report.failed,
        "sms fan-out finished"
    );
    Ok(Outcome::from_fan_out(report))
}

/// Cap `content` at `max_length` characters and strip apostrophes, which the
/// downstream sender cannot quote.
pub fn prepare_message(content: &str, max_length: usize) -> String {
    truncate_message(content, max_length).replace('\'', "")
}

/// Keep `max_length - 3` characters and append `"..."` when `content` is
/// longer than `max_length` characters.
pub fn truncate_message(content: &str, max_length: usize) -> String {
    if content.chars().count() <= max_length {
        return content.to_string();
    }
    let keep = max_length.saturating_sub(ELLIPSIS.len());
    let mut truncated: String = content.chars().take(keep).collect();
    truncated.push_str(ELLIPSIS);
    truncated
}

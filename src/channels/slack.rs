// src/channels/slack.rs

use anyhow::Result;
use tracing::info;

use crate::dispatch::DispatchContext;
use crate::outcome::{Delivered, Outcome};

/// Compose the Slack message. Delivery itself is not wired to a workspace
/// yet, so a well-formed message is reported as a pending success.
pub async fn run(ctx: &DispatchContext) -> Result<Outcome> {
    let cfg = &ctx.config.communication.slack;

    if !cfg.enabled {
        return Ok(Outcome::skipped("Slack disabled"));
    }

    if cfg.channel.trim().is_empty() {
        return Ok(Outcome::error("No Slack channel configured"));
    }

    let content = compose_message(ctx.summary.slack_text(), &cfg.mention_users);
    info!(channel = %cfg.channel, chars = content.chars().count(), "slack message composed");

    Ok(Outcome::Success(Delivered::Slack {
        channel: cfg.channel.clone(),
        content,
        message: "Slack integration pending - would send message here".to_string(),
    }))
}

/// Prefix `text` with `<@user>` mentions, separated by a blank line.
pub fn compose_message(text: &str, mention_users: &[String]) -> String {
    if mention_users.is_empty() {
        return text.to_string();
    }
    let mentions = mention_users
        .iter()
        .map(|user| format!("<@{user}>"))
        .collect::<Vec<_>>()
        .join(" ");
    format!("{mentions}\n\n{text}")
}

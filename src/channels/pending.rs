// src/channels/pending.rs

//! Channels whose downstream integration is not wired up yet.
//!
//! They still honour the enablement contract and return a well-formed
//! outcome, so the report and the tally treat them like any other channel.

use anyhow::Result;
use tracing::debug;

use crate::dispatch::DispatchContext;
use crate::outcome::{Delivered, Outcome};

pub async fn run_calendar(ctx: &DispatchContext) -> Result<Outcome> {
    if !ctx.config.optional_actions.calendar.enabled {
        return Ok(Outcome::skipped("Calendar disabled"));
    }
    debug!("calendar channel enabled; integration pending");
    Ok(pending("Calendar event creation pending - would invoke calendar skill"))
}

pub async fn run_github(ctx: &DispatchContext) -> Result<Outcome> {
    if !ctx.config.optional_actions.github.enabled {
        return Ok(Outcome::skipped("GitHub disabled"));
    }
    debug!("github channel enabled; integration pending");
    Ok(pending("GitHub item creation pending - would invoke /sc:git"))
}

fn pending(message: &str) -> Outcome {
    Outcome::Success(Delivered::Pending {
        message: message.to_string(),
    })
}

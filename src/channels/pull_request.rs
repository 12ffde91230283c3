// src/channels/pull_request.rs

use anyhow::Result;

use crate::dispatch::DispatchContext;
use crate::outcome::Outcome;
use crate::session::SessionWorkflow;

/// Pull request channel: a thin pass-through to [`SessionWorkflow`].
pub async fn run(ctx: &DispatchContext) -> Result<Outcome> {
    if !ctx.config.pull_request.enabled {
        return Ok(Outcome::skipped("Pull request creation disabled"));
    }

    Ok(SessionWorkflow::new(ctx).run().await)
}

// src/channels/mod.rs

//! Delivery channels.
//!
//! One module per channel, each exposing `async fn run(ctx) -> Result<Outcome>`
//! with the same contract:
//!
//! 1. disabled → `Skipped`, no side effect;
//! 2. missing channel-specific requirement → `Error`;
//! 3. resolve content (override field, then the full/concise default);
//! 4. perform the action and map the result to an `Outcome`.
//!
//! An `Err` from a channel body means something unexpected happened (e.g. a
//! temp file could not be created); the coordinator turns it into an `Error`
//! outcome at the task boundary.

use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;

use anyhow::Result;

use crate::config::ConfigFile;
use crate::dispatch::DispatchContext;
use crate::outcome::Outcome;
use crate::types::ChannelKind;

pub mod documentation;
pub mod email;
pub mod pending;
pub mod pull_request;
pub mod slack;
pub mod sms;
pub mod worklog;

/// Future returned by a channel task. Owned (`'static`) so the coordinator
/// can hand it to `tokio::spawn`.
pub type ChannelFuture = Pin<Box<dyn Future<Output = Result<Outcome>> + Send>>;

/// A unit of work that delivers the summary through exactly one channel.
pub trait ChannelTask: Send + Sync {
    /// Key under which the outcome is reported.
    fn name(&self) -> &str;

    fn run(&self, ctx: Arc<DispatchContext>) -> ChannelFuture;
}

/// One of the built-in channels.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BuiltinChannel(pub ChannelKind);

impl ChannelTask for BuiltinChannel {
    fn name(&self) -> &str {
        self.0.name()
    }

    fn run(&self, ctx: Arc<DispatchContext>) -> ChannelFuture {
        let kind = self.0;
        Box::pin(async move { run_builtin(kind, &ctx).await })
    }
}

/// The delivery channels, in canonical report order.
pub fn builtin_tasks() -> Vec<Arc<dyn ChannelTask>> {
    ChannelKind::DELIVERY
        .into_iter()
        .map(|kind| Arc::new(BuiltinChannel(kind)) as Arc<dyn ChannelTask>)
        .collect()
}

/// The pull request workflow, run once the delivery batch is done.
pub fn follow_up_task() -> Arc<dyn ChannelTask> {
    Arc::new(BuiltinChannel(ChannelKind::PullRequest))
}

async fn run_builtin(kind: ChannelKind, ctx: &DispatchContext) -> Result<Outcome> {
    match kind {
        ChannelKind::Email => email::run(ctx).await,
        ChannelKind::Sms => sms::run(ctx).await,
        ChannelKind::Slack => slack::run(ctx).await,
        ChannelKind::Worklog => worklog::run(ctx).await,
        ChannelKind::Documentation => documentation::run(ctx).await,
        ChannelKind::Calendar => pending::run_calendar(ctx).await,
        ChannelKind::Github => pending::run_github(ctx).await,
        ChannelKind::PullRequest => pull_request::run(ctx).await,
    }
}

/// Whether `kind` would attempt its side effect under `config`.
pub fn is_enabled(kind: ChannelKind, config: &ConfigFile) -> bool {
    match kind {
        ChannelKind::Email => config.communication.email.enabled,
        ChannelKind::Sms => config.communication.sms.enabled,
        ChannelKind::Slack => config.communication.slack.enabled,
        ChannelKind::Worklog => config.worklog.enabled,
        ChannelKind::Documentation => {
            config.documentation.enabled && config.documentation.auto_update
        }
        ChannelKind::Calendar => config.optional_actions.calendar.enabled,
        ChannelKind::Github => config.optional_actions.github.enabled,
        ChannelKind::PullRequest => config.pull_request.enabled,
    }
}

// src/dispatch/coordinator.rs

//! Scatter-gather over channel tasks.
//!
//! The coordinator guarantees one outcome per task it was given, whatever the
//! tasks do:
//! - an `Err` returned by a task becomes `Error("Exception: ...")`;
//! - a panic inside a task becomes `Error("Exception: <panic message>")`;
//! - a task still running when the overall deadline passes is aborted and
//!   reported as `Error("Dispatch timed out after Ns")`;
//! - a task not yet started when the batch is cancelled is reported as
//!   `Skipped`.
//!
//! Parallel mode bounds concurrency with a semaphore sized from
//! `execution.max_parallel_workers`; sequential mode runs tasks one by one in
//! the given order. Both produce the same outcome map, and neither starts a
//! task once the deadline has passed.
//!
//! [`Dispatcher::wrap_up`] runs the delivery batch and then the pull request
//! workflow as a follow-up step. The follow-up is reported alongside the
//! channels but kept out of the channel tally.

use std::any::Any;
use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

use tokio::sync::Semaphore;
use tokio::task::{JoinError, JoinSet};
use tokio::time::Instant;
use tokio_util::sync::CancellationToken;
use tracing::{debug, error, info, warn};

use crate::channels::{ChannelTask, builtin_tasks, follow_up_task};
use crate::config::ExecutionSection;
use crate::errors::{Result, WrapupError};
use crate::outcome::{Outcome, OutcomeMap};
use crate::types::DispatchMode;

use super::context::DispatchContext;

const CANCELLED_REASON: &str = "Dispatch cancelled before channel started";

/// Scheduling knobs for one dispatch.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DispatchOptions {
    pub mode: DispatchMode,
    pub max_workers: usize,
    /// Deadline for the whole batch; `None` waits for every task.
    pub overall_timeout: Option<Duration>,
}

impl Default for DispatchOptions {
    fn default() -> Self {
        Self {
            mode: DispatchMode::Parallel,
            max_workers: 5,
            overall_timeout: None,
        }
    }
}

impl DispatchOptions {
    pub fn from_config(execution: &ExecutionSection) -> Self {
        Self {
            mode: if execution.parallel_execution {
                DispatchMode::Parallel
            } else {
                DispatchMode::Sequential
            },
            max_workers: execution.max_parallel_workers,
            overall_timeout: execution.dispatch_timeout_secs.map(Duration::from_secs),
        }
    }

    pub fn with_mode(mut self, mode: DispatchMode) -> Self {
        self.mode = mode;
        self
    }

    pub fn with_max_workers(mut self, max_workers: usize) -> Self {
        self.max_workers = max_workers;
        self
    }

    pub fn with_overall_timeout(mut self, timeout: Duration) -> Self {
        self.overall_timeout = Some(timeout);
        self
    }
}

/// Runs a batch of channel tasks and reconciles their outcomes.
#[derive(Debug, Clone)]
pub struct Dispatcher {
    options: DispatchOptions,
}

impl Dispatcher {
    /// Fails only for an unusable worker pool; nothing has been dispatched
    /// at that point.
    pub fn new(options: DispatchOptions) -> Result<Self> {
        if options.max_workers == 0 {
            return Err(WrapupError::InvalidWorkerPool(options.max_workers));
        }
        Ok(Self { options })
    }

    pub fn options(&self) -> DispatchOptions {
        self.options
    }

    pub async fn dispatch(
        &self,
        tasks: Vec<Arc<dyn ChannelTask>>,
        ctx: Arc<DispatchContext>,
    ) -> OutcomeMap {
        self.dispatch_with_cancel(tasks, ctx, CancellationToken::new())
            .await
    }

    /// Run every task and return one outcome per task, in task order.
    ///
    /// Cancelling `cancel` stops new tasks from starting; tasks already
    /// running finish or hit their own timeouts.
    pub async fn dispatch_with_cancel(
        &self,
        tasks: Vec<Arc<dyn ChannelTask>>,
        ctx: Arc<DispatchContext>,
        cancel: CancellationToken,
    ) -> OutcomeMap {
        let deadline = self.deadline();
        self.dispatch_until(tasks, ctx, cancel, deadline).await
    }

    /// Full wrap-up: every delivery channel, then the pull request workflow.
    ///
    /// The follow-up shares the batch deadline and cancellation token. It is
    /// skipped when the batch was cancelled and never starts after the
    /// deadline.
    pub async fn wrap_up(&self, ctx: Arc<DispatchContext>, cancel: CancellationToken) -> OutcomeMap {
        let deadline = self.deadline();
        let mut outcomes = self
            .dispatch_until(builtin_tasks(), Arc::clone(&ctx), cancel.clone(), deadline)
            .await;

        let task = follow_up_task();
        let name = task.name().to_string();
        let outcome = if cancel.is_cancelled() {
            Outcome::skipped(CANCELLED_REASON)
        } else {
            info!(channel = %name, "running follow-up");
            self.run_guarded(task, ctx, deadline).await
        };
        log_outcome(&name, &outcome);
        outcomes.insert_follow_up(name, outcome);

        outcomes
    }

    fn deadline(&self) -> Option<Instant> {
        self.options.overall_timeout.map(|d| Instant::now() + d)
    }

    async fn dispatch_until(
        &self,
        tasks: Vec<Arc<dyn ChannelTask>>,
        ctx: Arc<DispatchContext>,
        cancel: CancellationToken,
        deadline: Option<Instant>,
    ) -> OutcomeMap {
        let order: Vec<String> = tasks.iter().map(|t| t.name().to_string()).collect();

        info!(
            channels = order.len(),
            mode = ?self.options.mode,
            max_workers = self.options.max_workers,
            "dispatch started"
        );

        let mut collected = match self.options.mode {
            DispatchMode::Parallel => self.run_parallel(tasks, ctx, cancel, deadline).await,
            DispatchMode::Sequential => self.run_sequential(tasks, ctx, cancel, deadline).await,
        };

        let outcomes: OutcomeMap = order
            .into_iter()
            .map(|name| {
                let outcome = collected.remove(&name).unwrap_or_else(|| {
                    error!(channel = %name, "channel produced no outcome");
                    Outcome::error("Channel produced no outcome")
                });
                (name, outcome)
            })
            .collect();

        info!(channels = outcomes.len(), "dispatch finished");
        outcomes
    }

    async fn run_parallel(
        &self,
        tasks: Vec<Arc<dyn ChannelTask>>,
        ctx: Arc<DispatchContext>,
        cancel: CancellationToken,
        deadline: Option<Instant>,
    ) -> HashMap<String, Outcome> {
        let pool = Arc::new(Semaphore::new(self.options.max_workers));
        let mut join_set = JoinSet::new();
        let mut in_flight = HashMap::new();
        let mut results = HashMap::new();

        for task in tasks {
            let name = task.name().to_string();
            let pool = Arc::clone(&pool);
            let ctx = Arc::clone(&ctx);
            let cancel = cancel.clone();
            let timed_out = self.timed_out();

            let handle = join_set.spawn(async move {
                // Cancellation wins over a free worker.
                let permit = tokio::select! {
                    biased;
                    _ = cancel.cancelled() => None,
                    permit = pool.acquire_owned() => Some(permit),
                };
                let _permit = match permit {
                    None => return Ok(Outcome::skipped(CANCELLED_REASON)),
                    Some(Err(_)) => return Ok(Outcome::error("Worker pool closed")),
                    Some(Ok(permit)) => permit,
                };
                // A permit freed right at the deadline must not start new work.
                if deadline.is_some_and(|d| Instant::now() >= d) {
                    return Ok(timed_out);
                }
                task.run(ctx).await
            });
            in_flight.insert(handle.id(), name);
        }

        loop {
            let joined = match deadline {
                Some(deadline) => {
                    match tokio::time::timeout_at(deadline, join_set.join_next_with_id()).await {
                        Ok(joined) => joined,
                        Err(_) => {
                            warn!(remaining = in_flight.len(), "dispatch deadline reached; aborting");
                            join_set.abort_all();
                            break;
                        }
                    }
                }
                None => join_set.join_next_with_id().await,
            };

            let Some(joined) = joined else { break };

            let (id, outcome) = match joined {
                Ok((id, result)) => (id, settle(result)),
                Err(err) => (err.id(), from_join_error(err)),
            };

            if let Some(name) = in_flight.remove(&id) {
                log_outcome(&name, &outcome);
                results.insert(name, outcome);
            }
        }

        for (_, name) in in_flight {
            results.insert(name, self.timed_out());
        }

        results
    }

    async fn run_sequential(
        &self,
        tasks: Vec<Arc<dyn ChannelTask>>,
        ctx: Arc<DispatchContext>,
        cancel: CancellationToken,
        deadline: Option<Instant>,
    ) -> HashMap<String, Outcome> {
        let mut results = HashMap::new();

        for task in tasks {
            let name = task.name().to_string();

            let outcome = if cancel.is_cancelled() {
                Outcome::skipped(CANCELLED_REASON)
            } else {
                self.run_guarded(task, Arc::clone(&ctx), deadline).await
            };
            log_outcome(&name, &outcome);
            results.insert(name, outcome);
        }

        results
    }

    /// Run one task inside its own spawned task, bounded by `deadline`.
    ///
    /// Nothing is spawned once the deadline has passed.
    async fn run_guarded(
        &self,
        task: Arc<dyn ChannelTask>,
        ctx: Arc<DispatchContext>,
        deadline: Option<Instant>,
    ) -> Outcome {
        if deadline.is_some_and(|d| Instant::now() >= d) {
            debug!(channel = %task.name(), "deadline already passed; not starting");
            return self.timed_out();
        }

        // Spawned so a panic stays inside the task, same as parallel mode.
        let mut handle = tokio::spawn(task.run(ctx));

        let joined = match deadline {
            Some(deadline) => match tokio::time::timeout_at(deadline, &mut handle).await {
                Ok(joined) => joined,
                Err(_) => {
                    handle.abort();
                    warn!(channel = %task.name(), "dispatch deadline reached; aborting");
                    return self.timed_out();
                }
            },
            None => handle.await,
        };

        match joined {
            Ok(result) => settle(result),
            Err(err) => from_join_error(err),
        }
    }

    fn timed_out(&self) -> Outcome {
        let secs = self.options.overall_timeout.map_or(0, |d| d.as_secs());
        Outcome::error(format!("Dispatch timed out after {secs}s"))
    }
}

/// Task boundary: an `Err` from the body becomes an `Error` outcome.
fn settle(result: anyhow::Result<Outcome>) -> Outcome {
    match result {
        Ok(outcome) => outcome,
        Err(err) => {
            error!(error = %err, "channel task failed");
            Outcome::error(format!("Exception: {err:#}"))
        }
    }
}

/// Task boundary: a panic (or abort) becomes an `Error` outcome.
fn from_join_error(err: JoinError) -> Outcome {
    if err.is_panic() {
        let message = panic_message(err.into_panic());
        error!(panic = %message, "channel task panicked");
        Outcome::error(format!("Exception: {message}"))
    } else {
        Outcome::error("Exception: channel task was cancelled")
    }
}

fn panic_message(payload: Box<dyn Any + Send>) -> String {
    if let Some(s) = payload.downcast_ref::<&str>() {
        (*s).to_string()
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else {
        "unknown panic".to_string()
    }
}

fn log_outcome(channel: &str, outcome: &Outcome) {
    match outcome {
        Outcome::Error(failure) => {
            warn!(%channel, status = outcome.status(), reason = %failure.reason, "channel finished")
        }
        _ => debug!(%channel, status = outcome.status(), "channel finished"),
    }
}

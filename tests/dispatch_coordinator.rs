// tests/dispatch_coordinator.rs

mod common;
use crate::common::{ConfigFileBuilder, FakeRunner, SummaryBuilder, init_tracing, test_context, with_timeout};

use std::error::Error;
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

use tokio_util::sync::CancellationToken;

use wrapup::channels::{ChannelFuture, ChannelTask};
use wrapup::dispatch::{DispatchContext, DispatchOptions, Dispatcher};
use wrapup::errors::WrapupError;
use wrapup::fs::mock::MockFileSystem;
use wrapup::outcome::{Outcome, OutcomeKind};
use wrapup::types::DispatchMode;

type TestResult = Result<(), Box<dyn Error>>;

/// Test task with scripted behaviour.
struct ScriptedTask {
    name: String,
    behaviour: Behaviour,
    started: Arc<AtomicUsize>,
}

#[derive(Clone)]
enum Behaviour {
    Return(Outcome),
    Fail(&'static str),
    Panic(&'static str),
    Sleep(Duration),
}

impl ScriptedTask {
    fn new(name: &str, behaviour: Behaviour, started: &Arc<AtomicUsize>) -> Arc<dyn ChannelTask> {
        Arc::new(Self {
            name: name.to_string(),
            behaviour,
            started: Arc::clone(started),
        })
    }
}

impl ChannelTask for ScriptedTask {
    fn name(&self) -> &str {
        &self.name
    }

    fn run(&self, _ctx: Arc<DispatchContext>) -> ChannelFuture {
        let behaviour = self.behaviour.clone();
        let started = Arc::clone(&self.started);
        Box::pin(async move {
            started.fetch_add(1, Ordering::SeqCst);
            match behaviour {
                Behaviour::Return(outcome) => Ok(outcome),
                Behaviour::Fail(msg) => Err(anyhow::anyhow!(msg)),
                Behaviour::Panic(msg) => panic!("{msg}"),
                Behaviour::Sleep(d) => {
                    tokio::time::sleep(d).await;
                    Ok(Outcome::skipped("slept"))
                }
            }
        })
    }
}

fn context() -> Arc<DispatchContext> {
    Arc::new(test_context(
        SummaryBuilder::default().build(),
        ConfigFileBuilder::new().build(),
        &FakeRunner::new(),
        &MockFileSystem::new(),
    ))
}

fn seven_tasks_one_panicking(started: &Arc<AtomicUsize>) -> Vec<Arc<dyn ChannelTask>> {
    (0..7)
        .map(|i| {
            let name = format!("ch{i}");
            if i == 3 {
                ScriptedTask::new(&name, Behaviour::Panic("boom"), started)
            } else {
                ScriptedTask::new(&name, Behaviour::Return(Outcome::skipped("off")), started)
            }
        })
        .collect()
}

#[test]
fn zero_workers_is_rejected_before_dispatch() {
    let err = Dispatcher::new(DispatchOptions::default().with_max_workers(0))
        .expect_err("zero workers must be rejected");
    assert!(matches!(err, WrapupError::InvalidWorkerPool(0)));
}

#[tokio::test]
async fn panicking_task_is_isolated_in_parallel_mode() -> TestResult {
    init_tracing();
    let started = Arc::new(AtomicUsize::new(0));
    let dispatcher = Dispatcher::new(DispatchOptions::default().with_max_workers(3))?;

    let outcomes = with_timeout(dispatcher.dispatch(seven_tasks_one_panicking(&started), context())).await;

    assert_eq!(outcomes.len(), 7);
    assert_eq!(
        outcomes.channels().collect::<Vec<_>>(),
        vec!["ch0", "ch1", "ch2", "ch3", "ch4", "ch5", "ch6"]
    );
    let crashed = outcomes.get("ch3").ok_or("missing ch3")?;
    assert_eq!(crashed.kind(), OutcomeKind::Error);
    assert_eq!(crashed.reason(), Some("Exception: boom"));
    for (name, outcome) in outcomes.iter().filter(|(n, _)| *n != "ch3") {
        assert_eq!(outcome, &Outcome::skipped("off"), "channel {name}");
    }
    assert_eq!(started.load(Ordering::SeqCst), 7);
    Ok(())
}

#[tokio::test]
async fn parallel_and_sequential_agree() -> TestResult {
    init_tracing();
    let started = Arc::new(AtomicUsize::new(0));
    let parallel = Dispatcher::new(DispatchOptions::default())?;
    let sequential = Dispatcher::new(DispatchOptions::default().with_mode(DispatchMode::Sequential))?;

    let a = with_timeout(parallel.dispatch(seven_tasks_one_panicking(&started), context())).await;
    let b = with_timeout(sequential.dispatch(seven_tasks_one_panicking(&started), context())).await;

    assert_eq!(a, b);
    Ok(())
}

#[tokio::test]
async fn returned_error_becomes_exception_outcome() -> TestResult {
    init_tracing();
    let started = Arc::new(AtomicUsize::new(0));
    let tasks = vec![
        ScriptedTask::new("bad", Behaviour::Fail("temp dir unavailable"), &started),
        ScriptedTask::new("good", Behaviour::Return(Outcome::skipped("off")), &started),
    ];
    let dispatcher = Dispatcher::new(DispatchOptions::default())?;

    let outcomes = with_timeout(dispatcher.dispatch(tasks, context())).await;

    assert_eq!(
        outcomes.get("bad").and_then(Outcome::reason),
        Some("Exception: temp dir unavailable")
    );
    assert_eq!(outcomes.get("good"), Some(&Outcome::skipped("off")));
    Ok(())
}

#[tokio::test]
async fn single_worker_still_completes_every_task() -> TestResult {
    init_tracing();
    let started = Arc::new(AtomicUsize::new(0));
    let tasks = (0..5)
        .map(|i| ScriptedTask::new(&format!("t{i}"), Behaviour::Sleep(Duration::from_millis(10)), &started))
        .collect();
    let dispatcher = Dispatcher::new(DispatchOptions::default().with_max_workers(1))?;

    let outcomes = with_timeout(dispatcher.dispatch(tasks, context())).await;

    assert_eq!(outcomes.len(), 5);
    assert!(outcomes.iter().all(|(_, o)| o.kind() == OutcomeKind::Skipped));
    Ok(())
}

#[tokio::test]
async fn overall_timeout_marks_stragglers_as_errors() -> TestResult {
    init_tracing();
    for mode in [DispatchMode::Parallel, DispatchMode::Sequential] {
        let started = Arc::new(AtomicUsize::new(0));
        let late_started = Arc::new(AtomicUsize::new(0));
        let mut tasks = vec![
            ScriptedTask::new("fast", Behaviour::Return(Outcome::skipped("off")), &started),
            ScriptedTask::new("stuck", Behaviour::Sleep(Duration::from_secs(60)), &started),
        ];
        tasks.extend((0..3).map(|i| {
            ScriptedTask::new(&format!("late{i}"), Behaviour::Return(Outcome::skipped("off")), &late_started)
        }));
        let dispatcher = Dispatcher::new(
            DispatchOptions::default()
                .with_mode(mode)
                .with_max_workers(2)
                .with_overall_timeout(Duration::from_secs(1)),
        )?;

        let outcomes = with_timeout(dispatcher.dispatch(tasks, context())).await;

        assert_eq!(outcomes.len(), 5, "{mode:?}");
        assert_eq!(outcomes.get("fast"), Some(&Outcome::skipped("off")), "{mode:?}");
        assert_eq!(
            outcomes.get("stuck").and_then(Outcome::reason),
            Some("Dispatch timed out after 1s"),
            "{mode:?}"
        );
        if mode == DispatchMode::Sequential {
            assert_eq!(late_started.load(Ordering::SeqCst), 0, "queued channels must not start");
            for i in 0..3 {
                assert_eq!(
                    outcomes.get(&format!("late{i}")).and_then(Outcome::reason),
                    Some("Dispatch timed out after 1s")
                );
            }
        }
    }
    Ok(())
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn sequential_deadline_stops_starting_new_channels() -> TestResult {
    init_tracing();
    let started = Arc::new(AtomicUsize::new(0));
    let late_started = Arc::new(AtomicUsize::new(0));
    let mut tasks = vec![ScriptedTask::new(
        "stuck",
        Behaviour::Sleep(Duration::from_secs(3)),
        &started,
    )];
    tasks.extend((0..20).map(|i| {
        ScriptedTask::new(&format!("late{i}"), Behaviour::Return(Outcome::skipped("off")), &late_started)
    }));
    let dispatcher = Dispatcher::new(
        DispatchOptions::default()
            .with_mode(DispatchMode::Sequential)
            .with_overall_timeout(Duration::from_secs(1)),
    )?;

    let outcomes = with_timeout(dispatcher.dispatch(tasks, context())).await;

    assert_eq!(outcomes.len(), 21);
    assert_eq!(late_started.load(Ordering::SeqCst), 0);
    assert!(outcomes.iter().all(|(_, o)| o.reason() == Some("Dispatch timed out after 1s")));
    Ok(())
}

#[tokio::test]
async fn cancelled_batch_skips_unstarted_channels() -> TestResult {
    init_tracing();
    let started = Arc::new(AtomicUsize::new(0));
    let cancel = CancellationToken::new();
    cancel.cancel();

    for mode in [DispatchMode::Parallel, DispatchMode::Sequential] {
        let dispatcher = Dispatcher::new(DispatchOptions::default().with_mode(mode))?;
        let outcomes = with_timeout(dispatcher.dispatch_with_cancel(
            seven_tasks_one_panicking(&started),
            context(),
            cancel.clone(),
        ))
        .await;

        assert_eq!(outcomes.len(), 7);
        assert!(outcomes.iter().all(|(_, o)| {
            o.reason() == Some("Dispatch cancelled before channel started")
        }));
    }
    assert_eq!(started.load(Ordering::SeqCst), 0);
    Ok(())
}

#[test]
fn options_follow_execution_config() -> TestResult {
    let cfg = ConfigFileBuilder::new().sequential().max_workers(2).build();
    let options = DispatchOptions::from_config(&cfg.execution);

    assert_eq!(options.mode, DispatchMode::Sequential);
    assert_eq!(options.max_workers, 2);
    assert_eq!(options.overall_timeout, None);
    assert_eq!(Dispatcher::new(options)?.options(), options);
    Ok(())
}

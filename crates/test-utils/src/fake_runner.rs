use std::future::Future;
use std::pin::Pin;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use wrapup::exec::{CommandSpec, ProcessOutput, ProcessRunner};

type Rule = Box<dyn Fn(&CommandSpec) -> Option<ProcessOutput> + Send + Sync>;

/// A fake process runner that:
/// - records every `CommandSpec` it was asked to run
/// - answers with the first matching scripted rule, or exit 0 with empty
///   output when no rule matches.
///
/// Clones share the recorded calls, so a test can keep a handle after handing
/// an `Arc` to the dispatch context.
#[derive(Clone, Default)]
pub struct FakeRunner {
    calls: Arc<Mutex<Vec<CommandSpec>>>,
    rules: Arc<Mutex<Vec<Rule>>>,
    delay: Option<Duration>,
}

impl FakeRunner {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a scripted response. Rules are consulted in insertion order.
    pub fn respond_with<F>(self, rule: F) -> Self
    where
        F: Fn(&CommandSpec) -> Option<ProcessOutput> + Send + Sync + 'static,
    {
        self.rules.lock().unwrap().push(Box::new(rule));
        self
    }

    /// Answer with `output` whenever any argv element equals `needle`.
    pub fn when_arg(self, needle: &str, output: ProcessOutput) -> Self {
        let needle = needle.to_string();
        self.respond_with(move |spec| {
            spec.argv()
                .iter()
                .any(|a| *a == needle)
                .then(|| output.clone())
        })
    }

    /// Sleep this long before answering each call.
    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = Some(delay);
        self
    }

    pub fn calls(&self) -> Vec<CommandSpec> {
        self.calls.lock().unwrap().clone()
    }

    pub fn call_count(&self) -> usize {
        self.calls.lock().unwrap().len()
    }

    /// Recorded argv lists, program first.
    pub fn argvs(&self) -> Vec<Vec<String>> {
        self.calls().iter().map(CommandSpec::argv).collect()
    }

    fn answer(&self, spec: &CommandSpec) -> ProcessOutput {
        let rules = self.rules.lock().unwrap();
        rules
            .iter()
            .find_map(|rule| rule(spec))
            .unwrap_or_else(|| ProcessOutput::success(""))
    }
}

impl ProcessRunner for FakeRunner {
    fn run(&self, spec: CommandSpec) -> Pin<Box<dyn Future<Output = ProcessOutput> + Send + '_>> {
        Box::pin(async move {
            self.calls.lock().unwrap().push(spec.clone());
            if let Some(delay) = self.delay {
                tokio::time::sleep(delay).await;
            }
            self.answer(&spec)
        })
    }
}

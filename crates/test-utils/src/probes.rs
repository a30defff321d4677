// crates/test-utils/src/probes.rs

//! Recording collaborators and concurrency instrumentation.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Barrier, Mutex};
use std::time::Duration;

use anyhow::{Result, bail};
use serde_json::Value;
use taskdag::{CallArgs, FailureContext, FailureNotifier, LogSink, TaskSpec};

/// One event observed by a [`RecordingSink`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SinkEvent {
    Started(String),
    Succeeded(String),
    Failed { task: String, skipped: Vec<String> },
}

/// Log sink that records every event for later assertions.
#[derive(Debug, Default)]
pub struct RecordingSink {
    events: Mutex<Vec<SinkEvent>>,
}

impl RecordingSink {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub fn events(&self) -> Vec<SinkEvent> {
        self.events.lock().unwrap().clone()
    }

    /// True if a start event was recorded for `task`.
    pub fn started(&self, task: &str) -> bool {
        self.events()
            .iter()
            .any(|e| matches!(e, SinkEvent::Started(t) if t == task))
    }
}

impl LogSink for RecordingSink {
    fn task_started(&self, task: &str) {
        self.events
            .lock()
            .unwrap()
            .push(SinkEvent::Started(task.to_string()));
    }

    fn task_succeeded(&self, task: &str) {
        self.events
            .lock()
            .unwrap()
            .push(SinkEvent::Succeeded(task.to_string()));
    }

    fn task_failed(&self, task: &str, _error: &anyhow::Error, context: Option<&FailureContext>) {
        let skipped = context.map(|c| c.skipped.clone()).unwrap_or_default();
        self.events.lock().unwrap().push(SinkEvent::Failed {
            task: task.to_string(),
            skipped,
        });
    }
}

/// Notifier that records calls and can be configured to error, to check
/// that notifier failures never reach the run.
#[derive(Debug, Default)]
pub struct RecordingNotifier {
    calls: Mutex<Vec<(String, Vec<String>)>>,
    fail: bool,
}

impl RecordingNotifier {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub fn failing() -> Arc<Self> {
        Arc::new(Self {
            fail: true,
            ..Self::default()
        })
    }

    /// Recorded `(task, skipped)` pairs, in notification order.
    pub fn calls(&self) -> Vec<(String, Vec<String>)> {
        self.calls.lock().unwrap().clone()
    }
}

impl FailureNotifier for RecordingNotifier {
    fn notify(
        &self,
        task: &str,
        _error: &anyhow::Error,
        context: Option<&FailureContext>,
    ) -> Result<()> {
        let skipped = context.map(|c| c.skipped.clone()).unwrap_or_default();
        self.calls
            .lock()
            .unwrap()
            .push((task.to_string(), skipped));
        if self.fail {
            bail!("notifier gateway unreachable");
        }
        Ok(())
    }
}

/// Tracks how many instrumented bodies are running at the same instant.
#[derive(Debug, Default)]
pub struct ConcurrencyProbe {
    current: AtomicUsize,
    peak: AtomicUsize,
}

impl ConcurrencyProbe {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    /// Highest number of instrumented bodies observed in flight at once.
    pub fn peak(&self) -> usize {
        self.peak.load(Ordering::SeqCst)
    }

    /// Build a task that holds a pool slot for `hold` before returning
    /// `value`, recording concurrent entries while it does.
    pub fn task(self: &Arc<Self>, name: &str, hold: Duration, value: Value) -> TaskSpec {
        let probe = Arc::clone(self);
        TaskSpec::new(name, move |_call: CallArgs| {
            let now = probe.current.fetch_add(1, Ordering::SeqCst) + 1;
            probe.peak.fetch_max(now, Ordering::SeqCst);
            std::thread::sleep(hold);
            probe.current.fetch_sub(1, Ordering::SeqCst);
            Ok(value.clone())
        })
    }
}

/// Build a task that waits on `barrier` before returning `value`.
///
/// With a barrier of size N across N tasks, the run can only finish if all
/// N bodies are genuinely in flight at the same time.
pub fn barrier_task(name: &str, barrier: Arc<Barrier>, value: Value) -> TaskSpec {
    TaskSpec::new(name, move |_call: CallArgs| {
        barrier.wait();
        Ok(value.clone())
    })
}

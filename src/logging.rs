// src/logging.rs

//! Invocation logging for `taskdag` using `tracing` + `tracing-subscriber`.
//!
//! Every [`TaskSpec`](crate::TaskSpec) carries its own [`LogSink`]
//! reference; there is no ambient registry of named loggers shared between
//! graphs. The default sink emits structured `tracing` events.
//!
//! Priority for determining the subscriber filter in [`init_logging`]:
//! 1. `TASKDAG_LOG` environment variable (an `EnvFilter` directive string)
//! 2. default to `info`

use anyhow::Result;
use tracing::{error, info};
use tracing_subscriber::{EnvFilter, fmt};

use crate::notify::FailureContext;

/// Observer notified around every task invocation.
///
/// A start event precedes the call; exactly one finish event follows it.
/// Failure events carry the captured error and, when the failing task has
/// downstream dependents, the context describing what will be skipped.
pub trait LogSink: Send + Sync {
    fn task_started(&self, task: &str);

    fn task_succeeded(&self, task: &str);

    fn task_failed(&self, task: &str, error: &anyhow::Error, context: Option<&FailureContext>);
}

/// Default sink: structured `tracing` events.
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingSink;

impl LogSink for TracingSink {
    fn task_started(&self, task: &str) {
        info!(task = %task, "task starting");
    }

    fn task_succeeded(&self, task: &str) {
        info!(task = %task, "task finished");
    }

    fn task_failed(&self, task: &str, err: &anyhow::Error, context: Option<&FailureContext>) {
        match context {
            Some(ctx) => error!(
                task = %task,
                error = %err,
                skipped = ctx.skipped.len(),
                "task failed; dependents will be skipped"
            ),
            None => error!(task = %task, error = %err, "task failed"),
        }
    }
}

/// Sink that discards every event.
#[derive(Debug, Clone, Copy, Default)]
pub struct NullSink;

impl LogSink for NullSink {
    fn task_started(&self, _task: &str) {}

    fn task_succeeded(&self, _task: &str) {}

    fn task_failed(&self, _task: &str, _error: &anyhow::Error, _context: Option<&FailureContext>) {}
}

/// Initialise the global logging subscriber.
///
/// Safe to call once at startup (a second call panics inside
/// `tracing-subscriber`; we leave that to the caller's discipline, as there
/// is exactly one sensible call site in a host program).
pub fn init_logging() -> Result<()> {
    let filter =
        EnvFilter::try_from_env("TASKDAG_LOG").unwrap_or_else(|_| EnvFilter::new("info"));

    fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_thread_ids(false)
        .with_thread_names(false)
        .init();

    Ok(())
}

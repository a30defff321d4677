// src/notify.rs

//! Failure-notification seam.
//!
//! A task may carry a notifier (an email gateway, a chat webhook, ...) that
//! the engine invokes only when the task's body fails. Notifier errors never
//! reach the scheduler: they are logged and dropped.

use std::fmt;

use crate::task::TaskName;

/// Context handed to sinks and notifiers when an invocation fails.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FailureContext {
    /// Name of the task whose invocation failed.
    pub task: TaskName,
    /// Transitive dependents that will be skipped because of this failure,
    /// in execution order.
    pub skipped: Vec<TaskName>,
}

impl fmt::Display for FailureContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.skipped.is_empty() {
            write!(f, "no dependent tasks are affected")
        } else {
            write!(
                f,
                "{} dependent task(s) will be skipped: {}",
                self.skipped.len(),
                self.skipped.join(", ")
            )
        }
    }
}

/// Best-effort failure notification.
///
/// Implementations are free to be slow or flaky; the engine swallows their
/// errors and carries on with the run.
pub trait FailureNotifier: Send + Sync {
    fn notify(
        &self,
        task: &str,
        error: &anyhow::Error,
        context: Option<&FailureContext>,
    ) -> anyhow::Result<()>;
}

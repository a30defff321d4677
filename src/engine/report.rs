// src/engine/report.rs

//! The immutable summary returned by one run.

use std::collections::HashMap;

use serde_json::Value;

use crate::task::{SharedError, TaskName};

/// Why a task ended up in the failed set.
#[derive(Debug, Clone)]
pub enum TaskFailure {
    /// The task's body ran and returned an error.
    Execution(SharedError),
    /// The task was never invoked because `upstream` (a direct dependency)
    /// had already failed.
    Skipped { upstream: TaskName },
}

impl TaskFailure {
    /// The captured error, for failures that actually executed.
    pub fn error(&self) -> Option<&anyhow::Error> {
        match self {
            TaskFailure::Execution(err) => Some(err),
            TaskFailure::Skipped { .. } => None,
        }
    }

    /// True for tasks failed by propagation, without being invoked.
    pub fn is_skipped(&self) -> bool {
        matches!(self, TaskFailure::Skipped { .. })
    }
}

/// Final snapshot of one run: succeeded task values and failed task causes.
///
/// `completed_count() + failed_count()` always equals the number of tasks
/// in the pipeline; task-level errors never abort a run, so callers inspect
/// the report to learn the outcome rather than relying on `run` erroring.
#[derive(Debug, Clone, Default)]
pub struct RunReport {
    completed: HashMap<TaskName, Value>,
    failed: HashMap<TaskName, TaskFailure>,
}

impl RunReport {
    pub(crate) fn new(
        completed: HashMap<TaskName, Value>,
        failed: HashMap<TaskName, TaskFailure>,
    ) -> Self {
        Self { completed, failed }
    }

    /// Value produced by a succeeded task, if it succeeded.
    pub fn result_of(&self, name: &str) -> Option<&Value> {
        self.completed.get(name)
    }

    /// Failure cause of a failed task, if it failed.
    pub fn failure_of(&self, name: &str) -> Option<&TaskFailure> {
        self.failed.get(name)
    }

    pub fn is_failed(&self, name: &str) -> bool {
        self.failed.contains_key(name)
    }

    /// Succeeded task names and their values.
    pub fn completed(&self) -> &HashMap<TaskName, Value> {
        &self.completed
    }

    /// Failed task names and their causes.
    pub fn failed(&self) -> &HashMap<TaskName, TaskFailure> {
        &self.failed
    }

    pub fn completed_count(&self) -> usize {
        self.completed.len()
    }

    pub fn failed_count(&self) -> usize {
        self.failed.len()
    }

    /// True when every task succeeded.
    pub fn all_succeeded(&self) -> bool {
        self.failed.is_empty()
    }
}

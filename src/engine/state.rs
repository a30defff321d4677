// src/engine/state.rs

//! Per-run bookkeeping for the engine.

use std::collections::{HashMap, HashSet};

use serde_json::Value;

use crate::engine::report::{RunReport, TaskFailure};
use crate::task::TaskName;

/// Mutable per-run state, owned exclusively by the engine loop.
///
/// The three sets grow monotonically over the task-name universe: a name
/// enters exactly one of `completed`/`failed` exactly once and never leaves
/// any set. Workers never touch this directly; in concurrent mode they
/// report outcomes over a channel and the engine records them.
#[derive(Debug, Default)]
pub(crate) struct ExecutionState {
    completed: HashMap<TaskName, Value>,
    failed: HashMap<TaskName, TaskFailure>,
    submitted: HashSet<TaskName>,
}

impl ExecutionState {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    pub(crate) fn is_completed(&self, name: &str) -> bool {
        self.completed.contains_key(name)
    }

    pub(crate) fn is_failed(&self, name: &str) -> bool {
        self.failed.contains_key(name)
    }

    pub(crate) fn is_submitted(&self, name: &str) -> bool {
        self.submitted.contains(name)
    }

    pub(crate) fn completed_value(&self, name: &str) -> Option<&Value> {
        self.completed.get(name)
    }

    /// Number of tasks in a terminal state.
    pub(crate) fn resolved(&self) -> usize {
        self.completed.len() + self.failed.len()
    }

    pub(crate) fn mark_submitted(&mut self, name: &str) {
        self.submitted.insert(name.to_string());
    }

    pub(crate) fn record_success(&mut self, name: TaskName, value: Value) {
        self.completed.insert(name, value);
    }

    pub(crate) fn record_failure(&mut self, name: TaskName, failure: TaskFailure) {
        self.failed.insert(name, failure);
    }

    pub(crate) fn into_report(self) -> RunReport {
        RunReport::new(self.completed, self.failed)
    }
}

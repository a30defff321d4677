// src/pipeline.rs

//! The validated, ordered task graph and its public API.

use std::collections::HashMap;
use std::sync::Arc;

use tracing::{info, warn};

use crate::dag::{DagGraph, sort, validate};
use crate::engine::runner::{Runner, downstream_of};
use crate::engine::{RunMode, RunReport};
use crate::errors::{Result, TaskdagError};
use crate::task::{TaskName, TaskSpec};

/// A validated set of tasks in a fixed topological order.
///
/// Construction runs all structural checks and the sort exactly once; the
/// pipeline can then be run any number of times, each run with fresh state
/// and a fresh [`RunReport`].
pub struct Pipeline {
    /// Tasks in execution order.
    tasks: Vec<Arc<TaskSpec>>,
    /// Task name -> position in `tasks`.
    position: HashMap<TaskName, usize>,
    graph: DagGraph,
}

impl Pipeline {
    /// Validate the specs and fix the execution order.
    ///
    /// Fails fast with the first structural error: invalid or duplicate
    /// names, bad edges, unknown dependencies, or a dependency cycle. No
    /// task executes before validation passes.
    pub fn new(specs: Vec<TaskSpec>) -> Result<Self> {
        validate::validate_specs(&specs)?;
        let graph = DagGraph::from_specs(&specs);
        let order = sort::topological_order(&specs)?;

        let mut rank = vec![0usize; order.len()];
        for (pos, &i) in order.iter().enumerate() {
            rank[i] = pos;
        }

        let mut indexed: Vec<(usize, TaskSpec)> = specs.into_iter().enumerate().collect();
        indexed.sort_by_key(|(i, _)| rank[*i]);

        let tasks: Vec<Arc<TaskSpec>> =
            indexed.into_iter().map(|(_, spec)| Arc::new(spec)).collect();

        let position = tasks
            .iter()
            .enumerate()
            .map(|(pos, task)| (task.name().to_string(), pos))
            .collect();

        Ok(Self {
            tasks,
            position,
            graph,
        })
    }

    /// Execute every task under the given mode and return the final report.
    ///
    /// Task-level failures never abort the run: the report always covers
    /// every task, split between completed and failed. Only an engine
    /// invariant violation ([`TaskdagError::Stalled`]) or a worker-pool
    /// infrastructure failure surfaces as an error.
    pub async fn run(&self, mode: RunMode) -> Result<RunReport> {
        let runner = Runner::new(&self.tasks, &self.graph, &self.position);

        let report = match mode {
            RunMode::Sequential => runner.run_sequential()?,
            RunMode::Concurrent { max_workers } => runner.run_concurrent(max_workers).await?,
        };

        if report.all_succeeded() {
            info!(tasks = report.completed_count(), "run finished successfully");
        } else {
            warn!(
                completed = report.completed_count(),
                failed = report.failed_count(),
                "run finished with failures"
            );
        }

        Ok(report)
    }

    /// Look up a task by name.
    pub fn task(&self, name: &str) -> Result<&TaskSpec> {
        self.position
            .get(name)
            .map(|&pos| self.tasks[pos].as_ref())
            .ok_or_else(|| TaskdagError::TaskNotFound(name.to_string()))
    }

    /// All tasks that directly or transitively depend on `name`, in
    /// execution order.
    ///
    /// Meant for failure reporting ("what will this break"); the engine's
    /// scheduling decisions never consult it.
    pub fn dependents_of(&self, name: &str) -> Result<Vec<TaskName>> {
        if !self.position.contains_key(name) {
            return Err(TaskdagError::TaskNotFound(name.to_string()));
        }
        Ok(downstream_of(&self.graph, &self.position, name))
    }

    /// Task names in execution order.
    pub fn task_names(&self) -> impl Iterator<Item = &str> {
        self.tasks.iter().map(|task| task.name())
    }

    pub fn len(&self) -> usize {
        self.tasks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tasks.is_empty()
    }
}

// src/engine/runner.rs

//! The two execution strategies.
//!
//! Both strategies apply the same dependency rules: a task whose
//! dependencies all succeeded is invoked with a freshly-built argument
//! bundle; a task with a failed dependency is failed without ever being
//! invoked, which propagates failure transitively because ancestors resolve
//! before their dependents. The concurrent strategy bounds in-flight bodies
//! with a semaphore and keeps all run state on the engine side of an mpsc
//! completion channel.

use std::collections::HashMap;
use std::sync::Arc;

use anyhow::anyhow;
use tokio::sync::{Semaphore, mpsc};
use tracing::{debug, warn};

use crate::dag::DagGraph;
use crate::engine::report::{RunReport, TaskFailure};
use crate::engine::state::ExecutionState;
use crate::errors::{Result, TaskdagError};
use crate::notify::FailureContext;
use crate::task::{CallArgs, TaskName, TaskOutcome, TaskSpec};

/// Executes one run over a validated, topologically-ordered task list.
///
/// Borrows the pipeline's pieces rather than the pipeline itself; all
/// per-run state lives in a fresh [`ExecutionState`] per call.
pub(crate) struct Runner<'a> {
    tasks: &'a [Arc<TaskSpec>],
    graph: &'a DagGraph,
    position: &'a HashMap<TaskName, usize>,
}

impl<'a> Runner<'a> {
    pub(crate) fn new(
        tasks: &'a [Arc<TaskSpec>],
        graph: &'a DagGraph,
        position: &'a HashMap<TaskName, usize>,
    ) -> Self {
        Self {
            tasks,
            graph,
            position,
        }
    }

    /// Strict in-order walk; at most one body running at any time.
    pub(crate) fn run_sequential(&self) -> Result<RunReport> {
        let mut state = ExecutionState::new();

        for task in self.tasks {
            if let Some(upstream) = self.failed_dependency(task, &state) {
                debug!(task = %task.name(), upstream = %upstream, "skipping task; dependency failed");
                state.record_failure(task.name().to_string(), TaskFailure::Skipped { upstream });
                continue;
            }

            // The list order guarantees every dependency is already
            // resolved, and none failed, so all of them are in `completed`.
            let call = build_call_args(task, &state);
            let downstream = downstream_of(self.graph, self.position, task.name());
            let outcome = invoke(task, call, downstream);
            record(&mut state, task.name(), outcome);
        }

        Ok(state.into_report())
    }

    /// Ready-queue polling loop over a semaphore-bounded worker pool.
    ///
    /// The engine task is the only owner of the run state; workers report
    /// `(name, outcome)` over the completion channel. The loop blocks only
    /// on that channel (and on a free pool slot while dispatching).
    pub(crate) async fn run_concurrent(&self, max_workers: usize) -> Result<RunReport> {
        let total = self.tasks.len();
        let workers = max_workers.max(1);
        let semaphore = Arc::new(Semaphore::new(workers));
        let (completion_tx, mut completion_rx) =
            mpsc::unbounded_channel::<(TaskName, TaskOutcome)>();

        let mut state = ExecutionState::new();
        let mut in_flight = 0usize;

        while state.resolved() < total {
            let mut submitted_any = false;

            for task in self.tasks {
                let name = task.name();
                if state.is_submitted(name) || state.is_failed(name) {
                    continue;
                }
                if let Some(upstream) = self.failed_dependency(task, &state) {
                    debug!(task = %name, upstream = %upstream, "skipping task; dependency failed");
                    state.record_failure(name.to_string(), TaskFailure::Skipped { upstream });
                    continue;
                }
                if !self.deps_completed(task, &state) {
                    continue;
                }

                state.mark_submitted(name);
                in_flight += 1;
                submitted_any = true;
                self.submit(task, &state, &semaphore, completion_tx.clone())
                    .await?;
            }

            // Propagation alone may have resolved the remainder.
            if state.resolved() >= total {
                break;
            }

            if in_flight == 0 && !submitted_any {
                // A validated acyclic graph can never legitimately get here.
                return Err(TaskdagError::Stalled);
            }

            // Block until at least one in-flight body finishes, then drain
            // whatever else has already finished.
            let Some((name, outcome)) = completion_rx.recv().await else {
                return Err(TaskdagError::Stalled);
            };
            in_flight -= 1;
            record(&mut state, &name, outcome);

            while let Ok((name, outcome)) = completion_rx.try_recv() {
                in_flight -= 1;
                record(&mut state, &name, outcome);
            }
        }

        Ok(state.into_report())
    }

    /// Acquire a pool slot and dispatch one body to a worker.
    ///
    /// The argument bundle and failure context are prepared on the engine
    /// side, while the dependency values are at hand; the worker only runs
    /// the body and reports back.
    async fn submit(
        &self,
        task: &Arc<TaskSpec>,
        state: &ExecutionState,
        semaphore: &Arc<Semaphore>,
        completion_tx: mpsc::UnboundedSender<(TaskName, TaskOutcome)>,
    ) -> Result<()> {
        let call = build_call_args(task, state);
        let downstream = downstream_of(self.graph, self.position, task.name());
        let spec = Arc::clone(task);

        let permit = Arc::clone(semaphore)
            .acquire_owned()
            .await
            .map_err(|e| TaskdagError::WorkerPool(format!("failed to acquire worker slot: {e}")))?;

        tokio::spawn(async move {
            let name = spec.name().to_string();
            let outcome = tokio::task::spawn_blocking(move || invoke(&spec, call, downstream))
                .await
                .unwrap_or_else(|join_err| {
                    TaskOutcome::Failed(Arc::new(anyhow!("task body panicked: {join_err}")))
                });
            drop(permit);
            let _ = completion_tx.send((name, outcome));
        });

        Ok(())
    }

    /// First declared dependency of `task` that is in the failed set.
    fn failed_dependency(&self, task: &TaskSpec, state: &ExecutionState) -> Option<TaskName> {
        task.dependency_names()
            .find(|dep| state.is_failed(dep))
            .map(str::to_string)
    }

    fn deps_completed(&self, task: &TaskSpec, state: &ExecutionState) -> bool {
        task.dependency_names().all(|dep| state.is_completed(dep))
    }
}

fn record(state: &mut ExecutionState, name: &str, outcome: TaskOutcome) {
    match outcome {
        TaskOutcome::Succeeded(value) => {
            debug!(task = %name, "task completed successfully");
            state.record_success(name.to_string(), value);
        }
        TaskOutcome::Failed(error) => {
            warn!(task = %name, error = %error, "task failed");
            state.record_failure(name.to_string(), TaskFailure::Execution(error));
        }
    }
}

/// Transitive dependents of `name`, in execution order.
pub(crate) fn downstream_of(
    graph: &DagGraph,
    position: &HashMap<TaskName, usize>,
    name: &str,
) -> Vec<TaskName> {
    let mut found = graph.transitive_dependents(name);
    found.sort_by_key(|n| position.get(n).copied().unwrap_or(usize::MAX));
    found
}

/// Build the per-invocation argument bundle: immutable base arguments plus
/// injected dependency results. The task's stored arguments are never
/// written to, so repeated runs always start from the same base.
fn build_call_args(task: &TaskSpec, state: &ExecutionState) -> CallArgs {
    let mut args = task.base_args().to_vec();
    let mut kwargs = task.base_kwargs().clone();

    for dep in task.dependencies() {
        // Dispatch requires every dependency in `completed`, so the lookup
        // cannot miss on a validated graph.
        let Some(value) = state.completed_value(&dep.task_name) else {
            warn!(
                task = %task.name(),
                dependency = %dep.task_name,
                "dependency result missing at injection time"
            );
            continue;
        };
        if dep.inject_as_arg {
            args.push(value.clone());
        }
        if let Some(kwarg) = &dep.inject_as_kwarg {
            kwargs.insert(kwarg.clone(), value.clone());
        }
    }

    CallArgs { args, kwargs }
}

/// Run one body, with sink events around the call and best-effort failure
/// notification.
fn invoke(task: &TaskSpec, call: CallArgs, downstream: Vec<TaskName>) -> TaskOutcome {
    let sink = task.sink();
    sink.task_started(task.name());

    match (task.body())(call) {
        Ok(value) => {
            sink.task_succeeded(task.name());
            TaskOutcome::Succeeded(value)
        }
        Err(error) => {
            let context = (!downstream.is_empty()).then(|| FailureContext {
                task: task.name().to_string(),
                skipped: downstream,
            });
            sink.task_failed(task.name(), &error, context.as_ref());

            if let Some(notifier) = task.failure_notifier() {
                if let Err(notify_error) = notifier.notify(task.name(), &error, context.as_ref()) {
                    warn!(
                        task = %task.name(),
                        error = %notify_error,
                        "failure notifier errored; continuing"
                    );
                }
            }

            TaskOutcome::Failed(Arc::new(error))
        }
    }
}

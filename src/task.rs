// src/task.rs

//! Task descriptions: the unit of work, its arguments and its dependency
//! edges.

use std::collections::BTreeMap;
use std::fmt;
use std::sync::Arc;

use serde_json::Value;

use crate::logging::{LogSink, TracingSink};
use crate::notify::FailureNotifier;

/// Canonical task name type used throughout the crate.
pub type TaskName = String;

/// Shared, cloneable handle to a captured task error.
pub type SharedError = Arc<anyhow::Error>;

/// The callable body of a task.
///
/// The engine treats the signature as opaque: it hands the body a fresh
/// [`CallArgs`] bundle per invocation and records the returned value or
/// error.
pub type TaskFn = Arc<dyn Fn(CallArgs) -> anyhow::Result<Value> + Send + Sync>;

/// A declared edge to a producer task, with its result-injection policy.
///
/// `inject_as_kwarg` carries the argument name together with the flag, so an
/// edge cannot ask for named injection without saying under which name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Dependency {
    /// Name of the producer task this edge refers to.
    pub task_name: TaskName,
    /// Append the producer's result as one trailing positional argument.
    pub inject_as_arg: bool,
    /// Pass the producer's result as a named argument under this name.
    pub inject_as_kwarg: Option<String>,
}

impl Dependency {
    /// Ordering-only dependency: run after `task_name`, consume nothing.
    pub fn on(task_name: impl Into<TaskName>) -> Self {
        Self {
            task_name: task_name.into(),
            inject_as_arg: false,
            inject_as_kwarg: None,
        }
    }

    /// Also append the producer's result as a trailing positional argument.
    pub fn as_arg(mut self) -> Self {
        self.inject_as_arg = true;
        self
    }

    /// Also pass the producer's result as the named argument `name`.
    pub fn as_kwarg(mut self, name: impl Into<String>) -> Self {
        self.inject_as_kwarg = Some(name.into());
        self
    }
}

/// Freshly-built argument bundle for one invocation.
///
/// Constructed per call from the task's immutable base arguments plus any
/// injected dependency results; never written back into the [`TaskSpec`].
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CallArgs {
    /// Positional arguments: base args first, injected results appended.
    pub args: Vec<Value>,
    /// Named arguments: base entries, possibly overridden by injection.
    pub kwargs: BTreeMap<String, Value>,
}

/// Result of one execution attempt of a task.
#[derive(Debug, Clone)]
pub enum TaskOutcome {
    Succeeded(Value),
    Failed(SharedError),
}

/// Immutable description of one unit of work.
///
/// A spec is built by the caller, handed to
/// [`Pipeline::new`](crate::Pipeline::new) and never mutated afterwards;
/// the engine reads it across any number of runs.
pub struct TaskSpec {
    name: TaskName,
    func: TaskFn,
    args: Vec<Value>,
    kwargs: BTreeMap<String, Value>,
    dependencies: Vec<Dependency>,
    log_sink: Arc<dyn LogSink>,
    notifier: Option<Arc<dyn FailureNotifier>>,
}

impl TaskSpec {
    /// Create a task with the given name and body.
    ///
    /// Name validity and edge invariants are checked when the spec is handed
    /// to [`Pipeline::new`](crate::Pipeline::new), not here.
    pub fn new(
        name: impl Into<TaskName>,
        func: impl Fn(CallArgs) -> anyhow::Result<Value> + Send + Sync + 'static,
    ) -> Self {
        Self {
            name: name.into(),
            func: Arc::new(func),
            args: Vec::new(),
            kwargs: BTreeMap::new(),
            dependencies: Vec::new(),
            log_sink: Arc::new(TracingSink),
            notifier: None,
        }
    }

    /// Append one base positional argument.
    pub fn arg(mut self, value: impl Into<Value>) -> Self {
        self.args.push(value.into());
        self
    }

    /// Append several base positional arguments.
    pub fn args<I, V>(mut self, values: I) -> Self
    where
        I: IntoIterator<Item = V>,
        V: Into<Value>,
    {
        self.args.extend(values.into_iter().map(Into::into));
        self
    }

    /// Set one base named argument.
    pub fn kwarg(mut self, name: impl Into<String>, value: impl Into<Value>) -> Self {
        self.kwargs.insert(name.into(), value.into());
        self
    }

    /// Declare a dependency edge.
    pub fn depends_on(mut self, dependency: Dependency) -> Self {
        self.dependencies.push(dependency);
        self
    }

    /// Ordering-only shorthand for [`depends_on`](Self::depends_on).
    pub fn after(self, task_name: impl Into<TaskName>) -> Self {
        self.depends_on(Dependency::on(task_name))
    }

    /// Replace the sink notified around each invocation of this task.
    pub fn log_sink(mut self, sink: Arc<dyn LogSink>) -> Self {
        self.log_sink = sink;
        self
    }

    /// Attach a best-effort failure notifier.
    pub fn notifier(mut self, notifier: Arc<dyn FailureNotifier>) -> Self {
        self.notifier = Some(notifier);
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Declared dependency edges, in declaration order.
    pub fn dependencies(&self) -> &[Dependency] {
        &self.dependencies
    }

    /// Names of the tasks this task depends on, in declaration order.
    pub fn dependency_names(&self) -> impl Iterator<Item = &str> {
        self.dependencies.iter().map(|d| d.task_name.as_str())
    }

    /// Base positional arguments (before any injection).
    pub fn base_args(&self) -> &[Value] {
        &self.args
    }

    /// Base named arguments (before any injection).
    pub fn base_kwargs(&self) -> &BTreeMap<String, Value> {
        &self.kwargs
    }

    pub(crate) fn body(&self) -> &TaskFn {
        &self.func
    }

    pub(crate) fn sink(&self) -> &dyn LogSink {
        self.log_sink.as_ref()
    }

    pub(crate) fn failure_notifier(&self) -> Option<&dyn FailureNotifier> {
        self.notifier.as_deref()
    }
}

impl fmt::Debug for TaskSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TaskSpec")
            .field("name", &self.name)
            .field("args", &self.args)
            .field("kwargs", &self.kwargs)
            .field("dependencies", &self.dependencies)
            .finish_non_exhaustive()
    }
}

// src/lib.rs

//! In-process DAG task execution: named tasks with dependency edges, run
//! strictly in order or on a bounded worker pool, with result passing
//! between dependents and transitive failure propagation.

pub mod dag;
pub mod engine;
pub mod errors;
pub mod logging;
pub mod notify;
pub mod pipeline;
pub mod task;

pub use engine::{RunMode, RunReport, TaskFailure};
pub use errors::{Result, TaskdagError};
pub use logging::{LogSink, NullSink, TracingSink, init_logging};
pub use notify::{FailureContext, FailureNotifier};
pub use pipeline::Pipeline;
pub use task::{CallArgs, Dependency, TaskName, TaskOutcome, TaskSpec};

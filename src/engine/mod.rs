// src/engine/mod.rs

//! The execution engine.
//!
//! - [`state`] holds the per-run bookkeeping sets (engine-private).
//! - [`report`] is the immutable final snapshot returned to the caller.
//! - [`runner`] implements the sequential and concurrent strategies.

pub mod report;
pub(crate) mod runner;
pub(crate) mod state;

pub use report::{RunReport, TaskFailure};

use serde::{Deserialize, Serialize};

/// Execution strategy selector for [`Pipeline::run`](crate::Pipeline::run).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RunMode {
    /// Single-threaded, fully deterministic, strict list order.
    #[default]
    Sequential,
    /// Up to `max_workers` task bodies in flight at once (floored to 1; a
    /// bound of 1 behaves like [`Sequential`](RunMode::Sequential)).
    Concurrent { max_workers: usize },
}

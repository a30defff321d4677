// src/errors.rs

//! Crate-wide error type and helpers.

use thiserror::Error;

#[derive(Error, Debug)]
pub enum TaskdagError {
    #[error("invalid task name {0:?}: names must be non-empty and contain no whitespace")]
    InvalidTaskName(String),

    #[error("duplicate task name: {0}")]
    DuplicateName(String),

    #[error("task '{task}' depends on unknown task '{dependency}'")]
    MissingDependency { task: String, dependency: String },

    #[error("task '{0}' cannot depend on itself")]
    SelfDependency(String),

    #[error("task '{task}' declares dependency '{dependency}' more than once")]
    DuplicateDependency { task: String, dependency: String },

    #[error("task '{task}' injects the result of '{dependency}' under an empty argument name")]
    InvalidKwargName { task: String, dependency: String },

    #[error("cycle detected in task graph: {0}")]
    Cycle(String),

    #[error("task not found: {0}")]
    TaskNotFound(String),

    #[error("execution stalled: unresolved tasks remain but none are runnable or in flight")]
    Stalled,

    #[error("worker pool failure: {0}")]
    WorkerPool(String),

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

pub type Result<T> = std::result::Result<T, TaskdagError>;

// src/dag/validate.rs

use std::collections::HashSet;

use crate::errors::{Result, TaskdagError};
use crate::task::TaskSpec;

/// Structural checks run before the topological sort.
///
/// Purely read-only; reports the first violation found and never partially
/// applies anything. Cycle detection is deliberately not here — the sort
/// pass in [`sort`](crate::dag::sort) is the single detector.
pub fn validate_specs(specs: &[TaskSpec]) -> Result<()> {
    check_names(specs)?;
    check_edges(specs)?;
    check_dependencies_exist(specs)?;
    Ok(())
}

fn check_names(specs: &[TaskSpec]) -> Result<()> {
    let mut seen: HashSet<&str> = HashSet::new();

    for spec in specs {
        let name = spec.name();
        if name.is_empty() || name.chars().any(char::is_whitespace) {
            return Err(TaskdagError::InvalidTaskName(name.to_string()));
        }
        if !seen.insert(name) {
            return Err(TaskdagError::DuplicateName(name.to_string()));
        }
    }

    Ok(())
}

fn check_edges(specs: &[TaskSpec]) -> Result<()> {
    for spec in specs {
        let mut seen: HashSet<&str> = HashSet::new();

        for dep in spec.dependencies() {
            if dep.task_name == spec.name() {
                return Err(TaskdagError::SelfDependency(spec.name().to_string()));
            }
            if !seen.insert(dep.task_name.as_str()) {
                return Err(TaskdagError::DuplicateDependency {
                    task: spec.name().to_string(),
                    dependency: dep.task_name.clone(),
                });
            }
            if dep.inject_as_kwarg.as_deref() == Some("") {
                return Err(TaskdagError::InvalidKwargName {
                    task: spec.name().to_string(),
                    dependency: dep.task_name.clone(),
                });
            }
        }
    }

    Ok(())
}

fn check_dependencies_exist(specs: &[TaskSpec]) -> Result<()> {
    let names: HashSet<&str> = specs.iter().map(TaskSpec::name).collect();

    for spec in specs {
        for dep in spec.dependency_names() {
            if !names.contains(dep) {
                return Err(TaskdagError::MissingDependency {
                    task: spec.name().to_string(),
                    dependency: dep.to_string(),
                });
            }
        }
    }

    Ok(())
}

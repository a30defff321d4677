// src/dag/graph.rs

use std::collections::{HashMap, HashSet};

use crate::task::{TaskName, TaskSpec};

/// Internal node structure: stores immediate deps and dependents.
#[derive(Debug, Clone)]
struct DagNode {
    /// Direct dependencies: tasks that must resolve before this one can run.
    deps: Vec<TaskName>,
    /// Direct dependents: tasks that depend on this one.
    dependents: Vec<TaskName>,
}

/// Simple in-memory DAG representation keyed by task name.
///
/// This is intentionally lightweight; structural validity is checked in
/// [`validate`](crate::dag::validate) and acyclicity in
/// [`sort`](crate::dag::sort), so here we just keep adjacency information
/// for scheduling and diagnostics.
#[derive(Debug, Clone, Default)]
pub struct DagGraph {
    nodes: HashMap<TaskName, DagNode>,
}

impl DagGraph {
    /// Build adjacency from validated task specs.
    ///
    /// Assumes that:
    /// - task names are unique
    /// - every dependency refers to a present task
    pub fn from_specs(specs: &[TaskSpec]) -> Self {
        let mut nodes: HashMap<TaskName, DagNode> = HashMap::new();

        // First pass: create nodes with their dependency lists.
        for spec in specs {
            nodes.insert(
                spec.name().to_string(),
                DagNode {
                    deps: spec.dependency_names().map(str::to_string).collect(),
                    dependents: Vec::new(),
                },
            );
        }

        // Second pass: populate dependents based on deps, in input order.
        for spec in specs {
            for dep in spec.dependency_names() {
                if let Some(dep_node) = nodes.get_mut(dep) {
                    dep_node.dependents.push(spec.name().to_string());
                }
            }
        }

        Self { nodes }
    }

    /// Immediate dependencies of a task.
    pub fn dependencies_of(&self, name: &str) -> &[TaskName] {
        self.nodes
            .get(name)
            .map(|n| n.deps.as_slice())
            .unwrap_or(&[])
    }

    /// Immediate dependents of a task.
    pub fn dependents_of(&self, name: &str) -> &[TaskName] {
        self.nodes
            .get(name)
            .map(|n| n.dependents.as_slice())
            .unwrap_or(&[])
    }

    /// All tasks that directly or transitively depend on `name`.
    ///
    /// Explicit worklist traversal over the dependents adjacency, so deep
    /// graphs cannot exhaust the stack. Order is unspecified; callers that
    /// need determinism sort the result.
    pub fn transitive_dependents(&self, name: &str) -> Vec<TaskName> {
        let mut stack: Vec<TaskName> = self.dependents_of(name).to_vec();
        let mut visited: HashSet<TaskName> = HashSet::new();
        let mut found = Vec::new();

        while let Some(current) = stack.pop() {
            if !visited.insert(current.clone()) {
                continue;
            }
            stack.extend(self.dependents_of(&current).iter().cloned());
            found.push(current);
        }

        found
    }
}

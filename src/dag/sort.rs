// src/dag/sort.rs

use std::collections::{HashMap, VecDeque};

use crate::errors::{Result, TaskdagError};
use crate::task::TaskSpec;

/// Kahn's algorithm over the specs, returning indices into `specs` in a
/// valid topological order.
///
/// This single pass is also the authoritative cycle detector: if fewer
/// tasks come out than went in, the remainder contains a cycle. Ties among
/// simultaneously-ready tasks break by original input order (FIFO ready
/// queue seeded and fed in input order), so the result is deterministic for
/// a given input list.
pub fn topological_order(specs: &[TaskSpec]) -> Result<Vec<usize>> {
    let index_of: HashMap<&str, usize> = specs
        .iter()
        .enumerate()
        .map(|(i, spec)| (spec.name(), i))
        .collect();

    let mut in_degree = vec![0usize; specs.len()];
    let mut dependents: Vec<Vec<usize>> = vec![Vec::new(); specs.len()];

    for (i, spec) in specs.iter().enumerate() {
        for dep in spec.dependency_names() {
            // Existence was validated before sorting, so the lookup holds.
            if let Some(&producer) = index_of.get(dep) {
                dependents[producer].push(i);
                in_degree[i] += 1;
            }
        }
    }

    let mut ready: VecDeque<usize> = (0..specs.len()).filter(|&i| in_degree[i] == 0).collect();
    let mut order = Vec::with_capacity(specs.len());

    while let Some(i) = ready.pop_front() {
        order.push(i);
        for &dependent in &dependents[i] {
            in_degree[dependent] -= 1;
            if in_degree[dependent] == 0 {
                ready.push_back(dependent);
            }
        }
    }

    if order.len() < specs.len() {
        return Err(TaskdagError::Cycle(describe_cycle(
            specs, &index_of, &in_degree,
        )));
    }

    Ok(order)
}

/// Name one concrete cycle from the unresolved remainder of the Kahn pass.
///
/// Every task left with a positive in-degree has at least one unresolved
/// dependency, so following unresolved dependencies from any such task must
/// revisit a task; the revisited segment is a cycle.
fn describe_cycle(
    specs: &[TaskSpec],
    index_of: &HashMap<&str, usize>,
    in_degree: &[usize],
) -> String {
    let Some(start) = (0..specs.len()).find(|&i| in_degree[i] > 0) else {
        return "unresolvable dependency order".to_string();
    };

    let mut path = vec![start];
    let mut seen_at: HashMap<usize, usize> = HashMap::from([(start, 0)]);
    let mut current = start;

    loop {
        let next = specs[current]
            .dependency_names()
            .filter_map(|dep| index_of.get(dep).copied())
            .find(|&i| in_degree[i] > 0);

        let Some(next) = next else {
            return "unresolvable dependency order".to_string();
        };

        if let Some(&first) = seen_at.get(&next) {
            let mut names: Vec<&str> = path[first..].iter().map(|&i| specs[i].name()).collect();
            names.push(specs[next].name());
            return names.join(" -> ");
        }

        seen_at.insert(next, path.len());
        path.push(next);
        current = next;
    }
}

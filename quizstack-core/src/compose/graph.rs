//! Realization graph checks and ordering.

use crate::error::{QuizstackError, Result};
use crate::types::PlanNode;
use std::collections::{HashMap, HashSet};
use tracing::instrument;

/// Validate that ids are unique, every dependency exists, and there are no cycles.
#[instrument(skip(nodes), fields(node_count = nodes.len()))]
pub fn validate_dependencies(nodes: &[PlanNode]) -> Result<()> {
    let mut graph: HashMap<&str, Vec<&str>> = HashMap::new();

    for node in nodes {
        let deps = node.depends_on.iter().map(|s| s.as_str()).collect();
        if graph.insert(&node.logical_id, deps).is_some() {
            return Err(QuizstackError::DuplicateResource { resource: node.logical_id.clone() });
        }
    }

    for node in nodes {
        for dep in &node.depends_on {
            if !graph.contains_key(dep.as_str()) {
                return Err(QuizstackError::MissingDependency {
                    resource: node.logical_id.clone(),
                    dependency: dep.clone(),
                });
            }
        }
    }

    let mut visited = HashSet::new();
    for node in nodes {
        let mut stack = HashSet::new();
        if has_cycle(&graph, &node.logical_id, &mut visited, &mut stack) {
            return Err(QuizstackError::CircularDependency { resource: node.logical_id.clone() });
        }
    }

    Ok(())
}

/// Detect cycles in the dependency graph using DFS.
fn has_cycle<'a>(
    graph: &HashMap<&'a str, Vec<&'a str>>,
    node: &'a str,
    visited: &mut HashSet<&'a str>,
    stack: &mut HashSet<&'a str>,
) -> bool {
    if stack.contains(node) {
        return true;
    }

    if !visited.insert(node) {
        return false;
    }

    stack.insert(node);

    if let Some(deps) = graph.get(node) {
        for dep in deps {
            if has_cycle(graph, *dep, visited, stack) {
                return true;
            }
        }
    }

    stack.remove(node);
    false
}

/// Sort nodes so every dependency precedes its dependents.
///
/// Ties keep declaration order, so the result is deterministic.
#[instrument(skip(nodes))]
pub fn topological_sort(nodes: &[PlanNode]) -> Vec<PlanNode> {
    let mut sorted = Vec::new();
    let mut visited = HashSet::new();

    fn visit<'a>(
        node: &'a PlanNode,
        nodes: &'a [PlanNode],
        visited: &mut HashSet<&'a str>,
        sorted: &mut Vec<PlanNode>,
    ) {
        if !visited.insert(node.logical_id.as_str()) {
            return;
        }

        for dep_id in &node.depends_on {
            if let Some(dep) = nodes.iter().find(|n| &n.logical_id == dep_id) {
                visit(dep, nodes, visited, sorted);
            }
        }

        sorted.push(node.clone());
    }

    for node in nodes {
        visit(node, nodes, &mut visited, &mut sorted);
    }

    sorted
}

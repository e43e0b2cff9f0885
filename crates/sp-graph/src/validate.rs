//! Single-circuit validation.
//!
//! A supervisor may select patrol paths that split the premises into two or
//! more islands.  The generator could never cover such a graph, so it is
//! rejected up front.  The check is an iterative depth-first traversal from
//! the first checkpoint over the *undirected* adjacency: a directed edge makes
//! both of its endpoints neighbours of each other.

use tracing::debug;

use sp_core::NodeIdx;

use crate::{CheckpointGraph, GraphError, GraphResult};

/// Confirm that every checkpoint is reachable from every other one when paths
/// are walked in either direction, and that there is at least one path.
pub fn validate_connected(graph: &CheckpointGraph) -> GraphResult<()> {
    if graph.is_empty() {
        return Err(GraphError::Empty);
    }
    if graph.edge_count() == 0 {
        return Err(GraphError::NoPaths);
    }

    let n = graph.node_count();
    let mut neighbours: Vec<Vec<NodeIdx>> = vec![Vec::new(); n];
    for (from, to) in graph.edge_from.iter().zip(&graph.edge_to) {
        neighbours[from.index()].push(*to);
        neighbours[to.index()].push(*from);
    }

    let mut visited = vec![false; n];
    let mut stack = vec![NodeIdx(0)];
    while let Some(node) = stack.pop() {
        if visited[node.index()] {
            continue;
        }
        visited[node.index()] = true;
        stack.extend(neighbours[node.index()].iter().filter(|m| !visited[m.index()]));
    }

    let unreachable: Vec<_> = visited
        .iter()
        .enumerate()
        .filter(|&(_, &seen)| !seen)
        .map(|(i, _)| graph.checkpoint(NodeIdx(i as u32)).clone())
        .collect();

    if unreachable.is_empty() {
        debug!(checkpoints = n, edges = graph.edge_count(), "checkpoint graph forms a single circuit");
        Ok(())
    } else {
        Err(GraphError::Disconnected { unreachable })
    }
}

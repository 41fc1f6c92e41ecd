//! Search results and path reconstruction.

use std::collections::HashMap;

use crate::graph::{Graph, NodeId};

use super::SearchError;

/// A path found by point-to-point search.
#[derive(Debug, Clone, PartialEq)]
pub struct Path {
    /// Node ids from start to target, both inclusive.
    pub nodes: Vec<NodeId>,
    /// Total travel time in seconds.
    pub time_s: f64,
    /// Total length in meters.
    pub distance_m: f64,
}

impl Path {
    /// The trivial path for a search whose start is its target.
    pub fn single(node: NodeId) -> Self {
        Self {
            nodes: vec![node],
            time_s: 0.0,
            distance_m: 0.0,
        }
    }
}

/// Walk predecessor links back from `target` to `start`.
///
/// Each hop's length is taken from the first outgoing edge of the
/// predecessor that points at the hop's node.
pub(super) fn reconstruct(
    graph: &Graph,
    previous: &HashMap<NodeId, NodeId>,
    start: NodeId,
    target: NodeId,
    time_s: f64,
) -> Result<Path, SearchError> {
    let mut nodes = vec![target];
    let mut distance_m = 0.0;
    let mut current = target;

    while current != start {
        let prev = *previous.get(&current).ok_or(SearchError::NoPath {
            from: start,
            to: target,
        })?;
        if let Some(edge) = graph.edges_from(prev).iter().find(|e| e.to_id == current) {
            distance_m += edge.distance_m;
        }
        nodes.push(prev);
        current = prev;
    }

    nodes.reverse();
    Ok(Path {
        nodes,
        time_s,
        distance_m,
    })
}

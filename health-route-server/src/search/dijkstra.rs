//! Linear-scan Dijkstra.
//!
//! Kept alongside A* as a reference implementation: it has no heuristic to
//! get wrong, and the frontier scan makes expansion order fully determined
//! by (time, node id).

use std::collections::{HashMap, HashSet};

use tracing::trace;

use crate::domain::TravelMode;
use crate::graph::{Graph, NodeId};

use super::path::{Path, reconstruct};
use super::{SearchError, SearchLimits};

/// Pick the unsettled node with the smallest tentative time, smallest id on ties.
pub(super) fn pop_min(frontier: &mut HashMap<NodeId, f64>) -> Option<(NodeId, f64)> {
    let (&node, &time) = frontier
        .iter()
        .min_by(|(a_id, a_t), (b_id, b_t)| a_t.total_cmp(b_t).then_with(|| a_id.cmp(b_id)))?;
    frontier.remove(&node);
    Some((node, time))
}

/// Find the minimum-time path from `start` to `target`.
pub fn dijkstra(
    graph: &Graph,
    start: NodeId,
    target: NodeId,
    mode: TravelMode,
    limits: &SearchLimits,
) -> Result<Path, SearchError> {
    if !graph.contains(start) {
        return Err(SearchError::UnknownNode(start));
    }
    if !graph.contains(target) {
        return Err(SearchError::UnknownNode(target));
    }

    let speed = mode.speed_mps();
    let mut best: HashMap<NodeId, f64> = HashMap::new();
    let mut previous: HashMap<NodeId, NodeId> = HashMap::new();
    let mut settled: HashSet<NodeId> = HashSet::new();
    let mut frontier: HashMap<NodeId, f64> = HashMap::new();

    best.insert(start, 0.0);
    frontier.insert(start, 0.0);

    let mut iterations = 0;
    while let Some((node, time)) = pop_min(&mut frontier) {
        limits.check(iterations)?;
        iterations += 1;

        if node == target {
            trace!(start, target, iterations, time_s = time, "dijkstra reached target");
            return reconstruct(graph, &previous, start, target, time);
        }
        settled.insert(node);

        for edge in graph.edges_from(node) {
            if settled.contains(&edge.to_id) {
                continue;
            }
            let candidate = time + edge.travel_time(speed);
            if best.get(&edge.to_id).is_none_or(|&b| candidate < b) {
                best.insert(edge.to_id, candidate);
                previous.insert(edge.to_id, node);
                frontier.insert(edge.to_id, candidate);
            }
        }
    }

    Err(SearchError::NoPath {
        from: start,
        to: target,
    })
}

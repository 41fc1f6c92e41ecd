//! Heap-based A* search.

use std::cmp::Ordering;
use std::collections::{BinaryHeap, HashMap, HashSet};

use tracing::trace;

use crate::domain::{TravelMode, haversine_distance};
use crate::graph::{Graph, NodeId};

use super::path::{Path, reconstruct};
use super::{SearchError, SearchLimits};

#[derive(Copy, Clone, PartialEq)]
struct State {
    f_score: f64,
    g_score: f64,
    node: NodeId,
}

impl Eq for State {}

impl Ord for State {
    fn cmp(&self, other: &Self) -> Ordering {
        // Min-heap by f, then by node id for a stable expansion order
        other
            .f_score
            .total_cmp(&self.f_score)
            .then_with(|| other.node.cmp(&self.node))
    }
}

impl PartialOrd for State {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

/// Find the minimum-time path from `start` to `target`.
///
/// The heuristic is the straight-line distance to the target divided by
/// [`Graph::heuristic_speed`], so the result has the same cost as
/// [`dijkstra`](super::dijkstra) on the same inputs. Superseded heap entries
/// are skipped when popped and do not count toward the iteration cap.
pub fn astar(
    graph: &Graph,
    start: NodeId,
    target: NodeId,
    mode: TravelMode,
    limits: &SearchLimits,
) -> Result<Path, SearchError> {
    if !graph.contains(start) {
        return Err(SearchError::UnknownNode(start));
    }
    let Some(goal) = graph.node(target).map(|n| n.coord()) else {
        return Err(SearchError::UnknownNode(target));
    };

    let speed = mode.speed_mps();
    let h_speed = graph.heuristic_speed(speed);
    let heuristic = |id: NodeId| {
        graph
            .node(id)
            .map_or(0.0, |n| haversine_distance(n.coord(), goal) / h_speed)
    };

    let mut g_scores: HashMap<NodeId, f64> = HashMap::new();
    let mut previous: HashMap<NodeId, NodeId> = HashMap::new();
    let mut closed: HashSet<NodeId> = HashSet::new();
    let mut heap = BinaryHeap::new();

    g_scores.insert(start, 0.0);
    heap.push(State {
        f_score: heuristic(start),
        g_score: 0.0,
        node: start,
    });

    let mut iterations = 0;
    while let Some(State { g_score, node, .. }) = heap.pop() {
        if closed.contains(&node) {
            continue;
        }
        limits.check(iterations)?;
        iterations += 1;

        if node == target {
            trace!(start, target, iterations, time_s = g_score, "a* reached target");
            return reconstruct(graph, &previous, start, target, g_score);
        }
        closed.insert(node);

        for edge in graph.edges_from(node) {
            if closed.contains(&edge.to_id) {
                continue;
            }
            let tentative = g_score + edge.travel_time(speed);
            if g_scores
                .get(&edge.to_id)
                .is_none_or(|&best| tentative < best)
            {
                g_scores.insert(edge.to_id, tentative);
                previous.insert(edge.to_id, node);
                heap.push(State {
                    f_score: tentative + heuristic(edge.to_id),
                    g_score: tentative,
                    node: edge.to_id,
                });
            }
        }
    }

    trace!(start, target, iterations, "a* exhausted frontier");
    Err(SearchError::NoPath {
        from: start,
        to: target,
    })
}

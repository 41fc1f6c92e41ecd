//! Bounded one-to-all reachability.

use std::collections::HashMap;

use tracing::{debug, warn};

use crate::domain::TravelMode;
use crate::graph::{Graph, NodeId};

use super::dijkstra::pop_min;
use super::{SearchError, SearchLimits};

/// Minimal travel time from `start` to every node reachable within `max_time_s`.
///
/// Follows outgoing edges, so the times are *from* `start`. The map contains
/// `start` itself at zero unless `start` is unknown or has no outgoing
/// edges, in which case it is empty.
///
/// Hitting the iteration cap is not an error: the sweep stops and returns
/// the nodes settled so far, whose times are exact. Only an expired deadline
/// fails the call.
pub fn find_nodes_within_time(
    graph: &Graph,
    start: NodeId,
    max_time_s: f64,
    mode: TravelMode,
    limits: &SearchLimits,
) -> Result<HashMap<NodeId, f64>, SearchError> {
    if !graph.contains(start) || graph.edges_from(start).is_empty() {
        debug!(start, "reachability start has no outgoing edges");
        return Ok(HashMap::new());
    }

    let speed = mode.speed_mps();
    let mut settled: HashMap<NodeId, f64> = HashMap::new();
    let mut frontier: HashMap<NodeId, f64> = HashMap::from([(start, 0.0)]);

    let mut iterations = 0;
    while let Some((node, time)) = pop_min(&mut frontier) {
        match limits.check(iterations) {
            Ok(()) => {}
            Err(SearchError::IterationCap(cap)) => {
                warn!(start, cap, settled = settled.len(), "reachability hit iteration cap");
                break;
            }
            Err(e) => return Err(e),
        }
        iterations += 1;

        if time > max_time_s {
            break;
        }
        settled.insert(node, time);

        for edge in graph.edges_from(node) {
            if settled.contains_key(&edge.to_id) {
                continue;
            }
            let candidate = time + edge.travel_time(speed);
            if candidate > max_time_s {
                continue;
            }
            if frontier.get(&edge.to_id).is_none_or(|&t| candidate < t) {
                frontier.insert(edge.to_id, candidate);
            }
        }
    }

    debug!(start, max_time_s, reached = settled.len(), "reachability done");
    Ok(settled)
}

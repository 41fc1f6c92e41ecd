//! Shortest-path and reachability search over a single [`Graph`].
//!
//! Every search is bounded by [`SearchLimits`]: an iteration cap and an
//! optional deadline. Failures are reported as [`SearchError`] values,
//! never as empty paths, so callers cannot mistake "no route" for a
//! zero-cost route.

mod astar;
mod dijkstra;
mod limits;
mod path;
mod reachability;

use crate::domain::TravelMode;
use crate::graph::{Graph, NodeId};

pub use astar::astar;
pub use dijkstra::dijkstra;
pub use limits::SearchLimits;
pub use path::Path;
pub use reachability::find_nodes_within_time;

/// Errors from graph search.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SearchError {
    /// Start or target is not a node of the graph
    #[error("node {0} is not in the graph")]
    UnknownNode(NodeId),

    /// The target cannot be reached from the start
    #[error("no path from {from} to {to}")]
    NoPath { from: NodeId, to: NodeId },

    /// The search expanded its maximum number of nodes
    #[error("search gave up after {0} iterations")]
    IterationCap(usize),

    /// The request deadline passed mid-search
    #[error("search deadline exceeded")]
    DeadlineExceeded,
}

impl SearchError {
    /// Short machine-readable name.
    pub fn kind(&self) -> &'static str {
        match self {
            SearchError::UnknownNode(_) => "unknown_node",
            SearchError::NoPath { .. } => "no_path",
            SearchError::IterationCap(_) => "iteration_cap",
            SearchError::DeadlineExceeded => "deadline_exceeded",
        }
    }
}

/// Which point-to-point algorithm to run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Algorithm {
    #[default]
    AStar,
    Dijkstra,
}

/// Run the selected point-to-point search.
///
/// `mode` supplies the speed for edges without a stored travel time.
pub fn shortest_path(
    graph: &Graph,
    start: NodeId,
    target: NodeId,
    mode: TravelMode,
    algorithm: Algorithm,
    limits: &SearchLimits,
) -> Result<Path, SearchError> {
    match algorithm {
        Algorithm::AStar => astar(graph, start, target, mode, limits),
        Algorithm::Dijkstra => dijkstra(graph, start, target, mode, limits),
    }
}


#[cfg(test)]
mod proptests {
    use super::*;
    use crate::domain::{Coordinate, WALK_SPEED_MPS, haversine_distance};
    use crate::graph::GraphBuilder;
    use proptest::prelude::*;

    /// Random walking graphs whose stated edge lengths are at least the
    /// straight-line gap, some with explicit travel times.
    fn arb_graph() -> impl Strategy<Value = Graph> {
        (2usize..20)
            .prop_flat_map(|n| {
                let coords = prop::collection::vec((0.0f64..0.02, 0.0f64..0.02), n);
                let edges = prop::collection::vec(
                    (0..n, 0..n, 1.0f64..2.0, prop::option::of(0.3f64..3.0)),
                    0..n * 3,
                );
                (coords, edges)
            })
            .prop_map(|(coords, edges)| {
                let points: Vec<Coordinate> = coords
                    .iter()
                    .map(|(dlat, dlon)| Coordinate::new(45.5 + dlat, -73.58 + dlon))
                    .collect();
                let mut builder = GraphBuilder::new(TravelMode::Walk);
                for (i, p) in points.iter().enumerate() {
                    builder = builder.node(i as NodeId, p.lat, p.lon);
                }
                for (from, to, stretch, time_factor) in edges {
                    if from == to {
                        continue;
                    }
                    let distance = haversine_distance(points[from], points[to]) * stretch;
                    let time = time_factor.map_or(0.0, |f| distance / WALK_SPEED_MPS * f);
                    builder = builder.edge(from as NodeId, to as NodeId, distance, time);
                }
                builder.build().unwrap()
            })
    }

    fn arb_case() -> impl Strategy<Value = (Graph, NodeId, NodeId)> {
        arb_graph().prop_flat_map(|g| {
            let n = g.node_count() as NodeId;
            (Just(g), 0..n, 0..n)
        })
    }

    proptest! {
        #[test]
        fn astar_matches_dijkstra((graph, start, target) in arb_case()) {
            let limits = SearchLimits::point_to_point();
            let a = astar(&graph, start, target, TravelMode::Walk, &limits);
            let d = dijkstra(&graph, start, target, TravelMode::Walk, &limits);
            match (a, d) {
                (Ok(a), Ok(d)) => {
                    prop_assert!((a.time_s - d.time_s).abs() < 1e-6, "{} vs {}", a.time_s, d.time_s);
                    prop_assert_eq!(a.nodes.first(), Some(&start));
                    prop_assert_eq!(a.nodes.last(), Some(&target));
                }
                (Err(a), Err(d)) => prop_assert_eq!(a, d),
                (a, d) => prop_assert!(false, "astar {:?} vs dijkstra {:?}", a, d),
            }
        }

        #[test]
        fn reachable_iff_path_exists((graph, start, target) in arb_case()) {
            let reach = find_nodes_within_time(
                &graph, start, f64::MAX, TravelMode::Walk, &SearchLimits::reachability(),
            ).unwrap();
            let path = dijkstra(&graph, start, target, TravelMode::Walk, &SearchLimits::point_to_point());
            if let Some(&t) = reach.get(&target) {
                let path = path.unwrap();
                prop_assert!((path.time_s - t).abs() < 1e-6);
            } else if !reach.is_empty() {
                prop_assert!(path.is_err());
            }
        }

        #[test]
        fn reachability_respects_budget((graph, start, _t) in arb_case(), budget in 0.0f64..600.0) {
            let reach = find_nodes_within_time(
                &graph, start, budget, TravelMode::Walk, &SearchLimits::reachability(),
            ).unwrap();
            for (&node, &time) in &reach {
                prop_assert!(time <= budget);
                if node == start {
                    prop_assert_eq!(time, 0.0);
                }
            }
        }
    }
}

//! In-memory transport graphs.
//!
//! One [`Graph`] exists per transport network (walking, driving). Graphs are
//! built once at startup, usually by decoding a file written by [`codec`],
//! and are read-only afterwards so they can be shared across requests
//! behind an `Arc`.

mod builder;
pub mod codec;
mod error;
mod nearest;

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::domain::{Coordinate, TravelMode, haversine_distance};

pub use builder::GraphBuilder;
pub use error::GraphError;
pub use nearest::find_nearest_node;

/// Node identifier as found in the source map data.
pub type NodeId = i64;

/// A graph vertex with a geographic position.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Node {
    pub id: NodeId,
    pub lat: f64,
    pub lon: f64,
}

impl Node {
    pub fn coord(&self) -> Coordinate {
        Coordinate::new(self.lat, self.lon)
    }
}

/// A directed edge.
///
/// `travel_time_s` is optional in the source data; zero means "absent" and
/// the traversal cost is then derived from the distance and a mode speed.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Edge {
    pub from_id: NodeId,
    pub to_id: NodeId,
    pub distance_m: f64,
    pub travel_time_s: f64,
    pub mode: TravelMode,
}

impl Edge {
    /// Seconds needed to traverse this edge.
    pub fn travel_time(&self, speed_mps: f64) -> f64 {
        if self.travel_time_s > 0.0 {
            self.travel_time_s
        } else {
            self.distance_m / speed_mps
        }
    }
}

/// A directed graph for one transport network.
#[derive(Debug, Clone)]
pub struct Graph {
    mode: TravelMode,
    nodes: HashMap<NodeId, Node>,
    edges: HashMap<NodeId, Vec<Edge>>,
    edge_count: usize,
    /// Largest straight-line speed over any timed edge.
    max_timed_speed_mps: f64,
    /// Largest ratio of straight-line length to stated length over untimed edges.
    max_untimed_stretch: f64,
}

impl Graph {
    /// The network this graph describes.
    pub fn mode(&self) -> TravelMode {
        self.mode
    }

    pub fn node(&self, id: NodeId) -> Option<&Node> {
        self.nodes.get(&id)
    }

    pub fn contains(&self, id: NodeId) -> bool {
        self.nodes.contains_key(&id)
    }

    /// Outgoing edges of `id`, in insertion order.
    ///
    /// Returns an empty slice for unknown nodes and dead ends.
    pub fn edges_from(&self, id: NodeId) -> &[Edge] {
        self.edges.get(&id).map(Vec::as_slice).unwrap_or(&[])
    }

    pub fn nodes(&self) -> impl Iterator<Item = &Node> {
        self.nodes.values()
    }

    /// All edges, grouped by source node in ascending id order.
    pub fn edges(&self) -> impl Iterator<Item = &Edge> {
        let mut sources: Vec<NodeId> = self.edges.keys().copied().collect();
        sources.sort_unstable();
        sources
            .into_iter()
            .flat_map(move |id| self.edges_from(id).iter())
    }

    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    pub fn edge_count(&self) -> usize {
        self.edge_count
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Speed to divide straight-line distance by in an A* heuristic.
    ///
    /// Never lower than the fastest straight-line progress any single edge
    /// allows at `speed_mps`, which keeps the heuristic admissible and
    /// consistent on this graph.
    pub fn heuristic_speed(&self, speed_mps: f64) -> f64 {
        speed_mps
            .max(speed_mps * self.max_untimed_stretch)
            .max(self.max_timed_speed_mps)
    }

    fn from_parts(
        mode: TravelMode,
        nodes: HashMap<NodeId, Node>,
        edges: HashMap<NodeId, Vec<Edge>>,
    ) -> Self {
        let mut edge_count = 0;
        let mut max_timed_speed_mps: f64 = 0.0;
        let mut max_untimed_stretch: f64 = 0.0;

        for edge in edges.values().flatten() {
            edge_count += 1;
            let (Some(from), Some(to)) = (nodes.get(&edge.from_id), nodes.get(&edge.to_id)) else {
                continue;
            };
            let straight = haversine_distance(from.coord(), to.coord());
            if straight == 0.0 {
                continue;
            }
            if edge.travel_time_s > 0.0 {
                max_timed_speed_mps = max_timed_speed_mps.max(straight / edge.travel_time_s);
            } else if edge.distance_m > 0.0 {
                max_untimed_stretch = max_untimed_stretch.max(straight / edge.distance_m);
            } else {
                // A free edge between distinct points: only h = 0 stays admissible.
                max_untimed_stretch = f64::INFINITY;
            }
        }

        Self {
            mode,
            nodes,
            edges,
            edge_count,
            max_timed_speed_mps,
            max_untimed_stretch,
        }
    }
}

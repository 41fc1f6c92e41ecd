//! Fluent construction of validated graphs.

use std::collections::HashMap;

use crate::domain::{Coordinate, TravelMode};

use super::{Edge, Graph, GraphError, Node, NodeId};

/// Builder for [`Graph`].
///
/// Nodes and edges may be added in any order; `build` checks that every edge
/// references known nodes and carries usable numbers.
#[derive(Debug)]
pub struct GraphBuilder {
    mode: TravelMode,
    nodes: Vec<Node>,
    edges: Vec<Edge>,
}

impl GraphBuilder {
    /// Create an empty builder for the given network.
    pub fn new(mode: TravelMode) -> Self {
        Self {
            mode,
            nodes: Vec::new(),
            edges: Vec::new(),
        }
    }

    /// Add a node.
    pub fn node(mut self, id: NodeId, lat: f64, lon: f64) -> Self {
        self.nodes.push(Node { id, lat, lon });
        self
    }

    /// Add a directed edge. A `travel_time_s` of zero means "derive from distance".
    pub fn edge(mut self, from: NodeId, to: NodeId, distance_m: f64, travel_time_s: f64) -> Self {
        self.edges.push(Edge {
            from_id: from,
            to_id: to,
            distance_m,
            travel_time_s,
            mode: self.mode,
        });
        self
    }

    /// Add an edge in both directions with the same length and time.
    pub fn two_way(self, a: NodeId, b: NodeId, distance_m: f64, travel_time_s: f64) -> Self {
        self.edge(a, b, distance_m, travel_time_s)
            .edge(b, a, distance_m, travel_time_s)
    }

    /// Validate and build the graph.
    pub fn build(self) -> Result<Graph, GraphError> {
        let mut nodes = HashMap::with_capacity(self.nodes.len());
        for node in self.nodes {
            if Coordinate::parse(node.lat, node.lon).is_err() {
                return Err(GraphError::InvalidNode {
                    id: node.id,
                    lat: node.lat,
                    lon: node.lon,
                });
            }
            if nodes.insert(node.id, node).is_some() {
                return Err(GraphError::DuplicateNode(node.id));
            }
        }

        let mut edges: HashMap<NodeId, Vec<Edge>> = HashMap::new();
        for edge in self.edges {
            if !nodes.contains_key(&edge.from_id) || !nodes.contains_key(&edge.to_id) {
                return Err(GraphError::DanglingEdge {
                    from: edge.from_id,
                    to: edge.to_id,
                });
            }
            if !edge.distance_m.is_finite() || edge.distance_m < 0.0 {
                return Err(GraphError::InvalidEdge {
                    from: edge.from_id,
                    to: edge.to_id,
                    reason: "distance must be finite and non-negative",
                });
            }
            if !edge.travel_time_s.is_finite() {
                return Err(GraphError::InvalidEdge {
                    from: edge.from_id,
                    to: edge.to_id,
                    reason: "travel time must be finite",
                });
            }
            if edge.mode != self.mode {
                return Err(GraphError::ModeMismatch {
                    expected: self.mode,
                    found: edge.mode,
                });
            }
            edges.entry(edge.from_id).or_default().push(edge);
        }

        Ok(Graph::from_parts(self.mode, nodes, edges))
    }

    pub(super) fn with_parts(mode: TravelMode, nodes: Vec<Node>, edges: Vec<Edge>) -> Self {
        Self { mode, nodes, edges }
    }
}

//! Snapping coordinates onto graph nodes.

use crate::domain::{Coordinate, haversine_distance};

use super::{Graph, NodeId};

/// Find the node closest to `coord` by great-circle distance.
///
/// Returns the node id and its distance in meters, or `None` for an empty
/// graph. Equidistant nodes resolve to the smallest id so the result does
/// not depend on hash map iteration order.
pub fn find_nearest_node(coord: Coordinate, graph: &Graph) -> Option<(NodeId, f64)> {
    graph
        .nodes()
        .map(|node| (node.id, haversine_distance(coord, node.coord())))
        .min_by(|(a_id, a_dist), (b_id, b_dist)| {
            a_dist.total_cmp(b_dist).then_with(|| a_id.cmp(b_id))
        })
}

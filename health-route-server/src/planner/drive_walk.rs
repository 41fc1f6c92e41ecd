//! Drive, then walk the last stretch.
//!
//! The walk is anchored at the destination: a reachability sweep from the
//! destination's walking node finds every place the walk could start, the
//! best-fitting one is chosen, and the car leg is routed to it.

use std::collections::HashMap;
use std::time::Instant;

use tracing::{debug, info, warn};

use crate::domain::{Coordinate, RouteFault, RouteStep, StepMode, TravelMode};
use crate::graph::{Graph, NodeId, find_nearest_node};
use crate::search::{Path, find_nodes_within_time, shortest_path};

use super::select::{Candidate, select_within_budget};
use super::{PlanError, PlannedRoute, PlannerConfig};

/// Plans car-then-walk routes over the driving and walking graphs.
pub struct DriveWalkPlanner<'a> {
    walk: &'a Graph,
    car: &'a Graph,
    config: &'a PlannerConfig,
}

impl<'a> DriveWalkPlanner<'a> {
    pub fn new(walk: &'a Graph, car: &'a Graph, config: &'a PlannerConfig) -> Self {
        Self { walk, car, config }
    }

    /// Plan a route from `origin` to `destination` ending with roughly
    /// `walk_budget_mins` of walking.
    ///
    /// A leg that cannot be routed is left out and recorded as a fault; the
    /// call only fails if neither leg can be produced.
    pub fn plan(
        &self,
        origin: Coordinate,
        destination: Coordinate,
        walk_budget_mins: f64,
    ) -> Result<PlannedRoute, PlanError> {
        if origin == destination {
            return Ok(PlannedRoute::default());
        }

        let deadline = self.config.deadline();
        let budget_s = walk_budget_mins * 60.0;

        let (end_walk_node, _) = find_nearest_node(destination, self.walk)
            .ok_or(PlanError::EmptyGraph(TravelMode::Walk))?;
        let (car_start, _) =
            find_nearest_node(origin, self.car).ok_or(PlanError::EmptyGraph(TravelMode::Car))?;

        let horizon_s = budget_s * self.config.fallback_horizon_factor.max(1.0);
        let reach = find_nodes_within_time(
            self.walk,
            end_walk_node,
            horizon_s,
            TravelMode::Walk,
            &self.config.reach_limits(deadline),
        )
        .map_err(|source| PlanError::NoPath {
            leg: TravelMode::Walk,
            source,
        })?;

        let (walk_start, walk_start_coord) =
            self.choose_walk_start(&reach, end_walk_node, origin, walk_budget_mins)?;

        let mut route = PlannedRoute::default();
        let mut first_failure = None;

        // Car leg: origin to the walk start.
        let car_end = find_nearest_node(walk_start_coord, self.car).map(|(id, _)| id);
        let car_leg = car_end
            .ok_or(PlanError::EmptyGraph(TravelMode::Car))
            .and_then(|car_end| {
                self.route(self.car, car_start, car_end, TravelMode::Car, deadline)
            });
        match car_leg {
            Ok(path) => route.steps.push(RouteStep::new(
                StepMode::Car,
                origin,
                walk_start_coord,
                path.time_s,
                path.distance_m,
                "Drive to walking start point",
            )),
            Err(e) => {
                warn!(error = %e, "car leg unavailable");
                route.faults.push(RouteFault::new(StepMode::Car, e.kind(), e.to_string()));
                first_failure.get_or_insert(e);
            }
        }

        // Walk leg: walk start to the destination.
        match self.route(self.walk, walk_start, end_walk_node, TravelMode::Walk, deadline) {
            Ok(path) => route.steps.push(RouteStep::new(
                StepMode::WalkFinal,
                walk_start_coord,
                destination,
                path.time_s,
                path.distance_m,
                "Walk to destination",
            )),
            Err(e) => {
                warn!(error = %e, "walk leg unavailable");
                route
                    .faults
                    .push(RouteFault::new(StepMode::WalkFinal, e.kind(), e.to_string()));
                first_failure.get_or_insert(e);
            }
        }

        if route.steps.is_empty() {
            if let Some(e) = first_failure {
                return Err(e);
            }
        }

        info!(
            steps = route.steps.len(),
            faults = route.faults.len(),
            walk_budget_mins,
            "planned drive-walk route"
        );
        Ok(route)
    }

    fn choose_walk_start(
        &self,
        reach: &HashMap<NodeId, f64>,
        end_walk_node: NodeId,
        origin: Coordinate,
        walk_budget_mins: f64,
    ) -> Result<(NodeId, Coordinate), PlanError> {
        let budget_s = walk_budget_mins * 60.0;
        let mut candidates: Vec<Candidate<(NodeId, Coordinate)>> = reach
            .iter()
            .filter(|&(&id, _)| id != end_walk_node)
            .filter_map(|(&id, &time_s)| {
                let coord = self.walk.node(id)?.coord();
                Some(Candidate {
                    item: (id, coord),
                    time_s,
                    tie_break: coord.distance_to(&origin),
                })
            })
            .collect();
        candidates.sort_by_key(|c| c.item.0);

        debug!(candidates = candidates.len(), budget_s, "choosing walk start");

        let chosen =
            select_within_budget(candidates, budget_s).ok_or(PlanError::InfeasibleBudget {
                budget_mins: walk_budget_mins,
            })?;

        if !chosen.within_budget {
            warn!(
                budget_s,
                walk_s = chosen.time_s,
                "no walk start fits the budget, using nearest overshoot"
            );
        }
        Ok(chosen.item)
    }

    fn route(
        &self,
        graph: &Graph,
        from: NodeId,
        to: NodeId,
        mode: TravelMode,
        deadline: Instant,
    ) -> Result<Path, PlanError> {
        shortest_path(
            graph,
            from,
            to,
            mode,
            self.config.algorithm,
            &self.config.path_limits(deadline),
        )
        .map_err(|source| PlanError::NoPath { leg: mode, source })
    }
}

#[cfg(test)]
pub(crate) mod fixtures {
    use crate::domain::{Coordinate, TravelMode};
    use crate::graph::{Graph, GraphBuilder};

    pub const ORIGIN: Coordinate = Coordinate::new(45.50, -73.57);
    pub const DESTINATION: Coordinate = Coordinate::new(45.510, -73.580);

    /// Walking nodes around the destination:
    /// node 2 is 8 minutes away, node 3 is 12 minutes away.
    pub fn walk_graph() -> Graph {
        GraphBuilder::new(TravelMode::Walk)
            .node(1, DESTINATION.lat, DESTINATION.lon)
            .node(2, 45.506, -73.584)
            .node(3, 45.504, -73.590)
            .two_way(1, 2, 672.0, 480.0)
            .two_way(1, 3, 1008.0, 720.0)
            .build()
            .unwrap()
    }

    /// A road from the origin to both walking start points.
    pub fn car_graph() -> Graph {
        GraphBuilder::new(TravelMode::Car)
            .node(10, ORIGIN.lat, ORIGIN.lon)
            .node(20, 45.506, -73.584)
            .node(30, 45.504, -73.590)
            .two_way(10, 20, 2780.0, 0.0)
            .two_way(10, 30, 1390.0, 0.0)
            .build()
            .unwrap()
    }
}

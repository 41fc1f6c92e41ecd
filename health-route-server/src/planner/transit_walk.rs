//! Transit routes with a forced walk at the end.
//!
//! The itinerary comes from the directions provider. The plain variant
//! only tags the walking steps; the earlier-stop variant moves the final
//! alighting point upstream so the closing walk fills the budget.

use std::sync::Arc;
use std::time::Instant;

use chrono::Utc;
use tracing::{debug, info, warn};

use crate::directions::{DirectionsProvider, DirectionsRequest};
use crate::domain::{
    Coordinate, RouteFault, RouteStep, StepMode, TRANSIT_SPEED_MPS, TravelMode, haversine_distance,
};
use crate::graph::{Graph, NodeId, find_nearest_node};
use crate::search::{Path, SearchError, shortest_path};
use crate::transit::{StopIndex, TransitStop};

use super::select::{Candidate, select_within_budget};
use super::{PlanError, PlannedRoute, PlannerConfig};

/// Tag walking steps by their position relative to transit.
///
/// A walk directly before a transit step becomes `walk_to_transit`; one
/// directly after becomes `walk_from_transit`. Other steps are unchanged.
pub fn tag_walking_steps(steps: &mut [RouteStep]) {
    let modes: Vec<StepMode> = steps.iter().map(|s| s.mode.clone()).collect();
    for (i, step) in steps.iter_mut().enumerate() {
        if step.mode != StepMode::Walk {
            continue;
        }
        let next_is_transit = modes.get(i + 1) == Some(&StepMode::Transit);
        let prev_is_transit = i > 0 && modes[i - 1] == StepMode::Transit;
        if next_is_transit {
            step.mode = StepMode::WalkToTransit;
        } else if prev_is_transit {
            step.mode = StepMode::WalkFromTransit;
        }
    }
}

fn walking_seconds(steps: &[RouteStep]) -> f64 {
    steps
        .iter()
        .filter(|s| s.mode.is_walking())
        .map(|s| s.duration_sec)
        .sum()
}

/// Plain transit: the provider's best itinerary with walking steps tagged.
pub async fn plan_transit<D: DirectionsProvider>(
    directions: &D,
    origin: Coordinate,
    destination: Coordinate,
    walk_budget_mins: f64,
) -> Result<PlannedRoute, PlanError> {
    if origin == destination {
        return Ok(PlannedRoute::default());
    }

    let request = DirectionsRequest::transit(origin, destination).with_walk_budget(walk_budget_mins);
    let mut steps = directions.directions(&request).await?;
    tag_walking_steps(&mut steps);

    let walk_s = walking_seconds(&steps);
    if walk_s > walk_budget_mins * 60.0 {
        warn!(
            walk_mins = walk_s / 60.0,
            walk_budget_mins, "transit route walks more than requested"
        );
    }
    info!(steps = steps.len(), walk_mins = walk_s / 60.0, "planned transit route");

    Ok(PlannedRoute {
        steps,
        faults: Vec::new(),
    })
}

/// Transit with an earlier alighting stop and a walk that fills the budget.
///
/// The provider call runs on the async runtime; the stop lookups and walking
/// searches run on the blocking pool over the shared walk graph and index.
pub struct EarlierStopPlanner<'a, D, S> {
    directions: &'a D,
    stops: Arc<S>,
    walk: Arc<Graph>,
    config: Arc<PlannerConfig>,
}

impl<'a, D, S> EarlierStopPlanner<'a, D, S>
where
    D: DirectionsProvider + Sync,
    S: StopIndex + Send + Sync + 'static,
{
    pub fn new(
        directions: &'a D,
        stops: Arc<S>,
        walk: Arc<Graph>,
        config: Arc<PlannerConfig>,
    ) -> Self {
        Self {
            directions,
            stops,
            walk,
            config,
        }
    }

    /// Plan the route, failing if the earlier stop cannot be resolved.
    pub async fn plan(
        &self,
        origin: Coordinate,
        destination: Coordinate,
        walk_budget_mins: f64,
    ) -> Result<PlannedRoute, PlanError> {
        if origin == destination {
            return Ok(PlannedRoute::default());
        }
        let baseline = self.baseline(origin, destination).await?;
        let steps = self.extend(baseline, destination, walk_budget_mins).await?;
        Ok(PlannedRoute {
            steps,
            faults: Vec::new(),
        })
    }

    /// Like [`plan`](Self::plan), but when only the earlier-stop search
    /// fails, return the provider's route with a fault instead.
    pub async fn plan_or_baseline(
        &self,
        origin: Coordinate,
        destination: Coordinate,
        walk_budget_mins: f64,
    ) -> Result<PlannedRoute, PlanError> {
        if origin == destination {
            return Ok(PlannedRoute::default());
        }
        let baseline = self.baseline(origin, destination).await?;
        match self
            .extend(baseline.clone(), destination, walk_budget_mins)
            .await
        {
            Ok(steps) => Ok(PlannedRoute {
                steps,
                faults: Vec::new(),
            }),
            Err(e) if e.keeps_baseline() => {
                warn!(error = %e, "earlier stop unavailable, returning provider route");
                Ok(PlannedRoute {
                    steps: baseline,
                    faults: vec![RouteFault::new(
                        StepMode::WalkFromTransit,
                        e.kind(),
                        e.to_string(),
                    )],
                })
            }
            Err(e) => Err(e),
        }
    }

    async fn baseline(
        &self,
        origin: Coordinate,
        destination: Coordinate,
    ) -> Result<Vec<RouteStep>, PlanError> {
        let request = DirectionsRequest::transit(origin, destination).departing_at(Utc::now());
        let mut steps = self.directions.directions(&request).await?;
        tag_walking_steps(&mut steps);
        Ok(steps)
    }

    async fn extend(
        &self,
        baseline: Vec<RouteStep>,
        destination: Coordinate,
        walk_budget_mins: f64,
    ) -> Result<Vec<RouteStep>, PlanError> {
        let stops = Arc::clone(&self.stops);
        let walk = Arc::clone(&self.walk);
        let config = Arc::clone(&self.config);
        tokio::task::spawn_blocking(move || {
            extend_baseline(
                stops.as_ref(),
                &walk,
                &config,
                &baseline,
                destination,
                walk_budget_mins,
            )
        })
        .await
        .map_err(|e| PlanError::TaskFailed(e.to_string()))?
    }
}

/// Replace everything from the last transit step onward with a shortened
/// ride and a walk from the chosen stop.
///
/// Candidates are the stops after the boarding stop and before the
/// alighting stop of the last transit leg.
fn extend_baseline<S: StopIndex>(
    stops: &S,
    walk: &Graph,
    config: &PlannerConfig,
    baseline: &[RouteStep],
    destination: Coordinate,
    walk_budget_mins: f64,
) -> Result<Vec<RouteStep>, PlanError> {
    let deadline = config.deadline();
    let budget_s = walk_budget_mins * 60.0;

    let last_idx = baseline
        .iter()
        .rposition(|s| s.mode == StepMode::Transit)
        .ok_or(PlanError::NoTransitLeg)?;
    let last_transit = &baseline[last_idx];

    let (alight, dist_m) = stops
        .nearest_stop(last_transit.to_coord)
        .ok_or(PlanError::StopUnresolved)?;
    debug!(stop = %alight.id, name = %alight.name, dist_m, "matched alighting stop");

    let pattern = stops
        .canonical_pattern(&alight.id)
        .map_err(|source| PlanError::TripPatternUnresolved {
            stop_id: alight.id.clone(),
            source,
        })?;
    let mut before = stops
        .stops_before(&alight.id, &pattern)
        .map_err(|source| PlanError::TripPatternUnresolved {
            stop_id: alight.id.clone(),
            source,
        })?;

    // Never ride back past the boarding stop.
    if let Some((board, _)) = stops.nearest_stop(last_transit.from_coord) {
        if let Some(pos) = before.iter().position(|s| s.id == board.id) {
            debug!(stop = %board.id, skipped = pos + 1, "dropping stops up to boarding stop");
            before.drain(..=pos);
        }
    }
    if before.is_empty() {
        return Err(PlanError::NoPrecedingStops(alight.id.clone()));
    }
    debug!(trip = %pattern.trip_id, candidates = before.len(), "earlier stop candidates");

    let (dest_node, _) =
        find_nearest_node(destination, walk).ok_or(PlanError::EmptyGraph(TravelMode::Walk))?;

    let mut candidates: Vec<Candidate<(TransitStop, Path)>> = Vec::new();
    for (i, stop) in before.into_iter().enumerate() {
        let Some((stop_node, _)) = find_nearest_node(stop.coord(), walk) else {
            continue;
        };
        match walk_path(walk, config, stop_node, dest_node, deadline) {
            Ok(path) => candidates.push(Candidate {
                time_s: path.time_s,
                tie_break: i as f64,
                item: (stop, path),
            }),
            Err(SearchError::DeadlineExceeded) => {
                return Err(PlanError::NoPath {
                    leg: TravelMode::Walk,
                    source: SearchError::DeadlineExceeded,
                });
            }
            Err(e) => debug!(stop = %stop.id, error = %e, "no walk from candidate stop"),
        }
    }

    let chosen = select_within_budget(candidates, budget_s).ok_or(PlanError::NoWalkableStop)?;
    if !chosen.within_budget {
        warn!(
            budget_s,
            walk_s = chosen.time_s,
            "no earlier stop fits the walk budget, using nearest overshoot"
        );
    }
    let (stop, walk) = chosen.item;
    let stop_coord = stop.coord();

    info!(
        stop = %stop.name,
        walk_mins = walk.time_s / 60.0,
        walk_m = walk.distance_m,
        "chose earlier alighting stop"
    );

    let ride_m = haversine_distance(last_transit.from_coord, stop_coord);
    let mut steps = baseline[..last_idx].to_vec();
    steps.push(RouteStep::new(
        StepMode::Transit,
        last_transit.from_coord,
        stop_coord,
        ride_m / TRANSIT_SPEED_MPS,
        ride_m,
        format!("Stay on transit until earlier stop: {}", stop.name),
    ));
    steps.push(RouteStep::new(
        StepMode::WalkFromTransit,
        stop_coord,
        destination,
        walk.time_s,
        walk.distance_m,
        format!(
            "Walk from {} to destination ({:.1} min)",
            stop.name,
            walk.time_s / 60.0
        ),
    ));
    Ok(steps)
}

fn walk_path(
    walk: &Graph,
    config: &PlannerConfig,
    from: NodeId,
    to: NodeId,
    deadline: Instant,
) -> Result<Path, SearchError> {
    shortest_path(
        walk,
        from,
        to,
        TravelMode::Walk,
        config.algorithm,
        &config.path_limits(deadline),
    )
}

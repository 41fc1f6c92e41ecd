//! Planner errors.

use crate::directions::DirectionsError;
use crate::domain::TravelMode;
use crate::search::SearchError;
use crate::transit::StopIndexError;

/// Why a route could not be planned.
#[derive(Debug, thiserror::Error)]
pub enum PlanError {
    /// A required network has no nodes
    #[error("the {0} graph is empty")]
    EmptyGraph(TravelMode),

    /// A required leg could not be found
    #[error("no {leg} route: {source}")]
    NoPath {
        leg: TravelMode,
        #[source]
        source: SearchError,
    },

    /// No start point exists within or near the requested budget
    #[error("no start point within reach of a {budget_mins:.1} minute budget")]
    InfeasibleBudget { budget_mins: f64 },

    /// The directions provider failed
    #[error("directions provider error: {0}")]
    Directions(#[from] DirectionsError),

    /// The baseline transit route has no transit step
    #[error("the transit route contains no transit leg")]
    NoTransitLeg,

    /// No GTFS stop near the end of the transit leg
    #[error("no transit stop near the end of the transit leg")]
    StopUnresolved,

    /// The stop index could not produce a stop pattern
    #[error("no trip pattern for stop {stop_id}: {source}")]
    TripPatternUnresolved {
        stop_id: String,
        #[source]
        source: StopIndexError,
    },

    /// The alighting stop is the first stop of its trip
    #[error("stop {0} has no earlier stops on its trip")]
    NoPrecedingStops(String),

    /// No earlier stop has a walking route to the destination
    #[error("no earlier stop has a walking route to the destination")]
    NoWalkableStop,

    /// The transit planners need a stop index and none is loaded
    #[error("transit stop data is not loaded")]
    StopsUnavailable,

    /// A planning task on the blocking pool panicked or was cancelled
    #[error("planner task failed: {0}")]
    TaskFailed(String),
}

impl PlanError {
    /// Short machine-readable name, used in API error bodies and route faults.
    pub fn kind(&self) -> &'static str {
        match self {
            PlanError::EmptyGraph(_) => "empty_graph",
            PlanError::NoPath { source, .. } => match source {
                SearchError::DeadlineExceeded => "deadline_exceeded",
                _ => "no_path",
            },
            PlanError::InfeasibleBudget { .. } => "infeasible_budget",
            PlanError::Directions(_) => "directions_error",
            PlanError::NoTransitLeg => "no_transit_leg",
            PlanError::StopUnresolved => "stop_unresolved",
            PlanError::TripPatternUnresolved { .. } => "trip_pattern_unresolved",
            PlanError::NoPrecedingStops(_) => "no_preceding_stops",
            PlanError::NoWalkableStop => "no_walkable_stop",
            PlanError::StopsUnavailable => "stops_unavailable",
            PlanError::TaskFailed(_) => "task_failed",
        }
    }

    /// True when the earlier-stop extension failed but the plain transit
    /// route it started from is still a usable answer.
    pub fn keeps_baseline(&self) -> bool {
        match self {
            PlanError::NoTransitLeg
            | PlanError::StopUnresolved
            | PlanError::TripPatternUnresolved { .. }
            | PlanError::NoPrecedingStops(_)
            | PlanError::NoWalkableStop
            | PlanError::StopsUnavailable
            | PlanError::EmptyGraph(_) => true,
            PlanError::NoPath { source, .. } => !matches!(source, SearchError::DeadlineExceeded),
            PlanError::InfeasibleBudget { .. }
            | PlanError::Directions(_)
            | PlanError::TaskFailed(_) => false,
        }
    }
}

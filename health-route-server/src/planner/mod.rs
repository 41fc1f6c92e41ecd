//! Hybrid route planners.
//!
//! Each planner answers the same question for a different pair of modes:
//! "get me from A to B, but make me walk (or cycle) for about N minutes at
//! the end". Graph-only planners are synchronous and CPU-bound; planners
//! that consult the directions provider are async.

mod bike;
mod config;
mod drive_walk;
mod error;
mod select;
mod transit_walk;

use crate::domain::{RouteFault, RouteStep};

pub use bike::{plan_drive_bike, plan_transit_bike, rewrite_as_bike, walk_equivalent_mins};
pub use config::PlannerConfig;
pub use drive_walk::DriveWalkPlanner;
pub use error::PlanError;
pub use select::{Candidate, Selection, TIME_EPSILON, select_within_budget};
pub use transit_walk::{EarlierStopPlanner, plan_transit, tag_walking_steps};

/// The outcome of planning: the steps in travel order and any legs that
/// could not be produced.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PlannedRoute {
    pub steps: Vec<RouteStep>,
    pub faults: Vec<RouteFault>,
}

impl PlannedRoute {
    pub fn is_complete(&self) -> bool {
        self.faults.is_empty()
    }
}

#[cfg(test)]
pub(crate) use drive_walk::fixtures as drive_fixtures;
#[cfg(test)]
pub(crate) use transit_walk::fixtures as transit_fixtures;

//! Planner configuration.

use std::time::{Duration, Instant};

use crate::search::{Algorithm, SearchLimits};

/// Configuration parameters for route planning.
#[derive(Debug, Clone)]
pub struct PlannerConfig {
    /// Walking budget used by drive-then-walk when the request has none (minutes).
    pub car_walk_default_mins: f64,

    /// Walking budget used by transit planners when the request has none (minutes).
    pub transit_walk_default_mins: f64,

    /// Expansion cap for point-to-point searches.
    pub max_path_iterations: usize,

    /// Expansion cap for reachability sweeps.
    pub max_reach_iterations: usize,

    /// How many expansions run between deadline checks.
    pub deadline_check_every: usize,

    /// Wall-clock budget for all searches of one request (milliseconds).
    pub search_timeout_ms: u64,

    /// Reachability for drive-then-walk extends this many times past the
    /// budget, so a nearest-overshoot candidate exists when nothing fits.
    pub fallback_horizon_factor: f64,

    /// Point-to-point algorithm.
    pub algorithm: Algorithm,
}

impl PlannerConfig {
    /// Create a new configuration with the given budgets and timeout.
    pub fn new(
        car_walk_default_mins: f64,
        transit_walk_default_mins: f64,
        search_timeout_ms: u64,
    ) -> Self {
        Self {
            car_walk_default_mins,
            transit_walk_default_mins,
            search_timeout_ms,
            ..Self::default()
        }
    }

    /// Returns the search timeout as a Duration.
    pub fn search_timeout(&self) -> Duration {
        Duration::from_millis(self.search_timeout_ms)
    }

    /// Deadline for a request starting now.
    pub fn deadline(&self) -> Instant {
        Instant::now() + self.search_timeout()
    }

    /// Limits for a point-to-point search ending at `deadline`.
    pub fn path_limits(&self, deadline: Instant) -> SearchLimits {
        SearchLimits::new(self.max_path_iterations)
            .with_deadline(deadline)
            .with_check_every(self.deadline_check_every)
    }

    /// Limits for a reachability sweep ending at `deadline`.
    pub fn reach_limits(&self, deadline: Instant) -> SearchLimits {
        SearchLimits::new(self.max_reach_iterations)
            .with_deadline(deadline)
            .with_check_every(self.deadline_check_every)
    }
}

impl Default for PlannerConfig {
    fn default() -> Self {
        Self {
            car_walk_default_mins: 20.0,
            transit_walk_default_mins: 15.0,
            max_path_iterations: SearchLimits::POINT_TO_POINT_ITERATIONS,
            max_reach_iterations: SearchLimits::REACHABILITY_ITERATIONS,
            deadline_check_every: SearchLimits::DEFAULT_CHECK_EVERY,
            search_timeout_ms: 5_000,
            fallback_horizon_factor: 2.0,
            algorithm: Algorithm::AStar,
        }
    }
}

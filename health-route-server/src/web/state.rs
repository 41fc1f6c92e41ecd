//! Application state for the web layer.

use std::sync::Arc;

use crate::directions::DirectionsBackend;
use crate::graph::Graph;
use crate::planner::PlannerConfig;
use crate::transit::GtfsIndex;

/// Shared application state.
///
/// Everything is loaded once at startup and only read afterwards.
#[derive(Clone)]
pub struct AppState {
    /// Walking network
    pub walk: Arc<Graph>,

    /// Driving network
    pub car: Arc<Graph>,

    /// Transit stop index; the earlier-stop endpoints need it
    pub stops: Option<Arc<GtfsIndex>>,

    /// Directions provider for transit itineraries
    pub directions: Arc<DirectionsBackend>,

    /// Planner configuration
    pub config: Arc<PlannerConfig>,
}

impl AppState {
    /// Create a new app state.
    pub fn new(
        walk: Graph,
        car: Graph,
        stops: Option<GtfsIndex>,
        directions: DirectionsBackend,
        config: PlannerConfig,
    ) -> Self {
        Self {
            walk: Arc::new(walk),
            car: Arc::new(car),
            stops: stops.map(Arc::new),
            directions: Arc::new(directions),
            config: Arc::new(config),
        }
    }
}

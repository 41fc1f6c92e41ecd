//! Route response assembly.
//!
//! Totals are plain sums over the steps. Calories and CO2 are fixed linear
//! estimates (50 kcal per walked km, 0.21 kg per driven km), not
//! physiological or emissions models.

use serde::Serialize;

use crate::domain::{Coordinate, RouteFault, RouteStep, StepMode};
use crate::planner::PlannedRoute;

/// Estimated kilocalories per walked kilometer.
pub const KCAL_PER_WALK_KM: f64 = 50.0;

/// Estimated kilograms of CO2 per driven kilometer.
pub const CO2_KG_PER_CAR_KM: f64 = 0.21;

/// The JSON body returned by every routing endpoint.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RouteResponse {
    pub steps: Vec<RouteStep>,
    pub total_distance_m: f64,
    pub total_duration_sec: f64,
    pub walk_distance_m: f64,
    pub walk_duration_sec: f64,
    pub car_distance_m: f64,
    pub car_duration_sec: f64,
    pub calories_burned: i64,
    pub carbon_footprint_kg: f64,

    /// Start of the first car or transit step.
    pub car_or_transit_start: Coordinate,
    /// Start of the first walking step.
    pub walk_start: Coordinate,
    /// End of the last walking step.
    pub walk_end: Coordinate,

    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub faults: Vec<RouteFault>,
}

/// Aggregate a planned route into a response.
pub fn prepare_response(route: PlannedRoute) -> RouteResponse {
    let PlannedRoute { steps, faults } = route;
    let mut resp = RouteResponse::default();

    if let Some(step) = steps
        .iter()
        .find(|s| matches!(s.mode, StepMode::Car | StepMode::Transit))
    {
        resp.car_or_transit_start = step.from_coord;
    }

    let mut first_walk = true;
    for step in &steps {
        resp.total_distance_m += step.distance_m;
        resp.total_duration_sec += step.duration_sec;

        if step.mode == StepMode::Car {
            resp.car_distance_m += step.distance_m;
            resp.car_duration_sec += step.duration_sec;
        }
        if step.mode.is_walking() {
            if first_walk {
                resp.walk_start = step.from_coord;
                first_walk = false;
            }
            resp.walk_end = step.to_coord;
            resp.walk_distance_m += step.distance_m;
            resp.walk_duration_sec += step.duration_sec;
        }
    }

    // Truncated toward zero.
    resp.calories_burned = (resp.walk_distance_m / 1000.0 * KCAL_PER_WALK_KM) as i64;
    resp.carbon_footprint_kg = resp.car_distance_m / 1000.0 * CO2_KG_PER_CAR_KM;

    resp.steps = steps;
    resp.faults = faults;
    resp
}

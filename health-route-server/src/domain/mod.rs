//! Core domain types for route planning.
//!
//! Coordinates, travel modes, and the step records that make up a planned
//! route. Everything here is plain data with no I/O.

mod coord;
mod mode;
mod step;

pub use coord::{Coordinate, EARTH_RADIUS_M, InvalidCoordinate, haversine_distance};
pub use mode::{
    BIKE_SPEED_MPS, BIKE_WALK_FACTOR, CAR_SPEED_MPS, StepMode, TRANSIT_SPEED_MPS, TravelMode,
    WALK_SPEED_MPS,
};
pub use step::{RouteFault, RouteStep};

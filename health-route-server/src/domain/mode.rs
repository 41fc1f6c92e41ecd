//! Travel modes and step mode tags.

use std::fmt;

use serde::{Deserialize, Serialize, Serializer};

/// Walking speed, meters per second.
pub const WALK_SPEED_MPS: f64 = 1.4;

/// Cycling speed, meters per second.
pub const BIKE_SPEED_MPS: f64 = 4.5;

/// Driving speed, meters per second.
pub const CAR_SPEED_MPS: f64 = 13.9;

/// Average transit vehicle speed, meters per second.
pub const TRANSIT_SPEED_MPS: f64 = 8.3;

/// How many walking minutes one cycling minute is worth.
pub const BIKE_WALK_FACTOR: f64 = BIKE_SPEED_MPS / WALK_SPEED_MPS;

/// A transport network and its default speed profile.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TravelMode {
    Walk,
    Bike,
    Car,
    Transit,
}

impl TravelMode {
    /// Speed used for edges that carry no explicit travel time.
    pub const fn speed_mps(self) -> f64 {
        match self {
            TravelMode::Walk => WALK_SPEED_MPS,
            TravelMode::Bike => BIKE_SPEED_MPS,
            TravelMode::Car => CAR_SPEED_MPS,
            TravelMode::Transit => TRANSIT_SPEED_MPS,
        }
    }

    pub const fn as_str(self) -> &'static str {
        match self {
            TravelMode::Walk => "walk",
            TravelMode::Bike => "bike",
            TravelMode::Car => "car",
            TravelMode::Transit => "transit",
        }
    }
}

impl fmt::Display for TravelMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The mode tag of a single [`RouteStep`](super::RouteStep).
///
/// Walking steps are refined by their position in the route so that the
/// client can highlight the forced-activity segment. `Other` carries modes
/// reported by the directions provider that have no dedicated tag.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum StepMode {
    Car,
    Transit,
    Walk,
    WalkFinal,
    WalkToTransit,
    WalkFromTransit,
    Bike,
    BikeFinal,
    BikeToTransit,
    BikeFromTransit,
    Other(String),
}

impl StepMode {
    pub fn as_str(&self) -> &str {
        match self {
            StepMode::Car => "car",
            StepMode::Transit => "transit",
            StepMode::Walk => "walk",
            StepMode::WalkFinal => "walk_final",
            StepMode::WalkToTransit => "walk_to_transit",
            StepMode::WalkFromTransit => "walk_from_transit",
            StepMode::Bike => "bike",
            StepMode::BikeFinal => "bike_final",
            StepMode::BikeToTransit => "bike_to_transit",
            StepMode::BikeFromTransit => "bike_from_transit",
            StepMode::Other(s) => s,
        }
    }

    /// True for every walking tag, whatever its position in the route.
    pub fn is_walking(&self) -> bool {
        matches!(
            self,
            StepMode::Walk | StepMode::WalkFinal | StepMode::WalkToTransit | StepMode::WalkFromTransit
        )
    }

    /// True for every cycling tag.
    pub fn is_cycling(&self) -> bool {
        matches!(
            self,
            StepMode::Bike | StepMode::BikeFinal | StepMode::BikeToTransit | StepMode::BikeFromTransit
        )
    }

    /// The cycling counterpart of a walking tag.
    pub fn to_cycling(&self) -> Option<StepMode> {
        match self {
            StepMode::Walk => Some(StepMode::Bike),
            StepMode::WalkFinal => Some(StepMode::BikeFinal),
            StepMode::WalkToTransit => Some(StepMode::BikeToTransit),
            StepMode::WalkFromTransit => Some(StepMode::BikeFromTransit),
            _ => None,
        }
    }
}

impl fmt::Display for StepMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl Serialize for StepMode {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

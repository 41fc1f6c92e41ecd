//! Static transit schedule data.
//!
//! The earlier-stop planner needs three things from a schedule: the stop
//! nearest a coordinate, a representative stop sequence through a stop,
//! and the stops before a stop on that sequence. [`StopIndex`] captures
//! those; [`GtfsIndex`] answers them from a GTFS feed.

mod error;
mod gtfs;

use serde::Serialize;

use crate::domain::Coordinate;

pub use error::StopIndexError;
pub use gtfs::GtfsIndex;

#[cfg(test)]
pub(crate) use gtfs::fixtures as gtfs_fixtures;

/// A boarding location.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TransitStop {
    pub id: String,
    pub name: String,
    pub lat: f64,
    pub lon: f64,
    pub parent_station: Option<String>,
}

impl TransitStop {
    pub fn coord(&self) -> Coordinate {
        Coordinate::new(self.lat, self.lon)
    }
}

/// The ordered stops of one representative trip.
#[derive(Debug, Clone, PartialEq)]
pub struct TripPattern {
    pub trip_id: String,
    pub route_id: String,
    pub direction_id: u8,
    /// Stop ids in stop-sequence order.
    pub stop_ids: Vec<String>,
}

/// Stop lookups used by the transit planners.
pub trait StopIndex {
    /// The stop closest to `coord` and its distance in meters.
    fn nearest_stop(&self, coord: Coordinate) -> Option<(&TransitStop, f64)>;

    /// The longest trip through `stop_id`.
    fn canonical_pattern(&self, stop_id: &str) -> Result<TripPattern, StopIndexError>;

    /// Stops strictly before `stop_id` on `pattern`, in travel order.
    fn stops_before(
        &self,
        stop_id: &str,
        pattern: &TripPattern,
    ) -> Result<Vec<TransitStop>, StopIndexError>;
}

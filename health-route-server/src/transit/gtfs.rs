//! GTFS-backed stop index.
//!
//! Reads `stops.txt`, `trips.txt` and `stop_times.txt` from a feed
//! directory. Only the columns the planners need are kept.

use std::collections::HashMap;
use std::fs::File;
use std::io::Read;
use std::path::Path;

use serde::Deserialize;
use serde::de::DeserializeOwned;
use tracing::{info, warn};

use crate::domain::{Coordinate, haversine_distance};

use super::{StopIndex, StopIndexError, TransitStop, TripPattern};

#[derive(Debug, Deserialize, Default)]
#[serde(default)]
struct FeedStop {
    stop_id: String,
    stop_name: String,
    stop_lat: String,
    stop_lon: String,
    parent_station: String,
}

#[derive(Debug, Deserialize, Default)]
#[serde(default)]
struct FeedTrip {
    route_id: String,
    trip_id: String,
    direction_id: String,
}

#[derive(Debug, Deserialize, Default)]
#[serde(default)]
struct FeedStopTime {
    trip_id: String,
    stop_id: String,
    stop_sequence: String,
}

#[derive(Debug, Clone, Default)]
struct TripInfo {
    route_id: String,
    direction_id: u8,
}

/// In-memory index over a GTFS feed.
#[derive(Debug, Clone, Default)]
pub struct GtfsIndex {
    stops: HashMap<String, TransitStop>,
    trips: HashMap<String, TripInfo>,
    /// (stop_sequence, stop_id) per trip, sorted by sequence.
    stop_times: HashMap<String, Vec<(u32, String)>>,
    /// Trips serving each stop, in stop_times.txt order.
    trips_by_stop: HashMap<String, Vec<String>>,
}

fn read_table<T: DeserializeOwned, R: Read>(
    reader: R,
    table: &'static str,
) -> Result<Vec<T>, StopIndexError> {
    csv::ReaderBuilder::new()
        .flexible(true)
        .trim(csv::Trim::All)
        .from_reader(reader)
        .deserialize()
        .collect::<Result<Vec<T>, _>>()
        .map_err(|source| StopIndexError::Csv { table, source })
}

fn open(dir: &Path, name: &str) -> Result<File, StopIndexError> {
    let path = dir.join(name);
    File::open(&path).map_err(|source| StopIndexError::Open { path, source })
}

impl GtfsIndex {
    /// Load the feed in `dir`.
    pub fn load(dir: impl AsRef<Path>) -> Result<Self, StopIndexError> {
        let dir = dir.as_ref();
        let index = Self::from_readers(
            open(dir, "stops.txt")?,
            open(dir, "trips.txt")?,
            open(dir, "stop_times.txt")?,
        )?;
        info!(
            dir = %dir.display(),
            stops = index.stops.len(),
            trips = index.trips.len(),
            "loaded GTFS index"
        );
        Ok(index)
    }

    /// Build an index from the three tables' CSV contents.
    pub fn from_readers(
        stops: impl Read,
        trips: impl Read,
        stop_times: impl Read,
    ) -> Result<Self, StopIndexError> {
        let mut index = GtfsIndex::default();

        let mut skipped = 0usize;
        for row in read_table::<FeedStop, _>(stops, "stops.txt")? {
            if row.stop_id.is_empty() {
                continue;
            }
            let (Ok(lat), Ok(lon)) = (row.stop_lat.parse::<f64>(), row.stop_lon.parse::<f64>())
            else {
                skipped += 1;
                continue;
            };
            if Coordinate::parse(lat, lon).is_err() {
                skipped += 1;
                continue;
            }
            let stop = TransitStop {
                id: row.stop_id.clone(),
                name: row.stop_name,
                lat,
                lon,
                parent_station: Some(row.parent_station).filter(|p| !p.is_empty()),
            };
            index.stops.insert(row.stop_id, stop);
        }
        if skipped > 0 {
            warn!(skipped, "skipped stops without usable coordinates");
        }

        for row in read_table::<FeedTrip, _>(trips, "trips.txt")? {
            if row.trip_id.is_empty() {
                continue;
            }
            let direction_id = row.direction_id.parse().unwrap_or(0);
            index.trips.insert(
                row.trip_id,
                TripInfo {
                    route_id: row.route_id,
                    direction_id,
                },
            );
        }

        let mut skipped = 0usize;
        for row in read_table::<FeedStopTime, _>(stop_times, "stop_times.txt")? {
            if row.trip_id.is_empty() || row.stop_id.is_empty() {
                continue;
            }
            let Ok(seq) = row.stop_sequence.parse::<u32>() else {
                skipped += 1;
                continue;
            };
            index
                .trips_by_stop
                .entry(row.stop_id.clone())
                .or_default()
                .push(row.trip_id.clone());
            index
                .stop_times
                .entry(row.trip_id)
                .or_default()
                .push((seq, row.stop_id));
        }
        if skipped > 0 {
            warn!(skipped, "skipped stop times without a usable sequence");
        }

        for times in index.stop_times.values_mut() {
            // Stable, so equal sequences keep file order.
            times.sort_by_key(|(seq, _)| *seq);
        }

        Ok(index)
    }

    pub fn stop(&self, id: &str) -> Option<&TransitStop> {
        self.stops.get(id)
    }

    pub fn stop_count(&self) -> usize {
        self.stops.len()
    }

    pub fn trip_count(&self) -> usize {
        self.trips.len()
    }
}

impl StopIndex for GtfsIndex {
    fn nearest_stop(&self, coord: Coordinate) -> Option<(&TransitStop, f64)> {
        self.stops
            .values()
            .map(|stop| (stop, haversine_distance(coord, stop.coord())))
            .min_by(|(a, a_dist), (b, b_dist)| {
                a_dist.total_cmp(b_dist).then_with(|| a.id.cmp(&b.id))
            })
    }

    fn canonical_pattern(&self, stop_id: &str) -> Result<TripPattern, StopIndexError> {
        let trip_ids = self
            .trips_by_stop
            .get(stop_id)
            .filter(|t| !t.is_empty())
            .ok_or_else(|| StopIndexError::NoTrips(stop_id.to_string()))?;

        let mut best: Option<(&String, &Vec<(u32, String)>)> = None;
        for trip_id in trip_ids {
            let Some(times) = self.stop_times.get(trip_id) else {
                continue;
            };
            if best.is_none_or(|(_, b)| times.len() > b.len()) {
                best = Some((trip_id, times));
            }
        }
        let (trip_id, times) = best.ok_or_else(|| StopIndexError::NoTrips(stop_id.to_string()))?;

        let info = self.trips.get(trip_id).cloned().unwrap_or_default();
        Ok(TripPattern {
            trip_id: trip_id.clone(),
            route_id: info.route_id,
            direction_id: info.direction_id,
            stop_ids: times.iter().map(|(_, id)| id.clone()).collect(),
        })
    }

    fn stops_before(
        &self,
        stop_id: &str,
        pattern: &TripPattern,
    ) -> Result<Vec<TransitStop>, StopIndexError> {
        if pattern.stop_ids.is_empty() {
            return Err(StopIndexError::EmptyTrip(pattern.trip_id.clone()));
        }
        let position = pattern
            .stop_ids
            .iter()
            .position(|id| id == stop_id)
            .ok_or_else(|| StopIndexError::StopNotOnTrip {
                stop_id: stop_id.to_string(),
                trip_id: pattern.trip_id.clone(),
            })?;

        Ok(pattern.stop_ids[..position]
            .iter()
            .filter_map(|id| self.stops.get(id).cloned())
            .collect())
    }
}

//! Stop index errors.

use std::path::PathBuf;

/// Errors from loading or querying a stop index.
#[derive(Debug, thiserror::Error)]
pub enum StopIndexError {
    #[error("failed to open {path}: {source}")]
    Open {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("malformed GTFS table {table}: {source}")]
    Csv {
        table: &'static str,
        #[source]
        source: csv::Error,
    },

    #[error("no trips serve stop {0}")]
    NoTrips(String),

    #[error("trip {0} has no stop times")]
    EmptyTrip(String),

    #[error("stop {stop_id} is not on trip {trip_id}")]
    StopNotOnTrip { stop_id: String, trip_id: String },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_display() {
        let err = StopIndexError::NoTrips("S9".into());
        assert_eq!(err.to_string(), "no trips serve stop S9");

        let err = StopIndexError::StopNotOnTrip {
            stop_id: "S1".into(),
            trip_id: "T1".into(),
        };
        assert_eq!(err.to_string(), "stop S1 is not on trip T1");
    }
}

//! Data transfer objects for web requests and responses.

use serde::{Deserialize, Serialize};

use crate::domain::Coordinate;

/// Body of every `POST /route/*` request.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RouteRequest {
    pub start_lat: f64,
    pub start_lon: f64,
    pub end_lat: f64,
    pub end_lon: f64,

    /// Requested walking (or cycling) minutes; absent or 0 means the
    /// endpoint's default.
    #[serde(default)]
    pub walk_duration_mins: Option<f64>,
}

impl RouteRequest {
    /// Validated start and end coordinates.
    pub fn endpoints(&self) -> Result<(Coordinate, Coordinate), String> {
        let start =
            Coordinate::parse(self.start_lat, self.start_lon).map_err(|e| format!("start: {e}"))?;
        let end = Coordinate::parse(self.end_lat, self.end_lon).map_err(|e| format!("end: {e}"))?;
        Ok((start, end))
    }

    /// The activity budget in minutes, falling back to `default_mins`.
    pub fn budget_mins(&self, default_mins: f64) -> Result<f64, String> {
        match self.walk_duration_mins {
            None => Ok(default_mins),
            Some(m) if m == 0.0 => Ok(default_mins),
            Some(m) if m.is_finite() && m > 0.0 => Ok(m),
            Some(m) => Err(format!(
                "walkDurationMins must be a positive number, got {m}"
            )),
        }
    }
}

/// Health check response.
#[derive(Debug, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
}

/// Error response.
#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorResponse {
    /// Error message
    pub error: String,

    /// Machine-readable error kind
    pub kind: String,
}

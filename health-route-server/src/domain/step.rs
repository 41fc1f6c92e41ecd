//! Route steps and per-route faults.

use serde::Serialize;

use super::{Coordinate, StepMode};

/// One leg of a planned route.
///
/// Field names serialize in PascalCase (`Mode`, `FromCoord`, `DurationSec`...)
/// because that is what the mobile client parses. The encoded provider
/// polyline, when present, is emitted as lowercase `polyline`.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct RouteStep {
    pub mode: StepMode,
    pub from_coord: Coordinate,
    pub to_coord: Coordinate,
    pub duration_sec: f64,
    pub distance_m: f64,
    pub description: String,
    #[serde(rename = "polyline", skip_serializing_if = "Option::is_none")]
    pub polyline: Option<String>,
}

impl RouteStep {
    pub fn new(
        mode: StepMode,
        from_coord: Coordinate,
        to_coord: Coordinate,
        duration_sec: f64,
        distance_m: f64,
        description: impl Into<String>,
    ) -> Self {
        Self {
            mode,
            from_coord,
            to_coord,
            duration_sec,
            distance_m,
            description: description.into(),
            polyline: None,
        }
    }

    /// Attach an encoded polyline.
    pub fn with_polyline(mut self, polyline: impl Into<String>) -> Self {
        self.polyline = Some(polyline.into());
        self
    }
}

/// A leg the planner meant to produce but could not.
///
/// Attached to a route instead of silently dropping the leg, so a caller can
/// tell an incomplete route from a complete one.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RouteFault {
    /// Mode of the missing leg
    pub mode: StepMode,
    /// Machine-readable failure kind
    pub kind: &'static str,
    /// Human-readable reason
    pub message: String,
}

impl RouteFault {
    pub fn new(mode: StepMode, kind: &'static str, message: impl Into<String>) -> Self {
        Self {
            mode,
            kind,
            message: message.into(),
        }
    }
}

//! Google Directions API response DTOs.
//!
//! These types map directly to the Directions JSON API. Fields the API
//! omits for some travel modes are optional or defaulted.

use serde::{Deserialize, Serialize};

/// Top-level Directions API response.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct DirectionsResponse {
    /// `OK`, `ZERO_RESULTS`, `REQUEST_DENIED`, ...
    pub status: String,

    /// Present when `status` is not `OK`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error_message: Option<String>,

    /// Candidate routes, best first.
    #[serde(default)]
    pub routes: Vec<Route>,
}

/// One complete itinerary.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct Route {
    #[serde(default)]
    pub summary: String,

    #[serde(default)]
    pub legs: Vec<Leg>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub overview_polyline: Option<Polyline>,
}

/// Travel between two waypoints. Requests without waypoints have one leg.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct Leg {
    #[serde(default)]
    pub steps: Vec<Step>,

    #[serde(default)]
    pub duration: TextValue,

    #[serde(default)]
    pub distance: TextValue,

    #[serde(default)]
    pub start_location: LatLng,

    #[serde(default)]
    pub end_location: LatLng,
}

/// A single instruction within a leg.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct Step {
    /// `WALKING`, `TRANSIT`, `DRIVING`, `BICYCLING`.
    pub travel_mode: String,

    #[serde(default)]
    pub duration: TextValue,

    #[serde(default)]
    pub distance: TextValue,

    #[serde(default)]
    pub start_location: LatLng,

    #[serde(default)]
    pub end_location: LatLng,

    /// Instruction text with embedded HTML markup.
    #[serde(default)]
    pub html_instructions: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub polyline: Option<Polyline>,

    /// Only present on `TRANSIT` steps.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub transit_details: Option<TransitDetails>,
}

/// A numeric value with its display text, e.g. `{"value": 420, "text": "7 mins"}`.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct TextValue {
    #[serde(default)]
    pub value: f64,

    #[serde(default)]
    pub text: String,
}

#[derive(Debug, Clone, Copy, Default, Deserialize, Serialize)]
pub struct LatLng {
    pub lat: f64,
    pub lng: f64,
}

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct Polyline {
    pub points: String,
}

/// Vehicle, line, and stops of a transit step.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct TransitDetails {
    #[serde(default)]
    pub departure_stop: TransitStopRef,

    #[serde(default)]
    pub arrival_stop: TransitStopRef,

    #[serde(default)]
    pub line: TransitLine,

    #[serde(default)]
    pub num_stops: u32,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub headsign: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct TransitStopRef {
    #[serde(default)]
    pub name: String,

    #[serde(default)]
    pub location: LatLng,
}

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct TransitLine {
    #[serde(default)]
    pub name: String,

    #[serde(default)]
    pub short_name: String,

    #[serde(default)]
    pub vehicle: Vehicle,
}

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct Vehicle {
    /// Display name, e.g. "Subway" or "Bus".
    #[serde(default)]
    pub name: String,

    /// Vehicle class, e.g. `SUBWAY`, `BUS`.
    #[serde(default, rename = "type")]
    pub kind: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_transit_step() {
        let json = r#"{
            "status": "OK",
            "routes": [{
                "legs": [{
                    "steps": [{
                        "travel_mode": "TRANSIT",
                        "duration": {"value": 600, "text": "10 mins"},
                        "distance": {"value": 5000, "text": "5.0 km"},
                        "start_location": {"lat": 45.50, "lng": -73.57},
                        "end_location": {"lat": 45.52, "lng": -73.58},
                        "html_instructions": "Subway towards Montmorency",
                        "polyline": {"points": "abc"},
                        "transit_details": {
                            "departure_stop": {"name": "Berri-UQAM", "location": {"lat": 45.515, "lng": -73.561}},
                            "arrival_stop": {"name": "Jean-Talon", "location": {"lat": 45.539, "lng": -73.614}},
                            "line": {"name": "Ligne 2 - Orange", "short_name": "2", "vehicle": {"name": "Subway", "type": "SUBWAY"}},
                            "num_stops": 7
                        }
                    }]
                }]
            }]
        }"#;
        let resp: DirectionsResponse = serde_json::from_str(json).unwrap();
        assert_eq!(resp.status, "OK");

        let step = &resp.routes[0].legs[0].steps[0];
        assert_eq!(step.travel_mode, "TRANSIT");
        assert_eq!(step.duration.value, 600.0);

        let details = step.transit_details.as_ref().unwrap();
        assert_eq!(details.arrival_stop.name, "Jean-Talon");
        assert_eq!(details.line.vehicle.kind, "SUBWAY");
        assert_eq!(details.num_stops, 7);
    }

    #[test]
    fn error_response_has_no_routes() {
        let json = r#"{"status": "REQUEST_DENIED", "error_message": "bad key", "routes": []}"#;
        let resp: DirectionsResponse = serde_json::from_str(json).unwrap();
        assert_eq!(resp.status, "REQUEST_DENIED");
        assert_eq!(resp.error_message.as_deref(), Some("bad key"));
        assert!(resp.routes.is_empty());
    }
}

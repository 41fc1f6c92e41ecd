//! Third-party directions provider.
//!
//! Transit routing is delegated to the Google Directions API. Planners
//! depend only on the [`DirectionsProvider`] trait so they can run against
//! the live client, the file-backed mock, or a test double.

mod client;
mod convert;
mod error;
mod mock;
pub mod types;

use std::future::Future;

use chrono::{DateTime, Utc};

use crate::domain::{Coordinate, RouteStep, TravelMode};

pub use client::{DirectionsConfig, GoogleDirectionsClient, best_route_steps};
pub use convert::{convert_route, convert_step, strip_html_tags};
pub use error::DirectionsError;
pub use mock::MockDirectionsClient;

/// Walking budgets below this many minutes ask the provider for
/// less-walking itineraries.
pub const LESS_WALKING_THRESHOLD_MINS: f64 = 30.0;

/// A directions query.
#[derive(Debug, Clone, PartialEq)]
pub struct DirectionsRequest {
    pub origin: Coordinate,
    pub destination: Coordinate,
    pub mode: TravelMode,
    /// Departure time; `None` means "now".
    pub departure: Option<DateTime<Utc>>,
    /// Ask the provider to minimize walking.
    pub less_walking: bool,
}

impl DirectionsRequest {
    /// A transit query departing now.
    pub fn transit(origin: Coordinate, destination: Coordinate) -> Self {
        Self {
            origin,
            destination,
            mode: TravelMode::Transit,
            departure: None,
            less_walking: false,
        }
    }

    /// Depart at the given instant.
    pub fn departing_at(mut self, departure: DateTime<Utc>) -> Self {
        self.departure = Some(departure);
        self
    }

    /// Prefer less walking when the caller's walking budget is short.
    pub fn with_walk_budget(mut self, walk_budget_mins: f64) -> Self {
        self.less_walking =
            walk_budget_mins > 0.0 && walk_budget_mins < LESS_WALKING_THRESHOLD_MINS;
        self
    }

    /// Query parameters, excluding the API key.
    pub fn query_params(&self) -> Vec<(&'static str, String)> {
        let mode = match self.mode {
            TravelMode::Walk => "walking",
            TravelMode::Bike => "bicycling",
            TravelMode::Car => "driving",
            TravelMode::Transit => "transit",
        };
        let departure = self
            .departure
            .map_or_else(|| "now".to_string(), |t| t.timestamp().to_string());

        let mut params = vec![
            ("origin", self.origin.to_string()),
            ("destination", self.destination.to_string()),
            ("mode", mode.to_string()),
            ("alternatives", "true".to_string()),
            ("units", "metric".to_string()),
            ("departure_time", departure),
        ];
        if self.less_walking {
            params.push(("transit_routing_preference", "less_walking".to_string()));
        }
        params
    }
}

/// Source of third-party itineraries.
pub trait DirectionsProvider {
    /// Steps of the provider's best route for `request`.
    fn directions(
        &self,
        request: &DirectionsRequest,
    ) -> impl Future<Output = Result<Vec<RouteStep>, DirectionsError>> + Send;
}

/// The provider selected at startup.
#[derive(Debug, Clone)]
pub enum DirectionsBackend {
    Google(GoogleDirectionsClient),
    Mock(MockDirectionsClient),
}

impl DirectionsProvider for DirectionsBackend {
    async fn directions(
        &self,
        request: &DirectionsRequest,
    ) -> Result<Vec<RouteStep>, DirectionsError> {
        match self {
            DirectionsBackend::Google(client) => client.directions(request).await,
            DirectionsBackend::Mock(client) => client.directions(request).await,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn param<'a>(params: &'a [(&'static str, String)], key: &str) -> Option<&'a str> {
        params
            .iter()
            .find(|(k, _)| *k == key)
            .map(|(_, v)| v.as_str())
    }

    #[test]
    fn transit_query_params() {
        let request =
            DirectionsRequest::transit(Coordinate::new(45.5, -73.6), Coordinate::new(45.51, -73.58));
        let params = request.query_params();

        assert_eq!(param(&params, "origin"), Some("45.500000,-73.600000"));
        assert_eq!(param(&params, "destination"), Some("45.510000,-73.580000"));
        assert_eq!(param(&params, "mode"), Some("transit"));
        assert_eq!(param(&params, "alternatives"), Some("true"));
        assert_eq!(param(&params, "units"), Some("metric"));
        assert_eq!(param(&params, "departure_time"), Some("now"));
        assert_eq!(param(&params, "transit_routing_preference"), None);
        assert_eq!(param(&params, "key"), None);
    }

    #[test]
    fn explicit_departure_is_unix_seconds() {
        let at = Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap();
        let params = DirectionsRequest::transit(Coordinate::default(), Coordinate::default())
            .departing_at(at)
            .query_params();
        assert_eq!(param(&params, "departure_time"), Some("1704067200"));
    }

    #[test]
    fn short_walk_budget_prefers_less_walking() {
        let base = DirectionsRequest::transit(Coordinate::default(), Coordinate::default());

        assert!(base.clone().with_walk_budget(15.0).less_walking);
        assert!(!base.clone().with_walk_budget(30.0).less_walking);
        assert!(!base.clone().with_walk_budget(0.0).less_walking);

        let params = base.with_walk_budget(10.0).query_params();
        assert_eq!(
            param(&params, "transit_routing_preference"),
            Some("less_walking")
        );
    }
}

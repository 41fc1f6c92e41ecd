//! Mock directions provider for running without API access.
//!
//! Serves one canned Directions API response, loaded from a JSON file,
//! for every request. The response goes through the same status checks
//! and conversion as a live one.

use std::path::Path;
use std::sync::Arc;

use tracing::info;

use crate::domain::RouteStep;

use super::client::best_route_steps;
use super::error::DirectionsError;
use super::types::DirectionsResponse;
use super::{DirectionsProvider, DirectionsRequest};

/// Directions provider that answers from a fixed response.
#[derive(Debug, Clone)]
pub struct MockDirectionsClient {
    response: Arc<DirectionsResponse>,
}

impl MockDirectionsClient {
    /// Load a Directions API response saved as JSON.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, DirectionsError> {
        let path = path.as_ref();
        let json = std::fs::read_to_string(path).map_err(|e| {
            DirectionsError::MockData(format!("failed to read {}: {e}", path.display()))
        })?;
        let client = Self::from_json(&json)?;
        info!(path = %path.display(), "loaded mock directions");
        Ok(client)
    }

    /// Parse a Directions API response from a JSON string.
    pub fn from_json(json: &str) -> Result<Self, DirectionsError> {
        let response: DirectionsResponse =
            serde_json::from_str(json).map_err(|e| DirectionsError::Json {
                message: e.to_string(),
                body: Some(json.chars().take(500).collect()),
            })?;
        Ok(Self::from_response(response))
    }

    pub fn from_response(response: DirectionsResponse) -> Self {
        Self {
            response: Arc::new(response),
        }
    }
}

impl DirectionsProvider for MockDirectionsClient {
    async fn directions(
        &self,
        request: &DirectionsRequest,
    ) -> Result<Vec<RouteStep>, DirectionsError> {
        best_route_steps(&self.response, request)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{Coordinate, StepMode};
    use std::io::Write;

    const WALK_ONLY: &str = r#"{
        "status": "OK",
        "routes": [{"legs": [{"steps": [
            {"travel_mode": "WALKING", "duration": {"value": 300}, "distance": {"value": 400},
             "html_instructions": "Head <b>north</b>"}
        ]}]}]
    }"#;

    #[tokio::test]
    async fn serves_canned_route() {
        let client = MockDirectionsClient::from_json(WALK_ONLY).unwrap();
        let request =
            DirectionsRequest::transit(Coordinate::new(1.0, 1.0), Coordinate::new(2.0, 2.0));
        let steps = client.directions(&request).await.unwrap();

        assert_eq!(steps.len(), 1);
        assert_eq!(steps[0].mode, StepMode::Walk);
        assert_eq!(steps[0].from_coord, Coordinate::new(1.0, 1.0));
        assert_eq!(steps[0].to_coord, Coordinate::new(2.0, 2.0));
    }

    #[tokio::test]
    async fn canned_error_status() {
        let client =
            MockDirectionsClient::from_json(r#"{"status": "ZERO_RESULTS", "routes": []}"#).unwrap();
        let request =
            DirectionsRequest::transit(Coordinate::new(1.0, 1.0), Coordinate::new(2.0, 2.0));
        assert!(matches!(
            client.directions(&request).await,
            Err(DirectionsError::NoRoutes)
        ));
    }

    #[test]
    fn loads_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(WALK_ONLY.as_bytes()).unwrap();
        assert!(MockDirectionsClient::from_file(file.path()).is_ok());
    }

    #[test]
    fn rejects_bad_json() {
        assert!(matches!(
            MockDirectionsClient::from_json("not json"),
            Err(DirectionsError::Json { .. })
        ));
        assert!(matches!(
            MockDirectionsClient::from_file("/nonexistent/mock.json"),
            Err(DirectionsError::MockData(_))
        ));
    }
}

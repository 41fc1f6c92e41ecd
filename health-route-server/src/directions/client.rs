//! Google Directions HTTP client.
//!
//! Fetches itineraries from the Directions JSON API and converts the best
//! route into domain steps. Concurrent requests are bounded by a semaphore.

use std::sync::Arc;

use tokio::sync::Semaphore;
use tracing::{debug, info, warn};

use crate::domain::RouteStep;

use super::convert::convert_route;
use super::error::DirectionsError;
use super::types::DirectionsResponse;
use super::{DirectionsProvider, DirectionsRequest};

/// Default endpoint of the Directions JSON API.
const DEFAULT_BASE_URL: &str = "https://maps.googleapis.com/maps/api/directions/json";

/// Default maximum concurrent requests.
const DEFAULT_MAX_CONCURRENT: usize = 5;

/// Configuration for the directions client.
#[derive(Debug, Clone)]
pub struct DirectionsConfig {
    /// API key for authentication
    pub api_key: String,
    /// Endpoint URL (defaults to the production API)
    pub base_url: String,
    /// Maximum concurrent requests
    pub max_concurrent: usize,
    /// Request timeout in seconds
    pub timeout_secs: u64,
}

impl DirectionsConfig {
    /// Create a new config with the given API key.
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
            base_url: DEFAULT_BASE_URL.to_string(),
            max_concurrent: DEFAULT_MAX_CONCURRENT,
            timeout_secs: 30,
        }
    }

    /// Set a custom base URL (for testing).
    pub fn with_base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = url.into();
        self
    }

    /// Set maximum concurrent requests.
    pub fn with_max_concurrent(mut self, n: usize) -> Self {
        self.max_concurrent = n;
        self
    }

    /// Set request timeout.
    pub fn with_timeout(mut self, secs: u64) -> Self {
        self.timeout_secs = secs;
        self
    }
}

/// Google Directions API client.
#[derive(Debug, Clone)]
pub struct GoogleDirectionsClient {
    http: reqwest::Client,
    base_url: String,
    api_key: String,
    semaphore: Arc<Semaphore>,
}

impl GoogleDirectionsClient {
    /// Create a new client with the given configuration.
    pub fn new(config: DirectionsConfig) -> Result<Self, DirectionsError> {
        let http = reqwest::Client::builder()
            .timeout(std::time::Duration::from_secs(config.timeout_secs))
            .build()?;

        Ok(Self {
            http,
            base_url: config.base_url,
            api_key: config.api_key,
            semaphore: Arc::new(Semaphore::new(config.max_concurrent.max(1))),
        })
    }

    /// Fetch the raw provider response for `request`.
    ///
    /// HTTP-level failures are errors; a body with a non-`OK` status is
    /// returned as-is and checked by [`best_route_steps`].
    pub async fn fetch(
        &self,
        request: &DirectionsRequest,
    ) -> Result<DirectionsResponse, DirectionsError> {
        let _permit = self
            .semaphore
            .acquire()
            .await
            .map_err(|_| DirectionsError::ApiError {
                status: 0,
                message: "Semaphore closed".to_string(),
            })?;

        let mut query = request.query_params();
        query.push(("key", self.api_key.clone()));

        debug!(
            origin = %request.origin,
            destination = %request.destination,
            mode = %request.mode,
            "requesting directions"
        );

        let response = self.http.get(&self.base_url).query(&query).send().await?;

        let status = response.status();

        if status == reqwest::StatusCode::UNAUTHORIZED || status == reqwest::StatusCode::FORBIDDEN
        {
            return Err(DirectionsError::Unauthorized);
        }

        if status == reqwest::StatusCode::TOO_MANY_REQUESTS {
            return Err(DirectionsError::RateLimited);
        }

        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(DirectionsError::ApiError {
                status: status.as_u16(),
                message: body,
            });
        }

        let body = response.text().await?;

        serde_json::from_str(&body).map_err(|e| DirectionsError::Json {
            message: e.to_string(),
            body: Some(body.chars().take(500).collect()),
        })
    }
}

impl DirectionsProvider for GoogleDirectionsClient {
    async fn directions(
        &self,
        request: &DirectionsRequest,
    ) -> Result<Vec<RouteStep>, DirectionsError> {
        let response = self.fetch(request).await?;
        best_route_steps(&response, request)
    }
}

/// Check the body status and convert the first route.
pub fn best_route_steps(
    response: &DirectionsResponse,
    request: &DirectionsRequest,
) -> Result<Vec<RouteStep>, DirectionsError> {
    if response.status != "OK" {
        warn!(
            status = %response.status,
            message = response.error_message.as_deref().unwrap_or(""),
            "directions API returned an error status"
        );
        return Err(DirectionsError::from_status(
            &response.status,
            response.error_message.clone(),
        ));
    }

    let route = response.routes.first().ok_or(DirectionsError::NoRoutes)?;
    let steps = convert_route(route, request.origin, request.destination);

    info!(
        routes = response.routes.len(),
        steps = steps.len(),
        "directions received"
    );
    Ok(steps)
}

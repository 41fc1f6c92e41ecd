//! HTTP route handlers.

use std::sync::Arc;

use axum::body::Bytes;
use axum::{
    Json, Router,
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
};
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use tracing::{error, info, warn};

use crate::domain::{Coordinate, RouteFault, StepMode};
use crate::planner::{
    DriveWalkPlanner, EarlierStopPlanner, PlanError, PlannedRoute, plan_drive_bike,
    plan_transit, plan_transit_bike,
};
use crate::response::{RouteResponse, prepare_response};
use crate::search::SearchError;

use super::dto::*;
use super::state::AppState;

/// Create the application router.
pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health))
        .route("/route/car-walk", post(car_walk))
        .route("/route/car-bike", post(car_bike))
        .route("/route/transit", post(transit))
        .route("/route/transit-walk", post(transit_walk))
        .route("/route/transit-bike", post(transit_bike))
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state)
}

/// Health check endpoint.
async fn health() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "healthy".to_string(),
    })
}

/// Parse and validate a route request body.
///
/// Malformed bodies are logged and answered with a JSON error.
fn parse_request(
    body: &Bytes,
    default_mins: f64,
) -> Result<(Coordinate, Coordinate, f64), AppError> {
    let req: RouteRequest = serde_json::from_slice(body).map_err(|e| {
        warn!(error = %e, body = %String::from_utf8_lossy(body), "invalid route request");
        AppError::BadRequest {
            message: format!("Invalid JSON: {e}"),
        }
    })?;
    let (start, end) = req
        .endpoints()
        .map_err(|message| AppError::BadRequest { message })?;
    let budget = req
        .budget_mins(default_mins)
        .map_err(|message| AppError::BadRequest { message })?;
    info!(%start, %end, budget_mins = budget, "route request");
    Ok((start, end, budget))
}

fn respond(endpoint: &'static str, route: PlannedRoute) -> Json<RouteResponse> {
    let resp = prepare_response(route);
    info!(
        endpoint,
        steps = resp.steps.len(),
        faults = resp.faults.len(),
        car_or_transit_start = %resp.car_or_transit_start,
        walk_start = %resp.walk_start,
        walk_end = %resp.walk_end,
        walk_duration_sec = resp.walk_duration_sec,
        "sending route"
    );
    Json(resp)
}

/// Run a graph-only planner off the async runtime.
async fn plan_blocking<F>(state: AppState, plan: F) -> Result<PlannedRoute, AppError>
where
    F: FnOnce(&AppState) -> Result<PlannedRoute, PlanError> + Send + 'static,
{
    tokio::task::spawn_blocking(move || plan(&state))
        .await
        .map_err(|e| AppError::Internal {
            message: format!("planner task failed: {e}"),
        })?
        .map_err(AppError::from)
}

/// Drive, then walk the last stretch.
async fn car_walk(State(state): State<AppState>, body: Bytes) -> Result<Response, AppError> {
    let (start, end, budget) = parse_request(&body, state.config.car_walk_default_mins)?;
    let route = plan_blocking(state, move |s| {
        DriveWalkPlanner::new(&s.walk, &s.car, &s.config).plan(start, end, budget)
    })
    .await?;
    Ok(respond("car-walk", route).into_response())
}

/// Drive, then cycle the last stretch.
async fn car_bike(State(state): State<AppState>, body: Bytes) -> Result<Response, AppError> {
    let (start, end, budget) = parse_request(&body, state.config.car_walk_default_mins)?;
    let route = plan_blocking(state, move |s| {
        let planner = DriveWalkPlanner::new(&s.walk, &s.car, &s.config);
        plan_drive_bike(&planner, start, end, budget)
    })
    .await?;
    Ok(respond("car-bike", route).into_response())
}

/// The provider's transit itinerary with walking steps tagged.
async fn transit(State(state): State<AppState>, body: Bytes) -> Result<Response, AppError> {
    let (start, end, budget) = parse_request(&body, state.config.transit_walk_default_mins)?;
    let route = plan_transit(state.directions.as_ref(), start, end, budget).await?;
    Ok(respond("transit", route).into_response())
}

/// Transit to an earlier stop, then walk.
///
/// Falls back to the plain transit route with a fault when the stop index
/// cannot place an earlier stop.
async fn transit_walk(State(state): State<AppState>, body: Bytes) -> Result<Response, AppError> {
    let (start, end, budget) = parse_request(&body, state.config.transit_walk_default_mins)?;

    let route = match &state.stops {
        Some(stops) => {
            EarlierStopPlanner::new(
                state.directions.as_ref(),
                Arc::clone(stops),
                Arc::clone(&state.walk),
                Arc::clone(&state.config),
            )
            .plan_or_baseline(start, end, budget)
            .await?
        }
        None => {
            let mut route = plan_transit(state.directions.as_ref(), start, end, budget).await?;
            let e = PlanError::StopsUnavailable;
            warn!("no stop index loaded, returning provider route");
            route
                .faults
                .push(RouteFault::new(StepMode::WalkFromTransit, e.kind(), e.to_string()));
            route
        }
    };
    Ok(respond("transit-walk", route).into_response())
}

/// Transit to an earlier stop, then cycle.
async fn transit_bike(State(state): State<AppState>, body: Bytes) -> Result<Response, AppError> {
    let (start, end, budget) = parse_request(&body, state.config.transit_walk_default_mins)?;
    let stops = state.stops.as_ref().ok_or(PlanError::StopsUnavailable)?;
    let planner = EarlierStopPlanner::new(
        state.directions.as_ref(),
        Arc::clone(stops),
        Arc::clone(&state.walk),
        Arc::clone(&state.config),
    );
    let route = plan_transit_bike(&planner, start, end, budget).await?;
    Ok(respond("transit-bike", route).into_response())
}

/// Application error type.
#[derive(Debug)]
pub enum AppError {
    BadRequest { message: String },
    Plan(PlanError),
    Internal { message: String },
}

impl From<PlanError> for AppError {
    fn from(e: PlanError) -> Self {
        AppError::Plan(e)
    }
}

fn plan_status(e: &PlanError) -> StatusCode {
    match e {
        PlanError::NoPath {
            source: SearchError::DeadlineExceeded,
            ..
        } => StatusCode::SERVICE_UNAVAILABLE,
        PlanError::NoPath { .. } => StatusCode::NOT_FOUND,
        PlanError::InfeasibleBudget { .. }
        | PlanError::NoTransitLeg
        | PlanError::StopUnresolved
        | PlanError::TripPatternUnresolved { .. }
        | PlanError::NoPrecedingStops(_)
        | PlanError::NoWalkableStop => StatusCode::UNPROCESSABLE_ENTITY,
        PlanError::Directions(_) => StatusCode::BAD_GATEWAY,
        PlanError::EmptyGraph(_) | PlanError::StopsUnavailable => StatusCode::SERVICE_UNAVAILABLE,
        PlanError::TaskFailed(_) => StatusCode::INTERNAL_SERVER_ERROR,
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, kind, message) = match &self {
            AppError::BadRequest { message } => {
                (StatusCode::BAD_REQUEST, "bad_request", message.clone())
            }
            AppError::Plan(e) => (plan_status(e), e.kind(), e.to_string()),
            AppError::Internal { message } => {
                (StatusCode::INTERNAL_SERVER_ERROR, "internal", message.clone())
            }
        };

        if status.is_server_error() {
            error!(%status, kind, %message, "request failed");
        } else {
            warn!(%status, kind, %message, "request rejected");
        }

        let body = Json(ErrorResponse {
            error: message,
            kind: kind.to_string(),
        });
        (status, body).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::Body;
    use axum::http::Request;
    use tower::ServiceExt;

    use crate::directions::DirectionsBackend;
    use crate::domain::TravelMode;
    use crate::graph::{Graph, GraphBuilder};
    use crate::planner::{PlannerConfig, drive_fixtures, transit_fixtures};
    use crate::transit::{GtfsIndex, gtfs_fixtures};

    fn state(walk: Graph, car: Graph, stops: Option<GtfsIndex>) -> AppState {
        AppState::new(
            walk,
            car,
            stops,
            DirectionsBackend::Mock(transit_fixtures::directions()),
            PlannerConfig::default(),
        )
    }

    fn drive_state() -> AppState {
        state(drive_fixtures::walk_graph(), drive_fixtures::car_graph(), None)
    }

    fn transit_state(stops: Option<GtfsIndex>) -> AppState {
        let car = GraphBuilder::new(TravelMode::Car).build().unwrap();
        state(transit_fixtures::walk_graph(), car, stops)
    }

    fn body(start: Coordinate, end: Coordinate, mins: Option<f64>) -> String {
        let mut json = serde_json::json!({
            "startLat": start.lat,
            "startLon": start.lon,
            "endLat": end.lat,
            "endLon": end.lon,
        });
        if let Some(m) = mins {
            json["walkDurationMins"] = serde_json::json!(m);
        }
        json.to_string()
    }

    async fn post_json(
        state: AppState,
        uri: &str,
        body: String,
    ) -> (StatusCode, serde_json::Value) {
        let request = Request::builder()
            .method("POST")
            .uri(uri)
            .header("content-type", "application/json")
            .body(Body::from(body))
            .unwrap();
        let response = create_router(state).oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        (status, serde_json::from_slice(&bytes).unwrap())
    }

    #[tokio::test]
    async fn health_check() {
        let request = Request::builder().uri("/health").body(Body::empty()).unwrap();
        let response = create_router(drive_state()).oneshot(request).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);

        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        let json: serde_json::Value = serde_json::from_slice(&bytes).unwrap();
        assert_eq!(json, serde_json::json!({"status": "healthy"}));
    }

    #[tokio::test]
    async fn car_walk_route() {
        let (status, json) = post_json(
            drive_state(),
            "/route/car-walk",
            body(drive_fixtures::ORIGIN, drive_fixtures::DESTINATION, Some(10.0)),
        )
        .await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(json["steps"].as_array().unwrap().len(), 2);
        assert_eq!(json["steps"][0]["Mode"], "car");
        assert_eq!(json["steps"][1]["Mode"], "walk_final");
        assert_eq!(json["walkDurationSec"], 480.0);
        assert_eq!(json["walkDistanceM"], 672.0);
        assert_eq!(json["carDistanceM"], 2780.0);
        assert_eq!(json["caloriesBurned"], 33);
        assert!(json.get("faults").is_none());
    }

    #[tokio::test]
    async fn car_walk_default_budget() {
        // 20 minutes by default, so the 12 minute start wins.
        let (status, json) = post_json(
            drive_state(),
            "/route/car-walk",
            body(drive_fixtures::ORIGIN, drive_fixtures::DESTINATION, Some(0.0)),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(json["walkDurationSec"], 720.0);
    }

    #[tokio::test]
    async fn car_bike_route() {
        let (status, json) = post_json(
            drive_state(),
            "/route/car-bike",
            body(drive_fixtures::ORIGIN, drive_fixtures::DESTINATION, Some(3.0)),
        )
        .await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(json["steps"][1]["Mode"], "bike_final");
        assert_eq!(json["walkDistanceM"], 0.0);
    }

    #[tokio::test]
    async fn bad_json_is_rejected() {
        let (status, json) = post_json(drive_state(), "/route/car-walk", "{not json".into()).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(json["kind"], "bad_request");
    }

    #[tokio::test]
    async fn invalid_coordinates_are_rejected() {
        let bad = Coordinate {
            lat: 123.0,
            lon: 0.0,
        };
        let (status, _) = post_json(
            drive_state(),
            "/route/car-walk",
            body(bad, drive_fixtures::DESTINATION, None),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn negative_budget_is_rejected() {
        let (status, _) = post_json(
            drive_state(),
            "/route/car-walk",
            body(drive_fixtures::ORIGIN, drive_fixtures::DESTINATION, Some(-3.0)),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn infeasible_budget_is_unprocessable() {
        let (status, json) = post_json(
            drive_state(),
            "/route/car-walk",
            body(drive_fixtures::ORIGIN, drive_fixtures::DESTINATION, Some(1.0)),
        )
        .await;
        assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
        assert_eq!(json["kind"], "infeasible_budget");
    }

    #[tokio::test]
    async fn plain_transit_route() {
        let (status, json) = post_json(
            transit_state(None),
            "/route/transit",
            body(transit_fixtures::ORIGIN, transit_fixtures::DESTINATION, None),
        )
        .await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(json["steps"][0]["Mode"], "walk_to_transit");
        assert_eq!(json["steps"][1]["Mode"], "transit");
        assert_eq!(json["steps"][2]["Mode"], "walk_from_transit");
        assert_eq!(json["walkDurationSec"], 300.0);
        assert_eq!(json["carOrTransitStart"]["Lat"], 45.5);
    }

    #[tokio::test]
    async fn earlier_stop_route() {
        let (status, json) = post_json(
            transit_state(Some(gtfs_fixtures::index())),
            "/route/transit-walk",
            body(transit_fixtures::ORIGIN, transit_fixtures::DESTINATION, None),
        )
        .await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(json["steps"][2]["Mode"], "walk_from_transit");
        assert_eq!(json["steps"][2]["DurationSec"], 660.0);
        assert!(json.get("faults").is_none());
    }

    #[tokio::test]
    async fn earlier_stop_without_index_degrades() {
        let (status, json) = post_json(
            transit_state(None),
            "/route/transit-walk",
            body(transit_fixtures::ORIGIN, transit_fixtures::DESTINATION, None),
        )
        .await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(json["steps"].as_array().unwrap().len(), 3);
        assert_eq!(json["faults"][0]["kind"], "stops_unavailable");
    }

    #[tokio::test]
    async fn transit_bike_needs_index() {
        let (status, json) = post_json(
            transit_state(None),
            "/route/transit-bike",
            body(transit_fixtures::ORIGIN, transit_fixtures::DESTINATION, None),
        )
        .await;
        assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);
        assert_eq!(json["kind"], "stops_unavailable");
    }

    #[tokio::test]
    async fn transit_bike_route() {
        let (status, json) = post_json(
            transit_state(Some(gtfs_fixtures::index())),
            "/route/transit-bike",
            body(transit_fixtures::ORIGIN, transit_fixtures::DESTINATION, Some(4.0)),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(json["steps"][0]["Mode"], "bike_to_transit");
        assert_eq!(json["steps"][2]["Mode"], "bike_from_transit");
    }

    #[tokio::test]
    async fn provider_failure_is_bad_gateway() {
        let failing = crate::directions::MockDirectionsClient::from_json(
            r#"{"status": "REQUEST_DENIED", "error_message": "bad key"}"#,
        )
        .unwrap();
        let mut state = transit_state(None);
        state.directions = Arc::new(DirectionsBackend::Mock(failing));

        let (status, json) = post_json(
            state,
            "/route/transit",
            body(transit_fixtures::ORIGIN, transit_fixtures::DESTINATION, None),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_GATEWAY);
        assert_eq!(json["kind"], "directions_error");
    }
}

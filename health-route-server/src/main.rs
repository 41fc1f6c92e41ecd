use std::error::Error;

use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use health_route_server::config::{DirectionsSource, ServerConfig};
use health_route_server::directions::{
    DirectionsBackend, DirectionsConfig, GoogleDirectionsClient, MockDirectionsClient,
};
use health_route_server::domain::TravelMode;
use health_route_server::graph::codec;
use health_route_server::planner::PlannerConfig;
use health_route_server::transit::GtfsIndex;
use health_route_server::web::{AppState, create_router};

#[tokio::main]
async fn main() -> Result<(), Box<dyn Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("health_route_server=info,tower_http=info")),
        )
        .init();

    let config = ServerConfig::from_env()?;

    let car = codec::load(config.car_graph_path(), TravelMode::Car)?;
    let walk = codec::load(config.walk_graph_path(), TravelMode::Walk)?;
    info!(
        car_nodes = car.node_count(),
        walk_nodes = walk.node_count(),
        "graphs ready"
    );

    // A missing or broken feed only disables earlier-stop planning.
    let stops = match &config.gtfs_dir {
        Some(dir) => match GtfsIndex::load(dir) {
            Ok(index) => Some(index),
            Err(e) => {
                warn!(error = %e, "failed to load GTFS index");
                None
            }
        },
        None => {
            warn!("GTFS_DIR not set, earlier-stop planning disabled");
            None
        }
    };

    let directions = match &config.directions {
        DirectionsSource::Google { api_key } => DirectionsBackend::Google(
            GoogleDirectionsClient::new(DirectionsConfig::new(api_key.as_str()))?,
        ),
        DirectionsSource::MockFile(path) => {
            warn!(path = %path.display(), "serving mock directions");
            DirectionsBackend::Mock(MockDirectionsClient::from_file(path)?)
        }
    };

    let planner_config = PlannerConfig {
        search_timeout_ms: config.search_timeout_ms,
        ..PlannerConfig::default()
    };

    let state = AppState::new(walk, car, stops, directions, planner_config);
    let app = create_router(state);

    let listener = tokio::net::TcpListener::bind(config.bind_addr).await?;
    info!(addr = %config.bind_addr, "health route server listening");
    info!("POST /route/{{car-walk,car-bike,transit,transit-walk,transit-bike}}, GET /health");

    axum::serve(listener, app).await?;
    Ok(())
}

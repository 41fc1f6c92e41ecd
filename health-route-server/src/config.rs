//! Server configuration from the environment.

use std::net::SocketAddr;
use std::path::PathBuf;

use thiserror::Error;

/// Errors reading the server configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid value for {var}: {value:?} ({reason})")]
    Invalid {
        var: &'static str,
        value: String,
        reason: String,
    },

    #[error("no directions provider: set GOOGLE_MAPS_API_KEY or MOCK_DIRECTIONS_FILE")]
    NoDirectionsProvider,
}

/// Where directions come from.
#[derive(Debug, Clone, PartialEq)]
pub enum DirectionsSource {
    /// Live Google Directions API.
    Google { api_key: String },
    /// A saved response served for every request.
    MockFile(PathBuf),
}

/// Everything `main` needs to start the server.
#[derive(Debug, Clone, PartialEq)]
pub struct ServerConfig {
    pub bind_addr: SocketAddr,
    /// Holds `car_graph.bin` and `walk_graph.bin`.
    pub graph_dir: PathBuf,
    /// GTFS feed for the earlier-stop planners; those endpoints are
    /// unavailable without it.
    pub gtfs_dir: Option<PathBuf>,
    pub directions: DirectionsSource,
    pub search_timeout_ms: u64,
}

impl ServerConfig {
    pub const DEFAULT_BIND_ADDR: &'static str = "127.0.0.1:8080";
    pub const DEFAULT_GRAPH_DIR: &'static str = "data";
    pub const DEFAULT_SEARCH_TIMEOUT_MS: u64 = 5_000;

    pub const CAR_GRAPH_FILE: &'static str = "car_graph.bin";
    pub const WALK_GRAPH_FILE: &'static str = "walk_graph.bin";

    /// Read the configuration from process environment variables.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|var| std::env::var(var).ok())
    }

    /// Read the configuration through `lookup`, which returns a variable's
    /// value if it is set. Empty values count as unset.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let get = |var: &str| lookup(var).filter(|v| !v.trim().is_empty());

        let bind_raw = get("BIND_ADDR").unwrap_or_else(|| Self::DEFAULT_BIND_ADDR.to_string());
        let bind_addr = bind_raw.parse::<SocketAddr>().map_err(|e| {
            ConfigError::Invalid {
                var: "BIND_ADDR",
                value: bind_raw.clone(),
                reason: e.to_string(),
            }
        })?;

        let search_timeout_ms = match get("SEARCH_TIMEOUT_MS") {
            None => Self::DEFAULT_SEARCH_TIMEOUT_MS,
            Some(raw) => match raw.trim().parse::<u64>() {
                Ok(ms) if ms > 0 => ms,
                Ok(_) => {
                    return Err(ConfigError::Invalid {
                        var: "SEARCH_TIMEOUT_MS",
                        value: raw,
                        reason: "must be positive".into(),
                    });
                }
                Err(e) => {
                    return Err(ConfigError::Invalid {
                        var: "SEARCH_TIMEOUT_MS",
                        value: raw,
                        reason: e.to_string(),
                    });
                }
            },
        };

        // A mock file takes precedence over an API key.
        let directions = match (get("MOCK_DIRECTIONS_FILE"), get("GOOGLE_MAPS_API_KEY")) {
            (Some(path), _) => DirectionsSource::MockFile(PathBuf::from(path)),
            (None, Some(api_key)) => DirectionsSource::Google { api_key },
            (None, None) => return Err(ConfigError::NoDirectionsProvider),
        };

        Ok(Self {
            bind_addr,
            graph_dir: PathBuf::from(
                get("GRAPH_DIR").unwrap_or_else(|| Self::DEFAULT_GRAPH_DIR.to_string()),
            ),
            gtfs_dir: get("GTFS_DIR").map(PathBuf::from),
            directions,
            search_timeout_ms,
        })
    }

    pub fn car_graph_path(&self) -> PathBuf {
        self.graph_dir.join(Self::CAR_GRAPH_FILE)
    }

    pub fn walk_graph_path(&self) -> PathBuf {
        self.graph_dir.join(Self::WALK_GRAPH_FILE)
    }
}

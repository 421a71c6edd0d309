use std::env;
use std::time::Duration;

use x402::facilitator_client::FacilitatorConfig;
use x402::routes::RouteTable;

const DEFAULT_FACILITATOR_URL: &str = "http://localhost:4021";
const DEFAULT_PORT: u16 = 4022;
const DEFAULT_ROUTES_PATH: &str = "./routes.json";
const DEFAULT_FACILITATOR_TIMEOUT_SECS: u64 = 5;

#[derive(Debug, Clone)]
pub struct GatewayConfig {
    /// Server port
    pub port: u16,
    /// Base URL of the upstream service whose routes are being metered
    pub upstream_url: String,
    /// Facilitator base URL and per-call timeout
    pub facilitator: FacilitatorConfig,
    /// Path to the JSON route table
    pub routes_path: String,
    /// CORS allowed origins (empty = same-origin only)
    pub allowed_origins: Vec<String>,
}

impl GatewayConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        // Required: upstream base URL
        let upstream_url =
            env::var("UPSTREAM_URL").map_err(|_| ConfigError::MissingRequired("UPSTREAM_URL"))?;
        url::Url::parse(&upstream_url).map_err(|_| ConfigError::InvalidUrl(upstream_url.clone()))?;

        // Optional: facilitator URL and timeout
        let facilitator_url =
            env::var("FACILITATOR_URL").unwrap_or_else(|_| DEFAULT_FACILITATOR_URL.to_string());
        let timeout_secs = env::var("FACILITATOR_TIMEOUT_SECS")
            .ok()
            .and_then(|s| s.parse().ok())
            .unwrap_or(DEFAULT_FACILITATOR_TIMEOUT_SECS);
        let facilitator =
            FacilitatorConfig::new(facilitator_url.clone(), Duration::from_secs(timeout_secs))
                .map_err(|_| ConfigError::InvalidUrl(facilitator_url))?;

        // Optional: port
        let port = env::var("PORT")
            .ok()
            .and_then(|s| s.parse().ok())
            .unwrap_or(DEFAULT_PORT);

        // Optional: route table path
        let routes_path = env::var("ROUTES_PATH").unwrap_or_else(|_| DEFAULT_ROUTES_PATH.to_string());

        // Optional: allowed origins
        let allowed_origins: Vec<String> = env::var("ALLOWED_ORIGINS")
            .map(|s| {
                s.split(',')
                    .map(|s| s.trim().to_string())
                    .filter(|s| !s.is_empty())
                    .collect()
            })
            .unwrap_or_default();

        Ok(Self {
            port,
            upstream_url,
            facilitator,
            routes_path,
            allowed_origins,
        })
    }

    /// Load and validate the route table from `routes_path`. Invariant
    /// violations in any configured requirement abort startup here instead
    /// of surfacing as 500s per request.
    pub fn load_routes(&self) -> Result<RouteTable, ConfigError> {
        let raw = std::fs::read_to_string(&self.routes_path)
            .map_err(|e| ConfigError::RoutesUnreadable(format!("{}: {}", self.routes_path, e)))?;
        let table =
            RouteTable::from_json(&raw).map_err(|e| ConfigError::RoutesInvalid(e.to_string()))?;
        table
            .validate()
            .map_err(|e| ConfigError::RoutesInvalid(e.to_string()))?;
        Ok(table)
    }
}

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("missing required environment variable: {0}")]
    MissingRequired(&'static str),

    #[error("invalid URL: {0}")]
    InvalidUrl(String),

    #[error("cannot read route table: {0}")]
    RoutesUnreadable(String),

    #[error("invalid route table: {0}")]
    RoutesInvalid(String),
}

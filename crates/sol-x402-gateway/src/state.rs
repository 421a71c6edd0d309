use std::sync::Arc;

use x402::facilitator_client::FacilitatorClient;
use x402::routes::RouteTable;

use crate::config::GatewayConfig;

/// Shared application state. Everything here is read-only after startup;
/// requests share no mutable state.
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<GatewayConfig>,
    pub routes: Arc<RouteTable>,
    pub facilitator: FacilitatorClient,
    pub http_client: reqwest::Client,
}

impl AppState {
    pub fn new(config: GatewayConfig, routes: RouteTable) -> Self {
        let facilitator = FacilitatorClient::new(&config.facilitator);
        let http_client = reqwest::Client::builder()
            .timeout(std::time::Duration::from_secs(30))
            .redirect(reqwest::redirect::Policy::none()) // Prevent SSRF via redirects
            .build()
            .expect("failed to create HTTP client");

        Self {
            config: Arc::new(config),
            routes: Arc::new(routes),
            facilitator,
            http_client,
        }
    }
}

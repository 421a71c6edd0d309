use actix_web::{middleware::Logger, web, App, HttpServer};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use x402_gateway::{config::GatewayConfig, gate, state::AppState};

#[tokio::main]
async fn main() -> std::io::Result<()> {
    // Load .env file if present
    dotenvy::dotenv().ok();

    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info,actix_web=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    // Load configuration and the route table
    let config = GatewayConfig::from_env().expect("Failed to load configuration");
    let routes = config.load_routes().expect("Failed to load route table");
    let port = config.port;
    let allowed_origins = config.allowed_origins.clone();

    tracing::info!("Starting sol-x402-gateway on port {}", port);
    tracing::info!("Upstream: {}", config.upstream_url);
    tracing::info!(
        "Facilitator: {} (timeout {:?})",
        config.facilitator.base_url,
        config.facilitator.timeout
    );
    tracing::info!("Route table: {}", config.routes_path);

    let state = web::Data::new(AppState::new(config, routes));

    HttpServer::new(move || {
        let cors = x402_gateway::cors::build_cors(&allowed_origins);

        App::new()
            .app_data(state.clone())
            .app_data(web::PayloadConfig::new(10 * 1024 * 1024)) // 10MB body limit
            .wrap(Logger::default())
            .wrap(cors)
            .default_service(web::route().to(gate::gate))
    })
    .bind(("0.0.0.0", port))?
    .run()
    .await
}

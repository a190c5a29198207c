//! Espalier content kernel.
//!
//! Read-only JSON API over a page/element/content tree.

use std::net::SocketAddr;

use anyhow::{Context, Result};
use axum::http::{HeaderValue, Method};
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing::{info, warn};
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

use espalier_kernel::config::Config;
use espalier_kernel::routes;
use espalier_kernel::state::AppState;

#[tokio::main]
async fn main() -> Result<()> {
    // Load .env file if present
    dotenvy::dotenv().ok();

    init_tracing();

    info!("Starting Espalier content kernel");

    let config = Config::from_env().context("failed to load configuration")?;
    info!(port = config.port, "Configuration loaded");

    let state = AppState::new(&config)
        .await
        .context("failed to initialize application state")?;

    info!(
        definitions = state.definitions().len(),
        navigation = state.navigation().len(),
        "Registries loaded"
    );

    let cors = build_cors_layer(&config);

    let app = routes::app(state)
        .layer(cors)
        .layer(TraceLayer::new_for_http());

    let addr = SocketAddr::from(([0, 0, 0, 0], config.port));
    info!(%addr, "Listening");

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .context("failed to bind listener")?;

    axum::serve(listener, app)
        .await
        .context("server error")?;

    Ok(())
}

/// Initialize tracing with an env-filter (RUST_LOG), defaulting to info.
fn init_tracing() {
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with(tracing_subscriber::fmt::layer())
        .init();
}

/// Build the CORS layer from configured origins. The API is read-only, so
/// only GET and HEAD are exposed.
fn build_cors_layer(config: &Config) -> CorsLayer {
    let layer = CorsLayer::new().allow_methods([Method::GET, Method::HEAD]);

    if config.cors_allowed_origins.iter().any(|o| o == "*") {
        return layer.allow_origin(Any);
    }

    let origins: Vec<HeaderValue> = config
        .cors_allowed_origins
        .iter()
        .filter_map(|origin| {
            origin
                .parse::<HeaderValue>()
                .inspect_err(|_| warn!(%origin, "ignoring invalid CORS origin"))
                .ok()
        })
        .collect();

    layer.allow_origin(origins)
}

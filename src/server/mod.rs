pub mod cors;
pub mod handlers;
pub mod state;

use crate::{config::Config, error::RelayError, metrics};
use axum::{Router, middleware, routing::any};
use reqwest::Client;
use state::AppState;
use tower_http::trace::TraceLayer;
use tracing::{error, info};

/// Build the full router (handlers + middleware) for the given config.
///
/// Separated from [`start`] so tests can drive the router without binding
/// a listener.
pub fn build_router(config: Config) -> Result<Router, RelayError> {
    let http_client = Client::builder()
        .user_agent(concat!("hlsrelay/", env!("CARGO_PKG_VERSION")))
        .build()
        .map_err(|e| RelayError::Config(format!("Failed to create HTTP client: {e}")))?;

    let state = AppState::new(config, http_client);

    // `/proxy/` and `/checklist/` with an empty suffix still belong to their
    // branch, so both the bare prefix and the catch-all are registered.
    let app = Router::new()
        .route("/proxy/", any(handlers::proxy::serve_proxy))
        .route("/proxy/{*target}", any(handlers::proxy::serve_proxy))
        .route("/checklist/", any(handlers::checklist::serve_checklist))
        .route("/checklist/{*id}", any(handlers::checklist::serve_checklist))
        .fallback(handlers::liveness::liveness)
        .with_state(state)
        .layer(middleware::from_fn(cors::preflight_middleware))
        .layer(cors::allow_origin_layer())
        .layer(cors::allow_methods_layer())
        .layer(TraceLayer::new_for_http());

    Ok(app)
}

/// Start the Axum HTTP server
pub async fn start(config: Config) -> Result<(), RelayError> {
    let addr = format!("0.0.0.0:{}", config.port);

    if let Some(metrics_port) = config.metrics_port {
        metrics::install_exporter(metrics_port)?;
    }

    info!("Upstream base URL: {}", config.upstream_base_url);
    let app = build_router(config)?;

    let listener = match tokio::net::TcpListener::bind(addr.as_str()).await {
        Ok(listener) => listener,
        Err(e) => {
            error!("Failed to bind to address {}: {}", addr, e);
            return Err(e.into());
        }
    };

    info!("🚀 Server listening on http://{}", addr);

    if let Err(e) = axum::serve(listener, app).await {
        error!("Server error: {}", e);
        return Err(e.into());
    }

    Ok(())
}

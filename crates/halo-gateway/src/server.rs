//! Router construction and server lifecycle

use std::sync::Arc;

use axum::http::HeaderValue;
use axum::routing::get;
use axum::Router;
use tokio::net::TcpListener;
use tower_http::cors::{Any, CorsLayer};
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use halo_core::{HaloError, HaloResult};

use crate::{ws, GatewayConfig, GatewayState};

/// Liveness probe for clients checking the server is reachable.
async fn hello() -> &'static str {
    "Hello from HALO gateway!"
}

/// Build the gateway router: the sync WebSocket plus the liveness probe,
/// with CORS configured for browser clients.
pub fn build_router(config: &GatewayConfig, state: Arc<GatewayState>) -> Router {
    let cors = match &config.allowed_origin {
        Some(origin) => match origin.parse::<HeaderValue>() {
            Ok(origin) => CorsLayer::new()
                .allow_origin(origin)
                .allow_methods(Any)
                .allow_headers(Any),
            Err(_) => {
                warn!("invalid allowed_origin {:?}, allowing any origin", origin);
                CorsLayer::new().allow_origin(Any).allow_methods(Any).allow_headers(Any)
            }
        },
        None => CorsLayer::new().allow_origin(Any).allow_methods(Any).allow_headers(Any),
    };

    Router::new()
        .route("/ws", get(ws::ws_sync))
        .route("/api/hello", get(hello))
        .layer(cors)
        .with_state(state)
}

/// Bind and serve until the process terminates.
pub async fn serve(config: GatewayConfig, state: Arc<GatewayState>) -> HaloResult<()> {
    let router = build_router(&config, state);

    let listener = TcpListener::bind(config.bind_addr)
        .await
        .map_err(|e| HaloError::TransportError(format!("bind {}: {}", config.bind_addr, e)))?;

    info!("gateway listening on {}", config.bind_addr);

    axum::serve(listener, router)
        .await
        .map_err(|e| HaloError::TransportError(e.to_string()))?;

    Ok(())
}

/// Install the global tracing subscriber (env-filtered, `info` default).
pub fn init_tracing() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();
}

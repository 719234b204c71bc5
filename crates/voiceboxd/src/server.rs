//! HTTP server for voiceboxd

use crate::routes;
use anyhow::Result;
use axum::Router;
use std::net::SocketAddr;
use std::sync::Arc;
use tower_http::trace::TraceLayer;
use tracing::info;
use voicebox_common::Config;

/// Address used when none is given on the command line
pub const DEFAULT_LISTEN_ADDR: &str = "127.0.0.1:4567";

/// Application state shared across handlers.
///
/// Built once at startup and never mutated, so handlers share it without
/// locking.
pub struct AppState {
    pub config: Config,
}

impl AppState {
    pub fn new(config: Config) -> Self {
        Self { config }
    }
}

/// Build the router with all routes, the not-found fallback and request
/// tracing.
pub fn router(state: AppState) -> Router {
    Router::new()
        .merge(routes::index_routes())
        .merge(routes::asset_routes())
        .merge(routes::log_routes())
        .fallback(routes::not_found)
        .with_state(Arc::new(state))
        .layer(TraceLayer::new_for_http())
}

/// Run the HTTP server until Ctrl-C.
pub async fn run(state: AppState, addr: SocketAddr) -> Result<()> {
    let app = router(state);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    info!("Listening on http://{}", addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("Shutting down gracefully");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!("Failed to listen for Ctrl-C: {}", e);
        std::future::pending::<()>().await;
    }
}

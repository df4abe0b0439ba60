//! HTTP Server Assembly
//!
//! Wires the API routes, the request logger and the asset server into one
//! router and runs it.

pub mod assets;
pub mod logging;

use crate::api;
use crate::storage::Storage;

use axum::{Extension, Router, middleware};
use std::net::SocketAddr;
use std::sync::Arc;

/// The full application: API routes with the store handle injected, `assets`
/// (see [`assets::router`]) for everything else, and the request logger
/// wrapped around both.
pub fn build_router(storage: Arc<dyn Storage>, assets: Router) -> Router {
    api::routes()
        .layer(Extension(storage))
        .merge(assets)
        .layer(middleware::from_fn(logging::log_api_requests))
}

/// Binds `addr` and serves `app` until Ctrl+C.
pub async fn serve(addr: SocketAddr, app: Router) -> anyhow::Result<()> {
    let listener = tokio::net::TcpListener::bind(addr).await?;
    tracing::info!(source = "http", "serving on port {}", addr.port());

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    tracing::info!("Server stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!("Failed to listen for shutdown signal: {}", e);
        std::future::pending::<()>().await;
    }
    tracing::info!("Shutdown signal received");
}

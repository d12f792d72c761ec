//! HTTP façade
//!
//! Exposes the search pipeline over two JSON routes:
//! - `GET /` returns a static health payload
//! - `GET /search?query=<text>&limit=<int>` runs one search

mod api;
mod state;

pub use api::{ErrorResponse, SearchParams, EXAMPLE_USAGE, HEALTH_MESSAGE};
pub use state::AppState;

use crate::config::Config;
use crate::ServiceError;
use axum::{routing::get, Router};
use std::future::Future;
use std::net::SocketAddr;
use tokio::net::TcpListener;
use tower_http::trace::TraceLayer;

/// Builds the router over shared state
pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/", get(api::health_check))
        .route("/search", get(api::search))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Binds the configured address and serves until Ctrl-C
pub async fn serve(config: Config) -> Result<(), ServiceError> {
    let addr = resolve_addr(&config.server.host, config.server.port).await?;
    let state = AppState::new(config)?;

    let listener = TcpListener::bind(addr).await?;
    tracing::info!("Listening on http://{}", listener.local_addr()?);

    serve_on(listener, state, shutdown_signal()).await
}

/// Serves on an already-bound listener until `shutdown` resolves
pub async fn serve_on<F>(
    listener: TcpListener,
    state: AppState,
    shutdown: F,
) -> Result<(), ServiceError>
where
    F: Future<Output = ()> + Send + 'static,
{
    axum::serve(listener, create_router(state))
        .with_graceful_shutdown(shutdown)
        .await?;

    tracing::info!("Server stopped");
    Ok(())
}

async fn resolve_addr(host: &str, port: u16) -> Result<SocketAddr, ServiceError> {
    tokio::net::lookup_host((host, port))
        .await
        .map_err(|e| ServiceError::Address(format!("{}:{} ({})", host, port, e)))?
        .next()
        .ok_or_else(|| ServiceError::Address(format!("{}:{}", host, port)))
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!("Failed to listen for Ctrl-C: {}", e);
        std::future::pending::<()>().await;
    }
    tracing::info!("Shutdown requested");
}

//! Push Channel - local HTTP server for direct controller commands
//!
//! - `POST /command`: run one command synchronously, reply with the result
//! - `GET /status`: isolation state and agent version

pub mod handlers;

use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use axum::{
    routing::{get, post},
    Router,
};
use tower::ServiceBuilder;
use tower_http::{timeout::TimeoutLayer, trace::TraceLayer};

use crate::logic::response::ActionExecutor;
use crate::logic::shutdown::Shutdown;

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    pub executor: Arc<ActionExecutor>,
}

pub fn create_router(state: AppState, request_timeout: Duration) -> Router {
    Router::new()
        .route("/command", post(handlers::command))
        .route("/status", get(handlers::status))
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(TimeoutLayer::new(request_timeout)),
        )
        .with_state(state)
}

/// Serve until shutdown. A bind failure is logged and the server gives up;
/// the rest of the agent keeps running.
pub async fn serve(addr: SocketAddr, state: AppState, request_timeout: Duration, shutdown: Shutdown) {
    let listener = match tokio::net::TcpListener::bind(addr).await {
        Ok(listener) => listener,
        Err(e) => {
            tracing::error!("Failed to bind command server on {}: {}", addr, e);
            return;
        }
    };

    tracing::info!("Command server listening on http://{}", addr);

    let app = create_router(state, request_timeout);
    let mut shutdown = shutdown;
    let result = axum::serve(listener, app)
        .with_graceful_shutdown(async move { shutdown.requested().await })
        .await;

    match result {
        Ok(()) => tracing::info!("Command server stopped"),
        Err(e) => tracing::error!("Command server error: {}", e),
    }
}

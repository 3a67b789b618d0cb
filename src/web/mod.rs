//! Web layer: routing, shared state, and the server loop.

pub mod handlers;
pub mod models;

use crate::inference::InferenceGateway;
use anyhow::Context;
use axum::extract::DefaultBodyLimit;
use axum::routing::{get, post};
use axum::Router;
use std::net::SocketAddr;
use std::sync::Arc;
use tokio::net::TcpListener;
use tower_http::trace::TraceLayer;
use tracing::info;

/// Largest accepted request body. Dominated by the image, which arrives
/// base64-encoded and so runs about a third larger than the file itself.
pub const MAX_UPLOAD_BYTES: usize = 10 * 1024 * 1024;

const DEFAULT_PORT: u16 = 3000;

/// State shared by every handler.
#[derive(Clone)]
pub struct AppState {
    pub gateway: Arc<dyn InferenceGateway>,
    /// Reported back to the client with each analysis.
    pub model: String,
}

impl AppState {
    pub fn new(gateway: Arc<dyn InferenceGateway>, model: impl Into<String>) -> Self {
        Self {
            gateway,
            model: model.into(),
        }
    }
}

/// Build the application router: the page, the analyze endpoint, and a
/// JSON 404 fallback.
pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/", get(handlers::index))
        .route("/api/analyze", post(handlers::analyze))
        .fallback(handlers::not_found)
        .layer(DefaultBodyLimit::max(MAX_UPLOAD_BYTES))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Port to listen on, from `PORT`, defaulting to 3000.
pub fn server_port_from_env() -> u16 {
    std::env::var("PORT")
        .ok()
        .and_then(|v| v.parse().ok())
        .unwrap_or(DEFAULT_PORT)
}

/// Bind and serve until the process is stopped.
pub async fn run_server(router: Router, port: u16) -> anyhow::Result<()> {
    let addr = SocketAddr::from(([0, 0, 0, 0], port));
    let listener = TcpListener::bind(addr)
        .await
        .context("failed to bind server address")?;

    info!("Listening on http://{addr}");

    axum::serve(listener, router).await.context("server error")?;

    Ok(())
}

//! Read-only HTTP API over the indexed emails.

pub mod error;
pub mod routes;

use std::net::SocketAddr;
use std::sync::Arc;

use axum::{http::Method, routing::get, Router};
use tokio::net::TcpListener;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use crate::search::SearchBackend;

pub use error::ApiError;

#[derive(Clone)]
pub struct ApiState {
    pub backend: Arc<dyn SearchBackend>,
    /// Index searched by every route.
    pub index: String,
}

impl ApiState {
    pub fn new(backend: Arc<dyn SearchBackend>, index: impl Into<String>) -> Self {
        Self {
            backend,
            index: index.into(),
        }
    }
}

pub fn router(state: ApiState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods([Method::GET]);

    Router::new()
        .route("/api/search", get(routes::search))
        .route("/api/emails", get(routes::list_emails))
        .route("/api/health", get(routes::health))
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Bind `addr` and serve the API until the process is stopped.
pub async fn serve(addr: SocketAddr, state: ApiState) -> std::io::Result<()> {
    let listener = TcpListener::bind(addr).await?;
    tracing::info!(addr = %listener.local_addr()?, index = %state.index, "HTTP API listening");
    axum::serve(listener, router(state)).await
}

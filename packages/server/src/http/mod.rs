//! HTTP surface for the tree engine
//!
//! # Architecture
//!
//! The server is organized into endpoint modules merged into one router:
//! - `tree_endpoints`: forest reads, path/siblings, create, update, delete, move
//! - health check at `/api/health`
//!
//! Every request is traced through `TraceLayer`; browser access is limited by
//! a CORS allow-list.

use axum::{
    http::{header::HeaderValue, Method},
    response::Json,
    routing::get,
    Router,
};
use serde::Serialize;
use tokio::sync::broadcast::error::RecvError;
use tokio::task::JoinHandle;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use arbor_core::services::TreeService;

mod envelope;
mod http_error;
pub mod tree_endpoints;

pub use envelope::{success, ApiResponse};
pub use http_error::HttpError;

/// Application state shared across all endpoints
#[derive(Clone)]
pub struct AppState {
    pub tree_service: TreeService,
}

/// Health check response
#[derive(Debug, Serialize)]
pub struct HealthStatus {
    pub status: String,
    pub version: String,
}

async fn health_check() -> Json<HealthStatus> {
    Json(HealthStatus {
        status: "ok".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
    })
}

/// Create the application router with all endpoint modules
pub fn create_router(state: AppState, cors: CorsLayer) -> Router {
    Router::new()
        .route("/api/health", get(health_check))
        .nest("/api/trees", tree_endpoints::routes(state))
        .layer(cors)
        .layer(TraceLayer::new_for_http())
}

/// Create the CORS layer
///
/// With no explicit origin, requests from the common local dev ports are
/// allowed.
pub fn cors_layer(allow_origin: Option<&str>) -> anyhow::Result<CorsLayer> {
    let default_origins = [
        "http://localhost:3000",
        "http://localhost:5173", // Vite default
        "http://localhost:8080",
    ];

    let origins: Vec<HeaderValue> = match allow_origin {
        Some(origin) => vec![origin
            .parse::<HeaderValue>()
            .map_err(|e| anyhow::anyhow!("Invalid CORS_ALLOW_ORIGIN '{}': {}", origin, e))?],
        None => default_origins
            .into_iter()
            .map(HeaderValue::from_static)
            .collect(),
    };

    Ok(CorsLayer::new()
        .allow_origin(origins)
        .allow_methods([Method::GET, Method::POST, Method::PUT, Method::DELETE])
        .allow_headers(Any)
        .allow_credentials(false))
}

/// Log every domain event published by `service` until the channel closes
pub fn spawn_event_logger(service: &TreeService) -> JoinHandle<()> {
    let mut rx = service.subscribe_to_events();

    tokio::spawn(async move {
        loop {
            match rx.recv().await {
                Ok(event) => {
                    tracing::info!(
                        event_type = event.event_type(),
                        node_id = event.node_id(),
                        "Tree event"
                    );
                }
                Err(RecvError::Lagged(skipped)) => {
                    tracing::warn!("Event logger lagged, skipped {} events", skipped);
                }
                Err(RecvError::Closed) => break,
            }
        }
    })
}

/// Start the HTTP server
///
/// # Errors
///
/// Returns error if the server fails to bind or start.
pub async fn start_server(
    tree_service: TreeService,
    port: u16,
    allow_origin: Option<&str>,
) -> anyhow::Result<()> {
    let state = AppState { tree_service };
    let app = create_router(state, cors_layer(allow_origin)?);

    let addr = format!("127.0.0.1:{}", port);
    tracing::info!("Arbor server listening on http://{}", addr);

    let listener = tokio::net::TcpListener::bind(&addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cors_layer_rejects_invalid_origin() {
        assert!(cors_layer(Some("http://localhost:5173")).is_ok());
        assert!(cors_layer(Some("bad\norigin")).is_err());
        assert!(cors_layer(None).is_ok());
    }
}

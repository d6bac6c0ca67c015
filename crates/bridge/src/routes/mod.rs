//! HTTP route handlers for the bridge.
//!
//! # Route Structure
//!
//! ```text
//! POST /bridge                - Validate cart, select shop, create checkout, 302 redirect
//! GET  /mapping.json          - Current SKU→variant mapping
//! POST /admin/reload-mapping  - Re-read the mapping from its source
//! GET  /health                - Liveness check
//! ```

pub mod bridge;
pub mod mapping;

use axum::{
    Json, Router,
    extract::DefaultBodyLimit,
    routing::{get, post},
};
use serde_json::{Value, json};
use tower_http::trace::TraceLayer;

use crate::middleware::privacy_headers_middleware;
use crate::state::AppState;

/// Maximum accepted request body size (200 KB).
const MAX_BODY_BYTES: usize = 200 * 1024;

/// Create the bridge router with all routes and layers.
pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/bridge", post(bridge::create))
        .route("/mapping.json", get(mapping::show))
        .route("/admin/reload-mapping", post(mapping::reload))
        .route("/health", get(health))
        .layer(DefaultBodyLimit::max(MAX_BODY_BYTES))
        .layer(axum::middleware::from_fn(privacy_headers_middleware))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Liveness health check endpoint.
///
/// Returns ok plus the current epoch millis. Does not probe the shops.
async fn health() -> Json<Value> {
    Json(json!({
        "ok": true,
        "ts": chrono::Utc::now().timestamp_millis(),
    }))
}

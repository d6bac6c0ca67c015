//! SKU mapping routes: read-only view plus hot reload.

use std::collections::HashMap;

use axum::{
    Json,
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde_json::json;
use tracing::instrument;

use crate::mapping;
use crate::state::AppState;

/// Serve the current mapping as a JSON object.
#[instrument(skip(state))]
pub async fn show(State(state): State<AppState>) -> Json<HashMap<String, String>> {
    Json(state.mapping().snapshot().as_ref().clone())
}

/// Re-read the mapping from its source and swap it in.
///
/// On success responds `{ok: true, count: N}`. A failed reload keeps the
/// previously loaded mapping serving and reports the failure instead.
#[instrument(skip(state))]
pub async fn reload(State(state): State<AppState>) -> Response {
    match mapping::load(&state.config().mapping) {
        Ok(next) => {
            let count = state.mapping().replace(next);
            tracing::info!(count, "mapping reloaded");
            Json(json!({ "ok": true, "count": count })).into_response()
        }
        Err(e) => {
            tracing::error!(error = %e, "mapping reload failed, keeping previous mapping");
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(json!({ "error": e.to_string() })),
            )
                .into_response()
        }
    }
}

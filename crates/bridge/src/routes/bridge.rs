//! The checkout-bridging endpoint.
//!
//! Per request: Validate → Select → Build → Respond. Each stage is terminal
//! on failure; there are no retries across stages.

use axum::{
    Json,
    extract::State,
    http::{StatusCode, header::LOCATION},
    response::{IntoResponse, Response},
};
use tracing::instrument;

use crate::error::{AppError, Result};
use crate::shopify::BridgePayload;
use crate::state::AppState;

/// Bridge a raw cart payload to a backend shop's checkout.
///
/// Responds 302 with the checkout URL on success; 400 when lines are
/// missing or empty, 503 when no shop is healthy, 500 when checkout
/// creation fails.
#[instrument(skip(state, payload))]
pub async fn create(
    State(state): State<AppState>,
    Json(payload): Json<BridgePayload>,
) -> Result<Response> {
    // Validate: never reach shop selection with an empty cart
    if !payload.has_lines() {
        return Err(AppError::MissingLines);
    }

    // Select: first healthy shop in priority order
    let target = state.shops().select().await.ok_or(AppError::NoShopAvailable)?;
    let client = state.shops().get(target).ok_or(AppError::NoShopAvailable)?;

    // Build: normalize the payload and create the checkout
    let request = payload.normalize();
    let checkout_url = client.create_cart(&request).await?;

    tracing::info!(shop = %target, "checkout created, redirecting");
    Ok(found(&checkout_url))
}

/// A 302 Found redirect.
///
/// `axum::response::Redirect` only offers 303/307/308; the bridge contract
/// is an explicit 302.
fn found(url: &str) -> Response {
    (StatusCode::FOUND, [(LOCATION, url.to_string())]).into_response()
}

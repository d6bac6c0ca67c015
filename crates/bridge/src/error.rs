//! Unified error handling with Sentry integration.
//!
//! Every per-request failure is converted at the handler boundary into the
//! structured `{"error": message}` JSON shape; nothing propagates far enough
//! to crash the process.

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde_json::json;
use thiserror::Error;

use crate::shopify::ShopifyError;

/// Application-level error type for the bridge.
#[derive(Debug, Error)]
pub enum AppError {
    /// Client supplied no cart lines.
    #[error("lines manquantes")]
    MissingLines,

    /// No backend shop passed its health probe.
    #[error("Aucun shop disponible")]
    NoShopAvailable,

    /// Checkout creation failed (provider, transport, or decode).
    #[error(transparent)]
    Checkout(#[from] ShopifyError),
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        // Capture server-side failures to Sentry; client mistakes and normal
        // unavailability are not error events.
        if matches!(self, Self::Checkout(_)) {
            let event_id = sentry::capture_error(&self);
            tracing::error!(
                error = %self,
                sentry_event_id = %event_id,
                "checkout creation failed"
            );
        }

        let status = match &self {
            Self::MissingLines => StatusCode::BAD_REQUEST,
            Self::NoShopAvailable => StatusCode::SERVICE_UNAVAILABLE,
            Self::Checkout(_) => StatusCode::INTERNAL_SERVER_ERROR,
        };

        (status, Json(json!({ "error": self.to_string() }))).into_response()
    }
}

/// Result type alias for `AppError`.
pub type Result<T> = std::result::Result<T, AppError>;

//! Shopify Storefront API client and cart payload normalization.
//!
//! The Storefront API is treated as an opaque JSON RPC: every call is a
//! `POST https://{domain}/api/{version}/graphql.json` with a
//! `{query, variables}` body and the `X-Shopify-Storefront-Access-Token`
//! header. Only two documents are ever sent - a liveness query and the
//! `cartCreate` mutation - so the queries are fixed strings and responses
//! are decoded with plain `serde`.

mod client;
mod payload;
mod selector;

pub use client::StorefrontClient;
pub use payload::{
    Attribute, BridgePayload, CartLine, CheckoutRequest, RawCartLine, to_variant_gid,
};
pub use selector::{ShopKey, ShopRegistry};

use thiserror::Error;

/// Errors that can occur while creating a checkout.
///
/// `UserError` and `MissingCheckoutUrl` render bare messages: their `Display`
/// output is relayed verbatim to the bridge caller in the `{"error": ...}`
/// body.
#[derive(Debug, Error)]
pub enum ShopifyError {
    /// HTTP request failed (connect, timeout, or body read).
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// Shop answered with a non-success status.
    #[error("HTTP {0}")]
    Status(reqwest::StatusCode),

    /// Response body was not the expected JSON shape.
    #[error("JSON parse error: {0}")]
    Parse(#[from] serde_json::Error),

    /// Top-level GraphQL errors in the response.
    #[error("GraphQL errors: {0}")]
    GraphQl(String),

    /// Provider-reported user errors from the mutation, joined with `"; "`.
    #[error("{0}")]
    UserError(String),

    /// Mutation succeeded but the response carried no checkout URL.
    #[error("checkoutUrl introuvable")]
    MissingCheckoutUrl,
}

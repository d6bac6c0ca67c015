//! Shopify Storefront API client for health probes and cart creation.

use std::sync::Arc;
use std::time::Duration;

use secrecy::ExposeSecret;
use serde::Deserialize;
use serde_json::json;
use tracing::instrument;

use crate::config::ShopConfig;
use crate::shopify::{CheckoutRequest, ShopifyError};

/// Bound on every outbound call so one unresponsive shop cannot stall a
/// request indefinitely.
const REQUEST_TIMEOUT: Duration = Duration::from_secs(5);

/// Minimal read-only document used as a liveness probe.
const SHOP_NAME_QUERY: &str = "query { shop { name } }";

/// Cart-creation mutation; the only write this service ever issues.
const CART_CREATE_MUTATION: &str = "\
mutation CreateCart($lines: [CartLineInput!], $attributes: [AttributeInput!], $note: String) {
  cartCreate(input: { lines: $lines, attributes: $attributes, note: $note }) {
    cart { id checkoutUrl }
    userErrors { field message }
  }
}";

/// Client for one backend shop's Storefront API endpoint.
#[derive(Clone)]
pub struct StorefrontClient {
    inner: Arc<StorefrontClientInner>,
}

struct StorefrontClientInner {
    client: reqwest::Client,
    endpoint: String,
    access_token: String,
}

impl StorefrontClient {
    /// Create a client for a configured shop.
    #[must_use]
    pub fn new(shop: &ShopConfig, api_version: &str) -> Self {
        let endpoint = format!("https://{}/api/{api_version}/graphql.json", shop.domain);
        Self::from_endpoint(endpoint, shop.access_token.expose_secret())
    }

    /// Create a client against an explicit endpoint URL.
    ///
    /// Used by tests to point the client at a local server.
    #[must_use]
    pub fn from_endpoint(endpoint: impl Into<String>, access_token: &str) -> Self {
        Self {
            inner: Arc::new(StorefrontClientInner {
                client: reqwest::Client::new(),
                endpoint: endpoint.into(),
                access_token: access_token.to_string(),
            }),
        }
    }

    /// POST a `{query, variables}` document to the shop's endpoint.
    async fn post(&self, body: &serde_json::Value) -> Result<reqwest::Response, reqwest::Error> {
        self.inner
            .client
            .post(&self.inner.endpoint)
            .timeout(REQUEST_TIMEOUT)
            .header(
                "X-Shopify-Storefront-Access-Token",
                &self.inner.access_token,
            )
            .header("Content-Type", "application/json")
            .json(body)
            .send()
            .await
    }

    /// Liveness probe: a minimal read-only query with a bounded timeout.
    ///
    /// Never errors - any transport failure or non-success status is simply
    /// "unhealthy".
    #[instrument(skip(self), fields(endpoint = %self.inner.endpoint))]
    pub async fn health(&self) -> bool {
        match self.post(&json!({ "query": SHOP_NAME_QUERY })).await {
            Ok(response) => {
                let healthy = response.status().is_success();
                if !healthy {
                    tracing::debug!(status = %response.status(), "shop probe returned non-success");
                }
                healthy
            }
            Err(e) => {
                tracing::debug!(error = %e, "shop probe failed");
                false
            }
        }
    }

    /// Issue the `cartCreate` mutation and extract the checkout URL.
    ///
    /// A single attempt, no retries: any transport failure, decode failure,
    /// provider user error, or missing URL is terminal.
    ///
    /// # Errors
    ///
    /// Returns `ShopifyError` describing the first failure encountered.
    #[instrument(skip(self, request), fields(endpoint = %self.inner.endpoint, lines = request.lines.len()))]
    pub async fn create_cart(&self, request: &CheckoutRequest) -> Result<String, ShopifyError> {
        let body = json!({
            "query": CART_CREATE_MUTATION,
            "variables": {
                "lines": request.lines,
                "attributes": request.attributes,
                "note": request.note,
            },
        });

        let response = self.post(&body).await?;
        let status = response.status();
        let response_text = response.text().await?;

        if !status.is_success() {
            tracing::error!(
                status = %status,
                body = %response_text.chars().take(500).collect::<String>(),
                "cartCreate returned non-success status"
            );
            return Err(ShopifyError::Status(status));
        }

        let envelope: CartCreateEnvelope = match serde_json::from_str(&response_text) {
            Ok(envelope) => envelope,
            Err(e) => {
                tracing::error!(
                    error = %e,
                    body = %response_text.chars().take(500).collect::<String>(),
                    "failed to parse cartCreate response"
                );
                return Err(ShopifyError::Parse(e));
            }
        };

        if let Some(errors) = envelope.errors
            && !errors.is_empty()
        {
            return Err(ShopifyError::GraphQl(
                errors
                    .into_iter()
                    .map(|e| e.message)
                    .collect::<Vec<_>>()
                    .join("; "),
            ));
        }

        let result = envelope.data.and_then(|data| data.cart_create);
        let Some(result) = result else {
            return Err(ShopifyError::MissingCheckoutUrl);
        };

        if !result.user_errors.is_empty() {
            return Err(ShopifyError::UserError(
                result
                    .user_errors
                    .into_iter()
                    .map(|e| e.message)
                    .collect::<Vec<_>>()
                    .join("; "),
            ));
        }

        result
            .cart
            .and_then(|cart| cart.checkout_url)
            .ok_or(ShopifyError::MissingCheckoutUrl)
    }
}

// =============================================================================
// Response shapes
// =============================================================================

#[derive(Debug, Deserialize)]
struct CartCreateEnvelope {
    data: Option<CartCreateData>,
    errors: Option<Vec<GraphQlError>>,
}

#[derive(Debug, Deserialize)]
struct GraphQlError {
    message: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct CartCreateData {
    cart_create: Option<CartCreatePayload>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct CartCreatePayload {
    cart: Option<CreatedCart>,
    #[serde(default)]
    user_errors: Vec<UserError>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct CreatedCart {
    checkout_url: Option<String>,
}

#[derive(Debug, Deserialize)]
struct UserError {
    message: String,
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_envelope_decodes_success_shape() {
        let envelope: CartCreateEnvelope = serde_json::from_str(
            r#"{"data": {"cartCreate": {
                "cart": {"id": "gid://shopify/Cart/1", "checkoutUrl": "https://shop/checkout"},
                "userErrors": []
            }}}"#,
        )
        .unwrap();

        let url = envelope
            .data
            .unwrap()
            .cart_create
            .unwrap()
            .cart
            .unwrap()
            .checkout_url
            .unwrap();
        assert_eq!(url, "https://shop/checkout");
    }

    #[test]
    fn test_envelope_decodes_user_errors() {
        let envelope: CartCreateEnvelope = serde_json::from_str(
            r#"{"data": {"cartCreate": {
                "cart": null,
                "userErrors": [{"field": ["lines"], "message": "Sold out"}]
            }}}"#,
        )
        .unwrap();

        let payload = envelope.data.unwrap().cart_create.unwrap();
        assert_eq!(payload.user_errors.len(), 1);
        assert_eq!(payload.user_errors[0].message, "Sold out");
    }

    #[test]
    fn test_envelope_tolerates_missing_data() {
        let envelope: CartCreateEnvelope =
            serde_json::from_str(r#"{"errors": [{"message": "boom"}]}"#).unwrap();
        assert!(envelope.data.is_none());
        assert_eq!(envelope.errors.unwrap()[0].message, "boom");
    }
}

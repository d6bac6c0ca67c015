//! Shop selection: probe candidate shops in priority order, first healthy wins.

use tracing::instrument;

use crate::config::BridgeConfig;
use crate::shopify::StorefrontClient;

/// The fixed, ordered set of candidate shops.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ShopKey {
    Primary,
    Secondary,
}

impl ShopKey {
    /// Candidates in selection priority order.
    pub const ALL: [Self; 2] = [Self::Primary, Self::Secondary];

    /// Stable name for logging.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Primary => "primary",
            Self::Secondary => "secondary",
        }
    }
}

impl std::fmt::Display for ShopKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Registry of clients for the configured shops.
///
/// A shop whose domain or token is unset gets no client at all, so the
/// selector skips it without any network call.
#[derive(Clone, Default)]
pub struct ShopRegistry {
    primary: Option<StorefrontClient>,
    secondary: Option<StorefrontClient>,
}

impl ShopRegistry {
    /// Build clients for every configured shop.
    #[must_use]
    pub fn from_config(config: &BridgeConfig) -> Self {
        let client_for = |shop: &crate::config::ShopConfig| {
            shop.is_configured()
                .then(|| StorefrontClient::new(shop, &config.api_version))
        };

        Self {
            primary: client_for(&config.shops.primary),
            secondary: client_for(&config.shops.secondary),
        }
    }

    /// Register a client for one shop (test setups build registries by hand).
    #[must_use]
    pub fn with(mut self, key: ShopKey, client: StorefrontClient) -> Self {
        match key {
            ShopKey::Primary => self.primary = Some(client),
            ShopKey::Secondary => self.secondary = Some(client),
        }
        self
    }

    /// Get the client for a shop, if it is configured.
    #[must_use]
    pub fn get(&self, key: ShopKey) -> Option<&StorefrontClient> {
        match key {
            ShopKey::Primary => self.primary.as_ref(),
            ShopKey::Secondary => self.secondary.as_ref(),
        }
    }

    /// Select the first healthy shop in priority order.
    ///
    /// Probes run sequentially - priority decides the winner, so an early
    /// healthy shop short-circuits the remaining probes. `None` is the normal
    /// "no shop available" outcome, never an error.
    #[instrument(skip(self))]
    pub async fn select(&self) -> Option<ShopKey> {
        for key in ShopKey::ALL {
            let Some(client) = self.get(key) else {
                tracing::debug!(shop = %key, "shop not configured, skipping probe");
                continue;
            };
            if client.health().await {
                tracing::debug!(shop = %key, "selected healthy shop");
                return Some(key);
            }
            tracing::warn!(shop = %key, "shop unhealthy, trying next candidate");
        }
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_priority_order_is_primary_first() {
        assert_eq!(ShopKey::ALL, [ShopKey::Primary, ShopKey::Secondary]);
    }

    #[test]
    fn test_shop_key_display() {
        assert_eq!(ShopKey::Primary.to_string(), "primary");
        assert_eq!(ShopKey::Secondary.to_string(), "secondary");
    }

    #[tokio::test]
    async fn test_empty_registry_selects_nothing() {
        // No configured shop means no probe and no selection
        let registry = ShopRegistry::default();
        assert_eq!(registry.select().await, None);
    }

    #[tokio::test]
    async fn test_unconfigured_shop_has_no_client() {
        let registry = ShopRegistry::default();
        assert!(registry.get(ShopKey::Primary).is_none());
        assert!(registry.get(ShopKey::Secondary).is_none());
    }
}

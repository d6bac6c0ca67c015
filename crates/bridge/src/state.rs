//! Application state shared across handlers.

use std::sync::Arc;

use crate::config::BridgeConfig;
use crate::mapping::{Mapping, MappingStore};
use crate::shopify::ShopRegistry;

/// Application state shared across all handlers.
///
/// Cheaply cloneable via `Arc`. The config and shop registry are read-only
/// for the process lifetime; only the mapping store is mutable, and only via
/// whole-map replacement.
#[derive(Clone)]
pub struct AppState {
    inner: Arc<AppStateInner>,
}

struct AppStateInner {
    config: BridgeConfig,
    shops: ShopRegistry,
    mapping: MappingStore,
}

impl AppState {
    /// Create a new application state.
    #[must_use]
    pub fn new(config: BridgeConfig, shops: ShopRegistry, mapping: Mapping) -> Self {
        Self {
            inner: Arc::new(AppStateInner {
                config,
                shops,
                mapping: MappingStore::new(mapping),
            }),
        }
    }

    /// Get a reference to the bridge configuration.
    #[must_use]
    pub fn config(&self) -> &BridgeConfig {
        &self.inner.config
    }

    /// Get a reference to the shop registry.
    #[must_use]
    pub fn shops(&self) -> &ShopRegistry {
        &self.inner.shops
    }

    /// Get a reference to the mapping store.
    #[must_use]
    pub fn mapping(&self) -> &MappingStore {
        &self.inner.mapping
    }
}

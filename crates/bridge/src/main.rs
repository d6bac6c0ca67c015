//! Checkout Bridge - relay between a storefront frontend and backend Shopify shops.
//!
//! Receives a raw cart payload on `POST /bridge`, picks the first healthy
//! backend shop in priority order, creates a cart there via the Storefront
//! API, and redirects the caller to the resulting checkout URL.
//!
//! # Architecture
//!
//! - Axum web framework, JSON in, 302 redirect out
//! - One outbound Storefront API client per configured shop
//! - Live-reloadable SKU→variant mapping served to the frontend
//!
//! The bridge holds no commerce logic: pricing, inventory, and tax all live
//! at the backend shop.

#![cfg_attr(not(test), forbid(unsafe_code))]

use checkout_bridge::config::BridgeConfig;
use checkout_bridge::mapping::{self, Mapping};
use checkout_bridge::routes;
use checkout_bridge::shopify::ShopRegistry;
use checkout_bridge::state::AppState;

use sentry::integrations::tracing as sentry_tracing;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

/// Initialize Sentry error tracking and return guard that must be kept alive.
fn init_sentry(config: &BridgeConfig) -> Option<sentry::ClientInitGuard> {
    let dsn = config.sentry_dsn.as_ref()?;

    let guard = sentry::init((
        dsn.as_str(),
        sentry::ClientOptions {
            release: sentry::release_name!(),
            attach_stacktrace: true,
            ..Default::default()
        },
    ));

    tracing::info!("Sentry initialized");
    Some(guard)
}

/// Filter tracing events to Sentry event types.
fn sentry_event_filter(metadata: &tracing::Metadata<'_>) -> sentry_tracing::EventFilter {
    match *metadata.level() {
        tracing::Level::ERROR | tracing::Level::WARN => sentry_tracing::EventFilter::Event,
        tracing::Level::INFO | tracing::Level::DEBUG => sentry_tracing::EventFilter::Breadcrumb,
        _ => sentry_tracing::EventFilter::Ignore,
    }
}

/// Load the initial mapping, degrading to an empty one instead of aborting.
fn load_initial_mapping(config: &BridgeConfig) -> Mapping {
    match mapping::load(&config.mapping) {
        Ok(mapping) => {
            tracing::info!(count = mapping.len(), "mapping loaded");
            mapping
        }
        Err(e) => {
            tracing::error!(error = %e, "mapping source absent or invalid, starting empty");
            Mapping::new()
        }
    }
}

#[tokio::main]
async fn main() {
    // Load configuration from environment (needed for Sentry init)
    let config = BridgeConfig::from_env().expect("Failed to load configuration");

    // Initialize Sentry (must be done before tracing subscriber)
    let _sentry_guard = init_sentry(&config);

    // Initialize tracing with EnvFilter and Sentry integration
    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| "checkout_bridge=info,tower_http=debug".into());

    tracing_subscriber::registry()
        .with(env_filter)
        .with(tracing_subscriber::fmt::layer())
        .with(sentry_tracing::layer().event_filter(sentry_event_filter))
        .init();

    // Build application state: shops are read-only for the process lifetime,
    // the mapping can be hot-reloaded
    let shops = ShopRegistry::from_config(&config);
    let initial_mapping = load_initial_mapping(&config);
    let addr = config.socket_addr();
    let state = AppState::new(config, shops, initial_mapping);

    // Build router with Sentry layers outermost for full request coverage
    let app = routes::router(state)
        .layer(sentry_tower::NewSentryLayer::new_from_top())
        .layer(sentry_tower::SentryHttpLayer::new().enable_transaction());

    // Start server
    tracing::info!("bridge listening on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .expect("Failed to bind to address");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .expect("Server error");
}

/// Wait for shutdown signal (Ctrl+C or SIGTERM).
async fn shutdown_signal() {
    let ctrl_c = async {
        tokio::signal::ctrl_c()
            .await
            .expect("Failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate())
            .expect("Failed to install signal handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => {},
        () = terminate => {},
    }

    tracing::info!("Shutdown signal received, starting graceful shutdown");
}

//! Match-Context Aggregation Service — Binary Entrypoint
//! Boots the Axum HTTP server, wiring the provider registry, lexicon,
//! result cache, and the Prometheus exporter.

use std::sync::Arc;

use shuttle_axum::ShuttleAxum;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use matchfeed::api::{create_router, AppState};
use matchfeed::cache::ContextCache;
use matchfeed::config::Settings;
use matchfeed::metrics::Metrics;
use matchfeed::scoring::Lexicon;

/// Enable compact tracing logs in development only.
/// Activation requires BOTH:
///   - dev environment (debug build OR SHUTTLE_ENV in {local, development, dev})
///   - MATCHFEED_DEV_LOG=1
fn enable_dev_tracing() {
    let dev_flag = std::env::var("MATCHFEED_DEV_LOG")
        .ok()
        .is_some_and(|v| v == "1");

    let is_dev_env = cfg!(debug_assertions)
        || matches!(
            std::env::var("SHUTTLE_ENV")
                .unwrap_or_default()
                .to_ascii_lowercase()
                .as_str(),
            "local" | "development" | "dev"
        );

    if !(dev_flag && is_dev_env) {
        return;
    }

    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("matchfeed=info,warn"));

    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().compact())
        .init();
}

#[shuttle_runtime::main]
async fn axum() -> ShuttleAxum {
    // Load .env in local/dev; no-op in prod environments. This is where
    // the provider credential pairs come from when running locally.
    let _ = dotenvy::dotenv();

    // Initialize dev tracing early (no-op in production).
    enable_dev_tracing();

    let settings = Settings::from_env();
    let cache = ContextCache::new(settings.cache_ttl());
    let metrics = Metrics::init(settings.cache_ttl().as_millis() as u64);

    let state = AppState {
        adapters: Arc::new(settings.build_adapters()),
        lexicon: Arc::new(Lexicon::load()),
        cache: Arc::new(cache),
        recency_window: settings.recency_window(),
    };

    let router = create_router(state).merge(metrics.router());

    Ok(router.into())
}

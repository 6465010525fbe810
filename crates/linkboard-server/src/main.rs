//! Service entry point for the linkboard arrivals board.
//!
//! Wires the pieces together: configuration from the environment, the
//! upstream client, the aggregation pipeline, the snapshot cache, and the
//! Axum router.
//!
//! # Architecture
//!
//! ```text
//! HTTP front --> Cache Layer --> (miss) Route Aggregator
//!                                   --> Batch Scheduler / Arrival Selector
//!                                   --> Upstream Client --> transit API
//! ```

use std::sync::Arc;

use anyhow::Context;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use linkboard_cache::{MemoryCache, RedisCache, SnapshotCache};
use linkboard_core::RouteAggregator;
use linkboard_server::config::{AppConfig, CacheBackend, CacheConfig};
use linkboard_server::router::build_router;
use linkboard_server::server::{ServerConfig, start_server};
use linkboard_server::state::AppState;
use linkboard_upstream::ObaClient;

/// Application entry point.
///
/// Initializes logging, loads configuration, connects the cache backend,
/// then serves until terminated.
///
/// # Errors
///
/// Returns an error if configuration is invalid or the server fails to
/// bind or serve.
#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize structured logging
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_target(true)
        .init();

    info!("linkboard server starting");

    let config = AppConfig::from_env().context("loading configuration")?;
    info!(
        agency = config.aggregator.agency_id,
        upstream = config.upstream.base_url,
        cache = ?config.cache.backend,
        single_flight = config.single_flight,
        "configuration loaded"
    );

    let client = ObaClient::new(&config.upstream);
    let aggregator = RouteAggregator::new(client, config.aggregator.clone());

    let cache = build_cache(&config.cache).await;
    info!(backend = cache.backend_name(), "snapshot cache ready");

    let state = Arc::new(AppState::new(aggregator, cache, config.single_flight));
    let router = build_router(state);

    let server_config = ServerConfig {
        host: config.host.clone(),
        port: config.port,
    };
    start_server(&server_config, router)
        .await
        .context("running server")?;

    Ok(())
}

/// Select and connect the snapshot cache backend.
///
/// A failed connection to the external store degrades to the in-memory
/// backend rather than refusing to start; the request path treats cache
/// faults as misses either way, so the only cost is recomputation.
async fn build_cache(config: &CacheConfig) -> SnapshotCache {
    match config.backend {
        CacheBackend::Memory => SnapshotCache::Memory(MemoryCache::new(config.ttl)),
        CacheBackend::None => SnapshotCache::Disabled,
        CacheBackend::Redis => {
            let Some(url) = config.redis_url.as_deref() else {
                warn!("redis backend selected without REDIS_URL, using in-memory cache");
                return SnapshotCache::Memory(MemoryCache::new(config.ttl));
            };

            let ttl_secs = i64::try_from(config.ttl.as_secs()).unwrap_or(i64::MAX);
            match RedisCache::connect(url, ttl_secs).await {
                Ok(cache) => SnapshotCache::Redis(cache),
                Err(e) => {
                    warn!(error = %e, "cache store unreachable, using in-memory cache");
                    SnapshotCache::Memory(MemoryCache::new(config.ttl))
                }
            }
        }
    }
}

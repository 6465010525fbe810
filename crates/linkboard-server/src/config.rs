//! Configuration for the linkboard server.
//!
//! All configuration is loaded from environment variables; every variable
//! has a default, so an empty environment starts a working server against
//! the public upstream with the in-memory cache.

use std::time::Duration;

use linkboard_core::{AggregatorConfig, BatchPolicy};
use linkboard_upstream::ObaConfig;

/// Default TTL for the in-memory cache backend.
const DEFAULT_MEMORY_TTL_SECS: u64 = 300;
/// Default TTL for the external store backend.
const DEFAULT_REDIS_TTL_SECS: u64 = 120;

/// Raised when an environment variable is malformed or inconsistent.
#[derive(Debug, thiserror::Error)]
#[error("config error: {0}")]
pub struct ConfigError(pub String);

/// Complete server configuration loaded from the environment.
#[derive(Debug, Clone)]
pub struct AppConfig {
    /// Bind host.
    pub host: String,
    /// Bind port.
    pub port: u16,
    /// Upstream client settings.
    pub upstream: ObaConfig,
    /// Aggregation pipeline settings.
    pub aggregator: AggregatorConfig,
    /// Cache backend selection and TTL.
    pub cache: CacheConfig,
    /// De-duplicate concurrent cache misses behind one aggregation pass.
    pub single_flight: bool,
}

/// Which snapshot cache backend to run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CacheBackend {
    /// In-process TTL cache.
    Memory,
    /// External Redis-compatible store.
    Redis,
    /// No caching: every request aggregates.
    None,
}

/// Snapshot cache configuration.
#[derive(Debug, Clone)]
pub struct CacheConfig {
    /// Selected backend.
    pub backend: CacheBackend,
    /// Connection string for the external store, when selected.
    pub redis_url: Option<String>,
    /// Snapshot time-to-live.
    pub ttl: Duration,
}

impl AppConfig {
    /// Load configuration from environment variables.
    ///
    /// | Variable | Default | Meaning |
    /// |----------|---------|---------|
    /// | `HOST` / `PORT` | `0.0.0.0` / `3000` | bind address |
    /// | `OBA_BASE_URL` | Puget Sound OneBusAway | upstream base URL |
    /// | `OBA_API_KEY` | `TEST` | upstream API key |
    /// | `OBA_AGENCY_ID` | `40` | agency whose routes are served |
    /// | `OBA_MAX_RETRIES` | `3` | transient retry bound |
    /// | `OBA_RETRY_DELAY_MS` | `250` | base retry backoff |
    /// | `ARRIVAL_HORIZON_MINUTES` | `60` | arrivals window |
    /// | `BATCH_WIDTH` | `5` | concurrent per-stop lookups |
    /// | `BATCH_DELAY_MS` | `500` | inter-batch pause |
    /// | `CACHE_BACKEND` | `memory` | `memory` \| `redis` \| `none` |
    /// | `REDIS_URL` | unset | required when the backend is `redis` |
    /// | `CACHE_TTL_SECS` | 300 (memory) / 120 (redis) | snapshot TTL |
    /// | `SINGLE_FLIGHT` | `false` | de-duplicate concurrent misses |
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] when a variable is set but does not parse,
    /// or when `CACHE_BACKEND=redis` is selected without a `REDIS_URL`.
    pub fn from_env() -> Result<Self, ConfigError> {
        let host = std::env::var("HOST").unwrap_or_else(|_| String::from("0.0.0.0"));
        let port = parsed_var("PORT", 3000_u16)?;

        let oba_defaults = ObaConfig::default();
        let upstream = ObaConfig {
            base_url: std::env::var("OBA_BASE_URL").unwrap_or(oba_defaults.base_url),
            api_key: std::env::var("OBA_API_KEY").unwrap_or(oba_defaults.api_key),
            max_retries: parsed_var("OBA_MAX_RETRIES", oba_defaults.max_retries)?,
            retry_delay: Duration::from_millis(parsed_var("OBA_RETRY_DELAY_MS", 250_u64)?),
        };

        let aggregator = AggregatorConfig {
            agency_id: std::env::var("OBA_AGENCY_ID").unwrap_or_else(|_| String::from("40")),
            horizon_minutes: parsed_var("ARRIVAL_HORIZON_MINUTES", 60_u32)?,
            batch: BatchPolicy {
                width: parsed_var("BATCH_WIDTH", 5_usize)?,
                delay: Duration::from_millis(parsed_var("BATCH_DELAY_MS", 500_u64)?),
            },
        };

        let cache = load_cache_config()?;
        let single_flight = parsed_var("SINGLE_FLIGHT", false)?;

        Ok(Self {
            host,
            port,
            upstream,
            aggregator,
            cache,
            single_flight,
        })
    }
}

/// Read an optional environment variable, parsing it when present.
fn parsed_var<T>(name: &str, default: T) -> Result<T, ConfigError>
where
    T: std::str::FromStr,
    T::Err: std::fmt::Display,
{
    match std::env::var(name) {
        Ok(raw) => raw
            .parse()
            .map_err(|e| ConfigError(format!("invalid {name}: {e}"))),
        Err(_) => Ok(default),
    }
}

/// Map the `CACHE_BACKEND` value onto a backend selection.
fn parse_backend(raw: &str) -> Result<CacheBackend, ConfigError> {
    match raw.to_lowercase().as_str() {
        "memory" => Ok(CacheBackend::Memory),
        "redis" => Ok(CacheBackend::Redis),
        "none" | "disabled" => Ok(CacheBackend::None),
        other => Err(ConfigError(format!("unknown cache backend: {other}"))),
    }
}

/// Assemble the cache configuration, resolving the per-backend TTL default.
fn load_cache_config() -> Result<CacheConfig, ConfigError> {
    let backend = match std::env::var("CACHE_BACKEND") {
        Ok(raw) => parse_backend(&raw)?,
        Err(_) => CacheBackend::Memory,
    };

    let redis_url = std::env::var("REDIS_URL").ok();
    if backend == CacheBackend::Redis && redis_url.is_none() {
        return Err(ConfigError(String::from(
            "CACHE_BACKEND=redis requires REDIS_URL",
        )));
    }

    let default_ttl = match backend {
        CacheBackend::Memory => DEFAULT_MEMORY_TTL_SECS,
        CacheBackend::Redis => DEFAULT_REDIS_TTL_SECS,
        CacheBackend::None => 0,
    };
    let ttl = Duration::from_secs(parsed_var("CACHE_TTL_SECS", default_ttl)?);

    Ok(CacheConfig {
        backend,
        redis_url,
        ttl,
    })
}

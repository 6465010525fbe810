//! Shared application state for the HTTP front.

use linkboard_cache::SnapshotCache;
use linkboard_core::RouteAggregator;
use tokio::sync::Mutex;

/// Shared state for the Axum application.
///
/// Wrapped in an `Arc` and injected via Axum's `State` extractor. Generic
/// over the transit source so integration tests can substitute a scripted
/// one for the real client.
pub struct AppState<S> {
    /// The aggregation pipeline.
    pub aggregator: RouteAggregator<S>,
    /// The snapshot cache read on every request.
    pub cache: SnapshotCache,
    /// Present when single-flight de-duplication is enabled: concurrent
    /// cache misses serialize here and re-check the cache before
    /// recomputing.
    pub refresh_gate: Option<Mutex<()>>,
}

impl<S> AppState<S> {
    /// Assemble the application state.
    #[must_use]
    pub const fn new(
        aggregator: RouteAggregator<S>,
        cache: SnapshotCache,
        single_flight: bool,
    ) -> Self {
        Self {
            aggregator,
            cache,
            refresh_gate: if single_flight {
                Some(Mutex::const_new(()))
            } else {
                None
            },
        }
    }
}

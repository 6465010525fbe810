//! Snapshot cache layer for the linkboard arrivals service.
//!
//! The aggregated [`RouteBoard`] is expensive to rebuild (dozens of
//! throttled upstream calls), so the HTTP front reads it through this
//! layer. Two interchangeable backends sit behind one facade: an
//! in-process slot with a read-time TTL, and a Redis-compatible store
//! whose native expiry owns the TTL. Exactly one fresh snapshot exists at
//! a time; writes replace it wholesale and never merge.
//!
//! Backend faults are absorbed here: a failed read is a miss, a failed
//! write is logged and dropped. A broken store degrades the service to
//! recomputing, never to erroring.
//!
//! Enum dispatch rather than trait objects, since the backend methods are
//! async.

pub mod error;
pub mod memory;
pub mod redis;

pub use error::CacheError;
pub use memory::MemoryCache;
pub use redis::RedisCache;

use linkboard_types::RouteBoard;
use tracing::warn;

/// The snapshot cache facade the HTTP front talks to.
pub enum SnapshotCache {
    /// Process-memory backend with a read-time TTL.
    Memory(MemoryCache),
    /// External Redis-compatible backend with store-native expiry.
    Redis(RedisCache),
    /// Caching disabled: every read misses, every write is dropped.
    Disabled,
}

impl SnapshotCache {
    /// Read the current snapshot if a fresh one exists.
    ///
    /// Backend errors are logged and reported as a miss so a broken store
    /// never fails the request; the caller falls through to aggregation.
    pub async fn get(&self) -> Option<RouteBoard> {
        match self {
            Self::Memory(cache) => cache.get().await,
            Self::Redis(cache) => match cache.get().await {
                Ok(found) => found,
                Err(e) => {
                    warn!(error = %e, "cache read failed, treating as miss");
                    None
                }
            },
            Self::Disabled => None,
        }
    }

    /// Publish a fresh snapshot, replacing the previous one wholesale.
    ///
    /// Best-effort: backend errors are logged and swallowed.
    pub async fn put(&self, board: &RouteBoard) {
        match self {
            Self::Memory(cache) => cache.put(board).await,
            Self::Redis(cache) => {
                if let Err(e) = cache.put(board).await {
                    warn!(error = %e, "cache write failed, snapshot not persisted");
                }
            }
            Self::Disabled => {}
        }
    }

    /// Human-readable backend name for startup logging.
    #[must_use]
    pub const fn backend_name(&self) -> &'static str {
        match self {
            Self::Memory(_) => "memory",
            Self::Redis(_) => "redis",
            Self::Disabled => "disabled",
        }
    }
}

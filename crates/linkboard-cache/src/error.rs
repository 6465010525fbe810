//! Error types for the snapshot cache backends.
//!
//! These never reach a request handler: the [`SnapshotCache`](crate::SnapshotCache)
//! facade logs them and degrades to a miss.

/// Errors that can occur in a cache backend.
#[derive(Debug, thiserror::Error)]
pub enum CacheError {
    /// The Redis-compatible store failed.
    #[error("cache store error: {0}")]
    Store(#[from] fred::error::Error),

    /// Snapshot serialization or deserialization failed.
    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// The cache configuration is invalid.
    #[error("configuration error: {0}")]
    Config(String),
}

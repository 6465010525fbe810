//! In-process snapshot cache with a read-time TTL.

use std::time::Duration;

use tokio::sync::RwLock;
use tokio::time::Instant;

use linkboard_types::RouteBoard;

/// A stored snapshot and the moment it was captured.
#[derive(Debug)]
struct Entry {
    board: RouteBoard,
    stored_at: Instant,
}

/// In-memory backend: a single slot whose freshness is checked at read
/// time against the configured TTL. Concurrent reads share the lock;
/// writes replace the slot wholesale (last writer wins).
#[derive(Debug)]
pub struct MemoryCache {
    ttl: Duration,
    slot: RwLock<Option<Entry>>,
}

impl MemoryCache {
    /// Create an empty cache with the given time-to-live.
    #[must_use]
    pub const fn new(ttl: Duration) -> Self {
        Self {
            ttl,
            slot: RwLock::const_new(None),
        }
    }

    /// Return the snapshot while it is still fresh. A stale entry stays in
    /// the slot until the next write; only the read-time comparison decides
    /// freshness.
    pub async fn get(&self) -> Option<RouteBoard> {
        let slot = self.slot.read().await;
        slot.as_ref()
            .filter(|entry| entry.stored_at.elapsed() < self.ttl)
            .map(|entry| entry.board.clone())
    }

    /// Replace the snapshot wholesale and restart the TTL window.
    pub async fn put(&self, board: &RouteBoard) {
        let mut slot = self.slot.write().await;
        *slot = Some(Entry {
            board: board.clone(),
            stored_at: Instant::now(),
        });
    }
}

//! Redis-compatible snapshot cache with store-native expiry.
//!
//! The board is serialized to JSON and written under a single fixed key
//! with `SET ... EX`, so the store itself retires stale snapshots and a
//! read needs no freshness bookkeeping: key present means fresh.
//!
//! # Key Pattern
//!
//! | Key | Type | Description |
//! |-----|------|-------------|
//! | `linkboard:routes` | JSON string | The complete formatted board |

use fred::prelude::*;
use fred::types::Expiration;

use linkboard_types::RouteBoard;

use crate::error::CacheError;

/// Key the snapshot is stored under.
const SNAPSHOT_KEY: &str = "linkboard:routes";

/// Connection handle to a Redis-compatible store.
#[derive(Clone)]
pub struct RedisCache {
    client: Client,
    ttl_secs: i64,
}

impl RedisCache {
    /// Connect to the store at the given URL.
    ///
    /// The URL follows the Redis URL scheme: `redis://host:port` or
    /// `redis://host:port/db`.
    ///
    /// # Errors
    ///
    /// Returns [`CacheError::Config`] if the URL cannot be parsed and
    /// [`CacheError::Store`] if the connection fails.
    pub async fn connect(url: &str, ttl_secs: i64) -> Result<Self, CacheError> {
        let config = Config::from_url(url)
            .map_err(|e| CacheError::Config(format!("invalid cache store URL: {e}")))?;

        let client = Builder::from_config(config).build()?;
        client.init().await?;

        tracing::info!(ttl_secs, "connected to snapshot cache store");
        Ok(Self { client, ttl_secs })
    }

    /// Read and deserialize the snapshot.
    ///
    /// `None` means the key is absent or the store already expired it.
    ///
    /// # Errors
    ///
    /// Returns [`CacheError::Store`] if the read fails and
    /// [`CacheError::Serialization`] if the stored text does not parse.
    pub async fn get(&self) -> Result<Option<RouteBoard>, CacheError> {
        let value: Option<String> = self.client.get(SNAPSHOT_KEY).await?;
        value
            .map(|text| serde_json::from_str(&text).map_err(CacheError::from))
            .transpose()
    }

    /// Serialize and store the snapshot, delegating expiry to the store.
    ///
    /// # Errors
    ///
    /// Returns [`CacheError::Serialization`] if serialization fails and
    /// [`CacheError::Store`] if the write fails.
    pub async fn put(&self, board: &RouteBoard) -> Result<(), CacheError> {
        let json = serde_json::to_string(board)?;
        let _: () = self
            .client
            .set(
                SNAPSHOT_KEY,
                json.as_str(),
                Some(Expiration::EX(self.ttl_secs)),
                None,
                false,
            )
            .await?;
        Ok(())
    }
}

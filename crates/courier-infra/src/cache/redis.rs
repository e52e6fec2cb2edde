//! Redis snapshot cache.
//!
//! Plain `GET`/`SET`/`DEL` with no expiry. The `ConnectionManager` is cloned
//! per call (it is a cheap handle over one multiplexed connection) and
//! reconnects on its own after a dropped connection.

use courier_core::storage::snapshot_cache::SnapshotCache;
use courier_types::error::CacheError;
use redis::AsyncCommands;
use redis::aio::ConnectionManager;

/// Redis-backed implementation of `SnapshotCache`.
#[derive(Clone)]
pub struct RedisSnapshotCache {
    conn: ConnectionManager,
}

impl RedisSnapshotCache {
    /// Open a managed connection to `url` and verify it with `PING`.
    pub async fn connect(url: &str) -> Result<Self, CacheError> {
        let client = redis::Client::open(url).map_err(unavailable)?;
        let mut conn = ConnectionManager::new(client).await.map_err(unavailable)?;

        let pong: String = redis::cmd("PING")
            .query_async(&mut conn)
            .await
            .map_err(unavailable)?;
        tracing::info!(reply = %pong, "Connected to Redis");

        Ok(Self { conn })
    }
}

fn unavailable(e: redis::RedisError) -> CacheError {
    CacheError::Unavailable(e.to_string())
}

impl SnapshotCache for RedisSnapshotCache {
    async fn get(&self, key: &str) -> Result<Option<String>, CacheError> {
        let mut conn = self.conn.clone();
        conn.get(key).await.map_err(unavailable)
    }

    async fn set(&self, key: &str, value: &str) -> Result<(), CacheError> {
        let mut conn = self.conn.clone();
        let _: () = conn.set(key, value).await.map_err(unavailable)?;
        Ok(())
    }

    async fn delete(&self, key: &str) -> Result<(), CacheError> {
        let mut conn = self.conn.clone();
        // DEL reports how many keys it removed; zero is fine.
        let _: i64 = conn.del(key).await.map_err(unavailable)?;
        Ok(())
    }
}

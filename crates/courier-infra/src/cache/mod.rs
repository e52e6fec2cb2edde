//! Snapshot cache backends.
//!
//! Redis in deployment; an in-process map when no cache URL is configured.
//! `CacheBackend` picks one at startup so the message service can stay
//! generic over a single concrete type.

pub mod memory;
pub mod redis;

use courier_core::storage::snapshot_cache::SnapshotCache;
use courier_types::error::CacheError;

use self::memory::MemorySnapshotCache;
use self::redis::RedisSnapshotCache;

/// The configured snapshot cache.
pub enum CacheBackend {
    Redis(RedisSnapshotCache),
    Memory(MemorySnapshotCache),
}

impl CacheBackend {
    /// Connect to Redis when `url` is set, otherwise use the in-process cache.
    pub async fn connect(url: Option<&str>) -> Result<Self, CacheError> {
        match url {
            Some(url) => Ok(CacheBackend::Redis(RedisSnapshotCache::connect(url).await?)),
            None => {
                tracing::info!("No cache URL configured, using in-process cache");
                Ok(CacheBackend::Memory(MemorySnapshotCache::new()))
            }
        }
    }

    pub fn kind(&self) -> &'static str {
        match self {
            CacheBackend::Redis(_) => "redis",
            CacheBackend::Memory(_) => "memory",
        }
    }

    /// Whether other processes see this cache. Only then may a process
    /// other than the API server write to the store directly.
    pub fn is_shared(&self) -> bool {
        matches!(self, CacheBackend::Redis(_))
    }
}

impl SnapshotCache for CacheBackend {
    async fn get(&self, key: &str) -> Result<Option<String>, CacheError> {
        match self {
            CacheBackend::Redis(cache) => cache.get(key).await,
            CacheBackend::Memory(cache) => cache.get(key).await,
        }
    }

    async fn set(&self, key: &str, value: &str) -> Result<(), CacheError> {
        match self {
            CacheBackend::Redis(cache) => cache.set(key, value).await,
            CacheBackend::Memory(cache) => cache.set(key, value).await,
        }
    }

    async fn delete(&self, key: &str) -> Result<(), CacheError> {
        match self {
            CacheBackend::Redis(cache) => cache.delete(key).await,
            CacheBackend::Memory(cache) => cache.delete(key).await,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_no_url_selects_memory() {
        let cache = CacheBackend::connect(None).await.unwrap();
        assert_eq!(cache.kind(), "memory");
        assert!(!cache.is_shared());

        cache.set("k", "v").await.unwrap();
        assert_eq!(cache.get("k").await.unwrap().as_deref(), Some("v"));
        cache.delete("k").await.unwrap();
        assert!(cache.get("k").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_invalid_redis_url_is_unavailable() {
        let result = CacheBackend::connect(Some("not-a-redis-url")).await;
        assert!(matches!(result, Err(CacheError::Unavailable(_))));
    }
}

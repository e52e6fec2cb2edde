//! In-process snapshot cache.

use courier_core::storage::snapshot_cache::SnapshotCache;
use courier_types::error::CacheError;
use dashmap::DashMap;

/// `SnapshotCache` over a concurrent hash map. Never fails.
#[derive(Debug, Default)]
pub struct MemorySnapshotCache {
    entries: DashMap<String, String>,
}

impl MemorySnapshotCache {
    pub fn new() -> Self {
        Self::default()
    }
}

impl SnapshotCache for MemorySnapshotCache {
    async fn get(&self, key: &str) -> Result<Option<String>, CacheError> {
        Ok(self.entries.get(key).map(|v| v.value().clone()))
    }

    async fn set(&self, key: &str, value: &str) -> Result<(), CacheError> {
        self.entries.insert(key.to_string(), value.to_string());
        Ok(())
    }

    async fn delete(&self, key: &str) -> Result<(), CacheError> {
        self.entries.remove(key);
        Ok(())
    }
}

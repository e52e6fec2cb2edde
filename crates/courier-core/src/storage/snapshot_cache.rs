//! Snapshot cache trait.
//!
//! A string key-value layer with explicit invalidation and no TTL: an entry
//! lives until it is deleted. Implementations live in courier-infra.

use courier_types::error::CacheError;

/// Trait for the key-value cache holding serialized snapshots.
pub trait SnapshotCache: Send + Sync {
    /// Get a value by key. Returns None if the key does not exist.
    fn get(
        &self,
        key: &str,
    ) -> impl std::future::Future<Output = Result<Option<String>, CacheError>> + Send;

    /// Set a value for a key (overwrite).
    fn set(
        &self,
        key: &str,
        value: &str,
    ) -> impl std::future::Future<Output = Result<(), CacheError>> + Send;

    /// Delete a key. No-op if key does not exist.
    fn delete(&self, key: &str)
    -> impl std::future::Future<Output = Result<(), CacheError>> + Send;
}

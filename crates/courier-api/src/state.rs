//! Application state shared across CLI commands, the REST API and the bot.
//!
//! AppState holds the message service wired to its concrete storage and
//! cache adapters. It is created once at startup and passed to all handlers.

use std::path::Path;
use std::sync::Arc;

use anyhow::Context;
use chrono::FixedOffset;

use courier_core::message::service::MessageService;
use courier_infra::cache::CacheBackend;
use courier_infra::sqlite::message::SqliteMessageStore;
use courier_infra::sqlite::pool::{DatabasePool, database_url_in};
use courier_types::config::CourierConfig;

/// Concrete type alias for the message service with infra implementations.
pub type ConcreteMessageService = MessageService<SqliteMessageStore, CacheBackend>;

/// Shared application state.
#[derive(Clone)]
pub struct AppState {
    pub message_service: Arc<ConcreteMessageService>,
    pub db_pool: DatabasePool,
}

impl AppState {
    /// Connect storage and cache as configured and wire the message service.
    ///
    /// Without an explicit `database_url` the database lives in
    /// `{data_dir}/courier.db`. A configured cache that cannot be reached
    /// fails startup.
    pub async fn init(config: &CourierConfig, data_dir: &Path) -> anyhow::Result<Self> {
        let zone = utc_offset(config.utc_offset_hours)?;

        let database_url = match &config.database_url {
            Some(url) => url.clone(),
            None => {
                tokio::fs::create_dir_all(data_dir)
                    .await
                    .with_context(|| format!("failed to create {}", data_dir.display()))?;
                database_url_in(data_dir)
            }
        };

        let db_pool = DatabasePool::new(&database_url)
            .await
            .context("failed to open message database")?;

        let cache = CacheBackend::connect(config.cache_url.as_deref())
            .await
            .context("failed to connect to snapshot cache")?;

        tracing::info!(cache = cache.kind(), zone = %zone, "Message service ready");

        Ok(Self::from_parts(db_pool, cache, zone))
    }

    /// Wire the service from already connected adapters.
    pub fn from_parts(db_pool: DatabasePool, cache: CacheBackend, zone: FixedOffset) -> Self {
        let store = SqliteMessageStore::new(db_pool.clone());
        Self {
            message_service: Arc::new(MessageService::new(store, cache, zone)),
            db_pool,
        }
    }

    pub async fn shutdown(&self) {
        self.db_pool.close().await;
    }
}

/// Fixed UTC offset for stamping message times.
pub fn utc_offset(hours: i32) -> anyhow::Result<FixedOffset> {
    hours
        .checked_mul(3600)
        .and_then(FixedOffset::east_opt)
        .with_context(|| format!("invalid UTC offset: {hours} hours"))
}

/// State over a throwaway SQLite file and the in-process cache.
#[cfg(test)]
pub(crate) async fn test_state() -> (AppState, tempfile::TempDir) {
    use courier_infra::cache::memory::MemorySnapshotCache;

    let tmp = tempfile::TempDir::new().unwrap();
    let pool = DatabasePool::new(&database_url_in(tmp.path())).await.unwrap();
    let state = AppState::from_parts(
        pool,
        CacheBackend::Memory(MemorySnapshotCache::new()),
        utc_offset(3).unwrap(),
    );
    (state, tmp)
}

//! Message service orchestrating read-through caching and write invalidation.
//!
//! Reads try the snapshot cache first and fall back to the store, then
//! repopulate the cache. Writes stamp the server-side timestamp, insert into
//! the store, and delete the snapshot before acknowledging.
//!
//! No locking serializes concurrent calls; double invalidation is a no-op.
//! A read that loaded the store before a concurrent append can write its
//! snapshot after that append's delete. Such a stale snapshot is served
//! until the next append invalidates it, since snapshots carry no expiry.

use std::sync::Arc;

use chrono::FixedOffset;
use courier_types::error::MessageError;
use courier_types::message::{
    Message, NewMessage, SNAPSHOT_KEY, STORE_READ_LIMIT, TIMESTAMP_FORMAT,
};
use tracing::{error, info, warn};

use crate::clock::{Clock, SystemClock};
use crate::message::snapshot::{decode_snapshot, encode_snapshot};
use crate::storage::message_store::MessageStore;
use crate::storage::snapshot_cache::SnapshotCache;

/// Orchestrates the message store and the snapshot cache.
///
/// Generic over `MessageStore` and `SnapshotCache` to maintain clean
/// architecture (courier-core never depends on courier-infra). The store and
/// cache handles are owned by the service and released when it is dropped.
pub struct MessageService<S: MessageStore, C: SnapshotCache> {
    store: S,
    cache: C,
    zone: FixedOffset,
    clock: Arc<dyn Clock>,
}

impl<S: MessageStore, C: SnapshotCache> MessageService<S, C> {
    /// Create a new service stamping timestamps in `zone` with the system clock.
    pub fn new(store: S, cache: C, zone: FixedOffset) -> Self {
        Self {
            store,
            cache,
            zone,
            clock: Arc::new(SystemClock),
        }
    }

    /// Replace the clock (tests pin time with this).
    pub fn with_clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.clock = clock;
        self
    }

    /// Access the message store.
    pub fn store(&self) -> &S {
        &self.store
    }

    /// Access the snapshot cache.
    pub fn cache(&self) -> &C {
        &self.cache
    }

    /// List up to `STORE_READ_LIMIT` messages in insertion order.
    ///
    /// Cache failures of any kind degrade to a store read; only a store
    /// failure is returned to the caller.
    pub async fn list_messages(&self) -> Result<Vec<Message>, MessageError> {
        match self.cache.get(SNAPSHOT_KEY).await {
            Ok(Some(payload)) => match decode_snapshot(&payload) {
                Ok(messages) => {
                    info!(count = messages.len(), "Messages served from cache");
                    return Ok(messages);
                }
                Err(e) => warn!(error = %e, "Discarding unreadable cache snapshot"),
            },
            Ok(None) => info!("Cache empty, reading messages from store"),
            Err(e) => warn!(error = %e, "Cache read failed, reading messages from store"),
        }

        let messages = self
            .store
            .list_recent(STORE_READ_LIMIT)
            .await
            .inspect_err(|e| error!(error = %e, "Failed to read messages from store"))?;

        match encode_snapshot(&messages) {
            Ok(payload) => match self.cache.set(SNAPSHOT_KEY, &payload).await {
                Ok(()) => info!(count = messages.len(), "Messages cached"),
                Err(e) => warn!(error = %e, "Failed to cache messages, cache stays cold"),
            },
            Err(e) => warn!(error = %e, "Failed to encode message snapshot"),
        }

        Ok(messages)
    }

    /// Validate, stamp and store a message, then invalidate the snapshot.
    ///
    /// Returns the stored record. A failed invalidation is reported as a
    /// storage error: the record is committed but the write is not
    /// acknowledged.
    pub async fn append_message(&self, new: NewMessage) -> Result<Message, MessageError> {
        validate(&new)?;

        let message = Message {
            username: new.username,
            text: new.text,
            timestamp: self.stamp(),
        };

        info!(
            username = %message.username,
            timestamp = %message.timestamp,
            "Saving message"
        );

        self.store
            .insert(&message)
            .await
            .inspect_err(|e| error!(error = %e, "Failed to insert message"))?;

        self.cache.delete(SNAPSHOT_KEY).await.map_err(|e| {
            error!(error = %e, "Message stored but cache invalidation failed");
            MessageError::Storage(format!(
                "message stored but cache invalidation failed: {e}"
            ))
        })?;
        info!("Message cache invalidated");

        Ok(message)
    }

    /// Current time in the service zone, second precision.
    fn stamp(&self) -> String {
        self.clock
            .now()
            .with_timezone(&self.zone)
            .format(TIMESTAMP_FORMAT)
            .to_string()
    }
}

/// Reject empty (or whitespace-only) fields before any store mutation.
fn validate(new: &NewMessage) -> Result<(), MessageError> {
    if new.username.trim().is_empty() {
        return Err(MessageError::Validation(
            "username must not be empty".to_string(),
        ));
    }
    if new.text.trim().is_empty() {
        return Err(MessageError::Validation("text must not be empty".to_string()));
    }
    Ok(())
}

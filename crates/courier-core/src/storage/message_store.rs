//! Message store trait definition.
//!
//! The store is an append-only collection of message documents. It has no
//! update or delete operation; insertion order is the only ordering.

use courier_types::error::RepositoryError;
use courier_types::message::Message;

/// Repository trait for message persistence.
///
/// Uses native async fn in traits (Rust 2024 edition, no async_trait macro).
pub trait MessageStore: Send + Sync {
    /// Append a message to the collection.
    fn insert(
        &self,
        message: &Message,
    ) -> impl std::future::Future<Output = Result<(), RepositoryError>> + Send;

    /// The `limit` most recently inserted messages, oldest first.
    fn list_recent(
        &self,
        limit: u32,
    ) -> impl std::future::Future<Output = Result<Vec<Message>, RepositoryError>> + Send;
}

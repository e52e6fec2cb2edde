//! SQLite message store implementation.
//!
//! Implements `MessageStore` from `courier-core` using sqlx with split read/write pools.
//! Each message is stored as a schemaless JSON document; the autoincrement
//! rowid records insertion order.

use courier_core::storage::message_store::MessageStore;
use courier_types::error::RepositoryError;
use courier_types::message::Message;
use sqlx::Row;

use super::pool::DatabasePool;

/// SQLite-backed implementation of `MessageStore`.
#[derive(Clone)]
pub struct SqliteMessageStore {
    pool: DatabasePool,
}

impl SqliteMessageStore {
    /// Create a new message store backed by the given database pool.
    pub fn new(pool: DatabasePool) -> Self {
        Self { pool }
    }

    pub fn pool(&self) -> &DatabasePool {
        &self.pool
    }
}

impl MessageStore for SqliteMessageStore {
    async fn insert(&self, message: &Message) -> Result<(), RepositoryError> {
        let document = serde_json::to_string(message)
            .map_err(|e| RepositoryError::Query(format!("failed to serialize message: {e}")))?;

        sqlx::query("INSERT INTO messages (document) VALUES (?)")
            .bind(&document)
            .execute(&self.pool.writer)
            .await
            .map_err(map_sqlx_error)?;

        Ok(())
    }

    async fn list_recent(&self, limit: u32) -> Result<Vec<Message>, RepositoryError> {
        let rows = sqlx::query(
            r#"SELECT document FROM (
                   SELECT id, document FROM messages ORDER BY id DESC LIMIT ?
               ) ORDER BY id ASC"#,
        )
        .bind(i64::from(limit))
        .fetch_all(&self.pool.reader)
        .await
        .map_err(map_sqlx_error)?;

        let mut messages = Vec::with_capacity(rows.len());
        for row in &rows {
            let document: String = row
                .try_get("document")
                .map_err(|e| RepositoryError::Query(e.to_string()))?;
            let message: Message = serde_json::from_str(&document)
                .map_err(|e| RepositoryError::Query(format!("invalid message document: {e}")))?;
            messages.push(message);
        }

        Ok(messages)
    }
}

fn map_sqlx_error(e: sqlx::Error) -> RepositoryError {
    match e {
        sqlx::Error::PoolClosed | sqlx::Error::PoolTimedOut | sqlx::Error::Io(_) => {
            RepositoryError::Connection(e.to_string())
        }
        other => RepositoryError::Query(other.to_string()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sqlite::pool::database_url_in;

    async fn test_store() -> (SqliteMessageStore, tempfile::TempDir) {
        let dir = tempfile::tempdir().unwrap();
        let pool = DatabasePool::new(&database_url_in(dir.path())).await.unwrap();
        (SqliteMessageStore::new(pool), dir)
    }

    fn message(username: &str, text: &str, second: u32) -> Message {
        Message {
            username: username.to_string(),
            text: text.to_string(),
            timestamp: format!("2024-05-01 09:00:{second:02}"),
        }
    }

    #[tokio::test]
    async fn test_insert_then_list_in_insertion_order() {
        let (store, _dir) = test_store().await;

        store.insert(&message("alice", "first", 0)).await.unwrap();
        store.insert(&message("bob", "second", 1)).await.unwrap();
        store.insert(&message("alice", "third", 2)).await.unwrap();

        let messages = store.list_recent(100).await.unwrap();
        let texts: Vec<&str> = messages.iter().map(|m| m.text.as_str()).collect();
        assert_eq!(texts, vec!["first", "second", "third"]);
        assert_eq!(messages[1], message("bob", "second", 1));
    }

    #[tokio::test]
    async fn test_list_empty() {
        let (store, _dir) = test_store().await;
        assert!(store.list_recent(100).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_list_keeps_most_recent_window_oldest_first() {
        let (store, _dir) = test_store().await;
        for i in 0..7 {
            store
                .insert(&message("alice", &format!("m{i}"), i))
                .await
                .unwrap();
        }

        let messages = store.list_recent(3).await.unwrap();
        let texts: Vec<&str> = messages.iter().map(|m| m.text.as_str()).collect();
        assert_eq!(texts, vec!["m4", "m5", "m6"]);
    }

    #[tokio::test]
    async fn test_documents_are_schemaless() {
        let (store, _dir) = test_store().await;
        sqlx::query("INSERT INTO messages (document) VALUES (?)")
            .bind(r#"{"username":"carol","text":"hi","timestamp":"2024-05-01 09:00:00","source":"import"}"#)
            .execute(&store.pool().writer)
            .await
            .unwrap();

        let messages = store.list_recent(100).await.unwrap();
        assert_eq!(messages, vec![message("carol", "hi", 0)]);
    }

    #[tokio::test]
    async fn test_invalid_document_is_query_error() {
        let (store, _dir) = test_store().await;
        sqlx::query("INSERT INTO messages (document) VALUES ('not json')")
            .execute(&store.pool().writer)
            .await
            .unwrap();

        let err = store.list_recent(100).await.unwrap_err();
        assert!(matches!(err, RepositoryError::Query(_)));
    }

    #[tokio::test]
    async fn test_closed_pool_is_connection_error() {
        let (store, _dir) = test_store().await;
        store.pool().close().await;

        let err = store.insert(&message("alice", "late", 0)).await.unwrap_err();
        assert!(matches!(err, RepositoryError::Connection(_)));
    }
}

//! Serialization of the cached "all messages" snapshot.

use courier_types::error::CacheError;
use courier_types::message::Message;

/// Serialize a message list into the cache payload.
pub fn encode_snapshot(messages: &[Message]) -> Result<String, CacheError> {
    serde_json::to_string(messages)
        .map_err(|e| CacheError::Corrupt(format!("failed to serialize snapshot: {e}")))
}

/// Deserialize a cache payload. A payload that is not a message array is
/// `CacheError::Corrupt`.
pub fn decode_snapshot(payload: &str) -> Result<Vec<Message>, CacheError> {
    serde_json::from_str(payload).map_err(|e| CacheError::Corrupt(e.to_string()))
}

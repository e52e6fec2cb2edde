use thiserror::Error;

/// Errors surfaced by the message service to its callers.
#[derive(Debug, Error)]
pub enum MessageError {
    #[error("validation error: {0}")]
    Validation(String),

    #[error("storage error: {0}")]
    Storage(String),
}

/// Errors from the persistent message store.
#[derive(Debug, Error)]
pub enum RepositoryError {
    #[error("database connection error: {0}")]
    Connection(String),

    #[error("query error: {0}")]
    Query(String),
}

impl From<RepositoryError> for MessageError {
    fn from(e: RepositoryError) -> Self {
        MessageError::Storage(e.to_string())
    }
}

/// Errors from the snapshot cache. Never surfaced past the message service.
#[derive(Debug, Error)]
pub enum CacheError {
    #[error("cache unavailable: {0}")]
    Unavailable(String),

    #[error("corrupt cache payload: {0}")]
    Corrupt(String),
}

/// Errors from the HTTP client the bot uses to reach the message service.
#[derive(Debug, Error)]
pub enum ClientError {
    #[error("could not reach message service: {0}")]
    Transport(String),

    #[error("message service returned HTTP {status}: {body}")]
    Status { status: u16, body: String },

    #[error("invalid response from message service: {0}")]
    Decode(String),
}

/// Errors from the chat platform transport.
#[derive(Debug, Error)]
pub enum TransportError {
    #[error("chat platform request failed: {0}")]
    Request(String),

    #[error("chat platform rejected call: {0}")]
    Rejected(String),
}

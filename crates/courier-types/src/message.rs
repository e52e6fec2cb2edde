//! Message record types for Courier.
//!
//! A `Message` is an immutable record of who said what and when. The
//! timestamp is a civil time string stamped by the service at insert time;
//! clients only ever submit a `NewMessage`.

use serde::{Deserialize, Serialize};

/// strftime layout of `Message::timestamp` (second precision, no offset).
pub const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// Cache key under which the serialized message snapshot lives.
pub const SNAPSHOT_KEY: &str = "messages";

/// Maximum number of records a single store read returns.
pub const STORE_READ_LIMIT: u32 = 100;

/// Number of messages shown per page by the bot.
pub const PAGE_SIZE: usize = 5;

/// A stored message.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Message {
    /// Author identifier as supplied by the client (free text).
    pub username: String,
    /// Message body.
    pub text: String,
    /// Creation time formatted with [`TIMESTAMP_FORMAT`] in the service zone.
    pub timestamp: String,
}

/// Client payload for appending a message.
///
/// Missing fields deserialize as empty strings so that they are rejected by
/// validation rather than by the JSON extractor.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewMessage {
    #[serde(default)]
    pub username: String,
    #[serde(default)]
    pub text: String,
}

impl NewMessage {
    pub fn new(username: impl Into<String>, text: impl Into<String>) -> Self {
        Self {
            username: username.into(),
            text: text.into(),
        }
    }
}

/// One page of the ordered message list, as seen by the bot.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MessagePage {
    /// Zero-based page index.
    pub page: usize,
    /// Messages on this page (at most `PAGE_SIZE`).
    pub messages: Vec<Message>,
    /// Size of the full result, not of the page.
    pub total: usize,
}

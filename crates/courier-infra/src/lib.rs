//! Infrastructure layer for Courier.
//!
//! Contains implementations of the ports defined in `courier-core`: the
//! SQLite message store, the Redis and in-memory snapshot caches, the HTTP
//! client for the message service, the Telegram Bot API client, and the
//! configuration file loader.

pub mod cache;
pub mod client;
pub mod config;
pub mod sqlite;
pub mod telegram;

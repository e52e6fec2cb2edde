//! Storage abstractions for Courier.
//!
//! Defines the persistent message store and the snapshot cache.
//! Implementations live in courier-infra.

pub mod message_store;
pub mod snapshot_cache;

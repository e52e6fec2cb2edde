//! Shared domain types for Courier.
//!
//! This crate contains the core domain types used across the Courier relay:
//! Message, the conversation state of the bot front end, configuration, and
//! the typed error taxonomy.
//!
//! Zero infrastructure dependencies -- only serde, chrono, thiserror.

pub mod config;
pub mod conversation;
pub mod error;
pub mod message;

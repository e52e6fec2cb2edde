//! Business logic and port trait definitions for Courier.
//!
//! This crate defines the "ports" (store, cache, message API, session store)
//! that the infrastructure layer implements, together with the message
//! service and the bot dialogue. It depends only on `courier-types` -- never
//! on `courier-infra` or any database/IO crate.

pub mod bot;
pub mod clock;
pub mod message;
pub mod storage;

//! Chat-bot front end logic, independent of the chat platform.
//!
//! The bot reaches the message service only through [`api::MessageApi`],
//! keeps per-conversation state in a [`session::SessionStore`], and turns
//! incoming events into platform-neutral replies in [`dialogue::Dialogue`].

pub mod api;
pub mod dialogue;
pub mod session;

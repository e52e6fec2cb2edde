//! Telegram Bot API transport for the bot front end.

pub mod client;
pub mod types;

pub use client::TelegramClient;

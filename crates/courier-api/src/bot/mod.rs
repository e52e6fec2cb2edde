//! Telegram front end: translates Bot API updates into dialogue events.

pub mod runner;

pub use runner::run_bot;

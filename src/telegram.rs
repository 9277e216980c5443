//! Telegram transport
//!
//! Bot API adapter for the runtime's `Transport` trait, plus the long-poll
//! loop that supplies inbound events.

mod client;
mod poller;
pub mod types;

pub use client::TelegramClient;
pub use poller::UpdatePoller;

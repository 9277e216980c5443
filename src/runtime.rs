//! Runtime for dispatching inbound chat events
//!
//! Wires the pure router to the task store and an outbound transport.

mod executor;
pub mod traits;

#[cfg(test)]
pub mod testing;

pub use executor::{BotRuntime, DispatchError};
pub use traits::*;

use crate::telegram::TelegramClient;
use std::sync::Arc;

/// Type alias for production runtime with the Telegram transport
pub type ProductionRuntime = BotRuntime<Arc<TelegramClient>>;

/// Buffer between the event source and the runtime
pub const EVENT_CHANNEL_CAPACITY: usize = 32;

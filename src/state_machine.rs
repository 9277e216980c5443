//! Conversation router
//!
//! Implements the Elm Architecture pattern with pure state transitions:
//! inbound events are classified and mapped to a new per-conversation state
//! plus an ordered list of effects for the runtime to execute.

mod effect;
pub mod event;
pub mod state;
pub(crate) mod transition;


pub use effect::Effect;
pub use event::{ChatId, InboundEvent};
pub use state::{ConvState, Prompt};
pub use transition::transition;

//! Inbound chat events

use serde::{Deserialize, Serialize};
use std::fmt;

/// Conversation identifier assigned by the messaging platform
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ChatId(pub i64);

impl fmt::Display for ChatId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// An inbound message, already classified by the transport
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InboundEvent {
    pub sender_display_name: String,
    pub conversation_id: ChatId,
    /// Set only when the transport recognized a command invocation
    pub command_token: Option<String>,
    pub text: String,
    /// Literal body of the message this event replies to
    pub replied_to_text: Option<String>,
}

impl InboundEvent {
    /// Plain text message with no command and no reply context
    #[allow(dead_code)] // Used by tests
    pub fn text(conversation_id: ChatId, sender: impl Into<String>, text: impl Into<String>) -> Self {
        Self {
            sender_display_name: sender.into(),
            conversation_id,
            command_token: None,
            text: text.into(),
            replied_to_text: None,
        }
    }

    /// Command invocation, `token` without the leading slash
    #[allow(dead_code)] // Used by tests
    pub fn command(conversation_id: ChatId, sender: impl Into<String>, token: impl Into<String>) -> Self {
        let token = token.into();
        Self {
            sender_display_name: sender.into(),
            conversation_id,
            text: format!("/{token}"),
            command_token: Some(token),
            replied_to_text: None,
        }
    }

    /// Mark this event as a reply to a message with the given body
    #[must_use]
    #[allow(dead_code)] // Used by tests
    pub fn replying_to(mut self, replied_to_text: impl Into<String>) -> Self {
        self.replied_to_text = Some(replied_to_text.into());
        self
    }
}

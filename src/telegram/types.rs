//! Telegram Bot API wire types
//!
//! Only the fields the bot reads or writes are modelled.

use crate::commands::PlatformCommand;
use crate::state_machine::{ChatId, InboundEvent};
use serde::{Deserialize, Serialize};

/// Fallback display name when the sender is unknown (e.g. channel posts)
const UNKNOWN_SENDER: &str = "there";

/// Envelope around every Bot API result
#[derive(Debug, Deserialize)]
pub struct ApiResponse<T> {
    pub ok: bool,
    pub result: Option<T>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub error_code: Option<i64>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Update {
    pub update_id: i64,
    #[serde(default)]
    pub message: Option<Message>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Message {
    #[serde(default)]
    pub from: Option<User>,
    pub chat: Chat,
    #[serde(default)]
    pub text: Option<String>,
    #[serde(default)]
    pub entities: Vec<MessageEntity>,
    #[serde(default)]
    pub reply_to_message: Option<Box<Message>>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct User {
    pub id: i64,
    pub first_name: String,
    #[serde(default)]
    pub username: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Chat {
    pub id: i64,
}

#[derive(Debug, Clone, Deserialize)]
pub struct MessageEntity {
    #[serde(rename = "type")]
    pub kind: String,
    pub offset: usize,
}

impl Message {
    /// Command token when the message starts with a `bot_command` entity.
    ///
    /// Strips the leading slash and any `@botname` suffix, so `/add_task@my_bot
    /// milk` yields `add_task`.
    pub fn command_token(&self) -> Option<String> {
        let first = self.entities.first()?;
        if first.kind != "bot_command" || first.offset != 0 {
            return None;
        }
        let word = self.text.as_deref()?.split_whitespace().next()?;
        let command = word.strip_prefix('/')?;
        let token = command.split('@').next().unwrap_or_default();
        Some(token.to_string())
    }

    /// Convert into a core event. Messages without text are not events.
    pub fn into_inbound(self) -> Option<InboundEvent> {
        let command_token = self.command_token();
        let text = self.text?;
        Some(InboundEvent {
            sender_display_name: self
                .from
                .map_or_else(|| UNKNOWN_SENDER.to_string(), |u| u.first_name),
            conversation_id: ChatId(self.chat.id),
            command_token,
            text,
            replied_to_text: self.reply_to_message.and_then(|m| m.text),
        })
    }
}

impl Update {
    pub fn into_inbound(self) -> Option<InboundEvent> {
        self.message.and_then(Message::into_inbound)
    }
}

// ============================================================================
// Requests
// ============================================================================

#[derive(Debug, Serialize)]
pub struct GetUpdatesRequest {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub offset: Option<i64>,
    pub timeout: u64,
    pub allowed_updates: Vec<&'static str>,
}

#[derive(Debug, Serialize)]
pub struct SendMessageRequest<'a> {
    pub chat_id: i64,
    pub text: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reply_markup: Option<ForceReply<'a>>,
}

#[derive(Debug, Serialize)]
pub struct ForceReply<'a> {
    pub force_reply: bool,
    pub input_field_placeholder: &'a str,
    pub selective: bool,
}

#[derive(Debug, Serialize)]
pub struct SetMyCommandsRequest<'a> {
    pub commands: &'a [PlatformCommand],
}

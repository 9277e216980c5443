//! Conversation state types

use serde::Serialize;

/// A prompt the bot sent and now expects a free-text reply to.
///
/// The prompt text lives here and nowhere else; replies are correlated by
/// matching the replied-to message body against it exactly.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Prompt {
    AddTask,
}

impl Prompt {
    const ALL: [Prompt; 1] = [Prompt::AddTask];

    pub fn text(self) -> &'static str {
        match self {
            Prompt::AddTask => "Input a task to add",
        }
    }

    /// Identify which prompt a reply answers, if any
    pub fn from_reply_text(replied_to: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|p| p.text() == replied_to)
    }
}

/// Per-conversation state
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Default)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ConvState {
    /// No outstanding prompt
    #[default]
    Idle,

    /// The last prompt sent to this conversation asked for task text
    AwaitingTaskText { prompt: Prompt },
}

impl ConvState {
    pub fn name(&self) -> &'static str {
        match self {
            ConvState::Idle => "idle",
            ConvState::AwaitingTaskText { .. } => "awaiting_task_text",
        }
    }
}

//! Response composition
//!
//! Turns a handler decision into an outbound message payload. Pure: reads the
//! registry and the current task list, never sends anything.

use crate::commands::CommandRegistry;
use crate::state_machine::{ChatId, Prompt};
use crate::tasks::Task;
use serde::Serialize;

/// Handler decision, produced by the router
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Response {
    /// Greeting with the sender's name and the command menu
    Welcome { display_name: String },
    /// Ask for task text and solicit a reply
    AddTaskPrompt,
    /// Current task list, or a notice that it is empty
    ActiveTasks,
    /// Confirmation of a stored task
    TaskAdded { text: String },
    /// The submitted task text was blank
    EmptyTask,
    /// Input that matched no command or prompt
    Unrecognized,
}

impl Response {
    pub fn kind(&self) -> &'static str {
        match self {
            Response::Welcome { .. } => "welcome",
            Response::AddTaskPrompt => "add_task_prompt",
            Response::ActiveTasks => "active_tasks",
            Response::TaskAdded { .. } => "task_added",
            Response::EmptyTask => "empty_task",
            Response::Unrecognized => "unrecognized",
        }
    }
}

/// Payload handed to the transport
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct OutboundMessage {
    pub conversation_id: ChatId,
    pub body: String,
    /// When set, the transport forces a reply and shows this placeholder
    #[serde(skip_serializing_if = "Option::is_none")]
    pub solicit_reply_with_placeholder: Option<String>,
}

impl OutboundMessage {
    pub fn new(conversation_id: ChatId, body: impl Into<String>) -> Self {
        Self {
            conversation_id,
            body: body.into(),
            solicit_reply_with_placeholder: None,
        }
    }

    #[must_use]
    pub fn soliciting_reply(mut self, placeholder: impl Into<String>) -> Self {
        self.solicit_reply_with_placeholder = Some(placeholder.into());
        self
    }
}

/// Builds outbound messages against the registry's command menu
pub struct ResponseComposer<'a> {
    registry: &'a CommandRegistry,
}

impl<'a> ResponseComposer<'a> {
    pub fn new(registry: &'a CommandRegistry) -> Self {
        Self { registry }
    }

    pub fn compose(&self, response: &Response, chat: ChatId, tasks: &[&Task]) -> OutboundMessage {
        let help = self.registry.help_text();
        match response {
            Response::Welcome { display_name } => OutboundMessage::new(
                chat,
                format!(
                    "Hi {display_name}, Welcome to your Assistant Bot.🤖\n\n\
                     I help you keep track of your tasks.😊🚀\n\n\
                     What do you wanna do?\n\n{help}"
                ),
            ),
            Response::AddTaskPrompt => {
                let prompt = Prompt::AddTask.text();
                OutboundMessage::new(chat, prompt).soliciting_reply(prompt)
            }
            Response::ActiveTasks if tasks.is_empty() => {
                OutboundMessage::new(chat, format!("No active task\n\n{help}"))
            }
            Response::ActiveTasks => {
                let list = tasks
                    .iter()
                    .map(|t| t.display())
                    .collect::<Vec<_>>()
                    .join("\n\n");
                OutboundMessage::new(chat, format!("Active tasks:\n\n{list}\n\n{help}"))
            }
            Response::TaskAdded { text } => OutboundMessage::new(
                chat,
                format!("Task \"{text}\" added successfully✅\n\n{help}"),
            ),
            Response::EmptyTask => OutboundMessage::new(chat, "Task text cannot be empty"),
            Response::Unrecognized => {
                OutboundMessage::new(chat, format!("Unrecognized\n\nCommands:\n{help}"))
            }
        }
    }
}

//! Effects produced by state transitions

use crate::response::Response;

/// Effects to be executed, in order, after a state transition
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Effect {
    /// Append a task to the store
    AddTask { text: String },

    /// Compose a response and send it to the conversation
    Respond(Response),
}

impl Effect {
    pub fn add_task(text: impl Into<String>) -> Self {
        Effect::AddTask { text: text.into() }
    }

    pub fn welcome(display_name: impl Into<String>) -> Self {
        Effect::Respond(Response::Welcome {
            display_name: display_name.into(),
        })
    }

    pub fn task_added(text: impl Into<String>) -> Self {
        Effect::Respond(Response::TaskAdded { text: text.into() })
    }

    pub fn respond(response: Response) -> Self {
        Effect::Respond(response)
    }
}

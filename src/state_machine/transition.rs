//! Pure state transition function
//!
//! Given the same state, registry and event, `transition` always produces the
//! same next state and effects. All I/O is left to the runtime.

use super::{ConvState, Effect, InboundEvent, Prompt};
use crate::commands::{Command, CommandRegistry};
use crate::response::Response;

/// Result of a state transition
#[derive(Debug, PartialEq, Eq)]
pub struct TransitionResult {
    pub new_state: ConvState,
    pub effects: Vec<Effect>,
}

impl TransitionResult {
    pub fn new(state: ConvState) -> Self {
        Self {
            new_state: state,
            effects: vec![],
        }
    }

    pub fn with_effect(mut self, effect: Effect) -> Self {
        self.effects.push(effect);
        self
    }
}

/// What an inbound event is asking for
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Intent<'a> {
    /// A registered command; wins over any reply context
    Command(Command),
    /// Reply to a known prompt
    PromptReply { prompt: Prompt, text: &'a str },
    /// Reply to a message that is not a known prompt
    UnmatchedReply,
    /// Plain text (or an unregistered command) with no reply context
    Unrecognized,
}

/// Classify an event. Unregistered or empty command tokens fall through to
/// reply correlation.
pub fn classify<'a>(registry: &CommandRegistry, event: &'a InboundEvent) -> Intent<'a> {
    if let Some(command) = event
        .command_token
        .as_deref()
        .and_then(|token| registry.resolve(token))
    {
        return Intent::Command(command);
    }

    match event.replied_to_text.as_deref() {
        None => Intent::Unrecognized,
        Some(replied_to) => match Prompt::from_reply_text(replied_to) {
            Some(prompt) => Intent::PromptReply {
                prompt,
                text: &event.text,
            },
            None => Intent::UnmatchedReply,
        },
    }
}

/// Pure transition function
pub fn transition(
    state: &ConvState,
    registry: &CommandRegistry,
    event: &InboundEvent,
) -> TransitionResult {
    match (state, classify(registry, event)) {
        // ============================================================
        // Commands
        // ============================================================
        (_, Intent::Command(Command::Start)) => TransitionResult::new(ConvState::Idle)
            .with_effect(Effect::welcome(&event.sender_display_name)),

        (_, Intent::Command(Command::AddTask)) => TransitionResult::new(ConvState::AwaitingTaskText {
            prompt: Prompt::AddTask,
        })
        .with_effect(Effect::respond(Response::AddTaskPrompt)),

        (_, Intent::Command(Command::ActiveTasks)) => TransitionResult::new(ConvState::Idle)
            .with_effect(Effect::respond(Response::ActiveTasks)),

        // ============================================================
        // Task submission
        // ============================================================

        // Blank submission: reject and ask again
        (_, Intent::PromptReply { prompt: Prompt::AddTask, text }) if text.trim().is_empty() => {
            TransitionResult::new(ConvState::AwaitingTaskText {
                prompt: Prompt::AddTask,
            })
            .with_effect(Effect::respond(Response::EmptyTask))
            .with_effect(Effect::respond(Response::AddTaskPrompt))
        }

        // Correlation is by prompt text, so a reply to a prompt from an
        // earlier process is accepted even when this conversation is Idle.
        (_, Intent::PromptReply { prompt: Prompt::AddTask, text }) => {
            TransitionResult::new(ConvState::Idle)
                .with_effect(Effect::add_task(text))
                .with_effect(Effect::task_added(text))
                .with_effect(Effect::respond(Response::ActiveTasks))
        }

        // ============================================================
        // Everything else degrades to the command menu
        // ============================================================
        (state, Intent::UnmatchedReply | Intent::Unrecognized) => {
            TransitionResult::new(*state).with_effect(Effect::respond(Response::Unrecognized))
        }
    }
}

//! Bot runtime executor

use super::traits::{Transport, TransportError};
use crate::commands::CommandRegistry;
use crate::response::ResponseComposer;
use crate::state_machine::{transition, ChatId, ConvState, Effect, InboundEvent};
use crate::tasks::{TaskError, TaskStore};
use std::collections::HashMap;
use thiserror::Error;
use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;

/// Failure while handling one inbound event
#[derive(Debug, Error)]
pub enum DispatchError {
    #[error("Failed to send {response} to chat {chat_id}: {source}")]
    Transmission {
        chat_id: ChatId,
        response: &'static str,
        #[source]
        source: TransportError,
    },
    #[error(transparent)]
    Task(#[from] TaskError),
}

/// Single consumer that applies inbound events one at a time
pub struct BotRuntime<T>
where
    T: Transport + 'static,
{
    registry: CommandRegistry,
    store: TaskStore,
    /// Conversations with an outstanding prompt; absent means Idle
    states: HashMap<ChatId, ConvState>,
    transport: T,
    event_rx: mpsc::Receiver<InboundEvent>,
    cancel: CancellationToken,
}

impl<T> BotRuntime<T>
where
    T: Transport + 'static,
{
    pub fn new(
        registry: CommandRegistry,
        transport: T,
        event_rx: mpsc::Receiver<InboundEvent>,
        cancel: CancellationToken,
    ) -> Self {
        Self {
            registry,
            store: TaskStore::new(),
            states: HashMap::new(),
            transport,
            event_rx,
            cancel,
        }
    }

    /// Advertise the registry to the platform. Called once before `run`.
    pub async fn register_commands(&self) -> Result<(), TransportError> {
        let commands = self.registry.platform_command_list();
        self.transport.register_commands(&commands).await?;
        tracing::info!(count = commands.len(), "Registered bot commands");
        Ok(())
    }

    /// Consume events until the source closes or the token is cancelled
    pub async fn run(mut self) {
        tracing::info!("Starting bot runtime");

        loop {
            tokio::select! {
                () = self.cancel.cancelled() => {
                    tracing::info!("Bot runtime cancelled");
                    break;
                }
                maybe_event = self.event_rx.recv() => {
                    let Some(event) = maybe_event else {
                        tracing::info!("Event source closed");
                        break;
                    };
                    if let Err(e) = self.process_event(event).await {
                        tracing::error!(error = %e, "Error handling event");
                    }
                }
            }
        }

        tracing::info!(tasks = self.store.len(), "Bot runtime stopped");
    }

    /// Apply one event: transition, commit the new state, then run effects in
    /// order. A failed effect aborts the rest; earlier effects stay applied.
    pub async fn process_event(&mut self, event: InboundEvent) -> Result<(), DispatchError> {
        let chat_id = event.conversation_id;
        let state = self.state(chat_id);
        let result = transition(&state, &self.registry, &event);

        tracing::debug!(
            chat_id = %chat_id,
            command = event.command_token.as_deref().unwrap_or(""),
            from = state.name(),
            to = result.new_state.name(),
            "Transition"
        );

        match result.new_state {
            ConvState::Idle => {
                self.states.remove(&chat_id);
            }
            new_state => {
                self.states.insert(chat_id, new_state);
            }
        }

        for effect in result.effects {
            self.execute_effect(chat_id, effect).await?;
        }

        Ok(())
    }

    async fn execute_effect(&mut self, chat_id: ChatId, effect: Effect) -> Result<(), DispatchError> {
        match effect {
            Effect::AddTask { text } => {
                self.store.add(text)?;
                tracing::info!(chat_id = %chat_id, tasks = self.store.len(), "Task added");
                Ok(())
            }

            Effect::Respond(response) => {
                let tasks = self.store.list_active();
                let message =
                    ResponseComposer::new(&self.registry).compose(&response, chat_id, &tasks);

                self.transport
                    .send(&message)
                    .await
                    .map_err(|source| DispatchError::Transmission {
                        chat_id,
                        response: response.kind(),
                        source,
                    })?;

                tracing::debug!(chat_id = %chat_id, response = response.kind(), "Response sent");
                Ok(())
            }
        }
    }

    /// Current state of a conversation
    pub fn state(&self, chat_id: ChatId) -> ConvState {
        self.states.get(&chat_id).copied().unwrap_or_default()
    }

    #[allow(dead_code)] // Used by tests
    pub fn store(&self) -> &TaskStore {
        &self.store
    }
}

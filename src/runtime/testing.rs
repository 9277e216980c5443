//! Mock implementations for testing
//!
//! These mocks enable integration testing without real I/O.

use super::executor::{BotRuntime, DispatchError};
use super::traits::*;
use crate::commands::{CommandRegistry, PlatformCommand};
use crate::response::OutboundMessage;
use crate::state_machine::{ChatId, InboundEvent};
use async_trait::async_trait;
use std::sync::{Arc, Mutex};
use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;

// ============================================================================
// Mock Transport
// ============================================================================

/// Transport that records everything and can be told to fail
#[allow(dead_code)]
pub struct MockTransport {
    /// Messages delivered, in order
    pub sent: Mutex<Vec<OutboundMessage>>,
    /// Every `register_commands` payload
    pub registered: Mutex<Vec<Vec<PlatformCommand>>>,
    /// Zero-based index of the send call that should fail
    fail_on_send: Mutex<Option<usize>>,
    send_calls: Mutex<usize>,
    fail_registration: bool,
}

#[allow(dead_code)]
impl MockTransport {
    pub fn new() -> Self {
        Self {
            sent: Mutex::new(Vec::new()),
            registered: Mutex::new(Vec::new()),
            fail_on_send: Mutex::new(None),
            send_calls: Mutex::new(0),
            fail_registration: false,
        }
    }

    /// Fail the `n`th send from now (zero-based)
    pub fn fail_send_after(&self, n: usize) {
        let calls = *self.send_calls.lock().unwrap();
        *self.fail_on_send.lock().unwrap() = Some(calls + n);
    }

    pub fn failing_registration() -> Self {
        Self {
            fail_registration: true,
            ..Self::new()
        }
    }

    pub fn sent_messages(&self) -> Vec<OutboundMessage> {
        self.sent.lock().unwrap().clone()
    }

    pub fn bodies(&self) -> Vec<String> {
        self.sent_messages().into_iter().map(|m| m.body).collect()
    }
}

impl Default for MockTransport {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl Transport for MockTransport {
    async fn send(&self, message: &OutboundMessage) -> Result<(), TransportError> {
        let call = {
            let mut calls = self.send_calls.lock().unwrap();
            let call = *calls;
            *calls += 1;
            call
        };
        if *self.fail_on_send.lock().unwrap() == Some(call) {
            return Err(TransportError::network("connection reset"));
        }
        self.sent.lock().unwrap().push(message.clone());
        Ok(())
    }

    async fn register_commands(&self, commands: &[PlatformCommand]) -> Result<(), TransportError> {
        if self.fail_registration {
            return Err(TransportError::api("Unauthorized"));
        }
        self.registered.lock().unwrap().push(commands.to_vec());
        Ok(())
    }
}

// ============================================================================
// Test Runtime
// ============================================================================

/// Runtime wired to a `MockTransport`, driven directly through `process_event`
pub struct TestRuntime {
    pub runtime: BotRuntime<Arc<MockTransport>>,
    pub transport: Arc<MockTransport>,
    /// Keeps the channel open while the runtime is driven directly
    _event_tx: mpsc::Sender<InboundEvent>,
}

impl TestRuntime {
    pub fn new() -> Self {
        let transport = Arc::new(MockTransport::new());
        let (event_tx, event_rx) = mpsc::channel(8);
        let runtime = BotRuntime::new(
            CommandRegistry::new(),
            transport.clone(),
            event_rx,
            CancellationToken::new(),
        );
        Self {
            runtime,
            transport,
            _event_tx: event_tx,
        }
    }

    pub async fn dispatch(&mut self, event: InboundEvent) -> Result<(), DispatchError> {
        self.runtime.process_event(event).await
    }

    pub fn task_texts(&self) -> Vec<String> {
        self.runtime
            .store()
            .list_active()
            .iter()
            .map(|t| t.display())
            .collect()
    }
}

pub const CHAT: ChatId = ChatId(1001);

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::state_machine::{ConvState, Prompt};
    use std::time::Duration;

    const PROMPT: &str = "Input a task to add";

    #[tokio::test]
    async fn test_mock_transport_records_and_fails() {
        let transport = MockTransport::new();
        transport.send(&OutboundMessage::new(CHAT, "a")).await.unwrap();
        transport.fail_send_after(0);
        assert!(transport.send(&OutboundMessage::new(CHAT, "b")).await.is_err());
        transport.send(&OutboundMessage::new(CHAT, "c")).await.unwrap();
        assert_eq!(transport.bodies(), vec!["a", "c"]);
    }

    /// Scenario A: welcome names the sender and lists the other commands
    #[tokio::test]
    async fn test_start_welcomes() {
        let mut rt = TestRuntime::new();
        rt.dispatch(InboundEvent::command(CHAT, "Ada", "start"))
            .await
            .unwrap();

        let sent = rt.transport.sent_messages();
        assert_eq!(sent.len(), 1);
        assert_eq!(sent[0].conversation_id, CHAT);
        assert!(sent[0].body.contains("Ada"));
        assert!(sent[0].body.contains("/add_task"));
        assert!(sent[0].body.contains("/active_tasks"));
    }

    /// Scenario B: the prompt solicits a reply with its own text
    #[tokio::test]
    async fn test_add_task_prompt() {
        let mut rt = TestRuntime::new();
        rt.dispatch(InboundEvent::command(CHAT, "Ada", "add_task"))
            .await
            .unwrap();

        let sent = rt.transport.sent_messages();
        assert_eq!(sent.len(), 1);
        assert_eq!(sent[0].body, PROMPT);
        assert_eq!(sent[0].solicit_reply_with_placeholder.as_deref(), Some(PROMPT));
        assert_eq!(
            rt.runtime.state(CHAT),
            ConvState::AwaitingTaskText {
                prompt: Prompt::AddTask
            }
        );
    }

    /// Scenario C: a reply to the prompt stores the task, confirms, then lists
    #[tokio::test]
    async fn test_reply_adds_task() {
        let mut rt = TestRuntime::new();
        rt.dispatch(InboundEvent::text(CHAT, "Ada", "Buy milk").replying_to(PROMPT))
            .await
            .unwrap();

        assert_eq!(rt.task_texts(), vec!["⭕ Buy milk"]);

        let bodies = rt.transport.bodies();
        assert_eq!(bodies.len(), 2);
        assert!(bodies[0].contains("Task \"Buy milk\" added successfully"));
        assert!(bodies[1].starts_with("Active tasks:"));
        assert!(bodies[1].contains("⭕ Buy milk"));
        assert_eq!(rt.runtime.state(CHAT), ConvState::Idle);
    }

    /// Scenario D: listing an empty store
    #[tokio::test]
    async fn test_empty_active_tasks() {
        let mut rt = TestRuntime::new();
        rt.dispatch(InboundEvent::command(CHAT, "Ada", "active_tasks"))
            .await
            .unwrap();

        assert_eq!(
            rt.transport.bodies(),
            vec!["No active task\n\n/add_task\n/active_tasks"]
        );
    }

    /// Scenario E: plain text without reply context
    #[tokio::test]
    async fn test_plain_text_unrecognized() {
        let mut rt = TestRuntime::new();
        rt.dispatch(InboundEvent::text(CHAT, "Ada", "hello"))
            .await
            .unwrap();

        let bodies = rt.transport.bodies();
        assert_eq!(bodies.len(), 1);
        assert!(bodies[0].starts_with("Unrecognized"));
        assert!(bodies[0].contains("/add_task"));
        assert!(rt.task_texts().is_empty());
    }

    #[tokio::test]
    async fn test_full_conversation() {
        let mut rt = TestRuntime::new();
        rt.dispatch(InboundEvent::command(CHAT, "Ada", "add_task"))
            .await
            .unwrap();
        rt.dispatch(InboundEvent::text(CHAT, "Ada", "Buy milk").replying_to(PROMPT))
            .await
            .unwrap();
        rt.dispatch(InboundEvent::command(CHAT, "Ada", "add_task"))
            .await
            .unwrap();
        rt.dispatch(InboundEvent::text(CHAT, "Ada", "Buy milk").replying_to(PROMPT))
            .await
            .unwrap();
        rt.dispatch(InboundEvent::command(CHAT, "Ada", "active_tasks"))
            .await
            .unwrap();

        // No dedup
        assert_eq!(rt.task_texts(), vec!["⭕ Buy milk", "⭕ Buy milk"]);
        let bodies = rt.transport.bodies();
        assert_eq!(bodies.len(), 7);
        assert_eq!(
            bodies[6],
            "Active tasks:\n\n⭕ Buy milk\n\n⭕ Buy milk\n\n/add_task\n/active_tasks"
        );
    }

    #[tokio::test]
    async fn test_command_reply_does_not_add_task() {
        let mut rt = TestRuntime::new();
        rt.dispatch(InboundEvent::command(CHAT, "Ada", "start").replying_to(PROMPT))
            .await
            .unwrap();

        assert!(rt.task_texts().is_empty());
        assert_eq!(rt.transport.sent_messages().len(), 1);
    }

    #[tokio::test]
    async fn test_unmatched_reply_gets_menu() {
        let mut rt = TestRuntime::new();
        rt.dispatch(InboundEvent::text(CHAT, "Ada", "Buy milk").replying_to("Input a task to ad"))
            .await
            .unwrap();

        assert!(rt.task_texts().is_empty());
        assert!(rt.transport.bodies()[0].starts_with("Unrecognized"));
    }

    #[tokio::test]
    async fn test_blank_task_is_rejected_and_reprompted() {
        let mut rt = TestRuntime::new();
        rt.dispatch(InboundEvent::text(CHAT, "Ada", "  ").replying_to(PROMPT))
            .await
            .unwrap();

        assert!(rt.task_texts().is_empty());
        let sent = rt.transport.sent_messages();
        assert_eq!(sent.len(), 2);
        assert_eq!(sent[0].body, "Task text cannot be empty");
        assert_eq!(sent[1].solicit_reply_with_placeholder.as_deref(), Some(PROMPT));
    }

    /// A failed confirmation leaves the task committed and skips the list
    #[tokio::test]
    async fn test_send_failure_after_add_keeps_task() {
        let mut rt = TestRuntime::new();
        rt.transport.fail_send_after(0);

        let err = rt
            .dispatch(InboundEvent::text(CHAT, "Ada", "Buy milk").replying_to(PROMPT))
            .await
            .unwrap_err();

        assert!(matches!(
            err,
            DispatchError::Transmission {
                response: "task_added",
                ..
            }
        ));
        assert_eq!(rt.task_texts(), vec!["⭕ Buy milk"]);
        assert!(rt.transport.sent_messages().is_empty());
    }

    #[tokio::test]
    async fn test_send_failure_on_follow_up_list() {
        let mut rt = TestRuntime::new();
        rt.transport.fail_send_after(1);

        let err = rt
            .dispatch(InboundEvent::text(CHAT, "Ada", "Buy milk").replying_to(PROMPT))
            .await
            .unwrap_err();

        assert!(matches!(
            err,
            DispatchError::Transmission {
                response: "active_tasks",
                ..
            }
        ));
        assert_eq!(rt.transport.sent_messages().len(), 1);
    }

    #[tokio::test]
    async fn test_conversations_track_state_separately() {
        let mut rt = TestRuntime::new();
        let other = ChatId(2002);
        rt.dispatch(InboundEvent::command(CHAT, "Ada", "add_task"))
            .await
            .unwrap();

        assert!(matches!(
            rt.runtime.state(CHAT),
            ConvState::AwaitingTaskText { .. }
        ));
        assert_eq!(rt.runtime.state(other), ConvState::Idle);
    }

    #[tokio::test]
    async fn test_register_commands() {
        let rt = TestRuntime::new();
        rt.runtime.register_commands().await.unwrap();

        let registered = rt.transport.registered.lock().unwrap().clone();
        assert_eq!(registered.len(), 1);
        let tokens: Vec<_> = registered[0].iter().map(|c| c.command.as_str()).collect();
        assert_eq!(tokens, vec!["start", "add_task", "active_tasks"]);
    }

    #[tokio::test]
    async fn test_register_commands_failure() {
        let transport = Arc::new(MockTransport::failing_registration());
        let (_tx, rx) = mpsc::channel(1);
        let runtime = BotRuntime::new(
            CommandRegistry::new(),
            transport,
            rx,
            CancellationToken::new(),
        );
        assert!(runtime.register_commands().await.is_err());
    }

    /// The loop drains events in order and stops when the source closes,
    /// continuing past a failed event
    #[tokio::test]
    async fn test_run_until_source_closes() {
        let transport = Arc::new(MockTransport::new());
        transport.fail_send_after(0);
        let (tx, rx) = mpsc::channel(8);
        let runtime = BotRuntime::new(
            CommandRegistry::new(),
            transport.clone(),
            rx,
            CancellationToken::new(),
        );
        let handle = tokio::spawn(runtime.run());

        tx.send(InboundEvent::text(CHAT, "Ada", "first")).await.unwrap();
        tx.send(InboundEvent::command(CHAT, "Ada", "active_tasks"))
            .await
            .unwrap();
        drop(tx);

        tokio::time::timeout(Duration::from_secs(2), handle)
            .await
            .expect("runtime did not stop")
            .unwrap();

        let bodies = transport.bodies();
        assert_eq!(bodies.len(), 1);
        assert!(bodies[0].starts_with("No active task"));
    }

    #[tokio::test]
    async fn test_run_stops_on_cancel() {
        let transport = Arc::new(MockTransport::new());
        let (tx, rx) = mpsc::channel(8);
        let cancel = CancellationToken::new();
        let runtime = BotRuntime::new(CommandRegistry::new(), transport, rx, cancel.clone());
        let handle = tokio::spawn(runtime.run());

        cancel.cancel();
        tokio::time::timeout(Duration::from_secs(2), handle)
            .await
            .expect("runtime did not stop")
            .unwrap();
        // Sender still alive: the stop came from the token
        drop(tx);
    }
}

//! Long-poll event source
//!
//! Pulls updates from the Bot API and feeds them, in order, to the runtime's
//! channel. Poll failures are retried here; the runtime never sees them.

use super::types::Update;
use super::TelegramClient;
use crate::state_machine::InboundEvent;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;

/// Pause after a failed poll before trying again
const POLL_RETRY_DELAY: Duration = Duration::from_secs(3);

pub struct UpdatePoller {
    client: Arc<TelegramClient>,
    timeout_secs: u64,
    offset: Option<i64>,
    debug: bool,
}

impl UpdatePoller {
    pub fn new(client: Arc<TelegramClient>, timeout_secs: u64, debug: bool) -> Self {
        Self {
            client,
            timeout_secs,
            offset: None,
            debug,
        }
    }

    /// Poll until cancelled or until the runtime drops its receiver
    pub async fn run(mut self, event_tx: mpsc::Sender<InboundEvent>, cancel: CancellationToken) {
        tracing::info!(timeout_secs = self.timeout_secs, "Starting update poller");

        loop {
            let result = tokio::select! {
                () = cancel.cancelled() => break,
                result = self.client.get_updates(self.offset, self.timeout_secs) => result,
            };

            let updates = match result {
                Ok(updates) => updates,
                Err(e) => {
                    tracing::warn!(error = %e, kind = ?e.kind, "Polling for updates failed, retrying");
                    tokio::select! {
                        () = cancel.cancelled() => break,
                        () = tokio::time::sleep(POLL_RETRY_DELAY) => continue,
                    }
                }
            };

            self.offset = next_offset(self.offset, &updates);

            for update in updates {
                if self.debug {
                    tracing::debug!(update = ?update, "Received update");
                }
                let update_id = update.update_id;
                let Some(event) = update.into_inbound() else {
                    tracing::debug!(update_id, "Skipping update without a text message");
                    continue;
                };
                if event_tx.send(event).await.is_err() {
                    tracing::info!("Event channel closed, stopping poller");
                    return;
                }
            }
        }

        tracing::info!("Update poller stopped");
    }
}

/// Offset that acknowledges every update in `updates`
fn next_offset(current: Option<i64>, updates: &[Update]) -> Option<i64> {
    updates
        .iter()
        .map(|u| u.update_id + 1)
        .max()
        .max(current)
}

//! Taskbot - conversational task tracker for Telegram
//!
//! A Rust bot implementing a per-conversation state machine that turns chat
//! commands and replies into updates to an in-memory task list.

mod commands;
mod config;
mod response;
mod runtime;
mod state_machine;
mod tasks;
mod telegram;

use commands::CommandRegistry;
use config::BotConfig;
use runtime::{BotRuntime, ProductionRuntime, EVENT_CHANNEL_CAPACITY};
use std::sync::Arc;
use telegram::{TelegramClient, UpdatePoller};
use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // .env first so it can feed both logging and config
    let dotenv = dotenvy::dotenv();
    let config = BotConfig::from_env();

    // Initialize logging
    let default_filter = if config.as_ref().is_ok_and(|c| c.debug) {
        "taskbot=debug"
    } else {
        "taskbot=info"
    };
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| default_filter.into()),
        )
        .with(
            tracing_subscriber::fmt::layer()
                .json()
                .with_current_span(false)
                .with_span_list(false),
        )
        .init();

    match dotenv {
        Ok(path) => tracing::info!(path = %path.display(), ".env loaded"),
        Err(e) if e.not_found() => tracing::debug!("No .env file, using process environment"),
        Err(e) => tracing::warn!(error = %e, "Failed to load .env file"),
    }

    let config = config.inspect_err(|e| tracing::error!(error = %e, "Invalid configuration"))?;
    tracing::debug!(config = ?config, "Configuration loaded");

    // Authenticate
    let client = Arc::new(TelegramClient::new(&config)?);
    let me = client
        .get_me()
        .await
        .inspect_err(|e| tracing::error!(error = %e, "Bot authorization failed"))?;
    tracing::info!(
        bot_id = me.id,
        bot = %me.username.as_deref().unwrap_or(&me.first_name),
        "Authorized on Telegram"
    );

    // Wire the event source to the runtime
    let cancel = CancellationToken::new();
    let (event_tx, event_rx) = mpsc::channel(EVENT_CHANNEL_CAPACITY);
    let runtime: ProductionRuntime = BotRuntime::new(
        CommandRegistry::new(),
        client.clone(),
        event_rx,
        cancel.clone(),
    );

    runtime
        .register_commands()
        .await
        .inspect_err(|e| tracing::error!(error = %e, "Failed to register commands"))?;

    let poller = UpdatePoller::new(client, config.poll_timeout_secs, config.debug);
    let poller_handle = tokio::spawn(poller.run(event_tx, cancel.clone()));

    let shutdown = cancel.clone();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            tracing::info!("Shutdown requested");
            shutdown.cancel();
        }
    });

    runtime.run().await;

    cancel.cancel();
    poller_handle.await?;

    Ok(())
}

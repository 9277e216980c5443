//! Telegram Bot API client

use super::types::{
    ApiResponse, ForceReply, GetUpdatesRequest, SendMessageRequest, SetMyCommandsRequest, Update,
    User,
};
use crate::commands::PlatformCommand;
use crate::config::BotConfig;
use crate::response::OutboundMessage;
use crate::runtime::{Transport, TransportError};
use async_trait::async_trait;
use reqwest::Client;
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::time::Duration;

/// Headroom on top of the long-poll timeout before the HTTP request gives up
const REQUEST_TIMEOUT_MARGIN: Duration = Duration::from_secs(10);

pub struct TelegramClient {
    client: Client,
    /// `{api_base_url}/bot{token}`; never logged
    base_url: String,
    debug: bool,
}

impl TelegramClient {
    pub fn new(config: &BotConfig) -> Result<Self, TransportError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.poll_timeout_secs) + REQUEST_TIMEOUT_MARGIN)
            .build()
            .map_err(|e| TransportError::network(format!("Failed to create HTTP client: {e}")))?;

        Ok(Self {
            client,
            base_url: format!("{}/bot{}", config.api_base_url, config.api_token),
            debug: config.debug,
        })
    }

    /// Validate the token and fetch the bot's own account
    pub async fn get_me(&self) -> Result<User, TransportError> {
        self.call("getMe", &serde_json::json!({})).await
    }

    /// Long-poll for updates after `offset`
    pub async fn get_updates(
        &self,
        offset: Option<i64>,
        timeout_secs: u64,
    ) -> Result<Vec<Update>, TransportError> {
        let request = GetUpdatesRequest {
            offset,
            timeout: timeout_secs,
            allowed_updates: vec!["message"],
        };
        self.call("getUpdates", &request).await
    }

    async fn call<Req, Resp>(&self, method: &str, body: &Req) -> Result<Resp, TransportError>
    where
        Req: Serialize + ?Sized + Sync,
        Resp: DeserializeOwned,
    {
        if self.debug {
            tracing::debug!(
                method,
                body = %serde_json::to_string(body).unwrap_or_default(),
                "Bot API request"
            );
        }

        let response = self
            .client
            .post(format!("{}/{method}", self.base_url))
            .json(body)
            .send()
            .await
            .map_err(|e| {
                // The URL embeds the token
                let e = e.without_url();
                if e.is_timeout() {
                    TransportError::network(format!("Request timeout: {e}"))
                } else if e.is_connect() {
                    TransportError::network(format!("Connection failed: {e}"))
                } else {
                    TransportError::network(format!("Request failed: {e}"))
                }
            })?;

        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|e| TransportError::network(format!("Failed to read response: {}", e.without_url())))?;

        parse_response(method, status, &body)
    }
}

/// Unwrap the `{ ok, result }` envelope
fn parse_response<Resp: DeserializeOwned>(
    method: &str,
    status: reqwest::StatusCode,
    body: &str,
) -> Result<Resp, TransportError> {
    let envelope: ApiResponse<Resp> = match serde_json::from_str(body) {
        Ok(envelope) => envelope,
        Err(_) if !status.is_success() => {
            return Err(TransportError::api(format!("{method}: HTTP {status}")));
        }
        Err(e) => {
            return Err(TransportError::decode(format!(
                "{method}: failed to parse response: {e}"
            )));
        }
    };

    if !envelope.ok {
        return Err(TransportError::api(format!(
            "{method}: {} ({})",
            envelope.description.as_deref().unwrap_or("request rejected"),
            envelope.error_code.map_or_else(|| status.to_string(), |c| c.to_string()),
        )));
    }

    envelope
        .result
        .ok_or_else(|| TransportError::decode(format!("{method}: response has no result")))
}

#[async_trait]
impl Transport for TelegramClient {
    async fn send(&self, message: &OutboundMessage) -> Result<(), TransportError> {
        let request = SendMessageRequest {
            chat_id: message.conversation_id.0,
            text: &message.body,
            reply_markup: message
                .solicit_reply_with_placeholder
                .as_deref()
                .map(|placeholder| ForceReply {
                    force_reply: true,
                    input_field_placeholder: placeholder,
                    selective: false,
                }),
        };
        let _: serde_json::Value = self.call("sendMessage", &request).await?;
        Ok(())
    }

    async fn register_commands(&self, commands: &[PlatformCommand]) -> Result<(), TransportError> {
        let _: bool = self
            .call("setMyCommands", &SetMyCommandsRequest { commands })
            .await?;
        Ok(())
    }
}

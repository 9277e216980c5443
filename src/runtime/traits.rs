//! Trait abstractions for runtime I/O
//!
//! These traits enable testing the executor with mock implementations.

use crate::commands::PlatformCommand;
use crate::response::OutboundMessage;
use async_trait::async_trait;
use std::sync::Arc;
use thiserror::Error;

/// Transport error with classification
#[derive(Debug, Error)]
#[error("{message}")]
pub struct TransportError {
    pub kind: TransportErrorKind,
    pub message: String,
}

impl TransportError {
    pub fn new(kind: TransportErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
        }
    }

    pub fn network(message: impl Into<String>) -> Self {
        Self::new(TransportErrorKind::Network, message)
    }

    pub fn api(message: impl Into<String>) -> Self {
        Self::new(TransportErrorKind::Api, message)
    }

    pub fn decode(message: impl Into<String>) -> Self {
        Self::new(TransportErrorKind::Decode, message)
    }
}

/// Where a transport failure came from. The core treats all kinds alike.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TransportErrorKind {
    /// Connection failures, timeouts
    Network,
    /// The platform rejected the request
    Api,
    /// The platform answered with something unparseable
    Decode,
}

/// Outbound side of the messaging platform
#[async_trait]
pub trait Transport: Send + Sync {
    /// Deliver one composed message
    async fn send(&self, message: &OutboundMessage) -> Result<(), TransportError>;

    /// Advertise the command menu to the platform
    async fn register_commands(&self, commands: &[PlatformCommand]) -> Result<(), TransportError>;
}

// ============================================================================
// Arc implementations for trait objects
// ============================================================================

#[async_trait]
impl<T: Transport + ?Sized> Transport for Arc<T> {
    async fn send(&self, message: &OutboundMessage) -> Result<(), TransportError> {
        (**self).send(message).await
    }

    async fn register_commands(&self, commands: &[PlatformCommand]) -> Result<(), TransportError> {
        (**self).register_commands(commands).await
    }
}

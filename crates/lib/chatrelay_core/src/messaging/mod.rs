//! Messaging module — the seam between the relay and the conversational backend.
//!
//! # Public API
//!
//! - [`MessagingClient`] — send a message, read a conversation tracker, probe the backend
//! - [`rasa::RasaClient`] — implementation for the Rasa REST channel
//! - [`ResponseItem`] — one opaque unit of the backend's reply

pub mod rasa;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::message::OutboundMessage;

/// Errors raised while talking to the backend.
#[derive(Debug, Error)]
pub enum MessagingError {
    #[error("Backend request timed out: {0}")]
    Timeout(String),

    #[error("Backend connection failed: {0}")]
    Connection(String),

    #[error("Backend returned {status}: {body}")]
    Status { status: u16, body: String },

    #[error("Malformed backend response: {0}")]
    Decode(String),

    #[error("Invalid backend configuration: {0}")]
    Config(String),
}

impl From<reqwest::Error> for MessagingError {
    fn from(e: reqwest::Error) -> Self {
        if e.is_timeout() {
            MessagingError::Timeout(e.to_string())
        } else if e.is_decode() {
            MessagingError::Decode(e.to_string())
        } else if e.is_builder() {
            MessagingError::Config(e.to_string())
        } else {
            MessagingError::Connection(e.to_string())
        }
    }
}

/// One element of the backend's reply, relayed without interpretation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ResponseItem(pub serde_json::Value);

impl From<serde_json::Value> for ResponseItem {
    fn from(value: serde_json::Value) -> Self {
        Self(value)
    }
}

/// Client for the conversational backend.
#[async_trait]
pub trait MessagingClient: Send + Sync {
    /// Delivers one message and returns the backend's replies in order.
    async fn send(&self, message: &OutboundMessage) -> Result<Vec<ResponseItem>, MessagingError>;

    /// Fetches the conversation tracker for `sender`.
    async fn tracker(&self, sender: &str) -> Result<serde_json::Value, MessagingError>;

    /// Succeeds when the backend answers its status probe.
    async fn status(&self) -> Result<(), MessagingError>;
}

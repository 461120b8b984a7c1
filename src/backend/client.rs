use std::fmt;

use async_trait::async_trait;

use super::types::ChatReply;
use crate::core::message::Message;

/// Errors that can occur while talking to the chat backend.
///
/// Every variant is terminal: nothing in the client retries.
#[derive(Debug)]
pub enum BackendError {
    /// Backend misconfigured (unparseable base URL).
    Config(String),
    /// Network-level failure (DNS, connection refused, reset).
    Network(String),
    /// Backend answered with a non-2xx status.
    Api { status: u16, message: String },
    /// Body was not the JSON we expected.
    Parse(String),
}

impl fmt::Display for BackendError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BackendError::Config(msg) => write!(f, "config error: {msg}"),
            BackendError::Network(msg) => write!(f, "network error: {msg}"),
            BackendError::Api { status, message } => {
                write!(f, "API error (HTTP {status}): {message}")
            }
            BackendError::Parse(msg) => write!(f, "parse error: {msg}"),
        }
    }
}

impl std::error::Error for BackendError {}

/// The remote side of a conversation.
///
/// Implemented over HTTP by [`HttpBackend`](super::HttpBackend) and by
/// scripted fakes in tests.
#[async_trait]
pub trait ChatBackend: Send + Sync {
    /// Human-readable location of the backend, shown in the title bar.
    fn location(&self) -> &str;

    /// `GET /history`: the stored conversation, oldest first.
    async fn fetch_history(&self) -> Result<Vec<Message>, BackendError>;

    /// `POST /chat`: send one user message and wait for the reply payload.
    async fn send_chat(
        &self,
        message: &str,
        session_id: Option<&str>,
    ) -> Result<ChatReply, BackendError>;

    /// `DELETE /chat`: ask the backend to discard its history.
    async fn clear_history(&self) -> Result<(), BackendError>;

    /// `GET /`: the backend's banner message.
    async fn health(&self) -> Result<String, BackendError>;
}

use serde::{Deserialize, Serialize};

use crate::core::message::Message;

/// Body of `POST /chat`.
#[derive(Serialize, Debug, Clone, PartialEq)]
pub struct ChatRequest<'a> {
    pub message: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub session_id: Option<&'a str>,
}

/// Reply of `POST /chat`. The backend sends either `response` or `error`;
/// both are optional so a body carrying neither still parses.
#[derive(Deserialize, Debug, Clone, Default, PartialEq)]
pub struct ChatReply {
    #[serde(default)]
    pub response: Option<String>,
    #[serde(default)]
    pub error: Option<String>,
}

impl ChatReply {
    /// The `response` field, if present and non-empty.
    pub fn usable_response(&self) -> Option<&str> {
        self.response.as_deref().filter(|s| !s.is_empty())
    }

    /// The `error` field, if present and non-empty.
    pub fn usable_error(&self) -> Option<&str> {
        self.error.as_deref().filter(|s| !s.is_empty())
    }
}

/// Reply of `GET /history`.
#[derive(Deserialize, Debug, Clone, Default)]
pub struct HistoryResponse {
    #[serde(default)]
    pub history: Vec<Message>,
}

/// Reply of `GET /`.
#[derive(Deserialize, Debug, Clone)]
pub struct HealthResponse {
    pub message: String,
}

//! HTTP implementation of [`ChatBackend`] on top of `reqwest`.
//!
//! The backend exposes three routes (`/history`, `/chat` POST and DELETE)
//! plus a banner at `/`. No authentication, request IDs or idempotency keys
//! are sent. Bodies are always JSON; a body that does not parse is reported
//! as [`BackendError::Parse`] so callers can treat it like a transport
//! failure.

use async_trait::async_trait;
use log::{debug, info, warn};
use serde::de::DeserializeOwned;

use super::client::{BackendError, ChatBackend};
use super::types::{ChatReply, ChatRequest, HealthResponse, HistoryResponse};
use crate::core::message::Message;

pub struct HttpBackend {
    base_url: String,
    client: reqwest::Client,
}

impl HttpBackend {
    pub fn new(base_url: impl Into<String>) -> Self {
        let base_url = base_url.into().trim_end_matches('/').to_string();
        Self {
            base_url,
            client: reqwest::Client::new(),
        }
    }

    fn url(&self, route: &str) -> String {
        format!("{}{}", self.base_url, route)
    }
}

fn map_send_error(e: reqwest::Error) -> BackendError {
    if e.is_builder() {
        BackendError::Config(e.to_string())
    } else {
        BackendError::Network(e.to_string())
    }
}

/// Reject non-2xx statuses, then read and parse the body as `T`.
async fn read_json<T: DeserializeOwned>(response: reqwest::Response) -> Result<T, BackendError> {
    let status = response.status();
    if !status.is_success() {
        let message = response
            .text()
            .await
            .unwrap_or_else(|_| "unknown error".to_string());
        warn!("Backend error: {} - {}", status, message);
        return Err(BackendError::Api {
            status: status.as_u16(),
            message,
        });
    }

    let body = response
        .text()
        .await
        .map_err(|e| BackendError::Network(e.to_string()))?;
    debug!("Backend body: {} bytes", body.len());
    serde_json::from_str(&body).map_err(|e| BackendError::Parse(e.to_string()))
}

#[async_trait]
impl ChatBackend for HttpBackend {
    fn location(&self) -> &str {
        &self.base_url
    }

    async fn fetch_history(&self) -> Result<Vec<Message>, BackendError> {
        info!("GET {}/history", self.base_url);
        let response = self
            .client
            .get(self.url("/history"))
            .send()
            .await
            .map_err(map_send_error)?;
        let parsed: HistoryResponse = read_json(response).await?;
        info!("History returned {} messages", parsed.history.len());
        Ok(parsed.history)
    }

    async fn send_chat(
        &self,
        message: &str,
        session_id: Option<&str>,
    ) -> Result<ChatReply, BackendError> {
        let request = ChatRequest {
            message,
            session_id,
        };
        info!(
            "POST {}/chat: message_len={}, session={:?}",
            self.base_url,
            message.len(),
            session_id
        );
        let response = self
            .client
            .post(self.url("/chat"))
            .json(&request)
            .send()
            .await
            .map_err(map_send_error)?;
        let reply: ChatReply = read_json(response).await?;
        debug!("Chat reply: {:?}", reply);
        Ok(reply)
    }

    async fn clear_history(&self) -> Result<(), BackendError> {
        info!("DELETE {}/chat", self.base_url);
        let response = self
            .client
            .delete(self.url("/chat"))
            .send()
            .await
            .map_err(map_send_error)?;

        // Body is ignored; only the status matters
        let status = response.status();
        if !status.is_success() {
            return Err(BackendError::Api {
                status: status.as_u16(),
                message: response.text().await.unwrap_or_default(),
            });
        }
        Ok(())
    }

    async fn health(&self) -> Result<String, BackendError> {
        let response = self
            .client
            .get(self.url("/"))
            .send()
            .await
            .map_err(map_send_error)?;
        let parsed: HealthResponse = read_json(response).await?;
        Ok(parsed.message)
    }
}

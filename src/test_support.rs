//! Test utilities shared across the crate.
//!
//! This module is only compiled during tests (`#[cfg(test)]`).

use std::collections::VecDeque;
use std::sync::Mutex;

use async_trait::async_trait;
use chrono::{TimeZone, Utc};

use crate::backend::{BackendError, ChatBackend, ChatReply};
use crate::core::message::{Message, Sender};

/// A scripted backend. Each call pops the next queued result; when the
/// queue is empty a benign default is returned. Every call is recorded.
pub struct MockBackend {
    history: Mutex<VecDeque<Result<Vec<Message>, BackendError>>>,
    replies: Mutex<VecDeque<Result<ChatReply, BackendError>>>,
    clears: Mutex<VecDeque<Result<(), BackendError>>>,
    sent: Mutex<Vec<(String, Option<String>)>>,
    clear_calls: Mutex<usize>,
}

impl MockBackend {
    pub fn new() -> Self {
        Self {
            history: Mutex::new(VecDeque::new()),
            replies: Mutex::new(VecDeque::new()),
            clears: Mutex::new(VecDeque::new()),
            sent: Mutex::new(Vec::new()),
            clear_calls: Mutex::new(0),
        }
    }

    pub fn with_history(self, result: Result<Vec<Message>, BackendError>) -> Self {
        self.history.lock().unwrap().push_back(result);
        self
    }

    pub fn with_reply(self, result: Result<ChatReply, BackendError>) -> Self {
        self.replies.lock().unwrap().push_back(result);
        self
    }

    pub fn with_clear(self, result: Result<(), BackendError>) -> Self {
        self.clears.lock().unwrap().push_back(result);
        self
    }

    pub fn sent_messages(&self) -> Vec<String> {
        self.sent.lock().unwrap().iter().map(|(m, _)| m.clone()).collect()
    }

    pub fn sent_session_ids(&self) -> Vec<Option<String>> {
        self.sent.lock().unwrap().iter().map(|(_, s)| s.clone()).collect()
    }

    pub fn clear_calls(&self) -> usize {
        *self.clear_calls.lock().unwrap()
    }
}

#[async_trait]
impl ChatBackend for MockBackend {
    fn location(&self) -> &str {
        "mock://backend"
    }

    async fn fetch_history(&self) -> Result<Vec<Message>, BackendError> {
        self.history.lock().unwrap().pop_front().unwrap_or(Ok(Vec::new()))
    }

    async fn send_chat(
        &self,
        message: &str,
        session_id: Option<&str>,
    ) -> Result<ChatReply, BackendError> {
        self.sent
            .lock()
            .unwrap()
            .push((message.to_string(), session_id.map(str::to_string)));
        self.replies.lock().unwrap().pop_front().unwrap_or_else(|| {
            Ok(ChatReply {
                response: Some("ok".to_string()),
                error: None,
            })
        })
    }

    async fn clear_history(&self) -> Result<(), BackendError> {
        *self.clear_calls.lock().unwrap() += 1;
        self.clears.lock().unwrap().pop_front().unwrap_or(Ok(()))
    }

    async fn health(&self) -> Result<String, BackendError> {
        Ok("mock backend is running".to_string())
    }
}

/// A user message without a timestamp.
pub fn user(content: &str) -> Message {
    Message {
        sender: Sender::User,
        content: content.to_string(),
        timestamp: None,
    }
}

/// A bot message without a timestamp.
pub fn bot(content: &str) -> Message {
    Message {
        sender: Sender::Bot,
        content: content.to_string(),
        timestamp: None,
    }
}

/// A user message stamped at the given UTC date and time.
pub fn user_at(content: &str, (y, mo, d): (i32, u32, u32), (h, mi): (u32, u32)) -> Message {
    Message {
        sender: Sender::User,
        content: content.to_string(),
        timestamp: Some(Utc.with_ymd_and_hms(y, mo, d, h, mi, 0).unwrap()),
    }
}

/// A bot message stamped at the given UTC date and time.
pub fn bot_at(content: &str, (y, mo, d): (i32, u32, u32), (h, mi): (u32, u32)) -> Message {
    Message {
        sender: Sender::Bot,
        ..user_at(content, (y, mo, d), (h, mi))
    }
}

/// Creates a test App backed by an empty MockBackend.
pub fn test_app() -> crate::core::state::App {
    crate::core::state::App::new(std::sync::Arc::new(MockBackend::new()), None, false)
}

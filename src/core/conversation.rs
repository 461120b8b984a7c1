//! # Conversation Store
//!
//! The in-memory message log and every transition into or out of it.
//!
//! ```text
//!   hydrate(history)   replace the log (startup only)
//!   begin_send(text)   append the user message NOW, hand back a PendingSend
//!        │
//!        ▼  PendingSend::dispatch(backend).await   (log not borrowed here)
//!        │
//!   settle(outcome)    append exactly one bot message
//!   clear()            truncate to empty
//! ```
//!
//! The log is append-only between hydration and clear. Nothing edits or
//! removes a single message. Splitting a send into `begin_send` / `settle`
//! lets the user message show up before the network call suspends, and
//! lets several sends be in flight at once without sharing the log.

use log::{info, warn};

use crate::backend::{BackendError, ChatBackend, ChatReply};
use crate::core::message::Message;

/// Bot text used when the backend answered with neither `response` nor `error`.
pub const NO_RESPONSE_TEXT: &str = "No response received";
/// Bot text used when the chat call itself failed.
pub const CONNECTION_ERROR_TEXT: &str = "Error connecting to backend";

/// How a pending send resolved. Each variant produces exactly one bot message.
#[derive(Debug, Clone, PartialEq)]
pub enum SendOutcome {
    /// Backend returned a usable `response`.
    Success(String),
    /// Backend returned an application-level `error` instead.
    AppError(String),
    /// Backend returned a body with neither field usable.
    NoField,
    /// The call failed (network, non-2xx status, malformed body).
    TransportError(String),
}

impl SendOutcome {
    /// Classify the result of a chat call.
    pub fn from_result(result: Result<ChatReply, BackendError>) -> Self {
        match result {
            Ok(reply) => {
                if let Some(response) = reply.usable_response() {
                    SendOutcome::Success(response.to_string())
                } else if let Some(error) = reply.usable_error() {
                    SendOutcome::AppError(error.to_string())
                } else {
                    SendOutcome::NoField
                }
            }
            Err(e) => SendOutcome::TransportError(e.to_string()),
        }
    }

    /// The text the bot message will carry.
    pub fn bot_content(&self) -> &str {
        match self {
            SendOutcome::Success(text) | SendOutcome::AppError(text) => text,
            SendOutcome::NoField => NO_RESPONSE_TEXT,
            SendOutcome::TransportError(_) => CONNECTION_ERROR_TEXT,
        }
    }

    /// Short label for logs and the status line.
    pub fn label(&self) -> &'static str {
        match self {
            SendOutcome::Success(_) => "success",
            SendOutcome::AppError(_) => "application error",
            SendOutcome::NoField => "empty reply",
            SendOutcome::TransportError(_) => "transport error",
        }
    }
}

/// A send whose user message is already in the log and whose network call
/// has not run yet. Owns everything the call needs.
#[derive(Debug, Clone, PartialEq)]
pub struct PendingSend {
    pub text: String,
    pub session_id: Option<String>,
}

impl PendingSend {
    /// Run the chat call. Never fails: errors become an outcome.
    pub async fn dispatch(&self, backend: &dyn ChatBackend) -> SendOutcome {
        let result = backend
            .send_chat(&self.text, self.session_id.as_deref())
            .await;
        if let Err(ref e) = result {
            warn!("Chat request failed: {}", e);
        }
        SendOutcome::from_result(result)
    }
}

/// The ordered message log.
#[derive(Debug, Default, Clone, PartialEq)]
pub struct Conversation {
    messages: Vec<Message>,
    /// Set once anything has been appended locally since the last hydrate/clear.
    locally_modified: bool,
}

impl Conversation {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn messages(&self) -> &[Message] {
        &self.messages
    }

    pub fn len(&self) -> usize {
        self.messages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.messages.is_empty()
    }

    /// Replace the log with remote history.
    ///
    /// If messages were appended locally before the history arrived, the
    /// history goes in front of them instead of overwriting them.
    pub fn hydrate(&mut self, history: Vec<Message>) {
        info!("Hydrating conversation with {} messages", history.len());
        if self.locally_modified {
            let local = std::mem::replace(&mut self.messages, history);
            self.messages.extend(local);
        } else {
            self.messages = history;
        }
    }

    /// Append the user message for `text` and return the call to make.
    ///
    /// Blank or whitespace-only text is a no-op and returns `None`.
    pub fn begin_send(&mut self, text: &str, session_id: Option<&str>) -> Option<PendingSend> {
        if text.trim().is_empty() {
            return None;
        }
        self.push(Message::user(text));
        Some(PendingSend {
            text: text.to_string(),
            session_id: session_id.map(str::to_string),
        })
    }

    /// Append the single bot message for a settled send.
    pub fn settle(&mut self, outcome: &SendOutcome) -> &Message {
        info!("Send settled: {}", outcome.label());
        self.push(Message::bot(outcome.bot_content()));
        // just pushed
        &self.messages[self.messages.len() - 1]
    }

    /// Truncate the log to empty.
    pub fn clear(&mut self) {
        info!("Clearing {} messages", self.messages.len());
        self.messages.clear();
        self.locally_modified = false;
    }

    fn push(&mut self, message: Message) {
        self.messages.push(message);
        self.locally_modified = true;
    }
}

/// A conversation bound to a backend, for callers that can simply await
/// each operation (the one-shot CLI modes and tests). The TUI drives the
/// same `Conversation` through the reducer instead.
///
/// Lives from construction until drop; nothing is persisted.
pub struct ChatSession<'a> {
    backend: &'a dyn ChatBackend,
    session_id: Option<String>,
    conversation: Conversation,
}

impl<'a> ChatSession<'a> {
    pub fn new(backend: &'a dyn ChatBackend, session_id: Option<String>) -> Self {
        Self {
            backend,
            session_id,
            conversation: Conversation::new(),
        }
    }

    pub fn conversation(&self) -> &Conversation {
        &self.conversation
    }

    /// Fetch history into the log. Failure leaves the log empty and is
    /// returned for the caller to report; it is never fatal.
    pub async fn hydrate(&mut self) -> Result<usize, BackendError> {
        match self.backend.fetch_history().await {
            Ok(history) => {
                let count = history.len();
                self.conversation.hydrate(history);
                Ok(count)
            }
            Err(e) => {
                warn!("Failed to load chat history: {}", e);
                Err(e)
            }
        }
    }

    /// Send `text`. Returns `None` (and does nothing) for blank input.
    pub async fn send(&mut self, text: &str) -> Option<SendOutcome> {
        let pending = self
            .conversation
            .begin_send(text, self.session_id.as_deref())?;
        let outcome = pending.dispatch(self.backend).await;
        self.conversation.settle(&outcome);
        Some(outcome)
    }

    /// Truncate locally, then ask the backend to forget. The local log is
    /// empty whatever the remote call returns.
    pub async fn clear(&mut self) -> Result<(), BackendError> {
        self.conversation.clear();
        let result = self.backend.clear_history().await;
        if let Err(ref e) = result {
            warn!("Remote clear failed: {}", e);
        }
        result
    }
}

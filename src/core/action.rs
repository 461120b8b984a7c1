//! # Actions
//!
//! Everything that can happen in FinChat becomes an `Action`.
//! User presses Enter? That's `Action::Submit(text)`.
//! Backend answers? That's `Action::ReplySettled(outcome)`.
//!
//! The `update()` function applies an action to the state and returns the
//! `Effect` the adapter must carry out. No I/O here: network calls happen
//! in the adapter, whose results come back as further actions.
//!
//! ```text
//! State + Action  →  update()  →  New State + Effect
//! ```

use log::{debug, info, warn};

use crate::core::conversation::{PendingSend, SendOutcome};
use crate::core::message::Message;
use crate::core::state::App;

#[derive(Debug, Clone, PartialEq)]
pub enum Action {
    /// Startup history fetch returned.
    HistoryLoaded(Vec<Message>),
    /// Startup history fetch failed (transport or parse).
    HistoryFailed(String),
    /// User submitted input text.
    Submit(String),
    /// A chat call settled.
    ReplySettled(SendOutcome),
    /// User asked to clear the conversation.
    ClearChat,
    /// The remote delete returned. `Err` carries the failure text.
    ClearSettled(Result<(), String>),
    Quit,
}

/// I/O the adapter must perform after an update.
#[derive(Debug, Clone, PartialEq)]
pub enum Effect {
    None,
    /// Run the chat call in the background, then send `ReplySettled`.
    SpawnSend(PendingSend),
    /// Run the remote delete in the background, then send `ClearSettled`.
    SpawnClear,
    Quit,
}

pub fn update(app: &mut App, action: Action) -> Effect {
    debug!("update: {:?}", action);
    match action {
        Action::HistoryLoaded(history) => {
            // A clear before the fetch settled supersedes the startup history
            if app.history_loaded {
                info!("Dropping {} history messages fetched before a clear", history.len());
                return Effect::None;
            }
            let count = history.len();
            app.conversation.hydrate(history);
            app.history_loaded = true;
            app.status_message = format!("Loaded {count} messages");
            Effect::None
        }
        Action::HistoryFailed(reason) => {
            warn!("Failed to load chat history: {}", reason);
            app.history_loaded = true;
            app.status_message = String::from("History unavailable");
            Effect::None
        }
        Action::Submit(text) => {
            if app.single_flight && app.is_waiting() {
                info!("Submit rejected: a reply is still pending");
                app.status_message = String::from("Still waiting for the previous reply");
                return Effect::None;
            }
            match app
                .conversation
                .begin_send(&text, app.session_id.as_deref())
            {
                Some(pending) => {
                    app.in_flight += 1;
                    app.status_message = app.waiting_status();
                    Effect::SpawnSend(pending)
                }
                None => Effect::None,
            }
        }
        Action::ReplySettled(outcome) => {
            app.conversation.settle(&outcome);
            app.in_flight = app.in_flight.saturating_sub(1);
            app.status_message = match outcome {
                SendOutcome::TransportError(_) => String::from("Backend unreachable"),
                _ => app.waiting_status(),
            };
            Effect::None
        }
        Action::ClearChat => {
            app.conversation.clear();
            app.history_loaded = true;
            app.status_message = String::from("Chat cleared");
            Effect::SpawnClear
        }
        Action::ClearSettled(result) => {
            if let Err(reason) = result {
                warn!("Remote clear failed: {}", reason);
                app.status_message = String::from("Cleared locally; backend clear failed");
            }
            Effect::None
        }
        Action::Quit => Effect::Quit,
    }
}

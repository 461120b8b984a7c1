//! # Application State
//!
//! Core business state for FinChat. Domain logic only, no TUI-specific
//! types. Presentation state lives in the `tui` module.
//!
//! ```text
//! App
//! ├── backend: Arc<dyn ChatBackend>  // remote chat endpoint
//! ├── conversation: Conversation     // the message log
//! ├── session_id: Option<String>     // sent with every chat call
//! ├── status_message: String         // status bar text
//! ├── in_flight: usize               // sends awaiting settlement
//! ├── single_flight: bool            // reject submits while one is pending
//! └── history_loaded: bool           // startup history settled or was superseded by a clear
//! ```
//!
//! The `App` lives from startup to exit. Nothing in it is persisted.
//! State changes only happen through `update(state, action)` in action.rs.

use std::sync::Arc;

use crate::backend::ChatBackend;
use crate::core::config::ResolvedConfig;
use crate::core::conversation::Conversation;

pub struct App {
    pub backend: Arc<dyn ChatBackend>,
    pub conversation: Conversation,
    pub session_id: Option<String>,
    pub status_message: String,
    pub in_flight: usize,
    pub single_flight: bool,
    /// Later `HistoryLoaded` actions are ignored once this is set.
    pub history_loaded: bool,
}

impl App {
    pub fn new(
        backend: Arc<dyn ChatBackend>,
        session_id: Option<String>,
        single_flight: bool,
    ) -> Self {
        Self {
            backend,
            conversation: Conversation::new(),
            session_id,
            status_message: String::from("Loading history..."),
            in_flight: 0,
            single_flight,
            history_loaded: false,
        }
    }

    pub fn from_config(backend: Arc<dyn ChatBackend>, config: &ResolvedConfig) -> Self {
        Self::new(backend, config.session_id.clone(), config.single_flight)
    }

    pub fn is_waiting(&self) -> bool {
        self.in_flight > 0
    }

    /// Status text for the current number of pending sends.
    pub fn waiting_status(&self) -> String {
        match self.in_flight {
            0 => String::from("Ready"),
            1 => String::from("Waiting for reply..."),
            n => format!("Waiting for {n} replies..."),
        }
    }
}

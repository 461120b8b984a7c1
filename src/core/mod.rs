//! # Core Application Logic
//!
//! This module contains FinChat's business logic.
//! It knows nothing about any specific UI technology.
//!
//! ```text
//!                    ┌─────────────────────────┐
//!                    │         CORE            │
//!                    │  (this module)          │
//!                    │                         │
//!                    │  • Conversation (log)   │
//!                    │  • Grouping (by day)    │
//!                    │  • Action + update()    │
//!                    │                         │
//!                    │  No terminal, no HTTP.  │
//!                    └───────────┬─────────────┘
//!                                │
//!            ┌───────────────────┼───────────────────┐
//!            ▼                   ▼                   ▼
//!     ┌────────────┐      ┌────────────┐      ┌────────────┐
//!     │    TUI     │      │    CLI     │      │  Backend   │
//!     │  Adapter   │      │  one-shot  │      │  (reqwest) │
//!     │ (ratatui)  │      │  commands  │      │            │
//!     └────────────┘      └────────────┘      └────────────┘
//! ```
//!
//! ## Modules
//!
//! - [`message`]: The `Message` entity
//! - [`conversation`]: The message log and the send protocol
//! - [`grouping`]: Day-bucketing for display
//! - [`state`]: The `App` struct, all application state in one place
//! - [`action`]: The `Action` enum and the `update()` reducer
//! - [`config`]: Layered configuration

pub mod action;
pub mod config;
pub mod conversation;
pub mod grouping;
pub mod message;
pub mod state;

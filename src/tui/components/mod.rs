//! # TUI Components
//!
//! ## Component Architecture
//!
//! Components in this directory follow two patterns:
//!
//! ### Stateless Components (Props-Based Rendering)
//!
//! Simple display components that receive all data as parameters:
//! - `TitleBar`: top status bar showing the backend and status
//! - `MessageBubble`: a single chat bubble with its time
//!
//! ### Stateful Components (Event-Driven)
//!
//! Components that manage local state and emit events:
//! - `InputBox`: text input field
//! - `MessageList`: scrollable, day-grouped conversation view
//!
//! Components receive external data as "props" (struct fields), not by
//! reaching into `App`. `MessageList` renders many `MessageBubble`s.
//!
//! ```text
//! components/
//! ├── mod.rs           (this file)
//! ├── title_bar.rs     (Top status bar)
//! ├── message.rs       (Single bubble renderer)
//! ├── message_list.rs  (Day-grouped scrollable container)
//! └── input_box/       (Text input and its edit buffer)
//! ```

mod title_bar;
pub use title_bar::TitleBar;

pub mod input_box;
pub mod message;
pub use input_box::{InputBox, InputEvent};
pub mod message_list;
pub use message_list::{MessageList, MessageListState};

//! # TUI Adapter
//!
//! The ratatui-specific layer. Handles terminal I/O, renders the UI,
//! and translates keyboard events into core::Action values.
//!
//! This is the only module that knows about ratatui and crossterm.
//!
//! ## Redraw Strategy
//!
//! - **Waiting** (replies in flight): draws every ~80ms so the spinner turns.
//! - **Idle**: sleeps up to 500ms, only redraws on events, background
//!   results or terminal resize.
//!
//! A `SteadyBlock` cursor style is used instead of a blinking cursor because
//! ratatui's `set_cursor_position` resets the terminal's blink timer on every
//! `draw()` call, making blinking cursors appear erratic during continuous redraws.
//!
//! ## Background work
//!
//! Every network call runs on a tokio task and reports back as an `Action`
//! over an `mpsc` channel. The loop applies those actions through
//! `update()` exactly like user input, so the state is only ever touched
//! from this thread.

mod component;
mod components;
mod event;
mod ui;

use log::{debug, info, warn};
use std::io::stdout;
use std::sync::{Arc, mpsc};
use std::time::{Duration, Instant};

use crossterm::cursor::{Hide, SetCursorStyle, Show};
use crossterm::event::{
    DisableBracketedPaste, DisableMouseCapture, EnableBracketedPaste, EnableMouseCapture,
    KeyboardEnhancementFlags, PopKeyboardEnhancementFlags, PushKeyboardEnhancementFlags,
};
use crossterm::execute;

use crate::backend::{ChatBackend, HttpBackend};
use crate::core::action::{Action, Effect, update};
use crate::core::config::ResolvedConfig;
use crate::core::conversation::PendingSend;
use crate::core::state::App;
use crate::tui::component::EventHandler;
use crate::tui::components::{InputBox, InputEvent, MessageListState};
use crate::tui::event::{TuiEvent, poll_event_immediate, poll_event_timeout};

/// TUI-specific presentation state (not part of core business logic)
pub struct TuiState {
    pub message_list: MessageListState,
    pub input_box: InputBox,
}

impl Default for TuiState {
    fn default() -> Self {
        Self::new()
    }
}

impl TuiState {
    pub fn new() -> Self {
        Self {
            message_list: MessageListState::new(),
            input_box: InputBox::new(),
        }
    }
}

struct TerminalModeGuard;

impl TerminalModeGuard {
    fn new() -> std::io::Result<Self> {
        // Kitty keyboard protocol lets Shift+Enter be told apart from Enter.
        // Terminals that don't support it ignore the request.
        execute!(
            stdout(),
            EnableMouseCapture,
            EnableBracketedPaste,
            Show,
            SetCursorStyle::SteadyBlock,
            PushKeyboardEnhancementFlags(
                KeyboardEnhancementFlags::DISAMBIGUATE_ESCAPE_CODES
                    | KeyboardEnhancementFlags::REPORT_EVENT_TYPES
            )
        )?;
        info!("Terminal modes enabled (mouse, bracketed paste, steady block cursor, keyboard enhancement)");
        Ok(Self)
    }
}

impl Drop for TerminalModeGuard {
    fn drop(&mut self) {
        let _ = execute!(
            stdout(),
            PopKeyboardEnhancementFlags,
            DisableMouseCapture,
            DisableBracketedPaste,
            Hide
        );
    }
}

/// Run the interactive client until the user quits.
///
/// Must be called from within a tokio runtime.
pub fn run(config: ResolvedConfig) -> std::io::Result<()> {
    let backend: Arc<dyn ChatBackend> = Arc::new(HttpBackend::new(config.base_url.clone()));
    let mut app = App::from_config(backend, &config);
    let mut tui = TuiState::new();

    // Channel for actions from background tasks
    let (tx, rx) = mpsc::channel();

    spawn_health_check(app.backend.clone());
    spawn_history(app.backend.clone(), tx.clone());

    let mut terminal = ratatui::init();
    let terminal_mode_guard = TerminalModeGuard::new();
    if let Err(e) = &terminal_mode_guard {
        warn!("Failed to enable terminal modes: {}", e);
    }

    let start_time = Instant::now();
    let mut needs_redraw = true; // Force first frame

    loop {
        let animating = app.is_waiting();
        if animating {
            needs_redraw = true;
        }

        if needs_redraw {
            let spinner_frame = (start_time.elapsed().as_secs_f32() * 12.0) as usize;
            terminal.draw(|f| ui::draw_ui(f, &app, &mut tui, spinner_frame))?;
            needs_redraw = false;
        }

        let timeout = if animating {
            Duration::from_millis(80)
        } else {
            Duration::from_millis(500)
        };
        let first_event = poll_event_timeout(timeout);
        if first_event.is_some() {
            needs_redraw = true;
        }

        // Process first event + drain ALL pending events before next draw
        let mut should_quit = false;
        for event in first_event
            .into_iter()
            .chain(std::iter::from_fn(poll_event_immediate))
        {
            let action = match event {
                TuiEvent::Resize => continue,
                TuiEvent::Quit => Some(Action::Quit),
                TuiEvent::ClearChat => {
                    tui.message_list.scroll_to_bottom();
                    Some(Action::ClearChat)
                }
                TuiEvent::ScrollUp
                | TuiEvent::ScrollDown
                | TuiEvent::ScrollPageUp
                | TuiEvent::ScrollPageDown
                | TuiEvent::ScrollToBottom => {
                    tui.message_list.handle_event(&event);
                    None
                }
                // Up/Down move inside multi-line input first, then scroll the list
                TuiEvent::CursorUp | TuiEvent::CursorDown => {
                    if tui.input_box.handle_event(&event).is_none() {
                        tui.message_list.handle_event(&event);
                    }
                    None
                }
                _ => match tui.input_box.handle_event(&event) {
                    Some(InputEvent::Submit(text)) => {
                        tui.message_list.scroll_to_bottom();
                        Some(Action::Submit(text))
                    }
                    Some(InputEvent::ContentChanged) | None => None,
                },
            };

            if let Some(action) = action
                && apply(&mut app, action, &tx)
            {
                should_quit = true;
            }
        }

        if should_quit {
            break;
        }

        // Results from background tasks
        while let Ok(action) = rx.try_recv() {
            needs_redraw = true;
            if apply(&mut app, action, &tx) {
                should_quit = true;
            }
        }

        if should_quit {
            break;
        }
    }

    info!(
        "Exiting with {} messages in the log, {} replies pending",
        app.conversation.len(),
        app.in_flight
    );
    drop(terminal_mode_guard);
    ratatui::restore();
    Ok(())
}

/// Feed an action through `update()` and carry out the returned effect.
/// Returns true when the loop should exit.
fn apply(app: &mut App, action: Action, tx: &mpsc::Sender<Action>) -> bool {
    match update(app, action) {
        Effect::None => false,
        Effect::SpawnSend(pending) => {
            spawn_send(app.backend.clone(), pending, tx.clone());
            false
        }
        Effect::SpawnClear => {
            spawn_clear(app.backend.clone(), tx.clone());
            false
        }
        Effect::Quit => true,
    }
}

fn spawn_history(backend: Arc<dyn ChatBackend>, tx: mpsc::Sender<Action>) {
    info!("Spawning history load from {}", backend.location());
    tokio::spawn(async move {
        let action = match backend.fetch_history().await {
            Ok(history) => Action::HistoryLoaded(history),
            Err(e) => Action::HistoryFailed(e.to_string()),
        };
        if tx.send(action).is_err() {
            warn!("Failed to deliver history result: receiver dropped");
        }
    });
}

fn spawn_send(backend: Arc<dyn ChatBackend>, pending: PendingSend, tx: mpsc::Sender<Action>) {
    info!("Spawning chat request ({} chars)", pending.text.len());
    tokio::spawn(async move {
        let started = Instant::now();
        let outcome = pending.dispatch(backend.as_ref()).await;
        debug!(
            "Chat request settled as {} after {}ms",
            outcome.label(),
            started.elapsed().as_millis()
        );
        if tx.send(Action::ReplySettled(outcome)).is_err() {
            warn!("Failed to deliver chat reply: receiver dropped");
        }
    });
}

fn spawn_clear(backend: Arc<dyn ChatBackend>, tx: mpsc::Sender<Action>) {
    info!("Spawning remote clear");
    tokio::spawn(async move {
        let result = backend.clear_history().await.map_err(|e| e.to_string());
        if tx.send(Action::ClearSettled(result)).is_err() {
            warn!("Failed to deliver clear result: receiver dropped");
        }
    });
}

/// Log whether the backend answers its health route. Never touches state.
fn spawn_health_check(backend: Arc<dyn ChatBackend>) {
    tokio::spawn(async move {
        match backend.health().await {
            Ok(message) => info!("Backend health: {}", message),
            Err(e) => warn!("Backend health check failed: {}", e),
        }
    });
}

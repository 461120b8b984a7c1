//! # InputBox Component
//!
//! Handles user input.
//!
//! ## Responsibilities
//!
//! - Capture text input (typing, paste)
//! - Handle editing (backspace, delete, cursor and word movement)
//! - Handle submission (Enter): the buffer is cleared as soon as a non-blank
//!   message is submitted, before the backend answers
//! - Show a placeholder while empty
//!
//! ## State Management
//!
//! The text and cursor live in `EditBuffer`. The box only adds the scroll
//! offset for long input and the width it was last drawn at.

mod buffer;

use ratatui::Frame;
use ratatui::layout::Rect;
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::Line;
use ratatui::widgets::{Block, BorderType, Padding, Paragraph};

use crate::tui::component::{Component, EventHandler};
use crate::tui::event::TuiEvent;

use buffer::EditBuffer;

/// Border (2) + padding (2) consumed horizontally by the bordered block
const HORIZONTAL_OVERHEAD: u16 = 4;
/// Top + bottom borders consumed vertically
const VERTICAL_OVERHEAD: u16 = 2;
/// Maximum visible content lines before internal scrolling kicks in
const MAX_VISIBLE_LINES: u16 = 5;

pub const PLACEHOLDER: &str = "Ask about TFSAs, RRSPs, etc...";

/// High-level events emitted by the InputBox
#[derive(Debug, Clone, PartialEq)]
pub enum InputEvent {
    /// User submitted non-blank text (Enter pressed)
    Submit(String),
    /// Text or cursor changed
    ContentChanged,
}

pub struct InputBox {
    buffer: EditBuffer,
    /// First visible line when content exceeds MAX_VISIBLE_LINES
    scroll_offset: u16,
    /// Outer width from the last render (used for vertical movement)
    last_width: u16,
}

impl Default for InputBox {
    fn default() -> Self {
        Self::new()
    }
}

impl InputBox {
    pub fn new() -> Self {
        Self {
            buffer: EditBuffer::new(),
            scroll_offset: 0,
            last_width: 80,
        }
    }

    pub fn text(&self) -> &str {
        self.buffer.text()
    }

    fn inner_width(width: u16) -> usize {
        width.saturating_sub(HORIZONTAL_OVERHEAD).max(1) as usize
    }

    /// Height needed for the current content, clamped to the viewport limit.
    pub fn calculate_height(&self, width: u16) -> u16 {
        let lines = self.buffer.visual_lines(Self::inner_width(width)).len() as u16;
        lines.min(MAX_VISIBLE_LINES) + VERTICAL_OVERHEAD
    }

    /// Keep the cursor line inside the visible window.
    fn update_scroll_offset(&mut self, width: u16) {
        let (row, _) = self.buffer.cursor_position(Self::inner_width(width));
        let row = row as u16;
        if row < self.scroll_offset {
            self.scroll_offset = row;
        } else if row >= self.scroll_offset + MAX_VISIBLE_LINES {
            self.scroll_offset = row + 1 - MAX_VISIBLE_LINES;
        }
    }
}

impl Component for InputBox {
    fn render(&mut self, frame: &mut Frame, area: Rect) {
        self.last_width = area.width;
        self.update_scroll_offset(area.width);

        let block = Block::bordered()
            .border_type(BorderType::Rounded)
            .padding(Padding::horizontal(1))
            .title("Message (Enter to send, Ctrl+L to clear)");
        let inner = block.inner(area);

        let paragraph = if self.buffer.text().is_empty() {
            Paragraph::new(PLACEHOLDER).style(
                Style::default()
                    .fg(Color::DarkGray)
                    .add_modifier(Modifier::ITALIC),
            )
        } else {
            let text = self.buffer.text();
            let lines: Vec<Line> = self
                .buffer
                .visual_lines(Self::inner_width(area.width))
                .into_iter()
                .skip(self.scroll_offset as usize)
                .take(MAX_VISIBLE_LINES as usize)
                .map(|span| Line::raw(&text[span]))
                .collect();
            Paragraph::new(lines).style(Style::default().fg(Color::Green))
        };

        frame.render_widget(paragraph.block(block), area);

        let (row, col) = self.buffer.cursor_position(Self::inner_width(area.width));
        let visible_row = (row as u16).saturating_sub(self.scroll_offset);
        frame.set_cursor_position((inner.x + col as u16, inner.y + visible_row));
    }
}

impl EventHandler for InputBox {
    type Event = InputEvent;

    fn handle_event(&mut self, event: &TuiEvent) -> Option<Self::Event> {
        let width = Self::inner_width(self.last_width);
        let changed = match event {
            TuiEvent::InputChar(c) => {
                let mut tmp = [0u8; 4];
                self.buffer.insert_str(c.encode_utf8(&mut tmp));
                true
            }
            TuiEvent::Paste(text) => {
                // Normalize CRLF from some terminals
                self.buffer.insert_str(&text.replace("\r\n", "\n").replace('\r', "\n"));
                true
            }
            TuiEvent::Backspace => self.buffer.backspace(),
            TuiEvent::Delete => self.buffer.delete(),
            TuiEvent::CursorLeft => self.buffer.move_left(),
            TuiEvent::CursorRight => self.buffer.move_right(),
            TuiEvent::CursorHome => self.buffer.move_home(),
            TuiEvent::CursorEnd => self.buffer.move_end(),
            TuiEvent::WordLeft => self.buffer.move_word_left(),
            TuiEvent::WordRight => self.buffer.move_word_right(),
            TuiEvent::CursorUp => self.buffer.move_vertically(-1, width),
            TuiEvent::CursorDown => self.buffer.move_vertically(1, width),
            TuiEvent::Submit => {
                if self.buffer.is_blank() {
                    return None;
                }
                self.scroll_offset = 0;
                return Some(InputEvent::Submit(self.buffer.take()));
            }
            _ => false,
        };
        changed.then_some(InputEvent::ContentChanged)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ratatui::Terminal;
    use ratatui::backend::TestBackend;

    fn type_text(input: &mut InputBox, text: &str) {
        for c in text.chars() {
            input.handle_event(&TuiEvent::InputChar(c));
        }
    }

    fn screen_text(terminal: &Terminal<TestBackend>) -> String {
        terminal
            .backend()
            .buffer()
            .content()
            .iter()
            .map(|c| c.symbol())
            .collect()
    }

    #[test]
    fn test_handle_input() {
        let mut input = InputBox::new();

        let res = input.handle_event(&TuiEvent::InputChar('a'));
        assert_eq!(res, Some(InputEvent::ContentChanged));
        type_text(&mut input, "b");
        assert_eq!(input.text(), "ab");

        let res = input.handle_event(&TuiEvent::Backspace);
        assert_eq!(res, Some(InputEvent::ContentChanged));
        assert_eq!(input.text(), "a");
    }

    #[test]
    fn test_submit_clears_buffer() {
        let mut input = InputBox::new();
        type_text(&mut input, "What is a TFSA?");

        let res = input.handle_event(&TuiEvent::Submit);
        assert_eq!(res, Some(InputEvent::Submit("What is a TFSA?".to_string())));
        assert!(input.text().is_empty(), "Buffer should be cleared after submit");
    }

    #[test]
    fn test_blank_submit_is_ignored_and_kept() {
        let mut input = InputBox::new();
        type_text(&mut input, "   ");
        assert_eq!(input.handle_event(&TuiEvent::Submit), None);
        assert_eq!(input.text(), "   ");
    }

    #[test]
    fn test_paste_normalizes_line_endings() {
        let mut input = InputBox::new();
        input.handle_event(&TuiEvent::Paste("one\r\ntwo\rthree".to_string()));
        assert_eq!(input.text(), "one\ntwo\nthree");
    }

    #[test]
    fn test_cursor_up_at_first_line_reports_no_change() {
        let mut input = InputBox::new();
        type_text(&mut input, "single line");
        assert_eq!(input.handle_event(&TuiEvent::CursorUp), None);
    }

    #[test]
    fn test_height_grows_then_clamps() {
        let mut input = InputBox::new();
        assert_eq!(input.calculate_height(40), 1 + VERTICAL_OVERHEAD);
        type_text(&mut input, "a\nb\nc");
        assert_eq!(input.calculate_height(40), 3 + VERTICAL_OVERHEAD);
        type_text(&mut input, "\nd\ne\nf\ng");
        assert_eq!(input.calculate_height(40), MAX_VISIBLE_LINES + VERTICAL_OVERHEAD);
    }

    #[test]
    fn test_render_shows_placeholder_when_empty() {
        let backend = TestBackend::new(60, 3);
        let mut terminal = Terminal::new(backend).unwrap();
        let mut input = InputBox::new();

        terminal.draw(|f| input.render(f, f.area())).unwrap();

        assert!(screen_text(&terminal).contains(PLACEHOLDER));
    }

    #[test]
    fn test_render_scrolls_to_cursor() {
        let backend = TestBackend::new(30, 7);
        let mut terminal = Terminal::new(backend).unwrap();
        let mut input = InputBox::new();
        type_text(&mut input, "l1\nl2\nl3\nl4\nl5\nl6\nl7");

        terminal.draw(|f| input.render(f, f.area())).unwrap();

        let text = screen_text(&terminal);
        assert!(text.contains("l7"));
        assert!(!text.contains("l1"));
    }
}

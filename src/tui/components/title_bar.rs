//! # TitleBar Component
//!
//! Single-line status bar at the top of the screen.
//!
//! Shows the app name, the backend it talks to, the current status and,
//! while replies are pending, a spinner. A "↓ New" marker appears when the
//! user has scrolled up and new messages arrived below.

use ratatui::Frame;
use ratatui::layout::Rect;
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};

use crate::tui::component::Component;

const SPINNER: [&str; 4] = ["|", "/", "-", "\\"];

/// Stateless title bar; all fields are props.
pub struct TitleBar {
    pub backend: String,
    pub status_message: String,
    /// Spinner frame while waiting; `None` hides the spinner
    pub spinner_frame: Option<usize>,
    pub has_unseen_content: bool,
}

impl TitleBar {
    pub fn new(
        backend: String,
        status_message: String,
        spinner_frame: Option<usize>,
        has_unseen_content: bool,
    ) -> Self {
        Self {
            backend,
            status_message,
            spinner_frame,
            has_unseen_content,
        }
    }

    fn text(&self) -> String {
        let mut text = format!("FinChat AI (backend: {})", self.backend);
        if !self.status_message.is_empty() {
            text.push_str(" | ");
            if let Some(frame) = self.spinner_frame {
                text.push_str(SPINNER[frame % SPINNER.len()]);
                text.push(' ');
            }
            text.push_str(&self.status_message);
        }
        if self.has_unseen_content {
            text.push_str(" | ↓ New");
        }
        text
    }
}

impl Component for TitleBar {
    fn render(&mut self, frame: &mut Frame, area: Rect) {
        let line = Line::from(Span::styled(
            self.text(),
            Style::default().add_modifier(Modifier::BOLD).fg(Color::White),
        ));
        frame.render_widget(line, area);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ratatui::Terminal;
    use ratatui::backend::TestBackend;

    fn render_to_string(title_bar: &mut TitleBar) -> String {
        let backend = TestBackend::new(100, 1);
        let mut terminal = Terminal::new(backend).unwrap();
        terminal.draw(|f| title_bar.render(f, f.area())).unwrap();
        terminal
            .backend()
            .buffer()
            .content()
            .iter()
            .map(|c| c.symbol())
            .collect()
    }

    #[test]
    fn test_title_bar_with_status() {
        let mut title_bar = TitleBar::new(
            "http://localhost:8000".to_string(),
            "Loaded 4 messages".to_string(),
            None,
            false,
        );
        let text = render_to_string(&mut title_bar);
        assert!(text.contains("FinChat AI"));
        assert!(text.contains("http://localhost:8000"));
        assert!(text.contains("Loaded 4 messages"));
        assert!(!text.contains("↓ New"));
    }

    #[test]
    fn test_title_bar_without_status_has_no_separator() {
        let title_bar = TitleBar::new("http://x".to_string(), String::new(), None, false);
        assert_eq!(title_bar.text(), "FinChat AI (backend: http://x)");
    }

    #[test]
    fn test_spinner_and_unseen_marker() {
        let title_bar = TitleBar::new(
            "http://x".to_string(),
            "Waiting for reply...".to_string(),
            Some(5),
            true,
        );
        assert_eq!(
            title_bar.text(),
            "FinChat AI (backend: http://x) | / Waiting for reply... | ↓ New"
        );
    }
}

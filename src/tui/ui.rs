use chrono::Local;
use ratatui::Frame;
use ratatui::layout::{Constraint, Layout};

use crate::core::state::App;
use crate::tui::TuiState;
use crate::tui::component::Component;
use crate::tui::components::{MessageList, TitleBar};

/// Lay out and draw one frame: title bar, conversation, input box.
pub fn draw_ui(frame: &mut Frame, app: &App, tui: &mut TuiState, spinner_frame: usize) {
    use Constraint::{Length, Min};

    let input_height = tui.input_box.calculate_height(frame.area().width);
    let layout = Layout::vertical([Length(1), Min(0), Length(input_height)]);
    let [title_area, main_area, input_area] = layout.areas(frame.area());

    MessageList::new(&mut tui.message_list, app.conversation.messages(), Local)
        .render(frame, main_area);

    TitleBar::new(
        app.backend.location().to_string(),
        app.status_message.clone(),
        app.is_waiting().then_some(spinner_frame),
        tui.message_list.has_unseen_content,
    )
    .render(frame, title_area);

    tui.input_box.render(frame, input_area);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::action::{Action, update};
    use crate::test_support::{bot, test_app, user};
    use ratatui::Terminal;
    use ratatui::backend::TestBackend;

    fn draw(app: &App, tui: &mut TuiState) -> String {
        let backend = TestBackend::new(80, 24);
        let mut terminal = Terminal::new(backend).unwrap();
        terminal.draw(|f| draw_ui(f, app, tui, 0)).unwrap();
        terminal
            .backend()
            .buffer()
            .content()
            .iter()
            .map(|c| c.symbol())
            .collect()
    }

    #[test]
    fn test_draw_ui_empty_conversation() {
        let app = test_app();
        let mut tui = TuiState::new();
        let text = draw(&app, &mut tui);
        assert!(text.contains("FinChat AI (backend: mock://backend)"));
        assert!(text.contains("Loading history..."));
        assert!(text.contains("Enter to send"));
    }

    #[test]
    fn test_draw_ui_shows_messages_and_spinner() {
        let mut app = test_app();
        update(
            &mut app,
            Action::HistoryLoaded(vec![user("What is an RRSP?"), bot("A retirement plan.")]),
        );
        update(&mut app, Action::Submit("And a TFSA?".into()));

        let mut tui = TuiState::new();
        let text = draw(&app, &mut tui);
        assert!(text.contains("What is an RRSP?"));
        assert!(text.contains("A retirement plan."));
        assert!(text.contains("And a TFSA?"));
        assert!(text.contains("| Waiting for reply..."));
    }
}

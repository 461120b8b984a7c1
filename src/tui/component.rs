use ratatui::Frame;
use ratatui::layout::Rect;

use super::event::TuiEvent;

/// Something that draws itself into a region of the frame.
///
/// `render` takes `&mut self` because the message list and input box
/// update scroll offsets and measured heights while drawing.
pub trait Component {
    fn render(&mut self, frame: &mut Frame, area: Rect);
}

/// Something that consumes terminal events and may report a higher-level
/// event back to the loop (`InputEvent::Submit` for the input box).
pub trait EventHandler {
    type Event;

    /// `None` means the event was ignored or produced nothing to report.
    fn handle_event(&mut self, event: &TuiEvent) -> Option<Self::Event>;
}

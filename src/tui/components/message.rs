use ratatui::buffer::Buffer;
use ratatui::layout::{Alignment, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::widgets::{Block, BorderType, Padding, Paragraph, Widget, Wrap};
use unicode_width::UnicodeWidthStr;

use crate::core::message::{Message, Sender};

/// Horizontal padding (per side) between the border and text content.
const CONTENT_PAD_H: u16 = 1;
/// Total horizontal space consumed by borders (1 left + 1 right) and padding.
const HORIZONTAL_OVERHEAD: u16 = 2 + CONTENT_PAD_H * 2;
/// Total vertical space consumed by borders (1 top + 1 bottom).
const VERTICAL_OVERHEAD: u16 = 2;
/// Bubbles never take more than this share of the row (percent).
const MAX_BUBBLE_PERCENT: u16 = 75;

/// A chat bubble: user messages on the right, bot messages on the left,
/// with the clock time underneath when the message has a timestamp.
///
/// Transient: built fresh each frame from a `&Message` and the already
/// formatted time, so it holds no state.
#[derive(Clone, Copy)]
pub struct MessageBubble<'a> {
    pub message: &'a Message,
    pub time: Option<&'a str>,
}

impl<'a> MessageBubble<'a> {
    pub fn new(message: &'a Message, time: Option<&'a str>) -> Self {
        Self { message, time }
    }

    fn label(sender: Sender) -> &'static str {
        match sender {
            Sender::User => "you",
            Sender::Bot => "finchat",
        }
    }

    pub fn style(sender: Sender) -> Style {
        match sender {
            Sender::User => Style::default().fg(Color::Green),
            Sender::Bot => Style::default().fg(Color::Blue),
        }
    }

    /// Outer width of the bubble in a row `row_width` columns wide.
    ///
    /// Short messages get a snug bubble; long ones are capped so the
    /// left/right alignment stays visible.
    pub fn bubble_width(message: &Message, row_width: u16) -> u16 {
        let max = (row_width as u32 * MAX_BUBBLE_PERCENT as u32 / 100) as u16;
        let longest = message
            .content
            .trim()
            .lines()
            .map(UnicodeWidthStr::width)
            .max()
            .unwrap_or(0)
            .max(Self::label(message.sender).len()) as u16;
        (longest.saturating_add(HORIZONTAL_OVERHEAD)).min(max.max(HORIZONTAL_OVERHEAD + 1))
    }

    /// Height of the bubble plus its time line, without rendering it.
    ///
    /// Wrapping uses `textwrap` with options matching Ratatui's `Paragraph`
    /// word wrapping so the prediction lines up with what gets drawn.
    pub fn calculate_height(message: &Message, has_time: bool, row_width: u16) -> u16 {
        let time_rows = u16::from(has_time);
        let content_width = Self::bubble_width(message, row_width).saturating_sub(HORIZONTAL_OVERHEAD);
        if content_width == 0 {
            return 1 + time_rows;
        }

        let content = message.content.trim();
        if content.is_empty() {
            return VERTICAL_OVERHEAD + time_rows;
        }

        let options = textwrap::Options::new(content_width as usize)
            .break_words(true)
            .word_separator(textwrap::WordSeparator::AsciiSpace);
        let lines = textwrap::wrap(content, options);
        (lines.len() as u16).max(1) + VERTICAL_OVERHEAD + time_rows
    }
}

impl<'a> Widget for MessageBubble<'a> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let sender = self.message.sender;
        let style = Self::style(sender);
        let width = Self::bubble_width(self.message, area.width).min(area.width);
        let x = match sender {
            Sender::User => area.x + area.width - width,
            Sender::Bot => area.x,
        };
        let time_rows = u16::from(self.time.is_some());
        let bubble_area = Rect::new(x, area.y, width, area.height.saturating_sub(time_rows));

        let block = Block::bordered()
            .title(Self::label(sender))
            .border_type(BorderType::Rounded)
            .border_style(style.add_modifier(Modifier::DIM))
            .title_style(style)
            .padding(Padding::horizontal(CONTENT_PAD_H));
        let inner = block.inner(bubble_area);
        block.render(bubble_area, buf);

        Paragraph::new(self.message.content.trim())
            .style(style)
            .wrap(Wrap { trim: true })
            .render(inner, buf);

        if let Some(time) = self.time {
            let alignment = match sender {
                Sender::User => Alignment::Right,
                Sender::Bot => Alignment::Left,
            };
            let time_area = Rect::new(area.x, area.y + bubble_area.height, area.width, 1);
            Paragraph::new(time)
                .alignment(alignment)
                .style(Style::default().fg(Color::DarkGray))
                .render(time_area, buf);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::{bot, user};

    fn row_text(buf: &Buffer, y: u16) -> String {
        (0..buf.area.width)
            .map(|x| buf[(x, y)].symbol().to_string())
            .collect()
    }

    #[test]
    fn calculate_height_single_line() {
        let msg = user("Hello");
        assert_eq!(MessageBubble::calculate_height(&msg, false, 80), 1 + VERTICAL_OVERHEAD);
    }

    #[test]
    fn calculate_height_adds_time_row() {
        let msg = user("Hello");
        assert_eq!(MessageBubble::calculate_height(&msg, true, 80), 2 + VERTICAL_OVERHEAD);
    }

    #[test]
    fn calculate_height_empty_content_returns_border_height() {
        let msg = bot("   ");
        assert_eq!(MessageBubble::calculate_height(&msg, false, 80), VERTICAL_OVERHEAD);
    }

    #[test]
    fn calculate_height_wraps_long_content() {
        // Row 20 → bubble capped at 15, content width 11
        let msg = bot("aaaa bbbb cccc dddd");
        assert_eq!(MessageBubble::calculate_height(&msg, false, 20), 2 + VERTICAL_OVERHEAD);
    }

    #[test]
    fn bubble_width_is_snug_for_short_text() {
        let msg = user("Hello there");
        assert_eq!(MessageBubble::bubble_width(&msg, 80), 11 + HORIZONTAL_OVERHEAD);
    }

    #[test]
    fn bubble_width_is_capped() {
        let msg = bot(&"x".repeat(200));
        assert_eq!(MessageBubble::bubble_width(&msg, 80), 60);
    }

    #[test]
    fn user_bubble_is_right_aligned_bot_left() {
        let area = Rect::new(0, 0, 40, 4);

        let mut buf = Buffer::empty(area);
        let msg = user("hi");
        MessageBubble::new(&msg, Some("09:05")).render(area, &mut buf);
        let top = row_text(&buf, 0);
        assert!(top.starts_with(' '), "user bubble should not touch the left edge");
        assert!(top.trim_end().ends_with('╮'));
        assert!(row_text(&buf, 3).trim_end().ends_with("09:05"));

        let mut buf = Buffer::empty(area);
        let msg = bot("hello");
        MessageBubble::new(&msg, None).render(area, &mut buf);
        assert!(row_text(&buf, 0).starts_with('╭'));
    }

    #[test]
    fn styles_differ_by_sender() {
        assert_eq!(MessageBubble::style(Sender::User).fg, Some(Color::Green));
        assert_eq!(MessageBubble::style(Sender::Bot).fg, Some(Color::Blue));
    }
}

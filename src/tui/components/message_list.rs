//! # MessageList Component
//!
//! Scrollable view of the conversation, grouped by day.
//!
//! ## Responsibilities
//!
//! - Group the log by calendar day (local time) and draw a date header
//!   above each group
//! - Draw each message as a bubble
//! - Manage scrolling: stick to the bottom until the user scrolls up
//! - Flag new content that arrived below the viewport
//!
//! ## Architecture
//!
//! `MessageList` is a transient component (created each frame) that wraps
//! `&'a mut MessageListState` (persistent state) and the message slice
//! (props). Grouping is recomputed every frame and never stored.

use std::fmt::Display;
use std::ops::Range;

use chrono::TimeZone;
use ratatui::Frame;
use ratatui::layout::{Alignment, Position, Rect, Size};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::Line;
use ratatui::widgets::Paragraph;
use tui_scrollview::{ScrollView, ScrollViewState, ScrollbarVisibility};

use crate::core::grouping::{DayKey, format_time, group_by_day};
use crate::core::message::Message;
use crate::tui::component::{Component, EventHandler};
use crate::tui::components::input_box::PLACEHOLDER;
use crate::tui::components::message::MessageBubble;
use crate::tui::event::TuiEvent;

/// Height of a date header row.
const HEADER_HEIGHT: u16 = 1;

/// Scroll and layout state for the message list.
/// Must be persisted in the parent TuiState.
pub struct MessageListState {
    /// Scroll offset and view state
    pub scroll_state: ScrollViewState,
    /// Row heights from the last render
    pub layout: RowLayout,
    /// When true, auto-scroll to bottom on new content
    pub stick_to_bottom: bool,
    /// Rows arrived below the viewport while scrolled up
    pub has_unseen_content: bool,
    /// Last known viewport height (for scroll clamping between frames)
    pub viewport_height: u16,
    /// Row count at the last render
    last_row_count: usize,
}

impl Default for MessageListState {
    fn default() -> Self {
        Self::new()
    }
}

impl MessageListState {
    pub fn new() -> Self {
        Self {
            scroll_state: ScrollViewState::default(),
            layout: RowLayout::default(),
            stick_to_bottom: true,
            has_unseen_content: false,
            viewport_height: 0,
            last_row_count: 0,
        }
    }

    fn max_offset(&self) -> u16 {
        self.layout.total_height().saturating_sub(self.viewport_height)
    }

    /// Clamp scroll offset so it never exceeds the content bounds.
    pub fn clamp_scroll(&mut self) {
        let max_y = self.max_offset();
        let current = self.scroll_state.offset();
        if current.y > max_y {
            self.scroll_state.set_offset(Position {
                x: current.x,
                y: max_y,
            });
        }
    }

    /// Re-engage auto-scroll if the user has reached the bottom.
    pub fn repin_if_at_bottom(&mut self) {
        let max_y = self.max_offset();
        let current = self.scroll_state.offset();
        if current.y >= max_y {
            self.stick_to_bottom = true;
            self.has_unseen_content = false;
            self.scroll_state.set_offset(Position {
                x: current.x,
                y: max_y,
            });
        }
    }

    pub fn scroll_to_bottom(&mut self) {
        self.stick_to_bottom = true;
        self.has_unseen_content = false;
        self.scroll_state.scroll_to_bottom();
    }
}

/// One drawable row of the list.
pub enum Row<'a> {
    Header(DayKey),
    Bubble {
        message: &'a Message,
        time: Option<String>,
    },
}

impl Row<'_> {
    fn height(&self, width: u16) -> u16 {
        match self {
            Row::Header(_) => HEADER_HEIGHT,
            Row::Bubble { message, time } => {
                MessageBubble::calculate_height(message, time.is_some(), width)
            }
        }
    }
}

/// Flatten the day groups into header and bubble rows.
pub fn build_rows<'a, Tz>(messages: &'a [Message], tz: &Tz) -> Vec<Row<'a>>
where
    Tz: TimeZone,
    Tz::Offset: Display,
{
    let mut rows = Vec::with_capacity(messages.len());
    for group in group_by_day(messages, tz) {
        rows.push(Row::Header(group.day));
        for message in group.messages {
            rows.push(Row::Bubble {
                message,
                time: format_time(message, tz),
            });
        }
    }
    rows
}

fn header_line(day: DayKey) -> Line<'static> {
    Line::from(format!("── {} ──", day.header()))
        .style(Style::default().fg(Color::DarkGray).add_modifier(Modifier::BOLD))
        .alignment(Alignment::Center)
}

/// Scrollable conversation view component.
/// Created fresh each frame with references to state and data.
pub struct MessageList<'a, Tz: TimeZone> {
    pub state: &'a mut MessageListState,
    pub messages: &'a [Message],
    pub tz: Tz,
}

impl<'a, Tz: TimeZone> MessageList<'a, Tz> {
    pub fn new(state: &'a mut MessageListState, messages: &'a [Message], tz: Tz) -> Self {
        Self {
            state,
            messages,
            tz,
        }
    }
}

impl<Tz> Component for MessageList<'_, Tz>
where
    Tz: TimeZone,
    Tz::Offset: Display,
{
    fn render(&mut self, frame: &mut Frame, area: Rect) {
        self.state.viewport_height = area.height;

        if self.messages.is_empty() {
            self.state.layout = RowLayout::default();
            self.state.last_row_count = 0;
            self.state.has_unseen_content = false;
            render_empty(frame, area);
            return;
        }

        let content_width = area.width.saturating_sub(1); // -1 for scrollbar safe area
        let rows = build_rows(self.messages, &self.tz);

        // 1. Measure
        self.state.layout = RowLayout::measure(&rows, content_width);
        if rows.len() > self.state.last_row_count && !self.state.stick_to_bottom {
            self.state.has_unseen_content = true;
        }
        self.state.last_row_count = rows.len();

        // 2. Clamp scroll offset to prevent overscrolling past content.
        if !self.state.stick_to_bottom {
            self.state.clamp_scroll();
        }

        let total_height = self.state.layout.total_height();
        let scroll_offset = if self.state.stick_to_bottom {
            self.state.max_offset()
        } else {
            self.state.scroll_state.offset().y
        };
        let visible = self.state.layout.visible_range(scroll_offset, area.height);

        // 3. Render visible rows into a ScrollView
        let mut scroll_view = ScrollView::new(Size::new(content_width, total_height))
            .vertical_scrollbar_visibility(ScrollbarVisibility::Always)
            .horizontal_scrollbar_visibility(ScrollbarVisibility::Never);

        let mut y_offset = self.state.layout.row_top(visible.start);
        for i in visible {
            let height = self.state.layout.heights[i];
            let rect = Rect::new(0, y_offset, content_width, height);
            match &rows[i] {
                Row::Header(day) => scroll_view.render_widget(header_line(*day), rect),
                Row::Bubble { message, time } => {
                    scroll_view.render_widget(MessageBubble::new(message, time.as_deref()), rect)
                }
            }
            y_offset += height;
        }

        if self.state.stick_to_bottom {
            self.state.scroll_state.scroll_to_bottom();
        }

        frame.render_stateful_widget(scroll_view, area, &mut self.state.scroll_state);
    }
}

fn render_empty(frame: &mut Frame, area: Rect) {
    let lines = vec![
        Line::from("FinChat AI").style(Style::default().add_modifier(Modifier::BOLD)),
        Line::from(""),
        Line::from(PLACEHOLDER).style(Style::default().fg(Color::DarkGray)),
    ];
    let top = area.y + area.height.saturating_sub(lines.len() as u16) / 2;
    let text_area = Rect::new(area.x, top, area.width, area.height.min(lines.len() as u16));
    frame.render_widget(
        Paragraph::new(lines).alignment(Alignment::Center),
        text_area,
    );
}

/// EventHandler lives on `MessageListState` because `MessageList` is
/// recreated each frame and cannot hold the scroll position.
impl EventHandler for MessageListState {
    type Event = ();

    fn handle_event(&mut self, event: &TuiEvent) -> Option<Self::Event> {
        match event {
            TuiEvent::ScrollUp | TuiEvent::CursorUp => {
                self.scroll_state.scroll_up();
                self.stick_to_bottom = false;
            }
            TuiEvent::ScrollDown | TuiEvent::CursorDown => {
                self.scroll_state.scroll_down();
                self.repin_if_at_bottom();
            }
            TuiEvent::ScrollPageUp => {
                self.scroll_state.scroll_page_up();
                self.stick_to_bottom = false;
            }
            TuiEvent::ScrollPageDown => {
                self.scroll_state.scroll_page_down();
                self.repin_if_at_bottom();
            }
            TuiEvent::ScrollToBottom => self.scroll_to_bottom(),
            _ => {}
        }
        None
    }
}

/// Row heights and their running totals.
#[derive(Debug, Default, Clone, PartialEq)]
pub struct RowLayout {
    pub heights: Vec<u16>,
    /// `prefix_heights[i]` = bottom edge of row `i`
    pub prefix_heights: Vec<u16>,
}

impl RowLayout {
    pub fn measure(rows: &[Row<'_>], width: u16) -> Self {
        Self::from_heights(rows.iter().map(|row| row.height(width)).collect())
    }

    pub fn from_heights(heights: Vec<u16>) -> Self {
        let prefix_heights = heights
            .iter()
            .scan(0u16, |acc, &h| {
                *acc = acc.saturating_add(h);
                Some(*acc)
            })
            .collect();
        Self {
            heights,
            prefix_heights,
        }
    }

    pub fn total_height(&self) -> u16 {
        self.prefix_heights.last().copied().unwrap_or(0)
    }

    /// Top edge of row `index`.
    pub fn row_top(&self, index: usize) -> u16 {
        if index == 0 {
            0
        } else {
            self.prefix_heights[index - 1]
        }
    }

    /// Rows intersecting the viewport, padded by half a screen each way.
    pub fn visible_range(&self, scroll_offset: u16, viewport_height: u16) -> Range<usize> {
        let buffer = viewport_height / 2;
        let buffered_start = scroll_offset.saturating_sub(buffer);
        let buffered_end = scroll_offset
            .saturating_add(viewport_height)
            .saturating_add(buffer);

        let start = self
            .prefix_heights
            .partition_point(|&end| end <= buffered_start);
        let end = self
            .prefix_heights
            .partition_point(|&end| end < buffered_end)
            .saturating_add(1)
            .min(self.prefix_heights.len());

        start..end.max(start)
    }
}

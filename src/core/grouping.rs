//! # Date Grouping
//!
//! Pure transform from the message log to day-bucketed groups for display.
//! Recomputed every frame, never stored.
//!
//! Groups come out in first-seen order of their day, and messages keep their
//! log order inside a group. Nothing is sorted by date value: concatenating
//! the groups gives back a stable partition of the log.

use std::collections::HashMap;
use std::fmt;

use chrono::{DateTime, NaiveDate, TimeZone, Utc};

use crate::core::message::Message;

/// Display key used for messages that carry no timestamp.
pub const UNDATED_KEY: &str = "no-date";

/// The calendar day a message belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DayKey {
    Date(NaiveDate),
    Undated,
}

impl DayKey {
    /// Day of `timestamp` as seen from `tz`.
    pub fn for_timestamp<Tz: TimeZone>(timestamp: Option<&DateTime<Utc>>, tz: &Tz) -> Self {
        match timestamp {
            Some(ts) => DayKey::Date(ts.with_timezone(tz).date_naive()),
            None => DayKey::Undated,
        }
    }

    /// Header text, e.g. `July 4, 2025`. Undated renders as the sentinel.
    pub fn header(&self) -> String {
        match self {
            DayKey::Date(date) => date.format("%B %-d, %Y").to_string(),
            DayKey::Undated => UNDATED_KEY.to_string(),
        }
    }
}

impl fmt::Display for DayKey {
    /// Machine form: `YYYY-MM-DD`, or the sentinel.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DayKey::Date(date) => write!(f, "{}", date.format("%Y-%m-%d")),
            DayKey::Undated => f.write_str(UNDATED_KEY),
        }
    }
}

/// Messages of one day, in log order.
#[derive(Debug, Clone, PartialEq)]
pub struct DayGroup<'a> {
    pub day: DayKey,
    pub messages: Vec<&'a Message>,
}

/// Bucket `messages` by calendar day in `tz`.
pub fn group_by_day<'a, Tz: TimeZone>(messages: &'a [Message], tz: &Tz) -> Vec<DayGroup<'a>> {
    let mut groups: Vec<DayGroup<'a>> = Vec::new();
    let mut index: HashMap<DayKey, usize> = HashMap::new();

    for message in messages {
        let day = DayKey::for_timestamp(message.timestamp.as_ref(), tz);
        let slot = *index.entry(day).or_insert_with(|| {
            groups.push(DayGroup {
                day,
                messages: Vec::new(),
            });
            groups.len() - 1
        });
        groups[slot].messages.push(message);
    }

    groups
}

/// Clock time for a message, e.g. `09:05`, in `tz`. `None` when undated.
pub fn format_time<Tz: TimeZone>(message: &Message, tz: &Tz) -> Option<String>
where
    Tz::Offset: fmt::Display,
{
    message
        .timestamp
        .as_ref()
        .map(|ts| ts.with_timezone(tz).format("%H:%M").to_string())
}

/// Plain-text rendering of the grouped log, one line per message under a
/// header per day. Used by the non-interactive CLI modes.
pub fn format_transcript<Tz: TimeZone>(messages: &[Message], tz: &Tz) -> String
where
    Tz::Offset: fmt::Display,
{
    let mut out = String::new();
    for group in group_by_day(messages, tz) {
        out.push_str(&format!("== {} ==\n", group.day.header()));
        for message in group.messages {
            let who = if message.is_user() { "you" } else { "finchat" };
            match format_time(message, tz) {
                Some(time) => out.push_str(&format!("[{time}] {who}: {}\n", message.content)),
                None => out.push_str(&format!("{who}: {}\n", message.content)),
            }
        }
    }
    out
}

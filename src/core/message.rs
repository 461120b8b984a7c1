//! # Messages
//!
//! The single entity of a conversation. A message is either from the user
//! or from the bot, carries its text, and optionally the instant it was
//! created.
//!
//! Timestamps arrive from the backend in whatever shape its database
//! stored them, so deserialization is lenient: RFC 3339 strings, naive
//! ISO-8601 datetimes (read as UTC) and `null` are all accepted. Anything
//! unparseable becomes `None` rather than failing the whole history.

use chrono::{DateTime, NaiveDateTime, Utc};
use log::debug;
use serde::{Deserialize, Deserializer, Serialize};

#[derive(Serialize, Deserialize, Debug, PartialEq, Eq, Clone, Copy)]
pub enum Sender {
    #[serde(rename = "user")]
    User,
    #[serde(rename = "bot", alias = "assistant")]
    Bot,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct Message {
    pub sender: Sender,
    pub content: String,
    #[serde(
        default,
        deserialize_with = "deserialize_timestamp",
        skip_serializing_if = "Option::is_none"
    )]
    pub timestamp: Option<DateTime<Utc>>,
}

impl Message {
    /// A user message stamped with the current time.
    pub fn user(content: impl Into<String>) -> Self {
        Self {
            sender: Sender::User,
            content: content.into(),
            timestamp: Some(Utc::now()),
        }
    }

    /// A bot message stamped with the current time.
    pub fn bot(content: impl Into<String>) -> Self {
        Self {
            sender: Sender::Bot,
            content: content.into(),
            timestamp: Some(Utc::now()),
        }
    }

    pub fn is_user(&self) -> bool {
        self.sender == Sender::User
    }
}

/// Parses a backend timestamp string. Returns `None` for anything that is
/// neither RFC 3339 nor a naive ISO-8601 datetime.
pub fn parse_timestamp(raw: &str) -> Option<DateTime<Utc>> {
    let raw = raw.trim();
    if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
        return Some(dt.with_timezone(&Utc));
    }
    // Python's datetime.isoformat() omits the offset for naive values
    for format in ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M:%S%.f"] {
        if let Ok(naive) = NaiveDateTime::parse_from_str(raw, format) {
            return Some(naive.and_utc());
        }
    }
    debug!("Unparseable timestamp {:?}, treating as undated", raw);
    None
}

fn deserialize_timestamp<'de, D>(deserializer: D) -> Result<Option<DateTime<Utc>>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw: Option<serde_json::Value> = Option::deserialize(deserializer)?;
    Ok(match raw {
        Some(serde_json::Value::String(s)) => parse_timestamp(&s),
        Some(other) => {
            debug!("Non-string timestamp {}, treating as undated", other);
            None
        }
        None => None,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Datelike, TimeZone, Timelike};

    #[test]
    fn test_user_constructor_stamps_now() {
        let before = Utc::now();
        let msg = Message::user("What is a TFSA?");
        assert_eq!(msg.sender, Sender::User);
        assert_eq!(msg.content, "What is a TFSA?");
        assert!(msg.timestamp.is_some_and(|t| t >= before));
        assert!(msg.is_user());
    }

    #[test]
    fn test_bot_constructor() {
        let msg = Message::bot("A TFSA is...");
        assert_eq!(msg.sender, Sender::Bot);
        assert!(!msg.is_user());
    }

    #[test]
    fn test_deserialize_history_entry_with_rfc3339() {
        let json = r#"{"_id":"65f0","sender":"user","content":"hi","timestamp":"2025-07-04T10:30:00Z"}"#;
        let msg: Message = serde_json::from_str(json).unwrap();
        assert_eq!(msg.sender, Sender::User);
        assert_eq!(
            msg.timestamp,
            Some(Utc.with_ymd_and_hms(2025, 7, 4, 10, 30, 0).unwrap())
        );
    }

    #[test]
    fn test_deserialize_naive_timestamp_as_utc() {
        let json = r#"{"sender":"bot","content":"hello","timestamp":"2025-07-04T23:59:01.123456"}"#;
        let msg: Message = serde_json::from_str(json).unwrap();
        let ts = msg.timestamp.unwrap();
        assert_eq!(ts.day(), 4);
        assert_eq!(ts.hour(), 23);
    }

    #[test]
    fn test_deserialize_missing_or_bad_timestamp() {
        let missing: Message = serde_json::from_str(r#"{"sender":"bot","content":"x"}"#).unwrap();
        assert_eq!(missing.timestamp, None);

        let null: Message =
            serde_json::from_str(r#"{"sender":"bot","content":"x","timestamp":null}"#).unwrap();
        assert_eq!(null.timestamp, None);

        let garbage: Message =
            serde_json::from_str(r#"{"sender":"bot","content":"x","timestamp":"yesterday"}"#)
                .unwrap();
        assert_eq!(garbage.timestamp, None);

        let numeric: Message =
            serde_json::from_str(r#"{"sender":"bot","content":"x","timestamp":1720000000}"#)
                .unwrap();
        assert_eq!(numeric.timestamp, None);
    }

    #[test]
    fn test_assistant_alias_is_bot() {
        let msg: Message =
            serde_json::from_str(r#"{"sender":"assistant","content":"x"}"#).unwrap();
        assert_eq!(msg.sender, Sender::Bot);
    }

    #[test]
    fn test_unknown_sender_is_rejected() {
        let result: Result<Message, _> =
            serde_json::from_str(r#"{"sender":"system","content":"x"}"#);
        assert!(result.is_err());
    }

    #[test]
    fn test_serialize_skips_absent_timestamp() {
        let msg = Message {
            sender: Sender::Bot,
            content: "x".to_string(),
            timestamp: None,
        };
        let json = serde_json::to_string(&msg).unwrap();
        assert_eq!(json, r#"{"sender":"bot","content":"x"}"#);
    }
}

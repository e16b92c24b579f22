use std::sync::OnceLock;

use chrono::NaiveDateTime;
use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::events::{FilterCriteria, parse_date};
use crate::types::UserId;

/// `<timestamp> - User <digits> Event: <rest of line>`
const LINE_PATTERN: &str =
    r"^(\d{4}-\d{2}-\d{2}T\d{2}:\d{2}:\d{2}) - User (\d+) Event: (.*?)$";

fn line_regex() -> &'static Regex {
    static LINE_RE: OnceLock<Regex> = OnceLock::new();
    LINE_RE.get_or_init(|| Regex::new(LINE_PATTERN).expect("line pattern is a valid regex"))
}

/// One event line from the log file, parsed into its fields.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LogEntry {
    /// Timestamp exactly as written in the file, without timezone.
    pub timestamp: String,
    pub user_id: UserId,
    pub event_type: String,
    /// The source line with surrounding whitespace removed.
    pub original_line: String,
}

impl LogEntry {
    /// Parse a raw log line. Lines that do not follow the event format
    /// (including user ids too large for a `u64`) yield `None`.
    pub fn parse(line: &str) -> Option<Self> {
        let caps = line_regex().captures(line)?;

        let timestamp = caps.get(1)?.as_str();
        let user_id = caps.get(2)?.as_str().parse::<UserId>().ok()?;
        let event_type = caps.get(3)?.as_str();

        Some(Self {
            timestamp: timestamp.to_string(),
            user_id,
            event_type: event_type.to_string(),
            original_line: line.trim().to_string(),
        })
    }

    /// The timestamp as a calendar date-time, if it names a real one.
    pub fn timestamp_value(&self) -> Option<NaiveDateTime> {
        parse_date(&self.timestamp)
    }

    /// Whether the entry passes every active criterion.
    ///
    /// Date bounds are inclusive. An entry whose timestamp is not a real
    /// calendar date is never excluded by a date bound.
    pub fn matches(&self, criteria: &FilterCriteria) -> bool {
        let timestamp = self.timestamp_value();

        if let Some(ref from) = criteria.from_date
            && let Some(ref ts) = timestamp
            && ts < from
        {
            return false;
        }

        if let Some(ref to) = criteria.to_date
            && let Some(ref ts) = timestamp
            && ts > to
        {
            return false;
        }

        if let Some(ref event_type) = criteria.event_type
            && self.event_type != *event_type
        {
            return false;
        }

        if let Some(user_id) = criteria.user_id
            && self.user_id.inner() as f64 != user_id
        {
            return false;
        }

        true
    }
}

use std::collections::HashSet;

use chrono::{DateTime, NaiveDate, NaiveDateTime};

/// Raw query parameters of `GET /events/log`, before validation.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EventQuery {
    pub from_date: Option<String>,
    pub to_date: Option<String>,
    pub event_type: Option<String>,
    pub user_id: Option<String>,
}

impl EventQuery {
    /// Collect the known parameters from decoded `key=value` pairs.
    ///
    /// Unknown keys are ignored. A key given more than once is treated as
    /// absent without affecting the other parameters.
    pub fn from_pairs<I>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (String, String)>,
    {
        let mut query = Self::default();
        let mut repeated = HashSet::new();

        for (key, value) in pairs {
            let Some(slot) = query.field_mut(&key) else {
                continue;
            };
            if slot.replace(value).is_some() {
                repeated.insert(key);
            }
        }

        for key in repeated {
            tracing::debug!("Ignoring repeated query parameter {key}");
            if let Some(slot) = query.field_mut(&key) {
                *slot = None;
            }
        }

        query
    }

    fn field_mut(&mut self, key: &str) -> Option<&mut Option<String>> {
        match key {
            "fromDate" => Some(&mut self.from_date),
            "toDate" => Some(&mut self.to_date),
            "eventType" => Some(&mut self.event_type),
            "userId" => Some(&mut self.user_id),
            _ => None,
        }
    }
}

/// The active filters of a request. A `None` field always passes.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FilterCriteria {
    pub from_date: Option<NaiveDateTime>,
    pub to_date: Option<NaiveDateTime>,
    pub event_type: Option<String>,
    /// Compared numerically, so `123.0` selects user 123 and `-3` selects
    /// nobody.
    pub user_id: Option<f64>,
}

impl FilterCriteria {
    /// Derive criteria from raw parameters. Empty or invalid values are
    /// dropped instead of rejected, so a bad filter widens the result.
    pub fn from_query(query: &EventQuery) -> Self {
        let from_date = non_empty(&query.from_date).and_then(parse_date);
        let to_date = non_empty(&query.to_date).and_then(parse_date);
        let event_type = non_empty(&query.event_type).map(str::to_string);
        let user_id = non_empty(&query.user_id).and_then(parse_number);

        if from_date.is_none() && query.from_date.as_deref().is_some_and(|s| !s.is_empty()) {
            tracing::debug!("Ignoring unparseable fromDate: {:?}", query.from_date);
        }
        if to_date.is_none() && query.to_date.as_deref().is_some_and(|s| !s.is_empty()) {
            tracing::debug!("Ignoring unparseable toDate: {:?}", query.to_date);
        }
        if user_id.is_none() && query.user_id.as_deref().is_some_and(|s| !s.is_empty()) {
            tracing::debug!("Ignoring non-numeric userId: {:?}", query.user_id);
        }

        Self {
            from_date,
            to_date,
            event_type,
            user_id,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.from_date.is_none()
            && self.to_date.is_none()
            && self.event_type.is_none()
            && self.user_id.is_none()
    }
}

fn non_empty(value: &Option<String>) -> Option<&str> {
    value.as_deref().filter(|s| !s.is_empty())
}

/// Read a number the way a browser's `Number()` would: surrounding
/// whitespace is ignored, a blank string is zero, and decimal, exponent,
/// `0x`/`0o`/`0b` and `Infinity` forms are accepted. `None` means NaN.
fn parse_number(input: &str) -> Option<f64> {
    let input = input.trim();
    if input.is_empty() {
        return Some(0.0);
    }

    let radix = match input.get(..2) {
        Some("0x" | "0X") => Some(16),
        Some("0o" | "0O") => Some(8),
        Some("0b" | "0B") => Some(2),
        _ => None,
    };
    if let Some(radix) = radix {
        return u128::from_str_radix(&input[2..], radix)
            .ok()
            .map(|n| n as f64);
    }

    match input {
        "Infinity" | "+Infinity" => return Some(f64::INFINITY),
        "-Infinity" => return Some(f64::NEG_INFINITY),
        _ => {}
    }

    // Rules out `inf`, `NaN` and other spellings only Rust accepts
    if !input
        .bytes()
        .all(|b| b.is_ascii_digit() || matches!(b, b'+' | b'-' | b'.' | b'e' | b'E'))
    {
        return None;
    }
    input.parse::<f64>().ok()
}

const NAIVE_FORMATS: &[&str] = &[
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%dT%H:%M",
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%d %H:%M",
];

/// Parse a date or date-time into timezone-less wall time.
///
/// Accepts ISO-8601 date-times with or without seconds, plain dates,
/// year-month and bare years (all at midnight), and RFC 3339 strings with an offset, which are converted
/// to UTC.
pub fn parse_date(input: &str) -> Option<NaiveDateTime> {
    let input = input.trim();
    if input.is_empty() {
        return None;
    }

    if let Ok(dt) = DateTime::parse_from_rfc3339(input) {
        return Some(dt.naive_utc());
    }

    for format in NAIVE_FORMATS {
        if let Ok(dt) = NaiveDateTime::parse_from_str(input, format) {
            return Some(dt);
        }
    }

    NaiveDate::parse_from_str(input, "%Y-%m-%d")
        .ok()
        .or_else(|| parse_year_month(input))
        .and_then(|date| date.and_hms_opt(0, 0, 0))
}

/// `YYYY-MM` or `YYYY`, both meaning the first day of the period.
fn parse_year_month(input: &str) -> Option<NaiveDate> {
    let (year, month) = match input.split_once('-') {
        Some((year, month)) if month.len() == 2 => (year, month),
        Some(_) => return None,
        None => (input, "01"),
    };
    if year.len() != 4 || !(year.bytes().chain(month.bytes())).all(|b| b.is_ascii_digit()) {
        return None;
    }
    NaiveDate::from_ymd_opt(year.parse().ok()?, month.parse().ok()?, 1)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn query(from: &str, to: &str, event_type: &str, user_id: &str) -> EventQuery {
        let opt = |s: &str| (!s.is_empty()).then(|| s.to_string());
        EventQuery {
            from_date: opt(from),
            to_date: opt(to),
            event_type: opt(event_type),
            user_id: opt(user_id),
        }
    }

    #[test]
    fn test_parse_date_formats() {
        let expected = NaiveDate::from_ymd_opt(2024, 1, 1)
            .unwrap()
            .and_hms_opt(10, 10, 0)
            .unwrap();

        assert_eq!(parse_date("2024-01-01T10:10:00"), Some(expected));
        assert_eq!(parse_date("2024-01-01T10:10"), Some(expected));
        assert_eq!(parse_date("2024-01-01 10:10:00"), Some(expected));
        assert_eq!(parse_date("2024-01-01T10:10:00.000"), Some(expected));
        assert_eq!(parse_date("2024-01-01T10:10:00Z"), Some(expected));
        assert_eq!(parse_date("2024-01-01T12:10:00+02:00"), Some(expected));
        assert_eq!(
            parse_date("2024-01-01"),
            NaiveDate::from_ymd_opt(2024, 1, 1).unwrap().and_hms_opt(0, 0, 0)
        );
    }

    #[test]
    fn test_parse_date_year_month_and_year() {
        let midnight = |y, m| NaiveDate::from_ymd_opt(y, m, 1).unwrap().and_hms_opt(0, 0, 0);

        assert_eq!(parse_date("2024-03"), midnight(2024, 3));
        assert_eq!(parse_date("2024"), midnight(2024, 1));
        assert_eq!(parse_date("2024-13"), None);
        assert_eq!(parse_date("2024-3"), None);
        assert_eq!(parse_date("24"), None);
    }

    #[test]
    fn test_parse_date_rejects_garbage() {
        assert_eq!(parse_date(""), None);
        assert_eq!(parse_date("   "), None);
        assert_eq!(parse_date("invalid-date"), None);
        assert_eq!(parse_date("2024-02-30"), None);
        assert_eq!(parse_date("yesterday"), None);
    }

    #[test]
    fn test_no_parameters_means_no_criteria() {
        let criteria = FilterCriteria::from_query(&EventQuery::default());
        assert!(criteria.is_empty());

        let criteria = FilterCriteria::from_query(&query("", "", "", ""));
        assert!(criteria.is_empty());
    }

    #[test]
    fn test_invalid_values_are_dropped() {
        let criteria = FilterCriteria::from_query(&query(
            "invalid-date",
            "2024-01-01T10:10:00",
            "",
            "abc",
        ));
        assert_eq!(criteria.from_date, None);
        assert!(criteria.to_date.is_some());
        assert_eq!(criteria.event_type, None);
        assert_eq!(criteria.user_id, None);
    }

    #[test]
    fn test_numeric_user_ids_stay_active() {
        let user_id = |raw: &str| FilterCriteria::from_query(&query("", "", "", raw)).user_id;

        assert_eq!(user_id("-3"), Some(-3.0));
        assert_eq!(user_id("123.0"), Some(123.0));
        assert_eq!(user_id("1e2"), Some(100.0));
        assert_eq!(user_id("0x10"), Some(16.0));
        assert_eq!(user_id("12abc"), None);
        assert_eq!(user_id("inf"), None);
        assert_eq!(user_id("NaN"), None);
    }

    #[test]
    fn test_parse_number_follows_browser_rules() {
        assert_eq!(parse_number("  42  "), Some(42.0));
        assert_eq!(parse_number("   "), Some(0.0));
        assert_eq!(parse_number(".5"), Some(0.5));
        assert_eq!(parse_number("-Infinity"), Some(f64::NEG_INFINITY));
        assert_eq!(parse_number("0b101"), Some(5.0));
        assert_eq!(parse_number("-0x10"), None);
        assert_eq!(parse_number("1_000"), None);
        assert_eq!(parse_number("."), None);
    }

    #[test]
    fn test_valid_values_are_kept() {
        let criteria = FilterCriteria::from_query(&query(
            "2024-01-01",
            "2024-01-02",
            "click_button",
            " 123 ",
        ));
        assert!(criteria.from_date.is_some());
        assert!(criteria.to_date.is_some());
        assert_eq!(criteria.event_type.as_deref(), Some("click_button"));
        assert_eq!(criteria.user_id, Some(123.0));
    }

    fn pairs(raw: &[(&str, &str)]) -> EventQuery {
        EventQuery::from_pairs(
            raw.iter()
                .map(|(k, v)| (k.to_string(), v.to_string())),
        )
    }

    #[test]
    fn test_query_from_camel_case_pairs() {
        let query = pairs(&[("fromDate", "2024-01-01"), ("userId", "5"), ("page", "2")]);
        assert_eq!(query.from_date.as_deref(), Some("2024-01-01"));
        assert_eq!(query.user_id.as_deref(), Some("5"));
        assert_eq!(query.to_date, None);
        assert_eq!(query.event_type, None);
    }

    #[test]
    fn test_repeated_key_drops_only_that_parameter() {
        let query = pairs(&[
            ("userId", "123"),
            ("fromDate", "a"),
            ("fromDate", "b"),
            ("fromDate", "c"),
        ]);
        assert_eq!(query.from_date, None);
        assert_eq!(query.user_id.as_deref(), Some("123"));
    }
}

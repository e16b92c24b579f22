use std::fmt;

use serde::{Deserialize, Serialize};

use crate::events::parse_date;

/// Form state for the filter inputs. Empty strings mean "not set".
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Filters {
    pub from_date: String,
    pub to_date: String,
    pub event_type: String,
    pub user_id: String,
}

/// Form field an error is attached to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum FormField {
    DateRange,
    EventType,
    UserId,
}

impl FormField {
    pub fn key(&self) -> &'static str {
        match self {
            FormField::DateRange => "dateRange",
            FormField::EventType => "eventType",
            FormField::UserId => "userId",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldError {
    pub field: FormField,
    pub message: &'static str,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationErrors(pub Vec<FieldError>);

impl ValidationErrors {
    pub fn get(&self, field: FormField) -> Option<&'static str> {
        self.0
            .iter()
            .find(|e| e.field == field)
            .map(|e| e.message)
    }
}

impl fmt::Display for ValidationErrors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let messages: Vec<&str> = self.0.iter().map(|e| e.message).collect();
        write!(f, "{}", messages.join("; "))
    }
}

impl std::error::Error for ValidationErrors {}

impl Filters {
    /// Check the inputs before submitting. Every failing field is reported.
    pub fn validate(&self) -> Result<(), ValidationErrors> {
        let mut errors = Vec::new();

        if let (Some(from), Some(to)) = (parse_date(&self.from_date), parse_date(&self.to_date))
            && from > to
        {
            errors.push(FieldError {
                field: FormField::DateRange,
                message: "From date cannot be after To date",
            });
        }

        if !self.event_type.is_empty()
            && !self
                .event_type
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || c == '_')
        {
            errors.push(FieldError {
                field: FormField::EventType,
                message: "Event type can only contain alphanumeric characters and underscores",
            });
        }

        if !self.user_id.is_empty() && !is_non_negative_number(&self.user_id) {
            errors.push(FieldError {
                field: FormField::UserId,
                message: "User ID must be a positive number",
            });
        }

        if errors.is_empty() {
            Ok(())
        } else {
            Err(ValidationErrors(errors))
        }
    }

    /// Query-string pairs for the non-empty fields.
    pub fn query_pairs(&self) -> Vec<(&'static str, &str)> {
        [
            ("fromDate", self.from_date.as_str()),
            ("toDate", self.to_date.as_str()),
            ("eventType", self.event_type.as_str()),
            ("userId", self.user_id.as_str()),
        ]
        .into_iter()
        .filter(|(_, value)| !value.is_empty())
        .collect()
    }
}

fn is_non_negative_number(value: &str) -> bool {
    value
        .trim()
        .parse::<f64>()
        .is_ok_and(|n| n.is_finite() && n >= 0.0)
}

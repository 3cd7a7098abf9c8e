//! Runtime values and comparison semantics
//!
//! Comparisons convert the right operand to the type of the left operand.
//! String comparisons ignore case. A conversion that fails makes the
//! comparison false.

use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};
use std::cmp::Ordering;

use crate::lexer::parse_int_literal;

#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    Null,
    Bool(bool),
    Int(i64),
    Str(String),
    Date(DateTime<Utc>),
    List(Vec<Value>),
}

impl Value {
    #[must_use]
    pub fn truthy(&self) -> bool {
        match self {
            Self::Null => false,
            Self::Bool(b) => *b,
            Self::Int(n) => *n != 0,
            Self::Str(s) => !s.is_empty(),
            Self::Date(_) => true,
            Self::List(items) => !items.is_empty(),
        }
    }

    /// Text form used when a value is compared against a string
    #[must_use]
    pub fn to_text(&self) -> String {
        match self {
            Self::Null => String::new(),
            Self::Bool(true) => "True".to_string(),
            Self::Bool(false) => "False".to_string(),
            Self::Int(n) => n.to_string(),
            Self::Str(s) => s.clone(),
            Self::Date(d) => d.format("%Y-%m-%d %H:%M:%S").to_string(),
            Self::List(items) => items
                .iter()
                .map(Value::to_text)
                .collect::<Vec<_>>()
                .join(" "),
        }
    }

    /// Convert `self` so it can be compared with a scalar of `target`'s type
    #[must_use]
    pub fn coerce_like(&self, target: &Value) -> Option<Value> {
        match (target, self) {
            (_, Self::List(_)) | (Self::List(_), _) => None,
            (Self::Null, _) => Some(self.clone()),
            (Self::Str(_), Self::Null) => Some(Self::Str(String::new())),
            (Self::Str(_), v) => Some(Self::Str(v.to_text())),
            (Self::Bool(_), v) => Some(Self::Bool(v.truthy())),
            (Self::Int(_), Self::Int(n)) => Some(Self::Int(*n)),
            (Self::Int(_), Self::Bool(b)) => Some(Self::Int(i64::from(*b))),
            (Self::Int(_), Self::Str(s)) => parse_int_literal(s).map(Self::Int),
            (Self::Int(_), Self::Null) => Some(Self::Int(0)),
            (Self::Date(_), Self::Date(d)) => Some(Self::Date(*d)),
            (Self::Date(_), Self::Str(s)) => parse_date(s).map(Self::Date),
            (Self::Int(_) | Self::Date(_), _) => None,
        }
    }

    /// Ordering between two scalars after conversion of `other`
    #[must_use]
    pub fn compare(&self, other: &Value) -> Option<Ordering> {
        let other = other.coerce_like(self)?;
        match (self, &other) {
            (Self::Null, Self::Null) => Some(Ordering::Equal),
            (Self::Null, _) => None,
            (Self::Bool(a), Self::Bool(b)) => Some(a.cmp(b)),
            (Self::Int(a), Self::Int(b)) => Some(a.cmp(b)),
            (Self::Str(a), Self::Str(b)) => Some(a.to_lowercase().cmp(&b.to_lowercase())),
            (Self::Date(a), Self::Date(b)) => Some(a.cmp(b)),
            _ => None,
        }
    }

    #[must_use]
    pub fn equals(&self, other: &Value) -> bool {
        self.compare(other) == Some(Ordering::Equal)
    }

    /// Scalars as a one-element slice, lists as their elements
    #[must_use]
    pub fn elements(&self) -> &[Value] {
        match self {
            Self::List(items) => items,
            scalar => std::slice::from_ref(scalar),
        }
    }
}

/// Parse the date formats an operator is likely to type into a rule
#[must_use]
pub fn parse_date(text: &str) -> Option<DateTime<Utc>> {
    let text = text.trim();
    if let Ok(dt) = DateTime::parse_from_rfc3339(text) {
        return Some(dt.with_timezone(&Utc));
    }
    for format in ["%Y-%m-%d %H:%M:%S", "%Y-%m-%dT%H:%M:%S", "%m/%d/%Y %H:%M:%S"] {
        if let Ok(naive) = NaiveDateTime::parse_from_str(text, format) {
            return Some(naive.and_utc());
        }
    }
    for format in ["%Y-%m-%d", "%m/%d/%Y"] {
        if let Ok(date) = NaiveDate::parse_from_str(text, format) {
            return date.and_hms_opt(0, 0, 0).map(|naive| naive.and_utc());
        }
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn right_operand_takes_left_type() {
        assert!(Value::Int(1_048_576).equals(&Value::Str("1MB".into())));
        assert!(Value::Str("42".into()).equals(&Value::Int(42)));
        assert!(Value::Bool(true).equals(&Value::Str("yes".into())));
        assert!(!Value::Int(3).equals(&Value::Str("three".into())));
    }

    #[test]
    fn strings_compare_case_insensitively() {
        let upper = Value::Str("Security Updates".into());
        assert!(upper.equals(&Value::Str("security updates".into())));
        assert_eq!(
            Value::Str("b".into()).compare(&Value::Str("A".into())),
            Some(Ordering::Greater)
        );
    }

    #[test]
    fn dates_parse_from_common_formats() {
        let expected = Utc.with_ymd_and_hms(2024, 5, 14, 0, 0, 0).unwrap();
        assert_eq!(parse_date("2024-05-14"), Some(expected));
        assert_eq!(parse_date("05/14/2024"), Some(expected));
        assert_eq!(parse_date("2024-05-14T00:00:00Z"), Some(expected));
        assert_eq!(parse_date("yesterday"), None);

        let left = Value::Date(expected);
        assert_eq!(
            left.compare(&Value::Str("2024-01-01".into())),
            Some(Ordering::Greater)
        );
    }

    #[test]
    fn null_only_equals_null() {
        assert!(Value::Null.equals(&Value::Null));
        assert!(!Value::Null.equals(&Value::Str(String::new())));
        assert!(!Value::Null.truthy());
    }
}

//! FILENAME: model/src/value.rs
//! PURPOSE: The immutable per-cell value and the computation-error value.
//! CONTEXT: A `Value` is what a cell stores and what expressions ultimately
//! produce. Errors raised while computing a value are carried as data
//! (`Value::Error`) so they can travel through any number of expression
//! nodes without unwinding.

use chrono::{DateTime, FixedOffset, SecondsFormat, Utc};
use std::fmt;
use std::hash::{Hash, Hasher};

/// A computation error. Never to be treated as ordinary data downstream.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct EvalError {
    pub message: String,
}

impl EvalError {
    pub fn new(message: impl Into<String>) -> Self {
        EvalError {
            message: message.into(),
        }
    }
}

impl fmt::Display for EvalError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.message)
    }
}

/// Represents the data held by a cell.
#[derive(Debug, Clone)]
pub enum Value {
    Null,
    Text(String),
    Integer(i64),
    /// NaN and the infinities are legal here and keep their identity.
    Float(f64),
    Boolean(bool),
    Timestamp(DateTime<FixedOffset>),
    Error(EvalError),
}

impl Value {
    pub fn error(message: impl Into<String>) -> Self {
        Value::Error(EvalError::new(message))
    }

    pub fn is_null(&self) -> bool {
        matches!(self, Value::Null)
    }

    pub fn is_error(&self) -> bool {
        matches!(self, Value::Error(_))
    }

    /// Non-null, non-error, and not the empty string.
    pub fn is_non_blank(&self) -> bool {
        match self {
            Value::Null | Value::Error(_) => false,
            Value::Text(s) => !s.is_empty(),
            _ => true,
        }
    }

    pub fn is_blank(&self) -> bool {
        match self {
            Value::Null => true,
            Value::Text(s) => s.is_empty(),
            _ => false,
        }
    }

    pub fn error_message(&self) -> Option<&str> {
        match self {
            Value::Error(e) => Some(e.message.as_str()),
            _ => None,
        }
    }

    /// Numeric view of the value, if it has one.
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Value::Integer(n) => Some(*n as f64),
            Value::Float(n) => Some(*n),
            _ => None,
        }
    }

    pub fn as_text(&self) -> Option<&str> {
        match self {
            Value::Text(s) => Some(s.as_str()),
            _ => None,
        }
    }

    /// UTC instant formatted as ISO-8601 (`2024-03-01T10:00:00Z`).
    pub fn format_timestamp(ts: &DateTime<FixedOffset>) -> String {
        ts.with_timezone(&Utc)
            .to_rfc3339_opts(SecondsFormat::AutoSi, true)
    }

    /// Textual form of a float, spelling out the non-finite states.
    pub fn format_float(n: f64) -> String {
        if n.is_nan() {
            "NaN".to_string()
        } else if n == f64::INFINITY {
            "Infinity".to_string()
        } else if n == f64::NEG_INFINITY {
            "-Infinity".to_string()
        } else {
            format!("{}", n)
        }
    }
}

impl Default for Value {
    fn default() -> Self {
        Value::Null
    }
}

impl PartialEq for Value {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Value::Null, Value::Null) => true,
            (Value::Text(a), Value::Text(b)) => a == b,
            (Value::Integer(a), Value::Integer(b)) => a == b,
            // Bitwise, so NaN equals itself
            (Value::Float(a), Value::Float(b)) => a.to_bits() == b.to_bits(),
            (Value::Boolean(a), Value::Boolean(b)) => a == b,
            (Value::Timestamp(a), Value::Timestamp(b)) => a == b,
            (Value::Error(a), Value::Error(b)) => a == b,
            _ => false,
        }
    }
}

impl Eq for Value {}

impl Hash for Value {
    fn hash<H: Hasher>(&self, state: &mut H) {
        std::mem::discriminant(self).hash(state);
        match self {
            Value::Null => {}
            Value::Text(s) => s.hash(state),
            Value::Integer(n) => n.hash(state),
            Value::Float(n) => n.to_bits().hash(state),
            Value::Boolean(b) => b.hash(state),
            Value::Timestamp(ts) => ts.hash(state),
            Value::Error(e) => e.hash(state),
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Null => Ok(()),
            Value::Text(s) => f.write_str(s),
            Value::Integer(n) => write!(f, "{}", n),
            Value::Float(n) => f.write_str(&Value::format_float(*n)),
            Value::Boolean(b) => write!(f, "{}", b),
            Value::Timestamp(ts) => f.write_str(&Value::format_timestamp(ts)),
            Value::Error(e) => f.write_str(&e.message),
        }
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Value::Text(s.to_string())
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Value::Text(s)
    }
}

impl From<i64> for Value {
    fn from(n: i64) -> Self {
        Value::Integer(n)
    }
}

impl From<f64> for Value {
    fn from(n: f64) -> Self {
        Value::Float(n)
    }
}

impl From<bool> for Value {
    fn from(b: bool) -> Self {
        Value::Boolean(b)
    }
}

impl From<DateTime<FixedOffset>> for Value {
    fn from(ts: DateTime<FixedOffset>) -> Self {
        Value::Timestamp(ts)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn nan_equals_itself() {
        assert_eq!(Value::Float(f64::NAN), Value::Float(f64::NAN));
        assert_ne!(Value::Float(1.0), Value::Integer(1));
    }

    #[test]
    fn non_finite_floats_have_textual_form() {
        assert_eq!(Value::Float(f64::NAN).to_string(), "NaN");
        assert_eq!(Value::Float(f64::INFINITY).to_string(), "Infinity");
        assert_eq!(Value::Float(f64::NEG_INFINITY).to_string(), "-Infinity");
        assert_eq!(Value::Float(2.5).to_string(), "2.5");
    }

    #[test]
    fn timestamps_render_in_utc() {
        let ts = DateTime::parse_from_rfc3339("2024-03-01T12:00:00+02:00").unwrap();
        assert_eq!(Value::Timestamp(ts).to_string(), "2024-03-01T10:00:00Z");
    }

    #[test]
    fn blankness() {
        assert!(Value::Null.is_blank());
        assert!(Value::from("").is_blank());
        assert!(!Value::from("").is_non_blank());
        assert!(!Value::error("boom").is_non_blank());
        assert!(!Value::error("boom").is_blank());
        assert!(Value::Integer(0).is_non_blank());
    }
}

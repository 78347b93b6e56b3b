//! Value enum for munged field values

use std::fmt;

use chrono::NaiveDate;
use chrono::NaiveDateTime;
use chrono::NaiveTime;
use rust_decimal::Decimal;
use serde::Serialize;

use crate::api::query::Argument;

/// Wire format of dates, as the server expects them in queries.
pub const DATE_FORMAT: &str = "%m/%d/%Y";
/// Wire format of times.
pub const TIME_FORMAT: &str = "%H:%M:%S";
/// Wire format of timestamps.
pub const TIMESTAMP_FORMAT: &str = "%m/%d/%Y %H:%M:%S";

/// A field value after munging.
///
/// Values start out as text from the XML response and are coerced according
/// to the field's result type. When coercion fails the text is kept.
///
/// # Type Mapping
///
/// | Result type | Rust Variant |
/// |-------------|--------------|
/// | empty | `Null` |
/// | text, container | `Text` |
/// | number | `Int` or `Decimal` |
/// | date | `Date` |
/// | time | `Time` |
/// | timestamp | `Timestamp` |
///
/// # Example
///
/// ```
/// use fmxml_lib::model::Value;
///
/// let name = Value::from("Ann");
/// let age = Value::from(7i64);
/// assert_eq!(name.as_str(), Some("Ann"));
/// assert!(age.as_str().is_none());
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
#[serde(untagged)]
pub enum Value {
    /// Empty `<data/>`.
    Null,
    /// Text, or a value that could not be coerced.
    Text(String),
    /// Whole number.
    Int(i64),
    /// Fractional number, or an integer literal with a leading zero.
    Decimal(Decimal),
    /// Calendar date.
    Date(NaiveDate),
    /// Time of day.
    Time(NaiveTime),
    /// Date and time without timezone.
    Timestamp(NaiveDateTime),
}

impl Value {
    /// Returns `true` if this is a null value.
    pub fn is_null(&self) -> bool {
        matches!(self, Value::Null)
    }

    /// Returns `true` for null and empty text.
    pub fn is_empty(&self) -> bool {
        match self {
            Value::Null => true,
            Value::Text(s) => s.is_empty(),
            _ => false,
        }
    }

    /// Returns the text if this is a text value.
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::Text(s) => Some(s),
            _ => None,
        }
    }

    /// Returns the type name of this value.
    pub fn type_name(&self) -> &'static str {
        match self {
            Value::Null => "null",
            Value::Text(_) => "text",
            Value::Int(_) => "int",
            Value::Decimal(_) => "decimal",
            Value::Date(_) => "date",
            Value::Time(_) => "time",
            Value::Timestamp(_) => "timestamp",
        }
    }
}

/// Renders the value the way the server writes it.
impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Null => Ok(()),
            Value::Text(s) => f.write_str(s),
            Value::Int(n) => write!(f, "{}", n),
            Value::Decimal(d) => write!(f, "{}", d),
            Value::Date(d) => write!(f, "{}", d.format(DATE_FORMAT)),
            Value::Time(t) => write!(f, "{}", t.format(TIME_FORMAT)),
            Value::Timestamp(ts) => write!(f, "{}", ts.format(TIMESTAMP_FORMAT)),
        }
    }
}

impl From<Value> for Argument {
    fn from(v: Value) -> Self {
        match v {
            Value::Int(n) => Argument::Int(n),
            Value::Decimal(d) => Argument::Decimal(d),
            Value::Text(s) => Argument::Text(s),
            other => Argument::Text(other.to_string()),
        }
    }
}

// =============================================================================
// From implementations
// =============================================================================

impl From<i32> for Value {
    fn from(v: i32) -> Self {
        Value::Int(v.into())
    }
}

impl From<i64> for Value {
    fn from(v: i64) -> Self {
        Value::Int(v)
    }
}

impl From<Decimal> for Value {
    fn from(v: Decimal) -> Self {
        Value::Decimal(v)
    }
}

impl From<String> for Value {
    fn from(v: String) -> Self {
        Value::Text(v)
    }
}

impl From<&str> for Value {
    fn from(v: &str) -> Self {
        Value::Text(v.to_string())
    }
}

impl From<NaiveDate> for Value {
    fn from(v: NaiveDate) -> Self {
        Value::Date(v)
    }
}

impl From<NaiveTime> for Value {
    fn from(v: NaiveTime) -> Self {
        Value::Time(v)
    }
}

impl From<NaiveDateTime> for Value {
    fn from(v: NaiveDateTime) -> Self {
        Value::Timestamp(v)
    }
}

/// `None` is an empty `<data/>` element.
impl<T: Into<Value>> From<Option<T>> for Value {
    fn from(v: Option<T>) -> Self {
        match v {
            Some(inner) => inner.into(),
            None => Value::Null,
        }
    }
}

impl Default for Value {
    fn default() -> Self {
        Value::Null
    }
}

//! Field metadata and value munging

use std::str::FromStr;

use chrono::NaiveDate;
use chrono::NaiveDateTime;
use chrono::NaiveTime;
use log::warn;
use rust_decimal::Decimal;
use serde::Serialize;

use super::Value;
use super::value::DATE_FORMAT;
use super::value::TIME_FORMAT;
use super::value::TIMESTAMP_FORMAT;
use crate::error::DataError;
use crate::parse::FieldDefinitionElement;

/// How a field gets its value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum FieldType {
    Normal,
    Calculation,
    Summary,
    Unknown,
}

impl FromStr for FieldType {
    type Err = DataError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "normal" => Ok(Self::Normal),
            "calculation" => Ok(Self::Calculation),
            "summary" => Ok(Self::Summary),
            "unknown" => Ok(Self::Unknown),
            other => Err(DataError::UnknownFieldType(other.to_string())),
        }
    }
}

/// The data type a field holds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ResultType {
    Text,
    Number,
    Date,
    Time,
    Timestamp,
    Container,
    Unknown,
}

impl FromStr for ResultType {
    type Err = DataError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "text" => Ok(Self::Text),
            "number" => Ok(Self::Number),
            "date" => Ok(Self::Date),
            "time" => Ok(Self::Time),
            "timestamp" => Ok(Self::Timestamp),
            "container" => Ok(Self::Container),
            "unknown" => Ok(Self::Unknown),
            other => Err(DataError::UnknownFieldResult(other.to_string())),
        }
    }
}

/// The date, time and timestamp patterns a layout reports in its
/// `<datasource>`.
///
/// Only the US patterns below are understood when munging.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DateFormats {
    pub date: String,
    pub time: String,
    pub timestamp: String,
}

impl DateFormats {
    pub const DATE: &'static str = "MM/dd/yyyy";
    pub const TIME: &'static str = "HH:mm:ss";
    pub const TIMESTAMP: &'static str = "MM/dd/yyyy HH:mm:ss";
}

impl Default for DateFormats {
    fn default() -> Self {
        Self {
            date: Self::DATE.to_string(),
            time: Self::TIME.to_string(),
            timestamp: Self::TIMESTAMP.to_string(),
        }
    }
}

/// Metadata of one field on a layout or portal.
///
/// Built from a `<field-definition>` element and immutable afterwards.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FieldDefinition {
    name: String,
    field_type: FieldType,
    result: ResultType,
    auto_enter: bool,
    global: bool,
    not_empty: bool,
    numeric_only: bool,
    four_digit_year: bool,
    time_of_day: bool,
    max_repeat: u32,
    max_characters: Option<u32>,
    portal: Option<String>,
    valuelist_name: Option<String>,
}

impl FieldDefinition {
    /// Creates a normal, optional, non-repeating field definition.
    pub fn new(name: impl Into<String>, result: ResultType) -> Self {
        Self {
            name: name.into(),
            field_type: FieldType::Normal,
            result,
            auto_enter: false,
            global: false,
            not_empty: false,
            numeric_only: false,
            four_digit_year: false,
            time_of_day: false,
            max_repeat: 1,
            max_characters: None,
            portal: None,
            valuelist_name: None,
        }
    }

    /// Builds a definition from its parsed element.
    ///
    /// # Errors
    ///
    /// Returns [`DataError::UnknownFieldType`] or
    /// [`DataError::UnknownFieldResult`] if the server reports a type this
    /// crate does not know.
    pub fn from_element(
        element: &FieldDefinitionElement,
        portal: Option<&str>,
        valuelist_name: Option<&str>,
    ) -> Result<Self, DataError> {
        Ok(Self {
            name: element.name.clone(),
            field_type: element.field_type.parse()?,
            result: element.result.parse()?,
            auto_enter: element.auto_enter,
            global: element.global,
            not_empty: element.not_empty,
            numeric_only: element.numeric_only,
            four_digit_year: element.four_digit_year,
            time_of_day: element.time_of_day,
            max_repeat: element.max_repeat,
            max_characters: element.max_characters,
            portal: portal.map(str::to_string),
            valuelist_name: valuelist_name.map(str::to_string),
        })
    }

    /// Sets the field type (builder pattern).
    pub fn with_type(mut self, field_type: FieldType) -> Self {
        self.field_type = field_type;
        self
    }

    /// Marks the field as required (builder pattern).
    pub fn required(mut self) -> Self {
        self.not_empty = true;
        self
    }

    // =========================================================================
    // Accessors
    // =========================================================================

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn field_type(&self) -> FieldType {
        self.field_type
    }

    pub fn result(&self) -> ResultType {
        self.result
    }

    pub fn is_auto_enter(&self) -> bool {
        self.auto_enter
    }

    pub fn is_global(&self) -> bool {
        self.global
    }

    /// Returns `true` if the field must not be empty.
    pub fn is_required(&self) -> bool {
        self.not_empty
    }

    pub fn is_numeric_only(&self) -> bool {
        self.numeric_only
    }

    pub fn is_four_digit_year(&self) -> bool {
        self.four_digit_year
    }

    pub fn is_time_of_day(&self) -> bool {
        self.time_of_day
    }

    /// Number of repetitions; 1 for a non-repeating field.
    pub fn max_repeat(&self) -> u32 {
        self.max_repeat
    }

    pub fn max_characters(&self) -> Option<u32> {
        self.max_characters
    }

    /// Returns the portal table this field belongs to, if any.
    pub fn portal(&self) -> Option<&str> {
        self.portal.as_deref()
    }

    /// Returns the name of the value list bound to this field on the layout.
    pub fn valuelist_name(&self) -> Option<&str> {
        self.valuelist_name.as_deref()
    }

    // =========================================================================
    // Munging
    // =========================================================================

    /// Coerces a value to this field's result type.
    ///
    /// Only normal fields are coerced; calculations and summaries keep the
    /// server's formatting. Empty values pass through unless the field is
    /// required. A value that does not parse, or a layout date pattern other
    /// than the US ones in [`DateFormats`], is logged and returned unchanged.
    /// Already-typed values pass through, so munging is idempotent.
    pub fn munge(&self, value: impl Into<Value>, formats: &DateFormats) -> Value {
        let value = value.into();

        if self.field_type != FieldType::Normal {
            return value;
        }

        if value.is_empty() {
            if !self.not_empty {
                return value;
            }
            warn!("Empty value in required field '{}'", self.name);
        }

        match self.result {
            ResultType::Text | ResultType::Container | ResultType::Unknown => value,
            ResultType::Number => self.munge_number(value),
            ResultType::Date => self.munge_temporal(value, &formats.date, DateFormats::DATE, |s| {
                NaiveDate::parse_from_str(s, DATE_FORMAT).ok().map(Value::Date)
            }),
            ResultType::Time => self.munge_temporal(value, &formats.time, DateFormats::TIME, |s| {
                NaiveTime::parse_from_str(s, TIME_FORMAT).ok().map(Value::Time)
            }),
            ResultType::Timestamp => {
                self.munge_temporal(value, &formats.timestamp, DateFormats::TIMESTAMP, |s| {
                    NaiveDateTime::parse_from_str(s, TIMESTAMP_FORMAT)
                        .ok()
                        .map(Value::Timestamp)
                })
            }
        }
    }

    fn munge_number(&self, value: Value) -> Value {
        match value {
            Value::Int(_) | Value::Decimal(_) => value,
            Value::Text(s) => match parse_number(&s) {
                Some(number) => number,
                None => {
                    warn!("Unexpected number value for field '{}': {:?}", self.name, s);
                    Value::Text(s)
                }
            },
            other => {
                warn!("Unexpected number value for field '{}': {:?}", self.name, other);
                other
            }
        }
    }

    fn munge_temporal(
        &self,
        value: Value,
        layout_format: &str,
        supported_format: &str,
        parse: impl Fn(&str) -> Option<Value>,
    ) -> Value {
        let expected = match self.result {
            ResultType::Date => matches!(value, Value::Date(_) | Value::Timestamp(_)),
            ResultType::Time => matches!(value, Value::Time(_) | Value::Timestamp(_)),
            _ => matches!(value, Value::Timestamp(_)),
        };
        if expected {
            return value;
        }

        if layout_format != supported_format {
            warn!(
                "Unsupported {:?} format '{}' for field '{}'",
                self.result, layout_format, self.name
            );
            return value;
        }

        if let Value::Text(s) = &value {
            if let Some(parsed) = parse(s) {
                return parsed;
            }
        }
        warn!(
            "Unexpected {:?} value for field '{}': {:?}",
            self.result, self.name, value
        );
        value
    }
}

/// Integer literals without a leading zero become `Int`, anything else that
/// reads as a decimal becomes `Decimal`.
fn parse_number(s: &str) -> Option<Value> {
    if is_integer_literal(s) {
        if let Ok(n) = s.parse::<i64>() {
            return Some(Value::Int(n));
        }
    }
    Decimal::from_str(s).ok().map(Value::Decimal)
}

fn is_integer_literal(s: &str) -> bool {
    let digits = s.strip_prefix(['+', '-']).unwrap_or(s);
    let mut chars = digits.chars();
    matches!(chars.next(), Some('1'..='9')) && chars.all(|c| c.is_ascii_digit())
}

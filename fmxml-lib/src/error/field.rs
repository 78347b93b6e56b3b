//! Typed record accessor errors

/// Raised by [`Record`](crate::model::Record) and
/// [`FieldContainer`](crate::model::FieldContainer) lookups.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum FieldError {
    /// No field with this name was returned for the record.
    #[error("Field '{field}' is not on this record")]
    Missing { field: String },

    /// The field exists but the repetition slot does not.
    #[error("Field '{field}' has no repetition {repetition}")]
    MissingRepetition { field: String, repetition: u32 },

    /// The munged value is not of the requested type.
    #[error("Field '{field}' holds a {actual} value, not {expected}")]
    TypeMismatch {
        field: String,
        expected: &'static str,
        actual: &'static str,
    },
}

impl FieldError {
    pub fn missing(field: impl Into<String>) -> Self {
        Self::Missing {
            field: field.into(),
        }
    }

    pub fn missing_repetition(field: impl Into<String>, repetition: u32) -> Self {
        Self::MissingRepetition {
            field: field.into(),
            repetition,
        }
    }

    pub fn type_mismatch(field: impl Into<String>, expected: &'static str, actual: &'static str) -> Self {
        Self::TypeMismatch {
            field: field.into(),
            expected,
            actual,
        }
    }
}

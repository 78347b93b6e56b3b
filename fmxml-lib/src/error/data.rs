//! Response content errors

/// Errors found in a parsed response.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum DataError {
    /// The server reported an error code other than 0 or 401.
    #[error("Server error code {code}")]
    Server {
        /// The server's error code.
        code: u32,
    },

    /// The transport returned no bytes.
    #[error("Empty response")]
    EmptyResponse,

    /// A field definition declared a result type this crate does not know.
    #[error("Unknown result type '{0}'")]
    UnknownFieldResult(String),

    /// A field definition declared a field type this crate does not know.
    #[error("Unknown field type '{0}'")]
    UnknownFieldType(String),

    /// The same field appeared twice in one record with different data.
    #[error("Field '{field}' appears more than once with different values")]
    DuplicateField {
        /// Name of the offending field.
        field: String,
    },

    /// A portal record outlived the record it was read with.
    #[error("Parent of portal record in '{table}' is no longer available")]
    DetachedPortalRecord {
        /// Portal table the record belongs to.
        table: String,
    },
}

impl DataError {
    /// Creates a server error.
    pub fn server(code: u32) -> Self {
        Self::Server { code }
    }

    /// Creates a duplicate field error.
    pub fn duplicate_field(field: impl Into<String>) -> Self {
        Self::DuplicateField {
            field: field.into(),
        }
    }
}

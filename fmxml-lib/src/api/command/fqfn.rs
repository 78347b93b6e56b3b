//! Fully qualified field names

use std::fmt;

/// A field reference for writes: `table::field(repetition).record-id`.
///
/// The table is only needed for fields outside the layout's own table, the
/// repetition for repeating fields and the record id for portal rows. A bare
/// field name is enough for a plain field on the layout.
///
/// # Example
///
/// ```
/// use fmxml_lib::api::command::FullyQualifiedFieldName;
///
/// let name = FullyQualifiedFieldName::new("Name")
///     .table("Dependents")
///     .repetition(1)
///     .record_id(20);
/// assert_eq!(name.to_string(), "Dependents::Name(1).20");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct FullyQualifiedFieldName {
    table: Option<String>,
    field: String,
    repetition: Option<u32>,
    record_id: Option<u64>,
}

impl FullyQualifiedFieldName {
    pub fn new(field: impl Into<String>) -> Self {
        Self {
            table: None,
            field: field.into(),
            repetition: None,
            record_id: None,
        }
    }

    /// Sets the table occurrence the field belongs to.
    pub fn table(mut self, table: impl Into<String>) -> Self {
        self.table = Some(table.into());
        self
    }

    pub fn repetition(mut self, repetition: u32) -> Self {
        self.repetition = Some(repetition);
        self
    }

    /// Sets the portal row the field belongs to.
    pub fn record_id(mut self, record_id: u64) -> Self {
        self.record_id = Some(record_id);
        self
    }
}

impl fmt::Display for FullyQualifiedFieldName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if let Some(table) = &self.table {
            write!(f, "{}::", table)?;
        }
        f.write_str(&self.field)?;
        if let Some(repetition) = self.repetition {
            write!(f, "({})", repetition)?;
        }
        if let Some(record_id) = self.record_id {
            write!(f, ".{}", record_id)?;
        }
        Ok(())
    }
}

impl From<&str> for FullyQualifiedFieldName {
    fn from(field: &str) -> Self {
        Self::new(field)
    }
}

impl From<String> for FullyQualifiedFieldName {
    fn from(field: String) -> Self {
        Self::new(field)
    }
}

//! Related-table schema surfaced through a layout

use std::collections::BTreeMap;
use std::sync::Arc;

use super::FieldDefinition;

/// A related table shown in a portal on a layout.
///
/// Field names are fully qualified (`Table::Field`), so the same definitions
/// are also reachable through the owning [`Layout`](super::Layout).
#[derive(Debug, Clone, PartialEq)]
pub struct Portal {
    table_name: String,
    field_definitions: BTreeMap<String, Arc<FieldDefinition>>,
}

impl Portal {
    pub(crate) fn new(table_name: impl Into<String>) -> Self {
        Self {
            table_name: table_name.into(),
            field_definitions: BTreeMap::new(),
        }
    }

    pub(crate) fn add_field_definition(&mut self, definition: Arc<FieldDefinition>) {
        self.field_definitions
            .insert(definition.name().to_string(), definition);
    }

    pub fn table_name(&self) -> &str {
        &self.table_name
    }

    /// Returns the portal's field names, sorted.
    pub fn field_names(&self) -> Vec<&str> {
        self.field_definitions.keys().map(String::as_str).collect()
    }

    pub fn field_definition(&self, name: &str) -> Option<&FieldDefinition> {
        self.field_definitions.get(name).map(Arc::as_ref)
    }
}

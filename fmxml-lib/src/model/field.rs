//! A single field slot

use std::sync::Arc;

use super::FieldDefinition;
use super::Value;

/// One repetition of one field: the munged value and the definition used to
/// munge it.
#[derive(Debug, Clone, PartialEq)]
pub struct Field {
    value: Value,
    definition: Option<Arc<FieldDefinition>>,
}

impl Field {
    pub(crate) fn new(value: Value, definition: Option<Arc<FieldDefinition>>) -> Self {
        Self { value, definition }
    }

    pub fn value(&self) -> &Value {
        &self.value
    }

    pub fn into_value(self) -> Value {
        self.value
    }

    /// Returns the definition, or `None` if the layout did not describe this
    /// field.
    pub fn definition(&self) -> Option<&FieldDefinition> {
        self.definition.as_deref()
    }
}

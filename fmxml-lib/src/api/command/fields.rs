//! Field values sent by `-new` and `-edit`

use super::FullyQualifiedFieldName;
use super::capability::Capability;
use crate::api::query::Argument;
use crate::api::query::CommandParameters;
use crate::error::CommandError;
use crate::model::Value;

/// Field assignments in the order they were added.
#[derive(Debug, Clone, Default)]
pub(crate) struct FieldUpdates {
    updates: Vec<(String, Argument)>,
}

impl FieldUpdates {
    pub(crate) fn add(&mut self, field: impl Into<FullyQualifiedFieldName>, value: impl Into<Argument>) {
        self.updates.push((field.into().to_string(), value.into()));
    }

    /// Adds `name(repetition)=value`. Dates and times use the wire formats.
    pub(crate) fn set(&mut self, name: &str, value: impl Into<Value>, repetition: u32) {
        let field = FullyQualifiedFieldName::new(name).repetition(repetition);
        self.add(field, Argument::from(value.into()));
    }

    pub(crate) fn len(&self) -> usize {
        self.updates.len()
    }
}

impl Capability for FieldUpdates {
    fn contribute(&self, params: &mut CommandParameters) -> Result<(), CommandError> {
        for (field, value) in &self.updates {
            params.push(field.as_str(), value.clone());
        }
        Ok(())
    }
}

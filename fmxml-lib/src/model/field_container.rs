//! Fields of one record, keyed by name and repetition

use std::collections::BTreeMap;
use std::collections::btree_map::Entry;

use log::warn;

use super::Field;
use super::Layout;
use super::Value;
use crate::error::DataError;
use crate::error::FieldError;
use crate::parse::FieldElement;

/// Field values of one record.
///
/// Maps field name to repetition number (zero-based) to [`Field`]. Names are
/// kept sorted.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FieldContainer {
    fields: BTreeMap<String, BTreeMap<u32, Field>>,
}

impl FieldContainer {
    /// Creates an empty container.
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds a container from the field occurrences of one record.
    ///
    /// A field that occurs more than once with the same data is kept once.
    /// Repetitions are numbered in document order and munged with the
    /// layout's definitions.
    ///
    /// # Errors
    ///
    /// Returns [`DataError::DuplicateField`] if one name occurs with
    /// different data.
    pub fn from_elements(layout: &Layout, elements: &[FieldElement]) -> Result<Self, DataError> {
        let mut unique: BTreeMap<&str, &[Option<String>]> = BTreeMap::new();
        for element in elements {
            match unique.entry(element.name.as_str()) {
                Entry::Vacant(slot) => {
                    slot.insert(&element.data);
                }
                Entry::Occupied(seen) if *seen.get() == element.data.as_slice() => {}
                Entry::Occupied(_) => return Err(DataError::duplicate_field(&element.name)),
            }
        }

        let mut container = Self::new();
        for (name, data) in unique {
            let definition = layout.shared_definition(name);
            if definition.is_none() {
                warn!(
                    "No definition for field '{}' on layout '{}'",
                    name,
                    layout.name()
                );
            }
            for (repetition, raw) in (0u32..).zip(data) {
                let value = Value::from(raw.clone());
                let value = match &definition {
                    Some(definition) => definition.munge(value, layout.formats()),
                    None => value,
                };
                container.insert(name, repetition, Field::new(value, definition.clone()));
            }
        }
        Ok(container)
    }

    /// Inserts or replaces one repetition of a field.
    pub fn insert(&mut self, name: impl Into<String>, repetition: u32, field: Field) {
        self.fields
            .entry(name.into())
            .or_default()
            .insert(repetition, field);
    }

    /// Inserts or replaces one repetition, munging the value with the
    /// layout's definition.
    pub fn set_value(&mut self, layout: &Layout, name: &str, repetition: u32, value: impl Into<Value>) {
        let value = layout.munge(name, value);
        let definition = layout.shared_definition(name);
        self.insert(name, repetition, Field::new(value, definition));
    }

    /// Returns one repetition of a field.
    pub fn value(&self, name: &str, repetition: u32) -> Result<&Value, FieldError> {
        self.fields
            .get(name)
            .ok_or_else(|| FieldError::missing(name))?
            .get(&repetition)
            .map(Field::value)
            .ok_or_else(|| FieldError::missing_repetition(name, repetition))
    }

    /// Returns every repetition of a field in repetition order.
    pub fn values(&self, name: &str) -> Result<Vec<&Value>, FieldError> {
        let repetitions = self.fields.get(name).ok_or_else(|| FieldError::missing(name))?;
        Ok(repetitions.values().map(Field::value).collect())
    }

    /// Returns the field slot for one repetition.
    pub fn field(&self, name: &str, repetition: u32) -> Option<&Field> {
        self.fields.get(name)?.get(&repetition)
    }

    /// Returns the field names, sorted.
    pub fn names(&self) -> Vec<&str> {
        self.fields.keys().map(String::as_str).collect()
    }

    pub fn contains(&self, name: &str) -> bool {
        self.fields.contains_key(name)
    }

    /// Iterates over `(name, repetition, value)` in name then repetition order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, u32, &Value)> {
        self.fields.iter().flat_map(|(name, repetitions)| {
            repetitions
                .iter()
                .map(move |(&repetition, field)| (name.as_str(), repetition, field.value()))
        })
    }

    /// Returns the number of distinct field names.
    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }
}

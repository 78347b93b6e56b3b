//! Materialized records

use std::sync::Arc;
use std::sync::Weak;

use chrono::NaiveDate;
use chrono::NaiveDateTime;
use chrono::NaiveTime;
use rust_decimal::Decimal;

use super::FieldContainer;
use super::Layout;
use super::Value;
use crate::FmsClient;
use crate::api::command::Command;
use crate::error::CommandError;
use crate::error::DataError;
use crate::error::Error;
use crate::error::FieldError;
use crate::parse::RecordElement;

/// One row read through a layout.
///
/// Records are created by executing a command and are never updated in
/// place: every execution returns fresh records. Portal rows are records too;
/// they share the layout of the record they were read with and keep a weak
/// back-reference to it.
///
/// # Example
///
/// ```no_run
/// # async fn demo(client: fmxml_lib::FmsClient) -> Result<(), fmxml_lib::error::Error> {
/// use fmxml_lib::api::command::Command;
///
/// let result = client.find("Contacts").execute().await?;
/// for record in result.records() {
///     let name = record.get_text("Name")?;
///     for dependent in record.portal_records("Dependents") {
///         println!("{:?}: {:?}", name, dependent.field_value("Dependents::Name", 0)?);
///     }
/// }
/// # Ok(())
/// # }
/// ```
#[derive(Debug)]
pub struct Record {
    layout: Arc<Layout>,
    record_id: Option<u64>,
    mod_id: Option<u64>,
    fields: FieldContainer,
    portal_records: Vec<(String, Vec<Arc<Record>>)>,
    parent: Weak<Record>,
    portal_name: Option<String>,
}

impl Record {
    /// Creates an empty record that has not been stored.
    pub fn new(layout: Arc<Layout>) -> Self {
        Self {
            layout,
            record_id: None,
            mod_id: None,
            fields: FieldContainer::new(),
            portal_records: Vec::new(),
            parent: Weak::new(),
            portal_name: None,
        }
    }

    /// Materializes one parsed record and its portal rows.
    ///
    /// # Errors
    ///
    /// Returns [`DataError::DuplicateField`] if the record or one of its portal
    /// rows lists a field twice with different data.
    pub fn from_element(layout: &Arc<Layout>, element: &RecordElement) -> Result<Arc<Self>, DataError> {
        let fields = FieldContainer::from_elements(layout, &element.fields)?;

        let mut related = Vec::with_capacity(element.related_sets.len());
        for set in &element.related_sets {
            let rows = set
                .records
                .iter()
                .map(|row| FieldContainer::from_elements(layout, &row.fields).map(|fields| (row, fields)))
                .collect::<Result<Vec<_>, DataError>>()?;
            related.push((set.table.as_str(), rows));
        }

        Ok(Arc::new_cyclic(|weak| {
            let mut portal_records: Vec<(String, Vec<Arc<Record>>)> = Vec::new();
            for (table, rows) in related {
                let children = rows.into_iter().map(|(row, fields)| {
                    Arc::new(Record {
                        layout: Arc::clone(layout),
                        record_id: positive(row.record_id),
                        mod_id: positive(row.mod_id),
                        fields,
                        portal_records: Vec::new(),
                        parent: weak.clone(),
                        portal_name: Some(table.to_string()),
                    })
                });
                match portal_records.iter_mut().find(|(name, _)| name == table) {
                    Some((_, list)) => list.extend(children),
                    None => portal_records.push((table.to_string(), children.collect())),
                }
            }

            Record {
                layout: Arc::clone(layout),
                record_id: positive(element.record_id),
                mod_id: positive(element.mod_id),
                fields,
                portal_records,
                parent: Weak::new(),
                portal_name: None,
            }
        }))
    }

    // =========================================================================
    // Metadata accessors
    // =========================================================================

    pub fn layout(&self) -> &Arc<Layout> {
        &self.layout
    }

    /// Returns the record id, or `None` for a record that was never stored.
    pub fn record_id(&self) -> Option<u64> {
        self.record_id
    }

    /// Returns the modification id used for optimistic locking.
    pub fn mod_id(&self) -> Option<u64> {
        self.mod_id
    }

    /// Returns the field names of the layout, portal fields included.
    pub fn field_names(&self) -> Vec<&str> {
        self.layout.field_names()
    }

    pub fn fields(&self) -> &FieldContainer {
        &self.fields
    }

    /// Sets a field value on an unsaved record, munged through the layout.
    pub fn set_field_value(&mut self, name: &str, repetition: u32, value: impl Into<Value>) {
        self.fields.set_value(&self.layout, name, repetition, value);
    }

    // =========================================================================
    // Portals
    // =========================================================================

    /// Returns the portal tables that have rows on this record, in document
    /// order.
    pub fn portal_table_names(&self) -> Vec<&str> {
        self.portal_records
            .iter()
            .map(|(name, _)| name.as_str())
            .collect()
    }

    /// Returns the rows of one portal; empty if the table has none.
    pub fn portal_records(&self, table_name: &str) -> &[Arc<Record>] {
        self.portal_records
            .iter()
            .find(|(name, _)| name == table_name)
            .map(|(_, records)| records.as_slice())
            .unwrap_or_default()
    }

    /// Returns the record this portal row was read with.
    ///
    /// `None` for top-level records, and for portal rows whose parent has
    /// been dropped.
    pub fn parent(&self) -> Option<Arc<Record>> {
        self.parent.upgrade()
    }

    /// Returns the portal table this row belongs to.
    pub fn portal_name(&self) -> Option<&str> {
        self.portal_name.as_deref()
    }

    pub fn is_portal_record(&self) -> bool {
        self.portal_name.is_some()
    }

    // =========================================================================
    // Raw field access
    // =========================================================================

    /// Returns one repetition of a field.
    pub fn field_value(&self, name: &str, repetition: u32) -> Result<&Value, FieldError> {
        self.fields.value(name, repetition)
    }

    /// Returns every repetition of a field.
    pub fn field_values(&self, name: &str) -> Result<Vec<&Value>, FieldError> {
        self.fields.values(name)
    }

    // =========================================================================
    // Typed getters
    //
    // Read the first repetition. Return Err if the field is missing or holds
    // another type, Ok(None) if it is empty.
    // =========================================================================

    /// Gets a text field value.
    pub fn get_text(&self, field: &str) -> Result<Option<&str>, FieldError> {
        match self.field_value(field, 0)? {
            Value::Null => Ok(None),
            Value::Text(s) => Ok(Some(s.as_str())),
            other => Err(FieldError::type_mismatch(field, "text", other.type_name())),
        }
    }

    /// Gets a whole number field value.
    pub fn get_int(&self, field: &str) -> Result<Option<i64>, FieldError> {
        match self.field_value(field, 0)? {
            Value::Null => Ok(None),
            Value::Int(n) => Ok(Some(*n)),
            other => Err(FieldError::type_mismatch(field, "int", other.type_name())),
        }
    }

    /// Gets a number field value as a decimal.
    pub fn get_decimal(&self, field: &str) -> Result<Option<Decimal>, FieldError> {
        match self.field_value(field, 0)? {
            Value::Null => Ok(None),
            Value::Decimal(d) => Ok(Some(*d)),
            Value::Int(n) => Ok(Some(Decimal::from(*n))), // Allow widening
            other => Err(FieldError::type_mismatch(field, "decimal", other.type_name())),
        }
    }

    /// Gets a date field value.
    pub fn get_date(&self, field: &str) -> Result<Option<NaiveDate>, FieldError> {
        match self.field_value(field, 0)? {
            Value::Null => Ok(None),
            Value::Date(d) => Ok(Some(*d)),
            other => Err(FieldError::type_mismatch(field, "date", other.type_name())),
        }
    }

    /// Gets a time field value.
    pub fn get_time(&self, field: &str) -> Result<Option<NaiveTime>, FieldError> {
        match self.field_value(field, 0)? {
            Value::Null => Ok(None),
            Value::Time(t) => Ok(Some(*t)),
            other => Err(FieldError::type_mismatch(field, "time", other.type_name())),
        }
    }

    /// Gets a timestamp field value.
    pub fn get_timestamp(&self, field: &str) -> Result<Option<NaiveDateTime>, FieldError> {
        match self.field_value(field, 0)? {
            Value::Null => Ok(None),
            Value::Timestamp(ts) => Ok(Some(*ts)),
            other => Err(FieldError::type_mismatch(field, "timestamp", other.type_name())),
        }
    }

    // =========================================================================
    // Server operations
    // =========================================================================

    /// Deletes this record on the server.
    ///
    /// A portal row is deleted by editing its parent with
    /// `-delete.related`.
    pub async fn delete(&self, client: &FmsClient) -> Result<super::CommandResult, Error> {
        let record_id = self
            .record_id
            .ok_or(CommandError::MissingRecordId { verb: "-delete" })?;

        match &self.portal_name {
            Some(table) => {
                let parent = self
                    .parent()
                    .ok_or_else(|| DataError::DetachedPortalRecord {
                        table: table.clone(),
                    })?;
                let parent_id = parent
                    .record_id
                    .ok_or(CommandError::MissingRecordId { verb: "-edit" })?;

                let mut edit = client.edit(parent.layout.name());
                edit.set_database(parent.layout.database_name())
                    .set_record_id(parent_id)?
                    .delete_related(table, record_id)?;
                edit.execute().await
            }
            None => {
                let mut delete = client.delete(self.layout.name());
                delete
                    .set_database(self.layout.database_name())
                    .set_record_id(record_id)?;
                delete.execute().await
            }
        }
    }

    /// Duplicates this record on the server and returns the copy.
    ///
    /// Returns `Ok(None)` if the server answered without a record.
    pub async fn duplicate(&self, client: &FmsClient) -> Result<Option<Arc<Record>>, Error> {
        let record_id = self
            .record_id
            .ok_or(CommandError::MissingRecordId { verb: "-dup" })?;

        let mut dup = client.duplicate(self.layout.name());
        dup.set_database(self.layout.database_name())
            .set_record_id(record_id)?;
        let result = dup.execute().await?;
        Ok(result.records().first().cloned())
    }
}

fn positive(id: u64) -> Option<u64> {
    (id > 0).then_some(id)
}

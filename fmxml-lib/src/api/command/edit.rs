//! `-edit`

use super::Command;
use super::FullyQualifiedFieldName;
use super::base::CommandBase;
use super::capability::Capability;
use super::capability::RecordTarget;
use super::fields::FieldUpdates;
use crate::FmsClient;
use crate::api::query::Argument;
use crate::api::query::CommandParameters;
use crate::error::CommandError;
use crate::model::Value;

/// Edits one record.
///
/// The record id is required and can be set once. A modification id makes
/// the server reject the edit if the record changed since it was read.
///
/// # Example
///
/// ```
/// use fmxml_lib::FmsClient;
/// use fmxml_lib::api::command::Command;
///
/// let client = FmsClient::builder()
///     .url("https://fms.example.com")
///     .guest()
///     .database("employees")
///     .build()
///     .unwrap();
///
/// let mut edit = client.edit("departments");
/// edit.set_record_id(13)?.add_field("Country", "USA");
///
/// assert_eq!(
///     edit.query()?,
///     "-db=employees&-lay=departments&-recid=13&Country=USA&-edit"
/// );
/// # Ok::<(), fmxml_lib::error::CommandError>(())
/// ```
#[derive(Debug, Clone)]
pub struct Edit<'a> {
    base: CommandBase<'a>,
    record: RecordTarget,
    mod_id: Option<u64>,
    delete_related: Option<String>,
    fields: FieldUpdates,
}

impl<'a> Edit<'a> {
    pub(crate) fn new(client: &'a FmsClient, layout: impl Into<String>) -> Self {
        Self {
            base: CommandBase::new(client, layout),
            record: RecordTarget::once(),
            mod_id: None,
            delete_related: None,
            fields: FieldUpdates::default(),
        }
    }

    pub fn layout(&self) -> &str {
        &self.base.layout
    }

    pub fn database(&self) -> Option<&str> {
        self.base.database.as_deref()
    }

    pub fn set_database(&mut self, database: impl Into<String>) -> &mut Self {
        self.base.database = Some(database.into());
        self
    }

    pub fn record_id(&self) -> Option<u64> {
        self.record.get()
    }

    /// Sets the record to edit. Can be called once.
    pub fn set_record_id(&mut self, record_id: u64) -> Result<&mut Self, CommandError> {
        self.record.set(record_id)?;
        Ok(self)
    }

    /// Sets `-modid` for optimistic locking.
    pub fn set_mod_id(&mut self, mod_id: u64) -> Result<&mut Self, CommandError> {
        if mod_id == 0 {
            return Err(CommandError::InvalidModificationId(mod_id));
        }
        self.mod_id = Some(mod_id);
        Ok(self)
    }

    /// Deletes a portal row as part of the edit (`-delete.related`).
    pub fn delete_related(
        &mut self,
        table: &str,
        record_id: u64,
    ) -> Result<&mut Self, CommandError> {
        if record_id == 0 {
            return Err(CommandError::InvalidRecordId(record_id));
        }
        self.delete_related = Some(format!("{}.{}", table, record_id));
        Ok(self)
    }

    /// Sets a field by its fully qualified name.
    pub fn add_field(
        &mut self,
        field: impl Into<FullyQualifiedFieldName>,
        value: impl Into<Argument>,
    ) -> &mut Self {
        self.fields.add(field, value);
        self
    }

    /// Sets one repetition of a field on the layout's table.
    pub fn set_field_value(
        &mut self,
        name: &str,
        value: impl Into<Value>,
        repetition: u32,
    ) -> &mut Self {
        self.fields.set(name, value, repetition);
        self
    }
}

impl Command for Edit<'_> {
    fn client(&self) -> &FmsClient {
        self.base.client
    }

    fn parameters(&self) -> Result<CommandParameters, CommandError> {
        self.record.require("-edit")?;

        let mut params = self.base.parameters()?;
        self.record.contribute(&mut params)?;
        if let Some(mod_id) = self.mod_id {
            params.push("-modid", mod_id.to_string());
        }
        if let Some(related) = &self.delete_related {
            params.push("-delete.related", related.as_str());
        }
        self.fields.contribute(&mut params)?;
        params.push_verb("-edit");
        Ok(params)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::command::tests::client;

    #[test]
    fn test_requires_record_id() {
        let client = client();
        let edit = client.edit("departments");
        assert_eq!(
            edit.query(),
            Err(CommandError::MissingRecordId { verb: "-edit" })
        );
    }

    #[test]
    fn test_record_id_set_once() {
        let client = client();
        let mut edit = client.edit("departments");
        edit.set_record_id(7).unwrap();
        assert_eq!(
            edit.set_record_id(8).err(),
            Some(CommandError::ImmutableField { field: "-recid" })
        );
        assert_eq!(edit.record_id(), Some(7));
    }

    #[test]
    fn test_delete_related() {
        let client = client();
        let mut edit = client.edit("departments");
        edit.set_record_id(7)
            .unwrap()
            .delete_related("jobtable", 20)
            .unwrap();
        assert_eq!(
            edit.query().unwrap(),
            "-db=employees&-lay=departments&-recid=7&-delete.related=jobtable.20&-edit"
        );
    }

    #[test]
    fn test_mod_id_and_repetitions() {
        let client = client();
        let mut edit = client.edit("departments");
        edit.set_record_id(7)
            .unwrap()
            .set_mod_id(3)
            .unwrap()
            .set_field_value("Phone", "555-1234", 2)
            .add_field(FullyQualifiedFieldName::new("Title").table("Jobs").record_id(4), "Lead");
        assert_eq!(
            edit.query().unwrap(),
            "-db=employees&-lay=departments&-recid=7&-modid=3&Phone(2)=555-1234\
             &Jobs::Title.4=Lead&-edit"
        );
        assert_eq!(
            edit.set_mod_id(0).err(),
            Some(CommandError::InvalidModificationId(0))
        );
    }
}

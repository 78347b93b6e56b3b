//! `-new`

use super::Command;
use super::FullyQualifiedFieldName;
use super::base::CommandBase;
use super::capability::Capability;
use super::fields::FieldUpdates;
use crate::FmsClient;
use crate::api::query::Argument;
use crate::api::query::CommandParameters;
use crate::error::CommandError;
use crate::model::Value;

/// Creates a record.
///
/// # Example
///
/// ```
/// use chrono::NaiveDate;
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
/// let mut new = client.new_record("people");
/// new.set_field_value("Name", "Ann", 0)
///     .set_field_value("Born", NaiveDate::from_ymd_opt(1980, 2, 29).unwrap(), 0);
///
/// assert_eq!(
///     new.query().unwrap(),
///     "-db=employees&-lay=people&Name(0)=Ann&Born(0)=02/29/1980&-new"
/// );
/// ```
#[derive(Debug, Clone)]
pub struct NewRecord<'a> {
    base: CommandBase<'a>,
    fields: FieldUpdates,
}

impl<'a> NewRecord<'a> {
    pub(crate) fn new(client: &'a FmsClient, layout: impl Into<String>) -> Self {
        Self {
            base: CommandBase::new(client, layout),
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

    /// Returns the number of field assignments.
    pub fn field_count(&self) -> usize {
        self.fields.len()
    }
}

impl Command for NewRecord<'_> {
    fn client(&self) -> &FmsClient {
        self.base.client
    }

    fn parameters(&self) -> Result<CommandParameters, CommandError> {
        let mut params = self.base.parameters()?;
        self.fields.contribute(&mut params)?;
        params.push_verb("-new");
        Ok(params)
    }
}

#[cfg(test)]
mod tests {
    use rust_decimal::Decimal;

    use super::*;
    use crate::api::command::tests::client;

    #[test]
    fn test_new_with_fqfn() {
        let client = client();
        let mut new = client.new_record("departments");
        new.add_field("Country", "USA")
            .add_field(FullyQualifiedFieldName::new("Budget").table("Finance"), Decimal::new(12050, 2));
        assert_eq!(
            new.query().unwrap(),
            "-db=employees&-lay=departments&Country=USA&Finance::Budget=120.50&-new"
        );
        assert_eq!(new.field_count(), 2);
    }

    #[test]
    fn test_new_without_fields() {
        let client = client();
        let new = client.new_record("departments");
        assert_eq!(new.query().unwrap(), "-db=employees&-lay=departments&-new");
    }
}

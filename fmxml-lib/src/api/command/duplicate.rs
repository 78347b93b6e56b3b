//! `-dup`

use super::Command;
use super::base::CommandBase;
use super::capability::Capability;
use super::capability::RecordTarget;
use crate::FmsClient;
use crate::api::query::CommandParameters;
use crate::error::CommandError;

/// Duplicates one record. The record id is required.
#[derive(Debug, Clone)]
pub struct Duplicate<'a> {
    base: CommandBase<'a>,
    record: RecordTarget,
}

impl<'a> Duplicate<'a> {
    pub(crate) fn new(client: &'a FmsClient, layout: impl Into<String>) -> Self {
        Self {
            base: CommandBase::new(client, layout),
            record: RecordTarget::new(),
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

    pub fn set_record_id(&mut self, record_id: u64) -> Result<&mut Self, CommandError> {
        self.record.set(record_id)?;
        Ok(self)
    }
}

impl Command for Duplicate<'_> {
    fn client(&self) -> &FmsClient {
        self.base.client
    }

    fn parameters(&self) -> Result<CommandParameters, CommandError> {
        self.record.require("-dup")?;

        let mut params = self.base.parameters()?;
        self.record.contribute(&mut params)?;
        params.push_verb("-dup");
        Ok(params)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::command::tests::client;

    #[test]
    fn test_dup() {
        let client = client();
        let mut dup = client.duplicate("departments");
        assert_eq!(dup.query(), Err(CommandError::MissingRecordId { verb: "-dup" }));

        dup.set_record_id(14).unwrap();
        assert_eq!(
            dup.query().unwrap(),
            "-db=employees&-lay=departments&-recid=14&-dup"
        );
    }
}

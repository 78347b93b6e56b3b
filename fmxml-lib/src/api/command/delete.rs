//! `-delete`

use super::Command;
use super::Script;
use super::ScriptStage;
use super::base::CommandBase;
use super::capability::Capability;
use super::capability::RecordTarget;
use super::capability::Scripts;
use crate::FmsClient;
use crate::api::query::CommandParameters;
use crate::error::CommandError;

/// Deletes one record. The record id is required and can be set once.
#[derive(Debug, Clone)]
pub struct Delete<'a> {
    base: CommandBase<'a>,
    scripts: Scripts,
    record: RecordTarget,
}

impl<'a> Delete<'a> {
    pub(crate) fn new(client: &'a FmsClient, layout: impl Into<String>) -> Self {
        Self {
            base: CommandBase::new(client, layout),
            scripts: Scripts::main_only(),
            record: RecordTarget::once(),
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

    /// Runs a script after the delete.
    pub fn set_script(&mut self, script: Script) -> &mut Self {
        self.scripts.set(ScriptStage::Main, script);
        self
    }
}

impl Command for Delete<'_> {
    fn client(&self) -> &FmsClient {
        self.base.client
    }

    fn parameters(&self) -> Result<CommandParameters, CommandError> {
        self.record.require("-delete")?;

        let mut params = self.base.parameters()?;
        self.scripts.contribute(&mut params)?;
        self.record.contribute(&mut params)?;
        params.push_verb("-delete");
        Ok(params)
    }
}

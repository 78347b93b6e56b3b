//! `-findany`

use super::Command;
use super::Max;
use super::RelatedSetsFilter;
use super::base::CommandBase;
use super::capability::Capability;
use super::capability::RelatedSets;
use crate::FmsClient;
use crate::api::query::CommandParameters;
use crate::error::CommandError;

/// Returns one random record.
#[derive(Debug, Clone)]
pub struct FindAny<'a> {
    base: CommandBase<'a>,
    related_sets: RelatedSets,
}

impl<'a> FindAny<'a> {
    pub(crate) fn new(client: &'a FmsClient, layout: impl Into<String>) -> Self {
        Self {
            base: CommandBase::new(client, layout),
            related_sets: RelatedSets::default(),
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

    pub fn set_related_sets_filter(&mut self, filter: RelatedSetsFilter) -> &mut Self {
        self.related_sets.filter = Some(filter);
        self
    }

    pub fn set_related_sets_max(&mut self, max: Max) -> &mut Self {
        self.related_sets.max = Some(max);
        self
    }
}

impl Command for FindAny<'_> {
    fn client(&self) -> &FmsClient {
        self.base.client
    }

    fn parameters(&self) -> Result<CommandParameters, CommandError> {
        let mut params = self.base.parameters()?;
        self.related_sets.contribute(&mut params)?;
        params.push_verb("-findany");
        Ok(params)
    }
}

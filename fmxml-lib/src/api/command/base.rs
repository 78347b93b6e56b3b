//! Directives every command starts with

use crate::FmsClient;
use crate::api::query::CommandParameters;
use crate::error::CommandError;

/// The client plus the `-db` and `-lay` directives.
#[derive(Debug, Clone)]
pub(crate) struct CommandBase<'a> {
    pub(crate) client: &'a FmsClient,
    pub(crate) database: Option<String>,
    pub(crate) layout: String,
}

impl<'a> CommandBase<'a> {
    /// Starts a command on the client's default database.
    pub(crate) fn new(client: &'a FmsClient, layout: impl Into<String>) -> Self {
        Self {
            client,
            database: client.database().map(str::to_string),
            layout: layout.into(),
        }
    }

    /// Starts the parameter list with `-db` and `-lay`.
    pub(crate) fn parameters(&self) -> Result<CommandParameters, CommandError> {
        let database = self
            .database
            .as_deref()
            .ok_or(CommandError::MissingDatabase)?;

        let mut params = CommandParameters::new();
        params.push("-db", database);
        params.push("-lay", self.layout.as_str());
        Ok(params)
    }
}

//! Command execution
//!
//! Fetching, parsing and materializing responses, plus the command factories.

use std::sync::Arc;

use log::info;

use super::command::Command;
use super::command::Delete;
use super::command::Duplicate;
use super::command::Edit;
use super::command::Find;
use super::command::FindAny;
use super::command::FindQuery;
use super::command::NewRecord;
use crate::FmsClient;
use crate::Grammar;
use crate::error::DataError;
use crate::error::Error;
use crate::error::ParseError;
use crate::model::CommandResult;
use crate::model::Record;
use crate::model::check_error_code;
use crate::parse::XmlResultDocument;
use crate::parse::parse_result_set;
use crate::parse::parse_xml_result;

impl FmsClient {
    // =========================================================================
    // Command factories
    // =========================================================================

    /// Creates a find command on a layout of the default database.
    pub fn find(&self, layout: impl Into<String>) -> Find<'_> {
        Find::new(self, layout)
    }

    /// Creates a command returning one random record.
    pub fn find_any(&self, layout: impl Into<String>) -> FindAny<'_> {
        FindAny::new(self, layout)
    }

    /// Creates a compound find command.
    pub fn find_query(&self, layout: impl Into<String>) -> FindQuery<'_> {
        FindQuery::new(self, layout)
    }

    pub fn new_record(&self, layout: impl Into<String>) -> NewRecord<'_> {
        NewRecord::new(self, layout)
    }

    /// Creates an edit command. Set the record id before executing.
    pub fn edit(&self, layout: impl Into<String>) -> Edit<'_> {
        Edit::new(self, layout)
    }

    /// Creates a delete command. Set the record id before executing.
    pub fn delete(&self, layout: impl Into<String>) -> Delete<'_> {
        Delete::new(self, layout)
    }

    /// Creates a duplicate command. Set the record id before executing.
    pub fn duplicate(&self, layout: impl Into<String>) -> Duplicate<'_> {
        Duplicate::new(self, layout)
    }

    // =========================================================================
    // Execution
    // =========================================================================

    /// Sends an encoded query to a grammar endpoint and returns the raw
    /// response.
    ///
    /// # Errors
    ///
    /// Fails on transport errors and with [`DataError::EmptyResponse`] if the
    /// server sent no bytes.
    pub async fn execute_query(&self, grammar: Grammar, query: &str) -> Result<Vec<u8>, Error> {
        let url = self.endpoint(&grammar.path(), Some(query))?;
        info!("GET {}", url);

        let bytes = self.inner.transport.get(&url).await?;
        if bytes.is_empty() {
            return Err(DataError::EmptyResponse.into());
        }
        Ok(bytes)
    }

    /// Runs a query against `fmresultset` and materializes the records.
    pub(crate) async fn execute_command(&self, query: &str) -> Result<CommandResult, Error> {
        let bytes = self.execute_query(Grammar::ResultSet, query).await?;
        let document = parse_result_set(&bytes)?;
        check_error_code(document.error_code)?;

        let layout = self.cached_layout(&document).await?;
        CommandResult::from_document(&document, layout)
    }

    /// Runs a command against `FMPXMLRESULT` and returns the parsed document.
    ///
    /// Values are not munged; this grammar carries no per-field formats.
    pub async fn fetch_xml_result(&self, command: &impl Command) -> Result<XmlResultDocument, Error> {
        let query = command.query()?;
        let bytes = self.execute_query(Grammar::XmlResult, &query).await?;
        let document = parse_xml_result(&bytes)?;
        check_error_code(document.error_code)?;
        Ok(document)
    }

    /// Finds one record by id.
    ///
    /// Returns `Ok(None)` if the server has no such record.
    pub async fn find_record_by_id(
        &self,
        layout: &str,
        record_id: u64,
    ) -> Result<Option<Arc<Record>>, Error> {
        let mut find = self.find(layout);
        find.set_record_id(record_id)?;

        let result = find.execute().await?;
        match result.records().first() {
            Some(record) => Ok(Some(Arc::clone(record))),
            None => {
                info!("Record {} not found on layout '{}'", record_id, layout);
                Ok(None)
            }
        }
    }
}

/// Returns the database and layout named by a response.
pub(crate) fn datasource_key(
    document: &crate::parse::ResultSetDocument,
) -> Result<(&str, &str), ParseError> {
    let datasource = document
        .datasource
        .as_ref()
        .ok_or(ParseError::MissingElement("datasource"))?;
    Ok((datasource.database.as_str(), datasource.layout.as_str()))
}

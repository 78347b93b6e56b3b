//! Result of one command execution

use std::sync::Arc;

use super::Layout;
use super::Record;
use crate::error::DataError;
use crate::error::Error;
use crate::error::ParseError;
use crate::parse::ResultSetDocument;

/// Error code for "no records match the request".
pub const NO_RECORDS_FOUND: u32 = 401;

/// Records and counts returned by one command execution.
#[derive(Debug, Clone)]
pub struct CommandResult {
    error_code: u32,
    layout: Arc<Layout>,
    total_count: u64,
    found_count: u64,
    fetch_size: u64,
    records: Vec<Arc<Record>>,
}

impl CommandResult {
    /// Materializes a parsed `fmresultset` document with a known layout.
    ///
    /// # Errors
    ///
    /// Fails if the server reported an error other than 0 or 401, if the
    /// document lacks `<datasource>` or `<resultset>`, or if a record lists a
    /// field twice with different data.
    pub fn from_document(document: &ResultSetDocument, layout: Arc<Layout>) -> Result<Self, Error> {
        check_error_code(document.error_code)?;

        let datasource = document
            .datasource
            .as_ref()
            .ok_or(ParseError::MissingElement("datasource"))?;
        let resultset = document
            .resultset
            .as_ref()
            .ok_or(ParseError::MissingElement("resultset"))?;

        let records = resultset
            .records
            .iter()
            .map(|element| Record::from_element(&layout, element))
            .collect::<Result<Vec<_>, _>>()?;

        Ok(Self {
            error_code: document.error_code,
            layout,
            total_count: datasource.total_count,
            found_count: resultset.count,
            fetch_size: resultset.fetch_size,
            records,
        })
    }

    /// Returns 0, or 401 when nothing matched.
    pub fn error_code(&self) -> u32 {
        self.error_code
    }

    pub fn layout(&self) -> &Arc<Layout> {
        &self.layout
    }

    /// Records in the table, regardless of the request.
    pub fn total_count(&self) -> u64 {
        self.total_count
    }

    /// Records matching the request.
    pub fn found_count(&self) -> u64 {
        self.found_count
    }

    /// Records returned in this response.
    pub fn fetch_size(&self) -> u64 {
        self.fetch_size
    }

    pub fn records(&self) -> &[Arc<Record>] {
        &self.records
    }

    pub fn into_records(self) -> Vec<Arc<Record>> {
        self.records
    }

    pub fn field_names(&self) -> Vec<&str> {
        self.layout.field_names()
    }

    pub fn portal_names(&self) -> Vec<&str> {
        self.layout.portal_names()
    }
}

/// Accepts 0 and 401; any other code is a server error.
pub(crate) fn check_error_code(code: u32) -> Result<(), DataError> {
    match code {
        0 | NO_RECORDS_FOUND => Ok(()),
        code => Err(DataError::server(code)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::Value;
    use crate::parse::parse_result_set;

    fn materialize(xml: &str) -> Result<CommandResult, Error> {
        let document = parse_result_set(xml.as_bytes())?;
        let layout = Arc::new(Layout::new(&document, None)?);
        CommandResult::from_document(&document, layout)
    }

    const HEADER: &str = r#"<error code="0"/>
      <datasource database="db" layout="Titles" table="Titles" date-format="MM/dd/yyyy"
          time-format="HH:mm:ss" timestamp-format="MM/dd/yyyy HH:mm:ss" total-count="12"/>
      <metadata>
        <field-definition name="Title" result="text" type="normal" max-repeat="1"/>
      </metadata>"#;

    #[test]
    fn test_counts_and_records() {
        let xml = format!(
            r#"<fmresultset>{HEADER}
              <resultset count="2" fetch-size="2">
                <record mod-id="1" record-id="1"><field name="Title"><data>Alaska</data></field></record>
                <record mod-id="1" record-id="2"><field name="Title"><data>Ohio</data></field></record>
              </resultset>
            </fmresultset>"#
        );
        let result = materialize(&xml).unwrap();
        assert_eq!(result.error_code(), 0);
        assert_eq!(result.total_count(), 12);
        assert_eq!(result.found_count(), 2);
        assert_eq!(result.fetch_size(), 2);
        assert_eq!(result.field_names(), ["Title"]);
        assert!(result.portal_names().is_empty());
        assert_eq!(
            result.records()[1].field_value("Title", 0).unwrap(),
            &Value::from("Ohio")
        );
    }

    #[test]
    fn test_duplicate_field_with_different_data() {
        let xml = format!(
            r#"<fmresultset>{HEADER}
              <resultset count="1" fetch-size="1">
                <record mod-id="1" record-id="1">
                  <field name="Title"><data>Alaska</data></field>
                  <field name="Title"><data>Ohio</data></field>
                </record>
              </resultset>
            </fmresultset>"#
        );
        assert!(matches!(
            materialize(&xml),
            Err(Error::Data(DataError::DuplicateField { field })) if field == "Title"
        ));
    }

    #[test]
    fn test_no_records_found_is_not_an_error() {
        let xml = format!(
            r#"<fmresultset>{}<resultset count="0" fetch-size="0"/></fmresultset>"#,
            HEADER.replace(r#"code="0""#, r#"code="401""#)
        );
        let result = materialize(&xml).unwrap();
        assert_eq!(result.error_code(), NO_RECORDS_FOUND);
        assert!(result.records().is_empty());
    }

    #[test]
    fn test_server_error() {
        let xml = format!(
            r#"<fmresultset>{}<resultset count="0" fetch-size="0"/></fmresultset>"#,
            HEADER.replace(r#"code="0""#, r#"code="105""#)
        );
        let error = materialize(&xml).unwrap_err();
        assert_eq!(error.server_code(), Some(105));
    }

    #[test]
    fn test_missing_resultset() {
        let xml = format!("<fmresultset>{HEADER}</fmresultset>");
        assert!(matches!(
            materialize(&xml),
            Err(Error::Parse(ParseError::MissingElement("resultset")))
        ));
    }
}

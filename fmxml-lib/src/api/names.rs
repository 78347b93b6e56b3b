//! Database, layout and script listings

use crate::FmsClient;
use crate::Grammar;
use crate::api::query::CommandParameters;
use crate::error::CommandError;
use crate::error::Error;
use crate::model::check_error_code;
use crate::parse::ResultSetDocument;
use crate::parse::parse_result_set;

impl FmsClient {
    /// Lists the databases hosted by the server (`-dbnames`).
    pub async fn database_names(&self) -> Result<Vec<String>, Error> {
        let mut params = CommandParameters::new();
        params.push_verb("-dbnames");
        self.list_names(params).await
    }

    /// Lists the layouts of the default database (`-layoutnames`).
    pub async fn layout_names(&self) -> Result<Vec<String>, Error> {
        self.list_database_names("-layoutnames").await
    }

    /// Lists the scripts of the default database (`-scriptnames`).
    pub async fn script_names(&self) -> Result<Vec<String>, Error> {
        self.list_database_names("-scriptnames").await
    }

    async fn list_database_names(&self, verb: &str) -> Result<Vec<String>, Error> {
        let database = self.database().ok_or(CommandError::MissingDatabase)?;
        let mut params = CommandParameters::new();
        params.push("-db", database);
        params.push_verb(verb);
        self.list_names(params).await
    }

    async fn list_names(&self, params: CommandParameters) -> Result<Vec<String>, Error> {
        let query = params.encode()?;
        let bytes = self.execute_query(Grammar::ResultSet, &query).await?;
        let document = parse_result_set(&bytes)?;
        check_error_code(document.error_code)?;
        Ok(first_values(&document))
    }
}

/// Collects the first value of the first field of each record, skipping
/// empty ones.
fn first_values(document: &ResultSetDocument) -> Vec<String> {
    document
        .resultset
        .iter()
        .flat_map(|resultset| &resultset.records)
        .filter_map(|record| record.fields.first()?.data.first()?.clone())
        .filter(|name| !name.is_empty())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_first_values() {
        let xml = r#"<fmresultset><error code="0"/>
          <datasource database="" layout="" table="" total-count="0"/>
          <metadata><field-definition name="DATABASE_NAME" result="text" type="normal"/></metadata>
          <resultset count="3" fetch-size="3">
            <record><field name="DATABASE_NAME"><data>Contacts</data></field></record>
            <record><field name="DATABASE_NAME"><data/></field></record>
            <record><field name="DATABASE_NAME"><data>Sales</data></field></record>
          </resultset>
        </fmresultset>"#;
        let document = parse_result_set(xml.as_bytes()).unwrap();
        assert_eq!(first_values(&document), ["Contacts", "Sales"]);
    }
}

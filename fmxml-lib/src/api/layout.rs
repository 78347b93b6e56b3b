//! Layout lookup

use std::sync::Arc;

use crate::FmsClient;
use crate::Grammar;
use crate::api::query::CommandParameters;
use crate::error::CommandError;
use crate::error::Error;
use crate::model::Layout;
use crate::model::check_error_code;
use crate::parse::ResultSetDocument;
use crate::parse::parse_layout_info;
use crate::parse::parse_result_set;

use super::execute::datasource_key;

impl FmsClient {
    /// Returns a layout of the default database, fetching it on first use.
    pub async fn layout(&self, name: &str) -> Result<Arc<Layout>, Error> {
        let database = self.database().ok_or(CommandError::MissingDatabase)?;
        self.layout_in(database, name).await
    }

    /// Returns a layout of any database, fetching it on first use.
    ///
    /// A fetch reads the field definitions with `-view` on `fmresultset` and
    /// the value lists with `-view` on `FMPXMLLAYOUT`.
    pub async fn layout_in(&self, database: &str, name: &str) -> Result<Arc<Layout>, Error> {
        self.inner
            .layouts
            .get_or_try_init(database, name, move || self.fetch_layout(database, name))
            .await
    }

    /// Returns the layout a response was read through.
    ///
    /// On a miss the response's own metadata is used, so only the value
    /// lists are fetched.
    pub(crate) async fn cached_layout(&self, document: &ResultSetDocument) -> Result<Arc<Layout>, Error> {
        let (database, name) = datasource_key(document)?;
        self.inner
            .layouts
            .get_or_try_init(database, name, move || {
                self.load_layout(database, name, document)
            })
            .await
    }

    async fn fetch_layout(&self, database: &str, name: &str) -> Result<Arc<Layout>, Error> {
        let query = view_query(database, name)?;
        let bytes = self.execute_query(Grammar::ResultSet, &query).await?;
        let document = parse_result_set(&bytes)?;
        check_error_code(document.error_code)?;
        self.load_layout(database, name, &document).await
    }

    async fn load_layout(
        &self,
        database: &str,
        name: &str,
        document: &ResultSetDocument,
    ) -> Result<Arc<Layout>, Error> {
        let query = view_query(database, name)?;
        let bytes = self.execute_query(Grammar::Layout, &query).await?;
        let info = parse_layout_info(&bytes)?;
        check_error_code(info.error_code)?;
        Ok(Arc::new(Layout::new(document, Some(&info))?))
    }
}

fn view_query(database: &str, layout: &str) -> Result<String, CommandError> {
    let mut params = CommandParameters::new();
    params.push("-db", database);
    params.push("-lay", layout);
    params.push_verb("-view");
    params.encode()
}

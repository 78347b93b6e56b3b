//! Commands
//!
//! Each command is a builder over a fixed set of capabilities (record id,
//! scripts, found set window, related sets, sort rules, criteria). Building
//! a command asks every capability, in a fixed order, to contribute its
//! directives to a [`CommandParameters`] list.
//!
//! | Command         | Verb                   | Created by                   |
//! |-----------------|------------------------|------------------------------|
//! | [`Find`]        | `-find` / `-findall`   | [`FmsClient::find`]          |
//! | [`FindAny`]     | `-findany`             | [`FmsClient::find_any`]      |
//! | [`FindQuery`]   | `-findquery`           | [`FmsClient::find_query`]    |
//! | [`NewRecord`]   | `-new`                 | [`FmsClient::new_record`]    |
//! | [`Edit`]        | `-edit`                | [`FmsClient::edit`]          |
//! | [`Delete`]      | `-delete`              | [`FmsClient::delete`]        |
//! | [`Duplicate`]   | `-dup`                 | [`FmsClient::duplicate`]     |

mod base;
mod capability;
mod criteria;
mod delete;
mod duplicate;
mod edit;
mod fields;
mod find;
mod find_any;
mod find_query;
mod fqfn;
mod new_record;
mod sort;

pub use capability::Max;
pub use capability::RelatedSetsFilter;
pub use capability::Script;
pub use capability::ScriptStage;
pub use criteria::Criterion;
pub use criteria::FindOperator;
pub use criteria::LogicalOperator;
pub use delete::Delete;
pub use duplicate::Duplicate;
pub use edit::Edit;
pub use find::Find;
pub use find_any::FindAny;
pub use find_query::FindQuery;
pub use find_query::RequestDefinition;
pub use fqfn::FullyQualifiedFieldName;
pub use new_record::NewRecord;
pub use sort::SortOrder;
pub use sort::SortRule;

use async_trait::async_trait;

use crate::FmsClient;
use crate::api::query::CommandParameters;
use crate::error::CommandError;
use crate::error::Error;
use crate::model::CommandResult;

/// A command that can be encoded and executed against the `fmresultset`
/// grammar.
#[async_trait]
pub trait Command: Send + Sync {
    /// Returns the client the command runs on.
    fn client(&self) -> &FmsClient;

    /// Builds the directive list.
    ///
    /// # Errors
    ///
    /// Returns a [`CommandError`] if the command is incomplete or
    /// inconsistent.
    fn parameters(&self) -> Result<CommandParameters, CommandError>;

    /// Builds the encoded query string.
    fn query(&self) -> Result<String, CommandError> {
        self.parameters()?.encode()
    }

    /// Sends the command and materializes the response.
    async fn execute(&self) -> Result<CommandResult, Error> {
        let query = self.query()?;
        self.client().execute_command(&query).await
    }
}

//! `-find` and `-findall`

use super::Command;
use super::FindOperator;
use super::LogicalOperator;
use super::Max;
use super::RelatedSetsFilter;
use super::Script;
use super::ScriptStage;
use super::SortOrder;
use super::base::CommandBase;
use super::capability::Capability;
use super::capability::FoundSet;
use super::capability::RecordTarget;
use super::capability::RelatedSets;
use super::capability::Scripts;
use super::criteria::Criteria;
use super::sort::SortRules;
use crate::FmsClient;
use crate::api::query::Argument;
use crate::api::query::CommandParameters;
use crate::error::CommandError;

/// Finds records.
///
/// Sends `-findall` when neither a record id nor a criterion is set, and
/// `-find` otherwise. The verb is chosen each time the query is built.
///
/// Use [`FmsClient::find`] to create one.
///
/// # Example
///
/// ```
/// use fmxml_lib::FmsClient;
/// use fmxml_lib::api::command::{Command, FindOperator, SortOrder};
///
/// let client = FmsClient::builder()
///     .url("https://fms.example.com")
///     .guest()
///     .database("employees")
///     .build()
///     .unwrap();
///
/// let mut find = client.find("departments");
/// find.add_criterion("Country", "USA", None)
///     .add_criterion("Headcount", 10, Some(FindOperator::GreaterThan))
///     .add_sort_rule("Name", 1, Some(SortOrder::Ascend))
///     .unwrap();
///
/// assert_eq!(
///     find.query().unwrap(),
///     "-db=employees&-lay=departments&-sortfield.1=Name&-sortorder.1=ascend\
///      &Country=USA&Headcount=10&Headcount.op=gt&-find"
/// );
/// ```
#[derive(Debug, Clone)]
pub struct Find<'a> {
    base: CommandBase<'a>,
    related_sets: RelatedSets,
    scripts: Scripts,
    found_set: FoundSet,
    record: RecordTarget,
    sort_rules: SortRules,
    criteria: Criteria,
    response_layout: Option<String>,
}

impl<'a> Find<'a> {
    pub(crate) fn new(client: &'a FmsClient, layout: impl Into<String>) -> Self {
        Self {
            base: CommandBase::new(client, layout),
            related_sets: RelatedSets::default(),
            scripts: Scripts::all(),
            found_set: FoundSet::default(),
            record: RecordTarget::new(),
            sort_rules: SortRules::default(),
            criteria: Criteria::default(),
            response_layout: None,
        }
    }

    pub fn layout(&self) -> &str {
        &self.base.layout
    }

    pub fn database(&self) -> Option<&str> {
        self.base.database.as_deref()
    }

    /// Overrides the client's default database.
    pub fn set_database(&mut self, database: impl Into<String>) -> &mut Self {
        self.base.database = Some(database.into());
        self
    }

    // =========================================================================
    // Record id
    // =========================================================================

    pub fn record_id(&self) -> Option<u64> {
        self.record.get()
    }

    /// Restricts the find to one record.
    pub fn set_record_id(&mut self, record_id: u64) -> Result<&mut Self, CommandError> {
        self.record.set(record_id)?;
        Ok(self)
    }

    pub fn clear_record_id(&mut self) -> &mut Self {
        // Find targets are never locked.
        let _ = self.record.clear();
        self
    }

    // =========================================================================
    // Criteria
    // =========================================================================

    /// Adds a criterion; `operator` adds a `field.op` directive.
    pub fn add_criterion(
        &mut self,
        field: impl Into<String>,
        value: impl Into<Argument>,
        operator: Option<FindOperator>,
    ) -> &mut Self {
        self.criteria.add(field, value, operator);
        self
    }

    pub fn clear_criteria(&mut self) -> &mut Self {
        self.criteria.clear();
        self
    }

    /// Sets `-lop`, how criteria combine.
    pub fn set_logical_operator(&mut self, operator: LogicalOperator) -> &mut Self {
        self.criteria.logical_operator = Some(operator);
        self
    }

    /// Returns the records through another layout (`-lay.response`).
    pub fn set_response_layout(&mut self, layout: impl Into<String>) -> &mut Self {
        self.response_layout = Some(layout.into());
        self
    }

    // =========================================================================
    // Sorting and windowing
    // =========================================================================

    pub fn add_sort_rule(
        &mut self,
        field: impl Into<String>,
        precedence: u8,
        order: Option<SortOrder>,
    ) -> Result<&mut Self, CommandError> {
        self.sort_rules.add(field, precedence, order)?;
        Ok(self)
    }

    pub fn remove_sort_rule(&mut self, field: &str) -> &mut Self {
        self.sort_rules.remove(field);
        self
    }

    pub fn clear_sort_rules(&mut self) -> &mut Self {
        self.sort_rules.clear();
        self
    }

    /// Skips the first `skip` records of the found set.
    pub fn set_skip(&mut self, skip: u32) -> &mut Self {
        self.found_set.skip = skip;
        self
    }

    /// Limits the number of records returned.
    pub fn set_max(&mut self, max: Max) -> &mut Self {
        self.found_set.max = Some(max);
        self
    }

    // =========================================================================
    // Portals and scripts
    // =========================================================================

    pub fn set_related_sets_filter(&mut self, filter: RelatedSetsFilter) -> &mut Self {
        self.related_sets.filter = Some(filter);
        self
    }

    /// Limits portal rows. Only sent together with a filter.
    pub fn set_related_sets_max(&mut self, max: Max) -> &mut Self {
        self.related_sets.max = Some(max);
        self
    }

    pub fn set_script(&mut self, stage: ScriptStage, script: Script) -> &mut Self {
        self.scripts.set(stage, script);
        self
    }

    pub fn clear_script(&mut self, stage: ScriptStage) -> &mut Self {
        self.scripts.clear(stage);
        self
    }

    /// Returns the verb the next build will use.
    pub fn verb(&self) -> &'static str {
        if self.record.get().is_none() && self.criteria.is_empty() {
            "-findall"
        } else {
            "-find"
        }
    }
}

impl Command for Find<'_> {
    fn client(&self) -> &FmsClient {
        self.base.client
    }

    fn parameters(&self) -> Result<CommandParameters, CommandError> {
        let mut params = self.base.parameters()?;
        self.related_sets.contribute(&mut params)?;
        self.scripts.contribute(&mut params)?;
        self.found_set.contribute(&mut params)?;
        self.record.contribute(&mut params)?;
        self.sort_rules.contribute(&mut params)?;
        self.criteria.contribute_logical_operator(&mut params);
        if let Some(layout) = &self.response_layout {
            params.push("-lay.response", layout.as_str());
        }
        self.criteria.contribute(&mut params)?;
        params.push_verb(self.verb());
        Ok(params)
    }
}

//! `-findquery` compound finds

use super::Command;
use super::Max;
use super::Script;
use super::ScriptStage;
use super::SortOrder;
use super::base::CommandBase;
use super::capability::Capability;
use super::capability::FoundSet;
use super::capability::Scripts;
use super::sort::SortRules;
use crate::FmsClient;
use crate::api::query::Argument;
use crate::api::query::CommandParameters;
use crate::error::CommandError;

/// One find request of a compound find: criteria that must all match, or
/// that omit matching records.
///
/// # Example
///
/// ```
/// use fmxml_lib::api::command::RequestDefinition;
///
/// let cats = RequestDefinition::new()
///     .query("Type", "Cat")
///     .query("Name", "Fluffy");
/// let not_kittens = RequestDefinition::new().query("Age", "<1").omit();
/// assert!(not_kittens.is_omit());
/// assert_eq!(cats.len(), 2);
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RequestDefinition {
    queries: Vec<(String, Argument)>,
    omit: bool,
}

impl RequestDefinition {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a field criterion.
    pub fn query(mut self, field: impl Into<String>, value: impl Into<Argument>) -> Self {
        self.queries.push((field.into(), value.into()));
        self
    }

    /// Omits the records this request matches.
    pub fn omit(mut self) -> Self {
        self.omit = true;
        self
    }

    pub fn is_omit(&self) -> bool {
        self.omit
    }

    pub fn queries(&self) -> &[(String, Argument)] {
        &self.queries
    }

    pub fn len(&self) -> usize {
        self.queries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.queries.is_empty()
    }
}

/// A compound find built from two or more [`RequestDefinition`]s.
///
/// Every query across all definitions gets a sequential id `q1`, `q2`, ...;
/// the `-query` directive groups the ids per definition, with `!` marking
/// omit requests.
///
/// # Example
///
/// ```
/// use fmxml_lib::FmsClient;
/// use fmxml_lib::api::command::{Command, RequestDefinition};
///
/// let client = FmsClient::builder()
///     .url("https://fms.example.com")
///     .guest()
///     .database("vets")
///     .build()
///     .unwrap();
///
/// let mut find = client.find_query("animals");
/// find.add_request_definitions([
///     RequestDefinition::new().query("Type", "Cat").query("Name", "Fluffy"),
///     RequestDefinition::new().query("Age", 1).omit(),
/// ])
/// .unwrap();
///
/// assert_eq!(
///     find.query().unwrap(),
///     "-db=vets&-lay=animals&-q1=Type&-q1.value=Cat&-q2=Name&-q2.value=Fluffy\
///      &-q3=Age&-q3.value=1&-query=(q1,q2);!(q3)&-findquery"
/// );
/// ```
#[derive(Debug, Clone)]
pub struct FindQuery<'a> {
    base: CommandBase<'a>,
    scripts: Scripts,
    sort_rules: SortRules,
    found_set: FoundSet,
    definitions: Vec<RequestDefinition>,
}

impl<'a> FindQuery<'a> {
    pub(crate) fn new(client: &'a FmsClient, layout: impl Into<String>) -> Self {
        Self {
            base: CommandBase::new(client, layout),
            scripts: Scripts::all(),
            sort_rules: SortRules::default(),
            found_set: FoundSet::default(),
            definitions: Vec::new(),
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

    /// Sets the find requests. Can be called once.
    ///
    /// # Errors
    ///
    /// Fails if definitions were already added, if fewer than two are given,
    /// or if one of them has no queries.
    pub fn add_request_definitions(
        &mut self,
        definitions: impl IntoIterator<Item = RequestDefinition>,
    ) -> Result<&mut Self, CommandError> {
        if !self.definitions.is_empty() {
            return Err(CommandError::RequestDefinitionsAlreadyAdded);
        }
        let definitions: Vec<RequestDefinition> = definitions.into_iter().collect();
        if definitions.len() < 2 {
            return Err(CommandError::NotEnoughRequestDefinitions(definitions.len()));
        }
        if definitions.iter().any(RequestDefinition::is_empty) {
            return Err(CommandError::EmptyRequestDefinition);
        }
        self.definitions = definitions;
        Ok(self)
    }

    pub fn request_definitions(&self) -> &[RequestDefinition] {
        &self.definitions
    }

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

    pub fn set_skip(&mut self, skip: u32) -> &mut Self {
        self.found_set.skip = skip;
        self
    }

    pub fn set_max(&mut self, max: Max) -> &mut Self {
        self.found_set.max = Some(max);
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

    fn contribute_queries(&self, params: &mut CommandParameters) {
        let mut next_id = 1;
        let mut groups = Vec::with_capacity(self.definitions.len());

        for definition in &self.definitions {
            let mut ids = Vec::with_capacity(definition.len());
            for (field, value) in &definition.queries {
                params.push(format!("-q{}", next_id), field.as_str());
                params.push(format!("-q{}.value", next_id), value.clone());
                ids.push(format!("q{}", next_id));
                next_id += 1;
            }
            let omit = if definition.omit { "!" } else { "" };
            groups.push(format!("{}({})", omit, ids.join(",")));
        }

        params.push("-query", groups.join(";"));
    }
}

impl Command for FindQuery<'_> {
    fn client(&self) -> &FmsClient {
        self.base.client
    }

    fn parameters(&self) -> Result<CommandParameters, CommandError> {
        if self.definitions.len() < 2 {
            return Err(CommandError::NotEnoughRequestDefinitions(self.definitions.len()));
        }

        let mut params = self.base.parameters()?;
        self.scripts.contribute(&mut params)?;
        self.sort_rules.contribute(&mut params)?;
        self.found_set.contribute(&mut params)?;
        self.contribute_queries(&mut params);
        params.push_verb("-findquery");
        Ok(params)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::command::tests::client;

    fn definitions() -> [RequestDefinition; 2] {
        [
            RequestDefinition::new()
                .query("Title", "Alaska")
                .query("Status", "In"),
            RequestDefinition::new().query("Title", "Ohio").omit(),
        ]
    }

    #[test]
    fn test_ids_run_across_definitions() {
        let client = client();
        let mut find = client.find_query("English");
        find.add_request_definitions(definitions()).unwrap();

        let params = find.parameters().unwrap();
        assert_eq!(params.get("-q1"), Some(&Argument::from("Title")));
        assert_eq!(params.get("-q2.value"), Some(&Argument::from("In")));
        assert_eq!(params.get("-q3.value"), Some(&Argument::from("Ohio")));
        assert_eq!(params.get("-query"), Some(&Argument::from("(q1,q2);!(q3)")));

        let query = find.query().unwrap();
        assert!(query.contains("&-query=(q1,q2);!(q3)&-findquery"));
        assert!(query.ends_with("-findquery"));
    }

    #[test]
    fn test_order_of_directives() {
        let client = client();
        let mut find = client.find_query("English");
        find.add_request_definitions(definitions())
            .unwrap()
            .set_skip(2)
            .set_max(Max::Limit(5))
            .add_sort_rule("Title", 1, Some(SortOrder::Descend))
            .unwrap()
            .set_script(ScriptStage::PreFind, Script::new("prep", Vec::<String>::new()));

        assert_eq!(
            find.query().unwrap(),
            "-db=employees&-lay=English&-script.prefind=prep\
             &-sortfield.1=Title&-sortorder.1=descend&-skip=2&-max=5\
             &-q1=Title&-q1.value=Alaska&-q2=Status&-q2.value=In\
             &-q3=Title&-q3.value=Ohio&-query=(q1,q2);!(q3)&-findquery"
        );
    }

    #[test]
    fn test_definitions_added_once() {
        let client = client();
        let mut find = client.find_query("English");
        find.add_request_definitions(definitions()).unwrap();
        assert_eq!(
            find.add_request_definitions(definitions()).err(),
            Some(CommandError::RequestDefinitionsAlreadyAdded)
        );
    }

    #[test]
    fn test_definition_checks() {
        let client = client();
        let mut find = client.find_query("English");
        assert_eq!(find.query(), Err(CommandError::NotEnoughRequestDefinitions(0)));

        let one = [RequestDefinition::new().query("Title", "Ohio")];
        assert_eq!(
            find.add_request_definitions(one).err(),
            Some(CommandError::NotEnoughRequestDefinitions(1))
        );

        let with_empty = [RequestDefinition::new().query("Title", "Ohio"), RequestDefinition::new()];
        assert_eq!(
            find.add_request_definitions(with_empty).err(),
            Some(CommandError::EmptyRequestDefinition)
        );
    }
}

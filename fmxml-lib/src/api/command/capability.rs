//! Directive groups shared between commands
//!
//! Each command owns the capabilities it supports and asks them, in a fixed
//! order, to contribute their directives.

use std::fmt;

use crate::api::query::Argument;
use crate::api::query::CommandParameters;
use crate::error::CommandError;

/// A group of directives a command can carry.
pub(crate) trait Capability {
    fn contribute(&self, params: &mut CommandParameters) -> Result<(), CommandError>;
}

// =============================================================================
// Row limits
// =============================================================================

/// A row limit: a number, or every row.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Max {
    Limit(u32),
    All,
}

impl fmt::Display for Max {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Max::Limit(n) => write!(f, "{}", n),
            Max::All => f.write_str("all"),
        }
    }
}

impl From<u32> for Max {
    fn from(n: u32) -> Self {
        Max::Limit(n)
    }
}

impl From<Max> for Argument {
    fn from(max: Max) -> Self {
        match max {
            Max::Limit(n) => Argument::from(n),
            Max::All => Argument::from("all"),
        }
    }
}

// =============================================================================
// Record id
// =============================================================================

/// The `-recid` directive.
///
/// A locked target accepts one record id; setting it again fails.
#[derive(Debug, Clone, Default)]
pub(crate) struct RecordTarget {
    record_id: Option<u64>,
    locked: bool,
}

impl RecordTarget {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    /// A target that can be set only once.
    pub(crate) fn once() -> Self {
        Self {
            record_id: None,
            locked: true,
        }
    }

    pub(crate) fn get(&self) -> Option<u64> {
        self.record_id
    }

    pub(crate) fn set(&mut self, record_id: u64) -> Result<(), CommandError> {
        if record_id == 0 {
            return Err(CommandError::InvalidRecordId(record_id));
        }
        if self.locked && self.record_id.is_some() {
            return Err(CommandError::ImmutableField { field: "-recid" });
        }
        self.record_id = Some(record_id);
        Ok(())
    }

    pub(crate) fn clear(&mut self) -> Result<(), CommandError> {
        if self.locked && self.record_id.is_some() {
            return Err(CommandError::ImmutableField { field: "-recid" });
        }
        self.record_id = None;
        Ok(())
    }

    /// Fails with `MissingRecordId` unless a record id is set.
    pub(crate) fn require(&self, verb: &'static str) -> Result<u64, CommandError> {
        self.record_id
            .ok_or(CommandError::MissingRecordId { verb })
    }
}

impl Capability for RecordTarget {
    fn contribute(&self, params: &mut CommandParameters) -> Result<(), CommandError> {
        if let Some(record_id) = self.record_id {
            params.push("-recid", record_id.to_string());
        }
        Ok(())
    }
}

// =============================================================================
// Scripts
// =============================================================================

/// When a script runs relative to the request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScriptStage {
    /// Before the find is performed.
    PreFind,
    /// Before the found set is sorted.
    PreSort,
    /// After the request is processed.
    Main,
}

impl ScriptStage {
    fn directive(&self) -> &'static str {
        match self {
            ScriptStage::PreFind => "-script.prefind",
            ScriptStage::PreSort => "-script.presort",
            ScriptStage::Main => "-script",
        }
    }
}

/// A script name with its parameters, sent joined by `|`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Script {
    name: String,
    params: Vec<String>,
}

impl Script {
    pub fn new<I, S>(name: impl Into<String>, params: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            name: name.into(),
            params: params.into_iter().map(Into::into).collect(),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn params(&self) -> &[String] {
        &self.params
    }

    fn contribute(&self, stage: ScriptStage, params: &mut CommandParameters) {
        let directive = stage.directive();
        params.push(directive, self.name.as_str());
        if !self.params.is_empty() {
            params.push(format!("{}.param", directive), self.params.join("|"));
        }
    }
}

/// Scripts attached to a command, contributed presort, prefind, then main.
#[derive(Debug, Clone, Default)]
pub(crate) struct Scripts {
    stages: &'static [ScriptStage],
    presort: Option<Script>,
    prefind: Option<Script>,
    main: Option<Script>,
}

impl Scripts {
    /// Every stage.
    pub(crate) fn all() -> Self {
        Self {
            stages: &[ScriptStage::PreSort, ScriptStage::PreFind, ScriptStage::Main],
            ..Self::default()
        }
    }

    /// Only the main script.
    pub(crate) fn main_only() -> Self {
        Self {
            stages: &[ScriptStage::Main],
            ..Self::default()
        }
    }

    pub(crate) fn set(&mut self, stage: ScriptStage, script: Script) {
        *self.slot(stage) = Some(script);
    }

    pub(crate) fn clear(&mut self, stage: ScriptStage) {
        *self.slot(stage) = None;
    }

    pub(crate) fn get(&self, stage: ScriptStage) -> Option<&Script> {
        match stage {
            ScriptStage::PreFind => self.prefind.as_ref(),
            ScriptStage::PreSort => self.presort.as_ref(),
            ScriptStage::Main => self.main.as_ref(),
        }
    }

    fn slot(&mut self, stage: ScriptStage) -> &mut Option<Script> {
        match stage {
            ScriptStage::PreFind => &mut self.prefind,
            ScriptStage::PreSort => &mut self.presort,
            ScriptStage::Main => &mut self.main,
        }
    }
}

impl Capability for Scripts {
    fn contribute(&self, params: &mut CommandParameters) -> Result<(), CommandError> {
        for &stage in self.stages {
            if let Some(script) = self.get(stage) {
                script.contribute(stage, params);
            }
        }
        Ok(())
    }
}

// =============================================================================
// Found set window
// =============================================================================

/// The `-skip` and `-max` directives.
#[derive(Debug, Clone, Default)]
pub(crate) struct FoundSet {
    pub(crate) skip: u32,
    pub(crate) max: Option<Max>,
}

impl Capability for FoundSet {
    fn contribute(&self, params: &mut CommandParameters) -> Result<(), CommandError> {
        if self.skip > 0 {
            params.push("-skip", self.skip);
        }
        if let Some(max) = self.max {
            params.push("-max", max);
        }
        Ok(())
    }
}

// =============================================================================
// Related sets
// =============================================================================

/// Which portal rows the server returns.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RelatedSetsFilter {
    /// Only rows visible in the portal on the layout.
    Layout,
    /// Every related row.
    None,
}

impl RelatedSetsFilter {
    pub fn as_str(&self) -> &'static str {
        match self {
            RelatedSetsFilter::Layout => "layout",
            RelatedSetsFilter::None => "none",
        }
    }
}

/// The `-relatedsets.filter` and `-relatedsets.max` directives.
#[derive(Debug, Clone, Default)]
pub(crate) struct RelatedSets {
    pub(crate) filter: Option<RelatedSetsFilter>,
    pub(crate) max: Option<Max>,
}

impl Capability for RelatedSets {
    fn contribute(&self, params: &mut CommandParameters) -> Result<(), CommandError> {
        match (self.filter, self.max) {
            (Some(filter), max) => {
                params.push("-relatedsets.filter", filter.as_str());
                if let Some(max) = max {
                    params.push("-relatedsets.max", max);
                }
                Ok(())
            }
            (None, Some(_)) => Err(CommandError::RelatedSetsMaxWithoutFilter),
            (None, None) => Ok(()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn encode(capability: &dyn Capability) -> Result<String, CommandError> {
        let mut params = CommandParameters::new();
        capability.contribute(&mut params)?;
        params.push_verb("-findall");
        params.encode()
    }

    #[test]
    fn test_record_target_once() {
        let mut target = RecordTarget::once();
        target.set(7).unwrap();
        assert_eq!(
            target.set(8),
            Err(CommandError::ImmutableField { field: "-recid" })
        );
        assert_eq!(target.get(), Some(7));
        assert_eq!(encode(&target).unwrap(), "-recid=7&-findall");
    }

    #[test]
    fn test_record_target_rejects_zero() {
        let mut target = RecordTarget::new();
        assert_eq!(target.set(0), Err(CommandError::InvalidRecordId(0)));
        assert_eq!(
            target.require("-edit"),
            Err(CommandError::MissingRecordId { verb: "-edit" })
        );
        target.set(3).unwrap();
        target.set(4).unwrap();
        assert_eq!(target.require("-edit"), Ok(4));
    }

    #[test]
    fn test_scripts_order_and_params() {
        let mut scripts = Scripts::all();
        scripts.set(ScriptStage::Main, Script::new("after", ["a", "b"]));
        scripts.set(ScriptStage::PreFind, Script::new("myscript", ["payroll"]));
        scripts.set(ScriptStage::PreSort, Script::new("sorter", Vec::<String>::new()));

        assert_eq!(
            encode(&scripts).unwrap(),
            "-script.presort=sorter&-script.prefind=myscript&-script.prefind.param=payroll\
             &-script=after&-script.param=a%7Cb&-findall"
        );
    }

    #[test]
    fn test_found_set() {
        let found_set = FoundSet {
            skip: 0,
            max: Some(Max::All),
        };
        assert_eq!(encode(&found_set).unwrap(), "-max=all&-findall");

        let found_set = FoundSet {
            skip: 5,
            max: Some(Max::Limit(4)),
        };
        assert_eq!(encode(&found_set).unwrap(), "-skip=5&-max=4&-findall");
    }

    #[test]
    fn test_related_sets_max_needs_filter() {
        let related = RelatedSets {
            filter: None,
            max: Some(Max::Limit(3)),
        };
        assert_eq!(encode(&related), Err(CommandError::RelatedSetsMaxWithoutFilter));

        let related = RelatedSets {
            filter: Some(RelatedSetsFilter::Layout),
            max: Some(Max::All),
        };
        assert_eq!(
            encode(&related).unwrap(),
            "-relatedsets.filter=layout&-relatedsets.max=all&-findall"
        );
    }
}

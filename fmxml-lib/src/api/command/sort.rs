//! Sort rules

use std::fmt;

use super::capability::Capability;
use crate::api::query::CommandParameters;
use crate::error::CommandError;

/// Sort direction. Without one the server sorts ascending.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortOrder {
    Ascend,
    Descend,
}

impl fmt::Display for SortOrder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SortOrder::Ascend => f.write_str("ascend"),
            SortOrder::Descend => f.write_str("descend"),
        }
    }
}

/// One sort rule: a field, its precedence and an optional direction.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SortRule {
    field: String,
    precedence: u8,
    order: Option<SortOrder>,
}

impl SortRule {
    pub fn field(&self) -> &str {
        &self.field
    }

    /// Returns the precedence, 1 to 9.
    pub fn precedence(&self) -> u8 {
        self.precedence
    }

    pub fn order(&self) -> Option<SortOrder> {
        self.order
    }
}

/// Up to nine sort rules, at most one per precedence and one per field.
///
/// Rules are kept in insertion order and emitted by ascending precedence.
#[derive(Debug, Clone, Default)]
pub(crate) struct SortRules {
    rules: Vec<SortRule>,
}

impl SortRules {
    /// Adds a rule, replacing any rule at the same precedence or on the same
    /// field.
    pub(crate) fn add(
        &mut self,
        field: impl Into<String>,
        precedence: u8,
        order: Option<SortOrder>,
    ) -> Result<(), CommandError> {
        if !(1..=9).contains(&precedence) {
            return Err(CommandError::InvalidSortPrecedence(precedence));
        }
        let field = field.into();
        self.rules
            .retain(|rule| rule.precedence != precedence && rule.field != field);
        self.rules.push(SortRule {
            field,
            precedence,
            order,
        });
        Ok(())
    }

    pub(crate) fn remove(&mut self, field: &str) {
        self.rules.retain(|rule| rule.field != field);
    }

    pub(crate) fn clear(&mut self) {
        self.rules.clear();
    }

    /// Returns the rules by ascending precedence.
    pub(crate) fn sorted(&self) -> Vec<&SortRule> {
        let mut rules: Vec<&SortRule> = self.rules.iter().collect();
        rules.sort_by_key(|rule| rule.precedence);
        rules
    }
}

impl Capability for SortRules {
    fn contribute(&self, params: &mut CommandParameters) -> Result<(), CommandError> {
        for rule in self.sorted() {
            params.push(format!("-sortfield.{}", rule.precedence), rule.field.as_str());
            if let Some(order) = rule.order {
                params.push(format!("-sortorder.{}", rule.precedence), order.to_string());
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn encode(rules: &SortRules) -> String {
        let mut params = CommandParameters::new();
        rules.contribute(&mut params).unwrap();
        params.push_verb("-findall");
        params.encode().unwrap()
    }

    #[test]
    fn test_emitted_by_precedence() {
        let mut rules = SortRules::default();
        rules.add("rating", 2, Some(SortOrder::Descend)).unwrap();
        rules.add("dept", 1, None).unwrap();
        assert_eq!(
            encode(&rules),
            "-sortfield.1=dept&-sortfield.2=rating&-sortorder.2=descend&-findall"
        );
    }

    #[test]
    fn test_same_precedence_replaces() {
        let mut rules = SortRules::default();
        rules.add("dept", 1, Some(SortOrder::Ascend)).unwrap();
        rules.add("rating", 1, None).unwrap();
        assert_eq!(encode(&rules), "-sortfield.1=rating&-findall");
    }

    #[test]
    fn test_same_field_replaces() {
        let mut rules = SortRules::default();
        rules.add("dept", 1, None).unwrap();
        rules.add("dept", 3, Some(SortOrder::Descend)).unwrap();
        assert_eq!(encode(&rules), "-sortfield.3=dept&-sortorder.3=descend&-findall");
    }

    #[test]
    fn test_invalid_precedence() {
        let mut rules = SortRules::default();
        assert_eq!(
            rules.add("dept", 0, None),
            Err(CommandError::InvalidSortPrecedence(0))
        );
        assert_eq!(
            rules.add("dept", 10, None),
            Err(CommandError::InvalidSortPrecedence(10))
        );
    }

    #[test]
    fn test_remove_and_clear() {
        let mut rules = SortRules::default();
        rules.add("dept", 1, None).unwrap();
        rules.add("rating", 2, None).unwrap();
        rules.remove("dept");
        assert_eq!(encode(&rules), "-sortfield.2=rating&-findall");
        rules.clear();
        assert!(rules.sorted().is_empty());
    }
}

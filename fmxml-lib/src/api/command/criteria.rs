//! Find criteria

use std::fmt;
use std::str::FromStr;

use super::capability::Capability;
use crate::api::query::Argument;
use crate::api::query::CommandParameters;
use crate::error::CommandError;

/// Comparison operator for one find criterion.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FindOperator {
    Equal,
    NotEqual,
    GreaterThan,
    GreaterOrEqual,
    LessThan,
    LessOrEqual,
    Contains,
    BeginsWith,
    EndsWith,
}

impl FindOperator {
    pub fn as_str(&self) -> &'static str {
        match self {
            FindOperator::Equal => "eq",
            FindOperator::NotEqual => "neq",
            FindOperator::GreaterThan => "gt",
            FindOperator::GreaterOrEqual => "gte",
            FindOperator::LessThan => "lt",
            FindOperator::LessOrEqual => "lte",
            FindOperator::Contains => "cn",
            FindOperator::BeginsWith => "bw",
            FindOperator::EndsWith => "ew",
        }
    }
}

impl fmt::Display for FindOperator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for FindOperator {
    type Err = CommandError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "eq" => Ok(FindOperator::Equal),
            "neq" => Ok(FindOperator::NotEqual),
            "gt" => Ok(FindOperator::GreaterThan),
            "gte" => Ok(FindOperator::GreaterOrEqual),
            "lt" => Ok(FindOperator::LessThan),
            "lte" => Ok(FindOperator::LessOrEqual),
            "cn" => Ok(FindOperator::Contains),
            "bw" => Ok(FindOperator::BeginsWith),
            "ew" => Ok(FindOperator::EndsWith),
            other => Err(CommandError::InvalidOperator(other.to_string())),
        }
    }
}

/// How multiple criteria combine.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LogicalOperator {
    #[default]
    And,
    Or,
}

impl fmt::Display for LogicalOperator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LogicalOperator::And => f.write_str("and"),
            LogicalOperator::Or => f.write_str("or"),
        }
    }
}

/// One find criterion.
#[derive(Debug, Clone, PartialEq)]
pub struct Criterion {
    field: String,
    value: Argument,
    operator: Option<FindOperator>,
}

impl Criterion {
    pub fn field(&self) -> &str {
        &self.field
    }

    pub fn value(&self) -> &Argument {
        &self.value
    }

    pub fn operator(&self) -> Option<FindOperator> {
        self.operator
    }
}

/// Ordered find criteria with an optional `-lop`.
#[derive(Debug, Clone, Default)]
pub(crate) struct Criteria {
    pub(crate) criteria: Vec<Criterion>,
    pub(crate) logical_operator: Option<LogicalOperator>,
}

impl Criteria {
    pub(crate) fn add(
        &mut self,
        field: impl Into<String>,
        value: impl Into<Argument>,
        operator: Option<FindOperator>,
    ) {
        self.criteria.push(Criterion {
            field: field.into(),
            value: value.into(),
            operator,
        });
    }

    pub(crate) fn is_empty(&self) -> bool {
        self.criteria.is_empty()
    }

    pub(crate) fn clear(&mut self) {
        self.criteria.clear();
    }

    /// Contributes the `-lop` directive.
    pub(crate) fn contribute_logical_operator(&self, params: &mut CommandParameters) {
        if let Some(operator) = self.logical_operator {
            params.push("-lop", operator.to_string());
        }
    }
}

impl Capability for Criteria {
    fn contribute(&self, params: &mut CommandParameters) -> Result<(), CommandError> {
        for criterion in &self.criteria {
            params.push(criterion.field.as_str(), criterion.value.clone());
            if let Some(operator) = criterion.operator {
                params.push(format!("{}.op", criterion.field), operator.as_str());
            }
        }
        Ok(())
    }
}

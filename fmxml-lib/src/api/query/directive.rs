//! Directive and argument types.

use std::fmt;

use rust_decimal::Decimal;

/// The argument of a directive.
///
/// Numbers are rendered in plain base-10 with no grouping and no exponent.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Argument {
    /// Text, sent as-is after percent-encoding.
    Text(String),
    /// Integer.
    Int(i64),
    /// Fixed-point decimal.
    Decimal(Decimal),
}

impl fmt::Display for Argument {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Argument::Text(s) => f.write_str(s),
            Argument::Int(n) => write!(f, "{}", n),
            Argument::Decimal(d) => write!(f, "{}", d),
        }
    }
}

impl From<String> for Argument {
    fn from(v: String) -> Self {
        Argument::Text(v)
    }
}

impl From<&str> for Argument {
    fn from(v: &str) -> Self {
        Argument::Text(v.to_string())
    }
}

impl From<&String> for Argument {
    fn from(v: &String) -> Self {
        Argument::Text(v.clone())
    }
}

impl From<i32> for Argument {
    fn from(v: i32) -> Self {
        Argument::Int(v.into())
    }
}

impl From<i64> for Argument {
    fn from(v: i64) -> Self {
        Argument::Int(v)
    }
}

impl From<u32> for Argument {
    fn from(v: u32) -> Self {
        Argument::Int(v.into())
    }
}

impl From<Decimal> for Argument {
    fn from(v: Decimal) -> Self {
        Argument::Decimal(v)
    }
}

/// A single query directive: a name and an optional argument.
///
/// A directive without an argument is a verb (`-find`, `-edit`, ...).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Directive {
    name: String,
    argument: Option<Argument>,
}

impl Directive {
    /// Creates a directive with an argument.
    pub fn new(name: impl Into<String>, argument: impl Into<Argument>) -> Self {
        Self {
            name: name.into(),
            argument: Some(argument.into()),
        }
    }

    /// Creates an argument-less verb directive.
    pub fn verb(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            argument: None,
        }
    }

    /// Returns the directive name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Returns the argument, if any.
    pub fn argument(&self) -> Option<&Argument> {
        self.argument.as_ref()
    }

    /// Returns `true` if this directive has no argument.
    pub fn is_verb(&self) -> bool {
        self.argument.is_none()
    }
}

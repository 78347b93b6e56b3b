//! Ordered directive list.

use super::directive::Argument;
use super::directive::Directive;
use super::encode::encode;
use crate::error::CommandError;

/// The ordered, append-only list of directives a command contributes to.
///
/// Each capability of a command pushes its directives in turn; the resulting
/// order is the order of the query string, except for the verb which always
/// goes last.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CommandParameters {
    directives: Vec<Directive>,
}

impl CommandParameters {
    /// Creates an empty list.
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends a directive with an argument.
    pub fn push(&mut self, name: impl Into<String>, argument: impl Into<Argument>) {
        self.directives.push(Directive::new(name, argument));
    }

    /// Appends an argument-less verb.
    pub fn push_verb(&mut self, name: impl Into<String>) {
        self.directives.push(Directive::verb(name));
    }

    /// Returns `true` if a directive with this name is present.
    pub fn contains(&self, name: &str) -> bool {
        self.directives.iter().any(|d| d.name() == name)
    }

    /// Returns the argument of the first directive with this name.
    pub fn get(&self, name: &str) -> Option<&Argument> {
        self.directives
            .iter()
            .find(|d| d.name() == name)
            .and_then(Directive::argument)
    }

    /// Returns the verb names present in the list.
    pub fn verbs(&self) -> Vec<&str> {
        self.directives
            .iter()
            .filter(|d| d.is_verb())
            .map(Directive::name)
            .collect()
    }

    /// Returns the directives in insertion order.
    pub fn as_slice(&self) -> &[Directive] {
        &self.directives
    }

    /// Returns an iterator over the directives.
    pub fn iter(&self) -> std::slice::Iter<'_, Directive> {
        self.directives.iter()
    }

    /// Returns the number of directives.
    pub fn len(&self) -> usize {
        self.directives.len()
    }

    /// Returns `true` if the list is empty.
    pub fn is_empty(&self) -> bool {
        self.directives.is_empty()
    }

    /// Encodes the list as a query string.
    pub fn encode(&self) -> Result<String, CommandError> {
        encode(&self.directives)
    }
}

impl<'a> IntoIterator for &'a CommandParameters {
    type Item = &'a Directive;
    type IntoIter = std::slice::Iter<'a, Directive>;

    fn into_iter(self) -> Self::IntoIter {
        self.directives.iter()
    }
}

impl FromIterator<Directive> for CommandParameters {
    fn from_iter<I: IntoIterator<Item = Directive>>(iter: I) -> Self {
        Self {
            directives: iter.into_iter().collect(),
        }
    }
}

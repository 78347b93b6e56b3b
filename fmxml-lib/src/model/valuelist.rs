//! Named value lists attached to a layout

use std::ops::Index;

use serde::Serialize;

use crate::parse::ValuelistElement;

/// Which column of a two-field value list users see.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum DisplayMode {
    /// Only the underlying values are shown.
    First,
    /// Both values, as `"{text} {display}"`.
    Both,
    /// Only the second field's values.
    Second,
}

/// One entry of a value list.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ValuelistEntry {
    /// Text shown to users.
    pub display: String,
    /// Stored text.
    pub text: String,
}

/// An ordered, read-only list of allowed values.
///
/// The server does not say how a list is displayed, so [`DisplayMode`] is
/// inferred from the entries: `First` if every display equals its text,
/// `Both` if every display starts with its text and a space, otherwise
/// `Second`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Valuelist {
    name: String,
    display_mode: DisplayMode,
    entries: Vec<ValuelistEntry>,
}

impl Valuelist {
    /// Creates a value list and infers its display mode.
    pub fn new(name: impl Into<String>, entries: Vec<ValuelistEntry>) -> Self {
        let display_mode = if entries.iter().all(|e| e.display == e.text) {
            DisplayMode::First
        } else if entries
            .iter()
            .all(|e| e.display.starts_with(&format!("{} ", e.text)))
        {
            DisplayMode::Both
        } else {
            DisplayMode::Second
        };

        Self {
            name: name.into(),
            display_mode,
            entries,
        }
    }

    pub(crate) fn from_element(element: &ValuelistElement) -> Self {
        let entries = element
            .values
            .iter()
            .map(|v| ValuelistEntry {
                display: v.display.clone(),
                text: v.text.clone(),
            })
            .collect();
        Self::new(element.name.clone(), entries)
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn display_mode(&self) -> DisplayMode {
        self.display_mode
    }

    pub fn get(&self, index: usize) -> Option<&ValuelistEntry> {
        self.entries.get(index)
    }

    pub fn iter(&self) -> std::slice::Iter<'_, ValuelistEntry> {
        self.entries.iter()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl Index<usize> for Valuelist {
    type Output = ValuelistEntry;

    fn index(&self, index: usize) -> &Self::Output {
        &self.entries[index]
    }
}

impl<'a> IntoIterator for &'a Valuelist {
    type Item = &'a ValuelistEntry;
    type IntoIter = std::slice::Iter<'a, ValuelistEntry>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn entry(display: &str, text: &str) -> ValuelistEntry {
        ValuelistEntry {
            display: display.to_string(),
            text: text.to_string(),
        }
    }

    #[test]
    fn test_display_first() {
        let list = Valuelist::new("Colors", vec![entry("Red", "Red"), entry("Blue", "Blue")]);
        assert_eq!(list.display_mode(), DisplayMode::First);
        assert_eq!(list.len(), 2);
        assert_eq!(list[1].text, "Blue");
    }

    #[test]
    fn test_display_both() {
        let list = Valuelist::new("Staff", vec![entry("1 Ann", "1"), entry("2 Bob", "2")]);
        assert_eq!(list.display_mode(), DisplayMode::Both);
    }

    #[test]
    fn test_display_second() {
        let list = Valuelist::new("Staff", vec![entry("Ann", "1"), entry("2 Bob", "2")]);
        assert_eq!(list.display_mode(), DisplayMode::Second);
    }

    #[test]
    fn test_empty_list() {
        let list = Valuelist::new("Nothing", Vec::new());
        assert!(list.is_empty());
        assert_eq!(list.display_mode(), DisplayMode::First);
        assert!(list.get(0).is_none());
    }
}

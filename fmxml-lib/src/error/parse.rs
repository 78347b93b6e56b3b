//! XML parse errors

/// Errors raised by the response parsers.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ParseError {
    /// The document is not well-formed XML.
    #[error("XML error: {0}")]
    Xml(String),

    /// The document is not valid UTF-8.
    #[error("Response is not valid UTF-8")]
    Utf8,

    /// An element tag that the grammar does not define.
    #[error("Unknown element <{tag}> in {grammar} grammar")]
    UnknownElement {
        /// Grammar being parsed.
        grammar: &'static str,
        /// The offending tag, namespace prefix removed.
        tag: String,
    },

    /// A known element in a place where it cannot appear.
    #[error("Element <{tag}> outside of <{context}>")]
    UnexpectedElement {
        /// The offending tag.
        tag: String,
        /// The element it must be nested in.
        context: &'static str,
    },

    /// A required attribute was absent.
    #[error("Element <{element}> is missing attribute '{attribute}'")]
    MissingAttribute {
        /// Element name.
        element: &'static str,
        /// Attribute name.
        attribute: &'static str,
    },

    /// A numeric attribute did not hold a number.
    #[error("Invalid {what}: {value:?}")]
    InvalidNumber {
        /// What the number describes.
        what: &'static str,
        /// The raw text.
        value: String,
    },

    /// A required element never appeared.
    #[error("Missing <{0}> element")]
    MissingElement(&'static str),

    /// The document ended before its root element closed.
    #[error("Document ended before </{0}>")]
    Truncated(&'static str),
}

impl ParseError {
    /// Creates an XML error from any displayable error.
    pub fn xml(err: impl std::fmt::Display) -> Self {
        Self::Xml(err.to_string())
    }

    /// Creates an invalid number error.
    pub fn invalid_number(what: &'static str, value: impl Into<String>) -> Self {
        Self::InvalidNumber {
            what,
            value: value.into(),
        }
    }
}

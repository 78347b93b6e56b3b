//! Pull-event stream shared by the grammar parsers.
//!
//! Wraps a `quick_xml` reader so each grammar sees a flat sequence of start,
//! end and text events with namespace prefixes already stripped. Self-closing
//! elements are reported as a start immediately followed by an end.

use std::str;
use std::str::FromStr;

use quick_xml::Reader;
use quick_xml::events::BytesStart;
use quick_xml::events::Event;

use crate::error::ParseError;

/// One step of the event stream.
#[derive(Debug)]
pub(crate) enum XmlEvent {
    Start { tag: String, attributes: Attributes },
    End { tag: String },
    Text(String),
    Eof,
}

pub(crate) struct EventStream<'a> {
    reader: Reader<&'a [u8]>,
    pending_end: Option<String>,
}

impl<'a> EventStream<'a> {
    pub(crate) fn new(xml: &'a [u8]) -> Result<Self, ParseError> {
        let text = str::from_utf8(xml).map_err(|_| ParseError::Utf8)?;
        Ok(Self {
            reader: Reader::from_str(text),
            pending_end: None,
        })
    }

    pub(crate) fn next_event(&mut self) -> Result<XmlEvent, ParseError> {
        if let Some(tag) = self.pending_end.take() {
            return Ok(XmlEvent::End { tag });
        }

        loop {
            match self.reader.read_event().map_err(ParseError::xml)? {
                Event::Start(e) => {
                    return Ok(XmlEvent::Start {
                        tag: local_name(&e)?,
                        attributes: Attributes::from_start(&e)?,
                    });
                }
                Event::Empty(e) => {
                    let tag = local_name(&e)?;
                    self.pending_end = Some(tag.clone());
                    return Ok(XmlEvent::Start {
                        tag,
                        attributes: Attributes::from_start(&e)?,
                    });
                }
                Event::End(e) => {
                    return Ok(XmlEvent::End {
                        tag: utf8(e.local_name().as_ref())?,
                    });
                }
                Event::Text(e) => {
                    let text = e.unescape().map_err(ParseError::xml)?;
                    return Ok(XmlEvent::Text(text.into_owned()));
                }
                Event::CData(e) => return Ok(XmlEvent::Text(utf8(&e)?)),
                Event::Eof => return Ok(XmlEvent::Eof),
                // declarations, comments, processing instructions, doctype
                _ => {}
            }
        }
    }
}

fn local_name(e: &BytesStart<'_>) -> Result<String, ParseError> {
    utf8(e.local_name().as_ref())
}

fn utf8(bytes: &[u8]) -> Result<String, ParseError> {
    str::from_utf8(bytes)
        .map(str::to_string)
        .map_err(|_| ParseError::Utf8)
}

/// Parses a number, reporting `what` on failure.
pub(crate) fn parse_number<T: FromStr>(what: &'static str, value: &str) -> Result<T, ParseError> {
    value
        .trim()
        .parse()
        .map_err(|_| ParseError::invalid_number(what, value))
}

/// Attributes of one start tag, keyed by local name.
#[derive(Debug, Default)]
pub(crate) struct Attributes {
    pairs: Vec<(String, String)>,
}

impl Attributes {
    fn from_start(e: &BytesStart<'_>) -> Result<Self, ParseError> {
        let mut pairs = Vec::new();
        for attr in e.attributes() {
            let attr = attr.map_err(ParseError::xml)?;
            let key = utf8(attr.key.local_name().as_ref())?;
            let value = attr.unescape_value().map_err(ParseError::xml)?;
            pairs.push((key, value.into_owned()));
        }
        Ok(Self { pairs })
    }

    pub(crate) fn get(&self, name: &str) -> Option<&str> {
        self.pairs
            .iter()
            .find(|(key, _)| key == name)
            .map(|(_, value)| value.as_str())
    }

    /// Returns the value, or an empty string when absent.
    pub(crate) fn text(&self, name: &str) -> String {
        self.get(name).unwrap_or_default().to_string()
    }

    /// Returns the value when present and non-empty.
    pub(crate) fn optional(&self, name: &str) -> Option<String> {
        self.get(name)
            .filter(|value| !value.is_empty())
            .map(str::to_string)
    }

    pub(crate) fn require(
        &self,
        element: &'static str,
        name: &'static str,
    ) -> Result<String, ParseError> {
        self.get(name)
            .map(str::to_string)
            .ok_or(ParseError::MissingAttribute {
                element,
                attribute: name,
            })
    }

    /// `yes`/`no` flags; anything but `yes` is false.
    pub(crate) fn flag(&self, name: &str) -> bool {
        self.get(name) == Some("yes")
    }

    /// Parses a numeric attribute, treating an absent or empty value as zero.
    pub(crate) fn number<T: FromStr + Default>(&self, name: &'static str) -> Result<T, ParseError> {
        match self.get(name) {
            Some(value) if !value.trim().is_empty() => parse_number(name, value),
            _ => Ok(T::default()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn collect(xml: &str) -> Vec<String> {
        let mut stream = EventStream::new(xml.as_bytes()).unwrap();
        let mut out = Vec::new();
        loop {
            match stream.next_event().unwrap() {
                XmlEvent::Start { tag, .. } => out.push(format!("+{}", tag)),
                XmlEvent::End { tag } => out.push(format!("-{}", tag)),
                XmlEvent::Text(text) if text.trim().is_empty() => {}
                XmlEvent::Text(text) => out.push(text),
                XmlEvent::Eof => return out,
            }
        }
    }

    #[test]
    fn test_empty_element_expands() {
        assert_eq!(collect(r#"<a><b x="1"/></a>"#), ["+a", "+b", "-b", "-a"]);
    }

    #[test]
    fn test_namespace_prefix_stripped() {
        let events = collect(r#"<fm:a xmlns:fm="urn:x"><fm:b>hi &amp; bye</fm:b></fm:a>"#);
        assert_eq!(events, ["+a", "+b", "hi & bye", "-b", "-a"]);
    }

    #[test]
    fn test_attributes() {
        let mut stream = EventStream::new(br#"<e count="12" flag="yes" empty=""/>"#).unwrap();
        let XmlEvent::Start { attributes, .. } = stream.next_event().unwrap() else {
            panic!("expected start");
        };
        assert_eq!(attributes.number::<u64>("count").unwrap(), 12);
        assert_eq!(attributes.number::<u64>("missing").unwrap(), 0);
        assert!(attributes.flag("flag"));
        assert!(!attributes.flag("empty"));
        assert_eq!(attributes.optional("empty"), None);
        assert!(attributes.require("e", "missing").is_err());
    }

    #[test]
    fn test_bad_number() {
        let err = parse_number::<u64>("count", "many").unwrap_err();
        assert_eq!(err, ParseError::invalid_number("count", "many"));
    }

    #[test]
    fn test_invalid_utf8() {
        assert!(matches!(
            EventStream::new(&[0x3c, 0xff, 0xfe]),
            Err(ParseError::Utf8)
        ));
    }
}

//! `FMPXMLLAYOUT` grammar: per-field control styles and value lists.

use super::Product;
use super::events::Attributes;
use super::events::EventStream;
use super::events::XmlEvent;
use super::events::parse_number;
use crate::error::ParseError;

const GRAMMAR: &str = "FMPXMLLAYOUT";

/// A parsed `FMPXMLLAYOUT` document.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LayoutInfoDocument {
    pub error_code: u32,
    pub product: Option<Product>,
    pub layout: Option<LayoutElement>,
    pub valuelists: Vec<ValuelistElement>,
}

impl LayoutInfoDocument {
    /// Iterates over `(field name, value list name)` bindings.
    pub fn valuelist_bindings(&self) -> impl Iterator<Item = (&str, &str)> {
        self.layout
            .iter()
            .flat_map(|layout| layout.fields.iter())
            .filter_map(|field| {
                let valuelist = field.style.as_ref()?.valuelist.as_deref()?;
                Some((field.name.as_str(), valuelist))
            })
    }
}

/// The `<LAYOUT>` element.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LayoutElement {
    pub database: String,
    pub name: String,
    pub fields: Vec<LayoutFieldElement>,
}

/// A `<FIELD>` on the layout.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LayoutFieldElement {
    pub name: String,
    pub style: Option<StyleElement>,
}

/// A field's `<STYLE>`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StyleElement {
    /// `POPUPLIST`, `POPUPMENU`, `CHECKBOX`, `RADIOBUTTONS`, `SCROLLTEXT`,
    /// `SELECTIONLIST`, `EDITTEXT` or `CALENDAR`.
    pub control: String,
    pub valuelist: Option<String>,
}

/// A named `<VALUELIST>`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ValuelistElement {
    pub name: String,
    pub values: Vec<ValueElement>,
}

/// A `<VALUE>`: underlying text plus the text shown to users.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ValueElement {
    pub display: String,
    pub text: String,
}

/// Parses an `FMPXMLLAYOUT` document.
///
/// # Errors
///
/// Fails on malformed XML, unknown elements and misplaced elements.
pub fn parse_layout_info(xml: &[u8]) -> Result<LayoutInfoDocument, ParseError> {
    let mut events = EventStream::new(xml)?;
    let mut document: Option<LayoutInfoDocument> = None;
    let mut text: Option<String> = None;

    loop {
        match events.next_event()? {
            XmlEvent::Start { tag, attributes } => {
                if tag == GRAMMAR {
                    document = Some(LayoutInfoDocument::default());
                    continue;
                }
                let doc = document
                    .as_mut()
                    .ok_or_else(|| unexpected(&tag, GRAMMAR))?;
                start(doc, &tag, &attributes)?;
                if tag == "ERRORCODE" || tag == "VALUE" {
                    text = Some(String::new());
                }
            }
            XmlEvent::End { tag } => match tag.as_str() {
                "FMPXMLLAYOUT" => {
                    return document.ok_or(ParseError::MissingElement(GRAMMAR));
                }
                "ERRORCODE" => {
                    let code = text.take().unwrap_or_default();
                    if let Some(doc) = document.as_mut() {
                        doc.error_code = parse_number("ERRORCODE", &code)?;
                    }
                }
                "VALUE" => {
                    let value = text.take().unwrap_or_default();
                    if let Some(entry) = document
                        .as_mut()
                        .and_then(|doc| doc.valuelists.last_mut())
                        .and_then(|list| list.values.last_mut())
                    {
                        entry.text = value;
                    }
                }
                _ => {}
            },
            XmlEvent::Text(chunk) => {
                if let Some(buffer) = text.as_mut() {
                    buffer.push_str(&chunk);
                }
            }
            XmlEvent::Eof => return Err(ParseError::Truncated(GRAMMAR)),
        }
    }
}

fn start(doc: &mut LayoutInfoDocument, tag: &str, attributes: &Attributes) -> Result<(), ParseError> {
    match tag {
        "ERRORCODE" | "VALUELISTS" => {}
        "PRODUCT" => doc.product = Some(Product::from_attributes(attributes, true)),
        "LAYOUT" => {
            doc.layout = Some(LayoutElement {
                database: attributes.text("DATABASE"),
                name: attributes.text("NAME"),
                fields: Vec::new(),
            });
        }
        "FIELD" => {
            let field = LayoutFieldElement {
                name: attributes.require("FIELD", "NAME")?,
                style: None,
            };
            doc.layout
                .as_mut()
                .ok_or_else(|| unexpected(tag, "LAYOUT"))?
                .fields
                .push(field);
        }
        "STYLE" => {
            let field = doc
                .layout
                .as_mut()
                .and_then(|layout| layout.fields.last_mut())
                .ok_or_else(|| unexpected(tag, "FIELD"))?;
            field.style = Some(StyleElement {
                control: attributes.text("TYPE"),
                valuelist: attributes.optional("VALUELIST"),
            });
        }
        "VALUELIST" => doc.valuelists.push(ValuelistElement {
            name: attributes.require("VALUELIST", "NAME")?,
            values: Vec::new(),
        }),
        "VALUE" => {
            doc.valuelists
                .last_mut()
                .ok_or_else(|| unexpected(tag, "VALUELIST"))?
                .values
                .push(ValueElement {
                    display: attributes.text("DISPLAY"),
                    text: String::new(),
                });
        }
        _ => {
            return Err(ParseError::UnknownElement {
                grammar: GRAMMAR,
                tag: tag.to_string(),
            });
        }
    }
    Ok(())
}

fn unexpected(tag: &str, context: &'static str) -> ParseError {
    ParseError::UnexpectedElement {
        tag: tag.to_string(),
        context,
    }
}

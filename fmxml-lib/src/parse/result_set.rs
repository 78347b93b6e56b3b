//! `fmresultset` grammar.
//!
//! The primary record grammar. Records carry repeating field data and may
//! nest one level of related-set (portal) records.

use super::Product;
use super::events::Attributes;
use super::events::EventStream;
use super::events::XmlEvent;
use crate::error::ParseError;

const GRAMMAR: &str = "fmresultset";

/// A parsed `fmresultset` document.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ResultSetDocument {
    /// Server error code; 0 is success.
    pub error_code: u32,
    pub product: Option<Product>,
    pub datasource: Option<DataSource>,
    /// Field definitions of the layout itself.
    pub field_definitions: Vec<FieldDefinitionElement>,
    /// Field definitions of each portal, in document order.
    pub relatedset_definitions: Vec<RelatedSetDefinition>,
    pub resultset: Option<ResultSet>,
}

/// The `<datasource>` summary.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DataSource {
    pub database: String,
    pub layout: String,
    pub table: String,
    pub date_format: String,
    pub time_format: String,
    pub timestamp_format: String,
    /// Rows in the table, not the found set.
    pub total_count: u64,
}

/// A `<field-definition>` element, attributes kept as the server sent them.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FieldDefinitionElement {
    pub name: String,
    /// `normal`, `calculation`, `summary` or `unknown`.
    pub field_type: String,
    /// `text`, `number`, `date`, `time`, `timestamp`, `container` or `unknown`.
    pub result: String,
    pub auto_enter: bool,
    pub four_digit_year: bool,
    pub global: bool,
    pub not_empty: bool,
    pub numeric_only: bool,
    pub time_of_day: bool,
    pub max_repeat: u32,
    pub max_characters: Option<u32>,
}

/// A `<relatedset-definition>`: the fields of one portal.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RelatedSetDefinition {
    pub table: String,
    pub field_definitions: Vec<FieldDefinitionElement>,
}

/// The `<resultset>` element.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ResultSet {
    /// Rows matching the request.
    pub count: u64,
    /// Rows actually returned.
    pub fetch_size: u64,
    pub records: Vec<RecordElement>,
}

/// A `<record>`, either top-level or inside a related set.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RecordElement {
    pub record_id: u64,
    pub mod_id: u64,
    /// Field occurrences in document order; names may repeat.
    pub fields: Vec<FieldElement>,
    pub related_sets: Vec<RelatedSetElement>,
}

/// A `<field>` occurrence with one entry per `<data>` child.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FieldElement {
    pub name: String,
    /// Repetition values; `None` for an empty `<data/>`.
    pub data: Vec<Option<String>>,
}

/// A `<relatedset>` holding portal rows of one table.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RelatedSetElement {
    pub table: String,
    pub count: u64,
    pub records: Vec<RecordElement>,
}

/// Parses an `fmresultset` document.
///
/// # Errors
///
/// Fails on malformed XML, on any element the grammar does not define, and
/// on elements nested where they cannot appear.
pub fn parse_result_set(xml: &[u8]) -> Result<ResultSetDocument, ParseError> {
    let mut events = EventStream::new(xml)?;
    let mut state = ResultSetParser::default();

    loop {
        match events.next_event()? {
            XmlEvent::Start { tag, attributes } => state.start(tag, &attributes)?,
            XmlEvent::End { tag } => {
                if let Some(document) = state.end(&tag)? {
                    return Ok(document);
                }
            }
            XmlEvent::Text(text) => {
                if let Some(buffer) = state.data.as_mut() {
                    buffer.push_str(&text);
                }
            }
            XmlEvent::Eof => return Err(ParseError::Truncated(GRAMMAR)),
        }
    }
}

#[derive(Default)]
struct ResultSetParser {
    document: Option<ResultSetDocument>,
    definition: Option<RelatedSetDefinition>,
    // top-level record, then the portal record being read
    records: Vec<RecordElement>,
    related_set: Option<RelatedSetElement>,
    data: Option<String>,
}

impl ResultSetParser {
    fn document(&mut self, tag: &str) -> Result<&mut ResultSetDocument, ParseError> {
        self.document
            .as_mut()
            .ok_or_else(|| unexpected(tag, GRAMMAR))
    }

    fn record(&mut self, tag: &str) -> Result<&mut RecordElement, ParseError> {
        self.records.last_mut().ok_or_else(|| unexpected(tag, "record"))
    }

    fn start(&mut self, tag: String, attributes: &Attributes) -> Result<(), ParseError> {
        match tag.as_str() {
            "fmresultset" => {
                if self.document.is_some() {
                    return Err(unexpected(&tag, "document"));
                }
                self.document = Some(ResultSetDocument::default());
            }
            "error" => {
                self.document(&tag)?.error_code = attributes.number("code")?;
            }
            "product" => {
                self.document(&tag)?.product = Some(Product::from_attributes(attributes, false));
            }
            "datasource" => {
                self.document(&tag)?.datasource = Some(DataSource {
                    database: attributes.text("database"),
                    layout: attributes.text("layout"),
                    table: attributes.text("table"),
                    date_format: attributes.text("date-format"),
                    time_format: attributes.text("time-format"),
                    timestamp_format: attributes.text("timestamp-format"),
                    total_count: attributes.number("total-count")?,
                });
            }
            "metadata" => {
                self.document(&tag)?;
            }
            "relatedset-definition" => {
                self.document(&tag)?;
                self.definition = Some(RelatedSetDefinition {
                    table: attributes.require("relatedset-definition", "table")?,
                    field_definitions: Vec::new(),
                });
            }
            "field-definition" => {
                let definition = field_definition(attributes)?;
                match self.definition.as_mut() {
                    Some(related) => related.field_definitions.push(definition),
                    None => self.document(&tag)?.field_definitions.push(definition),
                }
            }
            "resultset" => {
                self.document(&tag)?.resultset = Some(ResultSet {
                    count: attributes.number("count")?,
                    fetch_size: attributes.number("fetch-size")?,
                    records: Vec::new(),
                });
            }
            "record" => {
                let nested = match (self.records.len(), &self.related_set) {
                    (0, _) => false,
                    (1, Some(_)) => true,
                    _ => return Err(unexpected(&tag, "relatedset")),
                };
                if !nested && self.document(&tag)?.resultset.is_none() {
                    return Err(unexpected(&tag, "resultset"));
                }
                self.records.push(RecordElement {
                    record_id: attributes.number("record-id")?,
                    mod_id: attributes.number("mod-id")?,
                    fields: Vec::new(),
                    related_sets: Vec::new(),
                });
            }
            "relatedset" => {
                if self.records.len() != 1 || self.related_set.is_some() {
                    return Err(unexpected(&tag, "record"));
                }
                self.related_set = Some(RelatedSetElement {
                    table: attributes.require("relatedset", "table")?,
                    count: attributes.number("count")?,
                    records: Vec::new(),
                });
            }
            "field" => {
                let name = attributes.require("field", "name")?;
                self.record(&tag)?.fields.push(FieldElement {
                    name,
                    data: Vec::new(),
                });
            }
            "data" => {
                if self.record(&tag)?.fields.is_empty() {
                    return Err(unexpected(&tag, "field"));
                }
                self.data = Some(String::new());
            }
            _ => {
                return Err(ParseError::UnknownElement {
                    grammar: GRAMMAR,
                    tag,
                });
            }
        }
        Ok(())
    }

    fn end(&mut self, tag: &str) -> Result<Option<ResultSetDocument>, ParseError> {
        match tag {
            "fmresultset" => return Ok(self.document.take()),
            "relatedset-definition" => {
                if let Some(definition) = self.definition.take() {
                    self.document(tag)?.relatedset_definitions.push(definition);
                }
            }
            "data" => {
                let text = self.data.take().filter(|text| !text.is_empty());
                if let Some(field) = self.record(tag)?.fields.last_mut() {
                    field.data.push(text);
                }
            }
            "record" => {
                let record = self.records.pop().ok_or_else(|| unexpected(tag, "resultset"))?;
                match self.related_set.as_mut() {
                    Some(related) if !self.records.is_empty() => related.records.push(record),
                    _ => {
                        if let Some(resultset) = self.document(tag)?.resultset.as_mut() {
                            resultset.records.push(record);
                        }
                    }
                }
            }
            "relatedset" => {
                if let Some(related) = self.related_set.take() {
                    self.record(tag)?.related_sets.push(related);
                }
            }
            _ => {}
        }
        Ok(None)
    }
}

fn field_definition(attributes: &Attributes) -> Result<FieldDefinitionElement, ParseError> {
    Ok(FieldDefinitionElement {
        name: attributes.require("field-definition", "name")?,
        field_type: attributes.text("type"),
        result: attributes.text("result"),
        auto_enter: attributes.flag("auto-enter"),
        four_digit_year: attributes.flag("four-digit-year"),
        global: attributes.flag("global"),
        not_empty: attributes.flag("not-empty"),
        numeric_only: attributes.flag("numeric-only"),
        time_of_day: attributes.flag("time-of-day"),
        max_repeat: attributes.number("max-repeat")?,
        max_characters: match attributes.get("max-characters") {
            Some(_) => Some(attributes.number("max-characters")?),
            None => None,
        },
    })
}

fn unexpected(tag: &str, context: &'static str) -> ParseError {
    ParseError::UnexpectedElement {
        tag: tag.to_string(),
        context,
    }
}

//! `FMPXMLRESULT` grammar.
//!
//! A flat row/column rendition of a found set: no portals, and columns are
//! positional, named only by the `<METADATA>` list.

use super::Product;
use super::events::Attributes;
use super::events::EventStream;
use super::events::XmlEvent;
use super::events::parse_number;
use crate::error::ParseError;

const GRAMMAR: &str = "FMPXMLRESULT";

/// A parsed `FMPXMLRESULT` document.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct XmlResultDocument {
    pub error_code: u32,
    pub product: Option<Product>,
    pub database: Option<DatabaseElement>,
    /// Column definitions in column order.
    pub fields: Vec<ColumnDefinition>,
    pub resultset: Option<RowSet>,
}

impl XmlResultDocument {
    /// Returns the column names in order.
    pub fn field_names(&self) -> Vec<&str> {
        self.fields.iter().map(|f| f.name.as_str()).collect()
    }

    /// Returns the rows, or an empty slice if there is no result set.
    pub fn rows(&self) -> &[RowElement] {
        self.resultset
            .as_ref()
            .map(|set| set.rows.as_slice())
            .unwrap_or_default()
    }
}

/// The `<DATABASE>` summary.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DatabaseElement {
    pub name: String,
    pub layout: String,
    pub records: u64,
    pub date_format: String,
    pub time_format: String,
}

/// A `<FIELD>` inside `<METADATA>`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ColumnDefinition {
    pub name: String,
    /// `TEXT`, `NUMBER`, `DATE`, `TIME`, `TIMESTAMP` or `CONTAINER`.
    pub field_type: String,
    pub empty_ok: bool,
    pub max_repeat: u32,
}

/// The `<RESULTSET>` element.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RowSet {
    pub found: u64,
    pub rows: Vec<RowElement>,
}

/// A `<ROW>`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RowElement {
    pub mod_id: u64,
    pub record_id: u64,
    pub cols: Vec<ColElement>,
}

/// A `<COL>`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ColElement {
    /// One entry per `<DATA>`; more than one only for repeating fields.
    pub data: Vec<Option<String>>,
}

impl ColElement {
    /// Returns the first value of the column.
    pub fn value(&self) -> Option<&str> {
        self.data.first().and_then(|v| v.as_deref())
    }
}

/// Parses an `FMPXMLRESULT` document.
///
/// # Errors
///
/// Fails on malformed XML, unknown elements and misplaced elements.
pub fn parse_xml_result(xml: &[u8]) -> Result<XmlResultDocument, ParseError> {
    let mut events = EventStream::new(xml)?;
    let mut document: Option<XmlResultDocument> = None;
    let mut text: Option<String> = None;

    loop {
        match events.next_event()? {
            XmlEvent::Start { tag, attributes } => {
                if tag == GRAMMAR {
                    document = Some(XmlResultDocument::default());
                    continue;
                }
                let doc = document
                    .as_mut()
                    .ok_or_else(|| unexpected(&tag, GRAMMAR))?;
                start(doc, &tag, &attributes)?;
                if tag == "ERRORCODE" || tag == "DATA" {
                    text = Some(String::new());
                }
            }
            XmlEvent::End { tag } => match tag.as_str() {
                "FMPXMLRESULT" => {
                    return document.ok_or(ParseError::MissingElement(GRAMMAR));
                }
                "ERRORCODE" => {
                    let code = text.take().unwrap_or_default();
                    if let Some(doc) = document.as_mut() {
                        doc.error_code = parse_number("ERRORCODE", &code)?;
                    }
                }
                "DATA" => {
                    let value = text.take().filter(|t| !t.is_empty());
                    if let Some(col) = document.as_mut().and_then(last_col) {
                        col.data.push(value);
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

fn start(doc: &mut XmlResultDocument, tag: &str, attributes: &Attributes) -> Result<(), ParseError> {
    match tag {
        "ERRORCODE" | "METADATA" => {}
        "PRODUCT" => doc.product = Some(Product::from_attributes(attributes, true)),
        "DATABASE" => {
            doc.database = Some(DatabaseElement {
                name: attributes.text("NAME"),
                layout: attributes.text("LAYOUT"),
                records: attributes.number("RECORDS")?,
                date_format: attributes.text("DATEFORMAT"),
                time_format: attributes.text("TIMEFORMAT"),
            });
        }
        "FIELD" => doc.fields.push(ColumnDefinition {
            name: attributes.require("FIELD", "NAME")?,
            field_type: attributes.text("TYPE"),
            empty_ok: attributes.get("EMPTYOK") != Some("NO"),
            max_repeat: attributes.number("MAXREPEAT")?,
        }),
        "RESULTSET" => {
            doc.resultset = Some(RowSet {
                found: attributes.number("FOUND")?,
                rows: Vec::new(),
            });
        }
        "ROW" => {
            let row = RowElement {
                mod_id: attributes.number("MODID")?,
                record_id: attributes.number("RECORDID")?,
                cols: Vec::new(),
            };
            doc.resultset
                .as_mut()
                .ok_or_else(|| unexpected(tag, "RESULTSET"))?
                .rows
                .push(row);
        }
        "COL" => {
            doc.resultset
                .as_mut()
                .and_then(|set| set.rows.last_mut())
                .ok_or_else(|| unexpected(tag, "ROW"))?
                .cols
                .push(ColElement::default());
        }
        "DATA" => {
            if last_col(doc).is_none() {
                return Err(unexpected(tag, "COL"));
            }
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

fn last_col(doc: &mut XmlResultDocument) -> Option<&mut ColElement> {
    doc.resultset
        .as_mut()
        .and_then(|set| set.rows.last_mut())
        .and_then(|row| row.cols.last_mut())
}

fn unexpected(tag: &str, context: &'static str) -> ParseError {
    ParseError::UnexpectedElement {
        tag: tag.to_string(),
        context,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const ART: &str = r#"<?xml version="1.0" encoding="UTF-8" ?>
<FMPXMLRESULT xmlns="http://www.filemaker.com/fmpxmlresult">
  <ERRORCODE>0</ERRORCODE>
  <PRODUCT BUILD="03/21/2016" NAME="FileMaker Web Publishing Engine" VERSION="15.0.1.137"/>
  <DATABASE DATEFORMAT="MM/dd/yyyy" LAYOUT="web" NAME="art" RECORDS="12" TIMEFORMAT="HH:mm:ss"/>
  <METADATA>
    <FIELD EMPTYOK="YES" MAXREPEAT="1" NAME="Title" TYPE="TEXT"/>
    <FIELD EMPTYOK="NO" MAXREPEAT="1" NAME="Artist" TYPE="TEXT"/>
  </METADATA>
  <RESULTSET FOUND="2">
    <ROW MODID="6" RECORDID="14">
      <COL><DATA>Spring in Giverny 3</DATA></COL>
      <COL><DATA>Claude Monet</DATA></COL>
    </ROW>
    <ROW MODID="0" RECORDID="15">
      <COL><DATA/></COL>
      <COL><DATA>Unknown</DATA></COL>
    </ROW>
  </RESULTSET>
</FMPXMLRESULT>"#;

    #[test]
    fn test_parse() {
        let doc = parse_xml_result(ART.as_bytes()).unwrap();
        assert_eq!(doc.error_code, 0);
        assert_eq!(doc.product.as_ref().unwrap().name, "FileMaker Web Publishing Engine");

        let database = doc.database.as_ref().unwrap();
        assert_eq!((database.name.as_str(), database.records), ("art", 12));
        assert_eq!(doc.field_names(), ["Title", "Artist"]);
        assert!(doc.fields[0].empty_ok);
        assert!(!doc.fields[1].empty_ok);

        assert_eq!(doc.resultset.as_ref().unwrap().found, 2);
        let rows = doc.rows();
        assert_eq!((rows[0].record_id, rows[0].mod_id), (14, 6));
        assert_eq!(rows[0].cols[1].value(), Some("Claude Monet"));
        assert_eq!(rows[1].cols[0].value(), None);
    }

    #[test]
    fn test_error_code() {
        let xml = "<FMPXMLRESULT><ERRORCODE>105</ERRORCODE></FMPXMLRESULT>";
        let doc = parse_xml_result(xml.as_bytes()).unwrap();
        assert_eq!(doc.error_code, 105);
        assert!(doc.rows().is_empty());
    }

    #[test]
    fn test_unknown_element() {
        let xml = "<FMPXMLRESULT><ERRORCODE>0</ERRORCODE><field/></FMPXMLRESULT>";
        assert!(matches!(
            parse_xml_result(xml.as_bytes()),
            Err(ParseError::UnknownElement { grammar: "FMPXMLRESULT", .. })
        ));
    }

    #[test]
    fn test_col_outside_row() {
        let xml = "<FMPXMLRESULT><RESULTSET FOUND=\"0\"><COL/></RESULTSET></FMPXMLRESULT>";
        assert!(matches!(
            parse_xml_result(xml.as_bytes()),
            Err(ParseError::UnexpectedElement { .. })
        ));
    }
}

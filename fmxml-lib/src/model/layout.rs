//! Layout schema

use std::collections::HashMap;
use std::sync::Arc;

use log::debug;
use log::warn;

use super::DateFormats;
use super::FieldDefinition;
use super::Portal;
use super::Value;
use super::Valuelist;
use crate::error::Error;
use crate::error::ParseError;
use crate::parse::LayoutInfoDocument;
use crate::parse::ResultSetDocument;

/// The schema of one layout in one database.
///
/// A layout is built once from the metadata of an `fmresultset` response,
/// optionally enriched with the value lists of the matching `FMPXMLLAYOUT`
/// response, and shared as `Arc<Layout>` by every record read through it.
#[derive(Debug, Clone, PartialEq)]
pub struct Layout {
    name: String,
    database: String,
    table: String,
    formats: DateFormats,
    field_definitions: Vec<Arc<FieldDefinition>>,
    index: HashMap<String, usize>,
    portals: Vec<Portal>,
    valuelists: Vec<Valuelist>,
}

impl Layout {
    /// Builds a layout from response metadata.
    ///
    /// Field definitions of portals are registered both on their [`Portal`]
    /// and on the layout. A field listed twice keeps its first position and
    /// its last definition.
    ///
    /// # Errors
    ///
    /// Fails if the document has no `<datasource>` or a field definition
    /// declares an unknown type.
    pub fn new(document: &ResultSetDocument, info: Option<&LayoutInfoDocument>) -> Result<Self, Error> {
        let datasource = document
            .datasource
            .as_ref()
            .ok_or(ParseError::MissingElement("datasource"))?;

        let bindings: HashMap<&str, &str> = info
            .map(|info| info.valuelist_bindings().collect())
            .unwrap_or_default();

        let mut layout = Self {
            name: datasource.layout.clone(),
            database: datasource.database.clone(),
            table: datasource.table.clone(),
            formats: DateFormats {
                date: datasource.date_format.clone(),
                time: datasource.time_format.clone(),
                timestamp: datasource.timestamp_format.clone(),
            },
            field_definitions: Vec::new(),
            index: HashMap::new(),
            portals: Vec::new(),
            valuelists: Vec::new(),
        };

        for element in &document.field_definitions {
            let valuelist = bindings.get(element.name.as_str()).copied();
            let definition = FieldDefinition::from_element(element, None, valuelist)?;
            layout.add_field_definition(Arc::new(definition));
        }

        for related in &document.relatedset_definitions {
            let mut portal = Portal::new(&related.table);
            for element in &related.field_definitions {
                let valuelist = bindings.get(element.name.as_str()).copied();
                let definition = Arc::new(FieldDefinition::from_element(
                    element,
                    Some(&related.table),
                    valuelist,
                )?);
                portal.add_field_definition(Arc::clone(&definition));
                layout.add_field_definition(definition);
            }
            layout.portals.push(portal);
        }

        if let Some(info) = info {
            for (field, valuelist) in info.valuelist_bindings() {
                if !layout.index.contains_key(field) {
                    debug!(
                        "Layout '{}' binds value list '{}' to unknown field '{}'",
                        layout.name, valuelist, field
                    );
                }
            }
            layout.valuelists = info.valuelists.iter().map(Valuelist::from_element).collect();
        }

        Ok(layout)
    }

    fn add_field_definition(&mut self, definition: Arc<FieldDefinition>) {
        match self.index.get(definition.name()) {
            Some(&position) => self.field_definitions[position] = definition,
            None => {
                self.index
                    .insert(definition.name().to_string(), self.field_definitions.len());
                self.field_definitions.push(definition);
            }
        }
    }

    // =========================================================================
    // Accessors
    // =========================================================================

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn database_name(&self) -> &str {
        &self.database
    }

    /// Returns the table the layout is based on.
    pub fn table_name(&self) -> &str {
        &self.table
    }

    pub fn formats(&self) -> &DateFormats {
        &self.formats
    }

    pub fn date_format(&self) -> &str {
        &self.formats.date
    }

    pub fn time_format(&self) -> &str {
        &self.formats.time
    }

    pub fn timestamp_format(&self) -> &str {
        &self.formats.timestamp
    }

    /// Returns every field name, portal fields included, in document order.
    pub fn field_names(&self) -> Vec<&str> {
        self.field_definitions.iter().map(|d| d.name()).collect()
    }

    pub fn has_field_definition(&self, name: &str) -> bool {
        self.index.contains_key(name)
    }

    pub fn field_definition(&self, name: &str) -> Option<&FieldDefinition> {
        self.index
            .get(name)
            .map(|&position| self.field_definitions[position].as_ref())
    }

    pub(crate) fn shared_definition(&self, name: &str) -> Option<Arc<FieldDefinition>> {
        self.index
            .get(name)
            .map(|&position| Arc::clone(&self.field_definitions[position]))
    }

    /// Returns the portal table names in document order.
    pub fn portal_names(&self) -> Vec<&str> {
        self.portals.iter().map(Portal::table_name).collect()
    }

    pub fn portal(&self, table_name: &str) -> Option<&Portal> {
        self.portals.iter().find(|p| p.table_name() == table_name)
    }

    pub fn valuelist_names(&self) -> Vec<&str> {
        self.valuelists.iter().map(Valuelist::name).collect()
    }

    pub fn valuelist(&self, name: &str) -> Option<&Valuelist> {
        self.valuelists.iter().find(|v| v.name() == name)
    }

    /// Returns the value list bound to a field, if any.
    pub fn field_valuelist(&self, field_name: &str) -> Option<&Valuelist> {
        self.field_definition(field_name)?
            .valuelist_name()
            .and_then(|name| self.valuelist(name))
    }

    /// Munges a value with the named field's definition.
    ///
    /// A field without a definition keeps its value and logs a warning.
    pub fn munge(&self, field_name: &str, value: impl Into<Value>) -> Value {
        match self.field_definition(field_name) {
            Some(definition) => definition.munge(value, &self.formats),
            None => {
                warn!(
                    "No definition for field '{}' on layout '{}'",
                    field_name, self.name
                );
                value.into()
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::ResultType;
    use crate::parse::parse_layout_info;
    use crate::parse::parse_result_set;

    const METADATA: &str = r#"<fmresultset>
      <error code="0"/>
      <datasource database="FMPHP_Sample" date-format="MM/dd/yyyy" layout="English" table="English"
          time-format="HH:mm:ss" timestamp-format="MM/dd/yyyy HH:mm:ss" total-count="12"/>
      <metadata>
        <field-definition name="Title" result="text" type="normal" max-repeat="1"/>
        <field-definition name="Status" result="text" type="normal" max-repeat="1"/>
        <field-definition name="Title" result="text" type="normal" max-repeat="1" not-empty="yes"/>
        <relatedset-definition table="Reviews">
          <field-definition name="Reviews::Stars" result="number" type="normal" max-repeat="1"/>
        </relatedset-definition>
      </metadata>
      <resultset count="0" fetch-size="0"/>
    </fmresultset>"#;

    const INFO: &str = r#"<FMPXMLLAYOUT>
      <ERRORCODE>0</ERRORCODE>
      <LAYOUT DATABASE="FMPHP_Sample" NAME="English">
        <FIELD NAME="Status"><STYLE TYPE="POPUPMENU" VALUELIST="Availability"/></FIELD>
      </LAYOUT>
      <VALUELISTS>
        <VALUELIST NAME="Availability"><VALUE DISPLAY="In">In</VALUE></VALUELIST>
      </VALUELISTS>
    </FMPXMLLAYOUT>"#;

    fn layout() -> Layout {
        let document = parse_result_set(METADATA.as_bytes()).unwrap();
        let info = parse_layout_info(INFO.as_bytes()).unwrap();
        Layout::new(&document, Some(&info)).unwrap()
    }

    #[test]
    fn test_fields_and_portals() {
        let layout = layout();
        assert_eq!(layout.name(), "English");
        assert_eq!(layout.database_name(), "FMPHP_Sample");
        assert_eq!(layout.field_names(), ["Title", "Status", "Reviews::Stars"]);
        assert!(layout.field_definition("Title").unwrap().is_required());

        assert_eq!(layout.portal_names(), ["Reviews"]);
        let portal = layout.portal("Reviews").unwrap();
        assert_eq!(portal.field_names(), ["Reviews::Stars"]);
        assert_eq!(
            layout.field_definition("Reviews::Stars").unwrap().portal(),
            Some("Reviews")
        );
        assert_eq!(
            portal.field_definition("Reviews::Stars").unwrap().result(),
            ResultType::Number
        );
    }

    #[test]
    fn test_valuelists() {
        let layout = layout();
        assert_eq!(
            layout.field_definition("Status").unwrap().valuelist_name(),
            Some("Availability")
        );
        assert_eq!(layout.field_valuelist("Status").unwrap().len(), 1);
        assert!(layout.field_valuelist("Title").is_none());
        assert_eq!(layout.valuelist_names(), ["Availability"]);
    }

    #[test]
    fn test_munge_through_layout() {
        let layout = layout();
        assert_eq!(layout.munge("Reviews::Stars", "4"), Value::Int(4));
        assert_eq!(layout.munge("Nope", "4"), Value::from("4"));
    }

    #[test]
    fn test_without_info() {
        let document = parse_result_set(METADATA.as_bytes()).unwrap();
        let layout = Layout::new(&document, None).unwrap();
        assert!(layout.valuelist_names().is_empty());
        assert_eq!(layout.field_definition("Status").unwrap().valuelist_name(), None);
    }

    #[test]
    fn test_missing_datasource() {
        let document = ResultSetDocument::default();
        assert!(matches!(
            Layout::new(&document, None),
            Err(Error::Parse(ParseError::MissingElement("datasource")))
        ));
    }
}

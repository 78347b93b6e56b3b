//! Response parsers for the three XML grammars.
//!
//! Each parser makes one forward pass over a complete document and builds a
//! tree of plain element structs. Field data is left as raw text; coercion
//! happens in [`crate::model`]. Any element a grammar does not define is an
//! error.

mod events;
mod layout_info;
mod result_set;
mod xml_result;

pub use layout_info::*;
pub use result_set::*;
pub use xml_result::*;

use events::Attributes;

/// The `<product>` element common to all grammars.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Product {
    pub name: String,
    pub version: String,
    pub build: String,
}

impl Product {
    fn from_attributes(attributes: &Attributes, uppercase: bool) -> Self {
        let key = |name: &str| {
            if uppercase {
                name.to_uppercase()
            } else {
                name.to_string()
            }
        };
        Self {
            name: attributes.text(&key("name")),
            version: attributes.text(&key("version")),
            build: attributes.text(&key("build")),
        }
    }
}

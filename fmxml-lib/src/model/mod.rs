//! Typed records and layout schemas
//!
//! Parsed documents from [`crate::parse`] are turned into [`Layout`]s and
//! [`Record`]s here. Values are coerced ("munged") according to each field's
//! [`FieldDefinition`]; a value that cannot be coerced is kept as text.

mod command_result;
mod field;
mod field_container;
mod field_definition;
mod layout;
mod portal;
mod record;
mod value;
mod valuelist;

pub use command_result::*;
pub use field::*;
pub use field_container::*;
pub use field_definition::*;
pub use layout::*;
pub use portal::*;
pub use record::*;
pub use value::*;
pub use valuelist::*;

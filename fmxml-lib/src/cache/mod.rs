//! Layout caching
//!
//! Layout metadata only changes when the database schema does, so each
//! client keeps the layouts it has seen for its lifetime.

mod layout;

pub use layout::*;

//! Web publishing operations
//!
//! - [`query`] - directives and query string encoding
//! - [`command`] - the command builders
//!
//! Client-level operations (executing queries, listing names, fetching
//! layouts and container data) are methods on [`crate::FmsClient`] defined
//! in this module.

pub mod command;
pub mod query;

mod container;
mod execute;
mod layout;
mod names;

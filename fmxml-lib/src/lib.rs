//! FileMaker XML web publishing client library
//!
//! An async client for the XML grammars of the FileMaker web publishing
//! engine: commands are encoded into `/fmi/xml/*.xml` query strings, and the
//! XML responses are parsed and materialized into typed [`model::Record`]s
//! bound to their [`model::Layout`].

pub mod api;
pub mod cache;
pub mod error;
pub mod model;
pub mod parse;

mod client;
mod transport;

pub use client::*;
pub use transport::*;

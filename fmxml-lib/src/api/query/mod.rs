//! Query string construction.
//!
//! A request to the web publishing engine is a flat list of directives such as
//! `-db=employees`, `-sortfield.1=Title` or `Country=USA`, terminated by a
//! single argument-less verb like `-findall`. Commands collect their
//! directives into a [`CommandParameters`] list which [`encode`] turns into
//! the query string.
//!
//! - [`Directive`] - one name with an optional [`Argument`]
//! - [`CommandParameters`] - the ordered directive list a command builds
//! - [`encode`] - percent-encodes the list and moves the verb to the end

mod directive;
mod encode;
mod parameters;

pub use directive::Argument;
pub use directive::Directive;
pub use encode::encode;
pub use encode::escape;
pub use parameters::CommandParameters;

//! Error types

mod api;
mod command;
mod data;
mod field;
mod parse;

pub use api::*;
pub use command::*;
pub use data::*;
pub use field::*;
pub use parse::*;

/// Top-level error returned by client operations.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// Transport-level failure.
    #[error(transparent)]
    Api(#[from] ApiError),

    /// A command could not be turned into a query.
    #[error(transparent)]
    Command(#[from] CommandError),

    /// The response body could not be parsed.
    #[error(transparent)]
    Parse(#[from] ParseError),

    /// The response parsed but its contents were rejected.
    #[error(transparent)]
    Data(#[from] DataError),

    /// A typed record accessor failed.
    #[error(transparent)]
    Field(#[from] FieldError),
}

impl Error {
    /// Returns the server error code if the server rejected the request.
    pub fn server_code(&self) -> Option<u32> {
        match self {
            Self::Data(DataError::Server { code }) => Some(*code),
            _ => None,
        }
    }

    /// Returns `true` if retrying the same request might succeed.
    ///
    /// Only transport failures qualify; nothing in this crate retries on its own.
    pub fn is_retryable(&self) -> bool {
        match self {
            Self::Api(e) => e.is_retryable(),
            _ => false,
        }
    }
}

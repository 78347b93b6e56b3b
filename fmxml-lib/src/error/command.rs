//! Command building errors
//!
//! Every variant here is a programming error in the caller: the command was
//! assembled in a way the server grammar cannot express. They are reported as
//! soon as they are detected and never corrected.

/// Errors raised while assembling or encoding a command.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum CommandError {
    /// The directive list did not contain exactly one verb.
    #[error("Invalid command sequence: expected exactly one verb, found {verbs:?}")]
    InvalidCommandSequence {
        /// Names of the argument-less directives that were found.
        verbs: Vec<String>,
    },

    /// The command needs a record id and none was set.
    #[error("Command '{verb}' requires a record id")]
    MissingRecordId {
        /// The verb that was being built.
        verb: &'static str,
    },

    /// A set-once value was set a second time.
    #[error("Field '{field}' can only be set once")]
    ImmutableField {
        /// Name of the locked value.
        field: &'static str,
    },

    /// Record ids are positive.
    #[error("Invalid record id: {0}")]
    InvalidRecordId(u64),

    /// Modification ids are positive.
    #[error("Invalid modification id: {0}")]
    InvalidModificationId(u64),

    /// Sort precedence outside 1..=9.
    #[error("Invalid sort precedence {0}, expected 1 to 9")]
    InvalidSortPrecedence(u8),

    /// An operator token that is not part of the search grammar.
    #[error("Invalid search operator: {0}")]
    InvalidOperator(String),

    /// `-relatedsets.max` was set without `-relatedsets.filter`.
    #[error("Related set max requires a related set filter")]
    RelatedSetsMaxWithoutFilter,

    /// A compound find needs at least two request definitions.
    #[error("Compound find needs at least 2 request definitions, got {0}")]
    NotEnoughRequestDefinitions(usize),

    /// Request definitions were already added to this command.
    #[error("Request definitions can only be added once")]
    RequestDefinitionsAlreadyAdded,

    /// A request definition has no sub-queries.
    #[error("Request definition has no queries")]
    EmptyRequestDefinition,

    /// The client has no database configured.
    #[error("No database configured on the client")]
    MissingDatabase,
}

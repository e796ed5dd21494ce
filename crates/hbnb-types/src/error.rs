use thiserror::Error;

/// Errors produced by entity model operations.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum TypeError {
    #[error("unknown entity kind: {0}")]
    UnknownKind(String),

    #[error("invalid entity key {0:?}: expected <Kind>.<id>")]
    InvalidKey(String),

    #[error("attribute {0:?} is reserved and cannot be changed")]
    ReservedAttribute(String),

    #[error("invalid timestamp {value:?}: {reason}")]
    InvalidTimestamp { value: String, reason: String },
}

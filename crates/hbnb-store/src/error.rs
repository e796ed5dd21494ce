use std::path::PathBuf;

/// Errors from object store operations.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    /// I/O error from the underlying storage backend.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// The durable file exists but cannot be decoded.
    #[error("corrupt store file {}: {reason}", path.display())]
    Corrupt { path: PathBuf, reason: String },

    /// Serialization failure while writing a snapshot.
    #[error("serialization error: {0}")]
    Serialization(String),

    /// The finished snapshot could not be moved over the previous one.
    #[error("failed to replace {}: {reason}", path.display())]
    Persist { path: PathBuf, reason: String },
}

/// Result alias for store operations.
pub type StoreResult<T> = Result<T, StoreError>;

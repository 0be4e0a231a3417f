//! Error types for the model crate.

use tdb_store::StoreError;

/// Errors raised while building catalog entities.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ModelError {
    /// The backing store rejected a read or write.
    #[error("store error: {0}")]
    Store(#[from] StoreError),

    /// A title refers to a publisher that is not in the catalog.
    #[error("unknown publisher index: {0}")]
    UnknownPublisher(usize),

    /// An AU refers to a title that is not in the catalog.
    #[error("unknown title index: {0}")]
    UnknownTitle(usize),

    /// A status string is not one of the known AU statuses.
    #[error("unknown AU status: {0}")]
    UnknownStatus(String),
}

/// Result alias for model operations.
pub type ModelResult<T> = Result<T, ModelError>;

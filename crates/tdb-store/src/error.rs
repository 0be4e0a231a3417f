//! Error types for the store crate.

/// Violations of the keyed store contract.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum StoreError {
    /// The exact path already holds a value in this store.
    #[error("key already defined: {path}")]
    AlreadyDefined { path: String },

    /// A key could not be turned into a path.
    #[error("malformed key {key:?}: {reason}")]
    MalformedKey { key: String, reason: String },

    /// A path was used as a leaf where a group exists, or the reverse.
    #[error("conflicting leaf and group at key: {path}")]
    ShapeConflict { path: String },

    /// The scope identifier does not belong to this tree.
    #[error("unknown scope: {0}")]
    UnknownScope(usize),
}

/// Result alias for store operations.
pub type StoreResult<T> = Result<T, StoreError>;

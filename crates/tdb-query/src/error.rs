//! Error types for the query crate.

/// Errors raised while compiling a query.
#[derive(Debug, thiserror::Error)]
pub enum QueryError {
    /// Malformed query text. The message names the character index.
    #[error("{message}")]
    Syntax { index: usize, message: String },

    /// An identifier that names no queryable field.
    #[error("bad identifier at index {index}: {name}")]
    UnknownField { index: usize, name: String },

    /// The operand of `~` or `!~` is not a valid regular expression.
    #[error("invalid regular expression {pattern:?}: {source}")]
    InvalidRegex {
        pattern: String,
        #[source]
        source: regex::Error,
    },

    /// A token was requested after the end of the query was returned.
    #[error("already at end of string")]
    AfterEndOfInput,
}

impl QueryError {
    pub(crate) fn syntax(index: usize, message: impl Into<String>) -> Self {
        QueryError::Syntax {
            index,
            message: message.into(),
        }
    }
}

/// Result alias for query operations.
pub type QueryResult<T> = Result<T, QueryError>;

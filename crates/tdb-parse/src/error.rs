//! Error types for the parse crate.

use tdb_model::ModelError;
use tdb_store::StoreError;

/// A lexical or syntactic error at a source position.
///
/// Displays as `"<source>", line L.C: <message>`.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("\"{source_name}\", line {line}.{column}: {message}")]
pub struct SyntaxError {
    pub message: String,
    pub source_name: String,
    pub line: usize,
    pub column: usize,
}

impl SyntaxError {
    pub fn new(
        message: impl Into<String>,
        source_name: impl Into<String>,
        line: usize,
        column: usize,
    ) -> Self {
        Self {
            message: message.into(),
            source_name: source_name.into(),
            line,
            column,
        }
    }
}

/// Errors that abort a parse.
#[derive(Debug, thiserror::Error)]
pub enum ParseError {
    /// Malformed source text.
    #[error(transparent)]
    Syntax(#[from] SyntaxError),

    /// An assignment broke the store contract (redefinition, shape clash).
    #[error("\"{source_name}\", line {line}.{column}: {error}")]
    Store {
        #[source]
        error: StoreError,
        source_name: String,
        line: usize,
        column: usize,
    },

    /// A catalog entity could not be built.
    #[error("\"{source_name}\", line {line}.{column}: {error}")]
    Model {
        #[source]
        error: ModelError,
        source_name: String,
        line: usize,
        column: usize,
    },

    /// The underlying reader failed.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// A token was requested after the end of input was already returned.
    #[error("already at end of input")]
    AfterEndOfInput,
}

/// Result alias for parse operations.
pub type ParseResult<T> = Result<T, ParseError>;

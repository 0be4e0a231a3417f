use thiserror::Error;

#[derive(Debug, Error)]
pub enum SdkError {
    #[error("parse error: {0}")]
    Parse(#[from] tdb_parse::ParseError),

    #[error("query error: {0}")]
    Query(#[from] tdb_query::QueryError),

    #[error("invalid configuration: {0}")]
    Config(String),
}

pub type SdkResult<T> = Result<T, SdkError>;

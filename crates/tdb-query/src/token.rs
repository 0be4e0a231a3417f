use std::fmt;

/// Kinds of token in a query string.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum QueryTokenKind {
    And,
    Or,
    Is,
    Not,
    Set,
    Equal,
    NotEqual,
    Matches,
    DoesNotMatch,
    ParenOpen,
    ParenClose,
    String,
    Identifier,
    EndOfString,
}

impl QueryTokenKind {
    pub(crate) fn keyword(word: &str) -> Option<Self> {
        match word {
            "and" => Some(QueryTokenKind::And),
            "or" => Some(QueryTokenKind::Or),
            "is" => Some(QueryTokenKind::Is),
            "not" => Some(QueryTokenKind::Not),
            "set" => Some(QueryTokenKind::Set),
            _ => None,
        }
    }
}

impl fmt::Display for QueryTokenKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            QueryTokenKind::And => "and",
            QueryTokenKind::Or => "or",
            QueryTokenKind::Is => "is",
            QueryTokenKind::Not => "not",
            QueryTokenKind::Set => "set",
            QueryTokenKind::Equal => "=",
            QueryTokenKind::NotEqual => "!=",
            QueryTokenKind::Matches => "~",
            QueryTokenKind::DoesNotMatch => "!~",
            QueryTokenKind::ParenOpen => "(",
            QueryTokenKind::ParenClose => ")",
            QueryTokenKind::String => "a string",
            QueryTokenKind::Identifier => "an identifier",
            QueryTokenKind::EndOfString => "end of string",
        };
        f.write_str(s)
    }
}

/// A query token and the character index where it starts.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct QueryToken {
    pub kind: QueryTokenKind,
    pub index: usize,
    pub value: Option<String>,
}

impl QueryToken {
    pub fn new(kind: QueryTokenKind, index: usize) -> Self {
        Self {
            kind,
            index,
            value: None,
        }
    }

    pub fn with_value(kind: QueryTokenKind, index: usize, value: impl Into<String>) -> Self {
        Self {
            kind,
            index,
            value: Some(value.into()),
        }
    }

    pub fn text(&self) -> &str {
        self.value.as_deref().unwrap_or_default()
    }
}

impl fmt::Display for QueryToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.index, self.kind)?;
        if let Some(value) = &self.value {
            write!(f, " [{value}]")?;
        }
        Ok(())
    }
}

use tracing::trace;

use crate::error::{QueryError, QueryResult};
use crate::token::{QueryToken, QueryTokenKind};

const QUALIFIERS: [&str; 3] = ["au", "title", "publisher"];

/// Splits a query string into [`QueryToken`]s.
///
/// Indices are 0-based character offsets into the query string.
pub struct QueryLexer {
    chars: Vec<char>,
    pos: usize,
    echo_tokens: bool,
    finished: bool,
}

impl QueryLexer {
    pub fn new(query: &str) -> Self {
        Self {
            chars: query.chars().collect(),
            pos: 0,
            echo_tokens: false,
            finished: false,
        }
    }

    /// Emit each token as a `trace` event.
    pub fn echo_tokens(mut self, echo: bool) -> Self {
        self.echo_tokens = echo;
        self
    }

    /// The query text from character `index` on.
    pub fn rest_from(&self, index: usize) -> String {
        self.chars.get(index..).unwrap_or_default().iter().collect()
    }

    /// Consume and return the next token.
    pub fn next_token(&mut self) -> QueryResult<QueryToken> {
        if self.finished {
            return Err(QueryError::AfterEndOfInput);
        }
        let token = self.scan()?;
        if token.kind == QueryTokenKind::EndOfString {
            self.finished = true;
        }
        if self.echo_tokens {
            trace!(token = %token, "query token");
        }
        Ok(token)
    }

    /// Every remaining token, ending with [`QueryTokenKind::EndOfString`].
    pub fn tokenize(mut self) -> QueryResult<Vec<QueryToken>> {
        let mut tokens = Vec::new();
        loop {
            let token = self.next_token()?;
            let done = token.kind == QueryTokenKind::EndOfString;
            tokens.push(token);
            if done {
                return Ok(tokens);
            }
        }
    }

    fn scan(&mut self) -> QueryResult<QueryToken> {
        while self.peek(0).is_some_and(char::is_whitespace) {
            self.pos += 1;
        }
        let start = self.pos;
        let Some(ch) = self.peek(0) else {
            return Ok(QueryToken::new(QueryTokenKind::EndOfString, start));
        };

        let operator = match (ch, self.peek(1)) {
            ('=', _) => Some((QueryTokenKind::Equal, 1)),
            ('!', Some('=')) => Some((QueryTokenKind::NotEqual, 2)),
            ('~', _) => Some((QueryTokenKind::Matches, 1)),
            ('!', Some('~')) => Some((QueryTokenKind::DoesNotMatch, 2)),
            ('(', _) => Some((QueryTokenKind::ParenOpen, 1)),
            (')', _) => Some((QueryTokenKind::ParenClose, 1)),
            _ => None,
        };
        if let Some((kind, len)) = operator {
            self.pos += len;
            return Ok(QueryToken::new(kind, start));
        }

        if let Some((kind, len)) = self.keyword() {
            self.pos += len;
            return Ok(QueryToken::new(kind, start));
        }

        if ch == '"' || ch == '\'' {
            return self.string(ch);
        }

        let len = self.identifier_len();
        if len > 0 {
            let value: String = self.chars[start..start + len].iter().collect();
            self.pos += len;
            return Ok(QueryToken::with_value(QueryTokenKind::Identifier, start, value));
        }

        Err(QueryError::syntax(
            start,
            format!("syntax error at index {start} near: {}", self.rest_from(start)),
        ))
    }

    /// A keyword at the cursor, when followed by a space, `)` or the end.
    fn keyword(&self) -> Option<(QueryTokenKind, usize)> {
        let len = self.run_len(self.pos, |c| c.is_ascii_lowercase());
        let word: String = self.chars[self.pos..self.pos + len].iter().collect();
        let kind = QueryTokenKind::keyword(&word)?;
        match self.peek(len) {
            None | Some(' ') | Some(')') => Some((kind, len)),
            Some(_) => None,
        }
    }

    fn string(&mut self, quote: char) -> QueryResult<QueryToken> {
        let start = self.pos;
        let run_on = || QueryError::syntax(start, format!("run-on string at index {start}"));
        let mut value = String::new();
        self.pos += 1;
        loop {
            let ch = self.peek(0).ok_or_else(run_on)?;
            self.pos += 1;
            if ch == quote {
                break;
            }
            if ch == '\\' {
                let escaped = self.peek(0).ok_or_else(run_on)?;
                if escaped != quote && escaped != '\\' {
                    let index = self.pos;
                    return Err(QueryError::syntax(
                        index,
                        format!("invalid string escape at index {index}: \\{escaped}"),
                    ));
                }
                self.pos += 1;
                value.push(escaped);
            } else {
                value.push(ch);
            }
        }
        Ok(QueryToken::with_value(QueryTokenKind::String, start, value))
    }

    /// Length of `((au|title|publisher):)?NAME(\[NAME\])*` at the cursor.
    fn identifier_len(&self) -> usize {
        let mut at = self.pos;
        for qualifier in QUALIFIERS {
            let len = qualifier.len();
            let matches = self.chars.len() > at + len
                && self.chars[at..at + len].iter().copied().eq(qualifier.chars())
                && self.chars[at + len] == ':';
            if matches && self.run_len(at + len + 1, is_name_char) > 0 {
                at += len + 1;
                break;
            }
        }
        let name = self.run_len(at, is_name_char);
        if name == 0 {
            return 0;
        }
        at += name;
        while self.chars.get(at) == Some(&'[') {
            let inner = self.run_len(at + 1, is_name_char);
            if inner == 0 || self.chars.get(at + 1 + inner) != Some(&']') {
                break;
            }
            at += inner + 2;
        }
        at - self.pos
    }

    fn run_len(&self, from: usize, pred: impl Fn(char) -> bool) -> usize {
        self.chars
            .get(from..)
            .unwrap_or_default()
            .iter()
            .take_while(|&&c| pred(c))
            .count()
    }

    fn peek(&self, ahead: usize) -> Option<char> {
        self.chars.get(self.pos + ahead).copied()
    }
}

fn is_name_char(c: char) -> bool {
    c.is_ascii_alphanumeric() || matches!(c, '_' | '.' | '/')
}

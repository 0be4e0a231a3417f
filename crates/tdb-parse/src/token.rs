use std::fmt;

/// Kinds of token produced by the [`Lexer`](crate::Lexer).
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum TokenKind {
    AngleOpen,
    AngleClose,
    CurlyOpen,
    CurlyClose,
    SquareOpen,
    SquareClose,
    Equal,
    Semicolon,
    Publisher,
    Title,
    Au,
    Implicit,
    Identifier,
    String,
    EndOfInput,
}

impl TokenKind {
    /// The keyword spelled by `word`, if any.
    pub fn keyword(word: &str) -> Option<TokenKind> {
        match word {
            "publisher" => Some(TokenKind::Publisher),
            "title" => Some(TokenKind::Title),
            "au" => Some(TokenKind::Au),
            "implicit" => Some(TokenKind::Implicit),
            _ => None,
        }
    }

    /// The token kind for a single punctuation character.
    pub fn punctuation(ch: char) -> Option<TokenKind> {
        match ch {
            '<' => Some(TokenKind::AngleOpen),
            '>' => Some(TokenKind::AngleClose),
            '{' => Some(TokenKind::CurlyOpen),
            '}' => Some(TokenKind::CurlyClose),
            '[' => Some(TokenKind::SquareOpen),
            ']' => Some(TokenKind::SquareClose),
            '=' => Some(TokenKind::Equal),
            ';' => Some(TokenKind::Semicolon),
            _ => None,
        }
    }

    /// Returns `true` for token kinds that carry a value.
    pub fn has_value(self) -> bool {
        matches!(self, TokenKind::Identifier | TokenKind::String)
    }
}

/// Renders the kind the way syntax errors name it: punctuation and keywords
/// literally, the rest descriptively.
impl fmt::Display for TokenKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            TokenKind::AngleOpen => "<",
            TokenKind::AngleClose => ">",
            TokenKind::CurlyOpen => "{",
            TokenKind::CurlyClose => "}",
            TokenKind::SquareOpen => "[",
            TokenKind::SquareClose => "]",
            TokenKind::Equal => "=",
            TokenKind::Semicolon => ";",
            TokenKind::Publisher => "publisher",
            TokenKind::Title => "title",
            TokenKind::Au => "au",
            TokenKind::Implicit => "implicit",
            TokenKind::Identifier => "an identifier",
            TokenKind::String => "a string",
            TokenKind::EndOfInput => "end of file",
        };
        f.write_str(s)
    }
}

/// A token and the 1-based position where it starts.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Token {
    pub kind: TokenKind,
    pub line: usize,
    pub column: usize,
    /// Set for [`TokenKind::Identifier`] and [`TokenKind::String`] only.
    pub value: Option<String>,
}

impl Token {
    pub fn new(kind: TokenKind, line: usize, column: usize) -> Self {
        Self {
            kind,
            line,
            column,
            value: None,
        }
    }

    pub fn with_value(kind: TokenKind, line: usize, column: usize, value: impl Into<String>) -> Self {
        Self {
            kind,
            line,
            column,
            value: Some(value.into()),
        }
    }

    /// The carried value, or `""` for valueless tokens.
    pub fn text(&self) -> &str {
        self.value.as_deref().unwrap_or_default()
    }
}

impl fmt::Display for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}: {}", self.line, self.column, self.kind)?;
        if self.kind.has_value() {
            write!(f, " {:?}", self.text())?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn keywords_and_punctuation_resolve() {
        assert_eq!(TokenKind::keyword("au"), Some(TokenKind::Au));
        assert_eq!(TokenKind::keyword("param"), None);
        assert_eq!(TokenKind::punctuation(';'), Some(TokenKind::Semicolon));
        assert_eq!(TokenKind::punctuation('"'), None);
    }

    #[test]
    fn display_names_match_error_vocabulary() {
        assert_eq!(TokenKind::EndOfInput.to_string(), "end of file");
        assert_eq!(TokenKind::String.to_string(), "a string");
        assert_eq!(TokenKind::Identifier.to_string(), "an identifier");
        assert_eq!(TokenKind::CurlyClose.to_string(), "}");
        assert_eq!(TokenKind::Publisher.to_string(), "publisher");
    }

    #[test]
    fn token_display_includes_position_and_value() {
        let token = Token::with_value(TokenKind::String, 3, 7, "vala");
        assert_eq!(token.to_string(), "3.7: a string \"vala\"");
        assert_eq!(Token::new(TokenKind::Equal, 1, 2).to_string(), "1.2: =");
    }
}

//! Line-oriented lexer for TDB source.
//!
//! Whether text is read as a string or as identifiers and punctuation
//! depends on what came before it:
//!
//! - after `=`, the rest of the line up to `;` or `>` is one string
//! - inside `au <...>`, each `;`-separated field is one string
//! - everywhere else, text is keywords, identifiers and punctuation
//!
//! Strings are either quoted (`"..."` or `'...'`, closed on the same line)
//! or unquoted (surrounding whitespace trimmed, `\` escapes `;`, `>`, space,
//! backslash, and a leading `"`).

use std::io::BufRead;

use tracing::trace;

use crate::config::ParseOptions;
use crate::error::{ParseError, ParseResult, SyntaxError};
use crate::token::{Token, TokenKind};

/// Whether the next non-blank text is read as a string.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum StringMode {
    /// Keywords, identifiers and punctuation.
    Off,
    /// One string follows an `=`.
    AfterEqual,
    /// Inside `au` but between fields.
    InAu,
    /// One string follows `au <` or a `;` within it.
    AuField,
}

/// Splits TDB source into [`Token`]s.
///
/// Lines and columns are 1-based. The end-of-input token is positioned at
/// column 1 of the line after the last one.
pub struct Lexer<R> {
    reader: R,
    source_name: String,
    options: ParseOptions,
    current: Vec<char>,
    pos: usize,
    line: usize,
    mode: StringMode,
    last: Option<TokenKind>,
    finished: bool,
}

impl<R: BufRead> Lexer<R> {
    pub fn new(reader: R, source_name: impl Into<String>, options: ParseOptions) -> Self {
        Self {
            reader,
            source_name: source_name.into(),
            options,
            current: Vec::new(),
            pos: 0,
            line: 0,
            mode: StringMode::Off,
            last: None,
            finished: false,
        }
    }

    /// Name used for this source in errors and AU locations.
    pub fn source_name(&self) -> &str {
        &self.source_name
    }

    pub fn options(&self) -> &ParseOptions {
        &self.options
    }

    /// Returns `true` once the end-of-input token has been returned.
    pub fn is_finished(&self) -> bool {
        self.finished
    }

    /// Consume and return the next token.
    ///
    /// Returns [`TokenKind::EndOfInput`] once, then
    /// [`ParseError::AfterEndOfInput`] on every later call.
    pub fn next_token(&mut self) -> ParseResult<Token> {
        if self.finished {
            return Err(ParseError::AfterEndOfInput);
        }
        let token = self.scan()?;
        self.last = Some(token.kind);
        if token.kind == TokenKind::EndOfInput {
            self.finished = true;
        }
        if self.options.echo_tokens {
            trace!(source = %self.source_name, token = %token, "tdb token");
        }
        Ok(token)
    }

    // ---------------------------------------------------------------
    // Scanning
    // ---------------------------------------------------------------

    fn scan(&mut self) -> ParseResult<Token> {
        while self.rest_is_blank() {
            if self.mode == StringMode::AfterEqual {
                self.mode = StringMode::Off;
                return Ok(Token::with_value(TokenKind::String, self.line, self.column(), ""));
            }
            if !self.read_line()? {
                return Ok(Token::new(TokenKind::EndOfInput, self.line, 1));
            }
        }
        while self.peek().is_some_and(char::is_whitespace) {
            self.pos += 1;
        }
        let Some(ch) = self.peek() else {
            return Err(self.syntax("Unexpected syntax", self.column()).into());
        };

        if matches!(self.mode, StringMode::AfterEqual | StringMode::AuField) {
            if ch == ';' || ch == '>' {
                let token = Token::with_value(TokenKind::String, self.line, self.column(), "");
                self.end_string();
                return Ok(token);
            }
            if ch == '"' || ch == '\'' {
                return self.quoted(ch);
            }
            return self.unquoted();
        }

        if let Some(kind) = TokenKind::punctuation(ch) {
            match kind {
                TokenKind::Semicolon if self.mode == StringMode::InAu => {
                    self.mode = StringMode::AuField;
                }
                TokenKind::AngleOpen if self.last == Some(TokenKind::Au) => {
                    self.mode = StringMode::AuField;
                }
                TokenKind::AngleClose => self.mode = StringMode::Off,
                TokenKind::Equal => self.mode = StringMode::AfterEqual,
                _ => {}
            }
            return Ok(self.take(kind, 1));
        }

        if let Some((kind, len)) = self.keyword() {
            if kind == TokenKind::Au {
                self.mode = StringMode::InAu;
            }
            return Ok(self.take(kind, len));
        }

        let len = self.current[self.pos..]
            .iter()
            .take_while(|&&c| c.is_ascii_alphanumeric() || matches!(c, '_' | '.' | '/'))
            .count();
        if len > 0 {
            let value: String = self.current[self.pos..self.pos + len].iter().collect();
            let token = Token::with_value(TokenKind::Identifier, self.line, self.column(), value);
            self.pos += len;
            return Ok(token);
        }

        Err(self.syntax("Unexpected syntax", self.column()).into())
    }

    /// A keyword at the cursor, when followed by whitespace, `<` or end of line.
    fn keyword(&self) -> Option<(TokenKind, usize)> {
        let rest = &self.current[self.pos..];
        let len = rest.iter().take_while(|c| c.is_ascii_lowercase()).count();
        let word: String = rest[..len].iter().collect();
        let kind = TokenKind::keyword(&word)?;
        match rest.get(len) {
            None => Some((kind, len)),
            Some(c) if c.is_whitespace() || *c == '<' => Some((kind, len)),
            Some(_) => None,
        }
    }

    fn quoted(&mut self, quote: char) -> ParseResult<Token> {
        let column = self.column();
        let rest = &self.current[self.pos..];
        let max = rest.len();
        let mut value = String::new();
        let mut index = 1;
        if index >= max {
            return Err(self.syntax("run-on quoted string", column).into());
        }
        let mut ch = rest[index];
        while ch != quote {
            if ch == '\\' {
                index += 1;
                if index >= max {
                    return Err(self.syntax("end-of-line after backslash", column + index).into());
                }
                ch = rest[index];
                if ch != quote && ch != '\\' {
                    let message = format!("invalid quoted string escape: {ch}");
                    return Err(self.syntax(message, column - 1 + index).into());
                }
            }
            value.push(ch);
            index += 1;
            if index >= max {
                return Err(self.syntax("run-on quoted string", column + index).into());
            }
            ch = rest[index];
        }
        index += 1;

        let token = Token::with_value(TokenKind::String, self.line, column, value);
        self.pos += index;
        self.end_string();
        Ok(token)
    }

    fn unquoted(&mut self) -> ParseResult<Token> {
        let column = self.column();
        let rest = &self.current[self.pos..];
        let max = rest.len();
        let mut escapes = Vec::new();
        let mut index = 0;
        while index < max {
            let ch = rest[index];
            if ch == ';' || ch == '>' {
                break;
            }
            if ch == '\\' {
                escapes.push(index);
                index += 1;
                if index >= max {
                    return Err(self.syntax("run-on unquoted string", column + index).into());
                }
                let escaped = rest[index];
                let allowed = matches!(escaped, ';' | '>' | ' ' | '\\') || (escaped == '"' && index == 1);
                if !allowed {
                    let message = format!("invalid unquoted string escape: {escaped}");
                    return Err(self.syntax(message, column - 1 + index).into());
                }
            }
            index += 1;
        }

        let mut chars = rest[..index].to_vec();
        while chars.last().is_some_and(|c| c.is_whitespace()) {
            chars.pop();
        }
        // An escaped trailing space was trimmed along with the rest.
        if escapes.last().is_some_and(|&last| last + 1 == chars.len()) {
            chars.push(' ');
        }
        for &i in escapes.iter().rev() {
            chars.remove(i);
        }

        let token = Token::with_value(TokenKind::String, self.line, column, chars.into_iter().collect::<String>());
        self.pos += index;
        self.end_string();
        Ok(token)
    }

    // ---------------------------------------------------------------
    // Helpers
    // ---------------------------------------------------------------

    fn read_line(&mut self) -> ParseResult<bool> {
        let mut buf = String::new();
        let read = self.reader.read_line(&mut buf)?;
        self.line += 1;
        self.pos = 0;
        if read == 0 {
            self.current.clear();
            return Ok(false);
        }
        if buf.ends_with('\n') {
            buf.pop();
            if buf.ends_with('\r') {
                buf.pop();
            }
        }
        if self.options.echo_lines {
            trace!(source = %self.source_name, line = self.line, text = %buf, "tdb line");
        }
        self.current = buf.chars().collect();
        Ok(true)
    }

    fn end_string(&mut self) {
        self.mode = match self.mode {
            StringMode::AuField => StringMode::InAu,
            _ => StringMode::Off,
        };
    }

    fn take(&mut self, kind: TokenKind, len: usize) -> Token {
        let token = Token::new(kind, self.line, self.column());
        self.pos += len;
        token
    }

    fn peek(&self) -> Option<char> {
        self.current.get(self.pos).copied()
    }

    fn rest_is_blank(&self) -> bool {
        self.current[self.pos..].iter().all(|c| c.is_whitespace())
    }

    fn column(&self) -> usize {
        self.pos + 1
    }

    fn syntax(&self, message: impl Into<String>, column: usize) -> SyntaxError {
        SyntaxError::new(message, self.source_name.as_str(), self.line, column)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn lexer(text: &str) -> Lexer<&[u8]> {
        Lexer::new(text.as_bytes(), "<string>", ParseOptions::default())
    }

    fn kinds(text: &str) -> Vec<TokenKind> {
        let mut lexer = lexer(text);
        let mut out = Vec::new();
        loop {
            let token = lexer.next_token().unwrap();
            out.push(token.kind);
            if token.kind == TokenKind::EndOfInput {
                return out;
            }
        }
    }

    fn strings(text: &str) -> Vec<String> {
        let mut lexer = lexer(text);
        let mut out = Vec::new();
        loop {
            let token = lexer.next_token().unwrap();
            match token.kind {
                TokenKind::EndOfInput => return out,
                TokenKind::String => out.push(token.text().to_string()),
                _ => {}
            }
        }
    }

    fn first_error(text: &str) -> SyntaxError {
        let mut lexer = lexer(text);
        loop {
            match lexer.next_token() {
                Ok(token) if token.kind == TokenKind::EndOfInput => panic!("no error in {text:?}"),
                Ok(_) => {}
                Err(ParseError::Syntax(err)) => return err,
                Err(other) => panic!("unexpected error: {other}"),
            }
        }
    }

    #[test]
    fn basic_token_sequence() {
        use TokenKind::*;
        let text = "publisher\ntitle\nau\nimplicit\n< a = b ; c = d >\n{\n}\n[\n]";
        assert_eq!(
            kinds(text),
            vec![
                Publisher, Title, Au, Implicit, AngleOpen, Identifier, Equal, String, Semicolon,
                Identifier, Equal, String, AngleClose, CurlyOpen, CurlyClose, SquareOpen,
                SquareClose, EndOfInput,
            ]
        );
    }

    #[test]
    fn empty_inputs_end_immediately() {
        for text in ["", "       ", "\n\n\n", "  \n  \n  \n  "] {
            let mut lexer = lexer(text);
            assert_eq!(lexer.next_token().unwrap().kind, TokenKind::EndOfInput);
            assert!(lexer.is_finished());
            assert!(matches!(lexer.next_token(), Err(ParseError::AfterEndOfInput)));
        }
    }

    #[test]
    fn end_of_input_is_past_the_last_line() {
        let mut lexer = lexer("{\n}\n");
        lexer.next_token().unwrap();
        lexer.next_token().unwrap();
        let end = lexer.next_token().unwrap();
        assert_eq!((end.kind, end.line, end.column), (TokenKind::EndOfInput, 3, 1));
    }

    #[test]
    fn bad_strings_are_rejected() {
        for text in [
            "\"",
            "\"foo",
            "foo = bar\\",
            "foo = bar\\x",
            "foo = \"",
            "foo = \"\\",
            "foo = \"\\k",
            "foo = \"\\\"",
        ] {
            first_error(text);
        }
    }

    #[test]
    fn bad_string_messages() {
        assert_eq!(first_error("\"foo").message, "Unexpected syntax");
        assert_eq!(first_error("foo = \"abc").message, "run-on quoted string");
        assert_eq!(first_error("foo = \"ab\\").message, "end-of-line after backslash");
        assert_eq!(first_error("foo = \"a\\k\"").message, "invalid quoted string escape: k");
        assert_eq!(first_error("foo = bar\\").message, "run-on unquoted string");
        assert_eq!(first_error("foo = bar\\x").message, "invalid unquoted string escape: x");
        assert_eq!(first_error("foo = a\\\"b").message, "invalid unquoted string escape: \"");
    }

    #[test]
    fn unquoted_string_values() {
        let text = "e = nothing special either\n\
                    f =    surrounding whitespace      \n\
                    g =    \\ one leading space\n\
                    h =    \\    one leading space side effect   \n\
                    i =    one trailing space\\    \n\
                    j = embedded\\ space\n\
                    k = embedded\\;semicolon\n\
                    l = embedded\\>angle\n\
                    m = \\\"leading quote mark\n\
                    n = embedded\"quote\"marks";
        assert_eq!(
            strings(text),
            vec![
                "nothing special either",
                "surrounding whitespace",
                " one leading space",
                "    one leading space side effect",
                "one trailing space ",
                "embedded space",
                "embedded;semicolon",
                "embedded>angle",
                "\"leading quote mark",
                "embedded\"quote\"marks",
            ]
        );
    }

    #[test]
    fn escaped_trailing_backslash_keeps_no_space() {
        assert_eq!(strings("a = ends with\\\\"), vec!["ends with\\"]);
    }

    #[test]
    fn quoted_string_values() {
        let text = "a = \"nothing special\"\n\
                    b = \"embedded\\\"quote\"\n\
                    c = \"embedded\\\\backslash\"\n\
                    d = \"\"\n\
                    e = 'single quoted'\n\
                    f = 'it\\'s'";
        assert_eq!(
            strings(text),
            vec!["nothing special", "embedded\"quote", "embedded\\backslash", "", "single quoted", "it's"]
        );
    }

    #[test]
    fn empty_values_after_equal() {
        assert_eq!(strings("a =\nb = ;\nc = >"), vec!["", "", ""]);
    }

    #[test]
    fn au_fields_are_strings() {
        let text = "au < released ; 2001 ;; Volume 1 ; >";
        assert_eq!(strings(text), vec!["released", "2001", "", "Volume 1", ""]);
    }

    #[test]
    fn au_fields_span_lines() {
        assert_eq!(strings("au < a ;\n  b\n ; c >"), vec!["a", "b", "c"]);
    }

    #[test]
    fn keyword_requires_delimiter() {
        use TokenKind::*;
        assert_eq!(kinds("author"), vec![Identifier, EndOfInput]);
        assert_eq!(kinds("au<"), vec![Au, AngleOpen, EndOfInput]);
        assert_eq!(kinds("titles"), vec![Identifier, EndOfInput]);
    }

    #[test]
    fn identifiers_allow_dots_and_slashes() {
        let mut lexer = lexer("param[base_url] a.b/c");
        let tokens: Vec<Token> = (0..6).map(|_| lexer.next_token().unwrap()).collect();
        assert_eq!(tokens[0].text(), "param");
        assert_eq!(tokens[2].text(), "base_url");
        assert_eq!(tokens[4].text(), "a.b/c");
        assert_eq!(tokens[4].column, 17);
    }

    #[test]
    fn positions_are_one_based() {
        let mut lexer = lexer("{\n  publisher [");
        let open = lexer.next_token().unwrap();
        let publisher = lexer.next_token().unwrap();
        let square = lexer.next_token().unwrap();
        assert_eq!((open.line, open.column), (1, 1));
        assert_eq!((publisher.line, publisher.column), (2, 3));
        assert_eq!((square.line, square.column), (2, 13));
    }

    #[test]
    fn unexpected_character_is_located() {
        let err = first_error("{\n  \"foo\" \"and\"");
        assert_eq!(err.message, "Unexpected syntax");
        assert_eq!((err.line, err.column), (2, 3));
    }
}

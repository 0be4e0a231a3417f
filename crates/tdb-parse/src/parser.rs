//! Recursive-descent parser building a [`Catalog`] from TDB tokens.
//!
//! Grammar, with one token of lookahead past the current one:
//!
//! ```text
//! source            := publisher_level* END
//! publisher_level   := publisher_block | publisher_container
//! publisher_block   := '{' publisher assignment* title_level* '}'
//! publisher_container := '{' assignment* publisher_level* '}'
//! title_level       := title_block | title_container
//! title_block       := '{' title assignment* au_level* '}'
//! title_container   := '{' assignment* title_level* '}'
//! au_level          := au | '{' assignment* au_level* '}'
//! assignment        := identifier '=' STRING | implicit
//! identifier        := IDENT ( '[' IDENT ']' )?
//! publisher         := 'publisher' '<' simple ( ';' simple )* '>'
//! title             := 'title' '<' simple ( ';' simple )* '>'
//! implicit          := 'implicit' '<' identifier ( ';' identifier )* '>'
//! au                := 'au' '<' STRING ( ';' STRING )* '>'
//! ```
//!
//! Every `{ ... }` opens a scope. Assignments land in the innermost open
//! scope and are visible to everything nested inside it.

use std::io::BufRead;

use tdb_model::{Au, Catalog, ModelError, Publisher, PublisherId, SourceLocation, Title, TitleId};
use tdb_store::{KeyPath, KeyedStore, ScopeId, ScopeTree, StoreError};
use tracing::debug;

use crate::config::ParseOptions;
use crate::error::{ParseError, ParseResult, SyntaxError};
use crate::lexer::Lexer;
use crate::token::{Token, TokenKind};

/// Scope key holding the active `implicit` field list.
const IMPLICIT_KEY: &str = "$implicit";

/// Implicit field that absorbs surplus `au` values.
const NAME_FIELD: &str = "name";

/// Parse TDB source from `reader` into a catalog.
pub fn parse<R: BufRead>(reader: R, source_name: &str, options: &ParseOptions) -> ParseResult<Catalog> {
    let lexer = Lexer::new(reader, source_name, options.clone());
    Parser::new(lexer)?.parse()
}

/// Parse TDB source held in memory.
pub fn parse_str(text: &str, source_name: &str, options: &ParseOptions) -> ParseResult<Catalog> {
    parse(text.as_bytes(), source_name, options)
}

/// A scoped value: either an ordinary assignment or an implicit header.
#[derive(Clone, Debug)]
enum Binding {
    Value(String),
    Implicit(Vec<KeyPath>),
}

/// Consumes a [`Lexer`] and produces a [`Catalog`].
pub struct Parser<R> {
    lexer: Lexer<R>,
    token0: Token,
    token1: Option<Token>,
    catalog: Catalog,
    scopes: ScopeTree<Binding>,
    open: Vec<ScopeId>,
    publisher: Option<PublisherId>,
    title: Option<TitleId>,
}

impl<R: BufRead> Parser<R> {
    /// Prime the two-token window from `lexer`.
    pub fn new(mut lexer: Lexer<R>) -> ParseResult<Self> {
        let token0 = lexer.next_token()?;
        let token1 = if lexer.is_finished() {
            None
        } else {
            Some(lexer.next_token()?)
        };
        let scopes = ScopeTree::new();
        let open = vec![scopes.root()];
        Ok(Self {
            lexer,
            token0,
            token1,
            catalog: Catalog::new(),
            scopes,
            open,
            publisher: None,
            title: None,
        })
    }

    /// Parse the whole source.
    pub fn parse(mut self) -> ParseResult<Catalog> {
        while self.at(TokenKind::CurlyOpen) {
            self.publisher_level()?;
        }
        self.expect(TokenKind::EndOfInput)?;
        debug!(
            source = %self.lexer.source_name(),
            publishers = self.catalog.publishers().len(),
            titles = self.catalog.titles().len(),
            aus = self.catalog.aus().len(),
            scopes = self.scopes.len(),
            "parsed TDB source"
        );
        Ok(self.catalog)
    }

    // ---------------------------------------------------------------
    // Block levels
    // ---------------------------------------------------------------

    fn publisher_level(&mut self) -> ParseResult<()> {
        if self.next_is(TokenKind::Publisher) {
            self.block(|p| {
                p.publisher()?;
                p.assignments()?;
                while p.at(TokenKind::CurlyOpen) {
                    p.title_level()?;
                }
                Ok(())
            })
        } else {
            self.block(|p| {
                p.assignments()?;
                while p.at(TokenKind::CurlyOpen) {
                    p.publisher_level()?;
                }
                Ok(())
            })
        }
    }

    fn title_level(&mut self) -> ParseResult<()> {
        if self.next_is(TokenKind::Title) {
            self.block(|p| {
                p.title()?;
                p.assignments()?;
                while p.at(TokenKind::Au) || p.at(TokenKind::CurlyOpen) {
                    p.au_level()?;
                }
                Ok(())
            })
        } else {
            self.block(|p| {
                p.assignments()?;
                while p.at(TokenKind::CurlyOpen) {
                    p.title_level()?;
                }
                Ok(())
            })
        }
    }

    fn au_level(&mut self) -> ParseResult<()> {
        if self.at(TokenKind::Au) {
            return self.au();
        }
        self.block(|p| {
            p.assignments()?;
            while p.at(TokenKind::Au) || p.at(TokenKind::CurlyOpen) {
                p.au_level()?;
            }
            Ok(())
        })
    }

    /// `'{' body '}'` with a fresh scope open for the body.
    fn block<F>(&mut self, body: F) -> ParseResult<()>
    where
        F: FnOnce(&mut Self) -> ParseResult<()>,
    {
        let (line, column) = self.position();
        self.expect(TokenKind::CurlyOpen)?;
        let parent = self.current_scope();
        let scope = self
            .scopes
            .push(parent)
            .map_err(|e| self.store_error(e, line, column))?;
        self.open.push(scope);
        body(self)?;
        self.expect(TokenKind::CurlyClose)?;
        self.open.pop();
        Ok(())
    }

    // ---------------------------------------------------------------
    // Statements
    // ---------------------------------------------------------------

    fn assignments(&mut self) -> ParseResult<()> {
        loop {
            if self.at(TokenKind::Identifier) {
                let (line, column) = self.position();
                let (path, value) = self.simple_assignment()?;
                self.bind(&path, Binding::Value(value), line, column)?;
            } else if self.at(TokenKind::Implicit) {
                self.implicit()?;
            } else {
                return Ok(());
            }
        }
    }

    fn implicit(&mut self) -> ParseResult<()> {
        let (line, column) = self.position();
        self.expect(TokenKind::Implicit)?;
        self.expect(TokenKind::AngleOpen)?;
        let mut fields = vec![self.identifier()?];
        while self.accept(TokenKind::Semicolon)? {
            fields.push(self.identifier()?);
        }
        self.expect(TokenKind::AngleClose)?;
        let key = KeyPath::leaf(IMPLICIT_KEY).map_err(|e| self.store_error(e, line, column))?;
        self.bind(&key, Binding::Implicit(fields), line, column)
    }

    fn publisher(&mut self) -> ParseResult<()> {
        let store = self.declaration(TokenKind::Publisher)?;
        self.publisher = Some(self.catalog.add_publisher(Publisher::new(store)));
        Ok(())
    }

    fn title(&mut self) -> ParseResult<()> {
        let (line, column) = self.position();
        let store = self.declaration(TokenKind::Title)?;
        let Some(publisher) = self.publisher else {
            return Err(self.syntax("title outside of a publisher block", line, column));
        };
        let id = self
            .catalog
            .add_title(Title::new(store, publisher))
            .map_err(|e| self.model_error(e, line, column))?;
        self.title = Some(id);
        Ok(())
    }

    /// `keyword '<' simple ( ';' simple )* '>'` collected into a store.
    fn declaration(&mut self, keyword: TokenKind) -> ParseResult<KeyedStore<String>> {
        self.expect(keyword)?;
        self.expect(TokenKind::AngleOpen)?;
        let mut store = KeyedStore::new();
        loop {
            let (line, column) = self.position();
            let (path, value) = self.simple_assignment()?;
            store
                .set(&path, value)
                .map_err(|e| self.store_error(e, line, column))?;
            if !self.accept(TokenKind::Semicolon)? {
                break;
            }
        }
        self.expect(TokenKind::AngleClose)?;
        Ok(store)
    }

    fn au(&mut self) -> ParseResult<()> {
        let (line, column) = self.position();
        self.expect(TokenKind::Au)?;
        self.expect(TokenKind::AngleOpen)?;
        let mut values = vec![self.string()?];
        while self.accept(TokenKind::Semicolon)? {
            values.push(self.string()?);
        }
        self.expect(TokenKind::AngleClose)?;

        let scope = self.current_scope();
        let key = KeyPath::leaf(IMPLICIT_KEY).map_err(|e| self.store_error(e, line, column))?;
        let fields = {
            let view = self
                .scopes
                .scope(scope)
                .map_err(|e| self.store_error(e, line, column))?;
            match view.get(&key) {
                Some(Binding::Implicit(fields)) => fields.clone(),
                _ => return Err(self.syntax("no implicit statement in scope", line, column)),
            }
        };

        let given = values.len();
        let fold = self.lexer.options().fold_surplus_into_name;
        let Some(pairs) = assign_implicit(&fields, values, fold) else {
            let message = format!("expected {} implicit assignments but got {}", fields.len(), given);
            return Err(self.syntax(message, line, column));
        };

        let au_scope = self
            .scopes
            .push(scope)
            .map_err(|e| self.store_error(e, line, column))?;
        for (path, value) in pairs {
            self.bind_in(au_scope, &path, Binding::Value(value), line, column)?;
        }
        let store = self
            .scopes
            .scope(au_scope)
            .and_then(|view| view.flatten())
            .map_err(|e| self.store_error(e, line, column))?
            .filter_map(|binding| match binding {
                Binding::Value(value) => Some(value.clone()),
                Binding::Implicit(_) => None,
            });

        let Some(title) = self.title else {
            return Err(self.syntax("au outside of a title block", line, column));
        };
        let location = SourceLocation::new(self.lexer.source_name(), line, column);
        let au = Au::new(store, title, location).map_err(|e| self.model_error(e, line, column))?;
        self.catalog
            .add_au(au)
            .map_err(|e| self.model_error(e, line, column))
    }

    // ---------------------------------------------------------------
    // Terminals
    // ---------------------------------------------------------------

    fn simple_assignment(&mut self) -> ParseResult<(KeyPath, String)> {
        let path = self.identifier()?;
        self.expect(TokenKind::Equal)?;
        let value = self.string()?;
        Ok((path, value))
    }

    fn identifier(&mut self) -> ParseResult<KeyPath> {
        let (line, column) = self.position();
        let mut segments = vec![self.value_of(TokenKind::Identifier)?];
        if self.accept(TokenKind::SquareOpen)? {
            segments.push(self.value_of(TokenKind::Identifier)?);
            self.expect(TokenKind::SquareClose)?;
        }
        KeyPath::new(segments).map_err(|e| self.store_error(e, line, column))
    }

    fn string(&mut self) -> ParseResult<String> {
        self.value_of(TokenKind::String)
    }

    fn value_of(&mut self, kind: TokenKind) -> ParseResult<String> {
        let value = self.token0.text().to_string();
        self.expect(kind)?;
        Ok(value)
    }

    // ---------------------------------------------------------------
    // Token window
    // ---------------------------------------------------------------

    fn at(&self, kind: TokenKind) -> bool {
        self.token0.kind == kind
    }

    fn next_is(&self, kind: TokenKind) -> bool {
        self.token1.as_ref().is_some_and(|t| t.kind == kind)
    }

    fn position(&self) -> (usize, usize) {
        (self.token0.line, self.token0.column)
    }

    fn advance(&mut self) -> ParseResult<()> {
        let following = if self.lexer.is_finished() {
            None
        } else {
            Some(self.lexer.next_token()?)
        };
        if let Some(next) = std::mem::replace(&mut self.token1, following) {
            self.token0 = next;
        }
        Ok(())
    }

    fn accept(&mut self, kind: TokenKind) -> ParseResult<bool> {
        if self.at(kind) {
            self.advance()?;
            Ok(true)
        } else {
            Ok(false)
        }
    }

    fn expect(&mut self, kind: TokenKind) -> ParseResult<()> {
        if self.accept(kind)? {
            return Ok(());
        }
        let message = format!("expected {} but got {}", kind, self.token0.kind);
        let (line, column) = self.position();
        Err(self.syntax(message, line, column))
    }

    // ---------------------------------------------------------------
    // Scopes and errors
    // ---------------------------------------------------------------

    fn current_scope(&self) -> ScopeId {
        self.open.last().copied().unwrap_or_else(|| self.scopes.root())
    }

    fn bind(&mut self, path: &KeyPath, binding: Binding, line: usize, column: usize) -> ParseResult<()> {
        let scope = self.current_scope();
        self.bind_in(scope, path, binding, line, column)
    }

    fn bind_in(
        &mut self,
        scope: ScopeId,
        path: &KeyPath,
        binding: Binding,
        line: usize,
        column: usize,
    ) -> ParseResult<()> {
        let result = self.scopes.set(scope, path, binding);
        result.map_err(|e| self.store_error(e, line, column))
    }

    fn syntax(&self, message: impl Into<String>, line: usize, column: usize) -> ParseError {
        SyntaxError::new(message, self.lexer.source_name(), line, column).into()
    }

    fn store_error(&self, error: StoreError, line: usize, column: usize) -> ParseError {
        ParseError::Store {
            error,
            source_name: self.lexer.source_name().to_string(),
            line,
            column,
        }
    }

    fn model_error(&self, error: ModelError, line: usize, column: usize) -> ParseError {
        ParseError::Model {
            error,
            source_name: self.lexer.source_name().to_string(),
            line,
            column,
        }
    }
}

/// Pair implicit fields with `au` values, or `None` on a count mismatch.
///
/// With `fold`, surplus values are folded back into the `name` field,
/// rejoined with `;`, when `name` is one of the fields.
fn assign_implicit(
    fields: &[KeyPath],
    mut values: Vec<String>,
    fold: bool,
) -> Option<Vec<(KeyPath, String)>> {
    if fold && values.len() > fields.len() {
        let at = fields.iter().position(|f| f.is_leaf_named(NAME_FIELD))?;
        let surplus = values.len() - fields.len();
        let name = values.drain(at..=at + surplus).collect::<Vec<_>>().join(";");
        values.insert(at, name);
    }
    if values.len() != fields.len() {
        return None;
    }
    Some(fields.iter().cloned().zip(values).collect())
}

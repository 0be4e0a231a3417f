//! Reader for Title Database (TDB) source text.
//!
//! TDB source nests `{ ... }` blocks. Assignments made in a block are
//! inherited by every block inside it, and `au <...>` statements read their
//! values positionally according to the nearest `implicit <...>` header:
//!
//! ```text
//! {
//!   publisher < name = Example Press >
//!   plugin = org.lockss.plugin.example.ExamplePlugin
//!   {
//!     title < name = Example Journal ; issn = 1234-5678 >
//!     param[base_url] = http://www.example.com/
//!     implicit < status ; year ; name ; param[volume] >
//!     au < released ; 2001 ; Example Journal Volume 1 ; 1 >
//!     au < released ; 2002 ; Example Journal Volume 2 ; 2 >
//!   }
//! }
//! ```
//!
//! # Key Types
//!
//! - [`Lexer`] -- turns source lines into [`Token`]s
//! - [`Parser`] -- builds a [`Catalog`](tdb_model::Catalog) from tokens
//! - [`ParseOptions`] -- echo switches and the lenient `name` arity rule
//! - [`SyntaxError`] -- a located lexical or syntactic error

pub mod config;
pub mod error;
pub mod lexer;
pub mod parser;
pub mod token;

pub use config::ParseOptions;
pub use error::{ParseError, ParseResult, SyntaxError};
pub use lexer::Lexer;
pub use parser::{parse, parse_str, Parser};
pub use token::{Token, TokenKind};

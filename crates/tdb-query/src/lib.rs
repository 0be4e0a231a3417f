//! Query language for filtering a TDB [`Catalog`](tdb_model::Catalog).
//!
//! A query is a boolean expression over AU fields:
//!
//! ```text
//! status is "released" and (year ~ "^200" or title:issn is set)
//! ```
//!
//! Queries compile once into a [`Predicate`] tree; unknown fields and bad
//! regular expressions are reported at compile time, before any AU is seen.
//!
//! # Key Types
//!
//! - [`Predicate`] -- compiled query, evaluated against an AU and its context
//! - [`Field`] -- the closed set of queryable AU, title and publisher values
//! - [`StatusClass`] -- built-in production / testing status filters
//! - [`QueryOptions`] -- query text, status class and echo switches
//! - [`reprocess`] -- apply options to a catalog

pub mod class;
pub mod config;
pub mod error;
pub mod field;
pub mod filter;
pub mod lexer;
pub mod parser;
pub mod predicate;
pub mod token;

pub use class::StatusClass;
pub use config::QueryOptions;
pub use error::{QueryError, QueryResult};
pub use field::{AuField, Field, PublisherField, TitleField};
pub use filter::{filter, reprocess};
pub use lexer::QueryLexer;
pub use parser::compile;
pub use predicate::{Comparison, Predicate};
pub use token::{QueryToken, QueryTokenKind};

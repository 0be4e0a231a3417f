//! High-level SDK for the Title Database.
//!
//! [`Tdb`] reads TDB source into a [`Catalog`] and applies the configured
//! query and status class in one call. This is the main entry point for
//! tools that consume the catalog.

pub mod config;
pub mod error;
pub mod tdb;

pub use config::TdbConfig;
pub use error::{SdkError, SdkResult};
pub use tdb::Tdb;

// Re-export key types
pub use tdb_model::{Au, AuContext, AuStatus, Catalog, Publisher, SourceLocation, Title};
pub use tdb_parse::ParseOptions;
pub use tdb_query::{Predicate, QueryOptions, StatusClass};
pub use tdb_store::{KeyPath, KeyedStore};

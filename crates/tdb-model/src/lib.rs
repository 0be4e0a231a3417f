//! Catalog entities for the Title Database.
//!
//! A parsed TDB source becomes a [`Catalog`]: publishers, titles and
//! archival units in first-definition order. Titles point at their
//! publisher and AUs point at their title by index into the catalog.
//!
//! # Key Types
//!
//! - [`Publisher`] -- a named publisher
//! - [`Title`] -- a journal or book title belonging to a publisher
//! - [`Au`] -- an archival unit with resolved values and its AUID
//! - [`AuStatus`] -- the known AU lifecycle states
//! - [`Catalog`] -- the append-only collection of all three
//! - [`AuContext`] -- an AU together with its title and publisher
//!
//! The [`auid`] module holds the canonical identifier encoding.

pub mod au;
pub mod auid;
pub mod catalog;
pub mod error;
pub mod publisher;
pub mod status;
pub mod title;

pub use au::{Au, SourceLocation};
pub use catalog::{AuContext, Catalog, PublisherId, TitleId};
pub use error::{ModelError, ModelResult};
pub use publisher::Publisher;
pub use status::AuStatus;
pub use title::Title;

// Re-export the store types entities are built from.
pub use tdb_store::{KeyPath, KeyedStore};

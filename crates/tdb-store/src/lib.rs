//! Hierarchical key/value storage for the Title Database.
//!
//! Every TDB entity is backed by a write-once map keyed by path segments.
//! A key written as `param[base_url]` in TDB source is the two-segment path
//! `["param", "base_url"]`; a bare key such as `status` is a one-segment
//! path.
//!
//! # Key Types
//!
//! - [`KeyPath`] -- a non-empty sequence of key segments
//! - [`KeyedStore`] -- a write-once tree of [`Node`]s addressed by [`KeyPath`]
//! - [`ScopeTree`] -- an arena of nested scopes, each owning a [`KeyedStore`]
//! - [`ScopedStore`] -- a read view of one scope that falls back to its parents
//!
//! # Design Rules
//!
//! 1. A path is assigned at most once per store. Re-assigning fails.
//! 2. A path is either a leaf or a group, never both.
//! 3. Child scopes shadow parent scopes key-by-key; parents are never mutated
//!    through a child.

pub mod error;
pub mod keyed;
pub mod path;
pub mod scoped;

pub use error::{StoreError, StoreResult};
pub use keyed::{KeyedStore, Node};
pub use path::KeyPath;
pub use scoped::{ScopeId, ScopeTree, ScopedStore};

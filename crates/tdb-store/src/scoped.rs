//! Lexically scoped stores.
//!
//! A [`ScopeTree`] owns every scope created while reading one TDB source.
//! Scopes refer to their parent by [`ScopeId`], an index into the tree, so a
//! child never owns its parent and the whole tree is dropped at once.
//!
//! Lookups go through a [`ScopedStore`] view: the local store is consulted
//! first, then each ancestor in turn.

use std::collections::BTreeMap;
use std::fmt;

use crate::error::{StoreError, StoreResult};
use crate::keyed::{overlay, KeyedStore, Node};
use crate::path::KeyPath;

/// Index of a scope within its [`ScopeTree`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ScopeId(usize);

impl ScopeId {
    /// The raw arena index.
    pub fn index(self) -> usize {
        self.0
    }
}

impl fmt::Display for ScopeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "scope#{}", self.0)
    }
}

#[derive(Clone, Debug)]
struct Scope<V> {
    store: KeyedStore<V>,
    parent: Option<ScopeId>,
}

/// Arena of nested scopes rooted at one empty top-level scope.
#[derive(Clone, Debug)]
pub struct ScopeTree<V> {
    scopes: Vec<Scope<V>>,
}

impl<V> Default for ScopeTree<V> {
    fn default() -> Self {
        Self::new()
    }
}

impl<V> ScopeTree<V> {
    /// Create a tree holding only the empty root scope.
    pub fn new() -> Self {
        Self {
            scopes: vec![Scope {
                store: KeyedStore::new(),
                parent: None,
            }],
        }
    }

    /// The top-level scope.
    pub fn root(&self) -> ScopeId {
        ScopeId(0)
    }

    /// Number of scopes, including the root.
    pub fn len(&self) -> usize {
        self.scopes.len()
    }

    /// Always `false`: the root scope exists for the life of the tree.
    pub fn is_empty(&self) -> bool {
        self.scopes.is_empty()
    }

    /// Open a new empty scope below `parent`.
    pub fn push(&mut self, parent: ScopeId) -> StoreResult<ScopeId> {
        self.check(parent)?;
        let id = ScopeId(self.scopes.len());
        self.scopes.push(Scope {
            store: KeyedStore::new(),
            parent: Some(parent),
        });
        Ok(id)
    }

    /// Assign `value` to `path` in the local store of `scope`.
    ///
    /// Write-once applies per scope: the same path may be assigned again in
    /// a child scope, shadowing the parent's value there.
    pub fn set(&mut self, scope: ScopeId, path: &KeyPath, value: V) -> StoreResult<()> {
        self.scopes
            .get_mut(scope.0)
            .ok_or(StoreError::UnknownScope(scope.0))?
            .store
            .set(path, value)
    }

    /// A read view of `scope` and its ancestors.
    pub fn scope(&self, scope: ScopeId) -> StoreResult<ScopedStore<'_, V>> {
        self.check(scope)?;
        Ok(ScopedStore {
            tree: self,
            id: scope,
        })
    }

    fn check(&self, scope: ScopeId) -> StoreResult<()> {
        if scope.0 < self.scopes.len() {
            Ok(())
        } else {
            Err(StoreError::UnknownScope(scope.0))
        }
    }
}

/// A scope's local store chained to its ancestors for lookup.
pub struct ScopedStore<'a, V> {
    tree: &'a ScopeTree<V>,
    id: ScopeId,
}

impl<V> Clone for ScopedStore<'_, V> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<V> Copy for ScopedStore<'_, V> {}

impl<V> fmt::Debug for ScopedStore<'_, V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ScopedStore")
            .field("id", &self.id)
            .field("local_len", &self.local().len())
            .field("depth", &self.chain().count())
            .finish()
    }
}

impl<'a, V> ScopedStore<'a, V> {
    /// This scope's identifier.
    pub fn id(&self) -> ScopeId {
        self.id
    }

    /// Values assigned directly in this scope.
    pub fn local(&self) -> &'a KeyedStore<V> {
        &self.tree.scopes[self.id.0].store
    }

    /// The enclosing scope, if any.
    pub fn parent(&self) -> Option<ScopedStore<'a, V>> {
        self.tree.scopes[self.id.0].parent.map(|id| ScopedStore {
            tree: self.tree,
            id,
        })
    }

    /// This scope followed by each ancestor, innermost first.
    pub fn chain(&self) -> impl Iterator<Item = ScopedStore<'a, V>> {
        std::iter::successors(Some(*self), |scope| scope.parent())
    }

    /// The value at `path`, from the innermost scope that defines the path.
    ///
    /// A scope where the path is a group hides ancestor values at that path.
    pub fn get(&self, path: &KeyPath) -> Option<&'a V> {
        self.chain()
            .find_map(|scope| scope.local().node(path))
            .and_then(Node::as_leaf)
    }

    /// The children one level below `prefix`, merged across the chain.
    ///
    /// Inner scopes shadow outer scopes at each leaf; nested groups merge
    /// key-by-key rather than replacing each other wholesale.
    pub fn get_prefix(&self, prefix: &KeyPath) -> StoreResult<BTreeMap<String, Node<V>>>
    where
        V: Clone,
    {
        let scopes: Vec<_> = self.chain().collect();
        let mut merged = BTreeMap::new();
        for scope in scopes.iter().rev() {
            let local = scope.local().get_prefix(prefix)?;
            let mut at = prefix.segments().to_vec();
            overlay(&mut merged, &local, &mut at)?;
        }
        Ok(merged)
    }

    /// Collapse the chain into one store holding every visible value.
    pub fn flatten(&self) -> StoreResult<KeyedStore<V>>
    where
        V: Clone,
    {
        let scopes: Vec<_> = self.chain().collect();
        let mut merged = BTreeMap::new();
        for scope in scopes.iter().rev() {
            overlay(&mut merged, scope.local().root(), &mut Vec::new())?;
        }
        Ok(KeyedStore::from_root(merged))
    }
}

//! The write-once keyed store.
//!
//! A [`KeyedStore`] is a tree: each key segment selects either a leaf value
//! or a group of further segments. Groups are created implicitly when a
//! deeper path is written, so `param[a]` and `param[b]` share the `param`
//! group.

use std::collections::btree_map::Entry;
use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::error::{StoreError, StoreResult};
use crate::path::{render, KeyPath};

/// One position in a keyed store.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum Node<V> {
    /// A value assigned to an exact path.
    Leaf(V),
    /// Child segments below a path prefix.
    Group(BTreeMap<String, Node<V>>),
}

impl<V> Node<V> {
    /// The leaf value, if this node is a leaf.
    pub fn as_leaf(&self) -> Option<&V> {
        match self {
            Node::Leaf(value) => Some(value),
            Node::Group(_) => None,
        }
    }

    /// The children, if this node is a group.
    pub fn as_group(&self) -> Option<&BTreeMap<String, Node<V>>> {
        match self {
            Node::Leaf(_) => None,
            Node::Group(children) => Some(children),
        }
    }
}

/// A hierarchical, write-once map keyed by [`KeyPath`].
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct KeyedStore<V> {
    root: BTreeMap<String, Node<V>>,
    len: usize,
}

impl<V> Default for KeyedStore<V> {
    fn default() -> Self {
        Self::new()
    }
}

impl<V> KeyedStore<V> {
    /// Create an empty store.
    pub fn new() -> Self {
        Self {
            root: BTreeMap::new(),
            len: 0,
        }
    }

    /// Number of leaf values in the store.
    pub fn len(&self) -> usize {
        self.len
    }

    /// Returns `true` if no value has been assigned.
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    // ---------------------------------------------------------------
    // Writes
    // ---------------------------------------------------------------

    /// Assign `value` to `path`.
    ///
    /// Fails with [`StoreError::AlreadyDefined`] if the exact path already
    /// holds a value, and with [`StoreError::ShapeConflict`] if a prefix of
    /// the path is a leaf or the path itself is a group.
    pub fn set(&mut self, path: &KeyPath, value: V) -> StoreResult<()> {
        let segments = path.segments();
        let (last, parents) = match segments.split_last() {
            Some(split) => split,
            None => {
                return Err(StoreError::MalformedKey {
                    key: String::new(),
                    reason: "key must have at least one segment".into(),
                })
            }
        };

        let mut map = &mut self.root;
        for (depth, segment) in parents.iter().enumerate() {
            let node = map
                .entry(segment.clone())
                .or_insert_with(|| Node::Group(BTreeMap::new()));
            map = match node {
                Node::Group(children) => children,
                Node::Leaf(_) => {
                    return Err(StoreError::ShapeConflict {
                        path: render(&segments[..=depth]),
                    })
                }
            };
        }

        match map.entry(last.clone()) {
            Entry::Occupied(existing) => match existing.get() {
                Node::Leaf(_) => Err(StoreError::AlreadyDefined {
                    path: path.to_string(),
                }),
                Node::Group(_) => Err(StoreError::ShapeConflict {
                    path: path.to_string(),
                }),
            },
            Entry::Vacant(slot) => {
                slot.insert(Node::Leaf(value));
                self.len += 1;
                Ok(())
            }
        }
    }

    // ---------------------------------------------------------------
    // Reads
    // ---------------------------------------------------------------

    /// The node at `path`, leaf or group.
    pub fn node(&self, path: &KeyPath) -> Option<&Node<V>> {
        let (first, rest) = path.segments().split_first()?;
        let mut node = self.root.get(first)?;
        for segment in rest {
            node = node.as_group()?.get(segment)?;
        }
        Some(node)
    }

    /// The value at exactly `path`. Groups are not values.
    pub fn get(&self, path: &KeyPath) -> Option<&V> {
        self.node(path)?.as_leaf()
    }

    /// The immediate children one level below `prefix`.
    ///
    /// An absent prefix yields an empty map. A prefix that names a leaf is a
    /// [`StoreError::ShapeConflict`].
    pub fn get_prefix(&self, prefix: &KeyPath) -> StoreResult<BTreeMap<String, Node<V>>>
    where
        V: Clone,
    {
        match self.node(prefix) {
            None => Ok(BTreeMap::new()),
            Some(Node::Group(children)) => Ok(children.clone()),
            Some(Node::Leaf(_)) => Err(StoreError::ShapeConflict {
                path: prefix.to_string(),
            }),
        }
    }

    /// The leaf values one level below `prefix`, skipping nested groups.
    pub fn leaf_values(&self, prefix: &KeyPath) -> StoreResult<BTreeMap<String, V>>
    where
        V: Clone,
    {
        Ok(self
            .get_prefix(prefix)?
            .into_iter()
            .filter_map(|(key, node)| match node {
                Node::Leaf(value) => Some((key, value)),
                Node::Group(_) => None,
            })
            .collect())
    }

    /// Every leaf with its full path, in key order.
    pub fn entries(&self) -> Vec<(KeyPath, &V)> {
        let mut out = Vec::with_capacity(self.len);
        let mut at = Vec::new();
        collect_leaves(&self.root, &mut at, &mut out);
        out
    }

    /// A store holding the leaves for which `f` returns `Some`.
    pub fn filter_map<W, F>(&self, mut f: F) -> KeyedStore<W>
    where
        F: FnMut(&V) -> Option<W>,
    {
        let root = filter_map_nodes(&self.root, &mut f);
        KeyedStore::from_root(root)
    }

    pub(crate) fn root(&self) -> &BTreeMap<String, Node<V>> {
        &self.root
    }

    pub(crate) fn from_root(root: BTreeMap<String, Node<V>>) -> Self {
        let len = count_leaves(&root);
        Self { root, len }
    }
}

fn collect_leaves<'a, V>(
    map: &'a BTreeMap<String, Node<V>>,
    at: &mut Vec<String>,
    out: &mut Vec<(KeyPath, &'a V)>,
) {
    for (key, node) in map {
        at.push(key.clone());
        match node {
            Node::Leaf(value) => {
                // Segments come from existing non-empty keys.
                if let Ok(path) = KeyPath::new(at.iter().cloned()) {
                    out.push((path, value));
                }
            }
            Node::Group(children) => collect_leaves(children, at, out),
        }
        at.pop();
    }
}

fn filter_map_nodes<V, W, F>(map: &BTreeMap<String, Node<V>>, f: &mut F) -> BTreeMap<String, Node<W>>
where
    F: FnMut(&V) -> Option<W>,
{
    let mut out = BTreeMap::new();
    for (key, node) in map {
        match node {
            Node::Leaf(value) => {
                if let Some(mapped) = f(value) {
                    out.insert(key.clone(), Node::Leaf(mapped));
                }
            }
            Node::Group(children) => {
                let children = filter_map_nodes(children, f);
                if !children.is_empty() {
                    out.insert(key.clone(), Node::Group(children));
                }
            }
        }
    }
    out
}

fn count_leaves<V>(map: &BTreeMap<String, Node<V>>) -> usize {
    map.values()
        .map(|node| match node {
            Node::Leaf(_) => 1,
            Node::Group(children) => count_leaves(children),
        })
        .sum()
}

/// Overlay `top` onto `base`, letting `top` win at each leaf.
///
/// Groups present on both sides are merged key-by-key. A leaf on one side
/// meeting a group on the other is a [`StoreError::ShapeConflict`].
pub(crate) fn overlay<V: Clone>(
    base: &mut BTreeMap<String, Node<V>>,
    top: &BTreeMap<String, Node<V>>,
    at: &mut Vec<String>,
) -> StoreResult<()> {
    for (key, node) in top {
        at.push(key.clone());
        match base.entry(key.clone()) {
            Entry::Vacant(slot) => {
                slot.insert(node.clone());
            }
            Entry::Occupied(mut existing) => {
                let current = existing.get_mut();
                if let (Node::Group(below), Node::Group(above)) = (&mut *current, node) {
                    overlay(below, above, at)?;
                } else if matches!((&*current, node), (Node::Leaf(_), Node::Leaf(_))) {
                    *current = node.clone();
                } else {
                    return Err(StoreError::ShapeConflict { path: render(at) });
                }
            }
        }
        at.pop();
    }
    Ok(())
}

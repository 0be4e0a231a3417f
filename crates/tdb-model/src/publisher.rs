use serde::{Deserialize, Serialize};
use tdb_store::{KeyPath, KeyedStore};

/// A publisher, as declared by a `publisher <...>` statement.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Publisher {
    store: KeyedStore<String>,
}

impl Publisher {
    /// Wrap the values assigned in the publisher statement.
    pub fn new(store: KeyedStore<String>) -> Self {
        Self { store }
    }

    /// The publisher's name.
    pub fn name(&self) -> Option<&str> {
        self.value("name")
    }

    /// Any assigned value by path.
    pub fn get(&self, path: &KeyPath) -> Option<&str> {
        self.store.get(path).map(String::as_str)
    }

    /// The backing store.
    pub fn store(&self) -> &KeyedStore<String> {
        &self.store
    }

    fn value(&self, key: &str) -> Option<&str> {
        let path = KeyPath::leaf(key).ok()?;
        self.get(&path)
    }
}

use serde::{Deserialize, Serialize};
use tdb_store::{KeyPath, KeyedStore};

use crate::catalog::PublisherId;

/// Title type used when a title does not assign `type`.
pub const DEFAULT_TITLE_TYPE: &str = "journal";

/// A journal or book title, as declared by a `title <...>` statement.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Title {
    store: KeyedStore<String>,
    publisher: PublisherId,
}

impl Title {
    /// Wrap the values assigned in the title statement.
    pub fn new(store: KeyedStore<String>, publisher: PublisherId) -> Self {
        Self { store, publisher }
    }

    /// The publisher this title belongs to.
    pub fn publisher_id(&self) -> PublisherId {
        self.publisher
    }

    pub(crate) fn set_publisher_id(&mut self, publisher: PublisherId) {
        self.publisher = publisher;
    }

    pub fn name(&self) -> Option<&str> {
        self.value("name")
    }

    pub fn doi(&self) -> Option<&str> {
        self.value("doi")
    }

    pub fn eisbn(&self) -> Option<&str> {
        self.value("eisbn")
    }

    pub fn eissn(&self) -> Option<&str> {
        self.value("eissn")
    }

    pub fn isbn(&self) -> Option<&str> {
        self.value("isbn")
    }

    pub fn issn(&self) -> Option<&str> {
        self.value("issn")
    }

    pub fn issnl(&self) -> Option<&str> {
        self.value("issnl")
    }

    /// The title type, `journal` unless assigned.
    pub fn title_type(&self) -> &str {
        self.value("type").unwrap_or(DEFAULT_TITLE_TYPE)
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

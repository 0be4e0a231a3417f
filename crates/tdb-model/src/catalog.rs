//! The catalog: publishers, titles and AUs in first-definition order.
//!
//! The catalog is append-only. Titles and AUs refer to their parent by a
//! typed index ([`PublisherId`], [`TitleId`]) that is only handed out by the
//! catalog itself, so a reference is always valid for the catalog that
//! issued it.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::au::Au;
use crate::error::{ModelError, ModelResult};
use crate::publisher::Publisher;
use crate::title::Title;

/// Index of a publisher within a [`Catalog`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct PublisherId(usize);

/// Index of a title within a [`Catalog`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct TitleId(usize);

impl PublisherId {
    pub fn index(self) -> usize {
        self.0
    }
}

impl TitleId {
    pub fn index(self) -> usize {
        self.0
    }
}

/// An AU together with the title and publisher it belongs to.
#[derive(Clone, Copy, Debug)]
pub struct AuContext<'a> {
    pub au: &'a Au,
    pub title: Option<&'a Title>,
    pub publisher: Option<&'a Publisher>,
}

/// Append-only collection of catalog entities.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Catalog {
    publishers: Vec<Publisher>,
    titles: Vec<Title>,
    aus: Vec<Au>,
}

impl Catalog {
    /// Create an empty catalog.
    pub fn new() -> Self {
        Self::default()
    }

    // ---------------------------------------------------------------
    // Appends
    // ---------------------------------------------------------------

    /// Record a publisher and return its index.
    pub fn add_publisher(&mut self, publisher: Publisher) -> PublisherId {
        self.publishers.push(publisher);
        PublisherId(self.publishers.len() - 1)
    }

    /// Record a title. Its publisher must already be in this catalog.
    pub fn add_title(&mut self, title: Title) -> ModelResult<TitleId> {
        let publisher = title.publisher_id().0;
        if publisher >= self.publishers.len() {
            return Err(ModelError::UnknownPublisher(publisher));
        }
        self.titles.push(title);
        Ok(TitleId(self.titles.len() - 1))
    }

    /// Record an AU. Its title must already be in this catalog.
    pub fn add_au(&mut self, au: Au) -> ModelResult<()> {
        let title = au.title_id().0;
        if title >= self.titles.len() {
            return Err(ModelError::UnknownTitle(title));
        }
        self.aus.push(au);
        Ok(())
    }

    // ---------------------------------------------------------------
    // Reads
    // ---------------------------------------------------------------

    pub fn publishers(&self) -> &[Publisher] {
        &self.publishers
    }

    pub fn titles(&self) -> &[Title] {
        &self.titles
    }

    pub fn aus(&self) -> &[Au] {
        &self.aus
    }

    pub fn publisher(&self, id: PublisherId) -> Option<&Publisher> {
        self.publishers.get(id.0)
    }

    pub fn title(&self, id: TitleId) -> Option<&Title> {
        self.titles.get(id.0)
    }

    /// The title an AU belongs to.
    pub fn title_of(&self, au: &Au) -> Option<&Title> {
        self.title(au.title_id())
    }

    /// The publisher a title belongs to.
    pub fn publisher_of(&self, title: &Title) -> Option<&Publisher> {
        self.publisher(title.publisher_id())
    }

    /// The context of one AU.
    pub fn context<'a>(&'a self, au: &'a Au) -> AuContext<'a> {
        let title = self.title_of(au);
        AuContext {
            au,
            title,
            publisher: title.and_then(|t| self.publisher_of(t)),
        }
    }

    /// Every AU with its context, in catalog order.
    pub fn contexts(&self) -> impl Iterator<Item = AuContext<'_>> {
        self.aus.iter().map(move |au| self.context(au))
    }

    /// Returns `true` if the catalog holds no entities at all.
    pub fn is_empty(&self) -> bool {
        self.publishers.is_empty() && self.titles.is_empty() && self.aus.is_empty()
    }

    // ---------------------------------------------------------------
    // Filtering
    // ---------------------------------------------------------------

    /// A new catalog holding the AUs accepted by `keep`.
    ///
    /// The titles and publishers of the kept AUs come along, each once, in
    /// the order they are first reached. Entities reached by no kept AU are
    /// dropped.
    pub fn retain_aus<F>(&self, mut keep: F) -> Catalog
    where
        F: FnMut(&AuContext<'_>) -> bool,
    {
        let mut out = Catalog::new();
        let mut publisher_map: HashMap<PublisherId, PublisherId> = HashMap::new();
        let mut title_map: HashMap<TitleId, TitleId> = HashMap::new();

        for ctx in self.contexts() {
            if !keep(&ctx) {
                continue;
            }
            let Some(title) = ctx.title else {
                continue;
            };
            let old_title = ctx.au.title_id();
            let new_title = match title_map.get(&old_title) {
                Some(id) => *id,
                None => {
                    let old_publisher = title.publisher_id();
                    let new_publisher = match publisher_map.get(&old_publisher) {
                        Some(id) => *id,
                        None => {
                            let Some(publisher) = ctx.publisher else {
                                continue;
                            };
                            let id = out.add_publisher(publisher.clone());
                            publisher_map.insert(old_publisher, id);
                            id
                        }
                    };
                    let mut title = title.clone();
                    title.set_publisher_id(new_publisher);
                    out.titles.push(title);
                    let id = TitleId(out.titles.len() - 1);
                    title_map.insert(old_title, id);
                    id
                }
            };
            let mut au = ctx.au.clone();
            au.set_title_id(new_title);
            out.aus.push(au);
        }
        out
    }
}

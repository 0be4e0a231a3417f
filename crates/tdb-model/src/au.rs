//! Archival units.
//!
//! An [`Au`] is built once, at the point its `au <...>` statement is read,
//! from every value visible in its scope chain. Everything it exposes is
//! resolved at construction; nothing refers back to the scopes afterwards.

use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};
use tdb_store::{KeyPath, KeyedStore};

use crate::auid;
use crate::catalog::TitleId;
use crate::error::ModelResult;
use crate::status::AuStatus;

/// Where an entity was declared in TDB source.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SourceLocation {
    pub source_name: String,
    pub line: usize,
    pub column: usize,
}

impl SourceLocation {
    pub fn new(source_name: impl Into<String>, line: usize, column: usize) -> Self {
        Self {
            source_name: source_name.into(),
            line,
            column,
        }
    }
}

impl fmt::Display for SourceLocation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.source_name, self.line)
    }
}

/// An archival unit with its inherited values resolved.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Au {
    store: KeyedStore<String>,
    title: TitleId,
    location: SourceLocation,
    params: BTreeMap<String, String>,
    nondef_params: BTreeMap<String, String>,
    attrs: BTreeMap<String, String>,
    plugin: Option<String>,
    auid: Option<String>,
    auidplus: Option<String>,
}

impl Au {
    /// Build an AU from its resolved values.
    ///
    /// Fails if `param`, `nondefparam` or `attr` was assigned as a plain value
    /// rather than as a bracketed group.
    pub fn new(
        store: KeyedStore<String>,
        title: TitleId,
        location: SourceLocation,
    ) -> ModelResult<Self> {
        let params = store.leaf_values(&KeyPath::leaf("param")?)?;
        let nondef_params = store.leaf_values(&KeyPath::leaf("nondefparam")?)?;
        let attrs = store.leaf_values(&KeyPath::leaf("attr")?)?;

        let lookup = |key: &str| -> ModelResult<Option<String>> {
            Ok(store.get(&KeyPath::leaf(key)?).cloned())
        };
        let plugin = match lookup("plugin")? {
            Some(plugin) => Some(plugin),
            None => match (lookup("pluginPrefix")?, lookup("pluginSuffix")?) {
                (Some(prefix), Some(suffix)) => Some(prefix + &suffix),
                _ => None,
            },
        };

        let auid = match &plugin {
            Some(plugin) if !params.is_empty() => Some(auid::auid(plugin, &params)),
            _ => None,
        };
        let auidplus = match &plugin {
            Some(plugin) if !params.is_empty() => {
                Some(auid::auidplus(plugin, &params, &nondef_params))
            }
            _ => None,
        };

        Ok(Self {
            store,
            title,
            location,
            params,
            nondef_params,
            attrs,
            plugin,
            auid,
            auidplus,
        })
    }

    /// The title this AU belongs to.
    pub fn title_id(&self) -> TitleId {
        self.title
    }

    pub(crate) fn set_title_id(&mut self, title: TitleId) {
        self.title = title;
    }

    /// Where the `au` statement appeared.
    pub fn location(&self) -> &SourceLocation {
        &self.location
    }

    // ---------------------------------------------------------------
    // Identity
    // ---------------------------------------------------------------

    /// The canonical identifier.
    ///
    /// Present only when a plugin is known and at least one defining
    /// parameter is assigned.
    pub fn auid(&self) -> Option<&str> {
        self.auid.as_deref()
    }

    /// The canonical identifier extended with non-defining parameters.
    pub fn auidplus(&self) -> Option<&str> {
        self.auidplus.as_deref()
    }

    /// The plugin: `plugin` if assigned, otherwise `pluginPrefix` followed
    /// by `pluginSuffix` when both are assigned.
    pub fn plugin(&self) -> Option<&str> {
        self.plugin.as_deref()
    }

    pub fn plugin_prefix(&self) -> Option<&str> {
        self.value("pluginPrefix")
    }

    pub fn plugin_suffix(&self) -> Option<&str> {
        self.value("pluginSuffix")
    }

    // ---------------------------------------------------------------
    // Scalar values
    // ---------------------------------------------------------------

    pub fn name(&self) -> Option<&str> {
        self.value("name")
    }

    /// The raw status string, which need not be a known [`AuStatus`].
    pub fn status(&self) -> Option<&str> {
        self.value("status")
    }

    /// The status parsed as an [`AuStatus`], if present.
    pub fn status_kind(&self) -> ModelResult<Option<AuStatus>> {
        self.status().map(str::parse).transpose()
    }

    pub fn status1(&self) -> Option<&str> {
        self.value("status1")
    }

    pub fn status2(&self) -> Option<&str> {
        self.value("status2")
    }

    pub fn year(&self) -> Option<&str> {
        self.value("year")
    }

    pub fn volume(&self) -> Option<&str> {
        self.value("volume")
    }

    pub fn rights(&self) -> Option<&str> {
        self.value("rights")
    }

    pub fn proxy(&self) -> Option<&str> {
        self.value("proxy")
    }

    pub fn provider(&self) -> Option<&str> {
        self.value("provider")
    }

    pub fn edition(&self) -> Option<&str> {
        self.value("edition")
    }

    pub fn isbn(&self) -> Option<&str> {
        self.value("isbn")
    }

    pub fn eisbn(&self) -> Option<&str> {
        self.value("eisbn")
    }

    // ---------------------------------------------------------------
    // Multi-valued groups
    // ---------------------------------------------------------------

    /// Defining parameters (`param[...]`).
    pub fn params(&self) -> &BTreeMap<String, String> {
        &self.params
    }

    /// Non-defining parameters (`nondefparam[...]`).
    pub fn nondef_params(&self) -> &BTreeMap<String, String> {
        &self.nondef_params
    }

    /// Free-form attributes (`attr[...]`).
    pub fn attrs(&self) -> &BTreeMap<String, String> {
        &self.attrs
    }

    pub fn param(&self, key: &str) -> Option<&str> {
        self.params.get(key).map(String::as_str)
    }

    pub fn nondef_param(&self, key: &str) -> Option<&str> {
        self.nondef_params.get(key).map(String::as_str)
    }

    pub fn attr(&self, key: &str) -> Option<&str> {
        self.attrs.get(key).map(String::as_str)
    }

    /// Any resolved value by path.
    pub fn get(&self, path: &KeyPath) -> Option<&str> {
        self.store.get(path).map(String::as_str)
    }

    /// Every resolved value.
    pub fn store(&self) -> &KeyedStore<String> {
        &self.store
    }

    fn value(&self, key: &str) -> Option<&str> {
        let path = KeyPath::leaf(key).ok()?;
        self.get(&path)
    }
}

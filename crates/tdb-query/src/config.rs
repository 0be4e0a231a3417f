use serde::{Deserialize, Serialize};

use crate::class::StatusClass;

/// Options for filtering a catalog.
///
/// With neither `query` nor `status_class` set, filtering is a no-op.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct QueryOptions {
    /// Free-form query text.
    pub query: Option<String>,
    /// Built-in status filter, ANDed with `query`.
    pub status_class: Option<StatusClass>,
    /// Echo the query text as a `trace` event.
    pub echo_query: bool,
    /// Echo each query token as a `trace` event.
    pub echo_tokens: bool,
}

impl QueryOptions {
    /// Keep production AUs only.
    pub fn production() -> Self {
        Self {
            status_class: Some(StatusClass::Production),
            ..Self::default()
        }
    }

    /// Keep pre-production AUs only.
    pub fn testing() -> Self {
        Self {
            status_class: Some(StatusClass::Testing),
            ..Self::default()
        }
    }

    /// Keep AUs matching `query`.
    pub fn with_query(query: impl Into<String>) -> Self {
        Self {
            query: Some(query.into()),
            ..Self::default()
        }
    }

    /// Returns `true` if these options filter anything out.
    pub fn is_active(&self) -> bool {
        self.query.is_some() || self.status_class.is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_is_inactive() {
        assert!(!QueryOptions::default().is_active());
        assert!(QueryOptions::production().is_active());
        assert!(QueryOptions::with_query("year = '2001'").is_active());
    }

    #[test]
    fn deserializes_with_defaults() {
        let options: QueryOptions =
            serde_json::from_str(r#"{"status_class": "testing", "echo_query": true}"#).unwrap();
        assert_eq!(options.status_class, Some(StatusClass::Testing));
        assert!(options.echo_query);
        assert!(!options.echo_tokens);
        assert_eq!(options.query, None);
        assert_eq!(options, QueryOptions { echo_query: true, ..QueryOptions::testing() });
    }
}

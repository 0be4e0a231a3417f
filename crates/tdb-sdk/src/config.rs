use serde::{Deserialize, Serialize};
use tdb_parse::ParseOptions;
use tdb_query::QueryOptions;

use crate::error::{SdkError, SdkResult};

/// Configuration for a [`Tdb`](crate::Tdb) session.
///
/// ```toml
/// [parse]
/// echo_lines = true
///
/// [query]
/// query = "publisher ~ 'Example'"
/// status_class = "production"
/// ```
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct TdbConfig {
    pub parse: ParseOptions,
    pub query: QueryOptions,
}

impl TdbConfig {
    /// Parse only; keep every AU.
    pub fn unfiltered() -> Self {
        Self::default()
    }

    /// Keep AUs matching `query`.
    pub fn with_query(query: impl Into<String>) -> Self {
        Self {
            query: QueryOptions::with_query(query),
            ..Self::default()
        }
    }

    /// Load from TOML text. Missing tables and keys take their defaults.
    pub fn from_toml_str(text: &str) -> SdkResult<Self> {
        toml::from_str(text).map_err(|e| SdkError::Config(e.to_string()))
    }

    pub fn to_toml_string(&self) -> SdkResult<String> {
        toml::to_string(self).map_err(|e| SdkError::Config(e.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tdb_query::StatusClass;

    #[test]
    fn empty_toml_is_default() {
        assert_eq!(TdbConfig::from_toml_str("").unwrap(), TdbConfig::unfiltered());
    }

    #[test]
    fn toml_fills_nested_options() {
        let config = TdbConfig::from_toml_str(
            r#"
            [parse]
            echo_tokens = true
            fold_surplus_into_name = true

            [query]
            query = "year = '2001'"
            status_class = "testing"
            "#,
        )
        .unwrap();
        assert!(config.parse.echo_tokens);
        assert!(!config.parse.echo_lines);
        assert!(config.parse.fold_surplus_into_name);
        assert_eq!(config.query.query.as_deref(), Some("year = '2001'"));
        assert_eq!(config.query.status_class, Some(StatusClass::Testing));
    }

    #[test]
    fn unknown_status_class_is_a_config_error() {
        let err = TdbConfig::from_toml_str("[query]\nstatus_class = \"beta\"").unwrap_err();
        assert!(matches!(err, SdkError::Config(_)));
    }

    #[test]
    fn toml_roundtrip() {
        let config = TdbConfig {
            query: QueryOptions {
                query: Some("status is set".into()),
                echo_query: true,
                ..QueryOptions::production()
            },
            ..TdbConfig::default()
        };
        let text = config.to_toml_string().unwrap();
        assert_eq!(TdbConfig::from_toml_str(&text).unwrap(), config);
    }

    #[test]
    fn json_uses_the_same_shape() {
        let config: TdbConfig =
            serde_json::from_str(r#"{"query": {"status_class": "all"}}"#).unwrap();
        assert_eq!(config.query.status_class, Some(StatusClass::All));
        assert_eq!(config.parse, ParseOptions::default());
    }
}

use serde::{Deserialize, Serialize};

/// Options for reading TDB source.
///
/// Echoed lines and tokens are emitted as `trace` events, so a subscriber at
/// that level is needed to see them.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ParseOptions {
    /// Echo each physical line as it is read.
    pub echo_lines: bool,
    /// Echo each token as it is produced.
    pub echo_tokens: bool,
    /// Accept `au` statements with more values than the `implicit` header
    /// names, rejoining the surplus into `name` with `;`. Off by default:
    /// any count mismatch is a syntax error.
    pub fold_surplus_into_name: bool,
}

impl ParseOptions {
    /// Echo both lines and tokens.
    pub fn verbose() -> Self {
        Self {
            echo_lines: true,
            echo_tokens: true,
            ..Self::default()
        }
    }

    /// Tolerate legacy `au` statements whose `name` value holds unescaped `;`.
    pub fn lenient_names() -> Self {
        Self {
            fold_surplus_into_name: true,
            ..Self::default()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_echoes_nothing() {
        let options = ParseOptions::default();
        assert!(!options.echo_lines);
        assert!(!options.echo_tokens);
        assert!(!options.fold_surplus_into_name);
    }

    #[test]
    fn missing_fields_take_defaults() {
        let options: ParseOptions = serde_json::from_str(r#"{"echo_tokens": true}"#).unwrap();
        assert!(!options.echo_lines);
        assert!(options.echo_tokens);
        assert_eq!(
            ParseOptions::verbose(),
            ParseOptions { echo_lines: true, echo_tokens: true, fold_surplus_into_name: false }
        );
        assert!(ParseOptions::lenient_names().fold_surplus_into_name);
    }
}

//! Key paths addressing values in a [`KeyedStore`](crate::KeyedStore).
//!
//! The textual form mirrors TDB source: the first segment is written bare and
//! every following segment is wrapped in square brackets.
//!
//! - `status` is `["status"]`
//! - `param[base_url]` is `["param", "base_url"]`
//! - `attr[a][b]` is `["attr", "a", "b"]`

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::{StoreError, StoreResult};

/// A non-empty sequence of non-empty key segments.
#[derive(Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "Vec<String>", into = "Vec<String>")]
pub struct KeyPath(Vec<String>);

impl KeyPath {
    /// Build a path from segments, rejecting an empty path or empty segments.
    pub fn new<I, S>(segments: I) -> StoreResult<Self>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let segments: Vec<String> = segments.into_iter().map(Into::into).collect();
        if segments.is_empty() {
            return Err(StoreError::MalformedKey {
                key: String::new(),
                reason: "key must have at least one segment".into(),
            });
        }
        if segments.iter().any(String::is_empty) {
            return Err(StoreError::MalformedKey {
                key: render(&segments),
                reason: "key segments must not be empty".into(),
            });
        }
        Ok(Self(segments))
    }

    /// A one-segment path.
    pub fn leaf(name: impl Into<String>) -> StoreResult<Self> {
        Self::new([name.into()])
    }

    /// Parse the bracketed textual form, e.g. `param[base_url]`.
    pub fn parse(key: &str) -> StoreResult<Self> {
        let malformed = |reason: &str| StoreError::MalformedKey {
            key: key.to_string(),
            reason: reason.to_string(),
        };

        let (head, mut rest) = match key.find('[') {
            Some(i) => key.split_at(i),
            None => (key, ""),
        };
        if head.is_empty() {
            return Err(malformed("key must start with a name"));
        }
        if head.contains(']') {
            return Err(malformed("unbalanced ']'"));
        }

        let mut segments = vec![head.to_string()];
        while !rest.is_empty() {
            let inner = rest
                .strip_prefix('[')
                .ok_or_else(|| malformed("expected '[' after ']'"))?;
            let close = inner.find(']').ok_or_else(|| malformed("missing ']'"))?;
            let segment = &inner[..close];
            if segment.contains('[') {
                return Err(malformed("nested '[' inside brackets"));
            }
            segments.push(segment.to_string());
            rest = &inner[close + 1..];
        }
        Self::new(segments)
    }

    /// The segments of this path, outermost first.
    pub fn segments(&self) -> &[String] {
        &self.0
    }

    /// The first segment.
    pub fn head(&self) -> &str {
        &self.0[0]
    }

    /// Number of segments (always at least one).
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Always `false`; present for API symmetry with collections.
    pub fn is_empty(&self) -> bool {
        false
    }

    /// Returns `true` if this is the one-segment path `name`.
    pub fn is_leaf_named(&self, name: &str) -> bool {
        self.0.len() == 1 && self.0[0] == name
    }

    /// A new path with `segment` appended.
    pub fn child(&self, segment: impl Into<String>) -> StoreResult<Self> {
        let mut segments = self.0.clone();
        segments.push(segment.into());
        Self::new(segments)
    }
}

/// Render segments in the bracketed textual form.
pub(crate) fn render(segments: &[String]) -> String {
    let mut out = String::new();
    for (i, segment) in segments.iter().enumerate() {
        if i == 0 {
            out.push_str(segment);
        } else {
            out.push('[');
            out.push_str(segment);
            out.push(']');
        }
    }
    out
}

impl fmt::Display for KeyPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&render(&self.0))
    }
}

impl FromStr for KeyPath {
    type Err = StoreError;

    fn from_str(s: &str) -> StoreResult<Self> {
        Self::parse(s)
    }
}

impl TryFrom<Vec<String>> for KeyPath {
    type Error = StoreError;

    fn try_from(segments: Vec<String>) -> StoreResult<Self> {
        Self::new(segments)
    }
}

impl From<KeyPath> for Vec<String> {
    fn from(path: KeyPath) -> Self {
        path.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_bare_key() {
        let path = KeyPath::parse("status").unwrap();
        assert_eq!(path.segments(), &["status".to_string()]);
        assert!(path.is_leaf_named("status"));
    }

    #[test]
    fn parse_bracketed_key() {
        let path = KeyPath::parse("param[base_url]").unwrap();
        assert_eq!(path.segments(), &["param".to_string(), "base_url".to_string()]);
        assert_eq!(path.head(), "param");
        assert_eq!(path.len(), 2);
        assert!(!path.is_leaf_named("param"));
    }

    #[test]
    fn parse_multiple_brackets() {
        let path = KeyPath::parse("attr[a][b]").unwrap();
        assert_eq!(path.len(), 3);
        assert_eq!(path.to_string(), "attr[a][b]");
    }

    #[test]
    fn display_round_trips_through_parse() {
        let path = KeyPath::new(["nondefparam", "crawl_proxy"]).unwrap();
        let reparsed: KeyPath = path.to_string().parse().unwrap();
        assert_eq!(path, reparsed);
    }

    #[test]
    fn reject_empty_keys() {
        assert!(KeyPath::parse("").is_err());
        assert!(KeyPath::new(Vec::<String>::new()).is_err());
        assert!(KeyPath::new(["param", ""]).is_err());
        assert!(KeyPath::parse("param[]").is_err());
    }

    #[test]
    fn reject_unbalanced_brackets() {
        assert!(KeyPath::parse("[x]").is_err());
        assert!(KeyPath::parse("param[x").is_err());
        assert!(KeyPath::parse("param]x").is_err());
        assert!(KeyPath::parse("param[x]y").is_err());
        assert!(KeyPath::parse("param[a[b]]").is_err());
    }

    #[test]
    fn child_appends_segment() {
        let param = KeyPath::leaf("param").unwrap();
        let child = param.child("volume").unwrap();
        assert_eq!(child.to_string(), "param[volume]");
    }

    #[test]
    fn serde_uses_segment_list() {
        let path = KeyPath::parse("param[year]").unwrap();
        let json = serde_json::to_string(&path).unwrap();
        assert_eq!(json, r#"["param","year"]"#);
        let back: KeyPath = serde_json::from_str(&json).unwrap();
        assert_eq!(back, path);
        assert!(serde_json::from_str::<KeyPath>("[]").is_err());
    }
}

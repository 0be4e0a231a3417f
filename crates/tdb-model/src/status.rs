use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::ModelError;

/// Lifecycle state of an archival unit.
///
/// Serialized and parsed by the camel-case names used in TDB source, e.g.
/// `notReady` or `doesNotExist`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum AuStatus {
    DoesNotExist,
    DoNotProcess,
    Exists,
    Expected,
    Manifest,
    Wanted,
    Testing,
    NotReady,
    Ready,
    ReadySource,
    Crawling,
    DeepCrawl,
    Frozen,
    IngNotReady,
    Finished,
    Releasing,
    Released,
    Down,
    Superseded,
    Retracted,
    Zapped,
}

impl AuStatus {
    /// Every known status, in lifecycle order.
    pub const ALL: [AuStatus; 21] = [
        AuStatus::DoesNotExist,
        AuStatus::DoNotProcess,
        AuStatus::Exists,
        AuStatus::Expected,
        AuStatus::Manifest,
        AuStatus::Wanted,
        AuStatus::Testing,
        AuStatus::NotReady,
        AuStatus::Ready,
        AuStatus::ReadySource,
        AuStatus::Crawling,
        AuStatus::DeepCrawl,
        AuStatus::Frozen,
        AuStatus::IngNotReady,
        AuStatus::Finished,
        AuStatus::Releasing,
        AuStatus::Released,
        AuStatus::Down,
        AuStatus::Superseded,
        AuStatus::Retracted,
        AuStatus::Zapped,
    ];

    /// The name used in TDB source.
    pub fn as_str(self) -> &'static str {
        match self {
            AuStatus::DoesNotExist => "doesNotExist",
            AuStatus::DoNotProcess => "doNotProcess",
            AuStatus::Exists => "exists",
            AuStatus::Expected => "expected",
            AuStatus::Manifest => "manifest",
            AuStatus::Wanted => "wanted",
            AuStatus::Testing => "testing",
            AuStatus::NotReady => "notReady",
            AuStatus::Ready => "ready",
            AuStatus::ReadySource => "readySource",
            AuStatus::Crawling => "crawling",
            AuStatus::DeepCrawl => "deepCrawl",
            AuStatus::Frozen => "frozen",
            AuStatus::IngNotReady => "ingNotReady",
            AuStatus::Finished => "finished",
            AuStatus::Releasing => "releasing",
            AuStatus::Released => "released",
            AuStatus::Down => "down",
            AuStatus::Superseded => "superseded",
            AuStatus::Retracted => "retracted",
            AuStatus::Zapped => "zapped",
        }
    }
}

impl fmt::Display for AuStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for AuStatus {
    type Err = ModelError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        AuStatus::ALL
            .iter()
            .copied()
            .find(|status| status.as_str() == s)
            .ok_or_else(|| ModelError::UnknownStatus(s.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn names_round_trip_through_from_str() {
        for status in AuStatus::ALL {
            assert_eq!(status.as_str().parse::<AuStatus>().unwrap(), status);
        }
    }

    #[test]
    fn unknown_names_are_rejected() {
        assert_eq!(
            "Released".parse::<AuStatus>().unwrap_err(),
            ModelError::UnknownStatus("Released".into())
        );
        assert!("".parse::<AuStatus>().is_err());
    }

    #[test]
    fn serde_matches_source_names() {
        for status in AuStatus::ALL {
            let json = serde_json::to_string(&status).unwrap();
            assert_eq!(json, format!("\"{}\"", status.as_str()));
        }
    }
}

use serde::{Deserialize, Serialize};
use tdb_model::AuStatus;

use crate::field::{AuField, Field};
use crate::predicate::Predicate;

/// Built-in status filters.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StatusClass {
    /// AUs in production.
    Production,
    /// AUs still moving through pre-production.
    Testing,
    /// Everything in either of the other two classes.
    All,
}

const PRODUCTION: [AuStatus; 4] = [
    AuStatus::Released,
    AuStatus::Down,
    AuStatus::Superseded,
    AuStatus::Retracted,
];

const TESTING: [AuStatus; 7] = [
    AuStatus::Manifest,
    AuStatus::Wanted,
    AuStatus::Crawling,
    AuStatus::Testing,
    AuStatus::NotReady,
    AuStatus::Ready,
    AuStatus::Releasing,
];

impl StatusClass {
    /// The statuses in this class.
    pub fn statuses(self) -> Vec<AuStatus> {
        match self {
            StatusClass::Production => PRODUCTION.to_vec(),
            StatusClass::Testing => TESTING.to_vec(),
            StatusClass::All => TESTING.iter().chain(PRODUCTION.iter()).copied().collect(),
        }
    }

    /// `status = s1 or status = s2 or ...` over this class.
    pub fn predicate(self) -> Predicate {
        let status_is = |s: &AuStatus| Predicate::equals(Field::Au(AuField::Status), s.as_str());
        let first = match self {
            StatusClass::Production => PRODUCTION[0],
            StatusClass::Testing | StatusClass::All => TESTING[0],
        };
        self.statuses()
            .iter()
            .skip(1)
            .fold(status_is(&first), |acc, s| acc.or(status_is(s)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn classes_are_disjoint_and_all_is_their_union() {
        let production = StatusClass::Production.statuses();
        let testing = StatusClass::Testing.statuses();
        assert!(production.iter().all(|s| !testing.contains(s)));
        let all = StatusClass::All.statuses();
        assert_eq!(all.len(), production.len() + testing.len());
        assert!(production.iter().chain(testing.iter()).all(|s| all.contains(s)));
    }

    #[test]
    fn production_includes_retracted() {
        assert!(StatusClass::Production.statuses().contains(&AuStatus::Retracted));
        assert!(!StatusClass::Testing.statuses().contains(&AuStatus::Zapped));
    }

    #[test]
    fn predicate_lists_every_status() {
        let rendered = StatusClass::Production.predicate().to_string();
        for status in ["released", "down", "superseded", "retracted"] {
            assert!(rendered.contains(&format!("{status:?}")), "{rendered}");
        }
        assert_eq!(rendered.matches(" or ").count(), 3);
        assert_eq!(StatusClass::All.predicate().to_string().matches(" or ").count(), 10);
    }

    #[test]
    fn serde_uses_lowercase_names() {
        assert_eq!(serde_json::to_string(&StatusClass::Production).unwrap(), "\"production\"");
        let class: StatusClass = serde_json::from_str("\"testing\"").unwrap();
        assert_eq!(class, StatusClass::Testing);
        assert!(serde_json::from_str::<StatusClass>("\"Testing\"").is_err());
    }
}

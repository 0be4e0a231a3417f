use std::fmt;

use regex::Regex;
use tdb_model::AuContext;

use crate::field::Field;

/// How a field value is compared with a literal.
#[derive(Clone, Debug)]
pub enum Comparison {
    /// `=` and `is`: the value is present and equal.
    Equals(String),
    /// `!=`: the value is absent or different.
    NotEquals(String),
    /// `~`: the pattern is found somewhere in the value.
    Matches(Regex),
    /// `!~`: the pattern is found nowhere in the value.
    DoesNotMatch(Regex),
}

impl Comparison {
    fn holds(&self, value: Option<&str>) -> bool {
        match self {
            Comparison::Equals(literal) => value == Some(literal.as_str()),
            Comparison::NotEquals(literal) => value != Some(literal.as_str()),
            Comparison::Matches(re) => re.is_match(value.unwrap_or_default()),
            Comparison::DoesNotMatch(re) => !re.is_match(value.unwrap_or_default()),
        }
    }
}

/// A compiled query.
#[derive(Clone, Debug)]
pub enum Predicate {
    And(Box<Predicate>, Box<Predicate>),
    Or(Box<Predicate>, Box<Predicate>),
    Not(Box<Predicate>),
    Compare { field: Field, comparison: Comparison },
    /// `is set` (or `is not set` when negated). An empty string is set.
    SetTest { field: Field, negated: bool },
}

impl Predicate {
    pub fn and(self, other: Predicate) -> Predicate {
        Predicate::And(Box::new(self), Box::new(other))
    }

    pub fn or(self, other: Predicate) -> Predicate {
        Predicate::Or(Box::new(self), Box::new(other))
    }

    pub fn negate(self) -> Predicate {
        Predicate::Not(Box::new(self))
    }

    /// `field = literal`.
    pub fn equals(field: Field, literal: impl Into<String>) -> Predicate {
        Predicate::Compare {
            field,
            comparison: Comparison::Equals(literal.into()),
        }
    }

    /// Evaluate against one AU.
    pub fn evaluate(&self, ctx: &AuContext<'_>) -> bool {
        match self {
            Predicate::And(l, r) => l.evaluate(ctx) && r.evaluate(ctx),
            Predicate::Or(l, r) => l.evaluate(ctx) || r.evaluate(ctx),
            Predicate::Not(p) => !p.evaluate(ctx),
            Predicate::Compare { field, comparison } => comparison.holds(field.value(ctx).as_deref()),
            Predicate::SetTest { field, negated } => field.value(ctx).is_some() != *negated,
        }
    }
}

/// Renders the predicate in query syntax.
impl fmt::Display for Predicate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Predicate::And(l, r) => write!(f, "({l} and {r})"),
            Predicate::Or(l, r) => write!(f, "({l} or {r})"),
            Predicate::Not(p) => match p.as_ref() {
                Predicate::Compare {
                    field,
                    comparison: Comparison::Equals(s),
                } => write!(f, "{field} is not {s:?}"),
                other => write!(f, "not ({other})"),
            },
            Predicate::Compare { field, comparison } => match comparison {
                Comparison::Equals(s) => write!(f, "{field} = {s:?}"),
                Comparison::NotEquals(s) => write!(f, "{field} != {s:?}"),
                Comparison::Matches(re) => write!(f, "{field} ~ {:?}", re.as_str()),
                Comparison::DoesNotMatch(re) => write!(f, "{field} !~ {:?}", re.as_str()),
            },
            Predicate::SetTest { field, negated: false } => write!(f, "{field} is set"),
            Predicate::SetTest { field, negated: true } => write!(f, "{field} is not set"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::field::AuField;
    use tdb_model::{Au, Catalog, KeyPath, KeyedStore, Publisher, SourceLocation, Title};

    fn make_catalog(aus: &[&[(&str, &str)]]) -> Catalog {
        let mut catalog = Catalog::new();
        let publisher = catalog.add_publisher(Publisher::new(KeyedStore::new()));
        let title = catalog.add_title(Title::new(KeyedStore::new(), publisher)).unwrap();
        for pairs in aus {
            let mut store = KeyedStore::new();
            for (k, v) in *pairs {
                store.set(&KeyPath::parse(k).unwrap(), v.to_string()).unwrap();
            }
            let au = Au::new(store, title, SourceLocation::new("t", 1, 1)).unwrap();
            catalog.add_au(au).unwrap();
        }
        catalog
    }

    fn results(catalog: &Catalog, predicate: &Predicate) -> Vec<bool> {
        catalog.contexts().map(|ctx| predicate.evaluate(&ctx)).collect()
    }

    fn status() -> Field {
        Field::Au(AuField::Status)
    }

    #[test]
    fn equality_treats_absent_as_unequal() {
        let catalog = make_catalog(&[&[("status", "released")], &[("status", "down")], &[]]);
        let eq = Predicate::equals(status(), "released");
        let ne = Predicate::Compare {
            field: status(),
            comparison: Comparison::NotEquals("released".into()),
        };
        assert_eq!(results(&catalog, &eq), vec![true, false, false]);
        assert_eq!(results(&catalog, &ne), vec![false, true, true]);
    }

    #[test]
    fn regex_searches_anywhere_and_absent_is_empty() {
        let catalog = make_catalog(&[&[("status", "released")], &[("status", "down")], &[]]);
        let matches = Predicate::Compare {
            field: status(),
            comparison: Comparison::Matches(Regex::new("lease").unwrap()),
        };
        let empty = Predicate::Compare {
            field: status(),
            comparison: Comparison::Matches(Regex::new("^$").unwrap()),
        };
        let not_matches = Predicate::Compare {
            field: status(),
            comparison: Comparison::DoesNotMatch(Regex::new("lease").unwrap()),
        };
        assert_eq!(results(&catalog, &matches), vec![true, false, false]);
        assert_eq!(results(&catalog, &empty), vec![false, false, true]);
        assert_eq!(results(&catalog, &not_matches), vec![false, true, true]);
    }

    #[test]
    fn set_test_counts_empty_string_as_set() {
        let catalog = make_catalog(&[&[("status", "")], &[]]);
        let set = Predicate::SetTest { field: status(), negated: false };
        let unset = Predicate::SetTest { field: status(), negated: true };
        assert_eq!(results(&catalog, &set), vec![true, false]);
        assert_eq!(results(&catalog, &unset), vec![false, true]);
    }

    #[test]
    fn connectives_combine() {
        let catalog = make_catalog(&[
            &[("status", "released"), ("year", "2001")],
            &[("status", "released"), ("year", "2002")],
            &[("status", "down"), ("year", "2001")],
        ]);
        let year = |y: &str| Predicate::equals(Field::Au(AuField::Year), y);
        let released = Predicate::equals(status(), "released");

        assert_eq!(results(&catalog, &released.clone().and(year("2001"))), vec![true, false, false]);
        assert_eq!(results(&catalog, &released.clone().or(year("2001"))), vec![true, true, true]);
        assert_eq!(results(&catalog, &released.negate()), vec![false, false, true]);
    }

    #[test]
    fn display_is_readable() {
        let p = Predicate::equals(status(), "released").or(Predicate::SetTest {
            field: status(),
            negated: true,
        });
        assert_eq!(
            p.to_string(),
            "(status = \"released\" or status is not set)"
        );
    }
}

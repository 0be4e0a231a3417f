//! Query compiler.
//!
//! ```text
//! or_expr  := and_expr ( 'or' and_expr )*
//! and_expr := expr ( 'and' expr )*
//! expr     := '(' or_expr ')'
//!           | IDENT 'is' 'not'? ( 'set' | STRING )
//!           | IDENT ( '=' | '!=' | '~' | '!~' ) STRING
//! ```
//!
//! `and` binds tighter than `or`; both associate to the left.

use std::str::FromStr;

use regex::Regex;
use tracing::trace;

use crate::config::QueryOptions;
use crate::error::{QueryError, QueryResult};
use crate::field::Field;
use crate::lexer::QueryLexer;
use crate::predicate::{Comparison, Predicate};
use crate::token::{QueryToken, QueryTokenKind};

/// Compile `query` into a predicate, honoring the echo switches in `options`.
pub fn compile(query: &str, options: &QueryOptions) -> QueryResult<Predicate> {
    if options.echo_query {
        trace!(query, "tdb query");
    }
    let tokens = QueryLexer::new(query)
        .echo_tokens(options.echo_tokens)
        .tokenize()?;
    let mut parser = QueryParser {
        query,
        tokens,
        pos: 0,
    };
    let predicate = parser.or_expression()?;
    parser.expect(QueryTokenKind::EndOfString)?;
    Ok(predicate)
}

impl FromStr for Predicate {
    type Err = QueryError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        compile(s, &QueryOptions::default())
    }
}

#[derive(Clone, Copy, Debug)]
enum Operator {
    Is { negated: bool },
    Equal,
    NotEqual,
    Matches,
    DoesNotMatch,
}

struct QueryParser<'q> {
    query: &'q str,
    /// Never empty: the lexer always ends with `EndOfString`.
    tokens: Vec<QueryToken>,
    pos: usize,
}

impl QueryParser<'_> {
    fn or_expression(&mut self) -> QueryResult<Predicate> {
        let mut left = self.and_expression()?;
        while self.accept(QueryTokenKind::Or) {
            left = left.or(self.and_expression()?);
        }
        Ok(left)
    }

    fn and_expression(&mut self) -> QueryResult<Predicate> {
        let mut left = self.expression()?;
        while self.accept(QueryTokenKind::And) {
            left = left.and(self.expression()?);
        }
        Ok(left)
    }

    fn expression(&mut self) -> QueryResult<Predicate> {
        if self.accept(QueryTokenKind::ParenOpen) {
            let inner = self.or_expression()?;
            self.expect(QueryTokenKind::ParenClose)?;
            return Ok(inner);
        }

        let ident = self.current().clone();
        self.expect(QueryTokenKind::Identifier)?;
        let field = Field::resolve(ident.text()).ok_or_else(|| QueryError::UnknownField {
            index: ident.index,
            name: ident.text().to_string(),
        })?;

        let oper = self.current().clone();
        let operator = match oper.kind {
            QueryTokenKind::Is => {
                self.advance();
                Operator::Is {
                    negated: self.accept(QueryTokenKind::Not),
                }
            }
            QueryTokenKind::Equal => Operator::Equal,
            QueryTokenKind::NotEqual => Operator::NotEqual,
            QueryTokenKind::Matches => Operator::Matches,
            QueryTokenKind::DoesNotMatch => Operator::DoesNotMatch,
            other => {
                return Err(QueryError::syntax(
                    oper.index,
                    format!(
                        "expected \"is\", \"=\", \"!=\", \"~\" or \"!~\" at index {} but got: {}",
                        oper.index, other
                    ),
                ));
            }
        };
        if !matches!(operator, Operator::Is { .. }) {
            self.advance();
        }

        let value = self.current().clone();
        if self.accept(QueryTokenKind::Set) {
            return match operator {
                Operator::Is { negated } => Ok(Predicate::SetTest { field, negated }),
                _ => Err(QueryError::syntax(
                    value.index,
                    format!(
                        "\"set\" not immediately following \"is\" or \"is not\" at index {}",
                        value.index
                    ),
                )),
            };
        }
        if !self.accept(QueryTokenKind::String) {
            return Err(QueryError::syntax(
                value.index,
                format!(
                    "expected \"set\" or a string at index {} but got: {}",
                    value.index, value.kind
                ),
            ));
        }

        let literal = value.text().to_string();
        let compare = |comparison: Comparison| Predicate::Compare {
            field: field.clone(),
            comparison,
        };
        let predicate = match operator {
            Operator::Is { negated: false } | Operator::Equal => compare(Comparison::Equals(literal)),
            Operator::Is { negated: true } => compare(Comparison::Equals(literal)).negate(),
            Operator::NotEqual => compare(Comparison::NotEquals(literal)),
            Operator::Matches => compare(Comparison::Matches(regex(literal)?)),
            Operator::DoesNotMatch => compare(Comparison::DoesNotMatch(regex(literal)?)),
        };
        Ok(predicate)
    }

    fn current(&self) -> &QueryToken {
        &self.tokens[self.pos]
    }

    fn advance(&mut self) {
        if self.pos + 1 < self.tokens.len() {
            self.pos += 1;
        }
    }

    fn accept(&mut self, kind: QueryTokenKind) -> bool {
        if self.current().kind == kind {
            self.advance();
            true
        } else {
            false
        }
    }

    fn expect(&mut self, kind: QueryTokenKind) -> QueryResult<()> {
        if self.accept(kind) {
            return Ok(());
        }
        let index = self.current().index;
        let rest: String = self.query.chars().skip(index).collect();
        Err(QueryError::syntax(
            index,
            format!("unexpected syntax at index {index}: {rest}"),
        ))
    }
}

fn regex(pattern: String) -> QueryResult<Regex> {
    Regex::new(&pattern).map_err(|source| QueryError::InvalidRegex { pattern, source })
}

#[cfg(test)]
mod tests {
    use super::*;
    use tdb_model::Catalog;
    use tdb_parse::{parse_str, ParseOptions};

    const SOURCE: &str = "\
{
  publisher < name = Alpha Press >
  {
    title < name = Journal A ; issn = 1111-1111 >
    implicit < status ; year ; name >
    au < released ; 2001 ; A 2001 >
    au < down ; 2002 ; A 2002 >
    au < testing ; 2003 ; A 2003 >
  }
}
{
  publisher < name = Beta Books >
  {
    title < name = Journal B >
    implicit < year ; name >
    au < 2001 ; B 2001 >
    {
      status =
      au < 2002 ; B 2002 >
    }
  }
}
";

    fn make_catalog() -> Catalog {
        parse_str(SOURCE, "q.tdb", &ParseOptions::default()).unwrap()
    }

    fn matching(query: &str) -> Vec<String> {
        let catalog = make_catalog();
        let predicate: Predicate = query.parse().unwrap();
        catalog
            .contexts()
            .filter(|ctx| predicate.evaluate(ctx))
            .filter_map(|ctx| ctx.au.name().map(str::to_string))
            .collect()
    }

    fn error(query: &str) -> String {
        compile(query, &QueryOptions::default()).unwrap_err().to_string()
    }

    #[test]
    fn is_and_equals_agree() {
        assert_eq!(matching("status is \"released\""), matching("status = 'released'"));
        assert_eq!(matching("status is 'released'"), vec!["A 2001"]);
    }

    #[test]
    fn is_not_and_not_equals_agree() {
        let expected = vec!["A 2002", "A 2003", "B 2001", "B 2002"];
        assert_eq!(matching("status is not 'released'"), expected);
        assert_eq!(matching("status != 'released'"), expected);
    }

    #[test]
    fn set_tests_treat_empty_as_set() {
        assert_eq!(matching("status is set"), vec!["A 2001", "A 2002", "A 2003", "B 2002"]);
        assert_eq!(matching("status is not set"), vec!["B 2001"]);
    }

    #[test]
    fn regex_search_is_unanchored() {
        assert_eq!(matching("name ~ '200[12]'"), vec!["A 2001", "A 2002", "B 2001", "B 2002"]);
        assert_eq!(matching("name !~ '^A'"), vec!["B 2001", "B 2002"]);
    }

    #[test]
    fn and_binds_tighter_than_or() {
        assert_eq!(
            matching("year = '2003' or publisher = 'Beta Books' and year = '2001'"),
            vec!["A 2003", "B 2001"]
        );
        assert_eq!(
            matching("(year = '2003' or publisher = 'Beta Books') and year = '2001'"),
            vec!["B 2001"]
        );
    }

    #[test]
    fn fields_reach_title_and_publisher() {
        assert_eq!(matching("issn is set"), vec!["A 2001", "A 2002", "A 2003"]);
        assert_eq!(matching("title = 'Journal B' and year ~ '2'"), vec!["B 2001", "B 2002"]);
        assert_eq!(matching("publisher:name ~ 'Alpha' and au:year = '2002'"), vec!["A 2002"]);
    }

    #[test]
    fn compiling_twice_behaves_identically() {
        let query = "status is set and (name ~ 'A' or year = '2002')";
        let a: Predicate = query.parse().unwrap();
        let b: Predicate = query.parse().unwrap();
        let catalog = make_catalog();
        for ctx in catalog.contexts() {
            assert_eq!(a.evaluate(&ctx), b.evaluate(&ctx));
        }
    }

    #[test]
    fn display_is_query_syntax() {
        let predicate: Predicate = "status is not 'down' and (title ~ '^J' or param[volume] is set)"
            .parse()
            .unwrap();
        let text = predicate.to_string();
        assert_eq!(
            text,
            "(status is not \"down\" and (title:name ~ \"^J\" or param[volume] is set))"
        );
        let reparsed: Predicate = text.parse().unwrap();
        assert_eq!(reparsed.to_string(), text);
    }

    #[test]
    fn compile_errors() {
        assert_eq!(error("colour = 'red'"), "bad identifier at index 0: colour");
        assert_eq!(
            error("status"),
            "expected \"is\", \"=\", \"!=\", \"~\" or \"!~\" at index 6 but got: end of string"
        );
        assert_eq!(
            error("status = set"),
            "\"set\" not immediately following \"is\" or \"is not\" at index 9"
        );
        assert_eq!(
            error("status is"),
            "expected \"set\" or a string at index 9 but got: end of string"
        );
        assert_eq!(error("(status is set"), "unexpected syntax at index 14: ");
        assert_eq!(
            error("status is set year is set"),
            "unexpected syntax at index 14: year is set"
        );
        assert_eq!(error(""), "unexpected syntax at index 0: ");
        assert_eq!(error("and"), "unexpected syntax at index 0: and");
    }

    #[test]
    fn bad_regex_is_a_compile_error() {
        let err = compile("name ~ '('", &QueryOptions::default()).unwrap_err();
        assert!(matches!(err, QueryError::InvalidRegex { ref pattern, .. } if pattern == "("));
    }

    #[test]
    fn lexer_errors_surface_from_compile() {
        assert_eq!(error("name = 'x"), "run-on string at index 7");
    }
}

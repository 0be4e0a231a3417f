use std::io::BufRead;

use tdb_model::Catalog;
use tdb_parse::parse;
use tdb_query::reprocess;
use tracing::debug;

use crate::config::TdbConfig;
use crate::error::SdkResult;

/// High-level Title Database API.
///
/// Each [`load`](Tdb::load) is an independent parse; nothing is shared
/// between calls.
#[derive(Clone, Debug, Default)]
pub struct Tdb {
    config: TdbConfig,
}

impl Tdb {
    pub fn new(config: TdbConfig) -> Self {
        Self { config }
    }

    pub fn from_toml_str(text: &str) -> SdkResult<Self> {
        Ok(Self::new(TdbConfig::from_toml_str(text)?))
    }

    pub fn config(&self) -> &TdbConfig {
        &self.config
    }

    /// Parse TDB source from `reader`, then apply the configured filter.
    ///
    /// `source_name` appears in error messages and AU locations.
    pub fn load<R: BufRead>(&self, reader: R, source_name: &str) -> SdkResult<Catalog> {
        let catalog = parse(reader, source_name, &self.config.parse)?;
        debug!(source = source_name, aus = catalog.aus().len(), "loaded tdb source");
        self.filter(catalog)
    }

    pub fn load_str(&self, text: &str, source_name: &str) -> SdkResult<Catalog> {
        self.load(text.as_bytes(), source_name)
    }

    /// Apply the configured query and status class to a parsed catalog.
    pub fn filter(&self, catalog: Catalog) -> SdkResult<Catalog> {
        Ok(reprocess(catalog, &self.config.query)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::SdkError;
    use tdb_model::{Publisher, Title};
    use tdb_parse::ParseError;
    use tdb_query::QueryOptions;

    const SOURCE: &str = "\
{
  publisher < name = Example Press >
  plugin = org.example.ExamplePlugin
  {
    title < name = Example Journal ; issn = 1234-5678 >
    param[base_url] = http://www.example.com/
    implicit < status ; year ; name ; param[volume] >
    au < released ; 2001 ; Example Journal Volume 1 ; 1 >
    au < testing ; 2002 ; Example Journal Volume 2 ; 2 >
  }
}
";

    fn names(catalog: &Catalog) -> Vec<&str> {
        catalog.aus().iter().filter_map(|au| au.name()).collect()
    }

    #[test]
    fn unfiltered_load_keeps_everything() {
        let tdb = Tdb::default();
        let catalog = tdb.load_str(SOURCE, "example.tdb").unwrap();
        assert_eq!(catalog.publishers().len(), 1);
        assert_eq!(catalog.titles().len(), 1);
        assert_eq!(names(&catalog), vec!["Example Journal Volume 1", "Example Journal Volume 2"]);
    }

    #[test]
    fn configured_query_filters_on_load() {
        let tdb = Tdb::from_toml_str("[query]\nquery = \"year = '2002'\"").unwrap();
        let catalog = tdb.load_str(SOURCE, "example.tdb").unwrap();
        assert_eq!(names(&catalog), vec!["Example Journal Volume 2"]);
        assert_eq!(
            catalog.aus()[0].auid(),
            Some("org|example|ExamplePlugin&base_url~http%3A%2F%2Fwww%2Eexample%2Ecom%2F&volume~2")
        );
    }

    #[test]
    fn status_class_filters_on_load() {
        let tdb = Tdb::new(TdbConfig {
            query: QueryOptions::production(),
            ..TdbConfig::default()
        });
        let catalog = tdb.load_str(SOURCE, "example.tdb").unwrap();
        assert_eq!(names(&catalog), vec!["Example Journal Volume 1"]);
    }

    #[test]
    fn reader_input_is_accepted() {
        let tdb = Tdb::new(TdbConfig::with_query("issn = '1234-5678'"));
        let catalog = tdb.load(std::io::Cursor::new(SOURCE), "example.tdb").unwrap();
        assert_eq!(catalog.aus().len(), 2);
    }

    #[test]
    fn syntax_errors_surface_as_parse_errors() {
        let err = Tdb::default().load_str("{\n  title < name = T >\n}\n", "bad.tdb").unwrap_err();
        assert!(matches!(err, SdkError::Parse(ParseError::Syntax(_))));
        assert_eq!(
            err.to_string(),
            "parse error: \"bad.tdb\", line 2.3: expected } but got title"
        );
    }

    #[test]
    fn query_errors_surface_before_filtering() {
        let tdb = Tdb::new(TdbConfig::with_query("status ="));
        let err = tdb.load_str(SOURCE, "example.tdb").unwrap_err();
        assert!(matches!(err, SdkError::Query(_)));
    }

    #[test]
    fn end_to_end_example() {
        let source = "{publisher<name=\"P\">  {title<name=\"T\"> implicit<status;name> au<released;Vol 1> } }";
        let catalog = Tdb::default().load_str(source, "e.tdb").unwrap();

        let publisher = &catalog.publishers()[0];
        assert_eq!(publisher.name(), Some("P"));
        let title = &catalog.titles()[0];
        assert_eq!(title.name(), Some("T"));
        assert_eq!(catalog.publisher_of(title).and_then(Publisher::name), Some("P"));

        let au = &catalog.aus()[0];
        assert_eq!(au.status(), Some("released"));
        assert_eq!(au.name(), Some("Vol 1"));
        assert_eq!(catalog.title_of(au).and_then(Title::name), Some("T"));
        assert_eq!(au.auidplus(), au.auid());
    }

    #[test]
    fn empty_source_is_an_empty_catalog() {
        let catalog = Tdb::default().load_str("", "empty.tdb").unwrap();
        assert!(catalog.is_empty());
    }
}

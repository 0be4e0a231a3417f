use tdb_model::Catalog;
use tracing::debug;

use crate::config::QueryOptions;
use crate::error::QueryResult;
use crate::parser::compile;
use crate::predicate::Predicate;

/// A new catalog holding only the AUs for which `predicate` holds, plus the
/// titles and publishers they reach.
pub fn filter(catalog: &Catalog, predicate: &Predicate) -> Catalog {
    let filtered = catalog.retain_aus(|ctx| predicate.evaluate(ctx));
    debug!(
        kept = filtered.aus().len(),
        total = catalog.aus().len(),
        "filtered catalog"
    );
    filtered
}

/// Apply the query and status class in `options` to `catalog`.
///
/// The catalog comes back untouched when `options` selects nothing. The
/// query is compiled before any AU is examined.
pub fn reprocess(catalog: Catalog, options: &QueryOptions) -> QueryResult<Catalog> {
    let query = options
        .query
        .as_deref()
        .map(|q| compile(q, options))
        .transpose()?;
    let class = options.status_class.map(|class| class.predicate());
    let predicate = match (query, class) {
        (Some(q), Some(c)) => q.and(c),
        (Some(p), None) | (None, Some(p)) => p,
        (None, None) => return Ok(catalog),
    };
    Ok(filter(&catalog, &predicate))
}

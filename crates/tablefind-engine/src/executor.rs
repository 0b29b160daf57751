use tracing::debug;

use tablefind_core::flatten::tokenize;
use tablefind_core::traits::TextSearcher;
use tablefind_core::types::{FieldPrefix, QueryResult, ResultEntry};
use tablefind_core::{Error, Result};
use tablefind_embed::{expand, ExpansionConfig};

use crate::params::Page;
use crate::rows::{matching_rows, MAX_TABLE_ROWS};

/// Runs free-text queries against a read-only index.
///
/// Built once per process around the shared index handle; `execute` holds
/// no per-request state and may be called from many threads at once.
pub struct QueryExecutor {
    searcher: Box<dyn TextSearcher>,
    max_table_rows: usize,
}

impl QueryExecutor {
    pub fn new(searcher: Box<dyn TextSearcher>) -> Self {
        Self { searcher, max_table_rows: MAX_TABLE_ROWS }
    }

    pub fn with_max_table_rows(mut self, max_table_rows: usize) -> Self {
        self.max_table_rows = max_table_rows;
        self
    }

    pub fn execute(&self, raw_query: &str, prefix: FieldPrefix, page: Page, expansion: Option<&ExpansionConfig>) -> Result<QueryResult> {
        if raw_query.trim().is_empty() {
            return Err(Error::EmptyQuery);
        }
        let tokens = tokenize(raw_query);
        if tokens.is_empty() {
            return Err(Error::EmptyQuery);
        }

        let expanded = match expansion {
            Some(config) => expand(&tokens, Some(config.oracle.as_ref()), &config.options)?,
            None => expand(&tokens, None, &Default::default())?,
        };
        debug!(query = raw_query, terms = ?expanded.terms, "query terms");

        let search_page = self.searcher.parse_and_search(&expanded.terms.join(" "), prefix, page.offset, page.limit)?;

        let entries = search_page
            .hits
            .into_iter()
            .map(|hit| {
                let table = (prefix == FieldPrefix::Data)
                    .then(|| matching_rows(&hit.dataset_id, &hit.rows_raw, &expanded.terms, self.max_table_rows));
                ResultEntry {
                    rank: hit.rank,
                    dataset_id: hit.dataset_id,
                    docid: hit.doc_id,
                    percent: hit.percent,
                    search_prefix: prefix,
                    schema: hit.schema_raw,
                    table,
                }
            })
            .collect();

        Ok(QueryResult {
            entries,
            query: expanded.terms,
            synonym: expanded.synonyms,
            offset: page.offset,
            limit: page.limit,
            total: search_page.estimated_total,
        })
    }
}

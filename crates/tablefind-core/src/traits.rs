use crate::error::Error;
use crate::types::{FieldPrefix, IndexedDocument, SearchPage};

/// Nearest neighbours of a term in a word-vector space.
///
/// Implementations return up to `topn` `(term, score)` pairs best-first and
/// report out-of-vocabulary input as [`Error::OutOfVocabulary`].
pub trait SimilarityOracle: Send + Sync {
    fn most_similar(&self, term: &str, topn: usize) -> Result<Vec<(String, f32)>, Error>;
}

/// Read path of the full-text index.
pub trait TextSearcher: Send + Sync {
    fn parse_and_search(
        &self,
        query: &str,
        prefix: FieldPrefix,
        offset: usize,
        limit: usize,
    ) -> anyhow::Result<SearchPage>;
}

/// Write path of the full-text index. One writer per index path.
pub trait DocumentWriter {
    /// Adds (or replaces) the document for `doc.dataset_id`; returns the writer's opstamp.
    fn add(&mut self, doc: &IndexedDocument) -> anyhow::Result<u64>;
    fn commit(&mut self) -> anyhow::Result<()>;
}

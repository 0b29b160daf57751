use anyhow::{Context, Result};
use std::path::Path;
use tantivy::collector::{Count, TopDocs};
use tantivy::query::QueryParser;
use tantivy::schema::Value;
use tantivy::{DocAddress, Index, IndexReader, TantivyDocument};
use tracing::debug;

use tablefind_core::traits::TextSearcher;
use tablefind_core::types::{FieldPrefix, IndexHit, SearchPage};

use crate::tantivy_utils::{register_tokenizer, Fields};

/// Read-only view of a dataset index, shareable across request threads.
pub struct TantivySearchEngine {
	index: Index,
	reader: IndexReader,
	fields: Fields,
}

impl TantivySearchEngine {
	pub fn open_for_read(index_dir: impl AsRef<Path>) -> Result<Self> {
		let index_dir = index_dir.as_ref();
		let index = Index::open_in_dir(index_dir).with_context(|| format!("opening index {}", index_dir.display()))?;
		register_tokenizer(&index)?;
		let reader = index.reader()?;
		let fields = Fields::resolve(&index.schema())?;
		Ok(Self { index, reader, fields })
	}

	/// Number of indexed datasets visible to the current searcher.
	pub fn num_docs(&self) -> u64 { self.reader.searcher().num_docs() }

	fn stored_text(&self, doc: &TantivyDocument, field: tantivy::schema::Field) -> String {
		doc.get_first(field).and_then(|v| v.as_str()).unwrap_or("").to_string()
	}
}

/// Packs a segment-local address into one stable-per-segment integer id.
fn doc_id(addr: DocAddress) -> u64 { (u64::from(addr.segment_ord) << 32) | u64::from(addr.doc_id) }

fn percent(score: f32, best: f32) -> u8 {
	if best <= 0.0 { return 0; }
	#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
	let pct = ((score / best) * 100.0).round().clamp(0.0, 100.0) as u8;
	pct
}

impl TextSearcher for TantivySearchEngine {
	fn parse_and_search(&self, query: &str, prefix: FieldPrefix, offset: usize, limit: usize) -> Result<SearchPage> {
		let searcher = self.reader.searcher();
		let field = self.fields.text_field(prefix);
		let parser = QueryParser::for_index(&self.index, vec![field]);
		// Upper-case AND/OR/NOT/IN are operators to the parser; the field tokenizer lowercases anyway.
		let (parsed, errors) = parser.parse_query_lenient(&query.to_lowercase());
		if !errors.is_empty() {
			debug!(query, ?errors, "query parsed leniently");
		}
		let total = searcher.search(&parsed, &Count)?;
		// TopDocs reserves offset + limit slots; past the last hit there is nothing to collect.
		if limit == 0 || offset >= total {
			return Ok(SearchPage { hits: Vec::new(), estimated_total: total });
		}
		let (top_docs, best) = searcher.search(&parsed, &(TopDocs::with_limit(limit).and_offset(offset), TopDocs::with_limit(1)))?;
		let best_score = best.first().map_or(0.0, |(score, _)| *score);
		let mut hits = Vec::with_capacity(top_docs.len());
		for (rank, (score, addr)) in top_docs.into_iter().enumerate() {
			let doc: TantivyDocument = searcher.doc(addr)?;
			hits.push(IndexHit {
				rank,
				doc_id: doc_id(addr),
				percent: percent(score, best_score),
				dataset_id: self.stored_text(&doc, self.fields.dataset_id),
				schema_raw: self.stored_text(&doc, self.fields.schema_raw),
				rows_raw: self.stored_text(&doc, self.fields.rows_raw),
			});
		}
		debug!(query, prefix = %prefix, offset, limit, hits = hits.len(), total, "index searched");
		Ok(SearchPage { hits, estimated_total: total })
	}
}

use anyhow::{Context, Result};
use std::path::Path;
use tantivy::directory::MmapDirectory;
use tantivy::{Index, IndexWriter, TantivyDocument, Term};
use tracing::debug;

use tablefind_core::traits::DocumentWriter;
use tablefind_core::types::IndexedDocument;

use crate::tantivy_utils::{build_schema, register_tokenizer, Fields};

const WRITER_HEAP_BYTES: usize = 50_000_000;

/// Single-writer handle on a dataset index.
///
/// Only one `TantivyIndexer` may be open on a path at a time; tantivy's
/// directory lock enforces this and `open_for_write` fails otherwise.
pub struct TantivyIndexer {
	writer: IndexWriter,
	fields: Fields,
}

impl TantivyIndexer {
	/// Opens the index at `index_dir`, creating the directory and index if absent.
	pub fn open_for_write(index_dir: impl AsRef<Path>) -> Result<Self> {
		let index_dir = index_dir.as_ref();
		std::fs::create_dir_all(index_dir).with_context(|| format!("creating {}", index_dir.display()))?;
		let directory = MmapDirectory::open(index_dir)?;
		let index = Index::open_or_create(directory, build_schema())?;
		register_tokenizer(&index)?;
		let fields = Fields::resolve(&index.schema())?;
		let writer = index.writer(WRITER_HEAP_BYTES).with_context(|| format!("locking {} for writing", index_dir.display()))?;
		Ok(Self { writer, fields })
	}

	fn to_tantivy(&self, doc: &IndexedDocument) -> TantivyDocument {
		let mut out = TantivyDocument::default();
		out.add_text(self.fields.dataset_id, &doc.dataset_id);
		out.add_text(self.fields.schema_raw, &doc.schema_raw);
		out.add_text(self.fields.rows_raw, &doc.rows_raw);
		out.add_text(self.fields.schema_text, &doc.schema_text);
		for text in &doc.data_texts {
			out.add_text(self.fields.data_text, text);
		}
		out
	}
}

impl DocumentWriter for TantivyIndexer {
	/// Replaces any earlier document for the same dataset id.
	fn add(&mut self, doc: &IndexedDocument) -> Result<u64> {
		self.writer.delete_term(Term::from_field_text(self.fields.dataset_id, &doc.dataset_id));
		let opstamp = self.writer.add_document(self.to_tantivy(doc))?;
		debug!(dataset = %doc.dataset_id, rows = doc.data_texts.len(), opstamp, "document added");
		Ok(opstamp)
	}

	fn commit(&mut self) -> Result<()> {
		let opstamp = self.writer.commit()?;
		debug!(opstamp, "index committed");
		Ok(())
	}
}

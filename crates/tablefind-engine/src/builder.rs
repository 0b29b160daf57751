//! Offline index build: one document per dataset, committed in batches.

use anyhow::{Context, Result};
use std::time::Instant;
use tracing::info;

use tablefind_core::config::DataSettings;
use tablefind_core::dataset::DatasetSource;
use tablefind_core::flatten::{row_text, stringify, word_stemmer};
use tablefind_core::traits::DocumentWriter;
use tablefind_core::types::{IndexedDocument, ROW_SEPARATOR};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BuildOptions {
    /// Rows sampled per dataset; later rows are neither indexed nor stored.
    pub sample_rows: usize,
    /// Commit after every this many documents.
    pub commit_every: usize,
}

impl Default for BuildOptions {
    fn default() -> Self {
        Self { sample_rows: 1000, commit_every: 100 }
    }
}

impl From<&DataSettings> for BuildOptions {
    fn from(data: &DataSettings) -> Self {
        Self { sample_rows: data.sample_rows, commit_every: data.commit_every.max(1) }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct BuildStats {
    pub datasets: usize,
    pub rows: usize,
    pub commits: usize,
}

/// Builds the indexed document for one dataset from its raw schema and raw row lines.
pub fn prepare_document(dataset_id: &str, schema_raw: String, row_lines: &[String]) -> Result<IndexedDocument> {
    let schema: serde_json::Value = serde_json::from_str(&schema_raw)
        .with_context(|| format!("dataset {dataset_id}: schema is not valid JSON"))?;
    let schema_text = stringify(&schema, word_stemmer, false);
    let mut data_texts = Vec::with_capacity(row_lines.len());
    for (i, line) in row_lines.iter().enumerate() {
        let row: serde_json::Value = serde_json::from_str(line)
            .with_context(|| format!("dataset {dataset_id}: row {} is not valid JSON", i + 1))?;
        data_texts.push(row_text(&row));
    }
    Ok(IndexedDocument {
        dataset_id: dataset_id.to_string(),
        schema_text,
        data_texts,
        schema_raw,
        rows_raw: row_lines.join(ROW_SEPARATOR),
    })
}

/// Indexes every dataset in `source` through `writer`.
///
/// `on_progress(done, total, dataset_id)` fires after each dataset is added.
/// A failure stops the build; documents committed so far stay in the index
/// and a re-run replaces them.
pub fn build_index<W, F>(source: &DatasetSource, writer: &mut W, options: BuildOptions, mut on_progress: F) -> Result<BuildStats>
where
    W: DocumentWriter,
    F: FnMut(usize, usize, &str),
{
    let ids = source.dataset_ids()?;
    let total = ids.len();
    let commit_every = options.commit_every.max(1);
    let start = Instant::now();
    let mut stats = BuildStats::default();
    info!(datasets = total, schema_dir = %source.schema_dir().display(), "building index");

    for (i, id) in ids.iter().enumerate() {
        let schema_raw = source.read_schema(id)?;
        let rows = source.read_rows(id, options.sample_rows)?;
        let doc = prepare_document(id, schema_raw, &rows)?;
        writer.add(&doc)?;
        stats.datasets += 1;
        stats.rows += rows.len();
        on_progress(i + 1, total, id);

        if i > 0 && i % commit_every == 0 {
            writer.commit()?;
            stats.commits += 1;
            info!(done = i, elapsed_s = start.elapsed().as_secs_f64(), "committed batch");
        }
    }

    writer.commit()?;
    stats.commits += 1;
    info!(datasets = stats.datasets, rows = stats.rows, elapsed_s = start.elapsed().as_secs_f64(), "index build complete");
    Ok(stats)
}

//! Dataset discovery and loading.
//!
//! A dataset `<id>` is described by `<schema_dir>/<id>_schema.json`; its rows
//! live in `<rows_dir>/<id>.json.gz` as gzip-compressed newline-delimited JSON.
use anyhow::{Context, Result};
use flate2::read::GzDecoder;
use std::fs::{self, File};
use std::io::{BufRead, BufReader};
use std::path::{Path, PathBuf};
use tracing::warn;

use crate::config::DataSettings;

pub const SCHEMA_SUFFIX: &str = "_schema.json";
pub const ROWS_SUFFIX: &str = ".json.gz";

#[derive(Debug, Clone)]
pub struct DatasetSource {
    schema_dir: PathBuf,
    rows_dir: PathBuf,
}

impl DatasetSource {
    pub fn new(schema_dir: impl Into<PathBuf>, rows_dir: impl Into<PathBuf>) -> Self {
        Self { schema_dir: schema_dir.into(), rows_dir: rows_dir.into() }
    }

    pub fn from_settings(data: &DataSettings) -> Self {
        Self::new(data.schema_path(), data.rows_path())
    }

    pub fn schema_dir(&self) -> &Path {
        &self.schema_dir
    }

    /// Ids of every dataset with a schema file, sorted.
    pub fn dataset_ids(&self) -> Result<Vec<String>> {
        if !self.schema_dir.is_dir() {
            anyhow::bail!("schema directory {} does not exist", self.schema_dir.display());
        }
        let mut ids = Vec::new();
        for entry in walkdir::WalkDir::new(&self.schema_dir).min_depth(1).max_depth(1) {
            let entry = entry?;
            if !entry.file_type().is_file() {
                continue;
            }
            if let Some(id) = entry.file_name().to_str().and_then(|n| n.strip_suffix(SCHEMA_SUFFIX)) {
                ids.push(id.to_string());
            }
        }
        ids.sort();
        Ok(ids)
    }

    pub fn schema_path(&self, id: &str) -> PathBuf {
        self.schema_dir.join(format!("{id}{SCHEMA_SUFFIX}"))
    }

    pub fn rows_path(&self, id: &str) -> PathBuf {
        self.rows_dir.join(format!("{id}{ROWS_SUFFIX}"))
    }

    /// Raw schema text, exactly as stored on disk.
    pub fn read_schema(&self, id: &str) -> Result<String> {
        let path = self.schema_path(id);
        fs::read_to_string(&path).with_context(|| format!("reading schema {}", path.display()))
    }

    /// Up to `limit` raw row lines, without their line terminators.
    ///
    /// Blank lines are not rows. A missing row file yields no rows.
    pub fn read_rows(&self, id: &str, limit: usize) -> Result<Vec<String>> {
        let path = self.rows_path(id);
        if !path.exists() {
            warn!(dataset = id, path = %path.display(), "no row file; indexing schema only");
            return Ok(Vec::new());
        }
        let file = File::open(&path).with_context(|| format!("opening {}", path.display()))?;
        let reader = BufReader::new(GzDecoder::new(file));
        let mut rows = Vec::new();
        for line in reader.lines() {
            if rows.len() >= limit {
                break;
            }
            let line = line.with_context(|| format!("reading {}", path.display()))?;
            let line = line.trim_end_matches('\r');
            if line.trim().is_empty() {
                continue;
            }
            rows.push(line.to_string());
        }
        Ok(rows)
    }
}

//! Domain types shared by the index builder, the text engine and the query path.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fmt;
use std::str::FromStr;

use crate::error::Error;

pub type DatasetId = String;

/// Selects which indexed text field a query targets.
///
/// On the wire the prefix is the single letter `S` (schema) or `D` (data).
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, Default)]
pub enum FieldPrefix {
    #[default]
    #[serde(rename = "S")]
    Schema,
    #[serde(rename = "D")]
    Data,
}

impl FieldPrefix {
    pub fn as_str(self) -> &'static str {
        match self {
            FieldPrefix::Schema => "S",
            FieldPrefix::Data => "D",
        }
    }
}

impl fmt::Display for FieldPrefix {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for FieldPrefix {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "S" => Ok(FieldPrefix::Schema),
            "D" => Ok(FieldPrefix::Data),
            other => Err(Error::UnknownPrefix(other.to_string())),
        }
    }
}

/// Everything the full-text index persists for one dataset.
///
/// - `schema_text`: stringified schema, indexed with positions
/// - `data_texts`: one entry per sampled row, indexed without positions
/// - `schema_raw`/`rows_raw`: stored verbatim for display and row extraction;
///   `rows_raw` joins the sampled source lines with [`ROW_SEPARATOR`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IndexedDocument {
    pub dataset_id: DatasetId,
    pub schema_text: String,
    pub data_texts: Vec<String>,
    pub schema_raw: String,
    pub rows_raw: String,
}

/// Separator between sampled rows in the stored row text.
pub const ROW_SEPARATOR: &str = "\n\n";

/// One hit as reported by the full-text index, with its stored values.
#[derive(Debug, Clone, PartialEq)]
pub struct IndexHit {
    pub rank: usize,
    pub doc_id: u64,
    pub percent: u8,
    pub dataset_id: DatasetId,
    pub schema_raw: String,
    pub rows_raw: String,
}

/// A page of hits plus the index's estimate of the total match count.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SearchPage {
    pub hits: Vec<IndexHit>,
    pub estimated_total: usize,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ResultEntry {
    pub rank: usize,
    pub dataset_id: DatasetId,
    pub docid: u64,
    pub percent: u8,
    pub search_prefix: FieldPrefix,
    pub schema: String,
    /// Matching rows; present only when the data field was searched.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub table: Option<Vec<Value>>,
}

/// The payload returned for a successful query.
///
/// `total` is the index's estimate and must not be treated as exact.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct QueryResult {
    pub entries: Vec<ResultEntry>,
    pub query: Vec<String>,
    pub synonym: Vec<(String, String)>,
    pub offset: usize,
    pub limit: usize,
    pub total: usize,
}

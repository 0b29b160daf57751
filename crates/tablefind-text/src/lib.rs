//! tablefind-text
//!
//! Tantivy-backed full-text index for datasets: `index` is the single-writer
//! build side, `search` the shared read-only query side.
pub mod tantivy_utils;
pub mod index;
pub mod search;

pub use index::TantivyIndexer;
pub use search::TantivySearchEngine;

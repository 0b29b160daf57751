//! Row-level post-filter over a hit's stored row sample.

use serde_json::Value;
use tracing::warn;

use tablefind_core::flatten::value_to_string;
use tablefind_core::types::ROW_SEPARATOR;

/// Default number of rows kept per hit.
pub const MAX_TABLE_ROWS: usize = 20;

/// True when any top-level value of `row` contains any of `terms` (already lowercased).
pub fn row_matches(row: &Value, terms: &[String]) -> bool {
    let matches = |v: &Value| {
        let text = value_to_string(v).to_lowercase();
        terms.iter().any(|t| text.contains(t.as_str()))
    };
    match row {
        Value::Object(map) => map.values().any(matches),
        other => matches(other),
    }
}

/// Rows of `rows_raw` that textually match `terms`, first `cap` in stored order.
///
/// Rows that fail to parse are skipped.
pub fn matching_rows(dataset_id: &str, rows_raw: &str, terms: &[String], cap: usize) -> Vec<Value> {
    let terms: Vec<String> = terms.iter().map(|t| t.to_lowercase()).filter(|t| !t.is_empty()).collect();
    let mut table = Vec::new();
    if terms.is_empty() || cap == 0 {
        return table;
    }
    for raw in rows_raw.split(ROW_SEPARATOR).filter(|r| !r.trim().is_empty()) {
        let row: Value = match serde_json::from_str(raw) {
            Ok(row) => row,
            Err(err) => {
                warn!(dataset = dataset_id, %err, "skipping malformed stored row");
                continue;
            }
        };
        if row_matches(&row, &terms) {
            table.push(row);
            if table.len() >= cap {
                break;
            }
        }
    }
    table
}

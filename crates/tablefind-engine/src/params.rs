//! Paging parameters as they arrive from callers.

use tablefind_core::config::SearchSettings;

/// Effective offset/limit for one query.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Page {
    pub offset: usize,
    pub limit: usize,
}

/// Parses `raw` as an integer, or returns `None` when absent or unparsable.
pub fn parse_int(raw: Option<&str>) -> Option<i64> {
    raw.and_then(|s| s.trim().parse::<i64>().ok())
}

impl Page {
    /// Builds a page from raw request values.
    ///
    /// - offset: unparsable/absent → 0, negative → 0, above `max_offset` → `max_offset`
    /// - limit: unparsable/absent or ≤ 0 → `default_limit`, above `max_limit` → `max_limit`
    pub fn from_params(offset: Option<&str>, limit: Option<&str>, search: &SearchSettings) -> Self {
        Self::from_values(parse_int(offset), parse_int(limit), search)
    }

    pub fn from_values(offset: Option<i64>, limit: Option<i64>, search: &SearchSettings) -> Self {
        let offset = offset.map_or(0, |o| usize::try_from(o).unwrap_or(0)).min(search.max_offset);
        let limit = match limit.and_then(|l| usize::try_from(l).ok()) {
            Some(0) | None => search.default_limit,
            Some(l) => l.min(search.max_limit),
        };
        Self { offset, limit }
    }
}

impl Default for Page {
    fn default() -> Self {
        Self::from_values(None, None, &SearchSettings::default())
    }
}

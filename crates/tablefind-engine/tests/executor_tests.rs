use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use serde_json::json;
use tablefind_core::traits::{SimilarityOracle, TextSearcher};
use tablefind_core::types::{FieldPrefix, IndexHit, SearchPage};
use tablefind_core::Error;
use tablefind_embed::{ExpansionConfig, ExpansionOptions};
use tablefind_engine::rows::matching_rows;
use tablefind_engine::{Page, QueryExecutor};

/// Returns a canned page and records what it was asked.
#[derive(Default)]
struct FakeSearcher {
    calls: Arc<AtomicUsize>,
    last: Arc<Mutex<Option<(String, FieldPrefix, usize, usize)>>>,
    page: SearchPage,
}

impl TextSearcher for FakeSearcher {
    fn parse_and_search(&self, query: &str, prefix: FieldPrefix, offset: usize, limit: usize) -> anyhow::Result<SearchPage> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        *self.last.lock().unwrap() = Some((query.to_string(), prefix, offset, limit));
        Ok(self.page.clone())
    }
}

struct DogOracle;

impl SimilarityOracle for DogOracle {
    fn most_similar(&self, term: &str, _topn: usize) -> Result<Vec<(String, f32)>, Error> {
        match term {
            "dog" => Ok(vec![("cat".to_string(), 0.9)]),
            other => Err(Error::OutOfVocabulary(other.to_string())),
        }
    }
}

fn hit(rows_raw: &str) -> IndexHit {
    IndexHit {
        rank: 0,
        doc_id: 42,
        percent: 100,
        dataset_id: "t1".to_string(),
        schema_raw: r#"{"name":"t1"}"#.to_string(),
        rows_raw: rows_raw.to_string(),
    }
}

#[test]
fn empty_query_never_reaches_the_index() {
    let searcher = FakeSearcher::default();
    let calls = searcher.calls.clone();
    let executor = QueryExecutor::new(Box::new(searcher));
    for q in ["", "   ", "\t\n", "?!"] {
        assert!(matches!(executor.execute(q, FieldPrefix::Schema, Page::default(), None), Err(Error::EmptyQuery)));
    }
    assert_eq!(calls.load(Ordering::SeqCst), 0);
}

#[test]
fn tokens_are_space_joined_and_paging_is_forwarded() {
    let searcher = FakeSearcher { page: SearchPage { hits: vec![hit("")], estimated_total: 7 }, ..Default::default() };
    let last = searcher.last.clone();
    let executor = QueryExecutor::new(Box::new(searcher));
    let result = executor.execute("Rail, lines!", FieldPrefix::Schema, Page { offset: 3, limit: 4 }, None).expect("result");

    assert_eq!(*last.lock().unwrap(), Some(("Rail lines".to_string(), FieldPrefix::Schema, 3, 4)));
    assert_eq!(result.query, vec!["Rail", "lines"]);
    assert!(result.synonym.is_empty());
    assert_eq!((result.offset, result.limit, result.total), (3, 4, 7));
    let entry = &result.entries[0];
    assert_eq!(entry.dataset_id, "t1");
    assert_eq!(entry.docid, 42);
    assert_eq!(entry.schema, r#"{"name":"t1"}"#);
    assert!(entry.table.is_none(), "schema searches carry no table");
}

#[test]
fn data_searches_attach_matching_rows() {
    let rows = [r#"{"x":"Alpha"}"#, r#"{"x":"beta"}"#, r#"{"y":"alphabet"}"#].join("\n\n");
    let searcher = FakeSearcher { page: SearchPage { hits: vec![hit(&rows)], estimated_total: 1 }, ..Default::default() };
    let executor = QueryExecutor::new(Box::new(searcher));
    let result = executor.execute("ALPHA", FieldPrefix::Data, Page::default(), None).expect("result");
    assert_eq!(result.entries[0].table, Some(vec![json!({"x":"Alpha"}), json!({"y":"alphabet"})]));
}

#[test]
fn expansion_adds_terms_and_synonyms() {
    let searcher = FakeSearcher::default();
    let last = searcher.last.clone();
    let executor = QueryExecutor::new(Box::new(searcher));
    let config = ExpansionConfig::new(Arc::new(DogOracle), ExpansionOptions::default());
    let result = executor.execute("dog", FieldPrefix::Schema, Page::default(), Some(&config)).expect("result");
    assert_eq!(result.query, vec!["dog", "cat"]);
    assert_eq!(result.synonym, vec![("cat".to_string(), "dog".to_string())]);
    assert_eq!(last.lock().unwrap().as_ref().map(|l| l.0.clone()), Some("dog cat".to_string()));
}

#[test]
fn row_filter_caps_at_the_first_matches_in_stored_order() {
    let rows: Vec<String> = (0..50).map(|i| format!(r#"{{"id":{i},"name":"match {i}"}}"#)).collect();
    let table = matching_rows("t", &rows.join("\n\n"), &["match".to_string()], 20);
    assert_eq!(table.len(), 20);
    assert_eq!(table[0]["id"], 0);
    assert_eq!(table[19]["id"], 19);
}

#[test]
fn row_filter_returns_nothing_without_a_match() {
    let rows = [r#"{"x":"alpha"}"#, r#"{"x":"gamma"}"#].join("\n\n");
    assert!(matching_rows("t", &rows, &["beta".to_string()], 20).is_empty());
}

#[test]
fn row_filter_matches_non_string_values_and_skips_malformed_rows() {
    let rows = [r#"{"n":12345}"#, "{not json", r#"{"ok":true}"#, ""].join("\n\n");
    let table = matching_rows("t", &rows, &["234".to_string(), "TRUE".to_string()], 20);
    assert_eq!(table, vec![json!({"n":12345}), json!({"ok":true})]);
}

struct BrokenOracle;

impl SimilarityOracle for BrokenOracle {
    fn most_similar(&self, _term: &str, _topn: usize) -> Result<Vec<(String, f32)>, Error> {
        Err(Error::Operation("similarity matrix unreadable".to_string()))
    }
}

#[test]
fn oracle_failure_fails_the_query() {
    let searcher = FakeSearcher::default();
    let calls = searcher.calls.clone();
    let executor = QueryExecutor::new(Box::new(searcher));
    let expansion = ExpansionConfig::new(Arc::new(BrokenOracle), ExpansionOptions::default());
    let err = executor.execute("dog", FieldPrefix::Schema, Page::default(), Some(&expansion)).unwrap_err();
    assert!(matches!(err, Error::Operation(_)));
    assert!(!err.is_user_error());
    assert_eq!(calls.load(Ordering::SeqCst), 0);
}

use std::io::Cursor;

use tablefind_core::traits::SimilarityOracle;
use tablefind_core::Error;
use tablefind_embed::WordVectors;

const WORD2VEC: &str = "\
5 3
dog 1.0 0.0 0.0
cat 0.9 0.1 0.0
puppy 0.95 0.0 0.05
car 0.0 1.0 0.0
truck 0.0 0.9 0.1
";

fn model() -> WordVectors {
    WordVectors::from_reader(Cursor::new(WORD2VEC)).expect("model")
}

#[test]
fn loads_word2vec_text_with_header() {
    let m = model();
    assert_eq!(m.len(), 5);
    assert_eq!(m.dim(), 3);
    assert!(m.contains("truck"));
}

#[test]
fn loads_headerless_glove_text() {
    let m = WordVectors::from_reader(Cursor::new("a 1 0\nb 0 1\n")).expect("model");
    assert_eq!((m.len(), m.dim()), (2, 2));
}

#[test]
fn most_similar_ranks_by_cosine_and_excludes_the_query() {
    let m = model();
    let similar = m.most_similar("dog", 10).expect("similar");
    let words: Vec<&str> = similar.iter().map(|(w, _)| w.as_str()).collect();
    assert_eq!(&words[..2], &["puppy", "cat"]);
    assert!(!words.contains(&"dog"));
    assert!(similar.windows(2).all(|w| w[0].1 >= w[1].1));
    assert!(similar[0].1 > 0.99 && similar[0].1 <= 1.0 + 1e-5);
}

#[test]
fn most_similar_respects_topn() {
    assert_eq!(model().most_similar("car", 2).expect("similar").len(), 2);
}

#[test]
fn unknown_terms_report_out_of_vocabulary() {
    assert!(matches!(model().most_similar("zebra", 10), Err(Error::OutOfVocabulary(w)) if w == "zebra"));
}

#[test]
fn negative_terms_push_results_away() {
    let m = model();
    let similar = m.most_similar_to(&["truck"], &["dog"], 1).expect("similar");
    assert_eq!(similar[0].0, "car");
}

#[test]
fn ragged_vectors_fail_the_load() {
    assert!(WordVectors::from_reader(Cursor::new("2 2\na 1 0\nb 0 1 1\n")).is_err());
    assert!(WordVectors::from_reader(Cursor::new("")).is_err());
}

#[test]
fn missing_model_file_is_model_unavailable() {
    let tmp = tempfile::TempDir::new().expect("tmp");
    assert!(matches!(WordVectors::load(tmp.path().join("nope.txt")), Err(Error::ModelUnavailable(_))));
}

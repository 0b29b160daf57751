use std::collections::HashSet;
use std::fs;
use std::io::Write;

use flate2::write::GzEncoder;
use flate2::Compression;
use serde_json::json;
use tempfile::TempDir;

use tablefind_core::dataset::DatasetSource;
use tablefind_core::flatten::{flatten, row_text, stringify, tokenize, word_stemmer, identity_stemmer, PathSegment};
use tablefind_core::types::FieldPrefix;
use tablefind_core::Error;

fn key(k: &str) -> PathSegment { PathSegment::Key(k.to_string()) }

#[test]
fn flatten_nested_array_under_key() {
    let pairs = flatten(&json!({"a": [1, 2]}));
    assert_eq!(pairs, vec![
        (vec![key("a"), PathSegment::Index(0)], "1".to_string()),
        (vec![key("a"), PathSegment::Index(1)], "2".to_string()),
    ]);
}

#[test]
fn flatten_falsy_values_yield_nothing() {
    for v in [json!(null), json!({}), json!([]), json!(""), json!(false), json!(0), json!(0.0)] {
        assert!(flatten(&v).is_empty(), "{v} should flatten to nothing");
    }
    // Falsy leaves are skipped, their siblings are not.
    let pairs = flatten(&json!({"a": null, "b": "x", "c": []}));
    assert_eq!(pairs, vec![(vec![key("b")], "x".to_string())]);
}

#[test]
fn flatten_preserves_object_order_and_never_repeats_a_path() {
    let value = json!({"zeta": {"b": [true, "t", {"q": 1.5}]}, "alpha": "y"});
    let pairs = flatten(&value);
    let values: Vec<&str> = pairs.iter().map(|(_, v)| v.as_str()).collect();
    assert_eq!(values, vec!["true", "t", "1.5", "y"]);
    let unique: HashSet<_> = pairs.iter().map(|(p, _)| p.clone()).collect();
    assert_eq!(unique.len(), pairs.len());
}

#[test]
fn flatten_scalar_root_has_empty_path() {
    assert_eq!(flatten(&json!("hello")), vec![(vec![], "hello".to_string())]);
}

#[test]
fn stringify_with_word_stemmer_replaces_punctuation() {
    assert_eq!(stringify(&json!({"a": "b,c"}), word_stemmer, false), "b c");
    assert_eq!(stringify(&json!({"a": "b,,  ;c"}), word_stemmer, false), "b c");
}

#[test]
fn stringify_include_path_emits_keys_but_not_indices() {
    let text = stringify(&json!({"cols": [{"name": "id"}, {"name": "price"}]}), identity_stemmer, true);
    assert_eq!(text, "cols name id cols name price");
}

#[test]
fn stringify_follows_flatten_order() {
    let text = stringify(&json!({"title": "Rail lines", "tags": ["geo", "transport"]}), identity_stemmer, false);
    assert_eq!(text, "Rail lines geo transport");
}

#[test]
fn tokenize_splits_on_non_word_runs() {
    assert_eq!(tokenize("  dog, cat--fish_food! "), vec!["dog", "cat", "fish_food"]);
    assert!(tokenize(" ,;. ").is_empty());
}

#[test]
fn row_text_joins_top_level_values() {
    assert_eq!(row_text(&json!({"x": "alpha", "n": 3, "ok": true})), "alpha 3 true");
    assert_eq!(row_text(&json!("bare")), "bare");
}

#[test]
fn field_prefix_parses_single_letters_only() {
    assert_eq!("S".parse::<FieldPrefix>().unwrap(), FieldPrefix::Schema);
    assert_eq!("D".parse::<FieldPrefix>().unwrap(), FieldPrefix::Data);
    assert!(matches!("X".parse::<FieldPrefix>(), Err(Error::UnknownPrefix(p)) if p == "X"));
}

fn write_gz(path: &std::path::Path, lines: &[&str]) {
    let mut enc = GzEncoder::new(fs::File::create(path).unwrap(), Compression::default());
    for l in lines { writeln!(enc, "{l}").unwrap(); }
    enc.finish().unwrap();
}

#[test]
fn dataset_source_discovers_sorted_ids_and_samples_rows() {
    let tmp = TempDir::new().unwrap();
    let schema_dir = tmp.path().join("schema");
    let rows_dir = tmp.path().join("rows");
    fs::create_dir_all(&schema_dir).unwrap();
    fs::create_dir_all(&rows_dir).unwrap();
    fs::write(schema_dir.join("b_schema.json"), r#"{"name":"b"}"#).unwrap();
    fs::write(schema_dir.join("a_schema.json"), r#"{"name":"a"}"#).unwrap();
    fs::write(schema_dir.join("notes.txt"), "ignored").unwrap();
    write_gz(&rows_dir.join("a.json.gz"), &[r#"{"x":1}"#, "", r#"{"x":2}"#, r#"{"x":3}"#]);

    let source = DatasetSource::new(&schema_dir, &rows_dir);
    assert_eq!(source.dataset_ids().unwrap(), vec!["a", "b"]);
    assert_eq!(source.read_schema("a").unwrap(), r#"{"name":"a"}"#);
    assert_eq!(source.read_rows("a", 2).unwrap(), vec![r#"{"x":1}"#, r#"{"x":2}"#]);
    assert_eq!(source.read_rows("a", 1000).unwrap().len(), 3);
    // No row file for "b".
    assert!(source.read_rows("b", 1000).unwrap().is_empty());
}

#[test]
fn dataset_source_missing_schema_dir_is_an_error() {
    let tmp = TempDir::new().unwrap();
    let source = DatasetSource::new(tmp.path().join("nope"), tmp.path());
    assert!(source.dataset_ids().is_err());
}

//! Flattening of JSON records into `(path, scalar)` term tuples and the
//! stringification of those tuples into one indexable text blob.

use regex::Regex;
use serde_json::Value;
use std::fmt;
use std::sync::LazyLock;

static NON_WORD: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\W+").expect("static pattern compiles"));

/// One step into a record: an array index or an object key.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum PathSegment {
    Index(usize),
    Key(String),
}

impl fmt::Display for PathSegment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PathSegment::Index(i) => write!(f, "{i}"),
            PathSegment::Key(k) => f.write_str(k),
        }
    }
}

pub type Path = Vec<PathSegment>;

/// Whether a value contributes no terms: `null`, `false`, zero, `""`, `[]`, `{}`.
pub fn is_falsy(value: &Value) -> bool {
    match value {
        Value::Null => true,
        Value::Bool(b) => !b,
        Value::Number(n) => n.as_f64() == Some(0.0),
        Value::String(s) => s.is_empty(),
        Value::Array(a) => a.is_empty(),
        Value::Object(o) => o.is_empty(),
    }
}

/// String form of a JSON value: strings verbatim, anything else as JSON text.
pub fn value_to_string(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

/// Flattens `value` into `(path, scalar)` pairs in document order.
///
/// Arrays contribute their indices to the path and objects their keys, in
/// the object's own iteration order.
pub fn flatten(value: &Value) -> Vec<(Path, String)> {
    let mut out = Vec::new();
    let mut path = Vec::new();
    flatten_into(value, &mut path, &mut out);
    out
}

fn flatten_into(value: &Value, path: &mut Path, out: &mut Vec<(Path, String)>) {
    if is_falsy(value) {
        return;
    }
    match value {
        Value::Array(items) => {
            for (i, item) in items.iter().enumerate() {
                path.push(PathSegment::Index(i));
                flatten_into(item, path, out);
                path.pop();
            }
        }
        Value::Object(map) => {
            for (key, item) in map {
                path.push(PathSegment::Key(key.clone()));
                flatten_into(item, path, out);
                path.pop();
            }
        }
        scalar => out.push((path.clone(), value_to_string(scalar))),
    }
}

/// Leaves text untouched.
pub fn identity_stemmer(text: &str) -> String {
    text.to_string()
}

/// Replaces every run of non-word characters with a single space.
pub fn word_stemmer(text: &str) -> String {
    NON_WORD.replace_all(text, " ").into_owned()
}

/// Splits on runs of non-word characters, dropping empty pieces.
pub fn tokenize(text: &str) -> Vec<String> {
    NON_WORD
        .split(text)
        .filter(|t| !t.is_empty())
        .map(str::to_string)
        .collect()
}

/// Space-joins the stemmed scalars of `value` in flatten order.
///
/// With `include_path`, the object keys on each scalar's path are emitted
/// as tokens ahead of the scalar.
pub fn stringify<F>(value: &Value, stemmer: F, include_path: bool) -> String
where
    F: Fn(&str) -> String,
{
    let mut terms = Vec::new();
    for (path, scalar) in flatten(value) {
        if include_path {
            terms.extend(path.into_iter().filter_map(|segment| match segment {
                PathSegment::Key(k) => Some(k),
                PathSegment::Index(_) => None,
            }));
        }
        terms.push(stemmer(&scalar));
    }
    terms.join(" ")
}

/// Text indexed for one data row: its top-level values, space-joined.
///
/// A row that is not an object counts as a single value.
pub fn row_text(row: &Value) -> String {
    match row {
        Value::Object(map) => map.values().map(value_to_string).collect::<Vec<_>>().join(" "),
        other => value_to_string(other),
    }
}

use anyhow::{anyhow, Context, Result};
use candle_core::{Device, Tensor};
use std::collections::HashMap;
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;
use std::time::Instant;
use tracing::info;

use tablefind_core::traits::SimilarityOracle;
use tablefind_core::Error;

/// Word vectors loaded from a word2vec text file, L2-normalized at load.
///
/// Accepts the word2vec layout (`<count> <dim>` header, then one
/// `word v1 .. vdim` line per word) and header-less GloVe files.
pub struct WordVectors {
    words: Vec<String>,
    lookup: HashMap<String, usize>,
    matrix: Tensor,
    dim: usize,
}

impl std::fmt::Debug for WordVectors {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("WordVectors").field("words", &self.words.len()).field("dim", &self.dim).finish()
    }
}

fn parse_header(line: &str) -> Option<(usize, usize)> {
    let mut parts = line.split_whitespace();
    let count = parts.next()?.parse().ok()?;
    let dim = parts.next()?.parse().ok()?;
    parts.next().is_none().then_some((count, dim))
}

fn normalize(v: &mut [f32]) {
    let norm = v.iter().map(|x| x * x).sum::<f32>().sqrt();
    if norm > 0.0 {
        for x in v.iter_mut() {
            *x /= norm;
        }
    }
}

impl WordVectors {
    /// Loads a model file, failing with [`Error::ModelUnavailable`] on any I/O or format problem.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, Error> {
        let path = path.as_ref();
        let start = Instant::now();
        let file = File::open(path).map_err(|e| Error::ModelUnavailable(format!("{}: {e}", path.display())))?;
        let model = Self::from_reader(BufReader::new(file))
            .map_err(|e| Error::ModelUnavailable(format!("{}: {e:#}", path.display())))?;
        info!(path = %path.display(), words = model.len(), dim = model.dim, elapsed_ms = start.elapsed().as_millis(), "word vectors loaded");
        Ok(model)
    }

    pub fn from_reader<R: BufRead>(reader: R) -> Result<Self> {
        let mut words = Vec::new();
        let mut lookup = HashMap::new();
        let mut data = Vec::new();
        let mut dim = None;
        for (n, line) in reader.lines().enumerate() {
            let line = line.with_context(|| format!("reading line {}", n + 1))?;
            if line.trim().is_empty() {
                continue;
            }
            if n == 0 {
                if let Some((_, d)) = parse_header(&line) {
                    dim = Some(d);
                    continue;
                }
            }
            let mut parts = line.split_whitespace();
            let word = parts.next().ok_or_else(|| anyhow!("line {}: missing word", n + 1))?;
            let mut vector = parts
                .map(str::parse::<f32>)
                .collect::<std::result::Result<Vec<_>, _>>()
                .with_context(|| format!("line {}: bad vector component", n + 1))?;
            let expected = *dim.get_or_insert(vector.len());
            if vector.len() != expected || expected == 0 {
                return Err(anyhow!("line {}: expected {} components, found {}", n + 1, expected, vector.len()));
            }
            normalize(&mut vector);
            // First occurrence wins for duplicated words.
            if lookup.contains_key(word) {
                continue;
            }
            lookup.insert(word.to_string(), words.len());
            words.push(word.to_string());
            data.extend(vector);
        }
        let dim = dim.filter(|_| !words.is_empty()).ok_or_else(|| anyhow!("model contains no vectors"))?;
        let matrix = Tensor::from_vec(data, (words.len(), dim), &Device::Cpu)?;
        Ok(Self { words, lookup, matrix, dim })
    }

    pub fn len(&self) -> usize {
        self.words.len()
    }

    pub fn is_empty(&self) -> bool {
        self.words.is_empty()
    }

    pub fn dim(&self) -> usize {
        self.dim
    }

    pub fn contains(&self, word: &str) -> bool {
        self.lookup.contains_key(word)
    }

    fn index_of(&self, word: &str) -> Result<usize, Error> {
        self.lookup.get(word).copied().ok_or_else(|| Error::OutOfVocabulary(word.to_string()))
    }

    /// Terms closest to the mean of the `positive` vectors minus the `negative` ones.
    ///
    /// Scores are cosine similarities, best first; the query words themselves are excluded.
    pub fn most_similar_to(&self, positive: &[&str], negative: &[&str], topn: usize) -> Result<Vec<(String, f32)>, Error> {
        if positive.is_empty() && negative.is_empty() {
            return Err(Error::Operation("most_similar needs at least one term".into()));
        }
        let mut query = vec![0f32; self.dim];
        let mut excluded = Vec::with_capacity(positive.len() + negative.len());
        let weighted = positive.iter().map(|w| (*w, 1.0f32)).chain(negative.iter().map(|w| (*w, -1.0f32)));
        for (word, weight) in weighted {
            let idx = self.index_of(word)?;
            excluded.push(idx);
            let row = self.matrix.get(idx).and_then(|r| r.to_vec1::<f32>()).map_err(|e| Error::Other(e.into()))?;
            for (q, v) in query.iter_mut().zip(row) {
                *q += weight * v;
            }
        }
        normalize(&mut query);
        let scores = self.scores(query).map_err(Error::Other)?;
        let mut ranked: Vec<(usize, f32)> =
            scores.into_iter().enumerate().filter(|(i, _)| !excluded.contains(i)).collect();
        ranked.sort_by(|a, b| b.1.partial_cmp(&a.1).unwrap_or(std::cmp::Ordering::Equal).then(a.0.cmp(&b.0)));
        ranked.truncate(topn);
        Ok(ranked.into_iter().map(|(i, s)| (self.words[i].clone(), s)).collect())
    }

    fn scores(&self, query: Vec<f32>) -> Result<Vec<f32>> {
        let q = Tensor::from_vec(query, (self.dim, 1), &Device::Cpu)?;
        Ok(self.matrix.matmul(&q)?.flatten_all()?.to_vec1::<f32>()?)
    }
}

impl SimilarityOracle for WordVectors {
    fn most_similar(&self, term: &str, topn: usize) -> Result<Vec<(String, f32)>, Error> {
        self.most_similar_to(&[term], &[], topn)
    }
}

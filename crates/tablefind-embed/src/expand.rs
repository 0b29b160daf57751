//! Query expansion with semantically similar terms.

use std::collections::HashSet;
use std::sync::Arc;
use tracing::debug;

use tablefind_core::traits::SimilarityOracle;
use tablefind_core::Error;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ExpansionOptions {
    /// Minimum similarity score for a candidate to be accepted.
    pub threshold: f32,
    /// Accepted candidates per source token.
    pub max_expansion: usize,
    /// Candidates requested from the oracle per source token.
    pub neighbors: usize,
}

impl Default for ExpansionOptions {
    fn default() -> Self {
        Self { threshold: 0.7, max_expansion: 3, neighbors: 10 }
    }
}

/// An oracle together with the options to expand with; absent means "do not expand".
#[derive(Clone)]
pub struct ExpansionConfig {
    pub oracle: Arc<dyn SimilarityOracle>,
    pub options: ExpansionOptions,
}

impl ExpansionConfig {
    pub fn new(oracle: Arc<dyn SimilarityOracle>, options: ExpansionOptions) -> Self {
        Self { oracle, options }
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct Expansion {
    pub terms: Vec<String>,
    /// `(expansion term, origin term)` in first-acceptance order.
    pub synonyms: Vec<(String, String)>,
}

/// Expands `tokens` with up to `max_expansion` accepted neighbours each.
///
/// Every input token is kept, in order, with its accepted neighbours
/// directly after it. A neighbour already present in the output is not
/// repeated and keeps the origin that first introduced it. Unknown tokens
/// are passed through unexpanded; any other oracle failure is returned.
pub fn expand(tokens: &[String], oracle: Option<&dyn SimilarityOracle>, options: &ExpansionOptions) -> Result<Expansion, Error> {
    let Some(oracle) = oracle else {
        return Ok(Expansion { terms: tokens.to_vec(), synonyms: Vec::new() });
    };

    let mut terms = Vec::with_capacity(tokens.len());
    let mut seen = HashSet::new();
    let mut synonyms: Vec<(String, String)> = Vec::new();
    let mut attributed = HashSet::new();

    for token in tokens {
        terms.push(token.clone());
        seen.insert(token.clone());

        let candidates = match oracle.most_similar(token, options.neighbors) {
            Ok(candidates) => candidates,
            Err(Error::OutOfVocabulary(_)) => {
                debug!(token, "not in vocabulary; not expanded");
                continue;
            }
            Err(err) => return Err(err),
        };

        let mut accepted = 0;
        for (candidate, score) in candidates {
            if accepted >= options.max_expansion {
                break;
            }
            if score < options.threshold {
                continue;
            }
            accepted += 1;
            if attributed.insert(candidate.clone()) {
                synonyms.push((candidate.clone(), token.clone()));
            }
            if seen.insert(candidate.clone()) {
                terms.push(candidate);
            }
        }
    }

    Ok(Expansion { terms, synonyms })
}

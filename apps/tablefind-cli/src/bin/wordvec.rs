use clap::Parser;

use tablefind_cli::setup::{init_tracing, load_settings};
use tablefind_embed::WordVectors;

/// Nearest neighbours in a word-vector model.
///
/// Terms prefixed with `-` count against the result, bare or `+` terms for it.
#[derive(Debug, Parser)]
#[command(name = "tablefind-wordvec")]
struct Args {
    /// Model file; defaults to model.path from the config
    #[arg(long)]
    model: Option<String>,
    #[arg(long, default_value_t = 10)]
    topn: usize,
    #[arg(required = true, num_args = 1.., allow_hyphen_values = true)]
    terms: Vec<String>,
}

fn main() -> anyhow::Result<()> {
    init_tracing();
    let args = Args::parse();
    let path = match args.model {
        Some(p) => tablefind_core::config::expand_path(p),
        None => load_settings()?
            .model
            .model_path()
            .ok_or_else(|| anyhow::anyhow!("no model given and model.path is not configured"))?,
    };
    let model = WordVectors::load(&path)?;

    let mut positive = Vec::new();
    let mut negative = Vec::new();
    for term in &args.terms {
        if let Some(t) = term.strip_prefix('-') {
            negative.push(t);
        } else {
            positive.push(term.strip_prefix('+').unwrap_or(term));
        }
    }

    for (word, score) in model.most_similar_to(&positive, &negative, args.topn)? {
        println!("{word}\t{score:.4}");
    }
    Ok(())
}

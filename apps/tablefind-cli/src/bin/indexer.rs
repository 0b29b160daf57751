use std::path::PathBuf;

use clap::Parser;
use indicatif::{ProgressBar, ProgressStyle};

use tablefind_cli::setup::{init_tracing, load_settings};
use tablefind_core::config::expand_path;
use tablefind_core::dataset::DatasetSource;
use tablefind_engine::{build_index, BuildOptions};
use tablefind_text::TantivyIndexer;

/// Build (or refresh) the dataset index from schema files and gzip row files.
#[derive(Debug, Parser)]
#[command(name = "tablefind-indexer")]
struct Args {
    /// Data root; overrides data.root from the config
    #[arg(long)]
    data: Option<String>,
    /// Index directory; overrides the configured index location
    #[arg(long)]
    index: Option<PathBuf>,
    /// Rows sampled per dataset
    #[arg(long)]
    sample_rows: Option<usize>,
}

fn main() -> anyhow::Result<()> {
    init_tracing();
    let args = Args::parse();
    let mut settings = load_settings()?;
    if let Some(root) = args.data {
        settings.data.root = root;
    }
    if let Some(n) = args.sample_rows {
        settings.data.sample_rows = n;
    }
    let index_dir = args.index.map_or_else(|| settings.data.index_path(), expand_path_buf);

    let source = DatasetSource::from_settings(&settings.data);
    let mut writer = TantivyIndexer::open_for_write(&index_dir)?;
    tracing::info!(index = %index_dir.display(), "index opened for writing");

    let pb = ProgressBar::new(0);
    pb.set_style(
        ProgressStyle::default_bar()
            .template("{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} datasets {msg}")?
            .progress_chars("#>-"),
    );
    let stats = build_index(&source, &mut writer, BuildOptions::from(&settings.data), |done, total, id| {
        pb.set_length(total as u64);
        pb.set_position(done as u64);
        pb.set_message(id.to_string());
    })?;
    pb.finish_with_message("done");

    println!("Indexed {} datasets ({} rows) into {}", stats.datasets, stats.rows, index_dir.display());
    Ok(())
}

fn expand_path_buf(p: PathBuf) -> PathBuf {
    expand_path(p.to_string_lossy())
}

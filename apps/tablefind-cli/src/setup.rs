use std::path::Path;
use std::sync::Arc;

use tablefind_core::config::{Config, SearchSettings, Settings};
use tablefind_core::Error;
use tablefind_embed::{ExpansionConfig, ExpansionOptions, WordVectors};
use tablefind_engine::QueryExecutor;
use tablefind_text::TantivySearchEngine;

/// Installs the fmt subscriber; `RUST_LOG` overrides the default `info` filter.
pub fn init_tracing() {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .with_target(false)
        .init();
}

pub fn load_settings() -> anyhow::Result<Settings> {
    Ok(Config::load()?.settings()?)
}

pub fn expansion_options(search: &SearchSettings) -> ExpansionOptions {
    ExpansionOptions {
        threshold: search.expansion_threshold,
        max_expansion: search.max_expansion,
        neighbors: search.neighbors,
    }
}

/// Loads the word-vector model if one is configured. A configured model
/// that fails to load is fatal.
pub fn load_expansion(settings: &Settings) -> Result<Option<ExpansionConfig>, Error> {
    let Some(path) = settings.model.model_path() else {
        tracing::info!("no word-vector model configured; query expansion disabled");
        return Ok(None);
    };
    let model = WordVectors::load(&path)?;
    Ok(Some(ExpansionConfig::new(Arc::new(model), expansion_options(&settings.search))))
}

/// Opens the persisted index read-only and wraps it in an executor.
pub fn open_executor(index_dir: &Path, search: &SearchSettings) -> Result<QueryExecutor, Error> {
    let engine = TantivySearchEngine::open_for_read(index_dir)
        .map_err(|e| Error::IndexUnavailable(format!("{e:#}")))?;
    Ok(QueryExecutor::new(Box::new(engine)).with_max_table_rows(search.max_table_rows))
}

//! Lightweight configuration loader and path helpers.
//!
//! Uses Figment to merge built-in defaults + `config.toml` + `config.<env>.toml`
//! + `APP_*` env vars (nested keys separated by `__`, e.g. `APP_DATA__ROOT`).
//! Provides helpers to expand `~` and `${VAR}` and to resolve relative paths
//! against a known base directory.
use figment::{
    providers::{Env, Format, Serialized, Toml},
    Figment,
};
use serde::{Deserialize, Serialize};
use std::env;
use std::path::{Path, PathBuf};

use crate::error::Error;

pub struct Config {
    figment: Figment,
}

impl Config {
    pub fn load() -> anyhow::Result<Self> {
        let env_name = env::var("RUST_ENV").unwrap_or_else(|_| "dev".to_string());

        let mut figment = Figment::from(Serialized::defaults(Settings::default()))
            .merge(Toml::file("config.toml"));
        match env_name.as_str() {
            "dev" | "development" => figment = figment.merge(Toml::file("config.dev.toml")),
            "prod" | "production" => figment = figment.merge(Toml::file("config.prod.toml")),
            "test" | "testing" => figment = figment.merge(Toml::file("config.test.toml")),
            _ => {}
        }
        figment = figment.merge(Env::prefixed("APP_").split("__"));

        Ok(Self { figment })
    }

    /// Wraps an explicit figment; used by tests and embedders.
    pub fn from_figment(figment: Figment) -> Self {
        Self { figment: Figment::from(Serialized::defaults(Settings::default())).merge(figment) }
    }

    pub fn get<T>(&self, key: &str) -> anyhow::Result<T>
    where
        T: serde::de::DeserializeOwned,
    {
        self.figment
            .extract_inner(key)
            .map_err(|e| anyhow::anyhow!("Failed to get '{}': {}", key, e))
    }

    /// Extracts and validates the full typed settings tree.
    pub fn settings(&self) -> Result<Settings, Error> {
        let settings: Settings = self
            .figment
            .extract()
            .map_err(|e| Error::InvalidConfig(e.to_string()))?;
        settings.validate()?;
        Ok(settings)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub data: DataSettings,
    pub model: ModelSettings,
    pub search: SearchSettings,
    pub server: ServerSettings,
}

/// Where datasets are read from and where the index is persisted.
///
/// The three sub-directories are relative to `root` unless absolute.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DataSettings {
    pub root: String,
    pub index_dir: String,
    pub schema_dir: String,
    pub rows_dir: String,
    pub sample_rows: usize,
    pub commit_every: usize,
}

impl Default for DataSettings {
    fn default() -> Self {
        Self {
            root: "./data".to_string(),
            index_dir: "tantivy_index".to_string(),
            schema_dir: "usertables_schema".to_string(),
            rows_dir: "usertables_data".to_string(),
            sample_rows: 1000,
            commit_every: 100,
        }
    }
}

impl DataSettings {
    pub fn root_path(&self) -> PathBuf {
        expand_path(&self.root)
    }

    pub fn index_path(&self) -> PathBuf {
        resolve_with_base(&self.root_path(), &self.index_dir)
    }

    pub fn schema_path(&self) -> PathBuf {
        resolve_with_base(&self.root_path(), &self.schema_dir)
    }

    pub fn rows_path(&self) -> PathBuf {
        resolve_with_base(&self.root_path(), &self.rows_dir)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ModelSettings {
    /// Word-vector model file; expansion is disabled when unset or empty.
    pub path: Option<String>,
}

impl ModelSettings {
    pub fn model_path(&self) -> Option<PathBuf> {
        self.path.as_deref().filter(|p| !p.trim().is_empty()).map(expand_path)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SearchSettings {
    pub default_limit: usize,
    pub max_limit: usize,
    /// Deepest result offset a caller may page to.
    pub max_offset: usize,
    pub expansion_threshold: f32,
    pub max_expansion: usize,
    pub neighbors: usize,
    pub max_table_rows: usize,
}

impl Default for SearchSettings {
    fn default() -> Self {
        Self {
            default_limit: 10,
            max_limit: 100,
            max_offset: 10_000,
            expansion_threshold: 0.7,
            max_expansion: 3,
            neighbors: 10,
            max_table_rows: 20,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerSettings {
    pub host: String,
    pub port: u16,
}

impl Default for ServerSettings {
    fn default() -> Self {
        Self { host: "0.0.0.0".to_string(), port: 8998 }
    }
}

impl Settings {
    fn validate(&self) -> Result<(), Error> {
        if self.search.default_limit == 0 {
            return Err(Error::InvalidConfig("search.default_limit must be at least 1".into()));
        }
        if self.search.max_limit < self.search.default_limit {
            return Err(Error::InvalidConfig(
                "search.max_limit must not be below search.default_limit".into(),
            ));
        }
        if self.data.commit_every == 0 {
            return Err(Error::InvalidConfig("data.commit_every must be at least 1".into()));
        }
        Ok(())
    }
}

/// Expand a user-provided path string:
/// - Expands leading '~' to the user's home directory
/// - Expands ${VAR} and $VAR environment variables
/// - Returns a PathBuf without attempting to canonicalize
pub fn expand_path<S: AsRef<str>>(input: S) -> PathBuf {
    let s = input.as_ref();
    let expanded_env = shellexpand::env(s).unwrap_or(std::borrow::Cow::Borrowed(s));
    let expanded = shellexpand::tilde(&expanded_env);
    PathBuf::from(expanded.as_ref())
}

/// Resolve a possibly relative path against a given base directory after expansion.
/// If `p` is absolute, it's returned as-is; otherwise `base.join(p)` is returned.
pub fn resolve_with_base<S: AsRef<str>>(base: &Path, p: S) -> PathBuf {
    let p = expand_path(p);
    if p.is_absolute() { p } else { base.join(p) }
}

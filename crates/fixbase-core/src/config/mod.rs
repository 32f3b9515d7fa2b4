use std::fs;
use std::path::{Path, PathBuf};

use serde::Deserialize;

use crate::error::{FixbaseError, Result};
use crate::storage::{RemoteConfig, StorageKind};

mod env;

#[cfg(test)]
mod tests;

pub const CONFIG_FILE_NAME: &str = "fixbase.toml";
pub const DATABASE_FILE_NAME: &str = "fixbase.sqlite3";
pub const DEFAULT_TOP_LIMIT: usize = 5;

pub const STORAGE_ENV: &str = "FIXBASE_STORAGE";
pub const REMOTE_URL_ENV: &str = "FIXBASE_REMOTE_URL";
pub const REMOTE_API_KEY_ENV: &str = "FIXBASE_REMOTE_API_KEY";
pub const REMOTE_TIMEOUT_MS_ENV: &str = "FIXBASE_REMOTE_TIMEOUT_MS";
pub const TOP_LIMIT_ENV: &str = "FIXBASE_TOP_LIMIT";
pub const SEED_ENV: &str = "FIXBASE_SEED";

/// Runtime settings, resolved as defaults, then `<root>/fixbase.toml`, then environment.
/// Command-line flags are applied last by the binaries.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppConfig {
    pub root: PathBuf,
    pub storage: StorageKind,
    pub remote_url: Option<String>,
    pub remote_api_key: Option<String>,
    pub remote_timeout_ms: u64,
    pub top_limit: usize,
    pub seed_on_start: bool,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
struct FileConfig {
    storage: Option<StorageKind>,
    top_limit: Option<usize>,
    seed: Option<bool>,
    remote: Option<FileRemoteConfig>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
struct FileRemoteConfig {
    url: Option<String>,
    api_key: Option<String>,
    timeout_ms: Option<u64>,
}

impl AppConfig {
    #[must_use]
    pub fn defaults(root: impl Into<PathBuf>) -> Self {
        Self {
            root: root.into(),
            storage: StorageKind::Local,
            remote_url: None,
            remote_api_key: None,
            remote_timeout_ms: RemoteConfig::DEFAULT_TIMEOUT_MS,
            top_limit: DEFAULT_TOP_LIMIT,
            seed_on_start: false,
        }
    }

    pub fn load(root: impl Into<PathBuf>) -> Result<Self> {
        let mut config = Self::defaults(root);
        let file = config.root.join(CONFIG_FILE_NAME);
        if file.is_file() {
            config.apply_file(&file)?;
        }
        config.apply_env(&|name| std::env::var(name).ok())?;
        Ok(config)
    }

    pub fn apply_file(&mut self, path: &Path) -> Result<()> {
        let text = fs::read_to_string(path)?;
        self.apply_toml(&text)
    }

    pub fn apply_toml(&mut self, text: &str) -> Result<()> {
        let file: FileConfig = toml::from_str(text)?;
        if let Some(storage) = file.storage {
            self.storage = storage;
        }
        if let Some(top_limit) = file.top_limit.filter(|limit| *limit > 0) {
            self.top_limit = top_limit;
        }
        if let Some(seed) = file.seed {
            self.seed_on_start = seed;
        }
        if let Some(remote) = file.remote {
            if remote.url.is_some() {
                self.remote_url = remote.url;
            }
            if remote.api_key.is_some() {
                self.remote_api_key = remote.api_key;
            }
            if let Some(timeout_ms) = remote.timeout_ms {
                self.remote_timeout_ms = timeout_ms;
            }
        }
        Ok(())
    }

    pub fn apply_env(&mut self, lookup: &impl Fn(&str) -> Option<String>) -> Result<()> {
        if let Some(raw) = env::read_non_empty(lookup, STORAGE_ENV) {
            self.storage = raw.parse()?;
        }
        if let Some(url) = env::read_non_empty(lookup, REMOTE_URL_ENV) {
            self.remote_url = Some(url);
        }
        if let Some(key) = env::read_non_empty(lookup, REMOTE_API_KEY_ENV) {
            self.remote_api_key = Some(key);
        }
        if let Some(timeout_ms) = env::read_u64(lookup, REMOTE_TIMEOUT_MS_ENV) {
            self.remote_timeout_ms = timeout_ms;
        }
        if let Some(top_limit) = env::read_usize(lookup, TOP_LIMIT_ENV, 1) {
            self.top_limit = top_limit;
        }
        if let Some(seed) = env::parse_bool(lookup(SEED_ENV).as_deref()) {
            self.seed_on_start = seed;
        }
        Ok(())
    }

    #[must_use]
    pub fn with_storage(mut self, storage: StorageKind) -> Self {
        self.storage = storage;
        self
    }

    #[must_use]
    pub fn database_path(&self) -> PathBuf {
        self.root.join(DATABASE_FILE_NAME)
    }

    pub fn remote_config(&self) -> Result<RemoteConfig> {
        let url = self.remote_url.as_deref().ok_or_else(|| {
            FixbaseError::Config(format!(
                "remote storage selected but {REMOTE_URL_ENV} is not set"
            ))
        })?;
        let mut config = RemoteConfig::new(url);
        config.api_key = self.remote_api_key.clone();
        config.timeout_ms = self.remote_timeout_ms;
        Ok(config)
    }
}

use serde::{Deserialize, Serialize};
use std::{
    env,
    fs::{self, File},
    io::Write,
    path::{Path, PathBuf},
};
use tracing::debug;

use crate::core::utils::{ensure_dir, PathResolver};
use crate::errors::BudgetError;

const TMP_SUFFIX: &str = "tmp";

pub const CACHE_ENV: &str = "BUDGET_LEDGER_CACHE";
pub const REMOTE_REPO_ENV: &str = "BUDGET_LEDGER_REMOTE_REPO";
pub const REMOTE_PATH_ENV: &str = "BUDGET_LEDGER_REMOTE_PATH";

/// Runtime settings for the cache location and the optional remote store.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct Config {
    /// Local cache file. Defaults to `<home>/ledger.json`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cache_path: Option<PathBuf>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub remote: Option<RemoteConfig>,
    /// Refuse to start empty when the remote cannot be read for lack of a credential and no
    /// local cache exists. Requires an addressable `remote` section.
    #[serde(default)]
    pub remote_required: bool,
}

impl Config {
    pub fn resolve_cache_path(&self, base: &Path) -> PathBuf {
        self.cache_path
            .clone()
            .unwrap_or_else(|| PathResolver::cache_file_in(base))
    }

    /// Applies `BUDGET_LEDGER_*` overrides from the process environment.
    pub fn apply_env_overrides(&mut self) {
        self.apply_overrides(|key| env::var(key).ok());
    }

    pub fn apply_overrides<F>(&mut self, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        let value_of = |key: &str| lookup(key).filter(|value| !value.trim().is_empty());
        if let Some(cache) = value_of(CACHE_ENV) {
            self.cache_path = Some(PathBuf::from(cache));
        }
        let repository = value_of(REMOTE_REPO_ENV);
        let path = value_of(REMOTE_PATH_ENV);
        if repository.is_none() && path.is_none() {
            return;
        }
        let remote = self.remote.get_or_insert_with(RemoteConfig::default);
        if let Some(repository) = repository {
            remote.repository = repository;
        }
        if let Some(path) = path {
            remote.path = path;
        }
    }
}

/// Addressing and client settings for the remote copy.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct RemoteConfig {
    pub repository: String,
    #[serde(default = "RemoteConfig::default_path")]
    pub path: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub branch: Option<String>,
    #[serde(default = "RemoteConfig::default_api_base")]
    pub api_base: String,
    /// Name of the environment variable holding the access token. The token itself is never
    /// stored in configuration.
    #[serde(default = "RemoteConfig::default_credential_env")]
    pub credential_env: String,
    #[serde(default = "RemoteConfig::default_timeout_secs")]
    pub timeout_secs: u64,
    #[serde(default = "RemoteConfig::default_commit_message")]
    pub commit_message: String,
}

impl RemoteConfig {
    pub fn default_path() -> String {
        "budget_mensuel.json".into()
    }

    pub fn default_api_base() -> String {
        "https://api.github.com".into()
    }

    pub fn default_credential_env() -> String {
        "GITHUB_TOKEN".into()
    }

    pub fn default_timeout_secs() -> u64 {
        15
    }

    pub fn default_commit_message() -> String {
        "Update monthly budget".into()
    }

    pub fn is_addressable(&self) -> bool {
        !self.repository.trim().is_empty() && !self.path.trim().is_empty()
    }
}

impl Default for RemoteConfig {
    fn default() -> Self {
        Self {
            repository: String::new(),
            path: Self::default_path(),
            branch: None,
            api_base: Self::default_api_base(),
            credential_env: Self::default_credential_env(),
            timeout_secs: Self::default_timeout_secs(),
            commit_message: Self::default_commit_message(),
        }
    }
}

/// Loads and stores [`Config`] under the application data directory.
pub struct ConfigManager {
    base: PathBuf,
    path: PathBuf,
}

impl ConfigManager {
    pub fn new() -> Result<Self, BudgetError> {
        Self::with_base_dir(PathResolver::base_dir())
    }

    pub fn with_base_dir(base: PathBuf) -> Result<Self, BudgetError> {
        ensure_dir(&base)?;
        Ok(Self {
            path: PathResolver::config_file_in(&base),
            base,
        })
    }

    pub fn base_dir(&self) -> &Path {
        &self.base
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn load(&self) -> Result<Config, BudgetError> {
        if self.path.exists() {
            let data = fs::read_to_string(&self.path)?;
            serde_json::from_str(&data).map_err(|err| {
                BudgetError::ConfigError(format!("{}: {}", self.path.display(), err))
            })
        } else {
            debug!(path = %self.path.display(), "no configuration file; using defaults");
            Ok(Config::default())
        }
    }

    /// Loads the file and layers environment overrides on top.
    pub fn load_effective(&self) -> Result<Config, BudgetError> {
        let mut config = self.load()?;
        config.apply_env_overrides();
        Ok(config)
    }

    pub fn save(&self, config: &Config) -> Result<(), BudgetError> {
        if let Some(parent) = self.path.parent() {
            ensure_dir(parent)?;
        }
        let json = serde_json::to_string_pretty(config)?;
        let tmp = tmp_path(&self.path);
        write_atomic(&tmp, &json)?;
        fs::rename(&tmp, &self.path)?;
        Ok(())
    }
}

fn tmp_path(path: &Path) -> PathBuf {
    let mut tmp = path.to_path_buf();
    let ext = match path.extension().and_then(|ext| ext.to_str()) {
        Some(existing) => format!("{}.{}", existing, TMP_SUFFIX),
        None => TMP_SUFFIX.to_string(),
    };
    tmp.set_extension(ext);
    tmp
}

fn write_atomic(path: &Path, data: &str) -> Result<(), BudgetError> {
    let mut file = File::create(path)?;
    file.write_all(data.as_bytes())?;
    file.flush()?;
    Ok(())
}

//! Two-tier persistence: a local JSON cache plus an optional remote durable copy.
//!
//! The local cache is authoritative for the lifetime of the process. The remote copy is
//! best-effort: push failures are logged and reported, never rolled back into the local save.

use std::path::{Path, PathBuf};

use tracing::{debug, error, info, warn};

use super::{
    github::GitHubContentStore,
    json_backend::{parse_ledger_upgrading, LocalCache},
    remote::{RemoteError, RemoteStore},
};
use crate::{
    config::Config,
    errors::{BudgetError, Result},
    ledger::Ledger,
};

/// What happened to the remote copy during a save.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RemoteSync {
    Pushed { revision: String },
    Skipped(String),
    Failed(String),
}

#[derive(Debug, Clone)]
pub struct SaveReport {
    pub path: PathBuf,
    pub remote: RemoteSync,
}

pub struct PersistenceGateway {
    cache: LocalCache,
    remote: Option<Box<dyn RemoteStore>>,
    remote_required: bool,
}

impl PersistenceGateway {
    /// Local-only gateway.
    pub fn new(cache: LocalCache) -> Self {
        Self {
            cache,
            remote: None,
            remote_required: false,
        }
    }

    pub fn with_remote(mut self, remote: Box<dyn RemoteStore>) -> Self {
        self.remote = Some(remote);
        self
    }

    pub fn require_remote(mut self, required: bool) -> Self {
        self.remote_required = required;
        self
    }

    /// Builds the gateway described by `config`, resolving relative defaults against `base`.
    pub fn from_config(config: &Config, base: &Path) -> Result<Self> {
        let cache = LocalCache::new(config.resolve_cache_path(base));
        let mut gateway = Self::new(cache).require_remote(config.remote_required);
        match &config.remote {
            Some(remote) if remote.is_addressable() => {
                let store = GitHubContentStore::new(remote)?;
                info!(location = %store.location(), "remote store configured");
                gateway = gateway.with_remote(Box::new(store));
            }
            _ if config.remote_required => {
                return Err(BudgetError::ConfigError(
                    "remote_required is set but no remote repository and path are configured"
                        .into(),
                ))
            }
            Some(_) => warn!("remote section lacks a repository or path; running local-only"),
            None => debug!("no remote store configured"),
        }
        Ok(gateway)
    }

    pub fn cache(&self) -> &LocalCache {
        &self.cache
    }

    pub fn has_remote(&self) -> bool {
        self.remote.is_some()
    }

    /// Refreshes the local cache from the remote copy, then returns the resulting ledger.
    ///
    /// The cache receives the re-serialized ledger, not the fetched bytes. When the remote copy
    /// predates expense ids, the upgraded ledger is also pushed back (best-effort) so ids stay
    /// stable across restarts.
    ///
    /// Any remote failure falls back to the local cache, and from there to an empty ledger.
    /// The one hard failure: the remote is required, no credential is set, and there is no
    /// local cache to fall back on.
    pub fn hydrate(&self) -> Result<Ledger> {
        let Some(remote) = self.remote.as_deref() else {
            return Ok(self.load());
        };
        match remote.fetch() {
            Ok(snapshot) => match decode_snapshot(&snapshot.content) {
                Ok((ledger, upgraded)) => {
                    let json = match self.cache.write(&ledger) {
                        Ok(json) => json,
                        Err(err) => {
                            error!(
                                location = %remote.location(),
                                revision = %snapshot.revision,
                                error = %err,
                                "fetched remote copy could not be cached"
                            );
                            return Err(err);
                        }
                    };
                    info!(
                        location = %remote.location(),
                        revision = %snapshot.revision,
                        "hydrated local cache from remote"
                    );
                    if upgraded {
                        let sync = submit(remote, &json, Some(&snapshot.revision));
                        debug!(?sync, "remote copy upgraded with expense ids");
                    }
                    return Ok(ledger);
                }
                Err(err) => warn!(
                    location = %remote.location(),
                    error = %err,
                    "remote copy unusable; falling back to local cache"
                ),
            },
            Err(RemoteError::MissingCredential(var)) => {
                if self.remote_required && !self.cache.exists() {
                    return Err(BudgetError::MissingCredential(var));
                }
                warn!(variable = %var, "remote credential not set; running local-only");
            }
            Err(RemoteError::NotFound) => info!(
                location = %remote.location(),
                "no remote copy yet; using local cache"
            ),
            Err(err) => warn!(
                location = %remote.location(),
                error = %err,
                "remote fetch failed; falling back to local cache"
            ),
        }
        Ok(self.load())
    }

    /// Reads the local cache, or an empty ledger if it is missing or corrupt.
    pub fn load(&self) -> Ledger {
        self.cache.load()
    }

    /// Writes the local cache, then pushes the same bytes to the remote copy.
    ///
    /// Only a local write failure is returned as an error.
    pub fn save(&self, ledger: &Ledger) -> Result<SaveReport> {
        let json = self.cache.write(ledger)?;
        debug!(path = %self.cache.path().display(), "local cache written");
        let remote = match self.remote.as_deref() {
            Some(remote) => push(remote, &json),
            None => RemoteSync::Skipped("no remote store configured".into()),
        };
        Ok(SaveReport {
            path: self.cache.path().to_path_buf(),
            remote,
        })
    }
}

fn push(remote: &dyn RemoteStore, json: &str) -> RemoteSync {
    let revision = match remote.revision() {
        Ok(revision) => revision,
        Err(err) => return remote_failure(remote, err),
    };
    submit(remote, json, revision.as_deref())
}

fn submit(remote: &dyn RemoteStore, json: &str, revision: Option<&str>) -> RemoteSync {
    match remote.push(json.as_bytes(), revision) {
        Ok(revision) => {
            debug!(location = %remote.location(), %revision, "remote copy updated");
            RemoteSync::Pushed { revision }
        }
        Err(err) => remote_failure(remote, err),
    }
}

fn remote_failure(remote: &dyn RemoteStore, err: RemoteError) -> RemoteSync {
    match err {
        RemoteError::MissingCredential(var) => {
            warn!(variable = %var, "remote credential not set; skipping remote push");
            RemoteSync::Skipped(format!("credential variable `{var}` is not set"))
        }
        other => {
            warn!(
                location = %remote.location(),
                error = %other,
                "remote push failed; local cache kept"
            );
            RemoteSync::Failed(other.to_string())
        }
    }
}

fn decode_snapshot(content: &[u8]) -> Result<(Ledger, bool)> {
    let text =
        std::str::from_utf8(content).map_err(|err| BudgetError::CorruptCache(err.to_string()))?;
    parse_ledger_upgrading(text)
}

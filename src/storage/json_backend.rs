use std::{
    fs::{self, File},
    io::{ErrorKind, Write},
    path::{Path, PathBuf},
};

use tracing::{debug, error, info, warn};

use crate::{
    core::utils::ensure_dir,
    errors::{BudgetError, Result},
    ledger::Ledger,
};

const TMP_SUFFIX: &str = "tmp";

/// Local JSON copy of the ledger. Fast, but possibly wiped between deployments.
#[derive(Debug, Clone)]
pub struct LocalCache {
    path: PathBuf,
}

impl LocalCache {
    pub fn new(path: PathBuf) -> Self {
        Self { path }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn exists(&self) -> bool {
        self.path.is_file()
    }

    /// Reads the cache, distinguishing an absent file (`Ok(None)`) from a corrupt one.
    pub fn read(&self) -> Result<Option<Ledger>> {
        let data = match fs::read_to_string(&self.path) {
            Ok(data) => data,
            Err(err) if err.kind() == ErrorKind::NotFound => return Ok(None),
            Err(err) => return Err(err.into()),
        };
        let (ledger, upgraded) = parse_ledger_upgrading(&data)?;
        if upgraded {
            match self.write(&ledger) {
                Ok(_) => info!(path = %self.path.display(), "assigned ids to stored expenses"),
                Err(err) => warn!(
                    path = %self.path.display(),
                    error = %err,
                    "could not persist new expense ids; they will change on next load"
                ),
            }
        }
        Ok(Some(ledger))
    }

    /// Reads the cache, falling back to an empty ledger when the file is absent or unusable.
    ///
    /// A corrupt cache silently resets state; the only signal is the error log.
    pub fn load(&self) -> Ledger {
        match self.read() {
            Ok(Some(ledger)) => ledger,
            Ok(None) => {
                debug!(path = %self.path.display(), "no local cache; starting empty ledger");
                Ledger::default()
            }
            Err(err) => {
                error!(
                    path = %self.path.display(),
                    error = %err,
                    "local cache unusable; resetting to empty ledger"
                );
                Ledger::default()
            }
        }
    }

    /// Serializes and atomically writes the ledger, returning the JSON that was stored.
    pub fn write(&self, ledger: &Ledger) -> Result<String> {
        let json = serialize_ledger(ledger)?;
        self.write_raw(&json)?;
        Ok(json)
    }

    /// Replaces the cache contents with already-serialized data.
    pub fn write_raw(&self, data: &str) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            ensure_dir(parent)?;
        }
        let tmp = tmp_path(&self.path);
        write_atomic(&tmp, data)?;
        fs::rename(&tmp, &self.path)?;
        Ok(())
    }
}

pub fn serialize_ledger(ledger: &Ledger) -> Result<String> {
    Ok(serde_json::to_string_pretty(ledger)?)
}

/// Parses the persisted layout, reporting failures as [`BudgetError::CorruptCache`].
pub fn parse_ledger(data: &str) -> Result<Ledger> {
    parse_ledger_upgrading(data).map(|(ledger, _)| ledger)
}

/// Like [`parse_ledger`], also reporting whether expenses stored without an id were given
/// one. When `true`, `data` no longer matches the ledger and should be rewritten.
pub fn parse_ledger_upgrading(data: &str) -> Result<(Ledger, bool)> {
    let mut ledger: Ledger =
        serde_json::from_str(data).map_err(|err| BudgetError::CorruptCache(err.to_string()))?;
    let assigned = ledger.assign_missing_ids();
    Ok((ledger, assigned > 0))
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

fn write_atomic(path: &Path, data: &str) -> Result<()> {
    let mut file = File::create(path)?;
    file.write_all(data.as_bytes())?;
    file.flush()?;
    Ok(())
}

use dirs::home_dir;
use std::{
    env, fs, io,
    path::{Path, PathBuf},
};

const DEFAULT_DIR_NAME: &str = ".budget_ledger";
const CACHE_FILE: &str = "ledger.json";
const CONFIG_FILE: &str = "config.json";

/// Environment variable that relocates the application data directory.
pub const HOME_ENV: &str = "BUDGET_LEDGER_HOME";

/// Resolves the on-disk locations used by the cache and configuration.
pub struct PathResolver;

impl PathResolver {
    /// Returns the application data directory, defaulting to `~/.budget_ledger`.
    pub fn base_dir() -> PathBuf {
        if let Some(custom) = env::var_os(HOME_ENV) {
            return PathBuf::from(custom);
        }
        home_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join(DEFAULT_DIR_NAME)
    }

    pub fn resolve_base(custom: Option<PathBuf>) -> PathBuf {
        custom.unwrap_or_else(Self::base_dir)
    }

    pub fn cache_file_in(base: &Path) -> PathBuf {
        base.join(CACHE_FILE)
    }

    pub fn config_file_in(base: &Path) -> PathBuf {
        base.join(CONFIG_FILE)
    }
}

pub fn ensure_dir(path: &Path) -> io::Result<()> {
    if !path.exists() {
        fs::create_dir_all(path)?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn explicit_base_wins() {
        let base = PathResolver::resolve_base(Some(PathBuf::from("/srv/budget")));
        assert_eq!(base, PathBuf::from("/srv/budget"));
        assert_eq!(
            PathResolver::cache_file_in(&base),
            PathBuf::from("/srv/budget/ledger.json")
        );
        assert_eq!(
            PathResolver::config_file_in(&base),
            PathBuf::from("/srv/budget/config.json")
        );
    }
}

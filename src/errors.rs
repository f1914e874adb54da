use std::result::Result as StdResult;

use thiserror::Error;

use crate::storage::remote::RemoteError;

/// Unified error type for the ledger, persistence, and configuration layers.
#[derive(Error, Debug)]
pub enum BudgetError {
    #[error("Invalid input: {0}")]
    InvalidInput(String),
    #[error("Category not found: {0}")]
    CategoryNotFound(String),
    #[error("Persistence unavailable: {0}")]
    PersistenceUnavailable(String),
    #[error("Corrupt cache: {0}")]
    CorruptCache(String),
    #[error("Missing credential: environment variable `{0}` is not set")]
    MissingCredential(String),
    #[error("Persistence error: {0}")]
    StorageError(String),
    #[error("Configuration error: {0}")]
    ConfigError(String),
}

pub type Result<T> = StdResult<T, BudgetError>;

/// User-facing CLI error wrapper.
#[derive(Error, Debug)]
pub enum CliError {
    #[error(transparent)]
    Core(#[from] BudgetError),
    #[error("Invalid input: {0}")]
    Input(String),
    #[error("Output failed: {0}")]
    Output(#[from] std::io::Error),
}

impl From<std::io::Error> for BudgetError {
    fn from(err: std::io::Error) -> Self {
        BudgetError::StorageError(err.to_string())
    }
}

impl From<serde_json::Error> for BudgetError {
    fn from(err: serde_json::Error) -> Self {
        BudgetError::StorageError(err.to_string())
    }
}

impl From<RemoteError> for BudgetError {
    fn from(err: RemoteError) -> Self {
        match err {
            RemoteError::MissingCredential(var) => BudgetError::MissingCredential(var),
            other => BudgetError::PersistenceUnavailable(other.to_string()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_credential_keeps_variable_name() {
        let err: BudgetError = RemoteError::MissingCredential("GITHUB_TOKEN".into()).into();
        assert!(matches!(err, BudgetError::MissingCredential(ref var) if var == "GITHUB_TOKEN"));
    }

    #[test]
    fn remote_transport_failures_become_unavailable() {
        let err: BudgetError = RemoteError::Transport("connection refused".into()).into();
        match err {
            BudgetError::PersistenceUnavailable(message) => {
                assert!(message.contains("connection refused"))
            }
            other => panic!("expected persistence unavailable, got {other:?}"),
        }
    }
}

use thiserror::Error;

/// Failures raised while talking to a remote store.
#[derive(Debug, Error)]
pub enum RemoteError {
    #[error("credential variable `{0}` is not set")]
    MissingCredential(String),
    #[error("remote file not found")]
    NotFound,
    #[error("remote rejected the credential (HTTP {0})")]
    Unauthorized(u16),
    #[error("revision conflict: {0}")]
    Conflict(String),
    #[error("transport error: {0}")]
    Transport(String),
    #[error("unexpected HTTP status {status}: {message}")]
    Status { status: u16, message: String },
    #[error("invalid remote payload: {0}")]
    Decode(String),
}

/// Content and revision token of the remote copy.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RemoteSnapshot {
    pub content: Vec<u8>,
    pub revision: String,
}

/// A durable blob addressed by a fixed location, supporting conditional overwrite.
pub trait RemoteStore: Send + Sync {
    /// Fetches the current content and its revision token.
    fn fetch(&self) -> Result<RemoteSnapshot, RemoteError>;

    /// Creates or replaces the content. `revision` must carry the current token when the file
    /// already exists. Returns the new revision token.
    fn push(&self, content: &[u8], revision: Option<&str>) -> Result<String, RemoteError>;

    /// Human-readable location, used in logs.
    fn location(&self) -> String;

    /// Returns the current revision token, or `None` when nothing is stored yet.
    fn revision(&self) -> Result<Option<String>, RemoteError> {
        match self.fetch() {
            Ok(snapshot) => Ok(Some(snapshot.revision)),
            Err(RemoteError::NotFound) => Ok(None),
            Err(err) => Err(err),
        }
    }
}

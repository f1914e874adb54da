#![allow(dead_code)]

use std::{
    path::PathBuf,
    sync::{
        atomic::{AtomicUsize, Ordering},
        Arc, Mutex,
    },
};

use budget_ledger::{
    storage::{LocalCache, PersistenceGateway, RemoteError, RemoteSnapshot, RemoteStore},
    BudgetManager,
};
use once_cell::sync::Lazy;
use tempfile::TempDir;

/// Holds TempDir guards so temporary folders live for the duration of the test run.
static TEST_DIRS: Lazy<Mutex<Vec<TempDir>>> = Lazy::new(|| Mutex::new(Vec::new()));

/// Returns a fresh directory that outlives the calling test.
pub fn temp_dir() -> PathBuf {
    let temp = TempDir::new().expect("create temp dir");
    let path = temp.path().to_path_buf();
    TEST_DIRS.lock().expect("lock temp dir registry").push(temp);
    path
}

pub fn cache_in(dir: &std::path::Path) -> LocalCache {
    LocalCache::new(dir.join("ledger.json"))
}

/// How the fake remote misbehaves.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Failure {
    None,
    MissingCredential,
    Transport,
    /// Reads succeed, writes are rejected as stale.
    Conflict,
}

#[derive(Debug, Default)]
struct RemoteState {
    content: Option<Vec<u8>>,
    revision: usize,
}

/// In-memory stand-in for the remote durable copy, with revision checking.
#[derive(Clone)]
pub struct MemoryRemote {
    state: Arc<Mutex<RemoteState>>,
    failure: Arc<Mutex<Failure>>,
    pushes: Arc<AtomicUsize>,
}

impl MemoryRemote {
    pub fn empty() -> Self {
        Self {
            state: Arc::new(Mutex::new(RemoteState::default())),
            failure: Arc::new(Mutex::new(Failure::None)),
            pushes: Arc::new(AtomicUsize::new(0)),
        }
    }

    pub fn with_content(content: &str) -> Self {
        let remote = Self::empty();
        remote.seed(content);
        remote
    }

    pub fn seed(&self, content: &str) {
        let mut state = self.state.lock().expect("lock remote");
        state.content = Some(content.as_bytes().to_vec());
        state.revision += 1;
    }

    pub fn fail_with(&self, failure: Failure) {
        *self.failure.lock().expect("lock failure") = failure;
    }

    pub fn content(&self) -> Option<String> {
        let state = self.state.lock().expect("lock remote");
        state
            .content
            .as_ref()
            .map(|bytes| String::from_utf8_lossy(bytes).into_owned())
    }

    pub fn push_count(&self) -> usize {
        self.pushes.load(Ordering::SeqCst)
    }

    fn check(&self) -> Result<(), RemoteError> {
        match *self.failure.lock().expect("lock failure") {
            Failure::None => Ok(()),
            Failure::MissingCredential => {
                Err(RemoteError::MissingCredential("TEST_REMOTE_TOKEN".into()))
            }
            Failure::Transport => Err(RemoteError::Transport("connection refused".into())),
            Failure::Conflict => Ok(()),
        }
    }
}

impl RemoteStore for MemoryRemote {
    fn fetch(&self) -> Result<RemoteSnapshot, RemoteError> {
        self.check()?;
        let state = self.state.lock().expect("lock remote");
        match &state.content {
            Some(content) => Ok(RemoteSnapshot {
                content: content.clone(),
                revision: format!("rev-{}", state.revision),
            }),
            None => Err(RemoteError::NotFound),
        }
    }

    fn push(&self, content: &[u8], revision: Option<&str>) -> Result<String, RemoteError> {
        self.check()?;
        let mut state = self.state.lock().expect("lock remote");
        if *self.failure.lock().expect("lock failure") == Failure::Conflict {
            return Err(RemoteError::Conflict("file was updated elsewhere".into()));
        }
        let current = state
            .content
            .as_ref()
            .map(|_| format!("rev-{}", state.revision));
        if current.as_deref() != revision {
            return Err(RemoteError::Conflict(format!(
                "expected {current:?}, got {revision:?}"
            )));
        }
        state.content = Some(content.to_vec());
        state.revision += 1;
        self.pushes.fetch_add(1, Ordering::SeqCst);
        Ok(format!("rev-{}", state.revision))
    }

    fn location(&self) -> String {
        "memory:budget".into()
    }
}

/// Local-only manager over a fresh cache file.
pub fn local_manager() -> (BudgetManager, PathBuf) {
    let dir = temp_dir();
    let gateway = PersistenceGateway::new(cache_in(&dir));
    let manager = BudgetManager::open(gateway).expect("open local manager");
    (manager, dir)
}

/// Manager wired to `remote`, with its cache in a fresh directory.
pub fn remote_manager(remote: &MemoryRemote) -> (BudgetManager, PathBuf) {
    let dir = temp_dir();
    let gateway = PersistenceGateway::new(cache_in(&dir)).with_remote(Box::new(remote.clone()));
    let manager = BudgetManager::open(gateway).expect("open remote manager");
    (manager, dir)
}

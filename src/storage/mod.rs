pub mod gateway;
pub mod github;
pub mod json_backend;
pub mod remote;

pub use gateway::{PersistenceGateway, RemoteSync, SaveReport};
pub use github::GitHubContentStore;
pub use json_backend::{parse_ledger, serialize_ledger, LocalCache};
pub use remote::{RemoteError, RemoteSnapshot, RemoteStore};

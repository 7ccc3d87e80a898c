//! Storage layer for folio data.
//!
//! Each entity type owns one JSON document under the data directory:
//!
//! - `users.json` - object keyed by username: `{"alice": {"name": ..., "password": ...}}`
//! - `projects.json` - array of project objects
//!
//! Every operation re-reads the whole document and every write rewrites it.
//! Nothing is cached between calls and no file handle outlives a call.
//!
//! ## Concurrency
//!
//! There is no locking around the read-modify-write cycle. Two writers that
//! read the same prior state will both succeed, and the later rewrite replaces
//! the earlier one wholesale (last-write-wins at file granularity). Callers
//! that need more must serialise writes themselves.

pub mod document;
pub mod projects;
pub mod users;

pub use projects::ProjectStore;
pub use users::UserStore;

use std::path::PathBuf;

/// File name of the user document.
pub const USERS_FILE: &str = "users.json";
/// File name of the project document.
pub const PROJECTS_FILE: &str = "projects.json";

/// Failure to read, parse or write a backing document.
#[derive(Debug, thiserror::Error)]
pub enum StorageError {
    #[error("could not create data directory {}: {source}", .path.display())]
    CreateDir {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("failed to read {}: {source}", .path.display())]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("failed to write {}: {source}", .path.display())]
    Write {
        path: PathBuf,
        source: std::io::Error,
    },

    /// Syntax error, or a record with a missing or ill-typed field.
    #[error("malformed document {}: {source}", .path.display())]
    Malformed {
        path: PathBuf,
        source: serde_json::Error,
    },

    /// The document parsed but is not the expected container.
    #[error("invalid data format in {}: expected a JSON {expected}", .path.display())]
    InvalidShape {
        path: PathBuf,
        expected: &'static str,
    },

    #[error("failed to encode {}: {source}", .path.display())]
    Encode {
        path: PathBuf,
        source: serde_json::Error,
    },

    #[error("invalid record: {0}")]
    InvalidRecord(String),
}

/// Durable mapping between an identifier and a record, backed by one document.
///
/// `create`, `update` and `delete` report "no such record" / "already exists"
/// as `Ok(false)`; `Err` is reserved for storage failures.
pub trait RecordStore {
    /// Identifier type used for lookups.
    type Key: ?Sized;
    /// Stored entity.
    type Record;

    /// Read every record. A missing document is an empty store.
    fn read_all(&self) -> Result<Vec<Self::Record>, StorageError>;

    /// Look up one record. An empty key is "not found".
    fn get(&self, key: &Self::Key) -> Result<Option<Self::Record>, StorageError>;

    /// Insert a record. Returns `false` if its identity is already taken.
    fn create(&self, record: &Self::Record) -> Result<bool, StorageError>;

    /// Replace the record with the same identity. Returns `false` if none exists.
    fn update(&self, record: &Self::Record) -> Result<bool, StorageError>;

    /// Remove a record. Returns `false` if none matched.
    fn delete(&self, key: &Self::Key) -> Result<bool, StorageError>;

    /// Whether a record with this key exists.
    fn exists(&self, key: &Self::Key) -> Result<bool, StorageError> {
        Ok(self.get(key)?.is_some())
    }
}

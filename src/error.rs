//! Typed errors for the index store and its lock file.
//!
//! Higher layers (`index::update`, the CLI) wrap these in `anyhow` with
//! context; the store and lock keep concrete types so callers can tell a
//! lock failure from a write failure.

use std::io;
use std::path::PathBuf;
use thiserror::Error;

/// Errors from lock operations.
#[derive(Debug, Error)]
pub enum LockError {
    #[error("Failed to create lock directory {path}: {source}")]
    CreateDir {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("Failed to open lock file {path}: {source}")]
    Open {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("Failed to acquire lock on {path}: {source}")]
    Acquire {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

/// Errors from persisting an index snapshot.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("Failed to create index directory {path}: {source}")]
    CreateDir {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("Failed to serialize index: {0}")]
    Serialize(#[from] serde_json::Error),

    #[error("Failed to write index {path}: {source}")]
    Write {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error(transparent)]
    Lock(#[from] LockError),
}

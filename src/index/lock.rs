//! Cross-process index locking.
//!
//! Each index file has a sidecar lock file next to it. Holding an exclusive
//! advisory lock on that file (`flock` on Unix, `LockFileEx` on Windows, via
//! `fs2`) is what serializes writers. The lock file's contents are never
//! read and the file is never removed.

use crate::error::LockError;
use fs2::FileExt;
use std::fs::{self, File, OpenOptions};
use std::path::{Path, PathBuf};
use tracing::debug;

/// A guard that holds the exclusive lock for an index.
///
/// The lock is released when the guard is dropped, including during
/// unwinding.
pub struct IndexLock {
    file: File,
    lock_path: PathBuf,
}

impl IndexLock {
    /// Block until the exclusive lock for `index_path` is acquired.
    ///
    /// Creates the lock file (and its parent directories) if needed. There
    /// is no timeout.
    pub fn acquire(index_path: &Path) -> Result<Self, LockError> {
        let lock_path = lock_path_for(index_path);

        if let Some(parent) = lock_path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent).map_err(|source| LockError::CreateDir {
                path: parent.to_path_buf(),
                source,
            })?;
        }

        let file = OpenOptions::new()
            .read(true)
            .write(true)
            .create(true)
            .truncate(false)
            .open(&lock_path)
            .map_err(|source| LockError::Open {
                path: lock_path.clone(),
                source,
            })?;

        debug!("Waiting for index lock: {}", lock_path.display());
        FileExt::lock_exclusive(&file).map_err(|source| LockError::Acquire {
            path: lock_path.clone(),
            source,
        })?;
        debug!("Acquired index lock: {}", lock_path.display());

        Ok(Self { file, lock_path })
    }

    /// Get the path to the lock file.
    pub fn lock_path(&self) -> &Path {
        &self.lock_path
    }
}

impl Drop for IndexLock {
    fn drop(&mut self) {
        if let Err(e) = FileExt::unlock(&self.file) {
            debug!("Failed to unlock {}: {}", self.lock_path.display(), e);
        }
        debug!("Released index lock: {}", self.lock_path.display());
    }
}

impl std::fmt::Debug for IndexLock {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("IndexLock")
            .field("lock_path", &self.lock_path)
            .finish()
    }
}

/// Get the lock file path for an index path.
///
/// The index's extension is replaced by `lock`:
/// - `.claude/aboutme-index.json` -> `.claude/aboutme-index.lock`
/// - `data/index` -> `data/index.lock`
pub fn lock_path_for(index_path: &Path) -> PathBuf {
    index_path.with_extension("lock")
}

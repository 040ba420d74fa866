//! On-disk index storage.
//!
//! The index is a pretty-printed JSON object with sorted keys. Loading never
//! fails: a missing or corrupt file reads as an empty index and is replaced
//! by the next save. Saves write a temporary file in the same directory and
//! rename it over the index, so readers never observe a half-written file.
//! A replaced index keeps its permissions; a new one gets the umask default.

use crate::error::StoreError;
use crate::index::lock::IndexLock;
use crate::index::types::Index;
use anyhow::Result;
use std::fs;
use std::io::Write;
use std::path::Path;
use tracing::{debug, info, warn};

/// Load an index, returning an empty one if it is missing or unreadable.
pub fn load_index(index_path: &Path) -> Index {
    let content = match fs::read_to_string(index_path) {
        Ok(content) => content,
        Err(e) => {
            debug!("No readable index at {}: {}", index_path.display(), e);
            return Index::new();
        }
    };

    match serde_json::from_str(&content) {
        Ok(index) => index,
        Err(e) => {
            warn!(
                "Discarding corrupt index {}: {}",
                index_path.display(),
                e
            );
            Index::new()
        }
    }
}

/// Serialize an index the way it is stored on disk.
pub fn index_to_json(index: &Index) -> Result<String, StoreError> {
    Ok(serde_json::to_string_pretty(index)?)
}

/// Save an index, replacing the file atomically.
///
/// Parent directories are created as needed. Does not take the lock; use
/// [`locked_save_index`] or [`with_lock`] when other writers may be active.
pub fn save_index(index: &Index, index_path: &Path) -> Result<(), StoreError> {
    let dir = match index_path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };
    fs::create_dir_all(dir).map_err(|source| StoreError::CreateDir {
        path: dir.to_path_buf(),
        source,
    })?;

    let json = index_to_json(index)?;
    let write_err = |source: std::io::Error| StoreError::Write {
        path: index_path.to_path_buf(),
        source,
    };

    #[cfg_attr(not(unix), allow(unused_mut))]
    let mut builder = tempfile::Builder::new();
    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;
        builder.permissions(fs::Permissions::from_mode(0o666));
    }
    let mut tmp = builder.tempfile_in(dir).map_err(write_err)?;
    if let Ok(existing) = fs::metadata(index_path) {
        tmp.as_file()
            .set_permissions(existing.permissions())
            .map_err(write_err)?;
    }
    tmp.write_all(json.as_bytes()).map_err(write_err)?;
    tmp.as_file().sync_all().map_err(write_err)?;
    tmp.persist(index_path).map_err(|e| write_err(e.error))?;

    debug!("Saved {} entries to {}", index.len(), index_path.display());
    Ok(())
}

/// Run a read-modify-write transaction on an index.
///
/// The exclusive lock is held from before the load until after the save, so
/// concurrent transactions on the same index never interleave. `body`
/// receives the loaded index and may mutate it; when it returns `Ok` the
/// index is saved. When it returns `Err` (or panics) nothing is saved, the
/// lock is released, and the error is returned.
pub fn with_lock<T, F>(index_path: &Path, body: F) -> Result<T>
where
    F: FnOnce(&mut Index) -> Result<T>,
{
    let _lock = IndexLock::acquire(index_path)?;

    let mut index = load_index(index_path);
    #[cfg(debug_assertions)]
    hold_for_testing();
    let value = body(&mut index)?;
    save_index(&index, index_path)?;

    info!("Committed index transaction: {}", index_path.display());
    Ok(value)
}

/// Env var naming a delay, in milliseconds, between load and save in
/// [`with_lock`]. Debug builds only.
#[cfg(debug_assertions)]
pub const HOLD_ENV: &str = "ABOUTME_TEST_HOLD_MS";

#[cfg(debug_assertions)]
fn hold_for_testing() {
    let millis = std::env::var(HOLD_ENV)
        .ok()
        .and_then(|v| v.parse::<u64>().ok());
    if let Some(millis) = millis {
        debug!("Holding index lock for {}ms", millis);
        std::thread::sleep(std::time::Duration::from_millis(millis));
    }
}

/// Save an index under the lock, without reading it first.
///
/// Used by full rebuilds, whose result replaces whatever was there.
pub fn locked_save_index(index: &Index, index_path: &Path) -> Result<(), StoreError> {
    let _lock = IndexLock::acquire(index_path)?;
    save_index(index, index_path)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::index::lock::lock_path_for;
    use anyhow::anyhow;
    use std::sync::Arc;
    use std::thread;
    use std::time::Duration;
    use tempfile::TempDir;

    fn sample() -> Index {
        let mut index = Index::new();
        index.insert("b.py".to_string(), "second".to_string());
        index.insert("a.py".to_string(), "first".to_string());
        index
    }

    #[test]
    fn test_load_missing_index() {
        let dir = TempDir::new().unwrap();
        assert!(load_index(&dir.path().join("missing.json")).is_empty());
    }

    #[test]
    fn test_load_corrupt_index() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("index.json");

        fs::write(&path, "{ not json").unwrap();
        assert!(load_index(&path).is_empty());

        // Valid JSON of the wrong shape is treated the same way
        fs::write(&path, r#"["a.py"]"#).unwrap();
        assert!(load_index(&path).is_empty());
        fs::write(&path, r#"{"a.py": 3}"#).unwrap();
        assert!(load_index(&path).is_empty());
    }

    #[test]
    fn test_save_creates_dirs_and_sorts_keys() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join(".claude/aboutme-index.json");

        save_index(&sample(), &path).unwrap();

        let content = fs::read_to_string(&path).unwrap();
        assert_eq!(
            content,
            "{\n  \"a.py\": \"first\",\n  \"b.py\": \"second\"\n}"
        );
        assert_eq!(load_index(&path), sample());
    }

    #[test]
    fn test_save_empty_index() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("index.json");

        save_index(&Index::new(), &path).unwrap();
        assert_eq!(fs::read_to_string(&path).unwrap(), "{}");
    }

    #[test]
    fn test_save_replaces_corrupt_index() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("index.json");
        fs::write(&path, "garbage").unwrap();

        with_lock(&path, |index| {
            index.insert("new.py".to_string(), "fresh".to_string());
            Ok(())
        })
        .unwrap();

        let index = load_index(&path);
        assert_eq!(index.len(), 1);
        assert_eq!(index["new.py"], "fresh");
    }

    #[test]
    fn test_with_lock_persists_mutation() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("index.json");
        save_index(&sample(), &path).unwrap();

        let removed = with_lock(&path, |index| Ok(index.remove("a.py"))).unwrap();

        assert_eq!(removed.as_deref(), Some("first"));
        assert!(!load_index(&path).contains_key("a.py"));
        assert!(lock_path_for(&path).exists());
    }

    #[test]
    fn test_with_lock_error_skips_save_and_releases() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("index.json");
        save_index(&sample(), &path).unwrap();

        let result: Result<()> = with_lock(&path, |index| {
            index.clear();
            Err(anyhow!("body failed"))
        });

        assert!(result.is_err());
        assert_eq!(load_index(&path), sample());

        // Lock must be free again
        with_lock(&path, |_| Ok(())).unwrap();
    }

    #[test]
    fn test_with_lock_panic_releases_lock() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("index.json");

        let panicking = path.clone();
        let outcome = thread::spawn(move || {
            let _ = with_lock(&panicking, |_| -> Result<()> { panic!("boom") });
        })
        .join();
        assert!(outcome.is_err());

        with_lock(&path, |_| Ok(())).unwrap();
        assert!(path.exists());
    }

    #[cfg(unix)]
    #[test]
    fn test_with_lock_keeps_index_permissions() {
        use std::os::unix::fs::PermissionsExt;

        let dir = TempDir::new().unwrap();
        let path = dir.path().join("index.json");
        save_index(&sample(), &path).unwrap();

        for mode in [0o644, 0o640] {
            fs::set_permissions(&path, fs::Permissions::from_mode(mode)).unwrap();
            with_lock(&path, |index| {
                index.insert("c.py".to_string(), "third".to_string());
                Ok(())
            })
            .unwrap();

            let saved = fs::metadata(&path).unwrap().permissions().mode() & 0o777;
            assert_eq!(saved, mode);
        }
        assert_eq!(load_index(&path)["c.py"], "third");
    }

    #[cfg(unix)]
    #[test]
    fn test_new_index_is_not_owner_only() {
        use std::os::unix::fs::PermissionsExt;

        let dir = TempDir::new().unwrap();
        let path = dir.path().join("index.json");
        save_index(&sample(), &path).unwrap();

        // Group/other read survives any usual umask (022, 002, 027)
        let mode = fs::metadata(&path).unwrap().permissions().mode() & 0o777;
        assert_eq!(mode & 0o640, 0o640);
    }

    #[test]
    fn test_locked_save_overwrites() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("index.json");
        save_index(&sample(), &path).unwrap();

        let mut replacement = Index::new();
        replacement.insert("c.py".to_string(), "only".to_string());
        locked_save_index(&replacement, &path).unwrap();

        assert_eq!(load_index(&path), replacement);
    }

    #[test]
    fn test_concurrent_transactions_lose_no_updates() {
        let dir = TempDir::new().unwrap();
        let path = Arc::new(dir.path().join("index.json"));

        let workers: Vec<_> = (0..8)
            .map(|i| {
                let path = path.clone();
                thread::spawn(move || {
                    with_lock(&path, |index| {
                        // Widen the window between load and save
                        thread::sleep(Duration::from_millis(25));
                        index.insert(format!("file_{i}.py"), format!("worker {i}"));
                        Ok(())
                    })
                    .unwrap();
                })
            })
            .collect();

        for worker in workers {
            worker.join().unwrap();
        }

        let index = load_index(&path);
        assert_eq!(index.len(), 8);
        for i in 0..8 {
            assert_eq!(index[&format!("file_{i}.py")], format!("worker {i}"));
        }
    }
}

//! Single-file incremental index update.

use crate::index::store::with_lock;
use crate::index::types::{IndexUpdate, UpdateAction};
use crate::utils::{extract_header, relative_key, resolve_path, resolve_project_root, should_skip_dir};
use anyhow::Result;
use std::path::{Component, Path};
use tracing::{debug, info};

/// Bring one file's entry in the index up to date.
///
/// The project root is `project_dir` if given, otherwise the nearest
/// ancestor of the file holding a project marker, otherwise the current
/// directory. `index_path` is resolved against the project root unless it is
/// absolute.
///
/// Returns the mutation applied, or `None` if the index was left alone: the
/// file sits under an excluded directory, or it has no header and was not
/// indexed.
pub fn update_file(
    file_path: &Path,
    index_path: &Path,
    project_dir: Option<&Path>,
) -> Result<Option<IndexUpdate>> {
    let file = resolve_path(file_path);
    let project_root = resolve_project_root(&file, project_dir);
    let index_path = project_root.join(index_path);

    let key = index_key(&file, &project_root);

    if is_excluded_key(&key) {
        debug!("Skipping excluded path {}", key);
        return Ok(None);
    }

    let description = extract_header(&file);

    let action = with_lock(&index_path, |index| {
        Ok(match description {
            Some(description) => {
                index.insert(key.clone(), description);
                Some(UpdateAction::Updated)
            }
            None => index.remove(&key).map(|_| UpdateAction::Removed),
        })
    })?;

    match action {
        Some(action) => {
            info!("{} {} in {}", action, key, index_path.display());
            Ok(Some(IndexUpdate { action, key }))
        }
        None => Ok(None),
    }
}

/// Index key for a file: relative to the project root with `/` separators,
/// or the absolute path when the file lies outside the root.
pub fn index_key(file: &Path, project_root: &Path) -> String {
    relative_key(file, project_root).unwrap_or_else(|| {
        debug!(
            "{} is outside {}, keying by absolute path",
            file.display(),
            project_root.display()
        );
        file.to_string_lossy().into_owned()
    })
}

/// Check if any segment of a key names an excluded directory.
pub fn is_excluded_key(key: &str) -> bool {
    Path::new(key).components().any(|c| match c {
        Component::Normal(name) => should_skip_dir(&name.to_string_lossy()),
        _ => false,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::index::store::{load_index, save_index};
    use crate::index::types::Index;
    use std::fs;
    use std::path::PathBuf;
    use tempfile::TempDir;

    const INDEX: &str = ".claude/aboutme-index.json";

    fn project() -> (TempDir, PathBuf) {
        let dir = TempDir::new().unwrap();
        let root = dir.path().canonicalize().unwrap();
        fs::create_dir_all(root.join(".claude")).unwrap();
        (dir, root)
    }

    fn write(root: &Path, rel: &str, content: &str) -> PathBuf {
        let path = root.join(rel);
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(&path, content).unwrap();
        path
    }

    #[test]
    fn test_is_excluded_key() {
        assert!(is_excluded_key("node_modules/pkg/index.js"));
        assert!(is_excluded_key("src/__pycache__/a.pyc"));
        assert!(is_excluded_key("lib/foo.egg-info/PKG-INFO"));
        assert!(is_excluded_key("dist"));
        assert!(!is_excluded_key("src/app.py"));
        assert!(!is_excluded_key("/abs/src/app.py"));
    }

    #[test]
    fn test_index_key_fallback_to_absolute() {
        let root = Path::new("/proj");
        assert_eq!(index_key(Path::new("/proj/a/b.py"), root), "a/b.py");
        assert_eq!(index_key(Path::new("/other/b.py"), root), "/other/b.py");
    }

    #[test]
    fn test_update_then_remove() {
        let (_dir, root) = project();
        let file = write(&root, "src/app.py", "# ABOUTME: X\n");

        let update = update_file(&file, Path::new(INDEX), None).unwrap().unwrap();
        assert_eq!(update.action, UpdateAction::Updated);
        assert_eq!(update.key, "src/app.py");
        assert_eq!(load_index(&root.join(INDEX))["src/app.py"], "X");

        fs::write(&file, "print('no header')\n").unwrap();
        let update = update_file(&file, Path::new(INDEX), None).unwrap().unwrap();
        assert_eq!(update.action, UpdateAction::Removed);
        assert!(load_index(&root.join(INDEX)).is_empty());
    }

    #[test]
    fn test_update_is_idempotent() {
        let (_dir, root) = project();
        let file = write(&root, "a.sh", "#!/bin/sh\n# ABOUTME: deploys\n");

        for _ in 0..2 {
            let update = update_file(&file, Path::new(INDEX), None).unwrap().unwrap();
            assert_eq!(update.action, UpdateAction::Updated);
        }
        let index = load_index(&root.join(INDEX));
        assert_eq!(index.len(), 1);
        assert_eq!(index["a.sh"], "deploys");
    }

    #[test]
    fn test_no_header_never_indexed_is_noop() {
        let (_dir, root) = project();
        let file = write(&root, "plain.py", "import os\n");

        assert_eq!(update_file(&file, Path::new(INDEX), None).unwrap(), None);
        assert!(load_index(&root.join(INDEX)).is_empty());
    }

    #[test]
    fn test_deleted_file_is_removed() {
        let (_dir, root) = project();
        let file = write(&root, "gone.py", "# ABOUTME: temporary\n");
        update_file(&file, Path::new(INDEX), None).unwrap();

        fs::remove_file(&file).unwrap();
        let update = update_file(&file, Path::new(INDEX), None).unwrap().unwrap();
        assert_eq!(update.action, UpdateAction::Removed);
        assert_eq!(update.key, "gone.py");
    }

    #[test]
    fn test_excluded_dir_is_skipped() {
        let (_dir, root) = project();
        let file = write(&root, "node_modules/pkg/index.js", "// ABOUTME: vendored\n");

        assert_eq!(update_file(&file, Path::new(INDEX), None).unwrap(), None);
        assert!(!root.join(INDEX).exists());
    }

    #[test]
    fn test_excluded_dir_does_not_remove_existing_entry() {
        let (_dir, root) = project();
        let mut existing = Index::new();
        existing.insert("build/gen.py".to_string(), "stale".to_string());
        save_index(&existing, &root.join(INDEX)).unwrap();

        let file = write(&root, "build/gen.py", "import os\n");
        assert_eq!(update_file(&file, Path::new(INDEX), None).unwrap(), None);
        assert_eq!(load_index(&root.join(INDEX)), existing);
    }

    #[test]
    fn test_explicit_project_dir() {
        let dir = TempDir::new().unwrap();
        let root = dir.path().canonicalize().unwrap();
        let file = write(&root, "pkg/mod.py", "# ABOUTME: module\n");

        let update = update_file(&file, Path::new("index.json"), Some(&root.join("pkg")))
            .unwrap()
            .unwrap();
        assert_eq!(update.key, "mod.py");
        assert_eq!(load_index(&root.join("pkg/index.json"))["mod.py"], "module");
    }

    #[test]
    fn test_file_outside_project_dir_uses_absolute_key() {
        let project_dir = TempDir::new().unwrap();
        let elsewhere = TempDir::new().unwrap();
        let file = write(
            &elsewhere.path().canonicalize().unwrap(),
            "stray.py",
            "# ABOUTME: stray\n",
        );

        let update = update_file(&file, Path::new("index.json"), Some(project_dir.path()))
            .unwrap()
            .unwrap();
        assert_eq!(update.key, file.to_string_lossy());
        let index = load_index(&project_dir.path().join("index.json"));
        assert_eq!(index[&update.key], "stray");
    }

    #[test]
    fn test_absolute_index_path() {
        let (_dir, root) = project();
        let other = TempDir::new().unwrap();
        let index_path = other.path().join("shared.json");
        let file = write(&root, "a.py", "# ABOUTME: a\n");

        update_file(&file, &index_path, None).unwrap();
        assert_eq!(load_index(&index_path)["a.py"], "a");
        assert!(!root.join(INDEX).exists());
    }
}

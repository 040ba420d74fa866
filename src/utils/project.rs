//! Project root discovery and path resolution.

use std::path::{Path, PathBuf};

/// Entries whose presence marks a directory as a project root
pub const PROJECT_MARKERS: &[&str] = &[".claude", ".git"];

/// Find the root of a project starting from a given directory.
///
/// Walks up from `start` (inclusive) looking for a directory containing one
/// of [`PROJECT_MARKERS`]. The filesystem root itself is never a project
/// root: the search stops below it and returns `None`, so callers fall back
/// to the current directory.
pub fn find_project_root(start: &Path) -> Option<PathBuf> {
    start
        .ancestors()
        .take_while(|dir| dir.parent().is_some())
        .find(|dir| PROJECT_MARKERS.iter().any(|m| dir.join(m).exists()))
        .map(Path::to_path_buf)
}

/// Resolve the project root for a file: explicit root, marker search from the
/// file's directory, then the current directory.
pub fn resolve_project_root(file: &Path, explicit: Option<&Path>) -> PathBuf {
    if let Some(dir) = explicit {
        return resolve_path(dir);
    }

    file.parent()
        .and_then(find_project_root)
        .or_else(|| std::env::current_dir().ok())
        .unwrap_or_else(|| PathBuf::from("."))
}

/// Make a path absolute, resolving symlinks where possible.
///
/// Unlike `canonicalize`, this does not require the path to exist: a missing
/// file is resolved through its parent directory so a deleted file maps to
/// the same location it had while it existed.
pub fn resolve_path(path: &Path) -> PathBuf {
    if let Ok(canonical) = path.canonicalize() {
        return canonical;
    }

    let absolute = std::path::absolute(path).unwrap_or_else(|_| path.to_path_buf());
    match (absolute.parent(), absolute.file_name()) {
        (Some(parent), Some(name)) => match parent.canonicalize() {
            Ok(parent) => parent.join(name),
            Err(_) => absolute,
        },
        _ => absolute,
    }
}

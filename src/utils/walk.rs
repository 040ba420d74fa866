//! Project tree traversal with fixed directory exclusions.
//!
//! The walk uses `ignore::WalkBuilder` with every built-in filter turned off
//! (hidden files, `.gitignore`, global excludes), so the only pruning is the
//! fixed exclusion list below. Excluded directories are never entered.

use ignore::WalkBuilder;
use std::path::{Path, PathBuf};
use tracing::debug;

/// Directory names that are never entered
pub const EXCLUDED_DIRS: &[&str] = &[
    ".venv",
    "venv",
    ".env",
    "node_modules",
    "__pycache__",
    ".git",
    ".tox",
    ".pytest_cache",
    ".mypy_cache",
    ".ruff_cache",
    "dist",
    "build",
    "cdk.out",
];

/// Directory name suffixes that are never entered
pub const EXCLUDED_SUFFIXES: &[&str] = &[".egg-info"];

/// Extensions of files expected to carry a header (missing-header report)
pub const HEADER_EXTENSIONS: &[&str] = &["py", "sh", "yml", "yaml", "toml"];

/// Which files a walk yields
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum WalkMode {
    /// Every file under a non-excluded directory
    #[default]
    AllFiles,
    /// Only files whose extension is in [`HEADER_EXTENSIONS`]
    HeaderExtensions,
}

impl WalkMode {
    fn accepts(self, path: &Path) -> bool {
        match self {
            WalkMode::AllFiles => true,
            WalkMode::HeaderExtensions => has_header_extension(path),
        }
    }
}

/// Check if a directory name is excluded from traversal
pub fn should_skip_dir(name: &str) -> bool {
    EXCLUDED_DIRS.contains(&name) || EXCLUDED_SUFFIXES.iter().any(|s| name.ends_with(s))
}

/// Check if a file's extension is one that should carry a header
pub fn has_header_extension(path: &Path) -> bool {
    path.extension()
        .and_then(|e| e.to_str())
        .map(|ext| {
            let ext = ext.to_ascii_lowercase();
            HEADER_EXTENSIONS.contains(&ext.as_str())
        })
        .unwrap_or(false)
}

/// Walk `root`, yielding absolute paths of candidate files.
///
/// The iterator is lazy. Order is unspecified. Unreadable entries are
/// skipped.
pub fn walk_files(root: &Path, mode: WalkMode) -> impl Iterator<Item = PathBuf> {
    let walker = WalkBuilder::new(root)
        .standard_filters(false)
        .follow_links(false)
        .filter_entry(|entry| {
            // The root is never pruned, whatever its name
            if entry.depth() == 0 {
                return true;
            }
            let is_dir = entry.file_type().map(|ft| ft.is_dir()).unwrap_or(false);
            if !is_dir {
                return true;
            }
            let name = entry.file_name().to_string_lossy();
            if should_skip_dir(&name) {
                debug!("Pruning {}", entry.path().display());
                return false;
            }
            true
        })
        .build();

    walker
        .filter_map(|entry| match entry {
            Ok(entry) => Some(entry),
            Err(e) => {
                debug!("Walk error: {}", e);
                None
            }
        })
        .filter(|entry| entry.depth() > 0 && entry.path().is_file())
        .map(|entry| entry.into_path())
        .filter(move |path| mode.accepts(path))
}

/// Convert `path` to a `/`-separated key relative to `root`.
///
/// Returns `None` if `path` is not under `root`.
pub fn relative_key(path: &Path, root: &Path) -> Option<String> {
    let rel = path.strip_prefix(root).ok()?;
    let parts: Vec<_> = rel
        .components()
        .map(|c| c.as_os_str().to_string_lossy())
        .collect();
    Some(parts.join("/"))
}

//! Full index builds, missing-header reports and staleness checks.

use crate::index::types::{Index, Staleness};
use crate::utils::{extract_header, relative_key, walk_files, WalkMode};
use rayon::prelude::*;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::SystemTime;
use tracing::{debug, info};

/// Build a complete index of every file under `root`.
///
/// Paths are collected first, then headers are extracted in parallel. Files
/// that cannot be read are skipped.
pub fn build_index(root: &Path) -> Index {
    let files: Vec<PathBuf> = walk_files(root, WalkMode::AllFiles).collect();
    let total_files = files.len();

    let index: Index = files
        .par_iter()
        .filter_map(|path| {
            let description = extract_header(path)?;
            let key = relative_key(path, root)?;
            Some((key, description))
        })
        .collect();

    info!(
        "Indexed {} of {} files under {}",
        index.len(),
        total_files,
        root.display()
    );
    index
}

/// List files that should carry a header but don't.
///
/// Only files with a header-relevant extension are considered. The result
/// is sorted so reports are stable between runs.
pub fn find_missing_headers(root: &Path) -> Vec<String> {
    let files: Vec<PathBuf> = walk_files(root, WalkMode::HeaderExtensions).collect();

    let mut missing: Vec<String> = files
        .par_iter()
        .filter(|path| extract_header(path).is_none())
        .filter_map(|path| relative_key(path, root))
        .collect();

    missing.sort();
    missing
}

/// Check whether any file under `root` was modified after the index.
///
/// This compares modification times only. Files whose metadata cannot be
/// read are ignored.
pub fn check_staleness(root: &Path, index_path: &Path) -> Staleness {
    let index_mtime = match fs::metadata(index_path) {
        Ok(meta) => meta.modified().unwrap_or(SystemTime::UNIX_EPOCH),
        Err(_) => return Staleness::missing(),
    };

    let mut newest: Option<(SystemTime, PathBuf)> = None;

    for path in walk_files(root, WalkMode::AllFiles) {
        let mtime = match fs::metadata(&path).and_then(|m| m.modified()) {
            Ok(mtime) => mtime,
            Err(e) => {
                debug!("Cannot stat {}: {}", path.display(), e);
                continue;
            }
        };

        if newest.as_ref().is_none_or(|(current, _)| mtime > *current) {
            newest = Some((mtime, path));
        }
    }

    match newest {
        Some((mtime, path)) if mtime > index_mtime => {
            let shown = relative_key(&path, root).unwrap_or_else(|| path.display().to_string());
            Staleness::newer_file(&shown)
        }
        _ => Staleness::up_to_date(),
    }
}

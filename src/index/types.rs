use serde::Serialize;
use std::collections::BTreeMap;
use std::fmt;

/// Path -> description mapping. `BTreeMap` keeps keys sorted, so every
/// serialization of the same mapping is byte-identical.
pub type Index = BTreeMap<String, String>;

/// What an incremental update did to the index
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum UpdateAction {
    /// Entry inserted or overwritten
    Updated,
    /// Entry deleted because the file no longer has a header
    Removed,
}

impl fmt::Display for UpdateAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            UpdateAction::Updated => write!(f, "updated"),
            UpdateAction::Removed => write!(f, "removed"),
        }
    }
}

/// A mutation applied by an incremental update
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IndexUpdate {
    pub action: UpdateAction,
    /// Index key of the file (project-relative, or absolute as a fallback)
    pub key: String,
}

/// Result of comparing the index's mtime against the tree
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Staleness {
    pub stale: bool,
    pub message: String,
}

impl Staleness {
    pub fn missing() -> Self {
        Self {
            stale: true,
            message: "Index does not exist".to_string(),
        }
    }

    pub fn newer_file(path: &str) -> Self {
        Self {
            stale: true,
            message: format!("Index is stale. Newest file: {path}"),
        }
    }

    pub fn up_to_date() -> Self {
        Self {
            stale: false,
            message: "Index is up to date".to_string(),
        }
    }
}

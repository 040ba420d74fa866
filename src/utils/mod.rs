//! Utility functions shared by the index builders.
//!
//! ## Modules
//!
//! - [`header`] - ABOUTME header extraction from the first two lines of a file
//! - [`walk`] - Tree traversal with the fixed directory exclusions
//! - [`project`] - Project root discovery and path resolution
//! - [`app_data`] - User configuration (JSON, XDG-style config directory)
//! - [`progress`] - Optional stderr spinner
//!
//! ## Key Functions
//!
//! ```no_run
//! use aboutme::utils::{extract_header, walk_files, WalkMode};
//! use std::path::Path;
//!
//! for path in walk_files(Path::new("."), WalkMode::AllFiles) {
//!     if let Some(description) = extract_header(&path) {
//!         println!("{}: {}", path.display(), description);
//!     }
//! }
//! ```

pub mod app_data;
pub mod header;
pub mod progress;
pub mod project;
pub mod walk;

pub use app_data::*;
pub use header::*;
pub use project::*;
pub use walk::*;

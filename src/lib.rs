//! # aboutme - ABOUTME header index
//!
//! Source files in a project carry a short description of themselves in
//! their first two lines:
//!
//! ```text
//! # ABOUTME: Parses the input stream.
//! # ABOUTME: Validates records before they reach the store.
//! ```
//!
//! This crate keeps a JSON index mapping project-relative paths to those
//! descriptions, so tools can answer "what is this file for" without opening
//! it.
//!
//! ## Architecture
//!
//! - [`utils`] - Header extraction, tree walking, project-root resolution, config
//! - [`index`] - Index store, lock file, full rebuild and incremental update
//! - [`output`] - Report formatting for the command line
//! - [`logging`] - `tracing` subscriber setup
//! - [`error`] - Typed errors for the store and lock layers
//!
//! ## Quick Start
//!
//! ```no_run
//! use aboutme::index::{build_index, locked_save_index, update_file};
//! use std::path::Path;
//!
//! // Full rebuild of a project
//! let root = Path::new("/path/to/project");
//! let index = build_index(root);
//! locked_save_index(&index, &root.join(".claude/aboutme-index.json")).unwrap();
//!
//! // Later, after one file changes
//! let update = update_file(
//!     Path::new("/path/to/project/src/app.py"),
//!     Path::new(".claude/aboutme-index.json"),
//!     None,
//! )
//! .unwrap();
//!
//! if let Some(update) = update {
//!     println!("{}: {}", update.action, update.key);
//! }
//! ```
//!
//! ## Concurrency
//!
//! Every read-modify-write of the index happens under an exclusive advisory
//! lock on a sidecar `.lock` file, held from before the load until after the
//! save. Independent processes updating different files against the same
//! index are therefore serialized and never lose each other's entries.

pub mod error;
pub mod index;
pub mod logging;
pub mod output;
pub mod utils;

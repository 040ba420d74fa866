pub mod build;
pub mod lock;
pub mod store;
pub mod types;
pub mod update;

pub use build::{build_index, check_staleness, find_missing_headers};
pub use lock::{lock_path_for, IndexLock};
pub use store::{index_to_json, load_index, locked_save_index, save_index, with_lock};
pub use types::*;
pub use update::update_file;

//! Project loading: unit files from disk and library search paths.

mod error;
mod loader;
mod search_path;

pub use error::LoadError;
pub use loader::{UnitLoader, collect_unit_paths, is_unit_file, load_file};
pub use search_path::SearchPath;

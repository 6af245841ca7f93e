pub mod discovery;
pub mod metadata;

use std::path::PathBuf;

pub use discovery::discover_image_directories;
pub use metadata::image_dimensions;

/// A directory holding image files, the unit an index file covers.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImageDirectory {
    pub path: PathBuf,
    /// Bare file names, sorted.
    pub file_names: Vec<String>,
}

use anyhow::Result;
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

use super::ImageDirectory;

/// Walk `root` and group image files by their directory.
///
/// Directories are returned sorted by path, file names sorted within each
/// directory. Directories without images are left out.
pub fn discover_image_directories(root: &Path, extensions: &[String]) -> Result<Vec<ImageDirectory>> {
    let mut directories: BTreeMap<PathBuf, Vec<String>> = BTreeMap::new();

    for entry in WalkDir::new(root)
        .follow_links(false)
        .into_iter()
        .filter_map(|e| e.ok())
    {
        let path = entry.path();

        if !entry.file_type().is_file() || !has_image_extension(path, extensions) {
            continue;
        }

        if let (Some(parent), Some(name)) = (path.parent(), path.file_name()) {
            directories
                .entry(parent.to_path_buf())
                .or_default()
                .push(name.to_string_lossy().to_string());
        }
    }

    Ok(directories
        .into_iter()
        .map(|(path, mut file_names)| {
            file_names.sort();
            ImageDirectory { path, file_names }
        })
        .collect())
}

fn has_image_extension(path: &Path, extensions: &[String]) -> bool {
    path.extension()
        .map(|ext| {
            let ext = ext.to_string_lossy();
            extensions.iter().any(|e| e.eq_ignore_ascii_case(&ext))
        })
        .unwrap_or(false)
}

use log::debug;
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

use crate::error::DocsError;

/// Returns every file under `root` whose name ends with `suffix`.
///
/// Entries are visited in file-name order and symlinks are not followed.
/// The first traversal error aborts the walk.
pub fn find_templates(root: &Path, suffix: &str) -> Result<Vec<PathBuf>, DocsError> {
    let mut templates = Vec::new();
    for entry in WalkDir::new(root).sort_by_file_name() {
        let entry = entry.map_err(|source| DocsError::Walk {
            path: source
                .path()
                .map(Path::to_path_buf)
                .unwrap_or_else(|| root.to_path_buf()),
            source,
        })?;
        if entry.file_type().is_dir() || !is_template(entry.file_name().to_str(), suffix) {
            continue;
        }
        debug!("Found template {}", entry.path().display());
        templates.push(entry.into_path());
    }
    Ok(templates)
}

// A file named exactly like the suffix has no output name left.
fn is_template(file_name: Option<&str>, suffix: &str) -> bool {
    matches!(file_name, Some(name) if name.len() > suffix.len() && name.ends_with(suffix))
}

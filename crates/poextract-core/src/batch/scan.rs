//! Folder discovery.

use std::path::{Path, PathBuf};

use tracing::{debug, warn};
use walkdir::WalkDir;

use super::DocumentKind;
use crate::error::BatchError;
use crate::models::config::ScanConfig;

/// Check a file name against the scan rules.
///
/// Returns the document kind when the file should be processed.
pub fn accept_file_name(name: &str, config: &ScanConfig) -> Option<DocumentKind> {
    let lower = name.to_lowercase();
    if !config.skip_marker.is_empty() && lower.contains(&config.skip_marker.to_lowercase()) {
        return None;
    }
    match DocumentKind::from_file_name(&lower)? {
        DocumentKind::Text if !config.include_text_files => None,
        kind => Some(kind),
    }
}

/// List the documents under `root`, at most `max_depth` folders deep.
///
/// Entries are returned in file-name order. Anything under `exclude` (the
/// text dump folder) is ignored.
pub fn discover_files(
    root: &Path,
    config: &ScanConfig,
    exclude: Option<&Path>,
) -> Result<Vec<(PathBuf, DocumentKind)>, BatchError> {
    if !root.is_dir() {
        return Err(BatchError::NotFound(root.to_path_buf()));
    }

    let walker = WalkDir::new(root)
        .max_depth(config.max_depth + 1)
        .follow_links(config.follow_links)
        .sort_by_file_name();

    let mut files = Vec::new();
    for entry in walker {
        let entry = match entry {
            Ok(e) => e,
            Err(e) => {
                warn!("Skipping unreadable entry: {}", e);
                continue;
            }
        };
        if !entry.file_type().is_file() {
            continue;
        }
        if exclude.is_some_and(|dir| entry.path().starts_with(dir)) {
            continue;
        }

        let kind = accept_file_name(&entry.file_name().to_string_lossy(), config);
        if let Some(kind) = kind {
            files.push((entry.into_path(), kind));
        }
    }

    debug!("Found {} documents under {}", files.len(), root.display());
    Ok(files)
}

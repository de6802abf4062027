use std::path::{Path, PathBuf};
use walkdir::{DirEntry, WalkDir};

use crate::errors::{PrefixerError, Result};
use crate::report::{FileOutcome, FileReport};

/// Directory names never descended into: build output, dependency caches
/// and version-control metadata
pub const EXCLUDED_DIRS: &[&str] = &["node_modules", ".next", "dist", "out", ".git", ".github"];

/// File extensions that may contain class lists
pub const ELIGIBLE_EXTENSIONS: &[&str] = &["js", "jsx", "tsx", "css", "html"];

/// Files found under a root, in traversal order
#[derive(Debug, Default)]
pub struct WalkOutcome {
    /// Eligible files to prefix
    pub files: Vec<PathBuf>,
    /// Entries that could not be read
    pub failures: Vec<FileReport>,
}

/// Whether a file's extension is on the allow-list
pub fn is_eligible(path: &Path) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| ELIGIBLE_EXTENSIONS.contains(&ext))
}

fn is_excluded_dir(entry: &DirEntry) -> bool {
    entry.depth() > 0
        && entry.file_type().is_dir()
        && entry
            .file_name()
            .to_str()
            .is_some_and(|name| EXCLUDED_DIRS.contains(&name))
}

/// Collect eligible files under `root`, depth-first in file-name order.
///
/// Symbolic links are not followed. Unreadable entries below the root are
/// recorded as failures; an unreadable root is an error.
pub fn collect_eligible_files(root: &Path) -> Result<WalkOutcome> {
    let mut outcome = WalkOutcome::default();

    let walker = WalkDir::new(root)
        .sort_by_file_name()
        .into_iter()
        .filter_entry(|entry| !is_excluded_dir(entry));

    for entry in walker {
        let entry = match entry {
            Ok(entry) => entry,
            Err(e) if e.depth() == 0 => {
                return Err(PrefixerError::InvalidRoot {
                    path: root.display().to_string(),
                    message: e.to_string(),
                });
            }
            Err(e) => {
                let path = e.path().map(Path::to_path_buf).unwrap_or_else(|| root.to_path_buf());
                tracing::warn!(path = %path.display(), error = %e, "skipping unreadable entry");
                outcome.failures.push(FileReport {
                    path,
                    outcome: FileOutcome::Failed {
                        error: e.to_string(),
                    },
                });
                continue;
            }
        };

        if !entry.file_type().is_file() {
            continue;
        }

        if is_eligible(entry.path()) {
            outcome.files.push(entry.into_path());
        } else {
            tracing::trace!(path = %entry.path().display(), "extension not eligible");
        }
    }

    Ok(outcome)
}

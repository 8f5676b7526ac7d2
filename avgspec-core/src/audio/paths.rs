//! Input path resolution
//!
//! Directories expand to their immediate regular files; plain paths pass
//! through unchanged

use std::fs;
use std::path::PathBuf;

/// Expand input arguments into a flat list of candidate files
///
/// Each directory contributes its immediate regular-file entries, sorted for
/// a deterministic batch order; no recursion into subdirectories. Anything
/// that is not a directory passes through as-is (missing files surface later
/// as per-file read failures).
pub fn resolve_paths(inputs: &[PathBuf]) -> Vec<PathBuf> {
    let mut files = Vec::new();

    for input in inputs {
        if input.is_dir() {
            match fs::read_dir(input) {
                Ok(entries) => {
                    let mut found: Vec<PathBuf> = entries
                        .filter_map(|entry| entry.ok())
                        .map(|entry| entry.path())
                        .filter(|path| path.is_file())
                        .collect();
                    found.sort();
                    files.extend(found);
                }
                Err(e) => {
                    tracing::warn!("skipping unreadable directory {}: {}", input.display(), e);
                }
            }
        } else {
            files.push(input.clone());
        }
    }

    files
}

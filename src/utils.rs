/*!
 * Utility functions for repo2tree
 */

use std::path::Path;

use walkdir::WalkDir;

use crate::config::RepoConfig;
use crate::scanner::extension_of;

/// Count the files a walk of `dir` will include, for progress tracking.
///
/// Unreadable entries are skipped here; the walk itself reports them.
pub fn count_files(dir: &Path, repo: &RepoConfig) -> u64 {
    WalkDir::new(dir)
        .min_depth(1)
        .into_iter()
        .filter_entry(|entry| {
            !(entry.file_type().is_dir() && repo.ignores(&entry.file_name().to_string_lossy()))
        })
        .filter_map(|entry| entry.ok())
        .filter(|entry| entry.file_type().is_file())
        .filter(|entry| extension_of(entry.path()).is_some_and(|ext| repo.accepts(&ext)))
        .count() as u64
}

/// Format a human-readable file size
pub fn format_file_size(size: u64) -> String {
    const KB: u64 = 1024;
    const MB: u64 = KB * 1024;
    const GB: u64 = MB * 1024;

    if size >= GB {
        format!("{:.2} GB", size as f64 / GB as f64)
    } else if size >= MB {
        format!("{:.2} MB", size as f64 / MB as f64)
    } else if size >= KB {
        format!("{:.2} KB", size as f64 / KB as f64)
    } else {
        format!("{} bytes", size)
    }
}

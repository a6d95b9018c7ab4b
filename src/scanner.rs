/*!
 * Directory walking and tree construction
 */

use std::cell::RefCell;
use std::collections::HashMap;
use std::fs;
use std::path::Path;
use std::sync::Arc;

use indicatif::ProgressBar;
use tracing::{debug, trace};
use walkdir::{DirEntry, WalkDir};

use crate::config::{Config, RepoConfig};
use crate::error::{Repo2TreeError, Result};
use crate::minify::{minify_contents, MinifyOutcome};
use crate::report::FileReportInfo;
use crate::types::TreeNode;

/// Scanner statistics
#[derive(Debug, Clone, Default)]
pub struct ScannerStatistics {
    /// Number of files included
    pub files_processed: usize,
    /// Number of directories included
    pub directories: usize,
    /// Total number of lines in the emitted contents
    pub total_lines: usize,
    /// Total number of characters in the emitted contents
    pub total_chars: usize,
    /// Bytes read from disk for included files
    pub original_bytes: usize,
    /// Bytes emitted for included files
    pub output_bytes: usize,
    /// Files whose minification failed and were kept as written
    pub minify_fallbacks: usize,
    /// Details for each file, keyed by relative path
    pub file_details: HashMap<String, FileReportInfo>,
}

/// Result of scanning the configured root
#[derive(Debug, Clone)]
pub struct ScannedRepository {
    /// Final component of the root directory
    pub repository_name: String,
    /// Children of the root
    pub tree: Vec<TreeNode>,
}

/// Scanner for directory contents
pub struct Scanner {
    /// Run configuration
    config: Config,
    /// Accepted extensions and ignored directories
    repo: RepoConfig,
    /// Progress bar
    pub progress: Arc<ProgressBar>,
    /// Scanner statistics
    statistics: RefCell<ScannerStatistics>,
}

impl Scanner {
    /// Create a new scanner
    pub fn new(config: Config, repo: RepoConfig, progress: Arc<ProgressBar>) -> Self {
        Self {
            config,
            repo,
            progress,
            statistics: RefCell::new(ScannerStatistics::default()),
        }
    }

    /// Get scanner statistics
    pub fn get_statistics(&self) -> ScannerStatistics {
        self.statistics.borrow().clone()
    }

    /// Walk the configured root and name the result after it
    pub fn scan(&self) -> Result<ScannedRepository> {
        let root = fs::canonicalize(&self.config.target_dir)
            .map_err(|e| Repo2TreeError::read(&self.config.target_dir, e))?;
        let repository_name = root
            .file_name()
            .map(|name| name.to_string_lossy().to_string())
            .unwrap_or_else(|| root.display().to_string());

        debug!(root = %root.display(), "scanning repository {}", repository_name);
        let tree = self.walk(&root, &root)?;

        Ok(ScannedRepository {
            repository_name,
            tree,
        })
    }

    /// Walk `dir_path` and return its filtered entries as nodes.
    ///
    /// Paths in the result are relative to `base_path`. Entries keep the
    /// order the filesystem lists them in. Any listing or read failure
    /// aborts the whole walk.
    pub fn walk(&self, dir_path: &Path, base_path: &Path) -> Result<Vec<TreeNode>> {
        let mut nodes = Vec::new();

        for entry in WalkDir::new(dir_path).min_depth(1).max_depth(1) {
            let entry = entry.map_err(|e| {
                let path = e.path().unwrap_or(dir_path).to_path_buf();
                Repo2TreeError::read(path, e.into())
            })?;

            if let Some(node) = self.process_entry(&entry, base_path)? {
                nodes.push(node);
            }
        }

        Ok(nodes)
    }

    /// Turn one directory entry into at most one node
    fn process_entry(&self, entry: &DirEntry, base_path: &Path) -> Result<Option<TreeNode>> {
        let file_type = entry.file_type();
        let name = entry.file_name().to_string_lossy();

        if file_type.is_dir() {
            if self.repo.ignores(&name) {
                debug!(path = %entry.path().display(), "skipping ignored directory");
                return Ok(None);
            }

            let children = self.walk(entry.path(), base_path)?;
            self.statistics.borrow_mut().directories += 1;
            return Ok(Some(TreeNode::Directory {
                path: relative_path(entry.path(), base_path),
                children,
            }));
        }

        if file_type.is_file() {
            return match extension_of(entry.path()) {
                Some(extension) if self.repo.accepts(&extension) => {
                    self.process_file(entry.path(), base_path, &extension).map(Some)
                }
                _ => {
                    trace!(path = %entry.path().display(), "extension not accepted");
                    Ok(None)
                }
            };
        }

        trace!(path = %entry.path().display(), "skipping special entry");
        Ok(None)
    }

    /// Read, minify and record a single included file
    pub(crate) fn process_file(&self, abs_path: &Path, base_path: &Path, extension: &str) -> Result<TreeNode> {
        let rel_path = relative_path(abs_path, base_path);

        self.progress.inc(1);
        let display_name = if rel_path.len() > 40 {
            let tail = rel_path
                .char_indices()
                .rev()
                .nth(36)
                .map_or(0, |(index, _)| index);
            format!("...{}", &rel_path[tail..])
        } else {
            rel_path.clone()
        };
        self.progress
            .set_message(format!("Current file: {}", display_name));

        let bytes = fs::read(abs_path).map_err(|e| Repo2TreeError::read(abs_path, e))?;
        let raw = String::from_utf8_lossy(&bytes);
        let minified = minify_contents(&raw, extension, self.config.minify);

        {
            let mut stats = self.statistics.borrow_mut();
            let lines = minified.content.lines().count();
            let chars = minified.content.chars().count();

            stats.files_processed += 1;
            stats.total_lines += lines;
            stats.total_chars += chars;
            stats.original_bytes += bytes.len();
            stats.output_bytes += minified.content.len();
            if minified.outcome == MinifyOutcome::FellBack {
                stats.minify_fallbacks += 1;
            }
            stats
                .file_details
                .insert(rel_path.clone(), FileReportInfo { lines, chars });
        }

        Ok(TreeNode::File {
            path: rel_path,
            content: minified.content,
        })
    }
}

/// Path of `path` relative to `base`, joined with `/` on every platform
pub fn relative_path(path: &Path, base: &Path) -> String {
    let relative = path.strip_prefix(base).unwrap_or(path);
    relative
        .components()
        .map(|component| component.as_os_str().to_string_lossy())
        .collect::<Vec<_>>()
        .join("/")
}

/// Leading-dot extension of a file name (`a.d.ts` gives `.ts`, `.env` gives none)
pub fn extension_of(path: &Path) -> Option<String> {
    path.extension()
        .map(|ext| format!(".{}", ext.to_string_lossy()))
}


/*!
 * The conversion pipeline: walk, serialize, encode
 */

use std::sync::Arc;

use indicatif::ProgressBar;
use tracing::info;

use crate::config::{Config, RepoConfig};
use crate::encoder::encode;
use crate::error::Result;
use crate::scanner::{Scanner, ScannerStatistics};
use crate::writer::serialize;

/// Output of one conversion run
#[derive(Debug, Clone)]
pub struct Conversion {
    /// Name of the converted directory
    pub repository_name: String,
    /// Final string for the output sink
    pub output: String,
    /// Number of lines in `output`
    pub line_count: usize,
    /// Statistics gathered while walking
    pub statistics: ScannerStatistics,
}

/// Run the whole pipeline for `config`.
///
/// Nothing is produced unless every step succeeds.
pub fn convert(config: &Config, repo: RepoConfig, progress: Arc<ProgressBar>) -> Result<Conversion> {
    progress.set_message("Reading directory contents...");
    let scanner = Scanner::new(config.clone(), repo, Arc::clone(&progress));
    let scanned = scanner.scan()?;
    let statistics = scanner.get_statistics();
    info!(
        files = statistics.files_processed,
        directories = statistics.directories,
        "walked {}",
        scanned.repository_name
    );

    progress.set_message("Formatting tree structure...");
    let serialized = serialize(&scanned.repository_name, &scanned.tree)?;

    progress.set_message("Encoding JSON string...");
    let encoded = encode(&serialized, config.format, config.max_line_length)?;
    let line_count = encoded.lines.len();
    info!(lines = line_count, "encoded as {}", config.format.describe());

    Ok(Conversion {
        repository_name: scanned.repository_name,
        output: encoded.into_output(),
        line_count,
        statistics,
    })
}

/// Convert a directory with default settings and no progress display
pub fn convert_directory(config: &Config) -> Result<String> {
    let repo = config.repo_config()?;
    Ok(convert(config, repo, Arc::new(ProgressBar::hidden()))?.output)
}

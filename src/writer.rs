/*!
 * Document serialization and output sinks for repo2tree
 */

use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::sync::Arc;

use indicatif::ProgressBar;
use tracing::info;

use crate::clipboard::copy_to_clipboard;
use crate::config::Config;
use crate::error::Result;
use crate::types::{RepositoryDocument, TreeNode};

/// Serialize a tree into the pretty-printed repository document.
///
/// Keys come out as `repositoryName`, `description`, `tree`, indented by
/// two spaces. The function is pure and deterministic.
pub fn serialize(repository_name: &str, tree: &[TreeNode]) -> Result<String> {
    let document = RepositoryDocument::new(repository_name, tree);
    Ok(serde_json::to_string_pretty(&document)?)
}

/// Where the output ended up
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Destination {
    /// Written to standard output
    Stdout,
    /// Written to a file
    File(String),
    /// Copied to the system clipboard
    Clipboard,
}

impl std::fmt::Display for Destination {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Stdout => write!(f, "stdout"),
            Self::File(path) => write!(f, "{}", path),
            Self::Clipboard => write!(f, "clipboard"),
        }
    }
}

/// Hands the final string to the configured sinks
pub struct OutputWriter {
    /// Writer configuration
    config: Config,
    /// Progress bar showing the current step
    progress: Arc<ProgressBar>,
}

impl OutputWriter {
    /// Create a new output writer
    pub fn new(config: Config, progress: Arc<ProgressBar>) -> Self {
        Self { config, progress }
    }

    /// Deliver `output` to the file and/or clipboard, or stdout when neither
    /// is configured.
    ///
    /// The progress bar is cleared before anything is printed to stdout.
    pub fn write(&self, output: &str) -> Result<Vec<Destination>> {
        let mut destinations = Vec::new();

        if let Some(path) = &self.config.output_file {
            self.progress.set_message("Writing output file...");
            let mut writer = BufWriter::new(File::create(path)?);
            writer.write_all(output.as_bytes())?;
            writer.flush()?;
            info!(path = %path.display(), bytes = output.len(), "output written");
            destinations.push(Destination::File(path.display().to_string()));
        }

        if self.config.clip {
            self.progress.set_message("Copying to clipboard...");
            copy_to_clipboard(output)?;
            info!(bytes = output.len(), "output copied to clipboard");
            destinations.push(Destination::Clipboard);
        }

        if destinations.is_empty() {
            self.progress.finish_and_clear();
            let stdout = io::stdout();
            let mut handle = stdout.lock();
            handle.write_all(output.as_bytes())?;
            handle.write_all(b"\n")?;
            handle.flush()?;
            destinations.push(Destination::Stdout);
        }

        Ok(destinations)
    }
}

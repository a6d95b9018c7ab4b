/*!
 * repo2tree - Convert a repository into a JSON tree string for LLM context
 *
 * This library walks a directory, keeps files with accepted extensions,
 * optionally minifies them, and serializes the result as one JSON document
 * that can be pasted into a language model prompt as-is or as Base64 lines.
 */

pub mod clipboard;
pub mod config;
pub mod encoder;
pub mod error;
pub mod logging;
pub mod minify;
pub mod pipeline;
pub mod report;
pub mod scanner;
pub mod types;
pub mod utils;
pub mod writer;


// Re-export main components for easier access
pub use config::{Config, OutputFormat, RepoConfig};
pub use encoder::{encode, EncodingResult};
pub use error::{Repo2TreeError, Result};
pub use minify::minify;
pub use pipeline::{convert, convert_directory, Conversion};
pub use report::{FileReportInfo, ReportFormat, Reporter, ScanReport};
pub use scanner::Scanner;
pub use types::{RepositoryDocument, TreeNode, DESCRIPTION};
pub use utils::{count_files, format_file_size};
pub use writer::{serialize, OutputWriter};

/// Version of the library
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

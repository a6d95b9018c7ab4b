/*!
 * Configuration handling for repo2tree
 */

use std::collections::HashSet;
use std::fs;
use std::path::{Path, PathBuf};

use clap::{ArgAction, Parser, ValueEnum};
use clap_complete::Shell;
use serde::Deserialize;
use tracing::{debug, warn};

use crate::error::{Repo2TreeError, Result};
use crate::{bail, ensure};

/// Name of the per-repository configuration file
pub const CONFIG_FILE_NAME: &str = ".repo2treerc";

/// Line length used when none (or a malformed one) is given
pub const DEFAULT_MAX_LINE_LENGTH: usize = 4000;

/// Representation of the final output string
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// Pretty-printed JSON as-is
    #[default]
    #[value(name = "utf-8", alias = "plain")]
    Utf8,
    /// Base64 of the JSON, split into fixed-length lines
    #[value(name = "base64", alias = "chunked")]
    Base64,
}

impl OutputFormat {
    /// Human-readable description used in status messages
    pub fn describe(&self) -> &'static str {
        match self {
            Self::Utf8 => "JSON string",
            Self::Base64 => "Base64-encoded JSON string",
        }
    }
}

/// Command-line arguments for repo2tree
#[derive(Parser, Debug, Clone)]
#[clap(
    name = "repo2tree",
    version = env!("CARGO_PKG_VERSION"),
    about = "Convert a repository into a JSON tree string for LLM context",
    long_about = "Walks a directory, keeps files with accepted extensions, optionally minifies them and emits one JSON document (or its Base64 encoding split into lines) ready to paste into a language model prompt."
)]
pub struct Args {
    /// Root directory to convert
    #[clap(default_value = ".")]
    pub directory_path: String,

    /// Configuration file (defaults to <DIRECTORY>/.repo2treerc)
    #[clap(long)]
    pub config: Option<String>,

    /// Minify .js, .ts, .jsx, .tsx and .json contents
    #[clap(long)]
    pub minify: bool,

    /// Output format
    #[clap(long, value_enum, default_value_t = OutputFormat::default())]
    pub format: OutputFormat,

    /// Maximum characters per line for base64 output (multiple of 4)
    #[clap(long, default_value = "4000")]
    pub max_line_length: String,

    /// Write the output to this file instead of stdout
    #[clap(short, long)]
    pub output: Option<String>,

    /// Copy output to clipboard
    #[clap(long, help = "Copy output to system clipboard")]
    pub clip: bool,

    /// Hide progress and the summary report
    #[clap(short, long)]
    pub quiet: bool,

    /// Increase log verbosity (-v debug, -vv trace)
    #[clap(short, long, action = ArgAction::Count)]
    pub verbose: u8,

    /// Generate shell completions
    #[clap(long = "generate", value_enum)]
    pub generate: Option<Shell>,
}

/// Accepted extensions and ignored directory names for a walk
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct RepoConfig {
    /// Leading-dot extensions, e.g. `.ts`
    #[serde(rename = "acceptedFileExtensions", default = "default_accepted_extensions")]
    pub accepted_extensions: HashSet<String>,

    /// Bare directory names skipped with their whole subtree
    #[serde(rename = "ignoredDirectories", default = "default_ignored_directories")]
    pub ignored_directories: HashSet<String>,
}

fn default_accepted_extensions() -> HashSet<String> {
    [".js", ".jsx", ".ts", ".tsx", ".json"]
        .into_iter()
        .map(String::from)
        .collect()
}

fn default_ignored_directories() -> HashSet<String> {
    HashSet::from(["node_modules".to_string()])
}

impl Default for RepoConfig {
    fn default() -> Self {
        Self {
            accepted_extensions: default_accepted_extensions(),
            ignored_directories: default_ignored_directories(),
        }
    }
}

impl RepoConfig {
    /// Parse configuration text; keys present replace the defaults
    pub fn from_json(text: &str) -> Result<Self> {
        match serde_json::from_str(text) {
            Ok(config) => Ok(config),
            Err(e) => bail!(Configuration, "invalid configuration: {}", e),
        }
    }

    /// Load the configuration file, falling back to defaults when absent
    pub fn load(path: &Path) -> Result<Self> {
        if !path.exists() {
            debug!(path = %path.display(), "no configuration file, using defaults");
            return Ok(Self::default());
        }

        let text = match fs::read_to_string(path) {
            Ok(text) => text,
            Err(e) => bail!(
                Configuration,
                "Error reading configuration file {}: {}",
                path.display(),
                e
            ),
        };

        Self::from_json(&text).map_err(|e| match e {
            Repo2TreeError::Configuration(message) => {
                crate::error!(Configuration, "{}: {}", path.display(), message)
            }
            other => other,
        })
    }

    /// Whether a file with this leading-dot extension is included
    pub fn accepts(&self, extension: &str) -> bool {
        self.accepted_extensions.contains(extension)
    }

    /// Whether a directory with this bare name is skipped
    pub fn ignores(&self, dir_name: &str) -> bool {
        self.ignored_directories.contains(dir_name)
    }
}

/// Parse a line length the lenient way: leading digits, zero or garbage
/// yields `None`.
pub fn parse_line_length(value: &str) -> Option<usize> {
    let digits: String = value
        .trim_start()
        .chars()
        .take_while(char::is_ascii_digit)
        .collect();

    match digits.parse::<usize>() {
        Ok(0) | Err(_) => None,
        Ok(n) => Some(n),
    }
}

/// Application configuration
#[derive(Clone, Debug)]
pub struct Config {
    /// Root directory to convert
    pub target_dir: PathBuf,

    /// Path of the repository configuration file
    pub config_file: PathBuf,

    /// Whether contents are minified
    pub minify: bool,

    /// Output format
    pub format: OutputFormat,

    /// Maximum Base64 line length
    pub max_line_length: usize,

    /// Output file (stdout when unset and not copying to clipboard)
    pub output_file: Option<PathBuf>,

    /// Copy output to clipboard
    pub clip: bool,

    /// Suppress progress and report
    pub quiet: bool,
}

impl Config {
    /// Configuration for `target_dir` with every option at its default
    pub fn for_directory(target_dir: impl Into<PathBuf>) -> Self {
        let target_dir = target_dir.into();
        Self {
            config_file: target_dir.join(CONFIG_FILE_NAME),
            target_dir,
            minify: false,
            format: OutputFormat::default(),
            max_line_length: DEFAULT_MAX_LINE_LENGTH,
            output_file: None,
            clip: false,
            quiet: false,
        }
    }

    /// Create configuration from command-line arguments
    pub fn from_args(args: Args) -> Self {
        let target_dir = PathBuf::from(&args.directory_path);
        let config_file = args
            .config
            .map(PathBuf::from)
            .unwrap_or_else(|| target_dir.join(CONFIG_FILE_NAME));

        let max_line_length = parse_line_length(&args.max_line_length).unwrap_or_else(|| {
            warn!(
                value = %args.max_line_length,
                "malformed line length, using default {}",
                DEFAULT_MAX_LINE_LENGTH
            );
            DEFAULT_MAX_LINE_LENGTH
        });

        Self {
            target_dir,
            config_file,
            minify: args.minify,
            format: args.format,
            max_line_length,
            output_file: args.output.map(PathBuf::from),
            clip: args.clip,
            quiet: args.quiet,
        }
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<()> {
        ensure!(
            self.target_dir.is_dir(),
            Configuration,
            "Target directory not found: {}",
            self.target_dir.display()
        );

        if let Some(parent) = self.output_file.as_deref().and_then(Path::parent) {
            ensure!(
                parent.as_os_str().is_empty() || parent.exists(),
                Configuration,
                "Output directory not found: {}",
                parent.display()
            );
        }

        if self.format == OutputFormat::Base64 && self.max_line_length % 4 != 0 {
            warn!(
                "line length {} is not a multiple of 4, rounding down to {}",
                self.max_line_length,
                self.max_line_length - self.max_line_length % 4
            );
        }

        Ok(())
    }

    /// Load the repository configuration this run points at
    pub fn repo_config(&self) -> Result<RepoConfig> {
        RepoConfig::load(&self.config_file)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = RepoConfig::default();
        for ext in [".js", ".jsx", ".ts", ".tsx", ".json"] {
            assert!(config.accepts(ext));
        }
        assert!(!config.accepts(".md"));
        assert!(config.ignores("node_modules"));
        assert!(!config.ignores("src"));
    }

    #[test]
    fn test_partial_config_keeps_other_default() {
        let config = RepoConfig::from_json(r#"{"acceptedFileExtensions": [".rs"]}"#).unwrap();
        assert!(config.accepts(".rs"));
        assert!(!config.accepts(".ts"));
        assert!(config.ignores("node_modules"));
    }

    #[test]
    fn test_unknown_keys_are_ignored() {
        let config =
            RepoConfig::from_json(r#"{"ignoredDirectories": ["dist"], "theme": "dark"}"#).unwrap();
        assert!(config.ignores("dist"));
        assert!(!config.ignores("node_modules"));
        assert!(config.accepts(".tsx"));
    }

    #[test]
    fn test_malformed_config_is_configuration_error() {
        let err = RepoConfig::from_json("{ not json").unwrap_err();
        assert!(matches!(err, Repo2TreeError::Configuration(_)));
    }

    #[test]
    fn test_load_missing_file_uses_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let config = RepoConfig::load(&dir.path().join(CONFIG_FILE_NAME)).unwrap();
        assert_eq!(config, RepoConfig::default());
    }

    #[test]
    fn test_load_malformed_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(CONFIG_FILE_NAME);
        fs::write(&path, "acceptedFileExtensions = ['.ts']").unwrap();

        let err = RepoConfig::load(&path).unwrap_err();
        let Repo2TreeError::Configuration(message) = &err else {
            panic!("unexpected error: {}", err);
        };
        assert!(message.starts_with(&path.display().to_string()), "{}", message);
        assert!(message.contains("invalid configuration"), "{}", message);
        assert_eq!(err.to_string().matches("Configuration error").count(), 1);
    }

    #[test]
    fn test_load_reads_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(CONFIG_FILE_NAME);
        fs::write(&path, r#"{"ignoredDirectories": ["target"]}"#).unwrap();

        let config = RepoConfig::load(&path).unwrap();
        assert!(config.ignores("target"));
        assert!(!config.ignores("node_modules"));
        assert!(config.accepts(".ts"));
    }

    #[test]
    fn test_output_format_default() {
        assert_eq!(OutputFormat::default(), OutputFormat::Utf8);
        assert_eq!(Args::parse_from(["repo2tree"]).format, OutputFormat::Utf8);
    }

    #[test]
    fn test_parse_line_length() {
        assert_eq!(parse_line_length("4000"), Some(4000));
        assert_eq!(parse_line_length("  80"), Some(80));
        assert_eq!(parse_line_length("12abc"), Some(12));
        assert_eq!(parse_line_length("abc"), None);
        assert_eq!(parse_line_length(""), None);
        assert_eq!(parse_line_length("0"), None);
        assert_eq!(parse_line_length("-8"), None);
    }

    #[test]
    fn test_from_args_substitutes_default_line_length() {
        let args = Args::parse_from(["repo2tree", "--format", "base64", "--max-line-length", "lots"]);
        let config = Config::from_args(args);
        assert_eq!(config.format, OutputFormat::Base64);
        assert_eq!(config.max_line_length, DEFAULT_MAX_LINE_LENGTH);
        assert_eq!(config.config_file, PathBuf::from(".").join(CONFIG_FILE_NAME));
    }

    #[test]
    fn test_format_aliases() {
        let args = Args::parse_from(["repo2tree", "--format", "plain"]);
        assert_eq!(args.format, OutputFormat::Utf8);
        let args = Args::parse_from(["repo2tree", "--format", "utf-8"]);
        assert_eq!(args.format, OutputFormat::Utf8);
    }

    #[test]
    fn test_validate_missing_directory() {
        let args = Args::parse_from(["repo2tree", "/definitely/not/here"]);
        let err = Config::from_args(args).validate().unwrap_err();
        assert!(matches!(err, Repo2TreeError::Configuration(_)));
    }
}

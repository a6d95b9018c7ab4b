/*!
 * Reporting functionality for repo2tree
 *
 * Renders a summary of a conversion run as console tables with tabled.
 */

use std::collections::HashMap;
use std::time::Duration;

use tabled::{
    settings::{object::Columns, Alignment, Modify, Padding, Style},
    Table, Tabled,
};

use crate::utils::format_file_size;

/// Number of files listed when the run included many
const TOP_FILES: usize = 10;

/// Information about a file in the report
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FileReportInfo {
    /// Number of lines emitted for the file
    pub lines: usize,
    /// Number of characters emitted for the file
    pub chars: usize,
}

/// Statistics for a conversion run
#[derive(Debug, Clone)]
pub struct ScanReport {
    /// Name of the converted repository
    pub repository_name: String,
    /// Where the output went
    pub destinations: String,
    /// Output format description
    pub format: String,
    /// Time taken for the whole pipeline
    pub duration: Duration,
    /// Number of files included
    pub files_processed: usize,
    /// Number of directories included
    pub directories: usize,
    /// Total number of lines in included files
    pub total_lines: usize,
    /// Bytes read for included files
    pub original_bytes: usize,
    /// Bytes emitted for included files
    pub output_bytes: usize,
    /// Minification fallbacks, `None` when minification was off
    pub minify_fallbacks: Option<usize>,
    /// Number of output lines
    pub output_lines: usize,
    /// Length of the final output string
    pub output_chars: usize,
    /// Details for each file
    pub file_details: HashMap<String, FileReportInfo>,
}

/// Format of the report output
pub enum ReportFormat {
    /// Console table output
    ConsoleTable,
}

/// Report generator for conversion results
pub struct Reporter {
    format: ReportFormat,
}

impl Reporter {
    /// Create a new reporter
    pub fn new(format: ReportFormat) -> Self {
        Self { format }
    }

    /// Generate a report string based on run statistics
    pub fn generate_report(&self, report: &ScanReport) -> String {
        match self.format {
            ReportFormat::ConsoleTable => self.generate_console_report(report),
        }
    }

    /// Print the report to stderr, keeping stdout for the output itself
    pub fn print_report(&self, report: &ScanReport) {
        eprintln!("\n{}", self.generate_report(report));
    }

    /// Format a number with human-readable units
    fn format_number(&self, num: usize) -> String {
        if num >= 1_000_000 {
            format!("{:.1}M", num as f64 / 1_000_000.0)
        } else if num >= 1_000 {
            format!("{:.1}K", num as f64 / 1_000.0)
        } else {
            num.to_string()
        }
    }

    /// Truncate long paths from the left, keeping whole trailing segments
    fn format_path(&self, path: &str, max_len: usize) -> String {
        if path.len() <= max_len {
            return path.to_string();
        }

        let mut kept = Vec::new();
        let mut len = 3;
        for part in path.rsplit('/') {
            if len + part.len() + 1 > max_len {
                break;
            }
            len += part.len() + 1;
            kept.push(part);
        }

        if kept.is_empty() {
            let tail: String = path.chars().rev().take(max_len - 3).collect();
            return format!("...{}", tail.chars().rev().collect::<String>());
        }

        kept.reverse();
        format!(".../{}", kept.join("/"))
    }

    fn style(table: &mut Table) -> String {
        table
            .with(Style::rounded())
            .with(Padding::new(1, 1, 0, 0))
            .with(Modify::new(Columns::new(..)).with(Alignment::left()));
        table.to_string()
    }

    fn create_summary_table(&self, report: &ScanReport) -> String {
        #[derive(Tabled)]
        struct SummaryRow {
            #[tabled(rename = "Metric")]
            key: String,

            #[tabled(rename = "Value")]
            value: String,
        }

        let row = |key: &str, value: String| SummaryRow {
            key: key.to_string(),
            value,
        };

        let mut rows = vec![
            row("📦 Repository", report.repository_name.clone()),
            row("📂 Output", report.destinations.clone()),
            row("🧾 Format", report.format.clone()),
            row("⏱️ Process Time", format!("{:.4?}", report.duration)),
            row("📄 Files Included", self.format_number(report.files_processed)),
            row("🗂️ Directories", self.format_number(report.directories)),
            row("📝 Total Lines", self.format_number(report.total_lines)),
        ];

        if let Some(fallbacks) = report.minify_fallbacks {
            let saved = report.original_bytes.saturating_sub(report.output_bytes);
            rows.push(row(
                "🗜️ Minified",
                format!(
                    "{} → {} ({} saved, {} kept as written)",
                    format_file_size(report.original_bytes as u64),
                    format_file_size(report.output_bytes as u64),
                    format_file_size(saved as u64),
                    fallbacks
                ),
            ));
        }

        rows.push(row(
            "📏 Output Size",
            format!(
                "{} chars in {} line(s)",
                self.format_number(report.output_chars),
                self.format_number(report.output_lines)
            ),
        ));
        rows.push(row(
            "🤖 LLM Tokens",
            format!(
                "{} tokens (estimated)",
                self.format_number(report.output_chars / 4)
            ),
        ));

        Self::style(&mut Table::new(rows))
    }

    fn create_files_table(&self, report: &ScanReport) -> String {
        #[derive(Tabled)]
        struct FileRow {
            #[tabled(rename = "File Path")]
            path: String,

            #[tabled(rename = "Lines")]
            lines: String,

            #[tabled(rename = "Est. Tokens")]
            tokens: String,
        }

        let mut files: Vec<_> = report.file_details.iter().collect();
        files.sort_by(|(path_a, a), (path_b, b)| b.chars.cmp(&a.chars).then(path_a.cmp(path_b)));
        if files.len() > TOP_FILES + 5 {
            files.truncate(TOP_FILES);
        }

        let rows: Vec<FileRow> = files
            .into_iter()
            .map(|(path, info)| FileRow {
                path: self.format_path(path, 60),
                lines: self.format_number(info.lines),
                tokens: self.format_number(info.chars / 4),
            })
            .collect();

        Self::style(&mut Table::new(rows))
    }

    fn generate_console_report(&self, report: &ScanReport) -> String {
        let summary_table = self.create_summary_table(report);
        let files_title = if report.file_details.len() > TOP_FILES + 5 {
            "📋  TOP 10 LARGEST FILES BY CHARACTER COUNT  📋"
        } else {
            "📋  INCLUDED FILES"
        };

        if report.file_details.is_empty() {
            return format!("✅  CONVERSION COMPLETE\n{}", summary_table);
        }

        format!(
            "{}\n{}\n\n✅  CONVERSION COMPLETE\n{}",
            files_title,
            self.create_files_table(report),
            summary_table
        )
    }
}

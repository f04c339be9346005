/*!
 * Reporting functionality for batchview
 *
 * Summarizes a generated document using the tabled library for console
 * output, or serde_json for machine readable output.
 */

use std::time::Duration;

use clap::ValueEnum;
use serde::Serialize;
use tabled::{
    settings::{object::Columns, Alignment, Modify, Padding, Style},
    Table, Tabled,
};

use crate::aggregate::AggregateStatistics;
use crate::error::Result;
use crate::utils::format_file_size;

/// Information about a file embedded in the document
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct FileReportInfo {
    /// Absolute path of the file
    pub path: String,
    /// Number of lines in the file
    pub lines: usize,
    /// Number of characters in the file
    pub chars: usize,
    /// Size of the embedded content in bytes
    pub bytes: u64,
}

/// Summary of one generation run
#[derive(Debug, Clone, Serialize)]
pub struct RunReport {
    /// Where the document went
    pub destination: String,
    /// Time taken to generate and present the document
    pub duration: Duration,
    /// Entries in the resolved selection
    pub selected: usize,
    #[serde(flatten)]
    pub statistics: AggregateStatistics,
}

/// Format of the report output
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum ReportFormat {
    /// Console tables
    #[default]
    Table,
    /// A single JSON object
    Json,
    /// No report
    None,
}

/// Report generator for generation runs
pub struct Reporter {
    format: ReportFormat,
}

impl Reporter {
    /// Create a new reporter
    pub fn new(format: ReportFormat) -> Self {
        Self { format }
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

    /// Generate the report string, `None` when reporting is disabled
    pub fn generate_report(&self, report: &RunReport) -> Result<Option<String>> {
        Ok(match self.format {
            ReportFormat::Table => Some(self.generate_console_report(report)),
            ReportFormat::Json => Some(serde_json::to_string_pretty(report)?),
            ReportFormat::None => None,
        })
    }

    /// Print the report to stderr, keeping stdout for the document
    pub fn print_report(&self, report: &RunReport) -> Result<()> {
        if let Some(text) = self.generate_report(report)? {
            eprintln!("\n{}", text);
        }
        Ok(())
    }

    fn styled(table: &mut Table) -> String {
        table
            .with(Style::rounded())
            .with(Padding::new(1, 1, 0, 0))
            .with(Modify::new(Columns::new(..)).with(Alignment::left()));
        table.to_string()
    }

    // Create a summary table using the tabled crate
    fn create_summary_table(&self, report: &RunReport) -> String {
        #[derive(Tabled)]
        struct SummaryRow {
            #[tabled(rename = "Metric")]
            key: &'static str,

            #[tabled(rename = "Value")]
            value: String,
        }

        let stats = &report.statistics;
        let rows = vec![
            SummaryRow {
                key: "📂 Destination",
                value: report.destination.clone(),
            },
            SummaryRow {
                key: "⏱️ Process Time",
                value: format!("{:.4?}", report.duration),
            },
            SummaryRow {
                key: "🎯 Selected Entries",
                value: self.format_number(report.selected),
            },
            SummaryRow {
                key: "📄 Files Included",
                value: self.format_number(stats.files_processed),
            },
            SummaryRow {
                key: "⚠️ Read Errors",
                value: self.format_number(stats.read_errors),
            },
            SummaryRow {
                key: "🚫 Skipped Directories",
                value: self.format_number(stats.skipped_directories),
            },
            SummaryRow {
                key: "📝 Total Lines",
                value: self.format_number(stats.total_lines),
            },
            SummaryRow {
                key: "📦 Embedded Size",
                value: format_file_size(stats.total_bytes),
            },
        ];

        Self::styled(&mut Table::new(rows))
    }

    // Create a files table using the tabled crate
    fn create_files_table(&self, report: &RunReport) -> String {
        #[derive(Tabled)]
        struct FileRow {
            #[tabled(rename = "File Path")]
            path: String,

            #[tabled(rename = "Lines")]
            lines: String,

            #[tabled(rename = "Size")]
            size: String,
        }

        let mut files: Vec<&FileReportInfo> = report.statistics.file_details.iter().collect();
        files.sort_by(|a, b| b.bytes.cmp(&a.bytes));
        if files.len() > 15 {
            files.truncate(10);
        }

        let rows: Vec<FileRow> = files
            .into_iter()
            .map(|info| FileRow {
                path: truncate_path(&info.path, 60),
                lines: self.format_number(info.lines),
                size: format_file_size(info.bytes),
            })
            .collect();

        Self::styled(&mut Table::new(rows))
    }

    // Generate a console table report
    fn generate_console_report(&self, report: &RunReport) -> String {
        let summary_table = self.create_summary_table(report);
        let files_table = self.create_files_table(report);

        let summary_title = "✅  DOCUMENT GENERATED";
        let files_title = if report.statistics.file_details.len() > 15 {
            "📋  TOP 10 LARGEST FILES"
        } else {
            "📋  INCLUDED FILES"
        };

        format!(
            "{}\n{}\n\n{}\n{}",
            files_title, files_table, summary_title, summary_table
        )
    }
}

/// Keep the trailing path segments that fit in `max_len`
fn truncate_path(path: &str, max_len: usize) -> String {
    if path.chars().count() <= max_len {
        return path.to_string();
    }

    let mut kept = Vec::new();
    let mut len = 3;
    for part in path.rsplit('/') {
        let part_len = part.chars().count() + 1;
        if len + part_len > max_len {
            break;
        }
        kept.push(part);
        len += part_len;
    }

    if kept.is_empty() {
        let tail: String = path
            .chars()
            .rev()
            .take(max_len.saturating_sub(3))
            .collect::<Vec<_>>()
            .into_iter()
            .rev()
            .collect();
        return format!("...{}", tail);
    }

    let mut result = String::from("...");
    for part in kept.iter().rev() {
        result.push('/');
        result.push_str(part);
    }
    result
}

/*!
 * Run summary for docdump
 *
 * Renders the outcome of an export run as console tables using the tabled
 * library.
 */

use std::path::PathBuf;
use std::time::Duration;

use tabled::{
    settings::{object::Columns, Alignment, Modify, Padding, Style},
    Table, Tabled,
};

use crate::utils::format_file_size;

/// Counters for one category pass
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CategoryReport {
    pub label: String,
    /// Files embedded as code blocks
    pub exported: usize,
    /// Files emitted as image references
    pub images: usize,
    /// Matched files that could not be read
    pub skipped: usize,
    /// Bytes of embedded content
    pub bytes_read: u64,
}

/// Outcome of a completed run
#[derive(Debug, Clone)]
pub struct RunReport {
    /// Report file that was written
    pub output_file: PathBuf,
    /// Time taken by the whole run
    pub duration: Duration,
    /// Lines in the rendered tree
    pub tree_lines: usize,
    /// Per-category counters, in document order
    pub categories: Vec<CategoryReport>,
    /// Size of the written report
    pub bytes_written: u64,
}

impl RunReport {
    pub fn files_exported(&self) -> usize {
        self.categories.iter().map(|c| c.exported).sum()
    }

    pub fn images_referenced(&self) -> usize {
        self.categories.iter().map(|c| c.images).sum()
    }

    pub fn files_skipped(&self) -> usize {
        self.categories.iter().map(|c| c.skipped).sum()
    }
}

/// Format of the report output
pub enum ReportFormat {
    /// Console table output
    ConsoleTable,
}

/// Report generator for run results
pub struct Reporter {
    format: ReportFormat,
}

impl Reporter {
    /// Create a new reporter
    pub fn new(format: ReportFormat) -> Self {
        Self { format }
    }

    /// Generate a report string
    pub fn generate_report(&self, report: &RunReport) -> String {
        match self.format {
            ReportFormat::ConsoleTable => self.generate_console_report(report),
        }
    }

    /// Print the report to stdout
    pub fn print_report(&self, report: &RunReport) {
        println!("\n{}", self.generate_report(report));
    }

    fn style(table: &mut Table) -> String {
        table
            .with(Style::rounded())
            .with(Padding::new(1, 1, 0, 0))
            .with(Modify::new(Columns::new(..)).with(Alignment::left()));
        table.to_string()
    }

    fn create_summary_table(&self, report: &RunReport) -> String {
        #[derive(Tabled)]
        struct SummaryRow {
            #[tabled(rename = "Metric")]
            key: &'static str,

            #[tabled(rename = "Value")]
            value: String,
        }

        let rows = vec![
            SummaryRow {
                key: "Output File",
                value: report.output_file.display().to_string(),
            },
            SummaryRow {
                key: "Process Time",
                value: format!("{:.4?}", report.duration),
            },
            SummaryRow {
                key: "Tree Lines",
                value: report.tree_lines.to_string(),
            },
            SummaryRow {
                key: "Files Exported",
                value: report.files_exported().to_string(),
            },
            SummaryRow {
                key: "Images Referenced",
                value: report.images_referenced().to_string(),
            },
            SummaryRow {
                key: "Files Skipped",
                value: report.files_skipped().to_string(),
            },
            SummaryRow {
                key: "Report Size",
                value: format_file_size(report.bytes_written),
            },
        ];

        Self::style(&mut Table::new(rows))
    }

    fn create_categories_table(&self, report: &RunReport) -> String {
        #[derive(Tabled)]
        struct CategoryRow {
            #[tabled(rename = "Category")]
            label: String,

            #[tabled(rename = "Files")]
            exported: usize,

            #[tabled(rename = "Images")]
            images: usize,

            #[tabled(rename = "Skipped")]
            skipped: usize,

            #[tabled(rename = "Content")]
            size: String,
        }

        let rows: Vec<CategoryRow> = report
            .categories
            .iter()
            .map(|c| CategoryRow {
                label: c.label.clone(),
                exported: c.exported,
                images: c.images,
                skipped: c.skipped,
                size: format_file_size(c.bytes_read),
            })
            .collect();

        Self::style(&mut Table::new(rows))
    }

    fn generate_console_report(&self, report: &RunReport) -> String {
        format!(
            "EXPORTED CATEGORIES\n{}\n\nEXPORT COMPLETE\n{}",
            self.create_categories_table(report),
            self.create_summary_table(report)
        )
    }
}

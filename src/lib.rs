/*!
 * docdump - Export a project's structure and selected files to Markdown
 *
 * This library walks a project directory, renders an ASCII tree of the files
 * of interest, and collects matched files into a single timestamped Markdown
 * report, one section per category.
 */

pub mod config;
pub mod error;
pub mod exporter;
pub mod language;
pub mod matcher;
pub mod report;
pub mod tree;
pub mod types;
pub mod utils;
pub mod writer;


// Re-export main components for easier access
pub use config::{Args, Config};
pub use error::{DocDumpError, Result};
pub use exporter::{ContentExporter, ExportOutcome};
pub use language::LanguageMap;
pub use matcher::{IgnoreSet, MatchRule};
pub use report::{ReportFormat, Reporter, RunReport};
pub use tree::TreeRenderer;
pub use types::{Category, CategoryPreset, ExportSection, Profile, SectionBody};
pub use writer::ReportWriter;

/// Version of the library
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

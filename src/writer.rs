/*!
 * Markdown report assembly and persistence
 */

use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Instant;

use chrono::{DateTime, Local};
use indicatif::ProgressBar;
use tempfile::NamedTempFile;

use crate::config::Config;
use crate::error::{DocDumpError, Result};
use crate::exporter::ContentExporter;
use crate::report::{CategoryReport, RunReport};
use crate::tree::TreeRenderer;
use crate::types::{FENCE, SEPARATOR};

/// Timestamp format embedded in output file names
pub const FILE_STAMP_FORMAT: &str = "%Y%m%d_%H%M%S";

/// Timestamp format of the document header
pub const HEADER_STAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// Permission bits of a written report
#[cfg(unix)]
pub const REPORT_MODE: u32 = 0o644;

/// A composed document, not yet written
#[derive(Debug, Clone)]
pub struct Document {
    /// Lines in append order
    pub lines: Vec<String>,
    /// Per-category counters
    pub categories: Vec<CategoryReport>,
    /// Number of tree lines rendered
    pub tree_lines: usize,
}

impl Document {
    /// Serialized document text
    pub fn text(&self) -> String {
        self.lines.join("\n")
    }
}

/// Orchestrates one export run and writes the report
pub struct ReportWriter {
    /// Writer configuration
    config: Config,
    progress: Arc<ProgressBar>,
}

impl ReportWriter {
    /// Create a new report writer
    pub fn new(config: Config, progress: Arc<ProgressBar>) -> Self {
        Self { config, progress }
    }

    /// Run with the current local time
    pub fn run(&self) -> Result<RunReport> {
        self.run_at(Local::now())
    }

    /// Run as if started at `now`
    pub fn run_at(&self, now: DateTime<Local>) -> Result<RunReport> {
        let start = Instant::now();

        self.prepare_output_dir()?;
        let output_file = self.output_path(&now);
        remove_stale(&output_file)?;

        let document = self.compose(&now);
        let text = document.text();
        persist(&output_file, &text)?;

        log::info!("Report written to {}", output_file.display());

        Ok(RunReport {
            output_file,
            duration: start.elapsed(),
            tree_lines: document.tree_lines,
            categories: document.categories,
            bytes_written: text.len() as u64,
        })
    }

    /// Create the output directory if it does not exist
    pub fn prepare_output_dir(&self) -> Result<()> {
        let dir = &self.config.out_dir;
        if !dir.is_dir() {
            log::debug!("Creating output directory {}", dir.display());
            fs::create_dir_all(dir).map_err(|source| DocDumpError::OutputDir {
                path: dir.clone(),
                source,
            })?;
        }
        Ok(())
    }

    /// Output file for a run started at `now`
    pub fn output_path(&self, now: &DateTime<Local>) -> PathBuf {
        self.config.out_dir.join(format!(
            "{}_{}.md",
            self.config.prefix,
            now.format(FILE_STAMP_FORMAT)
        ))
    }

    /// Title, base path and generation time
    pub fn header_lines(&self, now: &DateTime<Local>) -> Vec<String> {
        vec![
            format!("# {}", self.config.title),
            SEPARATOR.to_string(),
            format!("Base path: `{}`", self.config.root.display()),
            format!("Generated: {}", now.format(HEADER_STAMP_FORMAT)),
            String::new(),
        ]
    }

    /// Build the whole document in memory
    pub fn compose(&self, now: &DateTime<Local>) -> Document {
        let root = &self.config.root;
        let mut lines = self.header_lines(now);
        let mut tree_lines = 0;

        if self.config.include_tree {
            self.progress.set_prefix("Tree");
            let tree = TreeRenderer::new(&self.config).render(root);
            tree_lines = tree.len();
            if !tree.is_empty() {
                lines.push(format!("## {}", self.config.tree_heading));
                lines.push(FENCE.to_string());
                lines.extend(tree);
                lines.push(FENCE.to_string());
                lines.push(String::new());
                lines.push(SEPARATOR.to_string());
                lines.push(String::new());
            }
        }

        let exporter = ContentExporter::new(&self.config, Arc::clone(&self.progress));
        let mut categories = Vec::with_capacity(self.config.categories.len());

        for category in &self.config.categories {
            self.progress.set_prefix(category.label.clone());
            let outcome = exporter.export(root, category);

            categories.push(CategoryReport {
                label: category.label.clone(),
                exported: outcome.exported,
                images: outcome.images,
                skipped: outcome.skipped,
                bytes_read: outcome.bytes_read,
            });

            if outcome.is_empty() {
                log::info!("No files found for category {}", category.label);
                continue;
            }

            lines.push(format!("## {}", category.heading));
            lines.push(SEPARATOR.to_string());
            lines.extend(outcome.into_lines());
        }

        Document {
            lines,
            categories,
            tree_lines,
        }
    }
}

/// Remove a report left at the same path by an earlier run in the same second
fn remove_stale(path: &Path) -> Result<()> {
    if path.exists() {
        log::debug!("Removing existing output file {}", path.display());
        fs::remove_file(path).map_err(|source| DocDumpError::StaleOutput {
            path: path.to_path_buf(),
            source,
        })?;
    }
    Ok(())
}

/// Write the report through a temporary file renamed into place
fn persist(path: &Path, text: &str) -> Result<()> {
    let to_write_error = |source| DocDumpError::WriteOutput {
        path: path.to_path_buf(),
        source,
    };

    let dir = path.parent().unwrap_or_else(|| Path::new("."));
    let mut file = NamedTempFile::new_in(dir).map_err(to_write_error)?;
    file.write_all(text.as_bytes()).map_err(to_write_error)?;
    file.flush().map_err(to_write_error)?;

    // Temp files are created owner-only, reports are meant to be shared
    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;
        file.as_file()
            .set_permissions(fs::Permissions::from_mode(REPORT_MODE))
            .map_err(to_write_error)?;
    }

    file.persist(path).map_err(|e| to_write_error(e.error))?;
    Ok(())
}

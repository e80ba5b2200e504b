/*!
 * Utility functions for docdump
 */

use std::path::Path;

use once_cell::sync::Lazy;

/// Format a human-readable file size
pub fn format_file_size(size: u64) -> String {
    const KB: u64 = 1024;
    const MB: u64 = KB * 1024;
    const GB: u64 = MB * 1024;

    if size >= GB {
        format!("{:.2} GB", size as f64 / GB as f64)
    } else if size >= MB {
        format!("{:.2} MB", size as f64 / MB as f64)
    } else if size >= KB {
        format!("{:.2} KB", size as f64 / KB as f64)
    } else {
        format!("{} bytes", size)
    }
}

/// File name component of a path as an owned string
pub fn file_name_of(path: &Path) -> String {
    path.file_name()
        .unwrap_or_default()
        .to_string_lossy()
        .to_string()
}

/// Directory names skipped by every profile
pub static DEFAULT_IGNORE: Lazy<Vec<&'static str>> = Lazy::new(|| {
    vec![
        // Build output
        "bin",
        "obj",
        // IDE state
        ".vs",
        // Package caches
        "packages",
        "node_modules",
        // Project metadata
        "Properties",
        // Generated migrations
        "Migrationes",
        // Git object store when walking inside .git
        "objects",
        "refs",
    ]
});

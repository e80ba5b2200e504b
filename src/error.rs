//! Global error handling for docdump
//!
//! Fatal errors around the output artifact propagate to the caller. Per-file
//! read failures are built with the same type but are only logged by the
//! exporter.

use std::io;
use std::path::PathBuf;
use std::string::FromUtf8Error;

use thiserror::Error;

/// Global error type for docdump operations
#[derive(Error, Debug)]
pub enum DocDumpError {
    /// Configuration errors, raised before any traversal starts
    #[error("Configuration error: {0}")]
    Config(String),

    /// Config file could not be parsed
    #[error("Config file error: {0}")]
    Toml(#[from] toml::de::Error),

    /// Output directory could not be created
    #[error("Failed to create output directory {}: {source}", .path.display())]
    OutputDir {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// A stale report with the same name could not be removed
    #[error("Failed to remove existing output file {}: {source}", .path.display())]
    StaleOutput {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// The final report could not be written
    #[error("Failed to write output file {}: {source}", .path.display())]
    WriteOutput {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// A matched file could not be read
    #[error("Failed to read {}: {source}", .path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// A matched file is not UTF-8 text and cannot be embedded verbatim
    #[error("{} is not valid UTF-8 text: {source}", .path.display())]
    NotText {
        path: PathBuf,
        #[source]
        source: FromUtf8Error,
    },

    /// Other file system errors
    #[error("IO error: {0}")]
    Io(#[from] io::Error),
}

/// Specialized Result type for docdump operations
pub type Result<T> = std::result::Result<T, DocDumpError>;

/// Creates a DocDumpError with a formatted message
#[macro_export]
macro_rules! error {
    ($error_type:ident, $($arg:tt)*) => {
        $crate::error::DocDumpError::$error_type(format!($($arg)*))
    };
}

/// Returns an error result with a formatted message
#[macro_export]
macro_rules! bail {
    ($error_type:ident, $($arg:tt)*) => {
        return Err($crate::error!($error_type, $($arg)*))
    };
}

/// Ensures a condition is true, otherwise returns an error
#[macro_export]
macro_rules! ensure {
    ($cond:expr, $error_type:ident, $($arg:tt)*) => {
        if !($cond) {
            $crate::bail!($error_type, $($arg)*)
        }
    };
}

impl DocDumpError {
    /// Process exit code for this error
    pub fn exit_code(&self) -> i32 {
        match self {
            DocDumpError::Config(_) | DocDumpError::Toml(_) => 2,
            _ => 1,
        }
    }
}

//! Error types for exporters

use thiserror::Error;

/// Errors that can occur when exporting layer tables
#[derive(Error, Debug)]
pub enum ExportError {
    /// I/O error with the affected path
    #[error("IO error for '{path}': {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    /// CSV write error
    #[error("CSV write error: {0}")]
    Write(String),

    /// Workbook construction or save error
    #[error("Workbook error: {0}")]
    Workbook(String),

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),
}

impl ExportError {
    /// Create an I/O error with the affected path
    pub fn io(path: impl Into<String>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }

    /// Create a write error
    pub fn write(message: impl Into<String>) -> Self {
        Self::Write(message.into())
    }

    /// Create a workbook error
    pub fn workbook(message: impl Into<String>) -> Self {
        Self::Workbook(message.into())
    }

    /// Create a configuration error
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config(message.into())
    }
}

/// Result type alias for export operations
pub type ExportResult<T> = std::result::Result<T, ExportError>;

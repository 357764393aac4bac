#![deny(rust_2018_idioms)]
#![deny(unsafe_op_in_unsafe_fn)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]

//! # xsd-pipeline
//!
//! Merge-then-extract orchestration.
//!
//! A run loads the master schema and its imports (any parse failure aborts
//! before merging), merges them, optionally writes the combined schema,
//! flattens the configured layers and optionally exports the tables.

pub mod config;
pub mod pipeline;

pub use config::PipelineConfig;
pub use pipeline::{Pipeline, PipelineResult, PipelineStats};

use thiserror::Error;

/// Errors that can occur in the pipeline
#[derive(Error, Debug)]
pub enum Error {
    #[error("Pipeline error during {operation} for '{path}': {message}")]
    Pipeline {
        operation: String,
        path: String,
        message: String,
    },

    #[error("IO error during {operation} for '{path}': {message}")]
    Io {
        operation: String,
        path: String,
        message: String,
    },

    #[error("Configuration error: {0}")]
    Config(String),

    #[error(transparent)]
    Schema(#[from] xsd_schema::Error),

    #[error(transparent)]
    Layers(#[from] xsd_layers::Error),

    #[error(transparent)]
    Export(#[from] xsd_export::ExportError),
}

impl Error {
    /// Create a structured pipeline error with operation/path context.
    pub fn pipeline(
        operation: impl Into<String>,
        path: impl Into<String>,
        message: impl Into<String>,
    ) -> Self {
        Self::Pipeline {
            operation: operation.into(),
            path: path.into(),
            message: message.into(),
        }
    }

    /// Create a structured I/O error with operation/path context.
    pub fn io(
        operation: impl Into<String>,
        path: impl Into<String>,
        message: impl Into<String>,
    ) -> Self {
        Self::Io {
            operation: operation.into(),
            path: path.into(),
            message: message.into(),
        }
    }

    /// Create a configuration error
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config(message.into())
    }

    /// Whether the run failed on an unreadable or malformed schema document
    pub fn is_parse_error(&self) -> bool {
        matches!(self, Self::Schema(e) if e.is_parse_error())
    }
}

impl From<std::io::Error> for Error {
    fn from(e: std::io::Error) -> Self {
        Error::io("io", "<unknown>", e.to_string())
    }
}

pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pipeline_error_preserves_operation_and_path_context() {
        let error = Error::pipeline("write merged schema", "/tmp/combined.xsd", "disk full");
        match error {
            Error::Pipeline {
                operation,
                path,
                message,
            } => {
                assert_eq!(operation, "write merged schema");
                assert_eq!(path, "/tmp/combined.xsd");
                assert_eq!(message, "disk full");
            }
            _ => panic!("expected pipeline variant"),
        }
    }

    #[test]
    fn io_error_from_std_error_has_fallback_context() {
        let io_error = std::fs::File::open("/path/that/does/not/exist")
            .map_err(Error::from)
            .expect_err("open should fail");

        match io_error {
            Error::Io {
                operation,
                path,
                message,
            } => {
                assert_eq!(operation, "io");
                assert_eq!(path, "<unknown>");
                assert!(!message.is_empty());
            }
            _ => panic!("expected io variant"),
        }
    }

    #[test]
    fn parse_errors_are_recognised() {
        let parse = Error::from(xsd_schema::Error::parse("broken.xsd", "unexpected end"));
        assert!(parse.is_parse_error());
        assert!(parse.to_string().contains("broken.xsd"));

        let mismatch = Error::from(xsd_schema::Error::NamespaceMismatch {
            import: "other.xsd".into(),
            expected: "'xs'".into(),
            found: "'xsd'".into(),
        });
        assert!(!mismatch.is_parse_error());
        assert!(!Error::config("no master").is_parse_error());
    }
}

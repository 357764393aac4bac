//! # xsd-schema
//!
//! XSD document loader, serializer, and merge logic.
//!
//! A master schema is combined with the schemas it imports by copying every
//! element and type definition of the imported documents into the master
//! root, following `type` references so that referenced types are present
//! in the result, and copying each named complex type at most once.

pub mod loader;
pub mod merge;
pub mod serializer;
pub mod summary;

pub use loader::SchemaLoader;
pub use merge::{MergeReport, ProcessedTypeSet, SchemaMerger, merge};
pub use serializer::{to_xml_string, write_to_file};
pub use summary::SchemaSummary;

use thiserror::Error;

/// Errors that can occur when loading, merging or writing schemas
#[derive(Error, Debug)]
pub enum Error {
    #[error("Parse error in '{source_name}': {message}")]
    Parse {
        source_name: String,
        message: String,
    },

    #[error(
        "Namespace mismatch: '{import}' binds the XML Schema namespace to {found}, master uses {expected}"
    )]
    NamespaceMismatch {
        import: String,
        expected: String,
        found: String,
    },

    #[error("Serialization error: {0}")]
    Serialize(String),

    #[error("IO error for '{path}': {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error(transparent)]
    Tree(#[from] xsd_tree::Error),
}

impl Error {
    /// Create a parse error for a document source
    pub fn parse(source_name: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Parse {
            source_name: source_name.into(),
            message: message.into(),
        }
    }

    /// Create an I/O error with the affected path
    pub fn io(path: impl Into<String>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }

    /// Whether this error stems from unreadable or malformed input
    pub fn is_parse_error(&self) -> bool {
        matches!(self, Self::Parse { .. } | Self::Tree(_))
    }
}

pub type Result<T> = std::result::Result<T, Error>;

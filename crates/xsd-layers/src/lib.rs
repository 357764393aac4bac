//! # xsd-layers
//!
//! Flattens selected complex types of a merged schema into flat tables.
//!
//! A layer is an ordered list of complex type names. Every element declared
//! (at any depth) inside those types becomes one column of the layer's
//! table, annotated with its documentation, whether it is optional, and the
//! enumeration values it is restricted to.

pub mod config;
pub mod extractor;
pub mod table;

pub use config::{LayerConfig, LayerSpec};
pub use extractor::{LayerExtractor, extract_layer};
pub use table::{ElementRecord, LayerTable, Optionality};

use thiserror::Error;

/// Errors that can occur when configuring or extracting layers
#[derive(Error, Debug)]
pub enum Error {
    #[error("Layer configuration error: {0}")]
    Config(String),

    #[error("Invalid layer file format: {0}")]
    InvalidFormat(String),

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
    /// Create a configuration error
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config(message.into())
    }

    /// Create an I/O error with the affected path
    pub fn io(path: impl Into<String>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }
}

pub type Result<T> = std::result::Result<T, Error>;

#![deny(rust_2018_idioms)]
#![deny(unsafe_op_in_unsafe_fn)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]

//! # xsd-tree
//!
//! In-memory tree structures and traversal APIs for XML Schema documents.
//!
//! This crate provides a namespace-aware node tree that both the schema
//! merger and the layer extractor operate on. Tag lookups go through a
//! [`Vocabulary`] derived from each document's [`NamespaceTable`], so that
//! `xs:element`, `xsd:element` and an unprefixed default-namespace
//! `element` are classified the same way.

/// Non-fatal findings reported while merging or extracting.
pub mod diagnostics;
/// Document container and document-level metadata.
pub mod document;
/// Namespace prefix tables and XSD tag classification.
pub mod namespace;
/// Core tree node model.
pub mod node;
/// Visitor and iterator helpers for walking node trees.
pub mod traversal;

/// Diagnostics reported through the observability hook.
pub use diagnostics::{Diagnostic, DiagnosticCode, Severity};
/// Primary document type.
pub use document::{Document, DocumentMetadata};
/// Namespace handling.
pub use namespace::{NamespaceTable, Vocabulary, XSD_NAMESPACE, local_type_name};
/// Node primitives.
pub use node::{Node, QName, XsdKind};
/// Traversal entry points.
pub use traversal::{Descendants, Traversal, walk};

use thiserror::Error;

/// Errors that can occur when working with schema trees
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum Error {
    #[error("No prefix is bound to the XML Schema namespace in '{source_name}'")]
    MissingXsdNamespace { source_name: String },

    #[error("Invalid qualified name '{name}': {reason}")]
    InvalidName { name: String, reason: String },
}

impl Error {
    /// Build a missing-namespace error for the given document source.
    pub fn missing_xsd_namespace(source_name: impl Into<String>) -> Self {
        Self::MissingXsdNamespace {
            source_name: source_name.into(),
        }
    }

    /// Build an invalid-name error with the offending input and reason.
    pub fn invalid_name(name: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::InvalidName {
            name: name.into(),
            reason: reason.into(),
        }
    }
}

/// Crate-local result type for tree operations.
pub type Result<T> = std::result::Result<T, Error>;

//! Document representation for schema trees
#![allow(clippy::must_use_candidate)] // Builder/constructor API intentionally omits pervasive #[must_use].
#![allow(clippy::return_self_not_must_use)] // Fluent builder methods return Self for ergonomics.

use crate::namespace::{NamespaceTable, Vocabulary};
use crate::node::{Node, XsdKind};
use crate::{Error, Result};

/// A parsed schema document
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Document {
    /// Root node of the document (the `schema` element)
    pub root: Node,

    /// Namespace bindings declared anywhere in the document
    pub namespaces: NamespaceTable,

    /// Document-level metadata
    pub metadata: DocumentMetadata,
}

/// Metadata associated with a document
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DocumentMetadata {
    /// Source file path or identifier
    pub source: Option<String>,

    /// `targetNamespace` of the schema root
    pub target_namespace: Option<String>,
}

impl Document {
    /// Create a new document with the given root node
    pub fn new(root: Node, namespaces: NamespaceTable) -> Self {
        let target_namespace = root.attribute("targetNamespace").map(str::to_string);
        Self {
            root,
            namespaces,
            metadata: DocumentMetadata {
                source: None,
                target_namespace,
            },
        }
    }

    /// Set the source identifier
    pub fn with_source(mut self, source: impl Into<String>) -> Self {
        self.metadata.source = Some(source.into());
        self
    }

    /// Source identifier for messages, `<memory>` when unknown
    pub fn source_name(&self) -> &str {
        self.metadata.source.as_deref().unwrap_or("<memory>")
    }

    /// XSD vocabulary of this document
    ///
    /// # Errors
    ///
    /// Returns [`Error::MissingXsdNamespace`] when no prefix is bound to the
    /// XML Schema namespace.
    pub fn vocabulary(&self) -> Result<Vocabulary> {
        self.namespaces
            .xsd_prefix()
            .map(Vocabulary::new)
            .ok_or_else(|| Error::missing_xsd_namespace(self.source_name()))
    }

    /// Names of every named `complexType` in the document, in document order
    pub fn complex_type_names(&self, vocab: &Vocabulary) -> Vec<String> {
        self.root
            .self_and_descendants()
            .filter(|n| vocab.is(n, XsdKind::ComplexType))
            .filter_map(|n| n.name_attr().map(str::to_string))
            .collect()
    }
}

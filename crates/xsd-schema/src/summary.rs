//! Structural summary of a schema document

use crate::Result;
use xsd_tree::{Document, Node, Traversal, Vocabulary, XsdKind, walk};

/// Counts of the XSD constructs in one document
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SchemaSummary {
    pub elements: usize,
    pub complex_types: usize,
    pub simple_types: usize,
    pub imports: usize,
    pub total_nodes: usize,
    pub max_depth: usize,
}

impl SchemaSummary {
    /// Summarize a document
    ///
    /// # Errors
    ///
    /// Returns an error if the document has no XML Schema namespace binding.
    pub fn of(document: &Document) -> Result<Self> {
        let mut counter = Counts {
            vocabulary: document.vocabulary()?,
            summary: Self::default(),
        };
        walk(&document.root, &mut counter);
        Ok(counter.summary)
    }

    /// Number of element, complex type and simple type definitions
    pub fn definitions(&self) -> usize {
        self.elements + self.complex_types + self.simple_types
    }
}

struct Counts {
    vocabulary: Vocabulary,
    summary: SchemaSummary,
}

impl Traversal for Counts {
    fn visit(&mut self, node: &Node, path: &[String]) {
        let summary = &mut self.summary;
        summary.total_nodes += 1;
        summary.max_depth = summary.max_depth.max(path.len());
        match self.vocabulary.kind_of(node) {
            Some(XsdKind::Element) => summary.elements += 1,
            Some(XsdKind::ComplexType) => summary.complex_types += 1,
            Some(XsdKind::SimpleType) => summary.simple_types += 1,
            Some(XsdKind::Import | XsdKind::Include) => summary.imports += 1,
            _ => {}
        }
    }
}

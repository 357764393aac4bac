//! Layer extraction
//!
//! For each complex type of a layer (first match by name, in the order the
//! layer lists them) every `element` below it becomes a column. Types the
//! schema does not define contribute nothing, and an element name already
//! recorded for the layer is skipped. Both are reported as diagnostics.

use crate::config::{LayerConfig, LayerSpec};
use crate::table::{ElementRecord, LayerTable, Optionality};
use crate::Result;
use tracing::{debug, info, trace};
use xsd_tree::{Diagnostic, DiagnosticCode, Document, Node, Vocabulary, XsdKind};

/// Extracts layer tables and collects the skipped items
#[derive(Debug, Default)]
pub struct LayerExtractor {
    diagnostics: Vec<Diagnostic>,
}

impl LayerExtractor {
    /// Create a new extractor
    pub fn new() -> Self {
        Self::default()
    }

    /// Flatten one layer
    ///
    /// # Errors
    ///
    /// Returns an error if the document has no XML Schema namespace binding.
    pub fn extract_layer(&mut self, document: &Document, layer: &LayerSpec) -> Result<LayerTable> {
        let vocabulary = document.vocabulary()?;
        let mut table = LayerTable::new(&layer.name);

        for type_name in &layer.types {
            let Some(complex_type) = vocabulary.find_complex_type(&document.root, type_name) else {
                debug!(layer = %layer.name, %type_name, "Complex type not found");
                self.diagnostics.push(Diagnostic::warning(
                    DiagnosticCode::MissingType,
                    format!("complex type '{type_name}' not found in schema"),
                    &layer.name,
                ));
                continue;
            };

            self.flatten_type(&vocabulary, complex_type, type_name, &mut table);
        }

        debug!(layer = %table.name, columns = table.len(), "Extracted layer");
        Ok(table)
    }

    /// Flatten every configured layer, in order
    ///
    /// # Errors
    ///
    /// Returns an error if the document has no XML Schema namespace binding.
    pub fn extract_layers(&mut self, document: &Document, config: &LayerConfig) -> Result<Vec<LayerTable>> {
        let tables = config
            .iter()
            .map(|layer| self.extract_layer(document, layer))
            .collect::<Result<Vec<_>>>()?;

        info!(
            layers = tables.len(),
            columns = tables.iter().map(LayerTable::len).sum::<usize>(),
            diagnostics = self.diagnostics.len(),
            "Layer extraction complete"
        );
        Ok(tables)
    }

    /// Diagnostics collected so far
    pub fn diagnostics(&self) -> &[Diagnostic] {
        &self.diagnostics
    }

    /// Take the collected diagnostics, leaving none behind
    pub fn take_diagnostics(&mut self) -> Vec<Diagnostic> {
        std::mem::take(&mut self.diagnostics)
    }

    fn flatten_type(&mut self, vocabulary: &Vocabulary, complex_type: &Node, type_name: &str, table: &mut LayerTable) {
        for element in vocabulary.descendants(complex_type, XsdKind::Element) {
            let Some(column) = element.name_attr() else {
                self.diagnostics.push(Diagnostic::warning(
                    DiagnosticCode::UnnamedElement,
                    format!("element without a name in '{type_name}' skipped"),
                    &table.name,
                ));
                continue;
            };

            if table.contains(column) {
                trace!(%column, %type_name, "Duplicate column skipped");
                self.diagnostics.push(Diagnostic::warning(
                    DiagnosticCode::DuplicateColumn,
                    format!("column '{column}' from '{type_name}' already recorded"),
                    &table.name,
                ));
                continue;
            }

            table.insert(column, element_record(vocabulary, element));
            trace!(%column, %type_name, "Recorded column");
        }
    }
}

/// Flatten the complex types named in `type_names` into one table
///
/// # Errors
///
/// Returns an error if the document has no XML Schema namespace binding.
pub fn extract_layer(document: &Document, type_names: &[String]) -> Result<LayerTable> {
    let layer = LayerSpec::new("Layer 1", type_names.iter().cloned());
    LayerExtractor::new().extract_layer(document, &layer)
}

fn element_record(vocabulary: &Vocabulary, element: &Node) -> ElementRecord {
    ElementRecord::new(
        documentation(vocabulary, element),
        Optionality::from_min_occurs(element.attribute("minOccurs")),
        restrictions(vocabulary, element),
    )
}

/// Text of the first `annotation/documentation` child that has any
fn documentation(vocabulary: &Vocabulary, element: &Node) -> Option<String> {
    vocabulary
        .children(element, XsdKind::Annotation)
        .flat_map(|annotation| vocabulary.children(annotation, XsdKind::Documentation))
        .find_map(|doc| doc.text.clone())
}

/// Enumeration values of the first `simpleType/restriction` child
fn restrictions(vocabulary: &Vocabulary, element: &Node) -> Option<String> {
    let restriction = vocabulary
        .children(element, XsdKind::SimpleType)
        .flat_map(|simple| vocabulary.children(simple, XsdKind::Restriction))
        .next()?;

    let values: Vec<&str> = vocabulary
        .children(restriction, XsdKind::Enumeration)
        .filter_map(|e| e.attribute("value"))
        .collect();
    Some(values.join(", "))
}

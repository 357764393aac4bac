//! Cross-document schema merge
//!
//! Every `element`, `complexType` and `simpleType` of an imported document
//! (at any depth, in document order) is copied onto the master root. When a
//! complex type is copied, the `type` references of the elements inside it
//! are looked up in the same imported document and the referenced
//! definitions are merged first, so referenced types are present in the
//! result before extraction runs.
//!
//! A named complex type is copied and recursed into at most once per merge:
//! the [`ProcessedTypeSet`] is owned by one [`SchemaMerger`] and shared by
//! every imported document it processes. Imported documents are deep-copied
//! and stay intact, but each imported node lands on the master root at most
//! once, however many complex types reference it.

use crate::{Error, Result};
use std::collections::HashSet;
use tracing::{debug, info, trace};
use xsd_tree::{
    Diagnostic, DiagnosticCode, Document, Node, Vocabulary, XsdKind, local_type_name,
};

/// Names of complex types already present in the master tree
#[derive(Debug, Clone, Default)]
pub struct ProcessedTypeSet {
    names: HashSet<String>,
}

impl ProcessedTypeSet {
    /// Create an empty set
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a name; returns `false` if it was already present
    pub fn insert(&mut self, name: impl Into<String>) -> bool {
        self.names.insert(name.into())
    }

    /// Whether a name has been recorded
    pub fn contains(&self, name: &str) -> bool {
        self.names.contains(name)
    }

    /// Number of recorded names
    pub fn len(&self) -> usize {
        self.names.len()
    }

    /// Whether no name has been recorded
    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }
}

/// Outcome of one merge call
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MergeReport {
    /// Number of imported documents processed
    pub documents: usize,

    /// Number of nodes copied onto the master root
    pub nodes_copied: usize,

    /// Imported complex types copied, in merge order
    pub merged_types: Vec<String>,

    /// Skipped duplicates and unresolved references
    pub diagnostics: Vec<Diagnostic>,
}

impl MergeReport {
    /// Diagnostics with the given code
    pub fn diagnostics_with(&self, code: DiagnosticCode) -> impl Iterator<Item = &Diagnostic> {
        self.diagnostics.iter().filter(move |d| d.code == code)
    }
}

/// Merges imported documents into one master document
///
/// Create one merger per merge call; the guard state must not be reused
/// for an unrelated master.
#[derive(Debug)]
pub struct SchemaMerger {
    vocabulary: Vocabulary,
    processed: ProcessedTypeSet,
    /// Imported nodes of the current document already copied, by address.
    /// Only compared, never dereferenced.
    copied: HashSet<*const Node>,
    report: MergeReport,
}

impl SchemaMerger {
    /// Create a merger for `master`, seeding the guard with its complex types
    ///
    /// # Errors
    ///
    /// Returns an error if the master has no XML Schema namespace binding.
    pub fn for_master(master: &Document) -> Result<Self> {
        let vocabulary = master.vocabulary()?;
        let mut processed = ProcessedTypeSet::new();
        for name in master.complex_type_names(&vocabulary) {
            processed.insert(name);
        }
        trace!(seeded = processed.len(), "Seeded processed type set from master");

        Ok(Self {
            vocabulary,
            processed,
            copied: HashSet::new(),
            report: MergeReport::default(),
        })
    }

    /// Complex type names merged so far, including the master's own
    pub fn processed(&self) -> &ProcessedTypeSet {
        &self.processed
    }

    /// Check that `imported` uses the master's XML Schema prefix
    ///
    /// # Errors
    ///
    /// Returns [`Error::NamespaceMismatch`] when the prefixes differ.
    pub fn check_compatible(&self, imported: &Document) -> Result<()> {
        let found = imported.vocabulary()?;
        if found == self.vocabulary {
            return Ok(());
        }
        Err(Error::NamespaceMismatch {
            import: imported.source_name().to_string(),
            expected: describe_prefix(self.vocabulary.prefix()),
            found: describe_prefix(found.prefix()),
        })
    }

    /// Merge one imported document into `master`
    ///
    /// # Errors
    ///
    /// Returns [`Error::NamespaceMismatch`] before copying anything if the
    /// imported document binds the XSD namespace to a different prefix.
    pub fn merge_document(&mut self, master: &mut Document, imported: &Document) -> Result<()> {
        self.check_compatible(imported)?;

        let source = imported.source_name().to_string();
        let copied_before = self.report.nodes_copied;
        let types_before = self.report.merged_types.len();

        self.copied.clear();
        self.merge_subtree(&mut master.root, &imported.root, &imported.root, &source);
        self.copied.clear();
        self.report.documents += 1;

        info!(
            import = %source,
            nodes = self.report.nodes_copied - copied_before,
            complex_types = self.report.merged_types.len() - types_before,
            "Merged imported schema"
        );
        Ok(())
    }

    /// Finish the merge and return the report
    pub fn finish(self) -> MergeReport {
        self.report
    }

    fn merge_subtree(&mut self, target: &mut Node, document_root: &Node, subtree: &Node, source: &str) {
        for node in subtree.self_and_descendants() {
            let Some(kind) = self.vocabulary.kind_of(node).filter(|k| k.is_definition()) else {
                continue;
            };

            if !self.copied.insert(std::ptr::from_ref(node)) {
                trace!(tag = %node.name, name = ?node.name_attr(), "Node already copied");
                continue;
            }

            if kind == XsdKind::ComplexType {
                if let Some(name) = node.name_attr() {
                    if self.processed.contains(name) {
                        trace!(%name, "Complex type already merged");
                        self.report.diagnostics.push(Diagnostic::info(
                            DiagnosticCode::DuplicateComplexType,
                            format!("complex type '{name}' already merged; skipped"),
                            source,
                        ));
                        continue;
                    }
                }
            }

            target.add_child(node.clone());
            self.report.nodes_copied += 1;
            trace!(tag = %node.name, name = ?node.name_attr(), "Copied node");

            if kind != XsdKind::ComplexType {
                continue;
            }

            if let Some(name) = node.name_attr() {
                self.processed.insert(name);
                self.report.merged_types.push(name.to_string());
                debug!(%name, import = %source, "Merged complex type");
            }

            self.follow_references(target, document_root, node, source);
        }
    }

    fn follow_references(&mut self, target: &mut Node, document_root: &Node, complex_type: &Node, source: &str) {
        let vocabulary = self.vocabulary.clone();
        for element in vocabulary.descendants(complex_type, XsdKind::Element) {
            let Some(reference) = element.attribute("type") else {
                continue;
            };
            let type_name = local_type_name(reference);
            if type_name.is_empty() {
                continue;
            }

            match vocabulary.find_type(document_root, type_name) {
                Some(found)
                    if vocabulary.is(found, XsdKind::ComplexType)
                        && self.processed.contains(type_name) =>
                {
                    trace!(%type_name, "Referenced complex type already merged");
                }
                Some(found) => {
                    trace!(%type_name, "Following type reference");
                    self.merge_subtree(target, document_root, found, source);
                }
                None => {
                    if !is_builtin_reference(reference, &vocabulary) {
                        self.report.diagnostics.push(Diagnostic::info(
                            DiagnosticCode::UnresolvedTypeReference,
                            format!("type '{reference}' is not defined in this document"),
                            source,
                        ));
                    }
                }
            }
        }
    }
}

/// Merge `imports` into `master`, in the order given
///
/// Every import is checked against the master's XML Schema prefix before
/// any node is copied.
///
/// # Errors
///
/// Returns [`Error::NamespaceMismatch`] for an incompatible import, or a
/// tree error if the master has no XML Schema namespace binding.
pub fn merge(master: &mut Document, imports: &[Document]) -> Result<MergeReport> {
    let mut merger = SchemaMerger::for_master(master)?;
    for imported in imports {
        merger.check_compatible(imported)?;
    }
    for imported in imports {
        merger.merge_document(master, imported)?;
    }

    let report = merger.finish();
    info!(
        documents = report.documents,
        nodes = report.nodes_copied,
        complex_types = report.merged_types.len(),
        "Schema merge complete"
    );
    Ok(report)
}

/// `xs:string` and friends live in the XSD namespace and never resolve
fn is_builtin_reference(reference: &str, vocabulary: &Vocabulary) -> bool {
    match reference.split_once(':') {
        Some((prefix, _)) => Some(prefix) == vocabulary.prefix(),
        None => vocabulary.prefix().is_none(),
    }
}

fn describe_prefix(prefix: Option<&str>) -> String {
    prefix.map_or_else(|| "the default namespace".to_string(), |p| format!("'{p}'"))
}

//! Namespace prefix tables and XSD tag classification

use crate::node::{Node, QName, XsdKind};
use indexmap::IndexMap;
use tracing::trace;

/// The XML Schema namespace URI
pub const XSD_NAMESPACE: &str = "http://www.w3.org/2001/XMLSchema";

/// Prefix to URI bindings declared in one document
///
/// The default namespace is stored under the `None` prefix.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NamespaceTable {
    bindings: IndexMap<Option<String>, String>,
}

/// Classifies nodes of one document as XSD constructs
///
/// Two documents can only be merged when their vocabularies are equal,
/// i.e. they bind the XSD namespace to the same prefix.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Vocabulary {
    prefix: Option<String>,
}

impl NamespaceTable {
    /// Create an empty table
    pub fn new() -> Self {
        Self::default()
    }

    /// Bind a prefix, replacing an earlier binding of the same prefix
    pub fn declare(&mut self, prefix: Option<&str>, uri: impl Into<String>) {
        let uri = uri.into();
        if let Some(previous) = self.bindings.insert(prefix.map(str::to_string), uri.clone()) {
            if previous != uri {
                trace!(?prefix, %previous, %uri, "Namespace prefix rebound");
            }
        }
    }

    /// Record a namespace declaration attribute (`xmlns` or `xmlns:p`)
    ///
    /// Returns `false` when the attribute is not a declaration.
    pub fn declare_attribute(&mut self, key: &str, value: &str) -> bool {
        if key == "xmlns" {
            self.declare(None, value);
            true
        } else if let Some(prefix) = key.strip_prefix("xmlns:") {
            self.declare(Some(prefix), value);
            true
        } else {
            false
        }
    }

    /// Resolve a prefix to its URI
    pub fn uri(&self, prefix: Option<&str>) -> Option<&str> {
        self.bindings
            .get(&prefix.map(str::to_string))
            .map(String::as_str)
    }

    /// The prefix bound to the XSD namespace; `Some(None)` for a default binding
    pub fn xsd_prefix(&self) -> Option<Option<&str>> {
        self.bindings
            .iter()
            .find(|(_, uri)| uri.as_str() == XSD_NAMESPACE)
            .map(|(prefix, _)| prefix.as_deref())
    }

    /// Iterate bindings in declaration order
    pub fn iter(&self) -> impl Iterator<Item = (Option<&str>, &str)> {
        self.bindings
            .iter()
            .map(|(prefix, uri)| (prefix.as_deref(), uri.as_str()))
    }

    /// Number of bound prefixes
    pub fn len(&self) -> usize {
        self.bindings.len()
    }

    /// Whether no prefix is bound
    pub fn is_empty(&self) -> bool {
        self.bindings.is_empty()
    }
}

impl Vocabulary {
    /// Create a vocabulary for the given XSD prefix
    pub fn new(prefix: Option<&str>) -> Self {
        Self {
            prefix: prefix.map(str::to_string),
        }
    }

    /// The XSD prefix this vocabulary matches
    pub fn prefix(&self) -> Option<&str> {
        self.prefix.as_deref()
    }

    /// Qualified tag for an XSD kind, `None` for [`XsdKind::Other`]
    pub fn qname(&self, kind: XsdKind) -> Option<QName> {
        kind.local_name()
            .map(|local| QName::new(self.prefix.as_deref(), local))
    }

    /// Classify a node; nodes outside the XSD namespace are `None`
    pub fn kind_of(&self, node: &Node) -> Option<XsdKind> {
        (node.name.prefix == self.prefix).then(|| XsdKind::from_local(&node.name.local))
    }

    /// Whether the node is the given XSD construct
    pub fn is(&self, node: &Node, kind: XsdKind) -> bool {
        self.kind_of(node) == Some(kind)
    }

    /// Children of `node` that are the given XSD construct
    pub fn children<'a>(
        &'a self,
        node: &'a Node,
        kind: XsdKind,
    ) -> impl Iterator<Item = &'a Node> + 'a {
        node.children.iter().filter(move |c| self.is(c, kind))
    }

    /// Descendants of `node` (excluding itself) that are the given XSD construct
    pub fn descendants<'a>(
        &'a self,
        node: &'a Node,
        kind: XsdKind,
    ) -> impl Iterator<Item = &'a Node> + 'a {
        node.descendants().filter(move |n| self.is(n, kind))
    }

    /// First `complexType` or `simpleType` named `name` below `root`, in document order
    pub fn find_type<'a>(&self, root: &'a Node, name: &str) -> Option<&'a Node> {
        root.self_and_descendants().find(|n| {
            matches!(
                self.kind_of(n),
                Some(XsdKind::ComplexType | XsdKind::SimpleType)
            ) && n.name_attr() == Some(name)
        })
    }

    /// First `complexType` named `name` below `root`, in document order
    pub fn find_complex_type<'a>(&self, root: &'a Node, name: &str) -> Option<&'a Node> {
        root.self_and_descendants()
            .find(|n| self.is(n, XsdKind::ComplexType) && n.name_attr() == Some(name))
    }
}

/// Strip a namespace prefix from a `type` reference (`cm:PSPId_Type` → `PSPId_Type`)
pub fn local_type_name(reference: &str) -> &str {
    reference.rsplit(':').next().unwrap_or(reference)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn xs(local: &str) -> QName {
        QName::new(Some("xs"), local)
    }

    #[test]
    fn test_declare_attributes() {
        let mut table = NamespaceTable::new();
        assert!(table.declare_attribute("xmlns:xs", XSD_NAMESPACE));
        assert!(table.declare_attribute("xmlns", "urn:cesop"));
        assert!(!table.declare_attribute("targetNamespace", "urn:cesop"));

        assert_eq!(table.len(), 2);
        assert_eq!(table.uri(Some("xs")), Some(XSD_NAMESPACE));
        assert_eq!(table.uri(None), Some("urn:cesop"));
        assert_eq!(table.xsd_prefix(), Some(Some("xs")));
    }

    #[test]
    fn test_later_declaration_wins() {
        let mut table = NamespaceTable::new();
        table.declare(Some("cm"), "urn:old");
        table.declare(Some("cm"), "urn:new");
        assert_eq!(table.len(), 1);
        assert_eq!(table.uri(Some("cm")), Some("urn:new"));
    }

    #[test]
    fn test_default_xsd_namespace() {
        let mut table = NamespaceTable::new();
        table.declare(None, XSD_NAMESPACE);
        assert_eq!(table.xsd_prefix(), Some(None));
    }

    #[test]
    fn test_missing_xsd_namespace() {
        let mut table = NamespaceTable::new();
        table.declare(Some("cm"), "urn:common");
        assert_eq!(table.xsd_prefix(), None);
        assert!(!table.is_empty());
    }

    #[test]
    fn test_vocabulary_classifies_by_prefix() {
        let vocab = Vocabulary::new(Some("xs"));
        assert_eq!(vocab.kind_of(&Node::new(xs("element"))), Some(XsdKind::Element));
        assert_eq!(vocab.kind_of(&Node::new(xs("sequence"))), Some(XsdKind::Other));
        let foreign = Node::new(QName::new(Some("xsd"), "element"));
        assert_eq!(vocab.kind_of(&foreign), None);
        assert_eq!(vocab.qname(XsdKind::ComplexType), Some(xs("complexType")));
        assert_eq!(vocab.qname(XsdKind::Other), None);
    }

    #[test]
    fn test_find_type_first_match_in_document_order() {
        let vocab = Vocabulary::new(Some("xs"));
        let mut root = Node::new(xs("schema"));
        let mut simple = Node::new(xs("simpleType"));
        simple.set_attribute("name", "Code_Type");
        let mut complex = Node::new(xs("complexType"));
        complex.set_attribute("name", "Code_Type");
        root.add_child(simple);
        root.add_child(complex);

        let found = vocab.find_type(&root, "Code_Type").unwrap();
        assert_eq!(found.name.local, "simpleType");
        let found = vocab.find_complex_type(&root, "Code_Type").unwrap();
        assert_eq!(found.name.local, "complexType");
        assert!(vocab.find_type(&root, "Other_Type").is_none());
    }

    #[test]
    fn test_local_type_name() {
        assert_eq!(local_type_name("cm:PSPId_Type"), "PSPId_Type");
        assert_eq!(local_type_name("PSPId_Type"), "PSPId_Type");
        assert_eq!(local_type_name(""), "");
        assert_eq!(local_type_name("cm:"), "");
    }
}

//! Node types for schema trees

use crate::traversal::Descendants;
use crate::{Error, Result};
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use std::fmt;

/// A tag or attribute name as written in the document (`prefix:local`)
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct QName {
    /// Namespace prefix, `None` for unprefixed names
    pub prefix: Option<String>,

    /// Local part of the name
    pub local: String,
}

/// XSD constructs the merger and extractor care about
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum XsdKind {
    /// `schema` root element
    Schema,

    /// `import` of another namespace's schema document
    Import,

    /// `include` of a same-namespace schema document
    Include,

    /// `element` declaration
    Element,

    /// `complexType` definition
    ComplexType,

    /// `simpleType` definition
    SimpleType,

    /// `annotation` container
    Annotation,

    /// `documentation` inside an annotation
    Documentation,

    /// `restriction` inside a simple type
    Restriction,

    /// `enumeration` facet inside a restriction
    Enumeration,

    /// Any other XSD construct (sequence, attribute, choice, ...)
    Other,
}

/// A node in the schema tree
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Node {
    /// Qualified tag name
    pub name: QName,

    /// Attributes in document order
    pub attributes: IndexMap<String, String>,

    /// Child nodes in document order
    pub children: Vec<Node>,

    /// Direct text content, trimmed
    pub text: Option<String>,
}

impl QName {
    /// Create a name with an optional prefix
    pub fn new(prefix: Option<&str>, local: impl Into<String>) -> Self {
        Self {
            prefix: prefix.map(str::to_string),
            local: local.into(),
        }
    }

    /// Parse a raw `prefix:local` or `local` name
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidName`] for empty names, empty parts or more
    /// than one colon.
    pub fn parse(raw: &str) -> Result<Self> {
        let mut parts = raw.split(':');
        match (parts.next(), parts.next(), parts.next()) {
            (Some(local), None, _) if !local.is_empty() => Ok(Self::new(None, local)),
            (Some(prefix), Some(local), None) if !prefix.is_empty() && !local.is_empty() => {
                Ok(Self::new(Some(prefix), local))
            }
            _ => Err(Error::invalid_name(
                raw,
                "expected 'local' or 'prefix:local'",
            )),
        }
    }
}

impl fmt::Display for QName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.prefix {
            Some(prefix) => write!(f, "{prefix}:{}", self.local),
            None => f.write_str(&self.local),
        }
    }
}

impl XsdKind {
    /// Classify a local name from the XSD namespace
    pub fn from_local(local: &str) -> Self {
        match local {
            "schema" => Self::Schema,
            "import" => Self::Import,
            "include" => Self::Include,
            "element" => Self::Element,
            "complexType" => Self::ComplexType,
            "simpleType" => Self::SimpleType,
            "annotation" => Self::Annotation,
            "documentation" => Self::Documentation,
            "restriction" => Self::Restriction,
            "enumeration" => Self::Enumeration,
            _ => Self::Other,
        }
    }

    /// Local tag name for this kind, `None` for [`XsdKind::Other`]
    pub fn local_name(self) -> Option<&'static str> {
        match self {
            Self::Schema => Some("schema"),
            Self::Import => Some("import"),
            Self::Include => Some("include"),
            Self::Element => Some("element"),
            Self::ComplexType => Some("complexType"),
            Self::SimpleType => Some("simpleType"),
            Self::Annotation => Some("annotation"),
            Self::Documentation => Some("documentation"),
            Self::Restriction => Some("restriction"),
            Self::Enumeration => Some("enumeration"),
            Self::Other => None,
        }
    }

    /// Whether the merger copies nodes of this kind
    pub fn is_definition(self) -> bool {
        matches!(self, Self::Element | Self::ComplexType | Self::SimpleType)
    }
}

impl Node {
    /// Create a new node
    pub fn new(name: QName) -> Self {
        Self {
            name,
            attributes: IndexMap::new(),
            children: Vec::new(),
            text: None,
        }
    }

    /// Create a node with text content
    pub fn with_text(name: QName, text: impl Into<String>) -> Self {
        Self {
            text: Some(text.into()),
            ..Self::new(name)
        }
    }

    /// Add a child node
    pub fn add_child(&mut self, child: Node) -> &mut Self {
        self.children.push(child);
        self
    }

    /// Set an attribute, keeping the position of an existing key
    pub fn set_attribute(&mut self, key: impl Into<String>, value: impl Into<String>) -> &mut Self {
        self.attributes.insert(key.into(), value.into());
        self
    }

    /// Get an attribute value
    pub fn attribute(&self, key: &str) -> Option<&str> {
        self.attributes.get(key).map(String::as_str)
    }

    /// Value of the `name` attribute
    pub fn name_attr(&self) -> Option<&str> {
        self.attribute("name")
    }

    /// Find the first child with the given qualified name
    pub fn find_child(&self, name: &QName) -> Option<&Node> {
        self.children.iter().find(|c| &c.name == name)
    }

    /// Find all children with the given qualified name
    pub fn children_named<'a>(&'a self, name: &'a QName) -> impl Iterator<Item = &'a Node> + 'a {
        self.children.iter().filter(move |c| &c.name == name)
    }

    /// All nodes below this one in document order, excluding `self`
    pub fn descendants(&self) -> Descendants<'_> {
        Descendants::below(self)
    }

    /// This node followed by all of its descendants in document order
    pub fn self_and_descendants(&self) -> Descendants<'_> {
        Descendants::from(self)
    }
}

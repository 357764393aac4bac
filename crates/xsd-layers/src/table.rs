//! Flat layer tables

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Whether an element must be present
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Optionality {
    /// `minOccurs="0"`
    Optional,
    /// No `minOccurs`, or any value other than `0`
    Mandatory,
}

/// Annotations of one column
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ElementRecord {
    /// Text of the element's first documentation node
    pub documentation: Option<String>,

    /// Derived from `minOccurs`
    pub optionality: Optionality,

    /// Enumeration values joined with `", "`; `None` without a restriction
    pub restrictions: Option<String>,
}

/// The flattened columns of one layer, in first-seen order
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LayerTable {
    /// Layer name
    pub name: String,

    /// Column name to annotations
    pub columns: IndexMap<String, ElementRecord>,
}

impl Optionality {
    /// Only `minOccurs="0"` makes an element optional
    pub fn from_min_occurs(min_occurs: Option<&str>) -> Self {
        match min_occurs {
            Some("0") => Self::Optional,
            _ => Self::Mandatory,
        }
    }

    /// Lowercase label
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Optional => "optional",
            Self::Mandatory => "mandatory",
        }
    }

    /// Whether the element may be omitted
    pub fn is_optional(self) -> bool {
        self == Self::Optional
    }
}

impl fmt::Display for Optionality {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl ElementRecord {
    /// Create a record
    pub fn new(
        documentation: Option<String>,
        optionality: Optionality,
        restrictions: Option<String>,
    ) -> Self {
        Self {
            documentation,
            optionality,
            restrictions,
        }
    }
}

impl LayerTable {
    /// Create an empty table
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            columns: IndexMap::new(),
        }
    }

    /// Record a column unless one with the same name exists
    ///
    /// Returns `false` if the column was already present; the first record
    /// is kept.
    pub fn insert(&mut self, column: impl Into<String>, record: ElementRecord) -> bool {
        match self.columns.entry(column.into()) {
            indexmap::map::Entry::Occupied(_) => false,
            indexmap::map::Entry::Vacant(entry) => {
                entry.insert(record);
                true
            }
        }
    }

    /// Column names in order
    pub fn column_names(&self) -> impl Iterator<Item = &str> {
        self.columns.keys().map(String::as_str)
    }

    /// Annotations of a column
    pub fn get(&self, column: &str) -> Option<&ElementRecord> {
        self.columns.get(column)
    }

    /// Whether a column exists
    pub fn contains(&self, column: &str) -> bool {
        self.columns.contains_key(column)
    }

    /// Iterate columns with their annotations
    pub fn iter(&self) -> impl Iterator<Item = (&str, &ElementRecord)> {
        self.columns.iter().map(|(name, record)| (name.as_str(), record))
    }

    /// Number of columns
    pub fn len(&self) -> usize {
        self.columns.len()
    }

    /// Whether the table has no columns
    pub fn is_empty(&self) -> bool {
        self.columns.is_empty()
    }
}

//! Export configuration options

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Configuration shared by all exporters
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ExportConfig {
    /// Table layout (default: element names as columns)
    pub orientation: Orientation,
    /// How to represent absent documentation or restrictions (default: empty string)
    pub null_representation: NullRepresentation,
    /// Row and header labels
    pub labels: Labels,
    /// CSV field delimiter (default: comma)
    pub delimiter: char,
    /// CSV record terminator (default: CRLF)
    pub record_terminator: RecordTerminator,
    /// Freeze the header row and label column in workbooks (default: true)
    pub freeze_panes: bool,
}

/// How a layer table is laid out
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Orientation {
    /// One column per element, three annotation rows
    #[default]
    Rows,
    /// One row per element, three annotation columns
    Columns,
}

/// How to represent absent values in output
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NullRepresentation {
    /// Empty string (default)
    #[default]
    EmptyString,
    /// The string "NULL"
    NullString,
    /// Custom string representation
    Custom(String),
}

/// Record terminator for writing CSV
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RecordTerminator {
    /// CRLF (Windows-style, default for RFC 4180)
    #[default]
    Crlf,
    /// LF (Unix-style)
    Lf,
}

/// Labels for the annotation rows (or columns) and the element header
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Labels {
    pub element: String,
    pub documentation: String,
    pub optionality: String,
    pub restrictions: String,
}

impl Default for ExportConfig {
    fn default() -> Self {
        Self {
            orientation: Orientation::Rows,
            null_representation: NullRepresentation::EmptyString,
            labels: Labels::default(),
            delimiter: ',',
            record_terminator: RecordTerminator::Crlf,
            freeze_panes: true,
        }
    }
}

impl Default for Labels {
    fn default() -> Self {
        Self {
            element: "Element".to_string(),
            documentation: "Documentation".to_string(),
            optionality: "Optionality".to_string(),
            restrictions: "Enumerations".to_string(),
        }
    }
}

impl ExportConfig {
    /// Create a new configuration with defaults
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the table orientation
    pub fn orientation(mut self, orientation: Orientation) -> Self {
        self.orientation = orientation;
        self
    }

    /// Set null representation
    pub fn null_representation(mut self, null_rep: NullRepresentation) -> Self {
        self.null_representation = null_rep;
        self
    }

    /// Set the annotation labels
    pub fn labels(mut self, labels: Labels) -> Self {
        self.labels = labels;
        self
    }

    /// Set the CSV delimiter character
    pub fn delimiter(mut self, delimiter: char) -> Self {
        self.delimiter = delimiter;
        self
    }

    /// Set record terminator
    pub fn record_terminator(mut self, terminator: RecordTerminator) -> Self {
        self.record_terminator = terminator;
        self
    }

    /// Configure frozen panes in workbooks
    pub fn freeze_panes(mut self, freeze: bool) -> Self {
        self.freeze_panes = freeze;
        self
    }

    /// Render an optional value
    pub fn render<'a>(&'a self, value: Option<&'a str>) -> &'a str {
        match (value, &self.null_representation) {
            (Some(value), _) => value,
            (None, NullRepresentation::EmptyString) => "",
            (None, NullRepresentation::NullString) => "NULL",
            (None, NullRepresentation::Custom(s)) => s,
        }
    }
}

impl Orientation {
    /// Lowercase name
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Rows => "rows",
            Self::Columns => "columns",
        }
    }
}

impl fmt::Display for Orientation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Orientation {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "rows" => Ok(Self::Rows),
            "columns" => Ok(Self::Columns),
            other => Err(format!(
                "unknown orientation '{other}' (expected 'rows' or 'columns')"
            )),
        }
    }
}

//! Non-fatal findings collected while merging schemas or extracting layers
#![allow(clippy::must_use_candidate)] // Constructor helpers are clear at call sites without #[must_use].

use serde::{Deserialize, Serialize};
use std::fmt;

/// Kind of finding
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum DiagnosticCode {
    /// A layer lists a complex type that the schema does not define
    MissingType,

    /// A `type` reference did not resolve inside the imported document
    UnresolvedTypeReference,

    /// An imported complex type was skipped because its name was already merged
    DuplicateComplexType,

    /// An element name collided with a column already recorded for the layer
    DuplicateColumn,

    /// An element without a `name` attribute could not become a column
    UnnamedElement,
}

/// Severity level for diagnostics
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Severity {
    Info,
    Warning,
    Error,
}

/// A skipped item, reported instead of failing the run
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Diagnostic {
    /// What happened
    pub code: DiagnosticCode,

    /// Human-readable message
    pub message: String,

    /// Severity level
    pub severity: Severity,

    /// Where it happened (document source, layer name, type name)
    pub path: String,
}

impl DiagnosticCode {
    /// Stable string form used in logs and reports
    pub fn as_str(self) -> &'static str {
        match self {
            Self::MissingType => "MISSING_TYPE",
            Self::UnresolvedTypeReference => "UNRESOLVED_TYPE_REFERENCE",
            Self::DuplicateComplexType => "DUPLICATE_COMPLEX_TYPE",
            Self::DuplicateColumn => "DUPLICATE_COLUMN",
            Self::UnnamedElement => "UNNAMED_ELEMENT",
        }
    }
}

impl fmt::Display for DiagnosticCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl Diagnostic {
    /// Create a new diagnostic
    pub fn new(
        code: DiagnosticCode,
        message: impl Into<String>,
        severity: Severity,
        path: impl Into<String>,
    ) -> Self {
        Self {
            code,
            message: message.into(),
            severity,
            path: path.into(),
        }
    }

    /// Create an informational diagnostic
    pub fn info(code: DiagnosticCode, message: impl Into<String>, path: impl Into<String>) -> Self {
        Self::new(code, message, Severity::Info, path)
    }

    /// Create a warning diagnostic
    pub fn warning(
        code: DiagnosticCode,
        message: impl Into<String>,
        path: impl Into<String>,
    ) -> Self {
        Self::new(code, message, Severity::Warning, path)
    }

    /// Whether this diagnostic is at least a warning
    pub fn is_warning(&self) -> bool {
        self.severity >= Severity::Warning
    }
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}] {}: {}", self.code, self.path, self.message)
    }
}

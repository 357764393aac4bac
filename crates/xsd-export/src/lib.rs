//! # xsd-export
//!
//! Tabular exporters for flattened layer tables.
//!
//! Each layer becomes one sheet of an XLSX workbook or one CSV file. Tables
//! are laid out either with the element names as columns and three
//! annotation rows (documentation, optionality, enumerations), or
//! transposed with one row per element.
//!
//! ## Example Usage
//!
//! ```rust
//! use xsd_export::{CsvExporter, ExportConfig, Orientation};
//! use xsd_layers::{ElementRecord, LayerTable, Optionality};
//!
//! let mut table = LayerTable::new("Layer 1");
//! table.insert("Year", ElementRecord::new(None, Optionality::Mandatory, None));
//!
//! let exporter = CsvExporter::new()
//!     .with_config(ExportConfig::new().orientation(Orientation::Columns));
//! let mut output = Vec::new();
//! exporter.write_table(&mut output, &table).unwrap();
//! assert!(String::from_utf8(output).unwrap().contains("Year,,mandatory,"));
//! ```

pub mod config;
pub mod delimited;
pub mod errors;
pub mod layout;
pub mod workbook;

pub use config::{ExportConfig, Labels, NullRepresentation, Orientation, RecordTerminator};
pub use delimited::CsvExporter;
pub use errors::{ExportError, ExportResult};
pub use layout::to_grid;
pub use workbook::{XlsxExporter, sanitize_sheet_name};

use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::{Path, PathBuf};
use std::str::FromStr;
use xsd_layers::LayerTable;

/// A sink for layer tables
pub trait Exporter {
    /// Short format name
    fn name(&self) -> &'static str;

    /// Write the tables to `path` and return the files written
    ///
    /// # Errors
    ///
    /// Returns an error if a file cannot be created or written.
    fn export(&self, tables: &[LayerTable], path: &Path) -> ExportResult<Vec<PathBuf>>;
}

/// Supported output formats
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ExportFormat {
    /// One workbook with a worksheet per layer
    #[default]
    Xlsx,
    /// A directory with one CSV file per layer
    Csv,
}

impl ExportFormat {
    /// Create the exporter for this format
    pub fn exporter(self, config: ExportConfig) -> Box<dyn Exporter> {
        match self {
            Self::Xlsx => Box::new(XlsxExporter::new().with_config(config)),
            Self::Csv => Box::new(CsvExporter::new().with_config(config)),
        }
    }

    /// Guess the format from an output path (`.xlsx` → XLSX, otherwise CSV)
    pub fn from_path(path: &Path) -> Self {
        if path
            .extension()
            .is_some_and(|e| e.eq_ignore_ascii_case("xlsx"))
        {
            Self::Xlsx
        } else {
            Self::Csv
        }
    }

    /// Lowercase name
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Xlsx => "xlsx",
            Self::Csv => "csv",
        }
    }
}

impl fmt::Display for ExportFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ExportFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "xlsx" => Ok(Self::Xlsx),
            "csv" => Ok(Self::Csv),
            other => Err(format!("unknown format '{other}' (expected 'xlsx' or 'csv')")),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_from_path() {
        assert_eq!(ExportFormat::from_path(Path::new("out/layers.xlsx")), ExportFormat::Xlsx);
        assert_eq!(ExportFormat::from_path(Path::new("out/LAYERS.XLSX")), ExportFormat::Xlsx);
        assert_eq!(ExportFormat::from_path(Path::new("out/tables")), ExportFormat::Csv);
    }

    #[test]
    fn test_format_parse_and_display() {
        assert_eq!("CSV".parse::<ExportFormat>(), Ok(ExportFormat::Csv));
        assert!("pdf".parse::<ExportFormat>().is_err());
        assert_eq!(ExportFormat::Xlsx.to_string(), "xlsx");
    }

    #[test]
    fn test_exporter_factory() {
        let config = ExportConfig::default();
        assert_eq!(ExportFormat::Xlsx.exporter(config.clone()).name(), "xlsx");
        assert_eq!(ExportFormat::Csv.exporter(config).name(), "csv");
    }
}

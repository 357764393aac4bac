//! XLSX exporter
//!
//! One workbook, one worksheet per layer. Worksheet names follow Excel's
//! rules: at most 31 characters, none of `[ ] : * ? / \`, no leading or
//! trailing apostrophe, unique ignoring case.

use crate::config::{ExportConfig, Orientation};
use crate::errors::{ExportError, ExportResult};
use crate::layout::{to_grid, unique_names};
use crate::Exporter;
use rust_xlsxwriter::{Format, FormatAlign, FormatBorder, Workbook, Worksheet};
use std::path::{Path, PathBuf};
use tracing::{debug, info};
use xsd_layers::LayerTable;

/// Excel's worksheet name limit
pub const MAX_SHEET_NAME_LEN: usize = 31;

const LABEL_WIDTH: f64 = 16.0;
const CELL_WIDTH: f64 = 24.0;

/// Exporter writing layer tables to an Excel workbook
#[derive(Debug, Clone, Default)]
pub struct XlsxExporter {
    config: ExportConfig,
}

impl XlsxExporter {
    /// Create an exporter with default configuration
    pub fn new() -> Self {
        Self::default()
    }

    /// Create an exporter with configuration
    pub fn with_config(mut self, config: ExportConfig) -> Self {
        self.config = config;
        self
    }

    /// Worksheet names for the tables, in table order
    pub fn sheet_names(&self, tables: &[LayerTable]) -> Vec<String> {
        let sanitized: Vec<String> = tables.iter().map(|t| sanitize_sheet_name(&t.name)).collect();
        unique_names(sanitized.iter().map(String::as_str), MAX_SHEET_NAME_LEN)
    }

    /// Build the workbook in memory
    ///
    /// # Errors
    ///
    /// Returns [`ExportError::Workbook`] if a worksheet cannot be written.
    pub fn build_workbook(&self, tables: &[LayerTable]) -> ExportResult<Workbook> {
        let mut workbook = Workbook::new();

        let header_format = Format::new()
            .set_bold()
            .set_align(FormatAlign::Center)
            .set_border(FormatBorder::Thin);
        let label_format = Format::new().set_bold().set_border(FormatBorder::Thin);
        let cell_format = Format::new().set_text_wrap().set_border(FormatBorder::Thin);

        for (table, sheet_name) in tables.iter().zip(self.sheet_names(tables)) {
            let worksheet = workbook
                .add_worksheet()
                .set_name(&sheet_name)
                .map_err(workbook_error)?;

            let grid = to_grid(table, &self.config);
            for (row, cells) in grid.iter().enumerate() {
                let row_num = u32::try_from(row)
                    .map_err(|_| ExportError::workbook(format!("too many rows in '{sheet_name}'")))?;
                for (col, cell) in cells.iter().enumerate() {
                    let col_num = u16::try_from(col).map_err(|_| {
                        ExportError::workbook(format!("too many columns in '{sheet_name}'"))
                    })?;
                    let format = match (row, col, self.config.orientation) {
                        (0, _, _) => &header_format,
                        (_, 0, Orientation::Rows) => &label_format,
                        _ => &cell_format,
                    };
                    worksheet
                        .write_string_with_format(row_num, col_num, cell, format)
                        .map_err(workbook_error)?;
                }
            }

            self.finish_sheet(worksheet, grid.first().map_or(0, Vec::len))?;
            debug!(layer = %table.name, sheet = %sheet_name, "Wrote worksheet");
        }

        Ok(workbook)
    }

    /// Build the workbook and return the XLSX bytes
    ///
    /// # Errors
    ///
    /// Returns [`ExportError::Workbook`] if the workbook cannot be built.
    pub fn to_buffer(&self, tables: &[LayerTable]) -> ExportResult<Vec<u8>> {
        let mut workbook = self.build_workbook(tables)?;
        workbook.save_to_buffer().map_err(workbook_error)
    }

    fn finish_sheet(&self, worksheet: &mut Worksheet, width: usize) -> ExportResult<()> {
        let columns = u16::try_from(width).unwrap_or(u16::MAX);
        for col in 0..columns {
            let width = if col == 0 { LABEL_WIDTH } else { CELL_WIDTH };
            worksheet.set_column_width(col, width).map_err(workbook_error)?;
        }
        if self.config.freeze_panes {
            let freeze_col = u16::from(self.config.orientation == Orientation::Rows);
            worksheet.set_freeze_panes(1, freeze_col).map_err(workbook_error)?;
        }
        Ok(())
    }
}

impl Exporter for XlsxExporter {
    fn name(&self) -> &'static str {
        "xlsx"
    }

    /// `path` is the workbook file; its parent directory is created if missing
    fn export(&self, tables: &[LayerTable], path: &Path) -> ExportResult<Vec<PathBuf>> {
        if tables.is_empty() {
            return Err(ExportError::config("a workbook needs at least one layer"));
        }
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent)
                .map_err(|e| ExportError::io(parent.display().to_string(), e))?;
        }

        let mut workbook = self.build_workbook(tables)?;
        workbook.save(path).map_err(workbook_error)?;

        info!(path = %path.display(), sheets = tables.len(), "Exported layers as XLSX");
        Ok(vec![path.to_path_buf()])
    }
}

/// Replace characters Excel rejects and fit the 31-character limit
pub fn sanitize_sheet_name(name: &str) -> String {
    let cleaned: String = name
        .chars()
        .map(|c| match c {
            '[' | ']' | ':' | '*' | '?' | '/' | '\\' => '_',
            c => c,
        })
        .collect();
    let trimmed = cleaned.trim().trim_matches('\'');
    let truncated: String = trimmed.chars().take(MAX_SHEET_NAME_LEN).collect();
    let truncated = truncated.trim_end_matches('\'').to_string();
    if truncated.is_empty() { "Sheet".to_string() } else { truncated }
}

fn workbook_error(e: rust_xlsxwriter::XlsxError) -> ExportError {
    ExportError::workbook(e.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use xsd_layers::{ElementRecord, Optionality};

    fn table(name: &str) -> LayerTable {
        let mut table = LayerTable::new(name);
        table.insert(
            "Quarter",
            ElementRecord::new(
                Some("Calendar quarter".into()),
                Optionality::Mandatory,
                Some("1, 2, 3, 4".into()),
            ),
        );
        table
    }

    #[test]
    fn test_sanitize_sheet_name() {
        assert_eq!(sanitize_sheet_name("Layer 1"), "Layer 1");
        assert_eq!(sanitize_sheet_name("Payees/Accounts [v2]"), "Payees_Accounts _v2_");
        assert_eq!(sanitize_sheet_name("'quoted'"), "quoted");
        assert_eq!(sanitize_sheet_name("   "), "Sheet");

        let long = sanitize_sheet_name("Reported transactions and payment methods");
        assert_eq!(long.chars().count(), MAX_SHEET_NAME_LEN);
    }

    #[test]
    fn test_sheet_names_are_unique() {
        let exporter = XlsxExporter::new();
        let names = exporter.sheet_names(&[
            table("Reported transactions and payment methods"),
            table("Reported transactions and payment data"),
        ]);
        assert_ne!(names[0].to_lowercase(), names[1].to_lowercase());
        assert!(names.iter().all(|n| n.chars().count() <= MAX_SHEET_NAME_LEN));
    }

    #[test]
    fn test_to_buffer_is_zip() {
        let exporter = XlsxExporter::new();
        let bytes = exporter.to_buffer(&[table("Layer 1"), table("Layer 2")]).unwrap();
        assert!(bytes.starts_with(b"PK"));
    }

    #[test]
    fn test_columns_orientation_builds() {
        let exporter =
            XlsxExporter::new().with_config(ExportConfig::new().orientation(Orientation::Columns));
        assert!(exporter.to_buffer(&[table("Layer 1")]).is_ok());
    }

    #[test]
    fn test_export_creates_parent_directory() {
        let dir = tempfile::TempDir::new().unwrap();
        let path = dir.path().join("out").join("layers.xlsx");

        let written = XlsxExporter::new().export(&[table("Layer 1")], &path).unwrap();

        assert_eq!(written, [path.clone()]);
        let bytes = std::fs::read(&path).unwrap();
        assert!(bytes.starts_with(b"PK"));
    }

    #[test]
    fn test_export_without_tables_fails() {
        let dir = tempfile::TempDir::new().unwrap();
        let err = XlsxExporter::new()
            .export(&[], &dir.path().join("empty.xlsx"))
            .unwrap_err();
        assert!(matches!(err, ExportError::Config(_)));
    }
}

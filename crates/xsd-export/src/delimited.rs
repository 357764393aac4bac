//! CSV exporter
//!
//! Writes one CSV file per layer into an output directory. File names are
//! derived from the layer names with anything outside `[A-Za-z0-9._-]`
//! replaced by `_`, de-duplicated case-insensitively.

use crate::config::{ExportConfig, RecordTerminator};
use crate::errors::{ExportError, ExportResult};
use crate::layout::{to_grid, unique_names};
use crate::Exporter;
use std::io::Write;
use std::path::{Path, PathBuf};
use tracing::{debug, info, trace};
use xsd_layers::LayerTable;

/// Exporter writing layer tables as CSV
#[derive(Debug, Clone, Default)]
pub struct CsvExporter {
    config: ExportConfig,
}

impl CsvExporter {
    /// Create an exporter with default configuration
    pub fn new() -> Self {
        Self::default()
    }

    /// Create an exporter with configuration
    pub fn with_config(mut self, config: ExportConfig) -> Self {
        self.config = config;
        self
    }

    /// The active configuration
    pub fn config(&self) -> &ExportConfig {
        &self.config
    }

    /// Write one table to any byte sink
    ///
    /// # Errors
    ///
    /// Returns [`ExportError::Config`] for a non-ASCII delimiter and
    /// [`ExportError::Write`] if a record cannot be written.
    pub fn write_table<W: Write>(&self, writer: W, table: &LayerTable) -> ExportResult<()> {
        let mut csv_writer = csv::WriterBuilder::new()
            .delimiter(self.delimiter()?)
            .terminator(match self.config.record_terminator {
                RecordTerminator::Crlf => csv::Terminator::CRLF,
                RecordTerminator::Lf => csv::Terminator::Any(b'\n'),
            })
            .flexible(false)
            .from_writer(writer);

        let grid = to_grid(table, &self.config);
        for record in &grid {
            csv_writer
                .write_record(record)
                .map_err(|e| ExportError::write(e.to_string()))?;
            trace!(?record, "Wrote CSV row");
        }

        csv_writer
            .flush()
            .map_err(|e| ExportError::write(e.to_string()))?;
        debug!(layer = %table.name, rows = grid.len(), "Finished writing CSV");
        Ok(())
    }

    /// File names for the tables, unique within one export
    pub fn file_names(&self, tables: &[LayerTable]) -> Vec<String> {
        let stems: Vec<String> = tables.iter().map(|t| sanitize_file_stem(&t.name)).collect();
        unique_names(stems.iter().map(String::as_str), usize::MAX)
            .into_iter()
            .map(|stem| format!("{}.csv", stem.replace(' ', "_")))
            .collect()
    }

    fn delimiter(&self) -> ExportResult<u8> {
        u8::try_from(self.config.delimiter)
            .ok()
            .filter(u8::is_ascii)
            .ok_or_else(|| {
                ExportError::config(format!(
                    "CSV delimiter '{}' is not an ASCII character",
                    self.config.delimiter
                ))
            })
    }
}

impl Exporter for CsvExporter {
    fn name(&self) -> &'static str {
        "csv"
    }

    /// `path` is a directory; it is created if missing
    fn export(&self, tables: &[LayerTable], path: &Path) -> ExportResult<Vec<PathBuf>> {
        std::fs::create_dir_all(path).map_err(|e| ExportError::io(path.display().to_string(), e))?;

        let mut written = Vec::with_capacity(tables.len());
        for (table, file_name) in tables.iter().zip(self.file_names(tables)) {
            let file_path = path.join(file_name);
            let display = file_path.display().to_string();
            let file = std::fs::File::create(&file_path).map_err(|e| ExportError::io(&display, e))?;
            self.write_table(std::io::BufWriter::new(file), table)?;
            written.push(file_path);
        }

        info!(directory = %path.display(), files = written.len(), "Exported layers as CSV");
        Ok(written)
    }
}

fn sanitize_file_stem(name: &str) -> String {
    let stem: String = name
        .trim()
        .chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() || matches!(c, '.' | '-' | '_') {
                c
            } else {
                '_'
            }
        })
        .collect();
    let stem = stem.trim_matches('.').to_string();
    if stem.is_empty() { "layer".to_string() } else { stem }
}

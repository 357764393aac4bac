//! Pipeline orchestration
//!
//! Runs load, merge, extract and export in order for one configuration.

use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};

use tracing::{debug, info};
use xsd_layers::{LayerExtractor, LayerTable};
use xsd_schema::{MergeReport, SchemaLoader};
use xsd_tree::{Diagnostic, Document};

use crate::{Error, PipelineConfig, Result};

/// Main pipeline for merging schemas and flattening layers
#[derive(Debug, Clone)]
pub struct Pipeline {
    config: PipelineConfig,
    loader: SchemaLoader,
}

/// Statistics for one run
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct PipelineStats {
    /// Schema documents loaded, master included
    pub documents_loaded: usize,
    /// Nodes copied onto the master root
    pub nodes_copied: usize,
    /// Imported complex types copied
    pub complex_types_merged: usize,
    /// Layers extracted
    pub layers_extracted: usize,
    /// Columns across all layers
    pub columns_extracted: usize,
    /// Diagnostics at warning level
    pub warnings: usize,
    /// Wall time of the run
    pub duration: Duration,
}

/// Everything a run produced
#[derive(Debug)]
pub struct PipelineResult {
    /// The master document with all imports merged in
    pub merged: Document,
    /// One table per configured layer, in layer order
    pub tables: Vec<LayerTable>,
    /// Merge outcome
    pub merge_report: MergeReport,
    /// Merge and extraction diagnostics, in the order they were found
    pub diagnostics: Vec<Diagnostic>,
    /// Run statistics
    pub stats: PipelineStats,
    /// Files written (merged schema first, then tables)
    pub written: Vec<PathBuf>,
}

impl PipelineResult {
    /// Diagnostics at warning level
    pub fn warnings(&self) -> impl Iterator<Item = &Diagnostic> {
        self.diagnostics.iter().filter(|d| d.is_warning())
    }

    /// Look up a table by layer name
    pub fn table(&self, name: &str) -> Option<&LayerTable> {
        self.tables.iter().find(|t| t.name == name)
    }
}

impl Pipeline {
    /// Create a pipeline for a configuration
    pub fn new(config: PipelineConfig) -> Self {
        Self {
            config,
            loader: SchemaLoader::new(),
        }
    }

    /// Use a loader with search paths
    pub fn with_loader(mut self, loader: SchemaLoader) -> Self {
        self.loader = loader;
        self
    }

    /// The configuration this pipeline runs
    pub fn config(&self) -> &PipelineConfig {
        &self.config
    }

    /// Load the master and its imports
    ///
    /// With explicit imports they are loaded in the given order; otherwise
    /// `schemaLocation` references are followed from the master.
    ///
    /// # Errors
    ///
    /// Fails on the first document that cannot be read or parsed.
    pub fn load(&self) -> Result<(Document, Vec<Document>)> {
        let loaded = match &self.config.imports {
            Some(imports) => {
                let master = self.loader.load_from_file(&self.config.master)?;
                let imports = self.loader.load_all(imports)?;
                (master, imports)
            }
            None => self.loader.load_with_imports(&self.config.master)?,
        };
        Ok(loaded)
    }

    /// Run every stage
    ///
    /// Nothing is merged or written unless all documents loaded.
    ///
    /// # Errors
    ///
    /// Returns the first load, merge, layer or export error.
    pub fn run(&self) -> Result<PipelineResult> {
        let start = Instant::now();
        info!(master = %self.config.master.display(), "Starting pipeline run");

        let layers = self.config.layer_config()?;
        let (mut merged, imports) = self.load()?;
        debug!(imports = imports.len(), "All schema documents loaded");

        let merge_report = xsd_schema::merge(&mut merged, &imports)?;
        let mut written = Vec::new();

        if let Some(path) = &self.config.merged_output {
            ensure_parent(path)?;
            xsd_schema::write_to_file(&merged, path)?;
            info!(path = %path.display(), "Wrote merged schema");
            written.push(path.clone());
        }

        let mut extractor = LayerExtractor::new();
        let tables = extractor.extract_layers(&merged, &layers)?;

        if let Some(path) = &self.config.tables_output {
            let format = self.config.export_format();
            let exporter = format.exporter(self.config.export.clone());
            let files = exporter.export(&tables, path)?;
            info!(
                format = %format,
                path = %path.display(),
                files = files.len(),
                "Exported layer tables"
            );
            written.extend(files);
        }

        let mut diagnostics = merge_report.diagnostics.clone();
        diagnostics.extend(extractor.take_diagnostics());

        let stats = PipelineStats {
            documents_loaded: imports.len() + 1,
            nodes_copied: merge_report.nodes_copied,
            complex_types_merged: merge_report.merged_types.len(),
            layers_extracted: tables.len(),
            columns_extracted: tables.iter().map(LayerTable::len).sum(),
            warnings: diagnostics.iter().filter(|d| d.is_warning()).count(),
            duration: start.elapsed(),
        };

        info!(
            documents = stats.documents_loaded,
            layers = stats.layers_extracted,
            columns = stats.columns_extracted,
            warnings = stats.warnings,
            duration_ms = stats.duration.as_millis(),
            "Pipeline run complete"
        );

        Ok(PipelineResult {
            merged,
            tables,
            merge_report,
            diagnostics,
            stats,
            written,
        })
    }
}

fn ensure_parent(path: &Path) -> Result<()> {
    match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => {
            std::fs::create_dir_all(parent).map_err(|e| {
                Error::io(
                    "create output directory",
                    parent.display().to_string(),
                    e.to_string(),
                )
            })
        }
        _ => Ok(()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;
    use xsd_export::ExportFormat;
    use xsd_layers::{LayerConfig, LayerSpec, Optionality};

    const MASTER: &str = r#"<?xml version="1.0" encoding="UTF-8"?>
<xs:schema xmlns:xs="http://www.w3.org/2001/XMLSchema">
  <xs:import schemaLocation="types.xsd"/>
  <xs:complexType name="Root_Type">
    <xs:sequence>
      <xs:element name="Party" type="Party_Type"/>
    </xs:sequence>
  </xs:complexType>
</xs:schema>
"#;

    const TYPES: &str = r#"<?xml version="1.0" encoding="UTF-8"?>
<xs:schema xmlns:xs="http://www.w3.org/2001/XMLSchema">
  <xs:complexType name="Party_Type">
    <xs:sequence>
      <xs:element name="Name" type="xs:string" minOccurs="0">
        <xs:annotation><xs:documentation>Party name</xs:documentation></xs:annotation>
      </xs:element>
      <xs:element name="Country" type="Country_Type"/>
    </xs:sequence>
  </xs:complexType>
  <xs:simpleType name="Country_Type">
    <xs:restriction base="xs:string">
      <xs:enumeration value="BE"/>
      <xs:enumeration value="NL"/>
    </xs:restriction>
  </xs:simpleType>
</xs:schema>
"#;

    fn write_schemas(dir: &Path) -> PathBuf {
        std::fs::write(dir.join("master.xsd"), MASTER).unwrap();
        std::fs::write(dir.join("types.xsd"), TYPES).unwrap();
        dir.join("master.xsd")
    }

    fn party_layers() -> LayerConfig {
        LayerConfig::new(vec![LayerSpec::new("Parties", ["Party_Type", "Missing_Type"])]).unwrap()
    }

    #[test]
    fn test_run_follows_schema_locations() {
        let dir = TempDir::new().unwrap();
        let master = write_schemas(dir.path());

        let result = Pipeline::new(PipelineConfig::new(master).with_layers(party_layers()))
            .run()
            .unwrap();

        assert_eq!(result.stats.documents_loaded, 2);
        assert_eq!(result.stats.complex_types_merged, 1);
        assert_eq!(result.merge_report.merged_types, ["Party_Type"]);

        let table = result.table("Parties").unwrap();
        assert_eq!(table.column_names().collect::<Vec<_>>(), ["Name", "Country"]);
        let name = table.get("Name").unwrap();
        assert_eq!(name.documentation.as_deref(), Some("Party name"));
        assert_eq!(name.optionality, Optionality::Optional);

        assert_eq!(result.stats.warnings, 1);
        assert!(result.warnings().all(|d| d.message.contains("Missing_Type")));
        assert!(result.written.is_empty());
    }

    #[test]
    fn test_run_writes_outputs() {
        let dir = TempDir::new().unwrap();
        let master = write_schemas(dir.path());
        let merged_path = dir.path().join("out/combined.xsd");
        let tables_path = dir.path().join("out/tables");

        let config = PipelineConfig::new(master)
            .with_imports([dir.path().join("types.xsd")])
            .with_layers(party_layers())
            .with_merged_output(&merged_path)
            .with_tables_output(&tables_path)
            .with_format(ExportFormat::Csv);
        let result = Pipeline::new(config).run().unwrap();

        assert_eq!(result.written[0], merged_path);
        assert_eq!(result.written[1], tables_path.join("Parties.csv"));

        let merged = std::fs::read_to_string(&merged_path).unwrap();
        assert!(merged.contains("Party_Type"));
        assert!(merged.contains("Country_Type"));
    }

    #[test]
    fn test_parse_failure_aborts_before_writing() {
        let dir = TempDir::new().unwrap();
        let master = write_schemas(dir.path());
        std::fs::write(dir.path().join("types.xsd"), "<xs:schema").unwrap();
        let merged_path = dir.path().join("combined.xsd");

        let err = Pipeline::new(PipelineConfig::new(master).with_merged_output(&merged_path))
            .run()
            .unwrap_err();

        assert!(err.is_parse_error());
        assert!(!merged_path.exists());
    }

    #[test]
    fn test_missing_master_is_io_error() {
        let dir = TempDir::new().unwrap();
        let err = Pipeline::new(PipelineConfig::new(dir.path().join("absent.xsd")))
            .run()
            .unwrap_err();
        assert!(matches!(err, Error::Schema(xsd_schema::Error::Io { .. })));
    }
}

//! Pipeline configuration
//!
//! ```yaml
//! master: PaymentData.xsd
//! imports: [commontypes.xsd, isotypes.xsd]   # omit to follow schemaLocation
//! layers: layers.yaml                        # path, inline list, or omit for CESOP
//! merged_output: out/combined.xsd
//! tables_output: out/layers_output.xlsx
//! format: xlsx                               # omit to infer from tables_output
//! export:
//!   orientation: rows
//! ```
//!
//! Relative paths are resolved against the directory of the configuration
//! file.

use crate::{Error, Result};
use serde::Deserialize;
use std::path::{Path, PathBuf};
use tracing::debug;
use xsd_export::{ExportConfig, ExportFormat};
use xsd_layers::LayerConfig;

/// Configuration for one pipeline run
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct PipelineConfig {
    /// Master schema document
    pub master: PathBuf,
    /// Imported documents in merge order; `None` follows `schemaLocation`
    #[serde(default)]
    pub imports: Option<Vec<PathBuf>>,
    /// Layer definitions; `None` uses the CESOP preset
    #[serde(default)]
    pub layers: Option<LayerSource>,
    /// Where to write the merged schema
    #[serde(default)]
    pub merged_output: Option<PathBuf>,
    /// Where to write the layer tables
    #[serde(default)]
    pub tables_output: Option<PathBuf>,
    /// Output format; `None` infers it from `tables_output`
    #[serde(default)]
    pub format: Option<ExportFormat>,
    /// Exporter settings
    #[serde(default)]
    pub export: ExportConfig,
}

/// Where the layer definitions come from
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(untagged)]
pub enum LayerSource {
    /// A YAML or JSON layer file
    File(PathBuf),
    /// Layers given inline
    Inline(LayerConfig),
}

impl PipelineConfig {
    /// Create a configuration for a master schema with defaults elsewhere
    pub fn new(master: impl Into<PathBuf>) -> Self {
        Self {
            master: master.into(),
            imports: None,
            layers: None,
            merged_output: None,
            tables_output: None,
            format: None,
            export: ExportConfig::default(),
        }
    }

    /// Merge exactly these imports instead of following `schemaLocation`
    pub fn with_imports<P: Into<PathBuf>>(mut self, imports: impl IntoIterator<Item = P>) -> Self {
        self.imports = Some(imports.into_iter().map(Into::into).collect());
        self
    }

    /// Use these layers
    pub fn with_layers(mut self, layers: LayerConfig) -> Self {
        self.layers = Some(LayerSource::Inline(layers));
        self
    }

    /// Read layers from a file
    pub fn with_layer_file(mut self, path: impl Into<PathBuf>) -> Self {
        self.layers = Some(LayerSource::File(path.into()));
        self
    }

    /// Write the merged schema
    pub fn with_merged_output(mut self, path: impl Into<PathBuf>) -> Self {
        self.merged_output = Some(path.into());
        self
    }

    /// Export the tables
    pub fn with_tables_output(mut self, path: impl Into<PathBuf>) -> Self {
        self.tables_output = Some(path.into());
        self
    }

    /// Set the output format
    pub fn with_format(mut self, format: ExportFormat) -> Self {
        self.format = Some(format);
        self
    }

    /// Set exporter options
    pub fn with_export_config(mut self, export: ExportConfig) -> Self {
        self.export = export;
        self
    }

    /// Parse a configuration from YAML; paths are kept as written
    ///
    /// # Errors
    ///
    /// Returns [`Error::Config`] for invalid YAML or an empty master path.
    pub fn load_from_yaml(yaml: &str) -> Result<Self> {
        let config: Self = serde_yaml::from_str(yaml)
            .map_err(|e| Error::config(format!("YAML parse error: {e}")))?;
        config.validate()?;
        Ok(config)
    }

    /// Load a configuration file, resolving relative paths against its directory
    ///
    /// # Errors
    ///
    /// Returns [`Error::Io`] if the file cannot be read and
    /// [`Error::Config`] if it is not a valid configuration.
    pub fn load_from_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path).map_err(|e| {
            Error::io("read pipeline config", path.display().to_string(), e.to_string())
        })?;
        let config = Self::load_from_yaml(&content)?;
        let base = path.parent().unwrap_or_else(|| Path::new(""));
        debug!(path = %path.display(), "Loaded pipeline configuration");
        Ok(config.resolve_paths(base))
    }

    /// Check required settings
    ///
    /// # Errors
    ///
    /// Returns [`Error::Config`] if the master path is empty.
    pub fn validate(&self) -> Result<()> {
        if self.master.as_os_str().is_empty() {
            return Err(Error::config("'master' must name a schema document"));
        }
        Ok(())
    }

    /// Resolve every relative path against `base`
    pub fn resolve_paths(mut self, base: &Path) -> Self {
        let resolve = |path: PathBuf| {
            if path.is_relative() {
                base.join(path)
            } else {
                path
            }
        };

        self.master = resolve(self.master);
        self.imports = self
            .imports
            .map(|imports| imports.into_iter().map(resolve).collect());
        if let Some(LayerSource::File(path)) = self.layers {
            self.layers = Some(LayerSource::File(resolve(path)));
        }
        self.merged_output = self.merged_output.map(resolve);
        self.tables_output = self.tables_output.map(resolve);
        self
    }

    /// The configured layers, loading a layer file if one is named
    ///
    /// # Errors
    ///
    /// Returns a layer error if the layer file cannot be loaded.
    pub fn layer_config(&self) -> Result<LayerConfig> {
        match &self.layers {
            None => Ok(LayerConfig::cesop()),
            Some(LayerSource::Inline(config)) => Ok(config.clone()),
            Some(LayerSource::File(path)) => Ok(LayerConfig::load_from_file(path)?),
        }
    }

    /// The output format, explicit or inferred from `tables_output`
    pub fn export_format(&self) -> ExportFormat {
        self.format.unwrap_or_else(|| {
            self.tables_output
                .as_deref()
                .map_or_else(ExportFormat::default, ExportFormat::from_path)
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use xsd_export::Orientation;

    #[test]
    fn test_minimal_yaml() {
        let config = PipelineConfig::load_from_yaml("master: PaymentData.xsd\n").unwrap();
        assert_eq!(config.master, PathBuf::from("PaymentData.xsd"));
        assert!(config.imports.is_none());
        assert!(config.layers.is_none());
        assert_eq!(config.layer_config().unwrap(), LayerConfig::cesop());
        assert_eq!(config.export, ExportConfig::default());
    }

    #[test]
    fn test_full_yaml() {
        let yaml = r"
master: schemas/PaymentData.xsd
imports:
  - schemas/commontypes.xsd
  - /abs/isotypes.xsd
layers:
  - name: Provider
    types: [PSP_Type, PSPId_Type]
merged_output: out/combined.xsd
tables_output: out/tables
format: csv
export:
  orientation: columns
  delimiter: ';'
";
        let config = PipelineConfig::load_from_yaml(yaml)
            .unwrap()
            .resolve_paths(Path::new("/work"));

        assert_eq!(config.master, PathBuf::from("/work/schemas/PaymentData.xsd"));
        assert_eq!(
            config.imports.as_deref().unwrap(),
            [
                PathBuf::from("/work/schemas/commontypes.xsd"),
                PathBuf::from("/abs/isotypes.xsd")
            ]
        );
        assert_eq!(config.merged_output, Some(PathBuf::from("/work/out/combined.xsd")));
        assert_eq!(config.export_format(), ExportFormat::Csv);
        assert_eq!(config.export.orientation, Orientation::Columns);
        assert_eq!(config.export.delimiter, ';');

        let layers = config.layer_config().unwrap();
        assert_eq!(layers.layers()[0].name, "Provider");
    }

    #[test]
    fn test_layer_file_path_is_resolved() {
        let config = PipelineConfig::load_from_yaml("master: m.xsd\nlayers: layers.yaml\n")
            .unwrap()
            .resolve_paths(Path::new("/cfg"));
        assert_eq!(
            config.layers,
            Some(LayerSource::File(PathBuf::from("/cfg/layers.yaml")))
        );
    }

    #[test]
    fn test_format_inferred_from_output() {
        let xlsx = PipelineConfig::new("m.xsd").with_tables_output("out/layers.xlsx");
        assert_eq!(xlsx.export_format(), ExportFormat::Xlsx);

        let csv = PipelineConfig::new("m.xsd").with_tables_output("out/tables");
        assert_eq!(csv.export_format(), ExportFormat::Csv);

        let explicit = csv.with_format(ExportFormat::Xlsx);
        assert_eq!(explicit.export_format(), ExportFormat::Xlsx);
    }

    #[test]
    fn test_invalid_configs() {
        assert!(matches!(
            PipelineConfig::load_from_yaml("imports: []\n"),
            Err(Error::Config(_))
        ));
        assert!(matches!(
            PipelineConfig::load_from_yaml("master: ''\n"),
            Err(Error::Config(_))
        ));
        assert!(matches!(
            PipelineConfig::load_from_yaml("master: m.xsd\nformat: pdf\n"),
            Err(Error::Config(_))
        ));
    }

    #[test]
    fn test_load_from_file_resolves_against_config_dir() {
        let dir = tempfile::TempDir::new().unwrap();
        let path = dir.path().join("pipeline.yaml");
        std::fs::write(&path, "master: PaymentData.xsd\ntables_output: out.xlsx\n").unwrap();

        let config = PipelineConfig::load_from_file(&path).unwrap();
        assert_eq!(config.master, dir.path().join("PaymentData.xsd"));
        assert_eq!(config.tables_output, Some(dir.path().join("out.xlsx")));

        let missing = PipelineConfig::load_from_file(&dir.path().join("missing.yaml"));
        assert!(matches!(missing, Err(Error::Io { .. })));
    }
}

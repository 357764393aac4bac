//! Layer configuration
//!
//! Layer files list the complex types of each layer, either with a name:
//!
//! ```yaml
//! layers:
//!   - name: Reporting PSP
//!     types: [MessageSpec_Type, PSP_Type]
//!   - types: [ReportedTransaction_Type]
//! ```
//!
//! or as bare lists of type names. Layers without a name are called
//! `Layer {n}`, counting from 1 in file order.

use crate::{Error, Result};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::path::Path;
use tracing::debug;

/// One layer: a named, ordered list of complex type names
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LayerSpec {
    /// Layer name, used as table and sheet name
    pub name: String,

    /// Complex type names in extraction order
    pub types: Vec<String>,
}

/// Ordered list of layers with unique names
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LayerConfig {
    layers: Vec<LayerSpec>,
}

/// On-disk layer file
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum LayerFile {
    Document { layers: Vec<LayerEntry> },
    List(Vec<LayerEntry>),
}

#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum LayerEntry {
    Named {
        #[serde(default)]
        name: Option<String>,
        types: Vec<String>,
    },
    Types(Vec<String>),
}

const CESOP_LAYERS: [&[&str]; 3] = [
    &[
        "MessageSpec_Type",
        "PaymentDataBody_Type",
        "PSP_Type",
        "PSPId_Type",
        "ReportingPeriod_Type",
        "Representative_Type",
    ],
    &[
        "ReportedPayee_Type",
        "AccountIdentifier_Type",
        "TAXIdentifier_Type",
        "PayerMS_Type",
    ],
    &["ReportedTransaction_Type"],
];

impl LayerSpec {
    /// Create a layer
    pub fn new<S: Into<String>>(name: impl Into<String>, types: impl IntoIterator<Item = S>) -> Self {
        Self {
            name: name.into(),
            types: types.into_iter().map(Into::into).collect(),
        }
    }
}

impl LayerConfig {
    /// Create a configuration, checking that names are non-empty and unique
    ///
    /// # Errors
    ///
    /// Returns [`Error::Config`] for an empty or duplicate layer name.
    pub fn new(layers: Vec<LayerSpec>) -> Result<Self> {
        let mut seen = HashSet::new();
        for layer in &layers {
            if layer.name.trim().is_empty() {
                return Err(Error::config("layer name must not be empty"));
            }
            if !seen.insert(layer.name.as_str()) {
                return Err(Error::config(format!(
                    "duplicate layer name '{}'",
                    layer.name
                )));
            }
        }
        Ok(Self { layers })
    }

    /// Create a configuration from unnamed type lists (`Layer 1`, `Layer 2`, ...)
    pub fn from_type_lists<S: Into<String>>(lists: impl IntoIterator<Item = Vec<S>>) -> Self {
        let layers = lists
            .into_iter()
            .enumerate()
            .map(|(index, types)| LayerSpec::new(default_name(index), types))
            .collect();
        Self { layers }
    }

    /// The CESOP payment data layers
    pub fn cesop() -> Self {
        Self::from_type_lists(CESOP_LAYERS.iter().map(|types| types.to_vec()))
    }

    /// Load layers from a YAML string
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidFormat`] if the YAML does not describe layers
    /// and [`Error::Config`] for empty or duplicate names.
    pub fn load_from_yaml(yaml: &str) -> Result<Self> {
        let file: LayerFile = serde_yaml::from_str(yaml)
            .map_err(|e| Error::InvalidFormat(format!("YAML parse error: {e}")))?;
        Self::from_file(file)
    }

    /// Load layers from a JSON string
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidFormat`] if the JSON does not describe layers
    /// and [`Error::Config`] for empty or duplicate names.
    pub fn load_from_json(json: &str) -> Result<Self> {
        let file: LayerFile = serde_json::from_str(json)
            .map_err(|e| Error::InvalidFormat(format!("JSON parse error: {e}")))?;
        Self::from_file(file)
    }

    /// Load layers from a `.yaml`/`.yml` or JSON file
    ///
    /// # Errors
    ///
    /// Returns [`Error::Io`] if the file cannot be read, otherwise as
    /// [`LayerConfig::load_from_yaml`] and [`LayerConfig::load_from_json`].
    pub fn load_from_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .map_err(|e| Error::io(path.display().to_string(), e))?;

        let config = if path
            .extension()
            .is_some_and(|e| e == "yaml" || e == "yml")
        {
            Self::load_from_yaml(&content)?
        } else {
            Self::load_from_json(&content)?
        };
        debug!(path = %path.display(), layers = config.len(), "Loaded layer configuration");
        Ok(config)
    }

    /// Serialize the configuration as YAML
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidFormat`] if serialization fails.
    pub fn to_yaml(&self) -> Result<String> {
        serde_yaml::to_string(self)
            .map_err(|e| Error::InvalidFormat(format!("YAML serialize error: {e}")))
    }

    /// Layers in configured order
    pub fn layers(&self) -> &[LayerSpec] {
        &self.layers
    }

    /// Iterate layers in configured order
    pub fn iter(&self) -> impl Iterator<Item = &LayerSpec> {
        self.layers.iter()
    }

    /// Look up a layer by name
    pub fn get(&self, name: &str) -> Option<&LayerSpec> {
        self.layers.iter().find(|l| l.name == name)
    }

    /// Number of layers
    pub fn len(&self) -> usize {
        self.layers.len()
    }

    /// Whether no layer is configured
    pub fn is_empty(&self) -> bool {
        self.layers.is_empty()
    }

    fn from_file(file: LayerFile) -> Result<Self> {
        let entries = match file {
            LayerFile::Document { layers } | LayerFile::List(layers) => layers,
        };

        let layers = entries
            .into_iter()
            .enumerate()
            .map(|(index, entry)| match entry {
                LayerEntry::Named { name, types } => {
                    LayerSpec::new(name.unwrap_or_else(|| default_name(index)), types)
                }
                LayerEntry::Types(types) => LayerSpec::new(default_name(index), types),
            })
            .collect();
        Self::new(layers)
    }
}

impl<'de> Deserialize<'de> for LayerConfig {
    fn deserialize<D>(deserializer: D) -> std::result::Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let file = LayerFile::deserialize(deserializer)?;
        Self::from_file(file).map_err(serde::de::Error::custom)
    }
}

impl<'a> IntoIterator for &'a LayerConfig {
    type Item = &'a LayerSpec;
    type IntoIter = std::slice::Iter<'a, LayerSpec>;

    fn into_iter(self) -> Self::IntoIter {
        self.layers.iter()
    }
}

fn default_name(index: usize) -> String {
    format!("Layer {}", index + 1)
}

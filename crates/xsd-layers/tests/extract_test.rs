//! Layer extraction over merged schemas

use std::path::PathBuf;

use xsd_layers::{LayerConfig, LayerExtractor, LayerSpec, Optionality, extract_layer};
use xsd_schema::{SchemaLoader, merge};
use xsd_tree::{DiagnosticCode, Document};

/// Helper function to get the project root directory
fn project_root() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .parent()
        .unwrap()
        .parent()
        .unwrap()
        .to_path_buf()
}

fn merged_cesop() -> Document {
    let path = project_root()
        .join("testdata")
        .join("cesop")
        .join("PaymentData.xsd");
    let (mut master, imports) = SchemaLoader::new()
        .load_with_imports(&path)
        .unwrap_or_else(|err| panic!("Failed to load {}: {err}", path.display()));
    merge(&mut master, &imports).unwrap();
    master
}

const MASTER: &str = r#"<xs:schema xmlns:xs="http://www.w3.org/2001/XMLSchema" xmlns:cm="urn:cm">
  <xs:complexType name="PSP_Type">
    <xs:sequence>
      <xs:element name="PSPId" type="cm:PSPId_Type"/>
    </xs:sequence>
  </xs:complexType>
</xs:schema>"#;

const IMPORTED: &str = r#"<xs:schema xmlns:xs="http://www.w3.org/2001/XMLSchema" xmlns:cm="urn:cm">
  <xs:complexType name="PSPId_Type">
    <xs:sequence>
      <xs:element name="Value" minOccurs="0">
        <xs:simpleType>
          <xs:restriction base="xs:string">
            <xs:enumeration value="IBAN"/>
            <xs:enumeration value="BIC"/>
          </xs:restriction>
        </xs:simpleType>
      </xs:element>
    </xs:sequence>
  </xs:complexType>
</xs:schema>"#;

#[test]
fn test_merge_then_extract_psp_layer() -> anyhow::Result<()> {
    let loader = SchemaLoader::new();
    let mut master = loader.load_from_str(MASTER, "master.xsd")?;
    let imported = loader.load_from_str(IMPORTED, "common.xsd")?;

    merge(&mut master, &[imported])?;

    let types = vec!["PSP_Type".to_string(), "PSPId_Type".to_string()];
    let table = extract_layer(&master, &types)?;

    assert_eq!(table.column_names().collect::<Vec<_>>(), ["PSPId", "Value"]);
    let psp_id = table.get("PSPId").unwrap();
    assert_eq!(psp_id.optionality, Optionality::Mandatory);
    assert_eq!(psp_id.restrictions, None);
    let value = table.get("Value").unwrap();
    assert_eq!(value.optionality, Optionality::Optional);
    assert_eq!(value.restrictions.as_deref(), Some("IBAN, BIC"));
    Ok(())
}

#[test]
fn test_extract_before_merge_misses_imported_columns() -> anyhow::Result<()> {
    let master = SchemaLoader::new().load_from_str(MASTER, "master.xsd")?;

    let mut extractor = LayerExtractor::new();
    let table = extractor.extract_layer(
        &master,
        &LayerSpec::new("Layer 1", ["PSP_Type", "PSPId_Type"]),
    )?;

    assert_eq!(table.column_names().collect::<Vec<_>>(), ["PSPId"]);
    assert_eq!(extractor.diagnostics()[0].code, DiagnosticCode::MissingType);
    Ok(())
}

#[test]
fn test_cesop_layers() {
    let merged = merged_cesop();
    let mut extractor = LayerExtractor::new();

    let tables = extractor
        .extract_layers(&merged, &LayerConfig::cesop())
        .unwrap();

    assert_eq!(tables.len(), 3);
    let counts: Vec<usize> = tables.iter().map(|t| t.len()).collect();
    assert_eq!(counts, [15, 12, 7]);

    let first: Vec<&str> = tables[0].column_names().take(3).collect();
    assert_eq!(first, ["TransmittingCountry", "MessageType", "MessageTypeIndic"]);

    let indic = tables[0].get("MessageTypeIndic").unwrap();
    assert_eq!(
        indic.restrictions.as_deref(),
        Some("CESOP100, CESOP101, CESOP102")
    );
    assert_eq!(
        indic.documentation.as_deref(),
        Some("Indicates whether the message carries new data, no data or a correction.")
    );

    // PSPId_Type is only defined in commontypes.xsd
    let value = tables[0].get("Value").unwrap();
    assert_eq!(value.restrictions.as_deref(), Some("IBAN, BIC"));

    let method = tables[2].get("PaymentMethod").unwrap();
    assert_eq!(method.optionality, Optionality::Optional);
    assert!(method.restrictions.as_deref().unwrap().starts_with("Card payment, Bank transfer"));
}

#[test]
fn test_cesop_duplicate_name_column_reported() {
    let merged = merged_cesop();
    let mut extractor = LayerExtractor::new();

    let tables = extractor
        .extract_layers(&merged, &LayerConfig::cesop())
        .unwrap();

    // Representative_Type repeats PSP_Type's Name column
    let duplicates: Vec<_> = extractor
        .diagnostics()
        .iter()
        .filter(|d| d.code == DiagnosticCode::DuplicateColumn)
        .collect();
    assert_eq!(duplicates.len(), 1);
    assert_eq!(duplicates[0].path, "Layer 1");
    assert!(tables[0].get("Name").unwrap().documentation.is_none());

    assert!(
        extractor
            .diagnostics()
            .iter()
            .all(|d| d.code != DiagnosticCode::MissingType)
    );
}

#[test]
fn test_columns_unique_per_layer() {
    let merged = merged_cesop();
    let tables = LayerExtractor::new()
        .extract_layers(&merged, &LayerConfig::cesop())
        .unwrap();

    for table in &tables {
        let mut names: Vec<&str> = table.column_names().collect();
        let total = names.len();
        names.sort_unstable();
        names.dedup();
        assert_eq!(names.len(), total, "duplicate column in {}", table.name);
    }
}

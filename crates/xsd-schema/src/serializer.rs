//! Schema document serializer

use crate::{Error, Result};
use quick_xml::Writer;
use quick_xml::events::{BytesDecl, BytesEnd, BytesStart, BytesText, Event};
use std::io::Write;
use std::path::Path;
use tracing::debug;
use xsd_tree::{Document, Node};

/// Serialize a document as indented XML with an XML declaration
///
/// # Errors
///
/// Returns [`Error::Serialize`] if the XML writer fails.
pub fn to_xml_string(document: &Document) -> Result<String> {
    let mut buffer = Vec::new();
    write_document(&mut buffer, document)?;
    String::from_utf8(buffer).map_err(|e| Error::Serialize(e.to_string()))
}

/// Write a document to any byte sink
///
/// # Errors
///
/// Returns [`Error::Serialize`] if the XML writer fails.
pub fn write_document<W: Write>(sink: W, document: &Document) -> Result<()> {
    let mut writer = Writer::new_with_indent(sink, b' ', 2);
    writer
        .write_event(Event::Decl(BytesDecl::new("1.0", Some("UTF-8"), None)))
        .map_err(serialize_error)?;
    write_node(&mut writer, &document.root)?;
    writer
        .get_mut()
        .write_all(b"\n")
        .map_err(serialize_error)
}

/// Write a document to a file, replacing existing content
///
/// # Errors
///
/// Returns [`Error::Io`] if the file cannot be created and
/// [`Error::Serialize`] if writing fails.
pub fn write_to_file(document: &Document, path: &Path) -> Result<()> {
    let shown = path.display().to_string();
    let file = std::fs::File::create(path).map_err(|e| Error::io(&shown, e))?;
    let mut sink = std::io::BufWriter::new(file);
    write_document(&mut sink, document)?;
    sink.flush().map_err(|e| Error::io(&shown, e))?;
    debug!(path = %shown, "Wrote schema document");
    Ok(())
}

fn write_node<W: Write>(writer: &mut Writer<W>, node: &Node) -> Result<()> {
    let tag = node.name.to_string();
    let mut start = BytesStart::new(tag.as_str());
    for (key, value) in &node.attributes {
        start.push_attribute((key.as_str(), value.as_str()));
    }

    if node.children.is_empty() && node.text.is_none() {
        return writer
            .write_event(Event::Empty(start))
            .map_err(serialize_error);
    }

    writer
        .write_event(Event::Start(start))
        .map_err(serialize_error)?;
    if let Some(text) = &node.text {
        writer
            .write_event(Event::Text(BytesText::new(text)))
            .map_err(serialize_error)?;
    }
    for child in &node.children {
        write_node(writer, child)?;
    }
    writer
        .write_event(Event::End(BytesEnd::new(tag.as_str())))
        .map_err(serialize_error)
}

fn serialize_error(e: impl std::fmt::Display) -> Error {
    Error::Serialize(e.to_string())
}

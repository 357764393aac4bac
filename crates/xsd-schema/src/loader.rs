//! Schema document loader

use crate::{Error, Result};
use quick_xml::Reader;
use quick_xml::events::{BytesStart, Event};
use std::collections::HashSet;
use std::path::{Path, PathBuf};
use tracing::{debug, info, trace};
use xsd_tree::{Document, NamespaceTable, Node, QName, XsdKind};

/// Loads XSD documents into schema trees
///
/// Relative paths that do not exist as given are looked up in the search
/// paths, in order.
#[derive(Debug, Clone, Default)]
pub struct SchemaLoader {
    search_paths: Vec<PathBuf>,
}

impl SchemaLoader {
    /// Create a loader that only resolves paths as given
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a loader with additional search paths
    pub fn with_search_paths(search_paths: Vec<PathBuf>) -> Self {
        Self { search_paths }
    }

    /// Add a search path for schema files
    pub fn add_path(&mut self, path: PathBuf) {
        self.search_paths.push(path);
    }

    /// Resolve a schema path against the search paths
    ///
    /// # Errors
    ///
    /// Returns [`Error::Io`] with `NotFound` if no candidate exists.
    pub fn resolve(&self, path: &Path) -> Result<PathBuf> {
        if path.exists() {
            return Ok(path.to_path_buf());
        }
        if path.is_relative() {
            for base in &self.search_paths {
                let candidate = base.join(path);
                if candidate.exists() {
                    trace!(path = %candidate.display(), "Resolved schema via search path");
                    return Ok(candidate);
                }
            }
        }
        Err(Error::io(
            path.display().to_string(),
            std::io::Error::new(
                std::io::ErrorKind::NotFound,
                format!("not found in search paths {:?}", self.search_paths),
            ),
        ))
    }

    /// Load a schema document from a file
    ///
    /// # Errors
    ///
    /// Returns [`Error::Io`] if the file cannot be read and [`Error::Parse`]
    /// if it is not a well-formed schema document.
    pub fn load_from_file(&self, path: &Path) -> Result<Document> {
        let path = self.resolve(path)?;
        let source = path.display().to_string();
        trace!(%source, "Loading schema from file");
        let content = std::fs::read_to_string(&path).map_err(|e| Error::io(&source, e))?;
        self.load_from_str(&content, &source)
    }

    /// Load several documents, failing on the first error
    ///
    /// # Errors
    ///
    /// Propagates the first load error; no partial result is returned.
    pub fn load_all<P: AsRef<Path>>(&self, paths: &[P]) -> Result<Vec<Document>> {
        paths
            .iter()
            .map(|path| self.load_from_file(path.as_ref()))
            .collect()
    }

    /// Parse a schema document from a string
    ///
    /// # Errors
    ///
    /// Returns [`Error::Parse`] for malformed XML, unbalanced tags, missing
    /// or multiple root elements, a document without an XML Schema
    /// namespace binding, or a root that is not a `schema` element.
    pub fn load_from_str(&self, xml: &str, source: &str) -> Result<Document> {
        let mut reader = Reader::from_str(xml);
        reader.config_mut().trim_text(true);

        let mut stack: Vec<Node> = Vec::new();
        let mut namespaces = NamespaceTable::new();
        let mut root: Option<Node> = None;

        loop {
            let event = match reader.read_event() {
                Ok(event) => event,
                Err(e) => {
                    return Err(Error::parse(
                        source,
                        format!("{e} (at byte {})", reader.buffer_position()),
                    ));
                }
            };

            match event {
                Event::Start(start) => {
                    let node = open_node(&start, &mut namespaces, source)?;
                    stack.push(node);
                }
                Event::Empty(start) => {
                    let node = open_node(&start, &mut namespaces, source)?;
                    attach(node, &mut stack, &mut root, source)?;
                }
                Event::End(_) => {
                    let node = stack
                        .pop()
                        .ok_or_else(|| Error::parse(source, "closing tag without opening tag"))?;
                    attach(node, &mut stack, &mut root, source)?;
                }
                Event::Text(text) => {
                    let text = text
                        .unescape()
                        .map_err(|e| Error::parse(source, format!("invalid text content: {e}")))?;
                    append_text(&mut stack, &text, source)?;
                }
                Event::CData(cdata) => {
                    let raw = cdata.into_inner();
                    append_text(&mut stack, &String::from_utf8_lossy(&raw), source)?;
                }
                Event::Eof => break,
                _ => {} // declarations, comments, processing instructions, doctype
            }
        }

        if let Some(open) = stack.last() {
            return Err(Error::parse(
                source,
                format!("unexpected end of document inside <{}>", open.name),
            ));
        }

        let root = root.ok_or_else(|| Error::parse(source, "no root element found"))?;
        let document = Document::new(root, namespaces).with_source(source);

        let vocab = document
            .vocabulary()
            .map_err(|e| Error::parse(source, e.to_string()))?;
        if !vocab.is(&document.root, XsdKind::Schema) {
            return Err(Error::parse(
                source,
                format!(
                    "root element <{}> is not an XML Schema 'schema' element",
                    document.root.name
                ),
            ));
        }

        debug!(
            %source,
            children = document.root.children.len(),
            "Parsed schema document"
        );
        Ok(document)
    }

    /// Schema locations referenced by `import`/`include` children of the root
    ///
    /// Relative locations are resolved against `base_dir`; remote locations
    /// (`scheme://...`) are skipped.
    pub fn referenced_locations(&self, document: &Document, base_dir: &Path) -> Vec<PathBuf> {
        let Ok(vocab) = document.vocabulary() else {
            return Vec::new();
        };

        document
            .root
            .children
            .iter()
            .filter(|n| matches!(vocab.kind_of(n), Some(XsdKind::Import | XsdKind::Include)))
            .filter_map(|n| n.attribute("schemaLocation"))
            .filter(|location| {
                let remote = location.contains("://");
                if remote {
                    debug!(%location, "Skipping remote schema location");
                }
                !remote
            })
            .map(|location| base_dir.join(location))
            .collect()
    }

    /// Load a master schema and, transitively, every local schema it imports
    ///
    /// Imported documents are returned breadth-first in reference order;
    /// each file is loaded once.
    ///
    /// # Errors
    ///
    /// Fails on the first document that cannot be read or parsed.
    pub fn load_with_imports(&self, master_path: &Path) -> Result<(Document, Vec<Document>)> {
        let master_path = self.resolve(master_path)?;
        let master = self.load_from_file(&master_path)?;

        let mut visited: HashSet<PathBuf> = HashSet::new();
        visited.insert(canonical(&master_path));

        let mut queue = self.referenced_locations(&master, &parent_dir(&master_path));
        let mut imports = Vec::new();
        let mut index = 0;

        while index < queue.len() {
            let path = queue[index].clone();
            index += 1;

            if !visited.insert(canonical(&path)) {
                trace!(path = %path.display(), "Schema already loaded");
                continue;
            }

            let document = self.load_from_file(&path)?;
            queue.extend(self.referenced_locations(&document, &parent_dir(&path)));
            imports.push(document);
        }

        info!(
            master = %master.source_name(),
            imports = imports.len(),
            "Loaded schema with imports"
        );
        Ok((master, imports))
    }
}

fn open_node(start: &BytesStart<'_>, namespaces: &mut NamespaceTable, source: &str) -> Result<Node> {
    let raw_name = String::from_utf8_lossy(start.name().as_ref()).into_owned();
    let name = QName::parse(&raw_name).map_err(|e| Error::parse(source, e.to_string()))?;
    let mut node = Node::new(name);

    for attr in start.attributes() {
        let attr = attr.map_err(|e| {
            Error::parse(source, format!("invalid attribute on <{raw_name}>: {e}"))
        })?;
        let key = String::from_utf8_lossy(attr.key.as_ref()).into_owned();
        let value = attr
            .unescape_value()
            .map_err(|e| Error::parse(source, format!("invalid value for '{key}': {e}")))?
            .into_owned();
        namespaces.declare_attribute(&key, &value);
        node.set_attribute(key, value);
    }

    Ok(node)
}

fn attach(node: Node, stack: &mut [Node], root: &mut Option<Node>, source: &str) -> Result<()> {
    if let Some(parent) = stack.last_mut() {
        parent.add_child(node);
        return Ok(());
    }
    if root.is_some() {
        return Err(Error::parse(
            source,
            format!("multiple root elements (second is <{}>)", node.name),
        ));
    }
    *root = Some(node);
    Ok(())
}

fn append_text(stack: &mut [Node], text: &str, source: &str) -> Result<()> {
    let text = text.trim_matches(|c: char| c.is_whitespace() || c == '\u{feff}');
    if text.is_empty() {
        return Ok(());
    }
    let Some(node) = stack.last_mut() else {
        return Err(Error::parse(source, "text outside the root element"));
    };
    match &mut node.text {
        None => node.text = Some(text.to_string()),
        // text after a child element is a separate text node; only the first is kept
        Some(_) if !node.children.is_empty() => {}
        Some(existing) => {
            existing.push(' ');
            existing.push_str(text);
        }
    }
    Ok(())
}

fn parent_dir(path: &Path) -> PathBuf {
    path.parent().map_or_else(|| PathBuf::from("."), Path::to_path_buf)
}

fn canonical(path: &Path) -> PathBuf {
    path.canonicalize().unwrap_or_else(|_| path.to_path_buf())
}

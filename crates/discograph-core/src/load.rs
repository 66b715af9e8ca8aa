//! Catalog loaders for the JSON and XML serializations.
//!
//! Both loaders read the whole file into memory before parsing, so the file
//! handle is released before any parse error can surface. Schema conformance
//! is not checked here; see the pipeline crate's validators for that.

use std::fmt;
use std::path::Path;

use roxmltree::{Document, Node, ParsingOptions};
use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::model::album::UNTITLED;
use crate::model::{parse_clock, Album, Catalog, Composition};

/// The serialization a catalog is stored in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CatalogFormat {
    Json,
    Xml,
}

impl CatalogFormat {
    /// Detect the format from a file extension.
    pub fn from_extension(ext: &str) -> Option<Self> {
        match ext.to_lowercase().as_str() {
            "json" => Some(Self::Json),
            "xml" => Some(Self::Xml),
            _ => None,
        }
    }

    pub fn from_path(path: &Path) -> Option<Self> {
        path.extension()
            .and_then(|ext| Self::from_extension(&ext.to_string_lossy()))
    }
}

impl fmt::Display for CatalogFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Json => write!(f, "JSON"),
            Self::Xml => write!(f, "XML"),
        }
    }
}

impl Catalog {
    /// Load a catalog, picking the loader from the file extension.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        match CatalogFormat::from_path(path) {
            Some(CatalogFormat::Json) => load_json(path),
            Some(CatalogFormat::Xml) => load_xml(path),
            None => Err(Error::InvalidData(format!(
                "cannot tell the catalog format of {} (expected .json or .xml)",
                path.display()
            ))),
        }
    }

    /// Parse a catalog from a JSON array of album objects.
    pub fn from_json_str(text: &str) -> Result<Self> {
        let catalog: Self = serde_json::from_str(text)
            .map_err(|e| Error::parse(CatalogFormat::Json, e.to_string()))?;
        check_titles(&catalog, CatalogFormat::Json)?;
        Ok(catalog)
    }

    /// Parse a catalog from an `<albums>` XML document.
    ///
    /// An internal or external DOCTYPE is tolerated so the same file can be
    /// checked against a DTD.
    pub fn from_xml_str(text: &str) -> Result<Self> {
        let options = ParsingOptions {
            allow_dtd: true,
            ..ParsingOptions::default()
        };
        let doc = Document::parse_with_options(text, options)
            .map_err(|e| Error::parse(CatalogFormat::Xml, e.to_string()))?;
        let catalog = catalog_from_document(&doc)?;
        check_titles(&catalog, CatalogFormat::Xml)?;
        Ok(catalog)
    }
}

/// Load a JSON catalog from disk.
pub fn load_json(path: impl AsRef<Path>) -> Result<Catalog> {
    let path = path.as_ref();
    let text = read_source(path)?;
    let catalog = Catalog::from_json_str(&text)?;
    log::debug!("Loaded {} albums from {}", catalog.len(), path.display());
    Ok(catalog)
}

/// Load an XML catalog from disk.
pub fn load_xml(path: impl AsRef<Path>) -> Result<Catalog> {
    let path = path.as_ref();
    let text = read_source(path)?;
    let catalog = Catalog::from_xml_str(&text)?;
    log::debug!("Loaded {} albums from {}", catalog.len(), path.display());
    Ok(catalog)
}

fn read_source(path: &Path) -> Result<String> {
    std::fs::read_to_string(path).map_err(|e| {
        if e.kind() == std::io::ErrorKind::NotFound {
            Error::NotFound {
                path: path.to_path_buf(),
            }
        } else {
            Error::Io(e)
        }
    })
}

fn check_titles(catalog: &Catalog, format: CatalogFormat) -> Result<()> {
    match catalog
        .iter()
        .position(|album| album.title.trim().is_empty())
    {
        Some(index) => Err(Error::parse(
            format,
            format!("album #{} has an empty title", index + 1),
        )),
        None => Ok(()),
    }
}

// ---------------------------------------------------------------------------
// XML mapping
// ---------------------------------------------------------------------------

fn catalog_from_document(doc: &Document<'_>) -> Result<Catalog> {
    let root = doc.root_element();
    if !root.has_tag_name("albums") {
        return Err(xml_error(
            doc,
            root,
            format!("expected <albums> root, found <{}>", root.tag_name().name()),
        ));
    }

    children(root, "album")
        .map(|node| album_from_node(doc, node))
        .collect::<Result<Vec<_>>>()
        .map(Catalog::new)
}

fn album_from_node(doc: &Document<'_>, node: Node<'_, '_>) -> Result<Album> {
    let title = child_text(node, "title")
        .ok_or_else(|| xml_error(doc, node, "<album> has no <title>"))?;

    let artists: Vec<String> = child(node, "artists")
        .map(|list| children(list, "artist").map(node_text).collect())
        .unwrap_or_default();

    let genres: Vec<String> = child(node, "genres")
        .map(|list| children(list, "genre").map(node_text).collect())
        .unwrap_or_default();

    let compositions = match child(node, "compositions") {
        Some(list) => children(list, "composition")
            .map(|comp| composition_from_node(doc, comp))
            .collect::<Result<Vec<_>>>()?,
        None => Vec::new(),
    };

    Ok(Album {
        title,
        artists,
        genres,
        compositions,
    })
}

fn composition_from_node(doc: &Document<'_>, node: Node<'_, '_>) -> Result<Composition> {
    let name = child_text(node, "name").unwrap_or_else(|| UNTITLED.to_string());

    let duration_secs = match child(node, "duration") {
        Some(duration) => {
            let text = node_text(duration);
            parse_clock(&text).ok_or_else(|| {
                xml_error(
                    doc,
                    duration,
                    format!("invalid duration {text:?}, expected MM:SS or seconds"),
                )
            })?
        }
        None => 0,
    };

    Ok(Composition {
        name,
        duration_secs,
    })
}

fn children<'a, 'input: 'a>(
    node: Node<'a, 'input>,
    name: &'a str,
) -> impl Iterator<Item = Node<'a, 'input>> + 'a {
    node.children()
        .filter(move |n| n.is_element() && n.has_tag_name(name))
}

fn child<'a, 'input: 'a>(node: Node<'a, 'input>, name: &'a str) -> Option<Node<'a, 'input>> {
    children(node, name).next()
}

fn child_text(node: Node<'_, '_>, name: &str) -> Option<String> {
    child(node, name).map(node_text)
}

/// Concatenated, trimmed text content of an element.
fn node_text(node: Node<'_, '_>) -> String {
    node.descendants()
        .filter(|n| n.is_text())
        .filter_map(|n| n.text())
        .collect::<String>()
        .trim()
        .to_string()
}

fn xml_error(doc: &Document<'_>, node: Node<'_, '_>, message: impl Into<String>) -> Error {
    let pos = doc.text_pos_at(node.range().start);
    Error::parse(
        CatalogFormat::Xml,
        format!("{} at {}:{}", message.into(), pos.row, pos.col),
    )
}

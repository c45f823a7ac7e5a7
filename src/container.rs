//! ZIP container abstraction for OOXML packages.
//!
//! The container reads parts out of the package and writes a new package in
//! which selected parts are replaced. Entries that are not replaced are
//! raw-copied, so their compressed bytes survive unchanged.

use crate::error::{Error, Result};
use crate::xml::XmlTree;
use std::cell::RefCell;
use std::collections::HashMap;
use std::io::{Cursor, Read, Write};
use std::path::Path;
use zip::write::SimpleFileOptions;
use zip::{CompressionMethod, ZipArchive, ZipWriter};

/// Relationship type of the package's main part.
const OFFICE_DOCUMENT_REL: &str =
    "http://schemas.openxmlformats.org/officeDocument/2006/relationships/officeDocument";

/// Strict-conformance spelling of [`OFFICE_DOCUMENT_REL`].
const OFFICE_DOCUMENT_REL_STRICT: &str =
    "http://purl.oclc.org/ooxml/officeDocument/relationships/officeDocument";

/// Package-level relationships part.
const PACKAGE_RELS: &str = "_rels/.rels";

/// Main document part used when the package relationships don't name one.
pub const DEFAULT_MAIN_PART: &str = "word/document.xml";

/// A relationship entry from a `.rels` part.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Relationship {
    /// Relationship ID (e.g., "rId1")
    pub id: String,
    /// Relationship type URI
    pub rel_type: String,
    /// Target path (relative or absolute)
    pub target: String,
    /// Whether the target lives outside the package
    pub external: bool,
}

/// Relationships of one part, in declaration order.
#[derive(Debug, Clone, Default)]
pub struct Relationships {
    entries: Vec<Relationship>,
}

impl Relationships {
    /// Parse a `.rels` part. Entries without an `Id` are dropped.
    pub fn parse(xml: &str) -> Result<Self> {
        if xml.trim().is_empty() {
            return Ok(Self::default());
        }

        let tree = XmlTree::parse(xml)?;
        let entries = tree
            .root()
            .into_iter()
            .flat_map(|root| root.elements_named("Relationship"))
            .filter_map(|el| {
                Some(Relationship {
                    id: el.attr("Id").filter(|id| !id.is_empty())?,
                    rel_type: el.attr("Type").unwrap_or_default(),
                    target: el.attr("Target").unwrap_or_default(),
                    external: el
                        .attr("TargetMode")
                        .is_some_and(|mode| mode.eq_ignore_ascii_case("external")),
                })
            })
            .collect();

        Ok(Self { entries })
    }

    /// Get a relationship by ID.
    pub fn get(&self, id: &str) -> Option<&Relationship> {
        self.entries.iter().find(|rel| rel.id == id)
    }

    /// Relationships of one type.
    pub fn of_type<'a>(&'a self, rel_type: &'a str) -> impl Iterator<Item = &'a Relationship> + 'a {
        self.entries.iter().filter(move |rel| rel.rel_type == rel_type)
    }

    /// Get the number of relationships.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Check if there are no relationships.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Rewrite a UTF-16 encoding declaration to UTF-8.
///
/// Parts decoded from UTF-16 are held and written back as UTF-8, so the
/// declaration has to agree with the bytes that follow it.
fn fix_xml_encoding_declaration(content: &str) -> String {
    if !content.starts_with("<?xml") {
        return content.to_string();
    }
    let Some(end_decl) = content.find("?>") else {
        return content.to_string();
    };

    let (decl, rest) = content.split_at(end_decl + 2);
    let fixed = ["\"UTF-16\"", "'UTF-16'", "\"utf-16\"", "'utf-16'"]
        .iter()
        .fold(decl.to_string(), |acc, quoted| {
            acc.replace(&format!("encoding={}", quoted), "encoding=\"UTF-8\"")
        });

    format!("{}{}", fixed, rest)
}

/// Decode XML bytes handling different encodings (UTF-8, UTF-16 LE/BE).
///
/// Most packages are UTF-8, but Word accepts UTF-16 parts with or without a
/// byte order mark.
pub fn decode_xml_bytes(bytes: &[u8]) -> Result<String> {
    match bytes {
        [0xEF, 0xBB, 0xBF, rest @ ..] => String::from_utf8(rest.to_vec())
            .map_err(|e| Error::XmlParse(format!("part is not valid UTF-8: {}", e))),
        [0xFF, 0xFE, rest @ ..] => decode_utf16(rest, u16::from_le_bytes)
            .map(|s| fix_xml_encoding_declaration(&s)),
        [0xFE, 0xFF, rest @ ..] => decode_utf16(rest, u16::from_be_bytes)
            .map(|s| fix_xml_encoding_declaration(&s)),
        _ => match String::from_utf8(bytes.to_vec()) {
            Ok(s) => Ok(s),
            // ASCII markup in UTF-16 leaves every other byte zero
            Err(_) if bytes.len() >= 4 && bytes[1] == 0 && bytes[3] == 0 => {
                decode_utf16(bytes, u16::from_le_bytes).map(|s| fix_xml_encoding_declaration(&s))
            }
            Err(_) if bytes.len() >= 4 && bytes[0] == 0 && bytes[2] == 0 => {
                decode_utf16(bytes, u16::from_be_bytes).map(|s| fix_xml_encoding_declaration(&s))
            }
            Err(_) => Err(Error::XmlParse(
                "part is not valid UTF-8 or UTF-16".to_string(),
            )),
        },
    }
}

/// Decode UTF-16 code units with the given byte order.
fn decode_utf16(bytes: &[u8], unit: fn([u8; 2]) -> u16) -> Result<String> {
    let units = bytes.chunks_exact(2).map(|pair| unit([pair[0], pair[1]]));

    char::decode_utf16(units)
        .collect::<std::result::Result<String, _>>()
        .map_err(|e| Error::XmlParse(format!("part is not valid UTF-16: {}", e)))
}

/// OOXML container abstraction over a ZIP archive.
pub struct OoxmlContainer {
    archive: RefCell<ZipArchive<Cursor<Vec<u8>>>>,
}

impl OoxmlContainer {
    /// Create an OOXML container from a byte vector.
    pub fn from_bytes(data: Vec<u8>) -> Result<Self> {
        let archive = ZipArchive::new(Cursor::new(data))?;
        Ok(Self {
            archive: RefCell::new(archive),
        })
    }

    /// Read an XML part from the archive as a string.
    ///
    /// UTF-16 parts are converted to UTF-8.
    pub fn read_xml(&self, path: &str) -> Result<String> {
        let bytes = self.read_binary(path)?;
        decode_xml_bytes(&bytes)
    }

    /// Read a binary part from the archive.
    pub fn read_binary(&self, path: &str) -> Result<Vec<u8>> {
        let mut archive = self.archive.borrow_mut();
        let mut file = archive
            .by_name(path)
            .map_err(|_| Error::MissingComponent(path.to_string()))?;
        let mut data = Vec::new();
        file.read_to_end(&mut data)?;
        Ok(data)
    }

    /// Check if a part exists in the archive.
    pub fn exists(&self, path: &str) -> bool {
        let archive = self.archive.borrow();
        let found = archive.file_names().any(|n| n == path);
        found
    }

    /// List all entries in the archive, in archive order.
    pub fn list_files(&self) -> Vec<String> {
        let mut archive = self.archive.borrow_mut();
        (0..archive.len())
            .filter_map(|i| archive.by_index_raw(i).ok().map(|f| f.name().to_string()))
            .collect()
    }

    /// Read package-level relationships (_rels/.rels).
    ///
    /// A package without the part has no relationships.
    pub fn read_package_relationships(&self) -> Result<Relationships> {
        if !self.exists(PACKAGE_RELS) {
            return Ok(Relationships::default());
        }
        Relationships::parse(&self.read_xml(PACKAGE_RELS)?)
    }

    /// Locate the main document part.
    ///
    /// Follows the package's `officeDocument` relationship and falls back to
    /// [`DEFAULT_MAIN_PART`] when the relationship is absent or dangling.
    pub fn main_document_path(&self) -> Result<String> {
        let rels = self.read_package_relationships()?;
        let target = [OFFICE_DOCUMENT_REL, OFFICE_DOCUMENT_REL_STRICT]
            .iter()
            .flat_map(|rel_type| rels.of_type(rel_type))
            .find(|rel| !rel.external)
            .map(|rel| Self::resolve_path("", &rel.target))
            .filter(|path| self.exists(path));

        Ok(target.unwrap_or_else(|| DEFAULT_MAIN_PART.to_string()))
    }

    /// Write a new package with some parts replaced.
    ///
    /// Entries keep their original order. Replaced parts are compressed with
    /// their original method when it is `Stored`, and deflated otherwise; all
    /// other entries are copied without recompression.
    pub fn repackage(&self, replacements: &HashMap<String, Vec<u8>>) -> Result<Vec<u8>> {
        let mut archive = self.archive.borrow_mut();
        let mut writer = ZipWriter::new(Cursor::new(Vec::new()));

        for index in 0..archive.len() {
            let file = archive.by_index_raw(index)?;
            let Some(data) = replacements.get(file.name()) else {
                writer.raw_copy_file(file)?;
                continue;
            };

            let method = match file.compression() {
                CompressionMethod::Stored => CompressionMethod::Stored,
                _ => CompressionMethod::Deflated,
            };
            let name = file.name().to_string();
            drop(file);

            writer.start_file(name, SimpleFileOptions::default().compression_method(method))?;
            writer.write_all(data)?;
        }

        Ok(writer.finish()?.into_inner())
    }

    /// Resolve a relative path from a base path.
    pub fn resolve_path(base: &str, relative: &str) -> String {
        if let Some(stripped) = relative.strip_prefix('/') {
            return stripped.to_string();
        }

        let base_dir = Path::new(base).parent().unwrap_or(Path::new(""));

        let mut result = base_dir.to_path_buf();
        for component in Path::new(relative).components() {
            match component {
                std::path::Component::ParentDir => {
                    result.pop();
                }
                std::path::Component::Normal(c) => {
                    result.push(c);
                }
                _ => {}
            }
        }

        result.to_string_lossy().replace('\\', "/")
    }
}

impl std::fmt::Debug for OoxmlContainer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("OoxmlContainer")
            .field("files", &self.archive.borrow().len())
            .finish()
    }
}

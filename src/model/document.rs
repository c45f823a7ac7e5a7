//! Word document loaded for editing.

use super::{Table, TableMut, W_BODY, W_DOCUMENT, W_TBL};
use crate::container::OoxmlContainer;
use crate::detect::{detect_format_from_bytes, FormatType};
use crate::error::{Error, Result};
use crate::xml::{Element, XmlTree};
use std::collections::HashMap;
use std::path::Path;
use tracing::debug;

/// A Word document opened from a package.
///
/// The document owns its package and a parsed copy of the main document
/// part. Edits go to that copy; [`Document::to_bytes`] writes a new package
/// in which only the main part differs from the input.
#[derive(Debug)]
pub struct Document {
    container: OoxmlContainer,
    main_part: String,
    tree: XmlTree,
}

impl Document {
    /// Open a `.docx` file.
    ///
    /// # Example
    ///
    /// ```no_run
    /// use rowsize::Document;
    ///
    /// let doc = Document::open("questions.docx")?;
    /// println!("Tables: {}", doc.table_count());
    /// # Ok::<(), rowsize::Error>(())
    /// ```
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        let data = std::fs::read(path.as_ref())?;
        Self::from_bytes(&data)
    }

    /// Load a document from the bytes of a `.docx` package.
    ///
    /// Fails if the bytes are not a ZIP package, the package is another
    /// Office format, or the main part is missing or not well-formed.
    pub fn from_bytes(data: &[u8]) -> Result<Self> {
        match detect_format_from_bytes(data)? {
            FormatType::Docx => {}
            other => return Err(Error::UnsupportedFormat(other.name().to_string())),
        }

        let container = OoxmlContainer::from_bytes(data.to_vec())?;
        let main_part = container.main_document_path()?;
        let xml = container.read_xml(&main_part)?;
        let tree = XmlTree::parse(&xml)?;

        let has_body = tree
            .root()
            .is_some_and(|root| root.is(W_DOCUMENT) && root.child(W_BODY).is_some());
        if !has_body {
            return Err(Error::MissingComponent(format!("{} body", main_part)));
        }

        debug!(part = %main_part, bytes = xml.len(), "loaded main document part");

        Ok(Self {
            container,
            main_part,
            tree,
        })
    }

    /// Path of the main document part inside the package.
    pub fn main_part(&self) -> &str {
        &self.main_part
    }

    fn body(&self) -> Option<&Element> {
        self.tree.root().and_then(|root| root.child(W_BODY))
    }

    fn body_mut(&mut self) -> Option<&mut Element> {
        self.tree.root_mut().and_then(|root| root.child_mut(W_BODY))
    }

    /// Tables directly inside the document body, in document order.
    ///
    /// Tables nested inside cells belong to their cell and are not listed.
    pub fn tables(&self) -> impl Iterator<Item = Table<'_>> + '_ {
        self.body()
            .into_iter()
            .flat_map(|body| body.elements_named(W_TBL))
            .map(Table::new)
    }

    /// Mutable body tables, in document order.
    pub fn tables_mut(&mut self) -> impl Iterator<Item = TableMut<'_>> + '_ {
        self.body_mut()
            .into_iter()
            .flat_map(|body| body.elements_named_mut(W_TBL))
            .map(TableMut::new)
    }

    /// Get the number of body tables.
    pub fn table_count(&self) -> usize {
        self.tables().count()
    }

    /// Serialize the document into a new `.docx` package.
    pub fn to_bytes(&self) -> Result<Vec<u8>> {
        let mut parts = HashMap::new();
        parts.insert(self.main_part.clone(), self.tree.to_bytes()?);
        self.container.repackage(&parts)
    }

    /// Serialize the document to a file.
    pub fn save(&self, path: impl AsRef<Path>) -> Result<()> {
        std::fs::write(path.as_ref(), self.to_bytes()?)?;
        Ok(())
    }
}

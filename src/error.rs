//! Error types for the rowsize library.

use std::io;
use thiserror::Error;

/// Result type alias for rowsize operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur while loading, rewriting or saving a document.
///
/// Every variant aborts the whole transformation; rows that merely lack a
/// content cell are reported through
/// [`TransformReport::skipped`](crate::TransformReport::skipped) instead.
#[derive(Error, Debug)]
pub enum Error {
    /// I/O error during file operations.
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// The input is not an Office Open XML package.
    #[error("Unknown file format")]
    UnknownFormat,

    /// The package is an Office document, but not a Word document.
    #[error("Unsupported format: {0}")]
    UnsupportedFormat(String),

    /// Error reading or writing the ZIP archive.
    #[error("ZIP archive error: {0}")]
    ZipArchive(String),

    /// Error parsing or writing XML content.
    #[error("XML parse error: {0}")]
    XmlParse(String),

    /// Invalid or malformed data in the document or rule set.
    #[error("Invalid data: {0}")]
    InvalidData(String),

    /// A required document component is missing.
    #[error("Missing component: {0}")]
    MissingComponent(String),
}

impl From<zip::result::ZipError> for Error {
    fn from(err: zip::result::ZipError) -> Self {
        Error::ZipArchive(err.to_string())
    }
}

impl From<quick_xml::Error> for Error {
    fn from(err: quick_xml::Error) -> Self {
        Error::XmlParse(err.to_string())
    }
}

impl From<serde_json::Error> for Error {
    fn from(err: serde_json::Error) -> Self {
        Error::InvalidData(err.to_string())
    }
}

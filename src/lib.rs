//! # rowsize
//!
//! Label-driven font sizing for tables in Word documents.
//!
//! Question banks are often kept as `.docx` files in which every table row
//! carries a label in its first column (`Question`, `Option`, `Solution`)
//! and the content in its second. This library rewrites the font size of
//! the content cell according to the label and returns a new package. Every
//! other part of the package is carried over unchanged.
//!
//! ## Quick Start
//!
//! ```no_run
//! // Default rules: Question → 14pt, Option → 12pt, Solution → 12pt
//! let input = std::fs::read("questions.docx")?;
//! let output = rowsize::transform_bytes(&input)?;
//! std::fs::write("modified_questions.docx", output)?;
//! # Ok::<(), rowsize::Error>(())
//! ```
//!
//! ## Custom Rules
//!
//! ```no_run
//! use rowsize::{FontSize, RuleSet};
//!
//! let rules = RuleSet::default().with_rule("Hint", FontSize::from_points(10.0)?);
//! let report = rowsize::transform_file("in.docx", "out.docx", &rules)?;
//! println!("Resized {} rows", report.resized_rows);
//! # Ok::<(), rowsize::Error>(())
//! ```
//!
//! ## Features
//!
//! - `async`: [`transform_bytes_async`] runs a transformation on Tokio's
//!   blocking pool.

pub mod container;
pub mod detect;
pub mod error;
pub mod model;
pub mod rules;
pub mod transform;
pub mod xml;

// Re-exports
pub use container::{OoxmlContainer, Relationship, Relationships};
pub use detect::{detect_format_from_bytes, is_docx_mime_type, FormatType, DOCX_MIME_TYPE};
pub use error::{Error, Result};
pub use model::{Cell, CellMut, Document, FontSize, Paragraph, Row, RowMut, Run, Table, TableMut};
pub use rules::RuleSet;
pub use transform::{SkipReason, SkippedRow, TransformReport, Transformer};

use std::path::Path;

/// Prefix added to the name of a transformed file.
pub const OUTPUT_PREFIX: &str = "modified_";

/// Transform a `.docx` package with the default rules.
///
/// # Example
///
/// ```no_run
/// let input = std::fs::read("questions.docx")?;
/// let output = rowsize::transform_bytes(&input)?;
/// # Ok::<(), rowsize::Error>(())
/// ```
pub fn transform_bytes(data: &[u8]) -> Result<Vec<u8>> {
    Transformer::default().transform(data)
}

/// Transform a `.docx` file into another file.
///
/// The output file is only written when the transformation succeeded.
pub fn transform_file(
    input: impl AsRef<Path>,
    output: impl AsRef<Path>,
    rules: &RuleSet,
) -> Result<TransformReport> {
    let data = std::fs::read(input.as_ref())?;
    let (bytes, report) = Transformer::new(rules.clone()).transform_with_report(&data)?;
    std::fs::write(output.as_ref(), bytes)?;
    Ok(report)
}

/// Transform a `.docx` package on Tokio's blocking pool.
///
/// # Example
///
/// ```no_run
/// use std::sync::Arc;
/// use rowsize::Transformer;
///
/// # async fn run(data: Vec<u8>) -> rowsize::Result<()> {
/// let transformer = Arc::new(Transformer::default());
/// let (output, report) = rowsize::transform_bytes_async(data, transformer).await?;
/// # Ok(())
/// # }
/// ```
#[cfg(feature = "async")]
pub async fn transform_bytes_async(
    data: Vec<u8>,
    transformer: std::sync::Arc<Transformer>,
) -> Result<(Vec<u8>, TransformReport)> {
    tokio::task::spawn_blocking(move || transformer.transform_with_report(&data))
        .await
        .map_err(|e| Error::Io(std::io::Error::other(e)))?
}

/// Name for a transformed file: the original name with [`OUTPUT_PREFIX`].
///
/// Any directory part of the original name is dropped. A missing or empty
/// name becomes `modified_document.docx`.
pub fn modified_file_name(original: Option<&str>) -> String {
    let name = original
        .map(|n| n.rsplit(['/', '\\']).next().unwrap_or(n).trim())
        .filter(|n| !n.is_empty())
        .unwrap_or("document.docx");
    format!("{}{}", OUTPUT_PREFIX, name)
}

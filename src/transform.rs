//! Row-labeled font sizing of document tables.

use crate::error::Result;
use crate::model::Document;
use crate::rules::RuleSet;
use serde::Serialize;
use std::collections::BTreeMap;
use tracing::{debug, info, warn};

/// Why a labeled row was left unmodified.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SkipReason {
    /// The label matched a rule but the row has no second cell to resize.
    MalformedRow,
}

/// A row that matched a rule but could not be resized.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SkippedRow {
    /// Body table index (0-based)
    pub table: usize,
    /// Row index within the table (0-based)
    pub row: usize,
    /// The row's label
    pub label: String,
    /// Why the row was skipped
    pub reason: SkipReason,
}

/// Summary of one transformation.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct TransformReport {
    /// Body tables visited
    pub tables: usize,
    /// Rows visited across all tables
    pub rows: usize,
    /// Rows whose content cell was resized
    pub resized_rows: usize,
    /// Runs whose font size was set
    pub resized_runs: usize,
    /// Resized rows per label
    pub by_label: BTreeMap<String, usize>,
    /// Labeled rows that could not be resized
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub skipped: Vec<SkippedRow>,
}

/// Applies a [`RuleSet`] to the tables of a document.
///
/// A transformer holds no per-document state and can be shared between
/// threads.
///
/// # Example
///
/// ```no_run
/// use rowsize::{RuleSet, Transformer};
///
/// let input = std::fs::read("questions.docx")?;
/// let transformer = Transformer::new(RuleSet::default());
/// let (output, report) = transformer.transform_with_report(&input)?;
/// println!("Resized {} rows", report.resized_rows);
/// std::fs::write("modified_questions.docx", output)?;
/// # Ok::<(), rowsize::Error>(())
/// ```
#[derive(Debug, Clone, Default)]
pub struct Transformer {
    rules: RuleSet,
}

impl Transformer {
    /// Create a transformer with the given rules.
    pub fn new(rules: RuleSet) -> Self {
        Self { rules }
    }

    /// The rules this transformer applies.
    pub fn rules(&self) -> &RuleSet {
        &self.rules
    }

    /// Transform a `.docx` package and return the new package.
    pub fn transform(&self, data: &[u8]) -> Result<Vec<u8>> {
        self.transform_with_report(data).map(|(output, _)| output)
    }

    /// Transform a `.docx` package and report what changed.
    ///
    /// Nothing is returned unless the whole package was read and written.
    pub fn transform_with_report(&self, data: &[u8]) -> Result<(Vec<u8>, TransformReport)> {
        let mut doc = Document::from_bytes(data)?;
        let report = self.apply(&mut doc);
        let output = doc.to_bytes()?;
        Ok((output, report))
    }

    /// Apply the rules to an open document.
    ///
    /// For every row of every body table, the trimmed text of the first cell
    /// is looked up in the rules; on a match, every run of the second cell
    /// gets the rule's size. Rows without a second cell are skipped and
    /// reported.
    pub fn apply(&self, doc: &mut Document) -> TransformReport {
        let mut report = TransformReport::default();
        info!(tables = doc.table_count(), "document opened");

        for (table_index, mut table) in doc.tables_mut().enumerate() {
            report.tables += 1;
            debug!(table = table_index, rows = table.as_table().row_count(), "processing table");

            for (row_index, mut row) in table.rows_mut().enumerate() {
                report.rows += 1;

                let Some(label) = row.as_row().label() else {
                    continue;
                };
                let Some(size) = self.rules.size_for(&label) else {
                    continue;
                };

                match row.cell_mut(1) {
                    Some(mut cell) => {
                        let runs = cell.set_font_size(size);
                        debug!(table = table_index, row = row_index, %label, %size, runs, "resized row");
                        report.resized_rows += 1;
                        report.resized_runs += runs;
                        *report.by_label.entry(label).or_default() += 1;
                    }
                    None => {
                        warn!(table = table_index, row = row_index, %label, "row has no content cell, skipping");
                        report.skipped.push(SkippedRow {
                            table: table_index,
                            row: row_index,
                            label,
                            reason: SkipReason::MalformedRow,
                        });
                    }
                }
            }
        }

        info!(
            rows = report.resized_rows,
            runs = report.resized_runs,
            skipped = report.skipped.len(),
            "applied font size rules"
        );
        report
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Error;

    #[test]
    fn test_rejects_non_package() {
        let transformer = Transformer::default();
        let result = transformer.transform(b"definitely not a docx");
        assert!(matches!(result, Err(Error::UnknownFormat)));
    }

    #[test]
    fn test_report_serializes_without_empty_skips() {
        let report = TransformReport {
            tables: 1,
            rows: 2,
            resized_rows: 1,
            resized_runs: 3,
            by_label: BTreeMap::from([("Question".to_string(), 1)]),
            skipped: Vec::new(),
        };
        let json = serde_json::to_value(&report).unwrap();
        assert_eq!(json["by_label"]["Question"], 1);
        assert!(json.get("skipped").is_none());
    }

    #[test]
    fn test_skip_reason_name() {
        let json = serde_json::to_string(&SkipReason::MalformedRow).unwrap();
        assert_eq!(json, "\"malformed_row\"");
    }
}

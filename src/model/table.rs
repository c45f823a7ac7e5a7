//! Table, row and cell views.

use super::paragraph::{collect_runs_mut, set_run_font_size};
use super::{FontSize, Paragraph, Run, W_P, W_TC, W_TR};
use crate::xml::Element;

/// A table (`w:tbl`).
#[derive(Debug, Clone, Copy)]
pub struct Table<'a> {
    el: &'a Element,
}

impl<'a> Table<'a> {
    pub(crate) fn new(el: &'a Element) -> Self {
        Self { el }
    }

    /// Rows in document order.
    pub fn rows(&self) -> impl Iterator<Item = Row<'a>> + 'a {
        self.el.elements_named(W_TR).map(|el| Row { el })
    }

    /// Get the number of rows.
    pub fn row_count(&self) -> usize {
        self.rows().count()
    }

    /// Get the number of columns (maximum cells in any row).
    pub fn column_count(&self) -> usize {
        self.rows().map(|r| r.cell_count()).max().unwrap_or(0)
    }
}

/// A table row (`w:tr`).
#[derive(Debug, Clone, Copy)]
pub struct Row<'a> {
    el: &'a Element,
}

impl<'a> Row<'a> {
    /// Cells in document order.
    pub fn cells(&self) -> impl Iterator<Item = Cell<'a>> + 'a {
        self.el.elements_named(W_TC).map(|el| Cell { el })
    }

    /// Cell at a position.
    pub fn cell(&self, index: usize) -> Option<Cell<'a>> {
        self.cells().nth(index)
    }

    /// Get the number of cells.
    pub fn cell_count(&self) -> usize {
        self.cells().count()
    }

    /// The row's classification key: the first cell's text, trimmed.
    ///
    /// `None` for a row without cells.
    pub fn label(&self) -> Option<String> {
        self.cell(0).map(|c| c.plain_text().trim().to_string())
    }
}

/// A table cell (`w:tc`).
#[derive(Debug, Clone, Copy)]
pub struct Cell<'a> {
    el: &'a Element,
}

impl<'a> Cell<'a> {
    /// Paragraphs directly inside the cell.
    pub fn paragraphs(&self) -> impl Iterator<Item = Paragraph<'a>> + 'a {
        self.el.elements_named(W_P).map(Paragraph::new)
    }

    /// Runs of every paragraph, in order.
    pub fn runs(&self) -> Vec<Run<'a>> {
        self.paragraphs().flat_map(|p| p.runs()).collect()
    }

    /// Paragraph texts joined with newlines.
    pub fn plain_text(&self) -> String {
        self.paragraphs()
            .map(|p| p.plain_text())
            .collect::<Vec<_>>()
            .join("\n")
    }
}

/// Mutable table view.
#[derive(Debug)]
pub struct TableMut<'a> {
    el: &'a mut Element,
}

impl<'a> TableMut<'a> {
    pub(crate) fn new(el: &'a mut Element) -> Self {
        Self { el }
    }

    /// Read-only view of the same table.
    pub fn as_table(&self) -> Table<'_> {
        Table::new(&*self.el)
    }

    /// Mutable rows in document order.
    pub fn rows_mut(&mut self) -> impl Iterator<Item = RowMut<'_>> + '_ {
        self.el.elements_named_mut(W_TR).map(|el| RowMut { el })
    }
}

/// Mutable row view.
#[derive(Debug)]
pub struct RowMut<'a> {
    el: &'a mut Element,
}

impl RowMut<'_> {
    /// Read-only view of the same row.
    pub fn as_row(&self) -> Row<'_> {
        Row { el: &*self.el }
    }

    /// Mutable cell at a position.
    pub fn cell_mut(&mut self, index: usize) -> Option<CellMut<'_>> {
        self.el
            .elements_named_mut(W_TC)
            .nth(index)
            .map(|el| CellMut { el })
    }
}

/// Mutable cell view.
#[derive(Debug)]
pub struct CellMut<'a> {
    el: &'a mut Element,
}

impl CellMut<'_> {
    /// Read-only view of the same cell.
    pub fn as_cell(&self) -> Cell<'_> {
        Cell { el: &*self.el }
    }

    /// Set the font size of every run in every paragraph of the cell.
    ///
    /// Returns the number of runs visited. Paragraph mark properties and
    /// nested tables are not touched.
    pub fn set_font_size(&mut self, size: FontSize) -> usize {
        let mut runs = Vec::new();
        for paragraph in self.el.elements_named_mut(W_P) {
            collect_runs_mut(paragraph, &mut runs);
        }

        for run in &mut runs {
            set_run_font_size(run, size);
        }
        runs.len()
    }
}

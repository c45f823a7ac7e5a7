//! WordprocessingML table model.
//!
//! The model is a set of typed views over the owned XML tree of the main
//! document part. Read views (`Table`, `Row`, `Cell`, `Paragraph`, `Run`)
//! borrow the tree; the `*Mut` views borrow it mutably and are the only way
//! run formatting gets rewritten.

mod document;
mod paragraph;
mod table;

pub use document::*;
pub use paragraph::*;
pub use table::*;

pub(crate) const W_DOCUMENT: &str = "w:document";
pub(crate) const W_BODY: &str = "w:body";
pub(crate) const W_TBL: &str = "w:tbl";
pub(crate) const W_TR: &str = "w:tr";
pub(crate) const W_TC: &str = "w:tc";
pub(crate) const W_P: &str = "w:p";
pub(crate) const W_R: &str = "w:r";
pub(crate) const W_RPR: &str = "w:rPr";
pub(crate) const W_SZ: &str = "w:sz";
pub(crate) const W_VAL: &str = "w:val";

//! Paragraph and text run views, and font sizes.

use super::{W_R, W_RPR, W_SZ, W_VAL};
use crate::error::{Error, Result};
use crate::xml::Element;
use serde::{Deserialize, Serialize};

/// Largest size Word accepts in `w:sz`, in half-points.
pub const MAX_HALF_POINTS: u32 = 3276;

/// Elements that wrap runs inside a paragraph without being runs themselves.
const RUN_CONTAINERS: &[&str] = &[
    "w:hyperlink",
    "w:ins",
    "w:moveTo",
    "w:smartTag",
    "w:fldSimple",
    "w:customXml",
    "w:sdt",
    "w:sdtContent",
];

/// Elements that follow `w:sz` inside `w:rPr` in schema order.
const SZ_SUCCESSORS: &[&str] = &[
    "w:szCs",
    "w:highlight",
    "w:u",
    "w:effect",
    "w:bdr",
    "w:shd",
    "w:fitText",
    "w:vertAlign",
    "w:rtl",
    "w:cs",
    "w:em",
    "w:lang",
    "w:eastAsianLayout",
    "w:specVanish",
    "w:oMath",
    "w:rPrChange",
];

/// A font size, stored in half-points as WordprocessingML does.
///
/// Serializes as a number of points.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "f32", into = "f32")]
pub struct FontSize {
    half_points: u32,
}

impl FontSize {
    /// Create a size from half-points, the unit of `w:sz/@w:val`.
    pub const fn from_half_points(half_points: u32) -> Self {
        Self { half_points }
    }

    /// Create a size from points, rounding to the nearest half point.
    pub fn from_points(points: f32) -> Result<Self> {
        let half_points = (points * 2.0).round();
        if !points.is_finite() || half_points < 1.0 || half_points > MAX_HALF_POINTS as f32 {
            return Err(Error::InvalidData(format!(
                "font size {} is outside 0.5..=1638 points",
                points
            )));
        }
        Ok(Self {
            half_points: half_points as u32,
        })
    }

    /// Size in half-points.
    pub fn half_points(self) -> u32 {
        self.half_points
    }

    /// Size in points.
    pub fn points(self) -> f32 {
        self.half_points as f32 / 2.0
    }

    /// Parse a `w:sz/@w:val` value: half-points, or a measure in points.
    fn parse_hps(value: &str) -> Option<Self> {
        let value = value.trim();
        if let Ok(half_points) = value.parse::<u32>() {
            return Some(Self::from_half_points(half_points));
        }
        value
            .strip_suffix("pt")
            .and_then(|pt| pt.parse::<f32>().ok())
            .and_then(|pt| Self::from_points(pt).ok())
    }
}

impl TryFrom<f32> for FontSize {
    type Error = Error;

    fn try_from(points: f32) -> Result<Self> {
        Self::from_points(points)
    }
}

impl From<FontSize> for f32 {
    fn from(size: FontSize) -> f32 {
        size.points()
    }
}

impl std::fmt::Display for FontSize {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        if self.half_points % 2 == 0 {
            write!(f, "{}pt", self.half_points / 2)
        } else {
            write!(f, "{:.1}pt", self.points())
        }
    }
}

/// A paragraph (`w:p`).
#[derive(Debug, Clone, Copy)]
pub struct Paragraph<'a> {
    el: &'a Element,
}

impl<'a> Paragraph<'a> {
    pub(crate) fn new(el: &'a Element) -> Self {
        Self { el }
    }

    /// Runs in document order, including runs inside hyperlinks, insertions
    /// and other run containers.
    pub fn runs(&self) -> Vec<Run<'a>> {
        let mut runs = Vec::new();
        collect_runs(self.el, &mut runs);
        runs.into_iter().map(|el| Run { el }).collect()
    }

    /// Paragraph text.
    pub fn plain_text(&self) -> String {
        self.runs().iter().map(Run::text).collect()
    }
}

/// A text run (`w:r`).
#[derive(Debug, Clone, Copy)]
pub struct Run<'a> {
    el: &'a Element,
}

impl Run<'_> {
    /// Run text. Tabs and breaks become `\t` and `\n`.
    pub fn text(&self) -> String {
        let mut text = String::new();
        for child in self.el.elements() {
            match child.name() {
                b"w:t" => text.push_str(&child.text()),
                b"w:tab" | b"w:ptab" => text.push('\t'),
                b"w:br" | b"w:cr" => text.push('\n'),
                b"w:noBreakHyphen" => text.push('-'),
                _ => {}
            }
        }
        text
    }

    /// Directly applied font size, if any.
    pub fn font_size(&self) -> Option<FontSize> {
        self.el
            .child(W_RPR)?
            .child(W_SZ)?
            .attr(W_VAL)
            .and_then(|v| FontSize::parse_hps(&v))
    }
}

fn is_run_container(el: &Element) -> bool {
    RUN_CONTAINERS.iter().any(|name| el.is(name))
}

fn collect_runs<'a>(el: &'a Element, out: &mut Vec<&'a Element>) {
    for child in el.elements() {
        if child.is(W_R) {
            out.push(child);
        } else if is_run_container(child) {
            collect_runs(child, out);
        }
    }
}

pub(crate) fn collect_runs_mut<'a>(el: &'a mut Element, out: &mut Vec<&'a mut Element>) {
    for child in el.elements_mut() {
        if child.is(W_R) {
            out.push(child);
        } else if is_run_container(child) {
            collect_runs_mut(child, out);
        }
    }
}

/// Set `w:rPr/w:sz` on a run, creating `w:rPr` first in the run and `w:sz`
/// at its schema position when missing.
pub(crate) fn set_run_font_size(run: &mut Element, size: FontSize) {
    let rpr_index = match run.child_index(W_RPR) {
        Some(index) => index,
        None => {
            run.insert_element(0, Element::new(W_RPR));
            0
        }
    };
    let Some(rpr) = run.element_at_mut(rpr_index) else {
        return;
    };

    let value = size.half_points().to_string();
    if let Some(sz) = rpr.child_mut(W_SZ) {
        sz.set_attr(W_VAL, &value);
        return;
    }
    let at = rpr.insertion_index(SZ_SUCCESSORS);
    rpr.insert_element(at, Element::new(W_SZ).with_attr(W_VAL, &value));
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::xml::XmlTree;

    fn first_run_xml(xml: &str, size: FontSize) -> String {
        let mut tree = XmlTree::parse(xml).unwrap();
        let run = tree.root_mut().unwrap();
        set_run_font_size(run, size);
        String::from_utf8(tree.to_bytes().unwrap()).unwrap()
    }

    #[test]
    fn test_font_size_conversions() {
        let size = FontSize::from_points(14.0).unwrap();
        assert_eq!(size.half_points(), 28);
        assert_eq!(size.points(), 14.0);
        assert_eq!(size.to_string(), "14pt");
        assert_eq!(FontSize::from_points(10.5).unwrap().to_string(), "10.5pt");
        assert_eq!(FontSize::from_half_points(24), FontSize::from_points(12.0).unwrap());
    }

    #[test]
    fn test_font_size_bounds() {
        assert!(FontSize::from_points(0.0).is_err());
        assert!(FontSize::from_points(-3.0).is_err());
        assert!(FontSize::from_points(f32::NAN).is_err());
        assert!(FontSize::from_points(2000.0).is_err());
        assert!(FontSize::from_points(1638.0).is_ok());
    }

    #[test]
    fn test_parse_hps() {
        assert_eq!(FontSize::parse_hps("28"), Some(FontSize::from_half_points(28)));
        assert_eq!(FontSize::parse_hps("14pt"), Some(FontSize::from_half_points(28)));
        assert_eq!(FontSize::parse_hps("big"), None);
    }

    #[test]
    fn test_set_size_creates_rpr() {
        let out = first_run_xml("<w:r><w:t>x</w:t></w:r>", FontSize::from_half_points(28));
        assert_eq!(out, r#"<w:r><w:rPr><w:sz w:val="28"/></w:rPr><w:t>x</w:t></w:r>"#);
    }

    #[test]
    fn test_set_size_respects_schema_order() {
        let out = first_run_xml(
            "<w:r><w:rPr><w:b/><w:color w:val=\"FF0000\"/><w:u w:val=\"single\"/></w:rPr><w:t>x</w:t></w:r>",
            FontSize::from_half_points(24),
        );
        assert_eq!(
            out,
            r#"<w:r><w:rPr><w:b/><w:color w:val="FF0000"/><w:sz w:val="24"/><w:u w:val="single"/></w:rPr><w:t>x</w:t></w:r>"#
        );
    }

    #[test]
    fn test_set_size_replaces_existing() {
        let out = first_run_xml(
            "<w:r><w:rPr><w:sz w:val=\"20\"/><w:szCs w:val=\"20\"/></w:rPr><w:t>x</w:t></w:r>",
            FontSize::from_half_points(28),
        );
        assert_eq!(
            out,
            r#"<w:r><w:rPr><w:sz w:val="28"/><w:szCs w:val="20"/></w:rPr><w:t>x</w:t></w:r>"#
        );
    }

    #[test]
    fn test_set_size_fills_empty_rpr() {
        let out = first_run_xml("<w:r><w:rPr/><w:t>x</w:t></w:r>", FontSize::from_half_points(24));
        assert_eq!(out, r#"<w:r><w:rPr><w:sz w:val="24"/></w:rPr><w:t>x</w:t></w:r>"#);
    }

    #[test]
    fn test_paragraph_text_and_runs() {
        let tree = XmlTree::parse(
            r#"<w:p><w:pPr><w:rPr><w:sz w:val="40"/></w:rPr></w:pPr><w:r><w:t xml:space="preserve">What </w:t></w:r><w:hyperlink><w:r><w:rPr><w:sz w:val="22"/></w:rPr><w:t>is</w:t><w:tab/></w:r></w:hyperlink><w:r><w:t>2+2?</w:t><w:br/></w:r></w:p>"#,
        )
        .unwrap();
        let para = Paragraph::new(tree.root().unwrap());

        let runs = para.runs();
        assert_eq!(runs.len(), 3);
        assert_eq!(para.plain_text(), "What is\t2+2?\n");
        assert_eq!(runs[0].font_size(), None);
        assert_eq!(runs[1].font_size(), Some(FontSize::from_half_points(22)));
    }

    #[test]
    fn test_moved_runs_count_at_destination_only() {
        let tree = XmlTree::parse(
            r#"<w:p><w:moveTo w:id="1"><w:r><w:t>kept</w:t></w:r></w:moveTo><w:moveFrom w:id="2"><w:r><w:t>gone</w:t></w:r></w:moveFrom><w:del w:id="3"><w:r><w:delText>old</w:delText></w:r></w:del></w:p>"#,
        )
        .unwrap();
        let para = Paragraph::new(tree.root().unwrap());

        assert_eq!(para.runs().len(), 1);
        assert_eq!(para.plain_text(), "kept");
    }

    #[test]
    fn test_serde_as_points() {
        let size: FontSize = serde_json::from_str("12").unwrap();
        assert_eq!(size.half_points(), 24);
        assert_eq!(serde_json::to_string(&size).unwrap(), "12.0");
        assert!(serde_json::from_str::<FontSize>("0").is_err());
    }
}

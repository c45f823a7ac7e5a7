//! Label-to-font-size rules.

use crate::error::Result;
use crate::model::FontSize;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::Path;

/// Size applied to question rows.
pub const QUESTION_SIZE: FontSize = FontSize::from_half_points(28);

/// Size applied to option and solution rows.
pub const ANSWER_SIZE: FontSize = FontSize::from_half_points(24);

/// Mapping from a row label to the font size of the row's content cell.
///
/// Labels match exactly and case-sensitively against the trimmed text of a
/// row's first cell. On disk a rule set is a JSON object of label to points:
///
/// ```json
/// { "Question": 14, "Option": 12, "Solution": 12 }
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RuleSet {
    rules: BTreeMap<String, FontSize>,
}

impl Default for RuleSet {
    /// `Question` → 14pt, `Option` → 12pt, `Solution` → 12pt.
    fn default() -> Self {
        Self::new()
            .with_rule("Question", QUESTION_SIZE)
            .with_rule("Option", ANSWER_SIZE)
            .with_rule("Solution", ANSWER_SIZE)
    }
}

impl RuleSet {
    /// Create a rule set with no rules.
    pub fn new() -> Self {
        Self {
            rules: BTreeMap::new(),
        }
    }

    /// Add or replace a rule.
    pub fn with_rule(mut self, label: impl Into<String>, size: FontSize) -> Self {
        self.insert(label, size);
        self
    }

    /// Add or replace a rule, returning the size it replaced.
    pub fn insert(&mut self, label: impl Into<String>, size: FontSize) -> Option<FontSize> {
        self.rules.insert(label.into(), size)
    }

    /// Remove a rule.
    pub fn remove(&mut self, label: &str) -> Option<FontSize> {
        self.rules.remove(label)
    }

    /// Size for a label.
    pub fn size_for(&self, label: &str) -> Option<FontSize> {
        self.rules.get(label).copied()
    }

    /// Rules ordered by label.
    pub fn iter(&self) -> impl Iterator<Item = (&str, FontSize)> + '_ {
        self.rules.iter().map(|(label, size)| (label.as_str(), *size))
    }

    /// Get the number of rules.
    pub fn len(&self) -> usize {
        self.rules.len()
    }

    /// Check if there are no rules.
    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }

    /// Parse a rule set from JSON.
    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    /// Load a rule set from a JSON file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let json = std::fs::read_to_string(path.as_ref())?;
        Self::from_json(&json)
    }

    /// Render the rule set as pretty-printed JSON.
    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Error;

    #[test]
    fn test_default_rules() {
        let rules = RuleSet::default();
        assert_eq!(rules.len(), 3);
        assert_eq!(rules.size_for("Question").map(FontSize::points), Some(14.0));
        assert_eq!(rules.size_for("Option").map(FontSize::points), Some(12.0));
        assert_eq!(rules.size_for("Solution").map(FontSize::points), Some(12.0));
    }

    #[test]
    fn test_lookup_is_exact() {
        let rules = RuleSet::default();
        assert_eq!(rules.size_for("question"), None);
        assert_eq!(rules.size_for("Question:"), None);
        assert_eq!(rules.size_for(""), None);
    }

    #[test]
    fn test_custom_rules() {
        let mut rules = RuleSet::new().with_rule("Hint", FontSize::from_half_points(20));
        assert_eq!(rules.size_for("Hint"), Some(FontSize::from_half_points(20)));

        let old = rules.insert("Hint", FontSize::from_half_points(18));
        assert_eq!(old, Some(FontSize::from_half_points(20)));
        assert_eq!(rules.remove("Hint"), Some(FontSize::from_half_points(18)));
        assert!(rules.is_empty());
    }

    #[test]
    fn test_json_round_trip() {
        let rules = RuleSet::from_json(r#"{"Question": 16, "Answer": 11.5}"#).unwrap();
        assert_eq!(rules.size_for("Question"), Some(FontSize::from_half_points(32)));
        assert_eq!(rules.size_for("Answer"), Some(FontSize::from_half_points(23)));

        let labels: Vec<_> = rules.iter().map(|(label, _)| label).collect();
        assert_eq!(labels, vec!["Answer", "Question"]);

        let reparsed = RuleSet::from_json(&rules.to_json().unwrap()).unwrap();
        assert_eq!(reparsed, rules);
    }

    #[test]
    fn test_invalid_json() {
        assert!(matches!(
            RuleSet::from_json(r#"{"Question": -1}"#),
            Err(Error::InvalidData(_))
        ));
        assert!(matches!(
            RuleSet::from_json(r#"["Question"]"#),
            Err(Error::InvalidData(_))
        ));
    }
}

//! Abbreviation sets consulted by the sentence segmenter.

use rustc_hash::FxHashSet;
use serde::{Deserialize, Serialize};

/// Built-in English abbreviations, stored without dots.
pub const ENGLISH_ABBREVIATIONS: &[&str] = &[
    "al", "adj", "assn", "Ave", "BSc", "MSc", "Cell", "Ch", "Co", "cc", "Corp", "Dem", "Dept",
    "ed", "eg", "Eq", "Eqs", "est", "etc", "Ex", "ext", "Fig", "fig", "Figs", "figs", "i.e",
    "ie", "Inc", "inc", "Jan", "Feb", "Mar", "Apr", "Jun", "Jul", "Aug", "Sep", "Sept", "Oct",
    "Nov", "Dec", "jr", "mi", "Miss", "Mrs", "Mr", "Ms", "Mol", "mt", "mts", "no", "Nos", "PhD",
    "MD", "BA", "MA", "MM", "pl", "pop", "pp", "Prof", "Dr", "pt", "Ref", "Refs", "Rep", "repr",
    "rev", "Sec", "Secs", "Sgt", "Col", "Gen", "Sen", "Gov", "Lt", "Maj", "Capt", "St", "Sr",
    "sr", "Jr", "Rev", "Sun", "Mon", "Tu", "Tue", "Tues", "Wed", "Th", "Thu", "Thur", "Thurs",
    "Fri", "Sat", "trans", "Univ", "Viz", "Vol", "vs", "v",
];

/// A case-sensitive set of abbreviations (without their dots)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Abbreviations(FxHashSet<String>);

impl Abbreviations {
    /// The built-in English list
    pub fn english() -> Self {
        ENGLISH_ABBREVIATIONS.iter().copied().collect()
    }

    /// An empty set; only the shape-based heuristics apply.
    pub fn none() -> Self {
        Self(FxHashSet::default())
    }

    /// Check a word against the set after dropping every non-word char
    /// (`"Mr."` and `"(Mr"` both match `Mr`).
    pub fn matches_word(&self, word: &str) -> bool {
        let bare: String = word
            .chars()
            .filter(|c| c.is_alphanumeric() || *c == '_')
            .collect();
        !bare.is_empty() && self.0.contains(&bare)
    }

    pub fn insert(&mut self, abbreviation: impl Into<String>) -> bool {
        self.0.insert(abbreviation.into())
    }

    pub fn contains(&self, abbreviation: &str) -> bool {
        self.0.contains(abbreviation)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl Default for Abbreviations {
    fn default() -> Self {
        Self::english()
    }
}

impl<S: Into<String>> FromIterator<S> for Abbreviations {
    fn from_iter<I: IntoIterator<Item = S>>(iter: I) -> Self {
        Self(iter.into_iter().map(Into::into).collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_english_defaults() {
        let abbr = Abbreviations::default();
        assert!(abbr.matches_word("Mr."));
        assert!(abbr.matches_word("etc."));
        assert!(abbr.matches_word("(Fig."));
        assert!(!abbr.matches_word("noodles."));
        // Case-sensitive
        assert!(!abbr.matches_word("MR."));
    }

    #[test]
    fn test_custom_set() {
        let abbr: Abbreviations = ["approx", "dept"].into_iter().collect();
        assert!(abbr.matches_word("approx."));
        assert!(!abbr.matches_word("Mr."));
        assert_eq!(abbr.len(), 2);
    }

    #[test]
    fn test_deserialize_from_list() {
        let abbr: Abbreviations = serde_json::from_str(r#"["Hr", "Fr"]"#).unwrap();
        assert!(abbr.matches_word("Hr."));
        assert!(abbr.contains("Fr"));
    }
}

//! Similarity scoring for fuzzy matching
//!
//! Implements the containment-style similarity the fuzzy strategies rank
//! candidates with:
//! - longest common subsequence (LCS) length over chars
//! - asymmetric similarity: how much of the reference is recoverable from the candidate
//! - best-substring trimming: a greedy word-level hill climb that narrows a
//!   candidate down to the part that actually resembles the reference
//!
//! The trim is a local search. It accepts ties and stops at the first local
//! optimum instead of evaluating every contiguous word window.

use crate::utils::char_len;
use serde::{Deserialize, Serialize};
use std::borrow::Cow;
use std::ops::Range;

/// Length of the longest common subsequence of `a` and `b`, over chars.
///
/// Classic O(len(a)·len(b)) dynamic program, keeping two rows.
pub fn lcs_length(a: &str, b: &str) -> usize {
    if a == b {
        return char_len(a);
    }

    let a: Vec<char> = a.chars().collect();
    let b: Vec<char> = b.chars().collect();
    if a.is_empty() || b.is_empty() {
        return 0;
    }

    let mut prev = vec![0usize; a.len() + 1];
    let mut curr = vec![0usize; a.len() + 1];

    for &bc in &b {
        for (j, &ac) in a.iter().enumerate() {
            curr[j + 1] = if ac == bc {
                prev[j] + 1
            } else {
                prev[j + 1].max(curr[j])
            };
        }
        std::mem::swap(&mut prev, &mut curr);
    }

    prev[a.len()]
}

/// Similarity of `candidate` to `reference` in `[0, 1]`.
///
/// Returns 1 when both strings are equal (after lowercasing unless
/// `case_sensitive`), otherwise `LCS / chars(reference)`. The reference is
/// the denominator: extra text in the candidate does not lower the score.
pub fn similarity(candidate: &str, reference: &str, case_sensitive: bool) -> f64 {
    let (candidate, reference) = fold_pair(candidate, reference, case_sensitive);
    if candidate == reference {
        return 1.0;
    }

    let denominator = char_len(&reference);
    if denominator == 0 {
        return 0.0;
    }

    lcs_length(&candidate, &reference) as f64 / denominator as f64
}

fn fold_pair<'a>(a: &'a str, b: &'a str, case_sensitive: bool) -> (Cow<'a, str>, Cow<'a, str>) {
    if case_sensitive {
        (Cow::Borrowed(a), Cow::Borrowed(b))
    } else {
        (Cow::Owned(a.to_lowercase()), Cow::Owned(b.to_lowercase()))
    }
}

/// Parameters for [`best_substring`]
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct BestSubstringParams {
    /// Minimum similarity the candidate must reach before trimming
    pub threshold: f64,
    /// Reject results longer than `length_ratio × chars(target)`
    pub length_ratio: Option<f64>,
    pub case_sensitive: bool,
    /// Trust the caller that the candidate already meets `threshold`
    /// and start the climb from it.
    pub skip_initial_check: bool,
}

impl Default for BestSubstringParams {
    fn default() -> Self {
        Self {
            threshold: 0.0,
            length_ratio: None,
            case_sensitive: false,
            skip_initial_check: false,
        }
    }
}

/// Result of [`best_substring`]
#[derive(Debug, Clone, PartialEq)]
pub struct BestSubstring {
    pub similarity: f64,
    /// Byte range inside the searched text
    pub range: Range<usize>,
}

/// Narrow `text` down to the space-delimited word run that best resembles `target`.
///
/// Words are greedily dropped from the front while similarity does not
/// decrease; when dropping the front word would hurt, one word is dropped from
/// the back instead; when neither keeps the score, the climb stops. The
/// surviving run is located (first occurrence) in `text`.
pub fn best_substring(
    text: &str,
    target: &str,
    params: &BestSubstringParams,
) -> Option<BestSubstring> {
    let case_sensitive = params.case_sensitive;
    let mut score = if params.skip_initial_check {
        params.threshold
    } else {
        similarity(text, target, case_sensitive)
    };
    if score < params.threshold {
        return None;
    }

    let words: Vec<&str> = text.split(' ').collect();
    let (mut lo, mut hi) = (0, words.len());

    while lo < hi {
        let front_trimmed = similarity(&words[lo + 1..hi].join(" "), target, case_sensitive);
        if front_trimmed >= score {
            score = front_trimmed;
            lo += 1;
            continue;
        }

        let back_trimmed = similarity(&words[lo..hi - 1].join(" "), target, case_sensitive);
        if back_trimmed >= score {
            score = back_trimmed;
            hi -= 1;
        } else {
            break;
        }
    }

    let best = words[lo..hi].join(" ");
    if best.is_empty() {
        return None;
    }

    if let Some(ratio) = params.length_ratio {
        let target_len = char_len(target).max(1);
        if char_len(&best) as f64 / target_len as f64 > ratio {
            return None;
        }
    }

    let start = text.find(best.as_str())?;
    Some(BestSubstring {
        similarity: score,
        range: start..start + best.len(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_lcs_length() {
        assert_eq!(lcs_length("abcde", "ace"), 3);
        assert_eq!(lcs_length("abc", "def"), 0);
        assert_eq!(lcs_length("", "abc"), 0);
        assert_eq!(lcs_length("abc", ""), 0);
        assert_eq!(lcs_length("same", "same"), 4);
    }

    #[test]
    fn test_lcs_counts_chars_not_bytes() {
        assert_eq!(lcs_length("café", "cafe"), 3);
        assert_eq!(lcs_length("über", "über"), 4);
    }

    #[test]
    fn test_similarity_is_asymmetric() {
        // Everything of "food" is recoverable from the longer sentence
        assert_eq!(similarity("I like food and sports.", "food", false), 1.0);
        // but only a quarter of the sentence is recoverable from "food"
        assert!(similarity("food", "I like food and sports.", false) < 0.25);
    }

    #[test]
    fn test_similarity_case() {
        assert_eq!(similarity("HELLO", "hello", false), 1.0);
        assert!(similarity("HELLO", "hello", true) < 1.0);
    }

    #[test]
    fn test_similarity_empty_reference() {
        assert_eq!(similarity("", "", true), 1.0);
        assert_eq!(similarity("abc", "", true), 0.0);
    }

    #[test]
    fn test_best_substring_trims_to_match() {
        let text = "I like food and sports. ";
        let params = BestSubstringParams {
            threshold: 10.0 / 11.0,
            length_ratio: Some(2.0),
            case_sensitive: false,
            skip_initial_check: true,
        };
        let result = best_substring(text, "I like fool", &params).unwrap();
        assert_eq!(&text[result.range.clone()], "I like food");
        assert!((result.similarity - 10.0 / 11.0).abs() < 1e-9);
    }

    #[test]
    fn test_best_substring_below_threshold() {
        let params = BestSubstringParams {
            threshold: 0.9,
            ..Default::default()
        };
        assert!(best_substring("completely unrelated", "xyz qqq", &params).is_none());
    }

    #[test]
    fn test_best_substring_length_ratio_guard() {
        // The whole sentence is needed to cover the target's chars, but it is
        // far longer than twice the target.
        let params = BestSubstringParams {
            threshold: 0.5,
            length_ratio: Some(2.0),
            ..Default::default()
        };
        assert!(best_substring("a b c d e f g h i j k l m n o p", "ap", &params).is_none());
    }

    proptest! {
        #[test]
        fn similarity_is_reflexive(s in ".{0,40}", case_sensitive in any::<bool>()) {
            prop_assert_eq!(similarity(&s, &s, case_sensitive), 1.0);
        }

        #[test]
        fn lcs_with_empty_is_zero(s in ".{0,40}") {
            prop_assert_eq!(lcs_length(&s, ""), 0);
        }

        #[test]
        fn similarity_stays_in_unit_interval(a in "[a-z ]{0,30}", b in "[a-z ]{1,30}") {
            let s = similarity(&a, &b, true);
            prop_assert!((0.0..=1.0).contains(&s));
        }

        #[test]
        fn best_substring_respects_length_ratio(
            text in "[a-d]{1,4}( [a-d]{1,4}){0,12}",
            target in "[a-d]{1,6}",
            ratio in 1.0f64..3.0,
        ) {
            let params = BestSubstringParams {
                threshold: 0.0,
                length_ratio: Some(ratio),
                case_sensitive: true,
                skip_initial_check: false,
            };
            if let Some(found) = best_substring(&text, &target, &params) {
                let len = found.range.end - found.range.start;
                prop_assert!(len as f64 <= ratio * target.len() as f64);
                prop_assert!(found.range.end <= text.len());
            }
        }
    }
}

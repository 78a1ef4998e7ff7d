//! Fuzzy search strategies
//!
//! - token based: anchor on exact occurrences of the target and score the
//!   context around each against the expected prefix and postfix
//! - sentence based: score whole sentences (and adjacent pairs) against the
//!   target, then trim the winner down with [`best_substring`]
//!
//! Both strategies accept the first candidate that reaches the floor; later
//! candidates replace it only when strictly better.

use super::options::{FuzzySearchOptions, Rewriter};
use super::scorer::{BestSubstringParams, best_substring, similarity};
use crate::markup::{MarkupIndex, strip_tags};
use crate::segment::Sentence;
use crate::utils::{advance_chars, char_len, retreat_chars};
use memchr::memmem;
use std::borrow::Cow;
use std::ops::Range;
use tracing::trace;

/// A fuzzy match in search-space coordinates
#[derive(Debug, Clone, PartialEq)]
pub struct FuzzyMatch {
    pub range: Range<usize>,
    pub similarity: f64,
}

fn beats(best: Option<f64>, score: f64, floor: f64) -> bool {
    match best {
        None => score >= floor,
        Some(best) => score > best,
    }
}

/// Token-based search
///
/// Every occurrence of `target` (overlapping, case-sensitive) is widened by
/// as many chars as the prefix and postfix have, and the widened fragment is
/// scored against `prefix + target + postfix`.
pub fn token_search(
    text: &str,
    (prefix, target, postfix): (&str, &str, &str),
    floor: f64,
    case_sensitive: bool,
) -> Option<FuzzyMatch> {
    if target.is_empty() {
        return None;
    }

    let reference = format!("{prefix}{target}{postfix}");
    let (prefix_chars, postfix_chars) = (char_len(prefix), char_len(postfix));
    let finder = memmem::Finder::new(target.as_bytes());
    let mut best: Option<FuzzyMatch> = None;
    let mut from = 0;

    while let Some(rel) = finder.find(&text.as_bytes()[from..]) {
        let at = from + rel;
        let end = at + target.len();
        from = advance_chars(text, at, 1);

        let lo = retreat_chars(text, at, prefix_chars);
        let hi = advance_chars(text, end, postfix_chars);
        let score = similarity(&text[lo..hi], &reference, case_sensitive);
        trace!(at, score, "token candidate");

        if beats(best.as_ref().map(|b| b.similarity), score, floor) {
            best = Some(FuzzyMatch {
                range: at..end,
                similarity: score,
            });
        }
    }

    best
}

/// A sentence under consideration, possibly rewritten
struct Candidate<'a> {
    /// Text scored against the target
    text: Cow<'a, str>,
    /// Search-space text at `start` the match is trimmed from
    source: &'a str,
    start: usize,
}

/// Best scoring sentence or adjacent pair
struct Winner<'a> {
    /// Search-space text of the sentence, or both sentences without the gap
    source: Cow<'a, str>,
    score: f64,
    start: usize,
    /// Byte length of the first sentence inside `source`
    first_len: usize,
    /// Start of the second sentence when two were joined
    second_start: Option<usize>,
}

impl Winner<'_> {
    /// Map a range inside `source` to the search space.
    ///
    /// An offset on the join belongs to the second sentence when it starts
    /// the range and to the first when it ends it.
    fn map(&self, range: Range<usize>) -> Range<usize> {
        let at = |offset: usize, on_join_is_second: bool| match self.second_start {
            Some(second)
                if offset > self.first_len || (on_join_is_second && offset == self.first_len) =>
            {
                second + (offset - self.first_len)
            }
            _ => self.start + offset,
        };
        at(range.start, true)..at(range.end, false)
    }
}

/// Sentence-based search over cached sentences of `index`'s search space
///
/// `sentences` must come from the search space segmented with whitespace
/// preserved, so each sentence text equals its source span.
pub fn sentence_search(
    index: &MarkupIndex,
    sentences: &[Sentence],
    target: &str,
    options: &FuzzySearchOptions,
    case_sensitive: bool,
) -> Option<FuzzyMatch> {
    let target_chars = char_len(target);
    let words: Vec<Cow<'_, str>> = target
        .split_whitespace()
        .map(|w| fold(w, case_sensitive))
        .collect();
    if words.is_empty() {
        return None;
    }

    let mut candidates: Vec<Candidate<'_>> = sentences
        .iter()
        .filter(|s| {
            let text = fold(&s.text, case_sensitive);
            words.iter().any(|w| text.contains(w.as_ref()))
        })
        .map(|s| Candidate {
            text: Cow::Borrowed(s.text.as_str()),
            source: s.text.as_str(),
            start: s.start,
        })
        .collect();

    if let Some(rewriter) = &options.rewriter {
        for candidate in &mut candidates {
            rewrite(index, candidate, rewriter);
        }
    }

    let mut best: Option<Winner<'_>> = None;
    for (i, candidate) in candidates.iter().enumerate() {
        let score = similarity(&candidate.text, target, case_sensitive);
        trace!(start = candidate.start, score, "sentence candidate");

        if beats(best.as_ref().map(|b| b.score), score, options.sentence_threshold) {
            best = Some(Winner {
                source: Cow::Borrowed(candidate.source),
                score,
                start: candidate.start,
                first_len: candidate.source.len(),
                second_start: None,
            });
            continue;
        }

        // a true match may have been split across two sentences
        let Some(next) = candidates.get(i + 1) else {
            continue;
        };
        let joined = format!("{}{}", candidate.text, next.text);
        let diff = (char_len(&joined) as f64 - target_chars as f64).abs() / target_chars as f64;
        if diff > options.max_sentence_length_diff {
            continue;
        }
        let score = similarity(&joined, target, case_sensitive);
        trace!(start = candidate.start, score, "sentence pair candidate");
        if beats(best.as_ref().map(|b| b.score), score, options.sentence_threshold) {
            best = Some(Winner {
                source: Cow::Owned(format!("{}{}", candidate.source, next.source)),
                score,
                start: candidate.start,
                first_len: candidate.source.len(),
                second_start: Some(next.start),
            });
        }
    }

    let winner = best?;
    let params = BestSubstringParams {
        threshold: winner.score,
        length_ratio: Some(options.length_ratio),
        case_sensitive,
        skip_initial_check: true,
    };
    let found = best_substring(&winner.source, target, &params)?;
    Some(FuzzyMatch {
        range: winner.map(found.range),
        similarity: found.similarity,
    })
}

/// Run the rewriter on the sentence with its markup put back.
///
/// The rewritten text is what gets scored. When it is found inside the
/// original sentence the candidate narrows to that part; otherwise the match
/// is still trimmed from the original sentence.
fn rewrite(index: &MarkupIndex, candidate: &mut Candidate<'_>, rewriter: &Rewriter) {
    let span = candidate.start..candidate.start + candidate.source.len();
    let marked = index.with_tags_reinjected(span);
    let (rewritten, _) = strip_tags(&rewriter.rewrite(&marked));
    if rewritten == candidate.source {
        return;
    }
    let source = candidate.source;
    if let Some(at) = source.find(rewritten.as_str()) {
        candidate.start += at;
        candidate.source = &source[at..at + rewritten.len()];
    }
    candidate.text = Cow::Owned(rewritten);
}

fn fold(s: &str, case_sensitive: bool) -> Cow<'_, str> {
    if case_sensitive {
        Cow::Borrowed(s)
    } else {
        Cow::Owned(s.to_lowercase())
    }
}

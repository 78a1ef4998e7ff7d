//! Sentence segmentation
//!
//! Splits raw text into sentences with punctuation and abbreviation
//! heuristics. Every sentence carries the byte offsets of its source span, so
//! fuzzy matches found inside a sentence can be mapped back onto the text the
//! segmenter was given.
//!
//! ## Modes
//!
//! - default: sentence text is its words joined by single spaces (lossy)
//! - `preserve_whitespace`: sentences tile the input exactly; each one runs
//!   up to the first char of the next, so concatenating them reproduces the
//!   input byte for byte
//!
//! ```
//! use annotext::segment::{segment, SegmenterOptions};
//!
//! let sentences = segment("Mr. Smith arrived. He sat down.", &SegmenterOptions::default());
//! let texts: Vec<&str> = sentences.iter().map(|s| s.text.as_str()).collect();
//! assert_eq!(texts, vec!["Mr. Smith arrived.", "He sat down."]);
//! ```

pub mod abbreviations;
pub mod rules;

pub use abbreviations::{Abbreviations, ENGLISH_ABBREVIATIONS};

use crate::utils::word_spans;
use regex::Regex;
use rules::*;
use serde::{Deserialize, Serialize};
use std::ops::Range;
use std::sync::LazyLock;

/// Runs of newlines or horizontal-rule-like characters
static NEWLINE_BOUNDARY: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\n+|[-#=_+*]{4,}").expect("valid regex"));

/// Segmentation options
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SegmenterOptions {
    /// Newline runs and `----`-like rules end a sentence
    pub newline_boundaries: bool,
    /// `<br>` and the closing tags in `html_boundary_tags` end a sentence
    pub html_boundaries: bool,
    pub html_boundary_tags: Vec<String>,
    /// Keep the original whitespace so sentences reproduce their source span
    pub preserve_whitespace: bool,
    pub abbreviations: Abbreviations,
}

impl Default for SegmenterOptions {
    fn default() -> Self {
        Self {
            newline_boundaries: false,
            html_boundaries: false,
            html_boundary_tags: ["p", "div", "ul", "ol"].map(String::from).to_vec(),
            preserve_whitespace: false,
            abbreviations: Abbreviations::english(),
        }
    }
}

/// A sentence and the span of source text it came from
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Sentence {
    pub text: String,
    /// Byte offset of the sentence start in the segmented text
    pub start: usize,
    /// Byte offset just past the sentence in the segmented text
    pub end: usize,
}

impl Sentence {
    pub fn span(&self) -> Range<usize> {
        self.start..self.end
    }
}

#[derive(Debug, Clone)]
enum Token {
    Word(Range<usize>),
    Boundary,
}

/// Sentence segmenter
pub struct SentenceSegmenter {
    options: SegmenterOptions,
    html_boundary: Option<Regex>,
}

impl SentenceSegmenter {
    pub fn new(options: SegmenterOptions) -> Self {
        let html_boundary = if options.html_boundaries {
            let names: Vec<String> = options
                .html_boundary_tags
                .iter()
                .map(|t| regex::escape(t))
                .collect();
            let pattern = format!(r"<br\s*/?>|</(?:{})>", names.join("|"));
            match Regex::new(&pattern) {
                Ok(re) => Some(re),
                Err(e) => {
                    tracing::warn!("html boundaries disabled, bad tag list: {}", e);
                    None
                }
            }
        } else {
            None
        };

        Self {
            options,
            html_boundary,
        }
    }

    pub fn options(&self) -> &SegmenterOptions {
        &self.options
    }

    /// Split `text` into sentences.
    ///
    /// Empty and whitespace-only input yields no sentences.
    pub fn segment(&self, text: &str) -> Vec<Sentence> {
        if text.trim().is_empty() {
            return Vec::new();
        }

        let tokens = self.tokenize(text);
        let groups = merge_short_fragments(text, self.split(text, &tokens));
        self.render(text, &groups)
    }

    /// Words and boundary markers, in order
    fn tokenize(&self, text: &str) -> Vec<Token> {
        let mut boundaries: Vec<Range<usize>> = Vec::new();
        if self.options.newline_boundaries {
            boundaries.extend(NEWLINE_BOUNDARY.find_iter(text).map(|m| m.range()));
        }
        if let Some(re) = &self.html_boundary {
            // The tag stays part of its word, the boundary sits right after it
            boundaries.extend(re.find_iter(text).map(|m| m.end()..m.end()));
        }
        boundaries.sort_by_key(|b| (b.start, b.end));

        let mut tokens = Vec::new();
        let mut cursor = 0;
        for boundary in boundaries {
            if boundary.start < cursor {
                continue;
            }
            push_words(text, cursor..boundary.start, &mut tokens);
            tokens.push(Token::Boundary);
            cursor = boundary.end;
        }
        push_words(text, cursor..text.len(), &mut tokens);

        tokens
    }

    /// Group word spans into sentences
    fn split(&self, text: &str, tokens: &[Token]) -> Vec<Vec<Range<usize>>> {
        let words: Vec<&str> = tokens
            .iter()
            .map(|t| match t {
                Token::Word(span) => &text[span.clone()],
                Token::Boundary => "",
            })
            .collect();
        let mut sentences: Vec<Vec<Range<usize>>> = Vec::new();
        let mut current: Vec<Range<usize>> = Vec::new();
        let mut word_count = 0usize;

        for (i, token) in tokens.iter().enumerate() {
            word_count += 1;

            let span = match token {
                Token::Word(span) => span.clone(),
                Token::Boundary => {
                    close_sentence(&mut sentences, &mut current);
                    word_count = 0;
                    continue;
                }
            };

            let raw = words[i];
            current.push(span.clone());

            if raw.contains(',') {
                word_count = 0;
            }

            if is_boundary_char(raw) || ends_with_exclamation_or_question(raw) {
                close_sentence(&mut sentences, &mut current);
                word_count = 0;
                continue;
            }

            // A closing quote does not hide the terminator in front of it
            let word = raw.strip_suffix(['"', '\u{201d}']).unwrap_or(raw);

            if word.ends_with('.') {
                if i + 1 < tokens.len() && self.continues_after_dot(word, word_count, &words, i) {
                    continue;
                }
                close_sentence(&mut sentences, &mut current);
                word_count = 0;
                continue;
            }

            if let Some(dot) = word.find('.') {
                if is_number_around(word, dot)
                    || is_dotted_abbreviation(word)
                    || is_url(word)
                    || is_phone_number(word)
                {
                    continue;
                }
            }

            if let Some(split) = split_concatenated(word) {
                current.pop();
                current.push(span.start..span.start + split);
                close_sentence(&mut sentences, &mut current);
                word_count = 0;
                current.push(span.start + split..span.end);
            }
        }

        close_sentence(&mut sentences, &mut current);
        sentences
    }

    /// Whether a word ending in `.` is an abbreviation rather than a terminator
    fn continues_after_dot(&self, word: &str, word_count: usize, words: &[&str], i: usize) -> bool {
        // the capitalized-run test only looks at the opening words of the text
        let window = |upto: usize| &words[i..upto.max(i + 1).min(words.len())];

        let mut chars = word.chars();
        if let (Some(first), Some(_), None) = (chars.next(), chars.next(), chars.next()) {
            if !first.is_ascii_digit() {
                return true;
            }
        }

        if self.options.abbreviations.matches_word(word) {
            return true;
        }

        let next = words.get(i + 1).copied().unwrap_or("");
        if is_sentence_starter(next) {
            is_time_abbreviation(word, next)
                || is_name_abbreviation(word_count, window(6))
                || (is_number(next) && is_custom_abbreviation(word))
        } else {
            word.ends_with("..")
                || is_dotted_abbreviation(word)
                || is_name_abbreviation(word_count, window(5))
        }
    }

    fn render(&self, text: &str, groups: &[Vec<Range<usize>>]) -> Vec<Sentence> {
        let mut sentences = Vec::with_capacity(groups.len());

        for (g, pieces) in groups.iter().enumerate() {
            let (Some(first), Some(last)) = (pieces.first(), pieces.last()) else {
                continue;
            };

            let sentence = if self.options.preserve_whitespace {
                let start = if g == 0 { 0 } else { first.start };
                let end = groups
                    .get(g + 1)
                    .and_then(|next| next.first())
                    .map(|r| r.start)
                    .unwrap_or(text.len());
                Sentence {
                    text: text[start..end].to_string(),
                    start,
                    end,
                }
            } else {
                let words: Vec<&str> = pieces.iter().map(|r| &text[r.clone()]).collect();
                Sentence {
                    text: words.join(" "),
                    start: first.start,
                    end: last.end,
                }
            };

            sentences.push(sentence);
        }

        sentences
    }
}

impl Default for SentenceSegmenter {
    fn default() -> Self {
        Self::new(SegmenterOptions::default())
    }
}

/// Segment `text` with the given options
pub fn segment(text: &str, options: &SegmenterOptions) -> Vec<Sentence> {
    SentenceSegmenter::new(options.clone()).segment(text)
}

fn push_words(text: &str, range: Range<usize>, tokens: &mut Vec<Token>) {
    let offset = range.start;
    tokens.extend(
        word_spans(&text[range])
            .into_iter()
            .map(|r| Token::Word(r.start + offset..r.end + offset)),
    );
}

fn close_sentence(sentences: &mut Vec<Vec<Range<usize>>>, current: &mut Vec<Range<usize>>) {
    if !current.is_empty() {
        sentences.push(std::mem::take(current));
    }
}

/// Glue a lone short dotted fragment (`p.`, `A.`) onto the sentence after it
/// when that sentence does not start with a dotted word itself.
fn merge_short_fragments(text: &str, sentences: Vec<Vec<Range<usize>>>) -> Vec<Vec<Range<usize>>> {
    let mut merged: Vec<Vec<Range<usize>>> = Vec::with_capacity(sentences.len());
    let mut iter = sentences.into_iter().peekable();

    while let Some(mut pieces) = iter.next() {
        if let [only] = pieces.as_slice() {
            let word = &text[only.clone()];
            let next_starts_plain = iter
                .peek()
                .and_then(|next| next.first())
                .is_some_and(|r| !text[r.clone()].contains('.'));

            if word.chars().count() < 4 && word.contains('.') && next_starts_plain {
                if let Some(next) = iter.next() {
                    pieces.extend(next);
                }
            }
        }
        merged.push(pieces);
    }

    merged
}

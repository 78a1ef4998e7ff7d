use std::ops::Range;

/// Split text into whitespace-delimited words, returning their byte spans.
pub fn word_spans(text: &str) -> Vec<Range<usize>> {
    let mut spans = Vec::new();
    let mut word_start: Option<usize> = None;

    for (i, ch) in text.char_indices() {
        if ch.is_whitespace() {
            if let Some(start) = word_start.take() {
                spans.push(start..i);
            }
        } else if word_start.is_none() {
            word_start = Some(i);
        }
    }

    // Handle last word
    if let Some(start) = word_start {
        spans.push(start..text.len());
    }

    spans
}

/// Number of chars in `s`.
///
/// Every ratio in the crate (similarity, length tolerance) is measured in
/// chars, while every location is a byte offset.
#[inline]
pub fn char_len(s: &str) -> usize {
    s.chars().count()
}

/// Byte offset reached by walking `n` chars forward from `from`.
/// Clamped to the end of `text`.
pub fn advance_chars(text: &str, from: usize, n: usize) -> usize {
    if n == 0 {
        return from;
    }
    text[from..]
        .char_indices()
        .nth(n)
        .map(|(i, _)| from + i)
        .unwrap_or(text.len())
}

/// Byte offset reached by walking `n` chars backward from `from`.
/// Clamped to the start of `text`.
pub fn retreat_chars(text: &str, from: usize, n: usize) -> usize {
    if n == 0 {
        return from;
    }
    text[..from]
        .char_indices()
        .rev()
        .nth(n - 1)
        .map(|(i, _)| i)
        .unwrap_or(0)
}

//! Exact substring search
//!
//! Case-sensitive needles go through `memchr::memmem`. Case-insensitive
//! needles are compiled once into `(?i)` regexes and kept in an LRU cache,
//! which keeps repeated `search_all` loops from recompiling.

use crate::utils::{advance_chars, char_len, encode_entities};
use lru::LruCache;
use memchr::memmem;
use regex::Regex;
use std::num::NonZeroUsize;
use std::ops::Range;

const REGEX_CACHE_SIZE: NonZeroUsize = NonZeroUsize::new(64).unwrap();

/// Exact matcher for `prefix + target + postfix`
pub struct DirectSearcher {
    regex_cache: LruCache<String, Regex>,
}

impl Default for DirectSearcher {
    fn default() -> Self {
        Self::new()
    }
}

impl DirectSearcher {
    pub fn new() -> Self {
        Self {
            regex_cache: LruCache::new(REGEX_CACHE_SIZE),
        }
    }

    /// Locate the target of the first match at or after byte `from`.
    ///
    /// Returns the byte range of `target` inside `text`. An empty needle
    /// never matches.
    pub fn find(
        &mut self,
        text: &str,
        from: usize,
        (prefix, target, postfix): (&str, &str, &str),
        case_sensitive: bool,
    ) -> Option<Range<usize>> {
        let needle = format!("{prefix}{target}{postfix}");
        let at = self.find_needle(text, from, &needle, case_sensitive)?;
        Some(locate(text, at, char_len(prefix), char_len(target)))
    }

    /// Retry with the needle entity-encoded
    ///
    /// Lengths of the located range follow the encoded prefix and target.
    pub fn find_encoded(
        &mut self,
        text: &str,
        from: usize,
        (prefix, target, postfix): (&str, &str, &str),
        case_sensitive: bool,
    ) -> Option<Range<usize>> {
        let needle = encode_entities(&format!("{prefix}{target}{postfix}")).into_owned();
        let at = self.find_needle(text, from, &needle, case_sensitive)?;
        Some(locate(
            text,
            at,
            char_len(&encode_entities(prefix)),
            char_len(&encode_entities(target)),
        ))
    }

    fn find_needle(
        &mut self,
        text: &str,
        from: usize,
        needle: &str,
        case_sensitive: bool,
    ) -> Option<usize> {
        if needle.is_empty() || from > text.len() || !text.is_char_boundary(from) {
            return None;
        }
        let haystack = &text[from..];

        if case_sensitive {
            return memmem::find(haystack.as_bytes(), needle.as_bytes()).map(|i| from + i);
        }

        if !self.regex_cache.contains(needle) {
            let pattern = format!("(?i){}", regex::escape(needle));
            match Regex::new(&pattern) {
                Ok(regex) => {
                    self.regex_cache.put(needle.to_string(), regex);
                }
                Err(e) => {
                    tracing::warn!("case-insensitive needle rejected: {}", e);
                    return None;
                }
            }
        }
        let regex = self.regex_cache.get(needle)?;
        regex.find(haystack).map(|m| from + m.start())
    }
}

/// Range of the target inside a match starting at `at`, measured in chars
/// so case folding that changes byte lengths stays on char boundaries.
fn locate(text: &str, at: usize, prefix_chars: usize, target_chars: usize) -> Range<usize> {
    let start = advance_chars(text, at, prefix_chars);
    let end = advance_chars(text, start, target_chars);
    start..end
}

#[cfg(test)]
mod tests {
    use super::*;

    const TEXT: &str = "I am Zhan Huang, a frontend developer in EMBL-EBI. - Zhan Huang";

    #[test]
    fn test_case_sensitive() {
        let mut searcher = DirectSearcher::new();
        assert_eq!(searcher.find(TEXT, 0, ("", "I", ""), true), Some(0..1));
        assert_eq!(searcher.find(TEXT, 0, ("", "i", ""), true), Some(38..39));
        assert_eq!(searcher.find(TEXT, 0, ("", "nothing", ""), true), None);
    }

    #[test]
    fn test_case_insensitive() {
        let mut searcher = DirectSearcher::new();
        assert_eq!(searcher.find(TEXT, 0, ("", "zhan huang", ""), false), Some(5..15));
        // cached needle, resumed after the first hit
        assert_eq!(searcher.find(TEXT, 15, ("", "zhan huang", ""), false), Some(53..63));
        assert_eq!(searcher.find(TEXT, 63, ("", "zhan huang", ""), false), None);
    }

    #[test]
    fn test_prefix_and_postfix_narrow_the_range() {
        let mut searcher = DirectSearcher::new();
        let found = searcher.find(TEXT, 0, ("a ", "frontend developer", " in"), true);
        assert_eq!(found.map(|r| &TEXT[r]), Some("frontend developer"));
    }

    #[test]
    fn test_empty_needle_and_bad_offsets() {
        let mut searcher = DirectSearcher::new();
        assert_eq!(searcher.find(TEXT, 0, ("", "", ""), true), None);
        assert_eq!(searcher.find(TEXT, TEXT.len() + 1, ("", "I", ""), true), None);
        assert_eq!(searcher.find("café", 4, ("", "é", ""), true), None);
    }

    #[test]
    fn test_encoded_fallback() {
        let text = "Tom &amp; Jerry say &quot;hi&quot;";
        let mut searcher = DirectSearcher::new();
        assert_eq!(searcher.find(text, 0, ("", "Tom & Jerry", ""), true), None);
        let found = searcher.find_encoded(text, 0, ("", "Tom & Jerry", ""), true);
        assert_eq!(found.map(|r| &text[r]), Some("Tom &amp; Jerry"));

        let found = searcher.find_encoded(text, 0, ("say ", "\"hi\"", ""), false);
        assert_eq!(found.map(|r| &text[r]), Some("&quot;hi&quot;"));
    }

    #[test]
    fn test_non_ascii_case_folding() {
        let mut searcher = DirectSearcher::new();
        let text = "Straße und ÜBER";
        let found = searcher.find(text, 0, ("", "über", ""), false);
        assert_eq!(found.map(|r| &text[r]), Some("ÜBER"));
    }
}

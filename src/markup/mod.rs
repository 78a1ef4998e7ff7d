//! Markup indexing
//!
//! Tags are treated as opaque `<...>` tokens. Building an index removes every
//! tag from the content and records, for each one, where it sat in the
//! stripped text and how many markup bytes precede it. Searches run on the
//! stripped text; the records map results back onto the original content.

pub mod adjust;
pub mod tag;

pub use adjust::LocationAdjuster;
pub use tag::{TagInfo, TagKind, classify};

use memchr::memchr;
use std::ops::{Range, RangeInclusive};

/// A tag removed from the content
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TagRecord {
    /// Byte offset in the stripped text the tag sat at
    pub position: usize,
    /// Byte length of the tag markup
    pub len: usize,
    /// Total length of all tags before this one
    pub shift: usize,
}

impl TagRecord {
    /// Offset of the tag's `<` in the original content
    pub fn original_offset(&self) -> usize {
        self.position + self.shift
    }

    pub fn original_range(&self) -> Range<usize> {
        let start = self.original_offset();
        start..start + self.len
    }
}

/// Remove every `<...>` token with at least one char between the brackets.
///
/// Returns the stripped text and the removed tags in content order.
pub fn strip_tags(content: &str) -> (String, Vec<TagRecord>) {
    let bytes = content.as_bytes();
    let mut stripped = String::with_capacity(content.len());
    let mut tags = Vec::new();
    let mut shift = 0;
    let mut copied = 0;
    let mut cursor = 0;

    while let Some(rel) = memchr(b'<', &bytes[cursor..]) {
        let open = cursor + rel;
        let Some(rel_close) = memchr(b'>', &bytes[open + 1..]) else {
            break;
        };
        let close = open + 1 + rel_close;
        if close == open + 1 {
            // `<>` is text
            cursor = open + 1;
            continue;
        }

        let len = close + 1 - open;
        stripped.push_str(&content[copied..open]);
        tags.push(TagRecord {
            position: open - shift,
            len,
            shift,
        });
        shift += len;
        copied = close + 1;
        cursor = copied;
    }

    stripped.push_str(&content[copied..]);
    (stripped, tags)
}

/// Content paired with its tag-free search space
#[derive(Debug, Clone)]
pub struct MarkupIndex {
    original: String,
    /// `None` for plain text, where the search space is the content itself
    stripped: Option<String>,
    tags: Vec<TagRecord>,
}

impl MarkupIndex {
    /// Index markup content
    pub fn build(content: impl Into<String>) -> Self {
        let original = content.into();
        let (stripped, tags) = strip_tags(&original);
        Self {
            original,
            stripped: Some(stripped),
            tags,
        }
    }

    /// Plain text: no tags, search space equals the content
    pub fn plain(content: impl Into<String>) -> Self {
        Self {
            original: content.into(),
            stripped: None,
            tags: Vec::new(),
        }
    }

    pub fn is_html(&self) -> bool {
        self.stripped.is_some()
    }

    pub fn original(&self) -> &str {
        &self.original
    }

    pub fn search_space(&self) -> &str {
        self.stripped.as_deref().unwrap_or(&self.original)
    }

    pub fn tags(&self) -> &[TagRecord] {
        &self.tags
    }

    /// Markup text of tag `i`
    pub fn tag_markup(&self, i: usize) -> &str {
        &self.original[self.tags[i].original_range()]
    }

    pub fn tag_info(&self, i: usize) -> TagInfo<'_> {
        classify(self.tag_markup(i))
    }

    /// Tags sitting at stripped positions within `range`, both ends inclusive
    pub fn tags_within(&self, range: RangeInclusive<usize>) -> &[TagRecord] {
        let lo = self.tags.partition_point(|t| t.position < *range.start());
        let hi = self.tags.partition_point(|t| t.position <= *range.end());
        &self.tags[lo..hi.max(lo)]
    }

    /// Stripped text of `span` with the tags inside it put back
    ///
    /// Tags at either edge of the span are included.
    pub fn with_tags_reinjected(&self, span: Range<usize>) -> String {
        let space = self.search_space();
        let mut out = String::with_capacity(span.len());
        let mut cursor = span.start;
        for tag in self.tags_within(span.start..=span.end) {
            out.push_str(&space[cursor..tag.position]);
            out.push_str(&self.original[tag.original_range()]);
            cursor = tag.position;
        }
        out.push_str(&space[cursor..span.end]);
        out
    }
}

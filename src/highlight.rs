//! Highlight registry and wrapper markup
//!
//! Highlights live in an append-only arena. The index a search returns is the
//! highlight's identity for the lifetime of the annotator: entries are never
//! removed or reordered, only marked placed or unplaced.

use crate::error::{AnnotateError, Result};
use serde::{Deserialize, Serialize};
use std::ops::Range;

/// Markup used to wrap a highlight
///
/// Renders as `<{tag_name} id="{id_prefix}{index}" class="{class}">` and
/// `</{tag_name}>`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct WrapperOptions {
    pub tag_name: String,
    pub class: String,
    pub id_prefix: String,
}

impl Default for WrapperOptions {
    fn default() -> Self {
        Self {
            tag_name: "span".to_string(),
            class: "highlight".to_string(),
            id_prefix: "highlight-".to_string(),
        }
    }
}

impl WrapperOptions {
    pub fn open_tag(&self, index: usize) -> String {
        format!(
            r#"<{} id="{}{}" class="{}">"#,
            self.tag_name, self.id_prefix, index, self.class
        )
    }

    pub fn close_tag(&self) -> String {
        format!("</{}>", self.tag_name)
    }
}

/// Byte lengths of the wrapper a placed highlight was inserted with
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlacedWrapper {
    pub open_len: usize,
    pub close_len: usize,
}

impl PlacedWrapper {
    pub fn for_highlight(wrapper: &WrapperOptions, index: usize) -> Self {
        Self {
            open_len: wrapper.open_tag(index).len(),
            close_len: wrapper.close_tag().len(),
        }
    }

    pub fn total_len(&self) -> usize {
        self.open_len + self.close_len
    }
}

/// A match location in search-space coordinates
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Highlight {
    pub start: usize,
    pub end: usize,
    /// Present while the wrapper is inserted in the content
    pub placed: Option<PlacedWrapper>,
}

impl Highlight {
    pub fn is_placed(&self) -> bool {
        self.placed.is_some()
    }

    pub fn range(&self) -> Range<usize> {
        self.start..self.end
    }
}

/// Append-only collection of highlights addressed by stable index
#[derive(Debug, Clone, Default)]
pub struct HighlightRegistry {
    entries: Vec<Highlight>,
}

impl HighlightRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record an unplaced highlight and return its index
    pub fn push(&mut self, range: Range<usize>) -> usize {
        debug_assert!(range.start <= range.end);
        self.entries.push(Highlight {
            start: range.start,
            end: range.end,
            placed: None,
        });
        self.entries.len() - 1
    }

    pub fn get(&self, index: usize) -> Result<&Highlight> {
        self.entries.get(index).ok_or(AnnotateError::InvalidIndex {
            index,
            len: self.entries.len(),
        })
    }

    pub fn set_placed(&mut self, index: usize, placed: Option<PlacedWrapper>) -> Result<()> {
        let len = self.entries.len();
        let entry = self
            .entries
            .get_mut(index)
            .ok_or(AnnotateError::InvalidIndex { index, len })?;
        entry.placed = placed;
        Ok(())
    }

    /// Placed highlights with their indices, oldest first
    pub fn placed(&self) -> impl Iterator<Item = (usize, &Highlight, PlacedWrapper)> {
        self.entries
            .iter()
            .enumerate()
            .filter_map(|(i, h)| h.placed.map(|p| (i, h, p)))
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Highlight> {
        self.entries.iter()
    }

    pub fn as_slice(&self) -> &[Highlight] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

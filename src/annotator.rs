//! The annotator: search a document, then wrap matches in highlight markup.
//!
//! A [`TextAnnotator`] owns one document. Searches run on the tag-free search
//! space and record highlights by stable index; highlighting inserts wrapper
//! markup into the live content at offsets that account for the document's
//! own tags and for every wrapper already placed.
//!
//! ```
//! use annotext::{SearchOptions, TextAnnotator, WrapperOptions};
//!
//! let mut annotator = TextAnnotator::html("<p>I like <b>food</b> and sports.</p>");
//! let index = annotator.search("food and", &SearchOptions::default()).unwrap();
//! let content = annotator.highlight(index, &WrapperOptions::default()).unwrap();
//! assert_eq!(
//!     content,
//!     r#"<p>I like <span id="highlight-0" class="highlight"><b>food</b> and</span> sports.</p>"#
//! );
//!
//! let restored = annotator.unhighlight(index, &WrapperOptions::default()).unwrap();
//! assert_eq!(restored, "<p>I like <b>food</b> and sports.</p>");
//! ```

use crate::config::AnnotatorConfig;
use crate::error::{AnnotateError, Result};
use crate::highlight::{Highlight, HighlightRegistry, PlacedWrapper, WrapperOptions};
use crate::markup::{LocationAdjuster, MarkupIndex, TagRecord};
use crate::query::{HostSurface, SearchEngine, SearchMatch, SearchOptions};
use crate::segment::{Abbreviations, Sentence};
use crate::utils::advance_chars;
use std::ops::Range;
use tracing::{debug, warn};

/// Result of [`TextAnnotator::search_and_highlight`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Highlighted<'a> {
    pub index: usize,
    pub content: &'a str,
}

/// Result of [`TextAnnotator::search_and_highlight_all`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HighlightedAll<'a> {
    pub indices: Vec<usize>,
    pub content: &'a str,
}

pub struct TextAnnotator {
    index: MarkupIndex,
    /// Original content plus every placed wrapper
    content: String,
    highlights: HighlightRegistry,
    engine: SearchEngine,
}

impl TextAnnotator {
    pub fn new(content: impl Into<String>, is_html: bool) -> Self {
        let content = content.into();
        let index = if is_html {
            MarkupIndex::build(content.clone())
        } else {
            MarkupIndex::plain(content.clone())
        };
        debug!(
            is_html,
            len = content.len(),
            tags = index.tags().len(),
            "document indexed"
        );

        Self {
            index,
            content,
            highlights: HighlightRegistry::new(),
            engine: SearchEngine::default(),
        }
    }

    pub fn html(content: impl Into<String>) -> Self {
        Self::new(content, true)
    }

    pub fn plain(content: impl Into<String>) -> Self {
        Self::new(content, false)
    }

    pub fn from_config(content: impl Into<String>, config: &AnnotatorConfig) -> Self {
        let annotator = Self::new(content, config.is_html);
        match &config.abbreviations {
            Some(abbreviations) => annotator.with_abbreviations(abbreviations.clone()),
            None => annotator,
        }
    }

    /// Abbreviations used when segmenting sentences for fuzzy search
    pub fn with_abbreviations(mut self, abbreviations: Abbreviations) -> Self {
        self.engine.set_abbreviations(abbreviations);
        self
    }

    /// Attach the surface the eager strategy searches through
    pub fn with_host_surface(mut self, host: impl HostSurface + 'static) -> Self {
        self.engine.set_host_surface(Box::new(host));
        self
    }

    /// Find `target` and record a highlight for it.
    ///
    /// Returns the highlight's index, or `None` when no strategy matched.
    pub fn search(&mut self, target: &str, options: &SearchOptions) -> Option<usize> {
        let found = self.engine.search(&self.index, target, options)?;
        Some(self.highlights.push(found.range))
    }

    /// Find `target` without recording a highlight
    pub fn locate(&mut self, target: &str, options: &SearchOptions) -> Option<SearchMatch> {
        self.engine.search(&self.index, target, options)
    }

    /// Record every exact occurrence of `target`, left to right.
    ///
    /// Only the direct strategy takes part; each search resumes one char past
    /// the end of the previous match.
    pub fn search_all(&mut self, target: &str, options: &SearchOptions) -> Vec<usize> {
        let mut options = SearchOptions {
            fuzzy: None,
            eager: None,
            ..options.clone()
        };
        let mut indices = Vec::new();

        while let Some(found) = self.engine.search(&self.index, target, &options) {
            options.direct.resume_from =
                Some(advance_chars(self.index.search_space(), found.range.end, 1));
            indices.push(self.highlights.push(found.range));
        }

        indices
    }

    /// Insert the wrapper of highlight `index` into the content.
    pub fn highlight(&mut self, index: usize, wrapper: &WrapperOptions) -> Result<&str> {
        let entry = self.highlights.get(index)?;
        if entry.is_placed() {
            return Err(AnnotateError::AlreadyPlaced(index));
        }

        let range = LocationAdjuster::new(&self.index, &self.highlights).adjust(index, entry);
        let open = wrapper.open_tag(index);
        let close = wrapper.close_tag();
        self.check_offset(range.start)?;
        self.check_offset(range.end)?;

        self.content.insert_str(range.end, &close);
        self.content.insert_str(range.start, &open);
        // offsets above were computed with this highlight still unplaced
        self.highlights.set_placed(
            index,
            Some(PlacedWrapper {
                open_len: open.len(),
                close_len: close.len(),
            }),
        )?;

        debug!(index, start = range.start, end = range.end, "highlight placed");
        Ok(&self.content)
    }

    /// Place several highlights in order
    pub fn highlight_all(&mut self, indices: &[usize], wrapper: &WrapperOptions) -> Result<&str> {
        for &index in indices {
            self.highlight(index, wrapper)?;
        }
        Ok(&self.content)
    }

    /// Remove the wrapper of highlight `index` from the content.
    ///
    /// `wrapper` must match the options the highlight was placed with. When
    /// the wrapper is not where the offsets say, the first occurrence of its
    /// markup is removed instead.
    pub fn unhighlight(&mut self, index: usize, wrapper: &WrapperOptions) -> Result<&str> {
        let placed = self
            .highlights
            .get(index)?
            .placed
            .ok_or(AnnotateError::NotPlaced(index))?;

        // the highlight must not count itself while its offsets are recomputed
        self.highlights.set_placed(index, None)?;
        let entry = self.highlights.get(index)?;
        let range = LocationAdjuster::new(&self.index, &self.highlights).adjust(index, entry);

        let open = wrapper.open_tag(index);
        let close = wrapper.close_tag();
        let close_at = range.end + open.len();

        if self.wrapper_at(range.start, &open) && self.wrapper_at(close_at, &close) {
            self.content.replace_range(close_at..close_at + close.len(), "");
            self.content.replace_range(range.start..range.start + open.len(), "");
        } else if let Some(removed) = self.remove_first_wrapper(&open, &close) {
            warn!(
                index,
                expected = range.start,
                found = removed.start,
                "wrapper not at its computed offset, removed first occurrence"
            );
        } else {
            self.highlights.set_placed(index, Some(placed))?;
            return Err(AnnotateError::WrapperNotFound(index));
        }

        debug!(index, start = range.start, end = range.end, "highlight removed");
        Ok(&self.content)
    }

    /// Remove every placed highlight, newest first
    pub fn unhighlight_all(&mut self, wrapper: &WrapperOptions) -> Result<&str> {
        let placed: Vec<usize> = self.highlights.placed().map(|(i, _, _)| i).collect();
        for &index in placed.iter().rev() {
            self.unhighlight(index, wrapper)?;
        }
        Ok(&self.content)
    }

    /// Search, then highlight the match
    pub fn search_and_highlight(
        &mut self,
        target: &str,
        options: &SearchOptions,
        wrapper: &WrapperOptions,
    ) -> Result<Option<Highlighted<'_>>> {
        let Some(index) = self.search(target, options) else {
            return Ok(None);
        };
        let content = self.highlight(index, wrapper)?;
        Ok(Some(Highlighted { index, content }))
    }

    /// Search every occurrence, then highlight them all
    pub fn search_and_highlight_all(
        &mut self,
        target: &str,
        options: &SearchOptions,
        wrapper: &WrapperOptions,
    ) -> Result<Option<HighlightedAll<'_>>> {
        let indices = self.search_all(target, options);
        if indices.is_empty() {
            return Ok(None);
        }
        let content = self.highlight_all(&indices, wrapper)?;
        Ok(Some(HighlightedAll { indices, content }))
    }

    /// Current content, wrappers included
    pub fn content(&self) -> &str {
        &self.content
    }

    pub fn original_content(&self) -> &str {
        self.index.original()
    }

    /// Text searches run on: stripped of tags for markup, the content otherwise
    pub fn search_space(&self) -> &str {
        self.index.search_space()
    }

    pub fn is_html(&self) -> bool {
        self.index.is_html()
    }

    pub fn tags(&self) -> &[TagRecord] {
        self.index.tags()
    }

    pub fn highlights(&self) -> &[Highlight] {
        self.highlights.as_slice()
    }

    /// Search-space text covered by highlight `index`
    pub fn highlight_text(&self, index: usize) -> Result<&str> {
        let entry = self.highlights.get(index)?;
        self.index
            .search_space()
            .get(entry.range())
            .ok_or(AnnotateError::InvalidOffset { offset: entry.end })
    }

    /// Sentences of the search space, as used by sentence-based fuzzy search
    pub fn sentences(&self) -> &[Sentence] {
        self.engine.sentences(&self.index)
    }

    fn check_offset(&self, offset: usize) -> Result<()> {
        if offset <= self.content.len() && self.content.is_char_boundary(offset) {
            Ok(())
        } else {
            Err(AnnotateError::InvalidOffset { offset })
        }
    }

    fn wrapper_at(&self, offset: usize, markup: &str) -> bool {
        self.content
            .get(offset..)
            .is_some_and(|rest| rest.starts_with(markup))
    }

    /// Remove the first `open` and the first `close` after it
    fn remove_first_wrapper(&mut self, open: &str, close: &str) -> Option<Range<usize>> {
        let start = self.content.find(open)?;
        let after = start + open.len();
        let close_at = after + self.content[after..].find(close)?;
        self.content.replace_range(close_at..close_at + close.len(), "");
        self.content.replace_range(start..after, "");
        Some(start..close_at)
    }
}

//! Mapping search-space spans onto insertion offsets in the live content
//!
//! Two passes turn a stripped span into offsets where a wrapper can be
//! inserted. The tag pass adds the markup removed before each edge. A tag
//! sitting exactly on an edge is pulled inside the span only when its partner
//! is inside too and it is not a block element, and the tags of one edge are
//! split at a single cut so no wrapper lands between them out of order. The overlap pass then adds
//! the wrapper markup of every highlight already placed.

use super::tag::TagKind;
use super::MarkupIndex;
use crate::highlight::{Highlight, HighlightRegistry, PlacedWrapper};
use std::ops::Range;

pub struct LocationAdjuster<'a> {
    index: &'a MarkupIndex,
    highlights: &'a HighlightRegistry,
}

impl<'a> LocationAdjuster<'a> {
    pub fn new(index: &'a MarkupIndex, highlights: &'a HighlightRegistry) -> Self {
        Self { index, highlights }
    }

    /// Offsets in the live content for the highlight at `target`.
    ///
    /// The result's `start` is where the opening wrapper goes; `end` is where
    /// the closing wrapper goes before the opening one is inserted. The
    /// highlight itself is skipped in the overlap pass.
    pub fn adjust(&self, target: usize, highlight: &Highlight) -> Range<usize> {
        let span = highlight.range();
        let (tag_start, tag_end) = self.tag_shift(&span);
        let (overlap_start, overlap_end) = self.overlap_shift(target, &span);
        span.start + tag_start + overlap_start..span.end + tag_end + overlap_end
    }

    /// Markup bytes to add before each edge of `span`.
    ///
    /// Tags sharing an edge position form a run that is cut in one place:
    /// at the start, everything up to the last tag staying outside; at the
    /// end, everything before the first tag staying outside. A tag goes
    /// inside only with its partner, so cutting one side can push a tag on
    /// the other side out and the cuts are settled together.
    fn tag_shift(&self, span: &Range<usize>) -> (usize, usize) {
        let tags = self.index.tags();
        let bytes = |upto: usize| tags[..upto].iter().map(|t| t.len).sum::<usize>();

        let start_run = tags.partition_point(|t| t.position < span.start)
            ..tags.partition_point(|t| t.position <= span.start);
        let end_run = tags.partition_point(|t| t.position < span.end)
            ..tags.partition_point(|t| t.position <= span.end);

        if span.start == span.end {
            let shift = bytes(end_run.end);
            return (shift, shift);
        }

        let mut opens: Vec<Option<usize>> = start_run
            .clone()
            .map(|i| self.inner_partner(i, TagKind::Opening, span))
            .collect();
        let mut closes: Vec<Option<usize>> = end_run
            .clone()
            .map(|i| self.inner_partner(i, TagKind::Closing, span))
            .collect();

        loop {
            let start_cut = start_run.start
                + opens.iter().rposition(Option::is_none).map_or(0, |k| k + 1);
            let end_cut = end_run.start
                + closes.iter().position(Option::is_none).unwrap_or(closes.len());

            let mut settled = true;
            for partner in opens.iter_mut() {
                if partner.is_some_and(|j| j >= end_cut) {
                    *partner = None;
                    settled = false;
                }
            }
            for partner in closes.iter_mut() {
                if partner.is_some_and(|j| j < start_cut) {
                    *partner = None;
                    settled = false;
                }
            }

            if settled {
                return (bytes(start_cut), bytes(end_cut));
            }
        }
    }

    /// Index of the partner of edge tag `i` when it lies within `span`.
    ///
    /// Only non-block tags of kind `kind` qualify. Walks away from the edge
    /// into the span, balancing same-named tags, until the walk leaves the
    /// span.
    fn inner_partner(&self, i: usize, kind: TagKind, span: &Range<usize>) -> Option<usize> {
        let info = self.index.tag_info(i);
        if info.kind != kind || info.is_block() {
            return None;
        }

        let tags = self.index.tags();
        let (mut required, mut found) = (1usize, 0usize);
        let mut visit = |j: &usize| {
            let other = self.index.tag_info(*j);
            if other.kind == TagKind::SelfClosing || !other.same_element(&info) {
                return false;
            }
            if other.kind == info.kind {
                required += 1;
            } else {
                found += 1;
            }
            required == found
        };

        match kind {
            TagKind::Closing => (0..i)
                .rev()
                .take_while(|&j| span.start <= tags[j].position)
                .find(&mut visit),
            TagKind::Opening => (i + 1..tags.len())
                .take_while(|&j| tags[j].position <= span.end)
                .find(&mut visit),
            TagKind::SelfClosing => None,
        }
    }

    fn overlap_shift(&self, target: usize, span: &Range<usize>) -> (usize, usize) {
        let (mut start_shift, mut end_shift) = (0, 0);

        for (i, other, wrapper) in self.highlights.placed() {
            if i == target {
                continue;
            }
            let (start, end) = overlap(span, &other.range(), wrapper);
            start_shift += start;
            end_shift += end;
        }

        (start_shift, end_shift)
    }
}

/// Shift a span picks up from one placed wrapper around `other`
fn overlap(span: &Range<usize>, other: &Range<usize>, wrapper: PlacedWrapper) -> (usize, usize) {
    let (s, e) = (span.start, span.end);
    let (os, oe) = (other.start, other.end);
    let open = wrapper.open_len;
    let total = wrapper.total_len();

    if s >= oe {
        // entirely after
        (total, total)
    } else if s > os && e > oe {
        // starts inside, ends after
        (open, total)
    } else if s <= os && e >= oe {
        // encloses
        (0, total)
    } else if s < os && e > os {
        // starts before, ends inside
        (0, open)
    } else if s >= os && e <= oe {
        // inside
        (open, open)
    } else {
        // entirely before
        (0, 0)
    }
}

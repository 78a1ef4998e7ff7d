use crate::markup::MarkupIndex;
use crate::query::direct::DirectSearcher;
use crate::query::fuzzy::{sentence_search, token_search};
use crate::query::options::{EagerSearchOptions, SearchOptions};
use crate::query::scorer::{BestSubstringParams, best_substring};
use crate::segment::{Abbreviations, SegmenterOptions, Sentence, SentenceSegmenter};
use serde::Serialize;
use std::cell::OnceCell;
use std::fmt;
use std::ops::Range;
use tracing::debug;

/// A surface outside the content that can find phrases itself, such as a
/// rendered page or an editor buffer.
pub trait HostSurface {
    /// Plain text of the fragment holding the best occurrence of `phrase`
    fn find(&self, phrase: &str, case_sensitive: bool) -> Option<String>;
}

/// Strategy that produced a match
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Strategy {
    Direct,
    Encoded,
    Token,
    Sentence,
    Eager,
}

impl fmt::Display for Strategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Strategy::Direct => "direct",
            Strategy::Encoded => "encoded",
            Strategy::Token => "token",
            Strategy::Sentence => "sentence",
            Strategy::Eager => "eager",
        };
        f.write_str(name)
    }
}

/// A match in search-space coordinates
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SearchMatch {
    pub range: Range<usize>,
    pub strategy: Strategy,
    pub similarity: f64,
}

/// Search executor
///
/// Strategies run in a fixed order and the first match wins: direct
/// (optionally retried entity-encoded), then fuzzy when requested, then the
/// host surface when requested and attached.
pub struct SearchEngine {
    direct: DirectSearcher,
    segmenter: SentenceSegmenter,
    /// Sentences of the search space, computed on first fuzzy search
    sentences: OnceCell<Vec<Sentence>>,
    host: Option<Box<dyn HostSurface>>,
}

impl Default for SearchEngine {
    fn default() -> Self {
        Self::new(Abbreviations::default())
    }
}

impl SearchEngine {
    pub fn new(abbreviations: Abbreviations) -> Self {
        let options = SegmenterOptions {
            preserve_whitespace: true,
            abbreviations,
            ..Default::default()
        };
        Self {
            direct: DirectSearcher::new(),
            segmenter: SentenceSegmenter::new(options),
            sentences: OnceCell::new(),
            host: None,
        }
    }

    /// Replace the abbreviation list and drop cached sentences
    pub fn set_abbreviations(&mut self, abbreviations: Abbreviations) {
        let options = SegmenterOptions {
            abbreviations,
            ..self.segmenter.options().clone()
        };
        self.segmenter = SentenceSegmenter::new(options);
        self.sentences = OnceCell::new();
    }

    pub fn set_host_surface(&mut self, host: Box<dyn HostSurface>) {
        self.host = Some(host);
    }

    pub fn has_host_surface(&self) -> bool {
        self.host.is_some()
    }

    /// Sentences of the search space, whitespace preserved
    pub fn sentences(&self, index: &MarkupIndex) -> &[Sentence] {
        self.sentences
            .get_or_init(|| self.segmenter.segment(index.search_space()))
    }

    /// Execute a search and return the first strategy's match
    pub fn search(
        &mut self,
        index: &MarkupIndex,
        target: &str,
        options: &SearchOptions,
    ) -> Option<SearchMatch> {
        let parts = options.trimmed(target);
        if parts.1.is_empty() {
            return None;
        }

        let found = self
            .search_direct(index, parts, options)
            .or_else(|| self.search_fuzzy(index, parts, options))
            .or_else(|| self.search_eager(index, parts, options));

        if let Some(m) = &found {
            debug!(
                strategy = %m.strategy,
                start = m.range.start,
                end = m.range.end,
                similarity = m.similarity,
                "match found"
            );
        }
        found
    }

    fn search_direct(
        &mut self,
        index: &MarkupIndex,
        parts: (&str, &str, &str),
        options: &SearchOptions,
    ) -> Option<SearchMatch> {
        let text = index.search_space();
        let direct = &options.direct;
        let case_sensitive = direct.case_sensitive.unwrap_or(options.case_sensitive);
        let from = direct.resume_from.unwrap_or(0);

        if let Some(range) = self.direct.find(text, from, parts, case_sensitive) {
            return Some(SearchMatch {
                range,
                strategy: Strategy::Direct,
                similarity: 1.0,
            });
        }

        if !direct.encode_fallback {
            return None;
        }
        self.direct
            .find_encoded(text, from, parts, case_sensitive)
            .map(|range| SearchMatch {
                range,
                strategy: Strategy::Encoded,
                similarity: 1.0,
            })
    }

    fn search_fuzzy(
        &self,
        index: &MarkupIndex,
        (prefix, target, postfix): (&str, &str, &str),
        options: &SearchOptions,
    ) -> Option<SearchMatch> {
        let fuzzy = options.fuzzy.as_ref()?;
        let case_sensitive = fuzzy.case_sensitive.unwrap_or(options.case_sensitive);

        if fuzzy.token_based || !prefix.is_empty() || !postfix.is_empty() {
            token_search(
                index.search_space(),
                (prefix, target, postfix),
                fuzzy.token_threshold,
                case_sensitive,
            )
            .map(|m| SearchMatch {
                range: m.range,
                strategy: Strategy::Token,
                similarity: m.similarity,
            })
        } else if fuzzy.sentence_based {
            sentence_search(index, self.sentences(index), target, fuzzy, case_sensitive).map(|m| {
                SearchMatch {
                    range: m.range,
                    strategy: Strategy::Sentence,
                    similarity: m.similarity,
                }
            })
        } else {
            None
        }
    }

    fn search_eager(
        &self,
        index: &MarkupIndex,
        (prefix, target, postfix): (&str, &str, &str),
        options: &SearchOptions,
    ) -> Option<SearchMatch> {
        let eager: &EagerSearchOptions = options.eager.as_ref()?;
        let host = self.host.as_ref()?;
        let case_sensitive = eager.case_sensitive.unwrap_or(options.case_sensitive);

        let fragment = host.find(&format!("{prefix}{target}{postfix}"), case_sensitive)?;
        let params = BestSubstringParams {
            threshold: eager.threshold,
            case_sensitive,
            ..Default::default()
        };
        let best = best_substring(&fragment, target, &params)?;
        let at = index.search_space().find(fragment.as_str())?;

        Some(SearchMatch {
            range: at + best.range.start..at + best.range.end,
            strategy: Strategy::Eager,
            similarity: best.similarity,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::query::options::{DirectSearchOptions, FuzzySearchOptions};

    const CONTENT: &str = r#""I am <b><i>Zhan Huang</i></b>, a <b>frontend developer</b> in EMBL-EBI. I like food and sports. My favourite food is udon noodles." - Zhan Huang"#;

    struct FixedSurface(&'static str);

    impl HostSurface for FixedSurface {
        fn find(&self, _phrase: &str, _case_sensitive: bool) -> Option<String> {
            Some(self.0.to_string())
        }
    }

    fn engine() -> (SearchEngine, MarkupIndex) {
        (SearchEngine::default(), MarkupIndex::build(CONTENT))
    }

    #[test]
    fn test_direct_first() {
        let (mut engine, index) = engine();
        let found = engine.search(&index, "I", &SearchOptions::default()).unwrap();
        assert_eq!(found.strategy, Strategy::Direct);
        assert_eq!(found.range, 1..2);
    }

    #[test]
    fn test_resume_from() {
        let (mut engine, index) = engine();
        let mut options = SearchOptions::default();
        let first = engine.search(&index, "Zhan Huang", &options).unwrap();
        options.direct.resume_from = Some(first.range.end);
        let second = engine.search(&index, "Zhan Huang", &options).unwrap();
        assert!(second.range.start > first.range.start);
        options.direct.resume_from = Some(second.range.end);
        assert!(engine.search(&index, "Zhan Huang", &options).is_none());
    }

    #[test]
    fn test_direct_case_sensitivity_override() {
        let (mut engine, index) = engine();
        let options = SearchOptions {
            case_sensitive: false,
            direct: DirectSearchOptions {
                case_sensitive: Some(true),
                ..Default::default()
            },
            ..Default::default()
        };
        assert!(engine.search(&index, "zhan huang", &options).is_none());
        assert!(engine.search(&index, "zhan huang", &SearchOptions::default()).is_some());
    }

    #[test]
    fn test_fuzzy_only_when_requested() {
        let (mut engine, index) = engine();
        let options = SearchOptions::default()
            .with_prefix("a ")
            .with_postfix(" in EMBLEBI");
        assert!(engine.search(&index, "frontend developer", &options).is_none());

        let options = options.with_fuzzy(FuzzySearchOptions::default());
        let found = engine.search(&index, "frontend developer", &options).unwrap();
        assert_eq!(found.strategy, Strategy::Token);
        assert_eq!(&index.search_space()[found.range], "frontend developer");
    }

    #[test]
    fn test_sentence_fuzzy() {
        let (mut engine, index) = engine();
        let options = SearchOptions::default().with_fuzzy(FuzzySearchOptions::default());
        let found = engine.search(&index, "I like fool", &options).unwrap();
        assert_eq!(found.strategy, Strategy::Sentence);
        assert_eq!(&index.search_space()[found.range], "I like food");
        assert_eq!(engine.sentences(&index).len(), 4);
    }

    #[test]
    fn test_sentence_fuzzy_disabled() {
        let (mut engine, index) = engine();
        let fuzzy = FuzzySearchOptions {
            sentence_based: false,
            ..Default::default()
        };
        let options = SearchOptions::default().with_fuzzy(fuzzy);
        assert!(engine.search(&index, "I like fool", &options).is_none());
    }

    #[test]
    fn test_eager_needs_a_surface() {
        let (mut engine, index) = engine();
        let options = SearchOptions::default().with_eager(EagerSearchOptions::default());
        assert!(engine.search(&index, "udon noodels", &options).is_none());

        engine.set_host_surface(Box::new(FixedSurface("My favourite food is udon noodles.")));
        let found = engine.search(&index, "udon noodels", &options).unwrap();
        assert_eq!(found.strategy, Strategy::Eager);
        assert_eq!(&index.search_space()[found.range], "udon noodles.");
    }

    #[test]
    fn test_empty_target() {
        let (mut engine, index) = engine();
        assert!(engine.search(&index, "   ", &SearchOptions::default()).is_none());
        assert!(engine.search(&index, "", &SearchOptions::default()).is_none());
    }
}

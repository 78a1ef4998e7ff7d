//! End-to-end scenarios on the sample document.
//!
//! The sample mixes nested inline tags, a typo-prone phrase and two
//! occurrences of the same name, which exercises every search strategy and
//! the offset bookkeeping for nested and repeated highlights.

use annotext::Strategy as Found;
use annotext::{AnnotateError, FuzzySearchOptions, SearchOptions, TextAnnotator, WrapperOptions};
use proptest::prelude::*;

const SAMPLE: &str = include_str!("fixtures/sample.html");

fn open(index: usize) -> String {
    WrapperOptions::default().open_tag(index)
}

fn fuzzy() -> SearchOptions {
    SearchOptions::default().with_fuzzy(FuzzySearchOptions::default())
}

#[test]
fn highlights_leading_word() {
    let mut annotator = TextAnnotator::html(SAMPLE);
    let index = annotator.search("I", &SearchOptions::default()).unwrap();
    let content = annotator
        .highlight(index, &WrapperOptions::default())
        .unwrap();
    assert_eq!(
        content,
        SAMPLE.replacen("I am", &format!("{}I</span> am", open(index)), 1)
    );
}

#[test]
fn finds_every_occurrence_in_order() {
    let mut annotator = TextAnnotator::html(SAMPLE);
    let indices = annotator.search_all("Zhan Huang", &SearchOptions::default());
    assert_eq!(indices, vec![0, 1]);

    let highlights = annotator.highlights();
    assert!(highlights[0].end <= highlights[1].start);
    for &i in &indices {
        assert_eq!(annotator.highlight_text(i).unwrap(), "Zhan Huang");
    }
}

#[test]
fn token_fuzzy_match_survives_context_typo() {
    let mut annotator = TextAnnotator::html(SAMPLE);
    let options = fuzzy().with_prefix("a ").with_postfix(" in EMBLEBI");

    let found = annotator.locate("frontend developer", &options).unwrap();
    assert_eq!(found.strategy, Found::Token);

    let index = annotator.search("frontend developer", &options).unwrap();
    let content = annotator
        .highlight(index, &WrapperOptions::default())
        .unwrap();
    assert!(content.contains(&format!(
        "a {}<b>frontend developer</b></span> in",
        open(index)
    )));
}

#[test]
fn sentence_fuzzy_match_recovers_typo() {
    let mut annotator = TextAnnotator::html(SAMPLE);
    let found = annotator.locate("I like fool", &fuzzy()).unwrap();
    assert_eq!(found.strategy, Found::Sentence);

    let index = annotator.search("I like fool", &fuzzy()).unwrap();
    assert_eq!(annotator.highlight_text(index).unwrap(), "I like food");
}

#[test]
fn search_and_highlight_round_trip() {
    let mut annotator = TextAnnotator::html(SAMPLE);
    let wrapper = WrapperOptions::default();
    let highlighted = annotator
        .search_and_highlight("udon noodles", &SearchOptions::default(), &wrapper)
        .unwrap()
        .unwrap();
    let index = highlighted.index;
    assert!(highlighted
        .content
        .contains(&format!("{}udon noodles</span>.", open(index))));

    assert_eq!(annotator.unhighlight(index, &wrapper).unwrap(), SAMPLE);
}

#[test]
fn round_trip_with_disjoint_highlight_in_between() {
    let mut annotator = TextAnnotator::html(SAMPLE);
    let wrapper = WrapperOptions::default();
    let options = SearchOptions::default();

    let first = annotator.search("frontend", &options).unwrap();
    annotator.highlight(first, &wrapper).unwrap();
    let before = annotator.content().to_string();

    let second = annotator.search("sports", &options).unwrap();
    annotator.highlight(second, &wrapper).unwrap();
    annotator.unhighlight(second, &wrapper).unwrap();
    assert_eq!(annotator.content(), before);

    annotator.unhighlight(first, &wrapper).unwrap();
    assert_eq!(annotator.content(), SAMPLE);
}

#[test]
fn custom_wrapper_markup() {
    let mut annotator = TextAnnotator::html(SAMPLE);
    let wrapper = WrapperOptions {
        tag_name: "mark".into(),
        class: "note".into(),
        id_prefix: "n-".into(),
    };
    let found = annotator
        .search_and_highlight("sports", &SearchOptions::default(), &wrapper)
        .unwrap()
        .unwrap();
    assert!(found
        .content
        .contains(r#"and <mark id="n-0" class="note">sports</mark>."#));
}

#[test]
fn misuse_fails_fast() {
    let mut annotator = TextAnnotator::html(SAMPLE);
    let wrapper = WrapperOptions::default();
    assert!(matches!(
        annotator.highlight(3, &wrapper),
        Err(AnnotateError::InvalidIndex { index: 3, .. })
    ));
    assert!(matches!(
        annotator.unhighlight(0, &wrapper),
        Err(AnnotateError::InvalidIndex { .. })
    ));
    assert_eq!(annotator.content(), SAMPLE);
}

#[test]
fn missing_phrase_is_none() {
    let mut annotator = TextAnnotator::html(SAMPLE);
    assert!(annotator.search("ramen", &SearchOptions::default()).is_none());
    assert!(annotator.search("ramen", &fuzzy()).is_none());
    assert!(annotator
        .search_and_highlight("ramen", &SearchOptions::default(), &WrapperOptions::default())
        .unwrap()
        .is_none());
    assert!(annotator.highlights().is_empty());
}

#[test]
fn empty_content() {
    let mut annotator = TextAnnotator::html("");
    assert!(annotator.sentences().is_empty());
    assert!(annotator.search("anything", &fuzzy()).is_none());
    assert!(annotator.search_all("a", &SearchOptions::default()).is_empty());
}

/// Phrases that occur in the sample's search space, by word window
fn sample_phrase() -> impl Strategy<Value = String> {
    let words: Vec<&'static str> = vec![
        "I", "am", "Zhan", "Huang,", "a", "frontend", "developer", "in", "EMBL-EBI.", "I",
        "like", "food", "and", "sports.", "My", "favourite", "food", "is", "udon", "noodles.",
    ];
    (0..words.len(), 1usize..4).prop_map(move |(start, len)| {
        let end = (start + len).min(words.len());
        words[start..end].join(" ")
    })
}

proptest! {
    #[test]
    fn highlight_then_unhighlight_restores_content(
        phrases in prop::collection::vec(sample_phrase(), 1..5),
        order in any::<prop::sample::Index>(),
    ) {
        let mut annotator = TextAnnotator::html(SAMPLE);
        let wrapper = WrapperOptions::default();

        let mut placed = Vec::new();
        for phrase in &phrases {
            if let Some(index) = annotator.search(phrase, &SearchOptions::default()) {
                annotator.highlight(index, &wrapper).unwrap();
                placed.push(index);
            }
        }
        prop_assert!(!placed.is_empty());

        // remove in a rotated order, not just newest first
        let shift = order.index(placed.len());
        placed.rotate_left(shift);
        for index in placed {
            annotator.unhighlight(index, &wrapper).unwrap();
        }
        prop_assert_eq!(annotator.content(), SAMPLE);
    }
}

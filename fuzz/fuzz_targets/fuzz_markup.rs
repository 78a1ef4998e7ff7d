#![no_main]

use annotext::{SearchOptions, TextAnnotator, WrapperOptions};
use arbitrary::Arbitrary;
use libfuzzer_sys::fuzz_target;

#[derive(Arbitrary, Debug)]
struct Input<'a> {
    content: &'a str,
    phrases: Vec<&'a str>,
}

fuzz_target!(|input: Input<'_>| {
    // highlighting then unhighlighting must never panic and, when it
    // succeeds, must restore the content
    let mut annotator = TextAnnotator::html(input.content);
    let wrapper = WrapperOptions::default();

    let mut placed = Vec::new();
    for phrase in input.phrases.iter().take(8) {
        if let Some(index) = annotator.search(phrase, &SearchOptions::default()) {
            if annotator.highlight(index, &wrapper).is_ok() {
                placed.push(index);
            }
        }
    }

    let mut restored = true;
    for index in placed.into_iter().rev() {
        restored &= annotator.unhighlight(index, &wrapper).is_ok();
    }
    if restored && !input.content.contains("</span>") && !input.content.contains("highlight-") {
        assert_eq!(annotator.content(), input.content);
    }
});

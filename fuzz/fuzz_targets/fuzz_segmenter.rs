#![no_main]

use annotext::segment::{SegmenterOptions, segment};
use arbitrary::Arbitrary;
use libfuzzer_sys::fuzz_target;

#[derive(Arbitrary, Debug)]
struct Input<'a> {
    text: &'a str,
    newline_boundaries: bool,
    html_boundaries: bool,
}

fuzz_target!(|input: Input<'_>| {
    let options = SegmenterOptions {
        newline_boundaries: input.newline_boundaries,
        html_boundaries: input.html_boundaries,
        preserve_whitespace: true,
        ..Default::default()
    };
    let sentences = segment(input.text, &options);

    // preserved sentences tile the input whenever it holds a word
    let rebuilt: String = sentences.iter().map(|s| s.text.as_str()).collect();
    if !sentences.is_empty() {
        assert_eq!(rebuilt, input.text);
    }
    for s in &sentences {
        assert_eq!(&input.text[s.span()], s.text);
    }
});

//! Terminal output for the `annotext` command line

use crate::markup::{TagRecord, classify};
use crate::query::SearchMatch;
use crate::segment::Sentence;
use std::io;
use termcolor::{Color, ColorChoice, ColorSpec, StandardStream, WriteColor};

pub fn stdout(color: bool) -> StandardStream {
    let choice = if color {
        ColorChoice::Auto
    } else {
        ColorChoice::Never
    };
    StandardStream::stdout(choice)
}

/// Print matches one per line: `start-end:strategy:score:` then the match
/// with `context` chars of surrounding text
pub fn write_matches<W: WriteColor>(
    out: &mut W,
    text: &str,
    matches: &[SearchMatch],
    context: usize,
) -> io::Result<()> {
    for m in matches {
        out.set_color(ColorSpec::new().set_fg(Some(Color::Green)))?;
        write!(out, "{}-{}", m.range.start, m.range.end)?;
        out.reset()?;
        write!(out, ":")?;

        out.set_color(ColorSpec::new().set_fg(Some(Color::Magenta)))?;
        write!(out, "{}", m.strategy)?;
        out.reset()?;
        write!(out, ":{:.3}:", m.similarity)?;

        let before_start = crate::utils::retreat_chars(text, m.range.start, context);
        let after_end = crate::utils::advance_chars(text, m.range.end, context);

        write!(out, "{}", single_line(&text[before_start..m.range.start]))?;
        out.set_color(ColorSpec::new().set_fg(Some(Color::Red)).set_bold(true))?;
        write!(out, "{}", single_line(&text[m.range.clone()]))?;
        out.reset()?;
        writeln!(out, "{}", single_line(&text[m.range.end..after_end]))?;
    }

    Ok(())
}

/// Print sentences one per line: `n:start-end:text`
pub fn write_sentences<W: WriteColor>(out: &mut W, sentences: &[Sentence]) -> io::Result<()> {
    for (n, sentence) in sentences.iter().enumerate() {
        out.set_color(ColorSpec::new().set_fg(Some(Color::Cyan)))?;
        write!(out, "{}", n)?;
        out.reset()?;
        write!(out, ":")?;

        out.set_color(ColorSpec::new().set_fg(Some(Color::Green)))?;
        write!(out, "{}-{}", sentence.start, sentence.end)?;
        out.reset()?;
        writeln!(out, ":{}", single_line(&sentence.text))?;
    }

    Ok(())
}

/// Print the tag table: stripped position, original offset, markup
pub fn write_tags<W: WriteColor>(
    out: &mut W,
    original: &str,
    tags: &[TagRecord],
) -> io::Result<()> {
    for tag in tags {
        let markup = &original[tag.original_range()];

        out.set_color(ColorSpec::new().set_fg(Some(Color::Green)))?;
        write!(out, "{}", tag.position)?;
        out.reset()?;
        write!(out, ":{}:", tag.original_offset())?;

        let spec = if classify(markup).is_block() {
            ColorSpec::new().set_fg(Some(Color::Yellow)).clone()
        } else {
            ColorSpec::new().set_fg(Some(Color::Blue)).clone()
        };
        out.set_color(&spec)?;
        write!(out, "{}", single_line(markup))?;
        out.reset()?;
        writeln!(out)?;
    }

    Ok(())
}

fn single_line(s: &str) -> String {
    s.replace(['\n', '\r'], " ")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::markup::MarkupIndex;
    use crate::query::Strategy;
    use termcolor::Buffer;

    fn render(f: impl FnOnce(&mut Buffer) -> io::Result<()>) -> String {
        let mut buf = Buffer::no_color();
        f(&mut buf).unwrap();
        String::from_utf8(buf.into_inner()).unwrap()
    }

    #[test]
    fn test_write_matches() {
        let text = "I like food\nand sports.";
        let matches = vec![SearchMatch {
            range: 7..11,
            strategy: Strategy::Direct,
            similarity: 1.0,
        }];
        let out = render(|buf| write_matches(buf, text, &matches, 4));
        assert_eq!(out, "7-11:direct:1.000:ike food and\n");
    }

    #[test]
    fn test_write_sentences() {
        let sentences = vec![
            Sentence { text: "One.".into(), start: 0, end: 4 },
            Sentence { text: "Two\nlines.".into(), start: 5, end: 15 },
        ];
        let out = render(|buf| write_sentences(buf, &sentences));
        assert_eq!(out, "0:0-4:One.\n1:5-15:Two lines.\n");
    }

    #[test]
    fn test_write_tags() {
        let index = MarkupIndex::build("a<p>b</p>");
        let out = render(|buf| write_tags(buf, index.original(), index.tags()));
        assert_eq!(out, "1:1:<p>\n2:5:</p>\n");
    }
}

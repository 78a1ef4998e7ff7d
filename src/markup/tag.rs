//! Classification of the opaque tag tokens removed from the content.
//!
//! Markup is never parsed into a tree; a tag is recognised only by its name
//! and by whether it opens, closes or closes itself.

/// Elements a highlight wrapper must never swallow at a span boundary
/// (a `<div>` inside a `<span>` is invalid markup).
pub const BLOCK_ELEMENTS: &[&str] = &[
    "address", "article", "aside", "blockquote", "canvas", "dd", "div", "dl", "dt", "fieldset",
    "figcaption", "figure", "footer", "form", "h1", "h2", "h3", "h4", "h5", "h6", "header",
    "hgroup", "hr", "li", "main", "nav", "noscript", "ol", "output", "p", "pre", "section",
    "table", "tfoot", "ul", "video",
];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TagKind {
    Opening,
    Closing,
    SelfClosing,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TagInfo<'a> {
    pub name: &'a str,
    pub kind: TagKind,
}

impl TagInfo<'_> {
    pub fn is_block(&self) -> bool {
        is_block_element(self.name)
    }

    /// Same element name, compared ASCII case-insensitively
    pub fn same_element(&self, other: &TagInfo<'_>) -> bool {
        self.name.eq_ignore_ascii_case(other.name)
    }
}

/// Classify a `<...>` token
pub fn classify(markup: &str) -> TagInfo<'_> {
    let inner = markup
        .strip_prefix('<')
        .unwrap_or(markup)
        .strip_suffix('>')
        .unwrap_or(markup);

    let (body, kind) = if let Some(rest) = inner.strip_prefix('/') {
        (rest, TagKind::Closing)
    } else if markup.ends_with("/>") {
        (inner, TagKind::SelfClosing)
    } else {
        (inner, TagKind::Opening)
    };

    let name_end = body
        .find(|c: char| c.is_whitespace() || c == '/' || c == '>')
        .unwrap_or(body.len());

    TagInfo {
        name: &body[..name_end],
        kind,
    }
}

pub fn is_block_element(name: &str) -> bool {
    BLOCK_ELEMENTS.iter().any(|b| b.eq_ignore_ascii_case(name))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_classify() {
        assert_eq!(
            classify("<b>"),
            TagInfo { name: "b", kind: TagKind::Opening }
        );
        assert_eq!(
            classify("</b>"),
            TagInfo { name: "b", kind: TagKind::Closing }
        );
        assert_eq!(
            classify(r#"<a href="/x" class="y">"#),
            TagInfo { name: "a", kind: TagKind::Opening }
        );
        assert_eq!(
            classify("<br/>"),
            TagInfo { name: "br", kind: TagKind::SelfClosing }
        );
        assert_eq!(
            classify(r#"<img src="a.png" />"#),
            TagInfo { name: "img", kind: TagKind::SelfClosing }
        );
        assert_eq!(
            classify("<div\nclass=\"x\">"),
            TagInfo { name: "div", kind: TagKind::Opening }
        );
    }

    #[test]
    fn test_block_elements() {
        assert!(classify("<div>").is_block());
        assert!(classify("</P>").is_block());
        assert!(!classify("<b>").is_block());
        assert!(!classify("<span>").is_block());
    }

    #[test]
    fn test_same_element() {
        assert!(classify("<B>").same_element(&classify("</b>")));
        assert!(!classify("<b>").same_element(&classify("<br>")));
    }
}

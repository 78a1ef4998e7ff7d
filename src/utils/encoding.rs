//! Character-entity encoding for markup-escaped search needles.

use std::borrow::Cow;

/// Encode the characters that markup escapes (`& " ' < >`).
///
/// Used when a phrase is not found verbatim: the content may carry the
/// phrase in its entity-encoded form (`Tom &amp; Jerry`).
pub fn encode_entities(input: &str) -> Cow<'_, str> {
    // Fast path: nothing to escape
    if !input
        .bytes()
        .any(|b| matches!(b, b'&' | b'"' | b'\'' | b'<' | b'>'))
    {
        return Cow::Borrowed(input);
    }

    let mut result = String::with_capacity(input.len() + 16);
    for c in input.chars() {
        match c {
            '&' => result.push_str("&amp;"),
            '"' => result.push_str("&quot;"),
            '\'' => result.push_str("&#39;"),
            '<' => result.push_str("&lt;"),
            '>' => result.push_str("&gt;"),
            _ => result.push(c),
        }
    }
    Cow::Owned(result)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_no_entities() {
        let result = encode_entities("Hello, World!");
        assert!(matches!(result, Cow::Borrowed(_)));
        assert_eq!(result, "Hello, World!");
    }

    #[test]
    fn test_all_entities() {
        assert_eq!(
            encode_entities(r#"<a href="x">Tom & Jerry's</a>"#),
            "&lt;a href=&quot;x&quot;&gt;Tom &amp; Jerry&#39;s&lt;/a&gt;"
        );
    }

    #[test]
    fn test_unicode_untouched() {
        assert_eq!(encode_entities("café & crème"), "café &amp; crème");
    }
}

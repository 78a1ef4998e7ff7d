//! Word-shape heuristics deciding whether punctuation ends a sentence.

use regex::Regex;
use std::sync::LazyLock;

static DOTTED_ABBREVIATION: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^(?:[^\s.]\.)+[^\s.]?$").expect("valid regex"));

static URL: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"[-a-zA-Z0-9@:%._+~#=]{2,256}\.[a-z]{2,6}\b[-a-zA-Z0-9@:%_+.~#?&/=]*")
        .expect("valid regex")
});

// North American numbers: optional +1, optional area code, exchange, line, extension
static PHONE_NUMBER: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(concat!(
        r"^(?:(?:\+?1\s*(?:[.-]\s*)?)?",
        r"(?:\(\s*([2-9]1[02-9]|[2-9][02-8]1|[2-9][02-8][02-9])\s*\)|([2-9]1[02-9]|[2-9][02-8]1|[2-9][02-8][02-9]))",
        r"\s*(?:[.-]\s*)?)?",
        r"([2-9]1[02-9]|[2-9][02-9]1|[2-9][02-9]{2})\s*(?:[.-]\s*)?",
        r"([0-9]{4})(?:\s*(?:#|x\.?|ext\.?|extension)\s*(\d+))?$",
    ))
    .expect("valid regex")
});

/// A bare terminator token: `.`, `!` or `?`
pub fn is_boundary_char(word: &str) -> bool {
    matches!(word, "." | "!" | "?")
}

/// Ends with `!` or `?`
pub fn ends_with_exclamation_or_question(word: &str) -> bool {
    word.ends_with(['!', '?'])
}

/// Numeric in the loose sense: an optionally signed decimal or float literal.
pub fn is_number(word: &str) -> bool {
    let trimmed = word.trim();
    !trimmed.is_empty()
        && trimmed
            .parse::<f64>()
            .map(|n| n.is_finite())
            .unwrap_or(false)
}

/// Check the three chars around the dot at byte `dot` (`3.14abc` -> `3.1`).
pub fn is_number_around(word: &str, dot: usize) -> bool {
    if dot == 0 {
        return is_number(word);
    }
    let mut window = String::with_capacity(8);
    if let Some(before) = word[..dot].chars().next_back() {
        window.push(before);
    }
    window.push('.');
    if let Some(after) = word[dot + 1..].chars().next() {
        window.push(after);
    }
    is_number(&window)
}

/// Uppercase first letter followed by a lowercase one, or a number.
pub fn is_capitalized(word: &str) -> bool {
    let mut chars = word.chars();
    match (chars.next(), chars.next()) {
        (Some(first), Some(second)) if first.is_uppercase() && second.is_lowercase() => true,
        _ => is_number(word),
    }
}

/// Could this word open a sentence?
pub fn is_sentence_starter(word: &str) -> bool {
    if is_capitalized(word) {
        return true;
    }
    let head: String = word.chars().take(2).collect();
    head.contains(['"', '\'']) || head == "``"
}

/// `a.m.` / `p.m.` followed by a day name (`p.m. Tuesday`)
pub fn is_time_abbreviation(word: &str, next: &str) -> bool {
    if word != "a.m." && word != "p.m." {
        return false;
    }
    let bare: Vec<char> = next
        .chars()
        .filter(|c| c.is_alphanumeric() || *c == '_')
        .collect();
    let tail: String = bare[bare.len().saturating_sub(3)..].iter().collect();
    tail.to_lowercase() == "day"
}

/// Dotted abbreviation such as `U.S.A.`, `e.g.,` or `(i.e`.
pub fn is_dotted_abbreviation(word: &str) -> bool {
    let stripped: String = word
        .chars()
        .filter(|c| !matches!(c, '(' | ')' | '[' | ']' | '{' | '}'))
        .collect();
    let stripped = stripped.trim_end_matches([',', ';', ':', '"', '\'']);
    DOTTED_ABBREVIATION.is_match(stripped)
}

/// Short or capitalized words are treated as abbreviations before a number
/// (`p. 12`, `Vol. 3`).
pub fn is_custom_abbreviation(word: &str) -> bool {
    word.chars().count() <= 3 || is_capitalized(word)
}

/// Looks like part of a personal name (`J. R. Tolkien`, `Dr. Jane Smith`).
///
/// `window` starts at the word under inspection and holds a few words of
/// lookahead. `words_since_comma` counts words since the last comma.
pub fn is_name_abbreviation(words_since_comma: usize, window: &[&str]) -> bool {
    let Some(first) = window.first() else {
        return false;
    };

    if words_since_comma < 5 && first.chars().count() < 6 && is_capitalized(first) {
        return true;
    }

    window
        .iter()
        .filter(|w| w.chars().next().is_some_and(|c| c.is_ascii_uppercase()))
        .count()
        >= 3
}

pub fn is_url(word: &str) -> bool {
    URL.is_match(word)
}

pub fn is_phone_number(word: &str) -> bool {
    PHONE_NUMBER.is_match(word)
}

/// Split a word that hides a sentence boundary (`end.Next` -> `end.` + `Next`).
///
/// Looks at the first `.`, falling back to the first `!` then `?`, and splits
/// only when a letter follows it. Returns the byte offset of the second piece.
pub fn split_concatenated(word: &str) -> Option<usize> {
    let mark = word.find('.').or_else(|| word.find('!')).or_else(|| word.find('?'))?;
    let next = word[mark + 1..].chars().next()?;
    next.is_alphabetic().then_some(mark + 1)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_is_number() {
        assert!(is_number("42"));
        assert!(is_number("3.14"));
        assert!(is_number("-1"));
        assert!(!is_number(""));
        assert!(!is_number("Mr"));
        assert!(!is_number("NaN"));
    }

    #[test]
    fn test_is_number_around() {
        assert!(is_number_around("3.14abc", 1));
        assert!(!is_number_around("end.Next", 3));
        assert!(is_number_around(".5", 0));
    }

    #[test]
    fn test_capitalization() {
        assert!(is_capitalized("Smith"));
        assert!(is_capitalized("12"));
        assert!(!is_capitalized("I"));
        assert!(!is_capitalized("EMBL"));
        assert!(!is_capitalized("smith"));
    }

    #[test]
    fn test_sentence_starter() {
        assert!(is_sentence_starter("The"));
        assert!(is_sentence_starter("\"Hello"));
        assert!(is_sentence_starter("'Tis"));
        assert!(is_sentence_starter("``Quoted"));
        assert!(!is_sentence_starter("-"));
        assert!(!is_sentence_starter("and"));
    }

    #[test]
    fn test_time_abbreviation() {
        assert!(is_time_abbreviation("p.m.", "Tuesday"));
        assert!(is_time_abbreviation("a.m.", "Monday,"));
        assert!(!is_time_abbreviation("p.m.", "The"));
        assert!(!is_time_abbreviation("etc.", "Monday"));
    }

    #[test]
    fn test_dotted_abbreviation() {
        assert!(is_dotted_abbreviation("U.S.A."));
        assert!(is_dotted_abbreviation("e.g.,"));
        assert!(is_dotted_abbreviation("(i.e"));
        assert!(!is_dotted_abbreviation("noodles."));
        assert!(!is_dotted_abbreviation("EMBL-EBI."));
        assert!(!is_dotted_abbreviation("3.14"));
    }

    #[test]
    fn test_name_abbreviation() {
        assert!(is_name_abbreviation(1, &["J.", "R.", "Tolkien"]));
        assert!(!is_name_abbreviation(5, &["EMBL-EBI.", "I", "like", "food", "and"]));
        assert!(is_name_abbreviation(9, &["x.", "Ana", "Bo", "Cy"]));
        assert!(!is_name_abbreviation(0, &[]));
    }

    #[test]
    fn test_url_and_phone() {
        assert!(is_url("www.example.com"));
        assert!(is_url("https://docs.rs/regex"));
        assert!(!is_url("end.Next"));
        assert!(is_phone_number("555.867.5309"));
        assert!(!is_phone_number("3.14"));
    }

    #[test]
    fn test_split_concatenated() {
        assert_eq!(split_concatenated("food.Then"), Some(5));
        assert_eq!(split_concatenated("Really?Yes"), Some(7));
        assert_eq!(split_concatenated("3.14"), None);
        assert_eq!(split_concatenated("word"), None);
    }
}

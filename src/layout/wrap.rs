//! Greedy word wrapping.
//!
//! Words are never split: a word wider than the limit gets a line of its own
//! and overflows. All whitespace, newlines included, separates words and
//! collapses to a single space.

use super::measure::{FontSpec, TextMeasure};

/// Wrap `text` greedily, asking `fits` whether a candidate line is acceptable.
///
/// Always returns at least one line; blank input yields a single empty line.
pub fn wrap_words<F>(text: &str, mut fits: F) -> Vec<String>
where
    F: FnMut(&str) -> bool,
{
    let mut lines = Vec::new();
    let mut current = String::new();

    for word in text.split_whitespace() {
        if current.is_empty() {
            current.push_str(word);
            continue;
        }

        let mut candidate = String::with_capacity(current.len() + 1 + word.len());
        candidate.push_str(&current);
        candidate.push(' ');
        candidate.push_str(word);

        if fits(&candidate) {
            current = candidate;
        } else {
            lines.push(std::mem::replace(&mut current, word.to_string()));
        }
    }

    if !current.is_empty() {
        lines.push(current);
    }
    if lines.is_empty() {
        lines.push(String::new());
    }
    lines
}

/// Wrap to at most `max_chars` characters per line (where words allow)
pub fn wrap_by_chars(text: &str, max_chars: usize) -> Vec<String> {
    wrap_words(text, |candidate| candidate.chars().count() <= max_chars)
}

/// Wrap to at most `max_width` pixels per line as measured in `font`
pub fn wrap_by_width(
    text: &str,
    max_width: f32,
    measure: &mut dyn TextMeasure,
    font: &FontSpec,
) -> Vec<String> {
    wrap_words(text, |candidate| measure.text_width(candidate, font) <= max_width)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::layout::measure::CharWidthMeasure;

    /// Wrapping must reproduce the original word sequence exactly
    fn assert_words_preserved(text: &str, lines: &[String]) {
        let original: Vec<&str> = text.split_whitespace().collect();
        let wrapped: Vec<&str> = lines.iter().flat_map(|l| l.split_whitespace()).collect();
        assert_eq!(original, wrapped);
    }

    #[test]
    fn test_empty_yields_single_line() {
        assert_eq!(wrap_by_chars("", 40), vec![String::new()]);
        assert_eq!(wrap_by_chars("   \n\t ", 40), vec![String::new()]);
    }

    #[test]
    fn test_basic_wrap() {
        let lines = wrap_by_chars("the quick brown fox jumps over the lazy dog", 10);
        assert_eq!(
            lines,
            vec!["the quick", "brown fox", "jumps over", "the lazy", "dog"]
        );
        for line in &lines {
            assert!(line.chars().count() <= 10);
        }
    }

    #[test]
    fn test_long_word_not_split() {
        let text = "a supercalifragilisticexpialidocious word";
        let lines = wrap_by_chars(text, 8);
        assert_eq!(lines, vec!["a", "supercalifragilisticexpialidocious", "word"]);
        assert_words_preserved(text, &lines);
    }

    #[test]
    fn test_words_preserved_across_widths() {
        let text = "Lorem ipsum dolor sit amet,\nconsectetur   adipiscing elit, sed do eiusmod \
                    tempor incididunt ut labore et dolore magna aliqua. Ut enim ad minim veniam";
        for max in [0, 1, 5, 12, 40, 50, 1000] {
            let lines = wrap_by_chars(text, max);
            assert_words_preserved(text, &lines);
            for line in &lines {
                assert!(!line.starts_with(' ') && !line.ends_with(' '));
                assert!(!line.contains("  "));
            }
        }
    }

    #[test]
    fn test_wrap_by_width() {
        let font = FontSpec::new(14., 400, 10.);
        let mut measure = CharWidthMeasure;
        let lines = wrap_by_width("aaa bbb ccc ddd", 75., &mut measure, &font);
        assert_eq!(lines, vec!["aaa bbb", "ccc ddd"]);
    }
}

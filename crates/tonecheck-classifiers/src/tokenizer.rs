//! Text normalization and segmentation

use once_cell::sync::Lazy;
use regex::Regex;
use tonecheck_core::TextStats;

/// Anything that is not a word character (letter, digit, underscore) or whitespace
static NON_WORD: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"[^\w\s]").expect("static punctuation pattern"));

static SENTENCE_BREAK: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"[.!?]+").expect("static sentence pattern"));

/// Lower-case `text`, strip punctuation and split it into word tokens.
///
/// Returns an empty vector for empty or whitespace-only input.
pub fn tokenize(text: &str) -> Vec<String> {
    let lowered = text.to_lowercase();
    NON_WORD
        .replace_all(&lowered, "")
        .split_whitespace()
        .map(str::to_owned)
        .collect()
}

/// Whitespace-delimited words of the original text
pub fn word_count(text: &str) -> usize {
    text.split_whitespace().count()
}

/// Segments between runs of `.`, `!` and `?` that contain something other than whitespace
pub fn sentence_count(text: &str) -> usize {
    SENTENCE_BREAK
        .split(text)
        .filter(|segment| !segment.trim().is_empty())
        .count()
}

pub fn text_stats(text: &str) -> TextStats {
    TextStats {
        word_count: word_count(text),
        sentence_count: sentence_count(text),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tokenize_strips_punctuation_and_case() {
        assert_eq!(
            tokenize("I love this product! It's AMAZING."),
            vec!["i", "love", "this", "product", "its", "amazing"]
        );
    }

    #[test]
    fn test_tokenize_keeps_digits_and_underscores() {
        assert_eq!(tokenize("top_10 picks, 2024"), vec!["top_10", "picks", "2024"]);
    }

    #[test]
    fn test_tokenize_empty_input() {
        assert!(tokenize("").is_empty());
        assert!(tokenize("   \t\n ").is_empty());
        assert!(tokenize("?!...").is_empty());
    }

    #[test]
    fn test_tokenize_unicode_letters() {
        assert_eq!(tokenize("Café CRÈME!"), vec!["café", "crème"]);
    }

    #[test]
    fn test_punctuation_between_words_joins_them() {
        // Hyphens and slashes are removed, not treated as separators
        assert_eq!(tokenize("well-made and/or"), vec!["wellmade", "andor"]);
    }

    #[test]
    fn test_sentence_count() {
        assert_eq!(sentence_count("One. Two! Three?"), 3);
        assert_eq!(sentence_count("Wait... what?!"), 2);
        assert_eq!(sentence_count("no terminator"), 1);
        assert_eq!(sentence_count("Trailing.   "), 1);
        assert_eq!(sentence_count(""), 0);
        assert_eq!(sentence_count("..."), 0);
    }

    #[test]
    fn test_word_count_uses_original_text() {
        assert_eq!(word_count("  It's   amazing - really "), 4);
        assert_eq!(word_count(""), 0);
    }
}

//! Word tokenisation shared by keyword compilation and text scanning.

use once_cell::sync::Lazy;
use regex::Regex;

/// A URL is one token; otherwise a token is a run of word characters.
static TOKEN_PATTERN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"https?://\S+|\w+").expect("valid regex"));

/// Split text into tokens, dropping punctuation and whitespace.
pub fn tokenize(text: &str) -> Vec<&str> {
    TOKEN_PATTERN.find_iter(text).map(|m| m.as_str()).collect()
}

#[cfg(test)]
mod tests {
    use super::tokenize;

    #[test]
    fn punctuation_is_not_part_of_a_token() {
        assert_eq!(
            tokenize("Hand, Foot and Mouth Disease."),
            vec!["Hand", "Foot", "and", "Mouth", "Disease"]
        );
    }

    #[test]
    fn urls_stay_whole() {
        assert_eq!(
            tokenize("see http://who.int/news?id=1 now"),
            vec!["see", "http://who.int/news?id=1", "now"]
        );
    }

    #[test]
    fn hyphenated_words_split() {
        assert_eq!(
            tokenize("Influenza-like illness"),
            vec!["Influenza", "like", "illness"]
        );
    }
}

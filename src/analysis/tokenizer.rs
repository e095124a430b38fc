//! Tokenization and keyword normalization.
//!
//! Turns raw text into the normalized tokens counted by the keyword
//! aggregator: lower-case, split into words, lemmatize, then drop stop
//! words, punctuation and tokens of two characters or fewer.

use super::lemma::Lemmatizer;
use super::stopwords::is_stop_word;
use regex::Regex;
use std::sync::LazyLock;

/// Word tokens, keeping inner apostrophes ("don't", "rock'n'roll").
static WORD_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\w+(?:'\w+)*").expect("valid word regex"));

/// Minimum token length kept (exclusive bound is 2).
const MIN_TOKEN_CHARS: usize = 3;

/// Split lower-cased text into word tokens, with possessive `'s` removed.
pub fn split_words(text: &str) -> Vec<String> {
    let lowered = text.to_lowercase().replace(['\u{2019}', '\u{2018}'], "'");

    WORD_REGEX
        .find_iter(&lowered)
        .map(|m| {
            let mut word = m.as_str();
            while let Some(stripped) = word.strip_suffix("'s") {
                word = stripped;
            }
            word.to_string()
        })
        .filter(|w| !w.is_empty())
        .collect()
}

/// Whether a token is made up solely of ASCII punctuation.
pub fn is_punctuation(token: &str) -> bool {
    !token.is_empty() && token.chars().all(|c| c.is_ascii_punctuation())
}

/// Produces normalized keyword tokens from raw text.
#[derive(Debug, Clone, Default)]
pub struct Normalizer {
    lemmatizer: Lemmatizer,
}

impl Normalizer {
    pub fn new() -> Self {
        Self {
            lemmatizer: Lemmatizer::new(),
        }
    }

    /// Normalize `text` into keyword tokens, preserving order and duplicates.
    pub fn normalize(&self, text: &str) -> Vec<String> {
        split_words(text)
            .into_iter()
            .filter(|word| !is_stop_word(word))
            .map(|word| self.lemmatizer.lemmatize(&word))
            .filter(|lemma| Self::keep(lemma))
            .collect()
    }

    fn keep(token: &str) -> bool {
        !is_stop_word(token) && !is_punctuation(token) && token.chars().count() >= MIN_TOKEN_CHARS
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_basic() {
        let normalizer = Normalizer::new();
        let tokens = normalizer.normalize("The Products are GREAT, and the products' prices too!");
        assert_eq!(tokens, vec!["product", "great", "product", "price"]);
    }

    #[test]
    fn test_drops_short_and_stop_words() {
        let normalizer = Normalizer::new();
        assert!(normalizer.normalize("I am on it, ok? no.").is_empty());
        assert!(normalizer.normalize("").is_empty());
        assert!(normalizer.normalize("!!! ... ???").is_empty());
    }

    #[test]
    fn test_underscores_are_punctuation() {
        let normalizer = Normalizer::new();
        assert_eq!(normalizer.normalize("___ rustacean"), vec!["rustacean"]);
    }

    #[test]
    fn test_possessive_and_curly_apostrophes() {
        assert_eq!(split_words("Ferris’s crab"), vec!["ferris", "crab"]);
        assert_eq!(split_words("don't stop"), vec!["don't", "stop"]);
    }

    #[test]
    fn test_deterministic() {
        let normalizer = Normalizer::new();
        let text = "Compilers, compilers everywhere; borrow checkers and lifetimes.";
        assert_eq!(normalizer.normalize(text), normalizer.normalize(text));
    }

    #[test]
    fn test_idempotent() {
        let normalizer = Normalizer::new();
        for text in [
            "The children's movies were better than the books",
            "Glasses, classes and buses: what's the deal with plurals?",
            "Ferris’s crates compile fast; rustaceans love cargo's ergonomics",
            "___ 42 answers in 3 threads",
        ] {
            let once = normalizer.normalize(text);
            let twice = normalizer.normalize(&once.join(" "));
            assert_eq!(once, twice, "{text}");
        }
    }
}

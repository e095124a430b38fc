//! Rule-based English noun lemmatizer.
//!
//! Reduces plural nouns to their dictionary form using an irregular-form
//! table followed by suffix rules. Every output is a fixed point:
//! `lemmatize(lemmatize(w)) == lemmatize(w)`.

use std::collections::{HashMap, HashSet};
use std::sync::LazyLock;

static IRREGULAR: LazyLock<HashMap<&'static str, &'static str>> = LazyLock::new(|| {
    [
        ("children", "child"),
        ("men", "man"),
        ("women", "woman"),
        ("mice", "mouse"),
        ("geese", "goose"),
        ("feet", "foot"),
        ("teeth", "tooth"),
        ("oxen", "ox"),
        ("lives", "life"),
        ("wives", "wife"),
        ("knives", "knife"),
        ("leaves", "leaf"),
        ("wolves", "wolf"),
        ("halves", "half"),
        ("shelves", "shelf"),
        ("thieves", "thief"),
        ("criteria", "criterion"),
        ("phenomena", "phenomenon"),
        ("analyses", "analysis"),
        ("crises", "crisis"),
        ("theses", "thesis"),
        ("indices", "index"),
        ("matrices", "matrix"),
        ("vertices", "vertex"),
        ("data", "datum"),
        // -ies plurals whose singular ends in -ie
        ("movies", "movie"),
        ("cookies", "cookie"),
        ("zombies", "zombie"),
        ("rookies", "rookie"),
        ("selfies", "selfie"),
        ("indies", "indie"),
        ("newbies", "newbie"),
        ("freebies", "freebie"),
        ("goalies", "goalie"),
        ("hippies", "hippie"),
        ("pies", "pie"),
        ("ties", "tie"),
        ("lies", "lie"),
        // -oes, -zes plurals the suffix rules get wrong
        ("canoes", "canoe"),
        ("throes", "throe"),
        ("tiptoes", "tiptoe"),
        ("quizzes", "quiz"),
    ]
    .into_iter()
    .collect()
});

/// Nouns whose plural and singular forms are the same.
static INVARIANT: LazyLock<HashSet<&'static str>> = LazyLock::new(|| {
    [
        "news", "series", "species", "physics", "mathematics", "economics", "politics",
        "ethics", "athletics", "means", "chaos", "lens",
    ]
    .into_iter()
    .collect()
});

/// Common non-nouns ending in "s". Every token reaches the lemmatizer, so
/// these must not lose their final letter.
static NOT_PLURAL: LazyLock<HashSet<&'static str>> = LazyLock::new(|| {
    ["always", "perhaps", "thanks", "sometimes", "besides", "afterwards", "towards"]
        .into_iter()
        .collect()
});

/// Singulars ending in "s" whose plural adds "es" (bus, buses).
static ES_STEMS: LazyLock<HashSet<&'static str>> = LazyLock::new(|| {
    [
        "bus", "gas", "plus", "minus", "bonus", "campus", "virus", "status", "census", "circus",
        "chorus", "focus", "genius", "octopus", "prospectus", "apparatus", "atlas", "canvas",
        "alias", "bias", "iris", "surplus", "consensus", "walrus", "cactus", "syllabus",
        "sinus", "lens",
    ]
    .into_iter()
    .collect()
});

/// Stateless noun lemmatizer.
#[derive(Debug, Clone, Copy, Default)]
pub struct Lemmatizer;

impl Lemmatizer {
    pub fn new() -> Self {
        Self
    }

    /// Reduce a lower-cased word to its base form.
    pub fn lemmatize(&self, word: &str) -> String {
        let mut current = word.to_string();
        // Each step shortens the word or maps it to a form no rule applies to.
        loop {
            match step(&current) {
                Some(next) if next != current => current = next,
                _ => return current,
            }
        }
    }
}

/// Apply one reduction, or None when `word` is already a base form.
fn step(word: &str) -> Option<String> {
    if let Some(base) = IRREGULAR.get(word) {
        return Some((*base).to_string());
    }
    if INVARIANT.contains(word)
        || NOT_PLURAL.contains(word)
        || word.len() <= 3
        || !word.bytes().all(|b| b.is_ascii_lowercase())
    {
        return None;
    }
    if word.ends_with("ss") || word.ends_with("us") || word.ends_with("is") {
        return None;
    }

    if let Some(stem) = word.strip_suffix("es") {
        if ES_STEMS.contains(stem) || stem.ends_with("tz") || stem.ends_with("zz") {
            return Some(stem.to_string());
        }
        // hero, potato: consonant before the final "o"; shoes, toes stay "-oe"
        if word.len() > 5 && stem.ends_with('o') && !ends_with_vowel(&stem[..stem.len() - 1]) {
            return Some(stem.to_string());
        }
    }
    for suffix in ["sses", "xes", "ches", "shes"] {
        if word.ends_with(suffix) {
            return Some(word[..word.len() - 2].to_string());
        }
    }
    if word.len() > 4 && word.ends_with("ies") {
        return Some(format!("{}y", &word[..word.len() - 3]));
    }
    if word.ends_with('s') {
        return Some(word[..word.len() - 1].to_string());
    }
    None
}

fn ends_with_vowel(word: &str) -> bool {
    word.ends_with(['a', 'e', 'i', 'o', 'u'])
}

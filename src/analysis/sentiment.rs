//! Sentiment scoring and annotation.
//!
//! Scoring sits behind the [`SentimentScorer`] trait so any scorer that
//! yields a polarity in [-1, 1] and a subjectivity in [0, 1] can be swapped
//! in. [`LexiconScorer`] is the built-in lexicon-based implementation.

use super::lemma::Lemmatizer;
use super::tokenizer::split_words;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::sync::{Arc, LazyLock};

/// Polarity above which text is labelled positive (strict).
pub const POSITIVE_THRESHOLD: f64 = 0.1;
/// Polarity below which text is labelled negative (strict).
pub const NEGATIVE_THRESHOLD: f64 = -0.1;

/// Three-way sentiment label.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SentimentLabel {
    Positive,
    Neutral,
    Negative,
}

impl SentimentLabel {
    /// Derive the label from a polarity value using the fixed thresholds.
    pub fn from_polarity(polarity: f64) -> Self {
        if polarity > POSITIVE_THRESHOLD {
            SentimentLabel::Positive
        } else if polarity < NEGATIVE_THRESHOLD {
            SentimentLabel::Negative
        } else {
            SentimentLabel::Neutral
        }
    }
}

impl std::fmt::Display for SentimentLabel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SentimentLabel::Positive => write!(f, "positive"),
            SentimentLabel::Neutral => write!(f, "neutral"),
            SentimentLabel::Negative => write!(f, "negative"),
        }
    }
}

/// Raw scorer output.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct SentimentScore {
    pub polarity: f64,
    pub subjectivity: f64,
}

/// Sentiment attached to a single text.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SentimentAnnotation {
    pub polarity: f64,
    pub subjectivity: f64,
    pub label: SentimentLabel,
}

impl SentimentAnnotation {
    /// Build an annotation, clamping both scores into range.
    ///
    /// Non-finite input collapses to a neutral 0.0 score.
    pub fn from_score(score: SentimentScore) -> Self {
        let polarity = if score.polarity.is_finite() {
            score.polarity.clamp(-1.0, 1.0)
        } else {
            0.0
        };
        let subjectivity = if score.subjectivity.is_finite() {
            score.subjectivity.clamp(0.0, 1.0)
        } else {
            0.0
        };

        Self {
            polarity,
            subjectivity,
            label: SentimentLabel::from_polarity(polarity),
        }
    }

    pub fn neutral() -> Self {
        Self::from_score(SentimentScore::default())
    }
}

/// Trait for sentiment scoring implementations.
pub trait SentimentScorer: Send + Sync {
    /// Score a text. Must not panic on empty or malformed input.
    fn score(&self, text: &str) -> SentimentScore;
}

/// Annotates texts with sentiment using a pluggable scorer.
#[derive(Clone)]
pub struct SentimentAnnotator {
    scorer: Arc<dyn SentimentScorer>,
}

impl SentimentAnnotator {
    pub fn new(scorer: Arc<dyn SentimentScorer>) -> Self {
        Self { scorer }
    }

    pub fn annotate(&self, text: &str) -> SentimentAnnotation {
        if text.trim().is_empty() {
            return SentimentAnnotation::neutral();
        }
        SentimentAnnotation::from_score(self.scorer.score(text))
    }
}

impl Default for SentimentAnnotator {
    fn default() -> Self {
        Self::new(Arc::new(LexiconScorer::new()))
    }
}

impl std::fmt::Debug for SentimentAnnotator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SentimentAnnotator").finish_non_exhaustive()
    }
}

/// (polarity, subjectivity) per sentiment-bearing word.
static LEXICON: LazyLock<HashMap<&'static str, (f64, f64)>> = LazyLock::new(|| {
    [
        // positive
        ("good", (0.7, 0.6)),
        ("great", (0.8, 0.75)),
        ("excellent", (1.0, 1.0)),
        ("amazing", (0.6, 0.9)),
        ("awesome", (1.0, 1.0)),
        ("best", (1.0, 0.3)),
        ("better", (0.5, 0.5)),
        ("love", (0.5, 0.6)),
        ("loved", (0.7, 0.8)),
        ("nice", (0.6, 1.0)),
        ("happy", (0.8, 1.0)),
        ("perfect", (1.0, 1.0)),
        ("wonderful", (1.0, 1.0)),
        ("fantastic", (0.4, 0.9)),
        ("beautiful", (0.85, 1.0)),
        ("brilliant", (0.9, 1.0)),
        ("impressive", (1.0, 1.0)),
        ("interesting", (0.5, 0.5)),
        ("helpful", (0.5, 0.5)),
        ("useful", (0.3, 0.0)),
        ("cool", (0.35, 0.65)),
        ("fun", (0.3, 0.2)),
        ("glad", (0.5, 1.0)),
        ("thanks", (0.2, 0.2)),
        ("thank", (0.2, 0.2)),
        ("ok", (0.5, 0.5)),
        ("okay", (0.5, 0.5)),
        ("fine", (0.4, 0.5)),
        ("fair", (0.7, 0.9)),
        ("solid", (0.3, 0.3)),
        ("easy", (0.43, 0.83)),
        ("fast", (0.2, 0.6)),
        ("clean", (0.37, 0.69)),
        ("enjoy", (0.4, 0.5)),
        ("recommend", (0.3, 0.4)),
        ("favorite", (0.5, 1.0)),
        ("incredible", (0.9, 0.9)),
        ("valuable", (0.5, 0.6)),
        ("win", (0.8, 0.4)),
        ("agree", (0.2, 0.3)),
        // negative
        ("bad", (-0.7, 0.67)),
        ("terrible", (-1.0, 1.0)),
        ("awful", (-1.0, 1.0)),
        ("horrible", (-1.0, 1.0)),
        ("worst", (-1.0, 1.0)),
        ("worse", (-0.4, 0.6)),
        ("hate", (-0.8, 0.9)),
        ("hated", (-0.9, 0.7)),
        ("poor", (-0.4, 0.6)),
        ("sad", (-0.5, 1.0)),
        ("angry", (-0.5, 1.0)),
        ("ugly", (-0.7, 1.0)),
        ("stupid", (-0.8, 1.0)),
        ("boring", (-1.0, 1.0)),
        ("useless", (-0.5, 0.0)),
        ("wrong", (-0.5, 0.9)),
        ("broken", (-0.4, 0.4)),
        ("disappointing", (-0.6, 0.7)),
        ("disappointed", (-0.75, 0.75)),
        ("annoying", (-0.8, 0.9)),
        ("dumb", (-0.375, 0.5)),
        ("slow", (-0.3, 0.39)),
        ("expensive", (-0.5, 0.7)),
        ("scam", (-0.7, 0.8)),
        ("garbage", (-0.6, 0.7)),
        ("trash", (-0.6, 0.7)),
        ("fail", (-0.5, 0.4)),
        ("failed", (-0.5, 0.3)),
        ("problem", (-0.2, 0.3)),
        ("difficult", (-0.5, 1.0)),
        ("hard", (-0.29, 0.54)),
        ("sucks", (-0.3, 0.6)),
        ("crap", (-0.8, 0.8)),
        ("meh", (-0.1, 0.5)),
        ("unfortunately", (-0.5, 1.0)),
    ]
    .into_iter()
    .collect()
});

/// Words that scale the next sentiment word.
static INTENSIFIERS: LazyLock<HashMap<&'static str, f64>> = LazyLock::new(|| {
    [
        ("very", 1.3),
        ("really", 1.3),
        ("extremely", 1.5),
        ("incredibly", 1.5),
        ("absolutely", 1.4),
        ("totally", 1.3),
        ("super", 1.3),
        ("so", 1.2),
        ("quite", 1.1),
        ("pretty", 1.1),
        ("slightly", 0.5),
        ("somewhat", 0.7),
        ("barely", 0.4),
        ("kinda", 0.7),
    ]
    .into_iter()
    .collect()
});

const NEGATIONS: &[&str] = &[
    "not", "no", "never", "none", "nothing", "neither", "nor", "cannot", "without",
];

/// Words after a negation that it still applies to.
const NEGATION_WINDOW: usize = 3;

/// Factor applied to a negated sentiment word.
const NEGATION_FACTOR: f64 = -0.5;

/// Lexicon-based sentiment scorer.
///
/// Polarity and subjectivity are averaged over the sentiment-bearing words.
/// Intensifiers multiply the next sentiment word; a negation within
/// [`NEGATION_WINDOW`] words before it flips and dampens it.
#[derive(Debug, Clone)]
pub struct LexiconScorer {
    lemmatizer: Lemmatizer,
}

impl LexiconScorer {
    pub fn new() -> Self {
        Self {
            lemmatizer: Lemmatizer::new(),
        }
    }

    fn lookup(&self, word: &str) -> Option<(f64, f64)> {
        LEXICON
            .get(word)
            .or_else(|| LEXICON.get(self.lemmatizer.lemmatize(word).as_str()))
            .copied()
    }

    fn is_negation(word: &str) -> bool {
        NEGATIONS.contains(&word) || word.ends_with("n't")
    }
}

impl Default for LexiconScorer {
    fn default() -> Self {
        Self::new()
    }
}

impl SentimentScorer for LexiconScorer {
    fn score(&self, text: &str) -> SentimentScore {
        let mut polarities = Vec::new();
        let mut subjectivities = Vec::new();
        let mut intensity = 1.0;
        let mut words_since_negation: Option<usize> = None;

        for word in split_words(text) {
            if Self::is_negation(&word) {
                words_since_negation = Some(0);
                continue;
            }
            if let Some(factor) = INTENSIFIERS.get(word.as_str()) {
                intensity *= factor;
                continue;
            }

            match self.lookup(&word) {
                Some((polarity, subjectivity)) => {
                    let mut polarity = polarity * intensity;
                    if words_since_negation.is_some_and(|n| n < NEGATION_WINDOW) {
                        polarity *= NEGATION_FACTOR;
                    }
                    polarities.push(polarity.clamp(-1.0, 1.0));
                    subjectivities.push((subjectivity * intensity).clamp(0.0, 1.0));
                    intensity = 1.0;
                    words_since_negation = None;
                }
                None => {
                    words_since_negation = words_since_negation.map(|n| n + 1);
                }
            }
        }

        if polarities.is_empty() {
            return SentimentScore::default();
        }

        let count = polarities.len() as f64;
        SentimentScore {
            polarity: polarities.iter().sum::<f64>() / count,
            subjectivity: subjectivities.iter().sum::<f64>() / count,
        }
    }
}

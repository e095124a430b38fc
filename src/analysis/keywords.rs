//! Keyword frequency table.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// A keyword and its occurrence count.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct KeywordCount {
    pub word: String,
    pub count: usize,
}

/// Token counter that remembers first-seen order.
///
/// Ranking is by descending count; equal counts keep the order in which the
/// words were first added, so `top` is fully deterministic.
#[derive(Debug, Clone, Default)]
pub struct KeywordTable {
    index: HashMap<String, usize>,
    entries: Vec<KeywordCount>,
}

impl KeywordTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Count one occurrence of `word`.
    pub fn add(&mut self, word: &str) {
        self.add_count(word, 1);
    }

    fn add_count(&mut self, word: &str, count: usize) {
        match self.index.get(word) {
            Some(&slot) => self.entries[slot].count += count,
            None => {
                self.index.insert(word.to_string(), self.entries.len());
                self.entries.push(KeywordCount {
                    word: word.to_string(),
                    count,
                });
            }
        }
    }

    /// Fold a token sequence into the table.
    pub fn extend<I, S>(&mut self, tokens: I)
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        for token in tokens {
            self.add(token.as_ref());
        }
    }

    /// Union another table into this one; new words follow `other`'s first-seen order.
    pub fn merge(&mut self, other: &KeywordTable) {
        for entry in &other.entries {
            self.add_count(&entry.word, entry.count);
        }
    }

    pub fn count(&self, word: &str) -> usize {
        self.index
            .get(word)
            .map(|&slot| self.entries[slot].count)
            .unwrap_or(0)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Up to `n` keywords by descending count, ties in first-seen order.
    pub fn top(&self, n: usize) -> Vec<KeywordCount> {
        let mut ranked = self.entries.clone();
        // sort_by is stable, which preserves first-seen order for ties
        ranked.sort_by(|a, b| b.count.cmp(&a.count));
        ranked.truncate(n);
        ranked
    }
}

impl<S: AsRef<str>> FromIterator<S> for KeywordTable {
    fn from_iter<I: IntoIterator<Item = S>>(iter: I) -> Self {
        let mut table = KeywordTable::new();
        table.extend(iter);
        table
    }
}

//! Naive keyword-based topic grouping.

use super::keywords::KeywordCount;
use super::sentiment::SentimentLabel;
use serde::Serialize;

/// Minimum members for a topic to be reported.
pub const MIN_TOPIC_SIZE: usize = 2;

/// Records assigned to one keyword.
#[derive(Debug, Clone, PartialEq)]
pub struct TopicGroup {
    pub topic: String,
    /// Indices into the grouped input, in input order.
    pub members: Vec<usize>,
}

/// Aggregate view of a topic group.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TopicSummary {
    pub topic: String,
    pub member_count: usize,
    pub avg_sentiment: f64,
    pub sentiment_label: SentimentLabel,
    pub samples: Vec<String>,
}

/// Assign each text to the first ranked keyword it contains.
///
/// Matching is a substring test against the lower-cased text. A text joins
/// at most one group; groups with fewer than [`MIN_TOPIC_SIZE`] members are
/// dropped. Groups come back in keyword rank order.
pub fn group_by_keywords<S: AsRef<str>>(keywords: &[KeywordCount], texts: &[S]) -> Vec<TopicGroup> {
    let mut groups: Vec<TopicGroup> = keywords
        .iter()
        .map(|kw| TopicGroup {
            topic: kw.word.clone(),
            members: Vec::new(),
        })
        .collect();

    for (idx, text) in texts.iter().enumerate() {
        let lowered = text.as_ref().to_lowercase();
        if let Some(group) = groups.iter_mut().find(|g| lowered.contains(g.topic.as_str())) {
            group.members.push(idx);
        }
    }

    groups.retain(|g| g.members.len() >= MIN_TOPIC_SIZE);
    groups
}

/// Summarize groups using per-item polarity and sample text.
pub fn summarize_topics<S: AsRef<str>>(
    groups: &[TopicGroup],
    polarities: &[f64],
    samples: &[S],
    max_samples: usize,
) -> Vec<TopicSummary> {
    groups
        .iter()
        .map(|group| {
            let avg_sentiment = mean(group.members.iter().map(|&i| polarities[i]));
            TopicSummary {
                topic: group.topic.clone(),
                member_count: group.members.len(),
                avg_sentiment,
                sentiment_label: SentimentLabel::from_polarity(avg_sentiment),
                samples: group
                    .members
                    .iter()
                    .take(max_samples)
                    .map(|&i| samples[i].as_ref().to_string())
                    .collect(),
            }
        })
        .collect()
}

/// Arithmetic mean, 0.0 for an empty sequence.
pub fn mean<I: IntoIterator<Item = f64>>(values: I) -> f64 {
    let (sum, count) = values
        .into_iter()
        .fold((0.0, 0usize), |(sum, count), v| (sum + v, count + 1));
    if count == 0 {
        0.0
    } else {
        sum / count as f64
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn keywords(words: &[&str]) -> Vec<KeywordCount> {
        words
            .iter()
            .enumerate()
            .map(|(i, w)| KeywordCount {
                word: w.to_string(),
                count: words.len() - i,
            })
            .collect()
    }

    #[test]
    fn test_first_match_wins() {
        let kws = keywords(&["rust", "cargo"]);
        let texts = ["Rust and Cargo", "cargo build", "rust is fun", "cargo test"];
        let groups = group_by_keywords(&kws, &texts);

        assert_eq!(
            groups,
            vec![
                TopicGroup {
                    topic: "rust".into(),
                    members: vec![0, 2]
                },
                TopicGroup {
                    topic: "cargo".into(),
                    members: vec![1, 3]
                },
            ]
        );
    }

    #[test]
    fn test_singletons_dropped_and_each_text_once() {
        let kws = keywords(&["tokio", "serde", "axum"]);
        let texts = ["tokio serde", "tokio axum", "serde only", "nothing here", "axum"];
        let groups = group_by_keywords(&kws, &texts);

        assert!(groups.iter().all(|g| g.members.len() >= MIN_TOPIC_SIZE));
        let mut seen: Vec<usize> = groups.iter().flat_map(|g| g.members.clone()).collect();
        let total = seen.len();
        seen.sort();
        seen.dedup();
        assert_eq!(seen.len(), total);
        assert_eq!(groups.len(), 1);
        assert_eq!(groups[0].topic, "tokio");
    }

    #[test]
    fn test_no_assignments_is_empty() {
        let groups = group_by_keywords(&keywords(&["zig"]), &["rust", "go"]);
        assert!(groups.is_empty());
        let groups = group_by_keywords::<&str>(&[], &[]);
        assert!(groups.is_empty());
    }

    #[test]
    fn test_summaries() {
        let groups = vec![TopicGroup {
            topic: "rust".into(),
            members: vec![0, 1, 2, 3],
        }];
        let polarities = [0.5, 0.3, 0.1, 0.3];
        let texts = ["a", "b", "c", "d"];
        let summaries = summarize_topics(&groups, &polarities, &texts, 3);

        assert_eq!(summaries[0].member_count, 4);
        assert!((summaries[0].avg_sentiment - 0.3).abs() < 1e-9);
        assert_eq!(summaries[0].sentiment_label, SentimentLabel::Positive);
        assert_eq!(summaries[0].samples, vec!["a", "b", "c"]);
    }

    #[test]
    fn test_mean_empty() {
        assert_eq!(mean(std::iter::empty()), 0.0);
        assert_eq!(mean([1.0, 2.0]), 1.5);
    }
}

//! Text analytics pipeline over comments and posts.

use super::keywords::{KeywordCount, KeywordTable};
use super::record::{preview, PostRecord, TextRecord};
use super::sentiment::{SentimentAnnotation, SentimentAnnotator, SentimentLabel};
use super::tokenizer::Normalizer;
use super::topics::{group_by_keywords, mean, summarize_topics, TopicSummary};
use super::trends::SubredditStats;
use crate::config::AnalysisSettings;
use serde::Serialize;
use tracing::debug;

/// A comment with its preview text and sentiment.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AnnotatedComment {
    pub record: TextRecord,
    /// Text truncated for display; topic matching runs against this.
    pub preview: String,
    pub sentiment: SentimentAnnotation,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct SentimentDistribution {
    pub positive: usize,
    pub neutral: usize,
    pub negative: usize,
}

impl SentimentDistribution {
    pub fn add(&mut self, label: SentimentLabel) {
        match label {
            SentimentLabel::Positive => self.positive += 1,
            SentimentLabel::Neutral => self.neutral += 1,
            SentimentLabel::Negative => self.negative += 1,
        }
    }

    pub fn total(&self) -> usize {
        self.positive + self.neutral + self.negative
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct OverallSentiment {
    pub average_polarity: f64,
    pub sentiment_label: SentimentLabel,
    pub sentiment_distribution: SentimentDistribution,
}

/// Topic over comment texts.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CommentTopic {
    pub topic: String,
    pub comment_count: usize,
    pub avg_sentiment: f64,
    pub sentiment_label: SentimentLabel,
    pub sample_comments: Vec<String>,
}

impl From<TopicSummary> for CommentTopic {
    fn from(summary: TopicSummary) -> Self {
        Self {
            topic: summary.topic,
            comment_count: summary.member_count,
            avg_sentiment: summary.avg_sentiment,
            sentiment_label: summary.sentiment_label,
            sample_comments: summary.samples,
        }
    }
}

/// Output of [`TextAnalyzer::analyze_comments`].
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CommentAnalysis {
    pub comment_count: usize,
    pub overall_sentiment: OverallSentiment,
    pub top_keywords: Vec<KeywordCount>,
    pub topic_analysis: Vec<CommentTopic>,
    #[serde(skip)]
    pub comments: Vec<AnnotatedComment>,
}

/// Runs sentiment, keyword and topic analysis over record sequences.
#[derive(Debug, Clone, Default)]
pub struct TextAnalyzer {
    annotator: SentimentAnnotator,
    normalizer: Normalizer,
    settings: AnalysisSettings,
}

impl TextAnalyzer {
    pub fn new(annotator: SentimentAnnotator, settings: AnalysisSettings) -> Self {
        Self {
            annotator,
            normalizer: Normalizer::new(),
            settings,
        }
    }

    /// Analyze comments in order.
    ///
    /// Sentiment and keywords use the full text. Topic grouping and samples
    /// use the preview text.
    pub fn analyze_comments(&self, records: &[TextRecord]) -> CommentAnalysis {
        let mut keywords = KeywordTable::new();
        let mut distribution = SentimentDistribution::default();

        let comments: Vec<AnnotatedComment> = records
            .iter()
            .map(|record| {
                let sentiment = self.annotator.annotate(&record.text);
                distribution.add(sentiment.label);
                keywords.extend(self.normalizer.normalize(&record.text));
                AnnotatedComment {
                    record: record.clone(),
                    preview: preview(&record.text, self.settings.text_preview_chars),
                    sentiment,
                }
            })
            .collect();

        let polarities: Vec<f64> = comments.iter().map(|c| c.sentiment.polarity).collect();
        let average_polarity = mean(polarities.iter().copied());

        let top_keywords = keywords.top(self.settings.top_keywords);
        let ranked = &top_keywords[..top_keywords.len().min(self.settings.topic_keywords)];
        let previews: Vec<&str> = comments.iter().map(|c| c.preview.as_str()).collect();
        let groups = group_by_keywords(ranked, &previews);
        let topic_analysis = summarize_topics(&groups, &polarities, &previews, self.settings.sample_texts)
            .into_iter()
            .map(CommentTopic::from)
            .collect();

        debug!(
            comments = comments.len(),
            keywords = keywords.len(),
            "Analyzed comments"
        );

        CommentAnalysis {
            comment_count: comments.len(),
            overall_sentiment: OverallSentiment {
                average_polarity,
                sentiment_label: SentimentLabel::from_polarity(average_polarity),
                sentiment_distribution: distribution,
            },
            top_keywords,
            topic_analysis,
            comments,
        }
    }

    /// Build statistics for one subreddit from its posts.
    ///
    /// Each post is scored over its title and selftext combined.
    pub fn subreddit_stats(&self, name: &str, posts: &[PostRecord]) -> SubredditStats {
        let mut stats = SubredditStats::new(name);
        for post in posts {
            let text = post.combined_text();
            let sentiment = self.annotator.annotate(&text);
            stats.record(post, sentiment.polarity, self.normalizer.normalize(&text));
        }
        stats
    }
}

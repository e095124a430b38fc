//! Cross-subreddit trend aggregation.
//!
//! Per-subreddit statistics are collected one subreddit at a time and then
//! reduced into a single [`TrendReport`]. Subreddits whose fetch failed are
//! carried along as [`SubredditOutcome::Failed`] and excluded from every
//! aggregate.

use super::keywords::{KeywordCount, KeywordTable};
use super::record::{format_timestamp, PostRecord};
use super::sentiment::SentimentLabel;
use super::topics::{group_by_keywords, mean};
use serde::Serialize;

/// A post as it appears in trend output.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TrendPost {
    pub id: String,
    pub title: String,
    pub subreddit: String,
    pub score: i64,
    pub num_comments: u64,
    pub created_utc: String,
    pub url: String,
    pub sentiment: f64,
}

impl TrendPost {
    pub fn from_post(post: &PostRecord, sentiment: f64) -> Self {
        Self {
            id: post.id.clone(),
            title: post.title.clone(),
            subreddit: post.subreddit.clone(),
            score: post.score,
            num_comments: post.num_comments,
            created_utc: format_timestamp(post.created_utc),
            url: post.url.clone(),
            sentiment,
        }
    }
}

/// Running statistics for one subreddit.
#[derive(Debug, Clone, Default)]
pub struct SubredditStats {
    pub name: String,
    pub post_count: usize,
    pub total_score: i64,
    pub total_comments: u64,
    pub keywords: KeywordTable,
    /// Polarity of each post, in fetch order.
    pub sentiments: Vec<f64>,
    pub posts: Vec<TrendPost>,
}

impl SubredditStats {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }

    /// Fold one post into the statistics.
    pub fn record<I, S>(&mut self, post: &PostRecord, polarity: f64, tokens: I)
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        self.post_count += 1;
        self.total_score += post.score;
        self.total_comments += post.num_comments;
        self.sentiments.push(polarity);
        self.keywords.extend(tokens);
        self.posts.push(TrendPost::from_post(post, polarity));
    }

    pub fn avg_sentiment(&self) -> f64 {
        mean(self.sentiments.iter().copied())
    }

    pub fn top_keywords(&self, n: usize) -> Vec<KeywordCount> {
        self.keywords.top(n)
    }

    /// `total_score / 100 + total_comments`.
    pub fn activity_score(&self) -> f64 {
        self.total_score as f64 / 100.0 + self.total_comments as f64
    }

    pub fn summary(&self, keywords: usize) -> SubredditSummary {
        SubredditSummary {
            post_count: self.post_count,
            total_score: self.total_score,
            total_comments: self.total_comments,
            avg_sentiment: self.avg_sentiment(),
            top_keywords: self.top_keywords(keywords),
        }
    }
}

/// Result of analyzing one subreddit.
#[derive(Debug, Clone)]
pub enum SubredditOutcome {
    Analyzed(SubredditStats),
    Failed { name: String, error: String },
}

impl SubredditOutcome {
    pub fn name(&self) -> &str {
        match self {
            SubredditOutcome::Analyzed(stats) => &stats.name,
            SubredditOutcome::Failed { name, .. } => name,
        }
    }

    pub fn stats(&self) -> Option<&SubredditStats> {
        match self {
            SubredditOutcome::Analyzed(stats) => Some(stats),
            SubredditOutcome::Failed { .. } => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SubredditSummary {
    pub post_count: usize,
    pub total_score: i64,
    pub total_comments: u64,
    pub avg_sentiment: f64,
    pub top_keywords: Vec<KeywordCount>,
}

/// Per-subreddit entry: statistics or an inline error.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum SubredditDetail {
    Analyzed(SubredditSummary),
    Failed { error: String },
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SubredditEntry {
    pub subreddit: String,
    #[serde(flatten)]
    pub detail: SubredditDetail,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SubredditActivity {
    pub subreddit: String,
    pub activity_score: f64,
    pub post_count: usize,
    pub total_score: i64,
    pub total_comments: u64,
    pub avg_sentiment: f64,
}

/// A title-keyword topic across all fetched posts.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PostTopic {
    pub topic: String,
    pub post_count: usize,
    pub avg_score: f64,
    pub avg_sentiment: f64,
    pub sentiment_label: SentimentLabel,
    pub sample_posts: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TrendReport {
    pub trending_keywords: Vec<KeywordCount>,
    pub average_polarity: f64,
    pub sentiment_label: SentimentLabel,
    pub subreddit_stats: Vec<SubredditEntry>,
    pub subreddit_activity: Vec<SubredditActivity>,
    pub topic_analysis: Vec<PostTopic>,
    pub trending_posts: Vec<TrendPost>,
}

/// Reduces per-subreddit outcomes into a [`TrendReport`].
#[derive(Debug, Clone)]
pub struct TrendAggregator {
    pub trending_keywords: usize,
    pub subreddit_keywords: usize,
    pub topic_keywords: usize,
    pub sample_posts: usize,
    pub trending_posts: usize,
}

impl Default for TrendAggregator {
    fn default() -> Self {
        Self {
            trending_keywords: 20,
            subreddit_keywords: 10,
            topic_keywords: 10,
            sample_posts: 3,
            trending_posts: 10,
        }
    }
}

impl TrendAggregator {
    pub fn aggregate(&self, outcomes: &[SubredditOutcome]) -> TrendReport {
        let analyzed: Vec<&SubredditStats> = outcomes.iter().filter_map(|o| o.stats()).collect();

        let mut keywords = KeywordTable::new();
        for stats in &analyzed {
            keywords.merge(&stats.keywords);
        }
        let trending_keywords = keywords.top(self.trending_keywords);

        let average_polarity = mean(
            analyzed
                .iter()
                .flat_map(|s| s.sentiments.iter().copied()),
        );

        let subreddit_stats = outcomes
            .iter()
            .map(|outcome| SubredditEntry {
                subreddit: outcome.name().to_string(),
                detail: match outcome {
                    SubredditOutcome::Analyzed(stats) => {
                        SubredditDetail::Analyzed(stats.summary(self.subreddit_keywords))
                    }
                    SubredditOutcome::Failed { error, .. } => SubredditDetail::Failed {
                        error: error.clone(),
                    },
                },
            })
            .collect();

        let mut subreddit_activity: Vec<SubredditActivity> = analyzed
            .iter()
            .map(|stats| SubredditActivity {
                subreddit: stats.name.clone(),
                activity_score: stats.activity_score(),
                post_count: stats.post_count,
                total_score: stats.total_score,
                total_comments: stats.total_comments,
                avg_sentiment: stats.avg_sentiment(),
            })
            .collect();
        subreddit_activity.sort_by(|a, b| b.activity_score.total_cmp(&a.activity_score));

        let posts: Vec<&TrendPost> = analyzed.iter().flat_map(|s| s.posts.iter()).collect();
        let topic_analysis = self.title_topics(&trending_keywords, &posts);

        let mut trending_posts: Vec<TrendPost> = posts.iter().map(|p| (*p).clone()).collect();
        trending_posts.sort_by(|a, b| b.score.cmp(&a.score));
        trending_posts.truncate(self.trending_posts);

        TrendReport {
            trending_keywords,
            average_polarity,
            sentiment_label: SentimentLabel::from_polarity(average_polarity),
            subreddit_stats,
            subreddit_activity,
            topic_analysis,
            trending_posts,
        }
    }

    fn title_topics(&self, keywords: &[KeywordCount], posts: &[&TrendPost]) -> Vec<PostTopic> {
        let ranked = &keywords[..keywords.len().min(self.topic_keywords)];
        let titles: Vec<&str> = posts.iter().map(|p| p.title.as_str()).collect();

        group_by_keywords(ranked, &titles)
            .into_iter()
            .map(|group| {
                let members: Vec<&TrendPost> = group.members.iter().map(|&i| posts[i]).collect();
                let avg_sentiment = mean(members.iter().map(|p| p.sentiment));
                PostTopic {
                    topic: group.topic,
                    post_count: members.len(),
                    avg_score: mean(members.iter().map(|p| p.score as f64)),
                    avg_sentiment,
                    sentiment_label: SentimentLabel::from_polarity(avg_sentiment),
                    sample_posts: members
                        .iter()
                        .take(self.sample_posts)
                        .map(|p| p.title.clone())
                        .collect(),
                }
            })
            .collect()
    }
}

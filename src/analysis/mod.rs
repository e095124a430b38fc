//! Text analytics over Reddit comments and posts.
//!
//! Everything here is pure and synchronous: records go in, aggregate
//! analytics come out. Fetching lives in [`crate::reddit`].

pub mod keywords;
pub mod lemma;
pub mod pipeline;
pub mod record;
pub mod sentiment;
pub mod stopwords;
pub mod tokenizer;
pub mod topics;
pub mod trends;

pub use keywords::{KeywordCount, KeywordTable};
pub use pipeline::{
    AnnotatedComment, CommentAnalysis, CommentTopic, OverallSentiment, SentimentDistribution,
    TextAnalyzer,
};
pub use record::{format_timestamp, preview, PostRecord, SubredditRecord, TextRecord, DELETED_AUTHOR};
pub use sentiment::{
    LexiconScorer, SentimentAnnotation, SentimentAnnotator, SentimentLabel, SentimentScore,
    SentimentScorer,
};
pub use tokenizer::Normalizer;
pub use topics::{group_by_keywords, TopicGroup, TopicSummary, MIN_TOPIC_SIZE};
pub use trends::{
    SubredditOutcome, SubredditStats, TrendAggregator, TrendPost, TrendReport,
};

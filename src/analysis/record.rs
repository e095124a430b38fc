//! Validated records consumed by the analytics pipeline.

use chrono::DateTime;
use serde::{Deserialize, Serialize};

/// Author label used when the author account was removed.
pub const DELETED_AUTHOR: &str = "[deleted]";

/// A text-bearing item (usually a comment) fed into the pipeline.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TextRecord {
    pub id: String,
    pub text: String,
    /// Net upvotes.
    pub score: i64,
    /// Unix timestamp (seconds).
    pub created_utc: f64,
    pub author: String,
}

impl TextRecord {
    pub fn new(id: impl Into<String>, text: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            text: text.into(),
            score: 0,
            created_utc: 0.0,
            author: DELETED_AUTHOR.to_string(),
        }
    }
}

/// A Reddit submission.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PostRecord {
    pub id: String,
    pub title: String,
    pub selftext: String,
    pub author: String,
    pub subreddit: String,
    pub score: i64,
    pub upvote_ratio: f64,
    pub num_comments: u64,
    pub created_utc: f64,
    /// Absolute permalink.
    pub url: String,
    pub is_self: bool,
    pub is_nsfw: bool,
}

impl PostRecord {
    /// Title and selftext joined, as scored for sentiment and keywords.
    pub fn combined_text(&self) -> String {
        if self.selftext.is_empty() {
            self.title.clone()
        } else {
            format!("{} {}", self.title, self.selftext)
        }
    }
}

/// A subreddit returned from a subreddit search.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SubredditRecord {
    pub name: String,
    pub title: String,
    pub description: String,
    pub subscribers: u64,
    pub url: String,
    pub created_utc: f64,
    pub is_nsfw: bool,
}

/// Format a Unix timestamp as `YYYY-MM-DD HH:MM:SS` (UTC).
pub fn format_timestamp(created_utc: f64) -> String {
    DateTime::from_timestamp(created_utc as i64, 0)
        .map(|dt| dt.format("%Y-%m-%d %H:%M:%S").to_string())
        .unwrap_or_default()
}

/// Truncate to `max_chars` characters, appending "..." when anything was cut.
pub fn preview(text: &str, max_chars: usize) -> String {
    match text.char_indices().nth(max_chars) {
        Some((idx, _)) => format!("{}...", &text[..idx]),
        None => text.to_string(),
    }
}

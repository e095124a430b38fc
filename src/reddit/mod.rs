//! Reddit data source abstraction.
//!
//! The tool layer talks to Reddit through the [`RedditSource`] trait so
//! analysis can run against the live API or an in-memory fake.

mod client;
pub mod models;
pub mod params;

pub use client::RedditClient;
pub use params::{CommentSort, SearchType, TimeFilter, TimePeriod};

use crate::analysis::{PostRecord, SubredditRecord, TextRecord};
use crate::error::{RedsightError, Result};
use async_trait::async_trait;
use regex::Regex;
use std::sync::LazyLock;

static POST_ID_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)/comments/([a-z0-9]+)/").expect("valid post id regex"));

/// A submission with its flattened comments.
#[derive(Debug, Clone)]
pub struct PostThread {
    pub post: PostRecord,
    pub comments: Vec<TextRecord>,
}

/// Read access to Reddit listings.
#[async_trait]
pub trait RedditSource: Send + Sync {
    /// Search submissions, optionally restricted to one subreddit.
    async fn search_posts(
        &self,
        query: &str,
        subreddit: Option<&str>,
        time_filter: TimeFilter,
        limit: u32,
    ) -> Result<Vec<PostRecord>>;

    /// Search subreddits by name and description.
    async fn search_subreddits(&self, query: &str, limit: u32) -> Result<Vec<SubredditRecord>>;

    /// Fetch a submission and up to `limit` of its comments.
    async fn fetch_post_with_comments(
        &self,
        post_id: &str,
        sort: CommentSort,
        limit: u32,
    ) -> Result<PostThread>;

    /// Top submissions of a subreddit over a period.
    async fn top_posts(
        &self,
        subreddit: &str,
        period: TimePeriod,
        limit: u32,
    ) -> Result<Vec<PostRecord>>;
}

/// Extract the submission id from a Reddit post URL.
pub fn extract_post_id(url: &str) -> Result<String> {
    POST_ID_REGEX
        .captures(url)
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str().to_string())
        .ok_or_else(|| RedsightError::InvalidInput(format!("invalid Reddit post URL: {}", url)))
}

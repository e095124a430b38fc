//! Tool argument payloads.
//!
//! Enumerated values stay as strings here and are validated by the tool
//! so an unknown value surfaces as an invalid-parameter error listing the
//! accepted set.

use serde::de::DeserializeOwned;
use serde::Deserialize;
use serde_json::Value;

use crate::error::{RedsightError, Result};

#[derive(Debug, Clone, Deserialize)]
pub struct SearchArgs {
    pub query: String,
    #[serde(default = "default_search_type")]
    pub search_type: String,
    #[serde(default)]
    pub subreddit: Option<String>,
    #[serde(default = "default_time_filter")]
    pub time_filter: String,
    #[serde(default = "default_search_limit")]
    pub limit: u32,
}

fn default_search_type() -> String {
    "post".to_string()
}

fn default_time_filter() -> String {
    "month".to_string()
}

fn default_search_limit() -> u32 {
    20
}

#[derive(Debug, Clone, Deserialize)]
pub struct AnalyzePostArgs {
    pub post_url: String,
    #[serde(default = "default_comment_sort")]
    pub comment_sort: String,
    #[serde(default = "default_comment_limit")]
    pub comment_limit: u32,
}

fn default_comment_sort() -> String {
    "top".to_string()
}

fn default_comment_limit() -> u32 {
    100
}

#[derive(Debug, Clone, Deserialize)]
pub struct TrendArgs {
    #[serde(default)]
    pub subreddits: Option<Vec<String>>,
    #[serde(default = "default_time_period")]
    pub time_period: String,
    /// Falls back to the configured trend limit.
    #[serde(default)]
    pub limit: Option<u32>,
}

fn default_time_period() -> String {
    "day".to_string()
}

#[derive(Debug, Clone, Deserialize)]
pub struct FetchArgs {
    pub url: String,
    #[serde(default = "default_extract_text")]
    pub extract_text: bool,
    #[serde(default)]
    pub user_agent: Option<String>,
}

fn default_extract_text() -> bool {
    true
}

/// Decode tool arguments; absent arguments are treated as `{}`.
pub fn parse_args<T: DeserializeOwned>(tool: &str, arguments: Option<Value>) -> Result<T> {
    let value = match arguments {
        Some(Value::Null) | None => Value::Object(Default::default()),
        Some(v) => v,
    };
    serde_json::from_value(value)
        .map_err(|e| RedsightError::InvalidInput(format!("invalid arguments for {}: {}", tool, e)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_defaults_applied() {
        let args: SearchArgs = parse_args("search_reddit", Some(json!({"query": "rust"}))).unwrap();
        assert_eq!(args.search_type, "post");
        assert_eq!(args.time_filter, "month");
        assert_eq!(args.limit, 20);
        assert!(args.subreddit.is_none());

        let args: TrendArgs = parse_args("analyze_reddit_trends", None).unwrap();
        assert!(args.subreddits.is_none());
        assert_eq!(args.time_period, "day");
        assert!(args.limit.is_none());

        let args: FetchArgs = parse_args("fetch_webpage", Some(json!({"url": "https://example.com"}))).unwrap();
        assert!(args.extract_text);
    }

    #[test]
    fn test_missing_required_argument() {
        let err = parse_args::<AnalyzePostArgs>("analyze_reddit_post", Some(json!({}))).unwrap_err();
        assert_eq!(err.kind(), "invalid_input");
        assert!(err.to_string().contains("post_url"));
    }
}

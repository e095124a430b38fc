//! Trends command implementation.

use super::run_tool;
use crate::cli::preflight::Operation;
use crate::config::Settings;
use crate::service::ANALYZE_REDDIT_TRENDS;
use anyhow::Result;
use serde_json::json;

/// Run the trends command.
pub async fn run_trends(
    subreddits: &[String],
    period: &str,
    limit: Option<u32>,
    settings: Settings,
) -> Result<()> {
    let progress = if subreddits.is_empty() {
        "Analyzing r/all...".to_string()
    } else {
        format!("Analyzing {} subreddit(s)...", subreddits.len())
    };
    let arguments = json!({
        "subreddits": subreddits,
        "time_period": period,
        "limit": limit,
    });
    run_tool(settings, Operation::Trends, ANALYZE_REDDIT_TRENDS, arguments, &progress).await
}

//! Analyze command implementation.

use super::run_tool;
use crate::cli::preflight::Operation;
use crate::config::Settings;
use crate::service::ANALYZE_REDDIT_POST;
use anyhow::Result;
use serde_json::json;

/// Analyze the comments of one post.
pub async fn run_analyze(post_url: &str, sort: &str, limit: u32, settings: Settings) -> Result<()> {
    let arguments = json!({
        "post_url": post_url,
        "comment_sort": sort,
        "comment_limit": limit,
    });
    run_tool(
        settings,
        Operation::Analyze,
        ANALYZE_REDDIT_POST,
        arguments,
        "Analyzing comments...",
    )
    .await
}

//! Search command implementation.

use super::run_tool;
use crate::cli::preflight::Operation;
use crate::config::Settings;
use crate::service::SEARCH_REDDIT;
use anyhow::Result;
use serde_json::json;

/// Run the search command.
pub async fn run_search(
    query: &str,
    search_type: &str,
    subreddit: Option<&str>,
    time_filter: &str,
    limit: u32,
    settings: Settings,
) -> Result<()> {
    let arguments = json!({
        "query": query,
        "search_type": search_type,
        "subreddit": subreddit,
        "time_filter": time_filter,
        "limit": limit,
    });
    run_tool(settings, Operation::Search, SEARCH_REDDIT, arguments, "Searching Reddit...").await
}

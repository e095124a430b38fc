//! Fetch command implementation.

use super::run_tool;
use crate::cli::preflight::Operation;
use crate::config::Settings;
use crate::service::FETCH_WEBPAGE;
use anyhow::Result;
use serde_json::json;

/// Fetch a page as extracted text, or raw HTML with `raw`.
pub async fn run_fetch(url: &str, raw: bool, user_agent: Option<&str>, settings: Settings) -> Result<()> {
    let arguments = json!({
        "url": url,
        "extract_text": !raw,
        "user_agent": user_agent,
    });
    run_tool(settings, Operation::Fetch, FETCH_WEBPAGE, arguments, "Fetching...").await
}

//! CLI command implementations.

mod analyze;
mod config;
mod doctor;
mod fetch;
mod mcp;
mod search;
mod serve;
mod trends;

pub use analyze::run_analyze;
pub use config::run_config;
pub use doctor::run_doctor;
pub use fetch::run_fetch;
pub use mcp::run_mcp;
pub use search::run_search;
pub use serve::run_serve;
pub use trends::run_trends;

use crate::cli::preflight::{self, Operation};
use crate::cli::Output;
use crate::config::Settings;
use crate::service::ToolService;
use anyhow::Result;
use serde_json::Value;

/// Run one tool and print its JSON response.
async fn run_tool(
    settings: Settings,
    operation: Operation,
    tool: &str,
    arguments: Value,
    progress: &str,
) -> Result<()> {
    if let Err(e) = preflight::check(operation, &settings) {
        Output::error(&e.to_string());
        if let Some(hint) = preflight::hint(&e) {
            Output::info(hint);
        }
        return Err(e.into());
    }

    let service = ToolService::new(settings)?;
    let spinner = Output::spinner(progress);
    let reply = service.call(tool, Some(arguments)).await;
    spinner.finish_and_clear();

    Output::json(&reply.body);
    if let Some(kind) = reply.error_kind {
        anyhow::bail!("{} failed ({})", tool, kind);
    }
    Ok(())
}

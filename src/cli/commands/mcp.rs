//! MCP command implementation.

use crate::config::Settings;
use crate::mcp::McpServer;
use crate::service::ToolService;
use anyhow::Result;
use std::sync::Arc;

/// Run the MCP server.
pub async fn run_mcp(settings: Settings) -> Result<()> {
    let service = ToolService::new(settings)?;
    let server = McpServer::new(Arc::new(service));
    server.run().await
}

//! MCP (Model Context Protocol) server for Redsight.
//!
//! Exposes the Reddit analysis tools to AI assistants.
//! Implements JSON-RPC 2.0 over stdio.

mod protocol;
mod server;
mod tools;

pub use protocol::Tool;
pub use server::McpServer;
pub use tools::tool_definitions;

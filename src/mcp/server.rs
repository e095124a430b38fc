//! MCP server implementation.

use super::protocol::*;
use super::tools::tool_definitions;
use crate::service::ToolService;
use serde_json::{json, Value};
use std::sync::Arc;
use tokio::io::{AsyncBufRead, AsyncBufReadExt, AsyncWrite, AsyncWriteExt, BufReader};
use tracing::{debug, info, warn};

const PROTOCOL_VERSION: &str = "2024-11-05";
const SERVER_NAME: &str = "redsight";
const SERVER_VERSION: &str = env!("CARGO_PKG_VERSION");

/// MCP Server for Redsight.
pub struct McpServer {
    service: Arc<ToolService>,
}

impl McpServer {
    pub fn new(service: Arc<ToolService>) -> Self {
        Self { service }
    }

    /// Run the MCP server (reads from stdin, writes to stdout).
    pub async fn run(&self) -> anyhow::Result<()> {
        info!("Redsight MCP server starting on stdio");
        let stdin = BufReader::new(tokio::io::stdin());
        let stdout = tokio::io::stdout();
        self.serve(stdin, stdout).await
    }

    /// Serve newline-delimited JSON-RPC until the input closes.
    pub async fn serve<R, W>(&self, reader: R, mut writer: W) -> anyhow::Result<()>
    where
        R: AsyncBufRead + Unpin,
        W: AsyncWrite + Unpin,
    {
        let mut lines = reader.lines();
        while let Some(line) = lines.next_line().await? {
            let line = line.trim();
            if line.is_empty() {
                continue;
            }

            if let Some(response) = self.handle_line(line).await {
                let encoded = serde_json::to_string(&response)?;
                writer.write_all(encoded.as_bytes()).await?;
                writer.write_all(b"\n").await?;
                writer.flush().await?;
            }
        }

        info!("Input closed, MCP server stopping");
        Ok(())
    }

    /// Handle one raw line. Returns `None` for notifications.
    pub async fn handle_line(&self, line: &str) -> Option<JsonRpcResponse> {
        let request: JsonRpcRequest = match serde_json::from_str(line) {
            Ok(req) => req,
            Err(e) => {
                warn!("Failed to parse request: {}", e);
                return Some(JsonRpcResponse::error(None, PARSE_ERROR, "Parse error"));
            }
        };

        if request.is_notification() {
            debug!("Notification: {}", request.method);
            return None;
        }
        Some(self.handle_request(request).await)
    }

    /// Handle a single JSON-RPC request.
    async fn handle_request(&self, request: JsonRpcRequest) -> JsonRpcResponse {
        if request.jsonrpc != "2.0" {
            return JsonRpcResponse::error(request.id, INVALID_REQUEST, "Invalid Request: jsonrpc must be \"2.0\"");
        }

        debug!("Request: {}", request.method);
        match request.method.as_str() {
            "initialize" => self.handle_initialize(request.id),
            "initialized" | "notifications/initialized" | "ping" => {
                JsonRpcResponse::success(request.id, json!({}))
            }
            "tools/list" => self.handle_tools_list(request.id),
            "tools/call" => self.handle_tools_call(request.id, request.params).await,
            _ => JsonRpcResponse::error(
                request.id,
                METHOD_NOT_FOUND,
                &format!("Method not found: {}", request.method),
            ),
        }
    }

    fn handle_initialize(&self, id: Option<Value>) -> JsonRpcResponse {
        let result = InitializeResult {
            protocol_version: PROTOCOL_VERSION.to_string(),
            capabilities: ServerCapabilities {
                tools: ToolsCapability { list_changed: false },
            },
            server_info: ServerInfo {
                name: SERVER_NAME.to_string(),
                version: SERVER_VERSION.to_string(),
            },
        };
        respond(id, &result)
    }

    fn handle_tools_list(&self, id: Option<Value>) -> JsonRpcResponse {
        let result = ToolsListResult {
            tools: tool_definitions(),
        };
        respond(id, &result)
    }

    async fn handle_tools_call(&self, id: Option<Value>, params: Option<Value>) -> JsonRpcResponse {
        let params: ToolCallParams = match params {
            Some(p) => match serde_json::from_value(p) {
                Ok(params) => params,
                Err(e) => {
                    return JsonRpcResponse::error(id, INVALID_PARAMS, &format!("Invalid params: {}", e))
                }
            },
            None => return JsonRpcResponse::error(id, INVALID_PARAMS, "Missing params"),
        };

        let reply = self.service.call(&params.name, params.arguments).await;
        let text = match serde_json::to_string_pretty(&reply.body) {
            Ok(text) => text,
            Err(e) => return JsonRpcResponse::error(id, INTERNAL_ERROR, &e.to_string()),
        };
        respond(id, &ToolCallResult::text(text, reply.is_error()))
    }
}

fn respond<T: serde::Serialize>(id: Option<Value>, result: &T) -> JsonRpcResponse {
    match serde_json::to_value(result) {
        Ok(value) => JsonRpcResponse::success(id, value),
        Err(e) => JsonRpcResponse::error(id, INTERNAL_ERROR, &e.to_string()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Settings;

    fn server() -> McpServer {
        let service = ToolService::new(Settings::default()).unwrap();
        McpServer::new(Arc::new(service))
    }

    async fn call(server: &McpServer, line: &str) -> Value {
        let response = server.handle_line(line).await.expect("response");
        serde_json::to_value(response).unwrap()
    }

    #[tokio::test]
    async fn test_initialize() {
        let server = server();
        let response = call(&server, r#"{"jsonrpc":"2.0","id":1,"method":"initialize","params":{}}"#).await;
        assert_eq!(response["id"], 1);
        assert_eq!(response["result"]["protocolVersion"], PROTOCOL_VERSION);
        assert_eq!(response["result"]["serverInfo"]["name"], "redsight");
    }

    #[tokio::test]
    async fn test_notifications_get_no_response() {
        let server = server();
        assert!(server
            .handle_line(r#"{"jsonrpc":"2.0","method":"notifications/initialized"}"#)
            .await
            .is_none());
    }

    #[tokio::test]
    async fn test_null_id_is_a_request() {
        let server = server();
        let response = call(&server, r#"{"jsonrpc":"2.0","id":null,"method":"ping"}"#).await;
        assert!(response["id"].is_null());
        assert_eq!(response["result"], json!({}));
    }

    #[tokio::test]
    async fn test_protocol_errors() {
        let server = server();

        let response = call(&server, "{not json").await;
        assert_eq!(response["error"]["code"], PARSE_ERROR);
        assert!(response["id"].is_null());
        assert_eq!(response["error"].as_object().unwrap().len(), 2);

        let response = call(&server, r#"{"jsonrpc":"1.0","id":2,"method":"ping"}"#).await;
        assert_eq!(response["error"]["code"], INVALID_REQUEST);

        let response = call(&server, r#"{"jsonrpc":"2.0","id":3,"method":"resources/list"}"#).await;
        assert_eq!(response["error"]["code"], METHOD_NOT_FOUND);

        let response = call(&server, r#"{"jsonrpc":"2.0","id":4,"method":"tools/call"}"#).await;
        assert_eq!(response["error"]["code"], INVALID_PARAMS);
    }

    #[tokio::test]
    async fn test_tools_list_and_ping() {
        let server = server();
        let response = call(&server, r#"{"jsonrpc":"2.0","id":"a","method":"tools/list"}"#).await;
        assert_eq!(response["result"]["tools"].as_array().unwrap().len(), 4);

        let response = call(&server, r#"{"jsonrpc":"2.0","id":5,"method":"ping"}"#).await;
        assert_eq!(response["result"], json!({}));
    }

    #[tokio::test]
    async fn test_tool_error_sets_is_error() {
        let server = server();
        let response = call(
            &server,
            r#"{"jsonrpc":"2.0","id":6,"method":"tools/call","params":{"name":"search_reddit","arguments":{"query":"rust"}}}"#,
        )
        .await;

        let result = &response["result"];
        assert_eq!(result["isError"], true);
        let body: Value = serde_json::from_str(result["content"][0]["text"].as_str().unwrap()).unwrap();
        assert_eq!(body["status"], "error");
        assert_eq!(body["error_kind"], "missing_credentials");
    }

    #[tokio::test]
    async fn test_serve_writes_one_line_per_request() {
        let server = server();
        let input = concat!(
            r#"{"jsonrpc":"2.0","id":1,"method":"ping"}"#,
            "\n\n",
            r#"{"jsonrpc":"2.0","method":"initialized"}"#,
            "\n",
            r#"{"jsonrpc":"2.0","id":2,"method":"tools/list"}"#,
            "\n"
        );
        let mut output = Vec::new();
        server.serve(input.as_bytes(), &mut output).await.unwrap();

        let text = String::from_utf8(output).unwrap();
        let ids: Vec<Value> = text
            .lines()
            .map(|l| serde_json::from_str::<Value>(l).unwrap()["id"].clone())
            .collect();
        assert_eq!(ids, vec![json!(1), json!(2)]);
    }
}

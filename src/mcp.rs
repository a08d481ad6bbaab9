//! MCP Server implementation
//!
//! JSON-RPC 2.0 dispatch shared by both transports. The HTTP transport
//! (`crate::http`) posts whole messages in; `run` reads one message per
//! line.

use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use tokio::io::{AsyncBufRead, AsyncBufReadExt, AsyncWrite, AsyncWriteExt, BufReader};

use crate::tools::find_tool;
use crate::Tool;

/// Offered when the client does not name a protocol version
pub const DEFAULT_PROTOCOL_VERSION: &str = "2025-03-26";
pub const SERVER_NAME: &str = "surf-mcp";

pub const PARSE_ERROR: i32 = -32700;
pub const INVALID_REQUEST: i32 = -32600;
pub const METHOD_NOT_FOUND: i32 = -32601;
pub const INVALID_PARAMS: i32 = -32602;
pub const INTERNAL_ERROR: i32 = -32603;

/// MCP JSON-RPC request; `id` is read from the raw message so that an
/// explicit `"id": null` stays distinct from an absent one
#[derive(Debug, Deserialize)]
struct McpRequest {
    jsonrpc: String,
    method: String,
    #[serde(default)]
    params: Value,
}

/// MCP JSON-RPC response
#[derive(Debug, Serialize)]
struct McpResponse {
    jsonrpc: &'static str,
    id: Value,
    #[serde(skip_serializing_if = "Option::is_none")]
    result: Option<Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    error: Option<McpError>,
}

#[derive(Debug, Serialize)]
struct McpError {
    code: i32,
    message: String,
}

impl McpResponse {
    fn ok(id: Value, result: Value) -> Self {
        Self { jsonrpc: "2.0", id, result: Some(result), error: None }
    }

    fn err(id: Value, code: i32, message: impl Into<String>) -> Self {
        Self {
            jsonrpc: "2.0",
            id,
            result: None,
            error: Some(McpError { code, message: message.into() }),
        }
    }

    fn into_value(self) -> Value {
        serde_json::to_value(self).unwrap_or(Value::Null)
    }
}

/// Response for a body that is not JSON at all
pub fn parse_error(detail: impl std::fmt::Display) -> Value {
    McpResponse::err(Value::Null, PARSE_ERROR, format!("Parse error: {detail}")).into_value()
}

/// MCP Server - owns the tool set, transport agnostic
pub struct McpServer {
    tools: Vec<Box<dyn Tool>>,
}

impl McpServer {
    pub fn new(tools: Vec<Box<dyn Tool>>) -> Self {
        Self { tools }
    }

    pub fn tools(&self) -> &[Box<dyn Tool>] {
        &self.tools
    }

    /// Handle one decoded message (single request or batch).
    /// `None` means nothing goes back: notifications, or a batch of them.
    pub async fn handle_message(&self, message: Value) -> Option<Value> {
        match message {
            Value::Array(batch) if batch.is_empty() => Some(
                McpResponse::err(Value::Null, INVALID_REQUEST, "Invalid Request: empty batch").into_value(),
            ),
            Value::Array(batch) => {
                let mut responses = Vec::with_capacity(batch.len());
                for item in batch {
                    if let Some(response) = self.handle_single(item).await {
                        responses.push(response);
                    }
                }
                (!responses.is_empty()).then_some(Value::Array(responses))
            }
            single => self.handle_single(single).await,
        }
    }

    async fn handle_single(&self, message: Value) -> Option<Value> {
        // Absent id: notification. Present, even as null: request.
        let id = message.get("id").cloned();
        let req: McpRequest = match serde_json::from_value(message) {
            Ok(r) => r,
            Err(e) => {
                let id = id.unwrap_or(Value::Null);
                return Some(
                    McpResponse::err(id, INVALID_REQUEST, format!("Invalid Request: {e}")).into_value(),
                )
            }
        };

        if req.jsonrpc != "2.0" {
            let id = id.unwrap_or(Value::Null);
            return Some(
                McpResponse::err(id, INVALID_REQUEST, "Invalid Request: jsonrpc must be \"2.0\"").into_value(),
            );
        }

        // Notifications get no reply
        let id = match id {
            Some(id) if !req.method.starts_with("notifications/") => id,
            _ => {
                tracing::debug!(method = %req.method, "Notification received");
                return None;
            }
        };

        Some(self.handle_request(id, &req.method, req.params).await.into_value())
    }

    async fn handle_request(&self, id: Value, method: &str, params: Value) -> McpResponse {
        match method {
            "initialize" => self.handle_initialize(id, params),
            "ping" => McpResponse::ok(id, json!({})),
            "tools/list" => self.handle_tools_list(id),
            "tools/call" => self.handle_tools_call(id, params).await,
            _ => McpResponse::err(id, METHOD_NOT_FOUND, format!("Method not found: {method}")),
        }
    }

    fn handle_initialize(&self, id: Value, params: Value) -> McpResponse {
        let version = params
            .get("protocolVersion")
            .and_then(|v| v.as_str())
            .unwrap_or(DEFAULT_PROTOCOL_VERSION);
        let client = params.pointer("/clientInfo/name").and_then(|v| v.as_str()).unwrap_or("unknown");
        tracing::info!(client, protocol_version = version, "Client initialized");

        McpResponse::ok(id, json!({
            "protocolVersion": version,
            "capabilities": {
                "tools": {}
            },
            "serverInfo": {
                "name": SERVER_NAME,
                "version": env!("CARGO_PKG_VERSION")
            }
        }))
    }

    fn handle_tools_list(&self, id: Value) -> McpResponse {
        let tools: Vec<Value> = self.tools.iter().map(|t| {
            json!({
                "name": t.name(),
                "description": t.description(),
                "inputSchema": t.schema()
            })
        }).collect();

        McpResponse::ok(id, json!({ "tools": tools }))
    }

    async fn handle_tools_call(&self, id: Value, params: Value) -> McpResponse {
        let name = params.get("name").and_then(|n| n.as_str()).unwrap_or("");
        let args = params.get("arguments").cloned().unwrap_or(json!({}));

        let tool = match find_tool(&self.tools, name) {
            Some(t) => t,
            None => return McpResponse::err(id, INVALID_PARAMS, format!("Unknown tool: {name}")),
        };

        let result = match tool.execute(args).await {
            Ok(result) => result,
            Err(e) => {
                tracing::error!(tool = name, "Tool failed: {e}");
                return McpResponse::err(id, INTERNAL_ERROR, format!("Internal error: {e}"));
            }
        };

        let is_error = result.is_error();
        McpResponse::ok(id, json!({
            "content": [{
                "type": "text",
                "text": result.into_value().to_string()
            }],
            "isError": is_error
        }))
    }

    /// Serve line-delimited JSON-RPC on stdin/stdout until EOF
    pub async fn run_stdio(&self) -> std::io::Result<()> {
        self.run(BufReader::new(tokio::io::stdin()), tokio::io::stdout()).await?;
        tracing::info!("stdin closed, shutting down");
        Ok(())
    }

    /// One message per line in, one response per line out. Blank lines and
    /// notifications produce no output.
    pub async fn run<R, W>(&self, reader: R, mut writer: W) -> std::io::Result<()>
    where
        R: AsyncBufRead + Unpin,
        W: AsyncWrite + Unpin,
    {
        let mut lines = reader.lines();

        while let Some(line) = lines.next_line().await? {
            if line.trim().is_empty() {
                continue;
            }

            let response = match serde_json::from_str::<Value>(&line) {
                Ok(message) => self.handle_message(message).await,
                Err(e) => Some(parse_error(e)),
            };
            if let Some(response) = response {
                let mut output = response.to_string();
                output.push('\n');
                writer.write_all(output.as_bytes()).await?;
                writer.flush().await?;
            }
        }

        Ok(())
    }
}

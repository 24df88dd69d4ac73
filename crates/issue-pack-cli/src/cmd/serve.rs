use crate::tools::{self, Backend, IssueTool};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::io::{BufRead, Write};

pub const PROTOCOL_VERSION: &str = "2024-11-05";

// ---------------------------------------------------------------------------
// JSON-RPC 2.0 protocol types
// ---------------------------------------------------------------------------

#[derive(Debug, Deserialize)]
pub struct JsonRpcRequest {
    #[allow(dead_code)]
    pub jsonrpc: String,
    pub id: Option<Value>,
    pub method: String,
    pub params: Option<Value>,
}

#[derive(Debug, Serialize)]
pub struct JsonRpcResponse {
    pub jsonrpc: &'static str,
    pub id: Option<Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub result: Option<Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<JsonRpcError>,
}

#[derive(Debug, Serialize)]
pub struct JsonRpcError {
    pub code: i32,
    pub message: String,
}

impl JsonRpcResponse {
    fn success(id: Option<Value>, result: Value) -> Self {
        Self {
            jsonrpc: "2.0",
            id,
            result: Some(result),
            error: None,
        }
    }

    fn failure(id: Option<Value>, code: i32, message: impl Into<String>) -> Self {
        Self {
            jsonrpc: "2.0",
            id,
            result: None,
            error: Some(JsonRpcError {
                code,
                message: message.into(),
            }),
        }
    }
}

#[derive(Debug, Serialize)]
struct ToolContent {
    r#type: &'static str,
    text: String,
}

#[derive(Debug, Serialize)]
struct ToolCallResult {
    content: Vec<ToolContent>,
    #[serde(rename = "isError")]
    is_error: bool,
}

// ---------------------------------------------------------------------------
// Server loop
// ---------------------------------------------------------------------------

pub fn run(conn: &super::Connection) -> anyhow::Result<()> {
    let backend = match conn.service() {
        Ok(service) => Backend::new(service),
        Err(e) => {
            tracing::warn!(error = %e, "GitHub credentials unavailable; tool calls will fail");
            Backend::unavailable(e.to_string())
        }
    };
    let tools = tools::all_tools();
    tracing::info!(tools = tools.len(), "MCP server listening on stdio");

    let stdin = std::io::stdin();
    let stdout = std::io::stdout();
    serve_lines(stdin.lock(), stdout.lock(), &tools, &backend)
}

/// Answer one JSON-RPC message per input line until EOF.
pub fn serve_lines<R: BufRead, W: Write>(
    mut reader: R,
    mut writer: W,
    tools: &[Box<dyn IssueTool>],
    backend: &Backend,
) -> anyhow::Result<()> {
    let mut buf = Vec::new();
    loop {
        buf.clear();
        if reader.read_until(b'\n', &mut buf)? == 0 {
            return Ok(());
        }
        let response = match std::str::from_utf8(&buf) {
            Ok(line) => handle_line(line.trim_end_matches(['\n', '\r']), tools, backend),
            Err(e) => Some(JsonRpcResponse::failure(
                None,
                -32700,
                format!("parse error: {e}"),
            )),
        };
        if let Some(response) = response {
            serde_json::to_writer(&mut writer, &response)?;
            writeln!(writer)?;
            writer.flush()?;
        }
    }
}

/// Decode one line. `None` means nothing should be written back.
pub fn handle_line(
    line: &str,
    tools: &[Box<dyn IssueTool>],
    backend: &Backend,
) -> Option<JsonRpcResponse> {
    if line.trim().is_empty() {
        return None;
    }

    let raw: Value = match serde_json::from_str(line) {
        Ok(v) => v,
        Err(e) => {
            return Some(JsonRpcResponse::failure(
                None,
                -32700,
                format!("parse error: {e}"),
            ))
        }
    };

    let Some(object) = raw.as_object() else {
        return Some(JsonRpcResponse::failure(
            None,
            -32600,
            "invalid request: expected an object",
        ));
    };

    // Notifications have no "id" key
    let id = object.get("id").cloned()?;

    let request: JsonRpcRequest = match serde_json::from_value(raw) {
        Ok(r) => r,
        Err(e) => {
            return Some(JsonRpcResponse::failure(
                Some(id),
                -32600,
                format!("invalid request: {e}"),
            ))
        }
    };

    handle_request(&request, tools, backend)
}

// ---------------------------------------------------------------------------
// Request dispatch
// ---------------------------------------------------------------------------

pub fn handle_request(
    req: &JsonRpcRequest,
    tools: &[Box<dyn IssueTool>],
    backend: &Backend,
) -> Option<JsonRpcResponse> {
    let id = req.id.clone();
    let response = match req.method.as_str() {
        "initialized" | "notifications/initialized" => return None,

        "initialize" => JsonRpcResponse::success(
            id,
            serde_json::json!({
                "protocolVersion": PROTOCOL_VERSION,
                "capabilities": {
                    "tools": {}
                },
                "serverInfo": {
                    "name": "github-issue-pack",
                    "version": issue_pack_core::VERSION
                }
            }),
        ),

        "tools/list" => {
            let tool_list: Vec<Value> = tools
                .iter()
                .map(|t| {
                    serde_json::json!({
                        "name": t.name(),
                        "description": t.description(),
                        "inputSchema": t.schema()
                    })
                })
                .collect();
            JsonRpcResponse::success(id, serde_json::json!({ "tools": tool_list }))
        }

        "tools/call" => call_tool(id, req.params.as_ref(), tools, backend),

        other => JsonRpcResponse::failure(id, -32601, format!("method not found: {other}")),
    };
    Some(response)
}

fn call_tool(
    id: Option<Value>,
    params: Option<&Value>,
    tools: &[Box<dyn IssueTool>],
    backend: &Backend,
) -> JsonRpcResponse {
    let Some(params) = params else {
        return JsonRpcResponse::failure(id, -32602, "missing params");
    };
    let Some(tool_name) = params["name"].as_str() else {
        return JsonRpcResponse::failure(id, -32602, "missing tool name in params");
    };
    let Some(tool) = tools.iter().find(|t| t.name() == tool_name) else {
        return JsonRpcResponse::failure(id, -32601, format!("tool not found: {tool_name}"));
    };

    let args = params.get("arguments").cloned().unwrap_or(Value::Null);
    let (text, is_error) = match tool.call(args, backend) {
        Ok(text) => (text, false),
        Err(e) => {
            tracing::info!(tool = tool_name, error = %e, "tool call failed");
            (e, true)
        }
    };

    let call_result = ToolCallResult {
        content: vec![ToolContent {
            r#type: "text",
            text,
        }],
        is_error,
    };
    JsonRpcResponse::success(
        id,
        serde_json::to_value(&call_result)
            .unwrap_or_else(|e| serde_json::json!({"error": e.to_string()})),
    )
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

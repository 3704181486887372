//! JSON-RPC 2.0 and MCP protocol types, client side.
//!
//! The Model Context Protocol runs JSON-RPC 2.0 over newline-delimited
//! JSON on the server process's standard streams. Only the client-facing
//! subset is modeled here: initialize, tools/list and tools/call.

use serde::{Deserialize, Serialize};
use serde_json::Value;

// ── JSON-RPC 2.0 Base Types ─────────────────────────────────────────

/// A JSON-RPC 2.0 request message.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JsonRpcRequest {
    pub jsonrpc: String,
    pub id: RpcId,
    pub method: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub params: Option<Value>,
}

/// A JSON-RPC 2.0 response message (success or error).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JsonRpcResponse {
    pub jsonrpc: String,
    pub id: RpcId,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub result: Option<Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<JsonRpcError>,
}

/// A JSON-RPC 2.0 error object.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JsonRpcError {
    pub code: i64,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<Value>,
}

/// A JSON-RPC 2.0 notification (no id, no response expected).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JsonRpcNotification {
    pub jsonrpc: String,
    pub method: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub params: Option<Value>,
}

/// JSON-RPC request ID. Can be a number or a string per the spec.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(untagged)]
pub enum RpcId {
    Number(i64),
    String(String),
}

impl JsonRpcRequest {
    /// Create a new JSON-RPC 2.0 request.
    pub fn new(id: RpcId, method: impl Into<String>, params: Option<Value>) -> Self {
        Self {
            jsonrpc: "2.0".to_string(),
            id,
            method: method.into(),
            params,
        }
    }
}

impl JsonRpcResponse {
    /// Create a successful response.
    pub fn success(id: RpcId, result: Value) -> Self {
        Self {
            jsonrpc: "2.0".to_string(),
            id,
            result: Some(result),
            error: None,
        }
    }

    /// Create an error response.
    pub fn error(id: RpcId, code: i64, message: impl Into<String>) -> Self {
        Self {
            jsonrpc: "2.0".to_string(),
            id,
            result: None,
            error: Some(JsonRpcError {
                code,
                message: message.into(),
                data: None,
            }),
        }
    }
}

impl JsonRpcNotification {
    /// Create a new JSON-RPC 2.0 notification.
    pub fn new(method: impl Into<String>, params: Option<Value>) -> Self {
        Self {
            jsonrpc: "2.0".to_string(),
            method: method.into(),
            params,
        }
    }
}

// ── MCP Initialize ──────────────────────────────────────────────────

/// Result returned from the `initialize` method.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InitializeResult {
    pub protocol_version: String,
    #[serde(default)]
    pub capabilities: ServerCapabilities,
    pub server_info: ServerInfo,
}

/// Server capabilities advertised during initialization.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ServerCapabilities {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tools: Option<ToolsCapability>,
}

/// Tools capability descriptor.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ToolsCapability {
    #[serde(default)]
    pub list_changed: bool,
}

/// Information about the MCP server.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerInfo {
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub version: Option<String>,
}

// ── MCP tools/list ──────────────────────────────────────────────────

/// Result of `tools/list`. Tool order is whatever the server sent.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ListToolsResult {
    pub tools: Vec<ToolDescriptor>,
}

/// Describes a single tool as advertised by the server.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ToolDescriptor {
    pub name: String,
    pub description: String,
    pub input_schema: Value,
}

// ── MCP tools/call ──────────────────────────────────────────────────

/// Result of `tools/call`.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CallToolResult {
    pub content: Vec<ToolContent>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub structured_content: Option<Value>,
    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    pub is_error: bool,
}

/// Content block within a tool call result.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ToolContent {
    Text { text: String },
}

/// What a completed tool call produced, as seen by the caller.
///
/// Closed variant so callers pattern-match instead of sniffing shapes:
/// plain text, structured data, or an in-band tool error.
#[derive(Debug, Clone, PartialEq)]
pub enum ToolOutput {
    Text(String),
    Structured(Value),
    Error(String),
}

impl CallToolResult {
    /// Collapse the content blocks into a single text payload.
    pub fn joined_text(&self) -> String {
        self.content
            .iter()
            .map(|c| match c {
                ToolContent::Text { text } => text.as_str(),
            })
            .collect::<Vec<_>>()
            .join("\n")
    }
}

// ── MCP Protocol version ────────────────────────────────────────────

/// The MCP protocol version this client speaks.
pub const PROTOCOL_VERSION: &str = "2024-11-05";

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_jsonrpc_request_roundtrip() {
        let req = JsonRpcRequest::new(
            RpcId::Number(1),
            "initialize",
            Some(serde_json::json!({"protocolVersion": "2024-11-05"})),
        );
        let json = serde_json::to_string(&req).unwrap();
        let parsed: JsonRpcRequest = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed.method, "initialize");
        assert_eq!(parsed.id, RpcId::Number(1));
        assert_eq!(parsed.jsonrpc, "2.0");
    }

    #[test]
    fn test_jsonrpc_response_error_roundtrip() {
        let resp = JsonRpcResponse::error(RpcId::Number(2), -32601, "Method not found");
        let json = serde_json::to_string(&resp).unwrap();
        let parsed: JsonRpcResponse = serde_json::from_str(&json).unwrap();
        assert!(parsed.result.is_none());
        let err = parsed.error.unwrap();
        assert_eq!(err.code, -32601);
        assert_eq!(err.message, "Method not found");
    }

    #[test]
    fn test_rpc_id_forms() {
        let json = serde_json::to_string(&RpcId::Number(42)).unwrap();
        assert_eq!(json, "42");
        let parsed: RpcId = serde_json::from_str("\"req-1\"").unwrap();
        assert_eq!(parsed, RpcId::String("req-1".to_string()));
    }

    #[test]
    fn test_initialize_result_parses_minimal() {
        let parsed: InitializeResult = serde_json::from_value(serde_json::json!({
            "protocolVersion": PROTOCOL_VERSION,
            "serverInfo": {"name": "geocoder"}
        }))
        .unwrap();
        assert_eq!(parsed.server_info.name, "geocoder");
        assert!(parsed.capabilities.tools.is_none());
    }

    #[test]
    fn test_tool_descriptor_uses_camel_case_schema() {
        let json = serde_json::to_string(&ToolDescriptor {
            name: "geocode".to_string(),
            description: "Geocode an address".to_string(),
            input_schema: serde_json::json!({"type": "object"}),
        })
        .unwrap();
        assert!(json.contains("inputSchema"));
    }

    #[test]
    fn test_call_tool_result_joined_text() {
        let result = CallToolResult {
            content: vec![
                ToolContent::Text {
                    text: "line one".to_string(),
                },
                ToolContent::Text {
                    text: "line two".to_string(),
                },
            ],
            structured_content: None,
            is_error: false,
        };
        assert_eq!(result.joined_text(), "line one\nline two");
    }

    #[test]
    fn test_call_tool_result_error_flag() {
        let parsed: CallToolResult = serde_json::from_value(serde_json::json!({
            "content": [{"type": "text", "text": "address not found"}],
            "isError": true
        }))
        .unwrap();
        assert!(parsed.is_error);
    }

    #[test]
    fn test_call_tool_result_structured_content() {
        let parsed: CallToolResult = serde_json::from_value(serde_json::json!({
            "content": [{"type": "text", "text": "{}"}],
            "structuredContent": {"latitude": 48.858, "longitude": 2.294}
        }))
        .unwrap();
        let structured = parsed.structured_content.unwrap();
        assert_eq!(structured["latitude"], 48.858);
    }
}

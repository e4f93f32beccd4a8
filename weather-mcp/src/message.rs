//! MCP wire messages.
//!
//! Messages are serialized with a `method` field selecting the variant and a
//! `params` field carrying its payload. Tool responses carry a list of
//! content items (text, image, or resource) plus an `isError` flag so that a
//! failed tool call is still a well-formed response rather than a protocol
//! fault.

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// All message types exchanged between an MCP client and this server.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "method", content = "params", rename_all = "camelCase")]
pub enum McpMessage {
    /// Session setup request from the client.
    Initialize(InitializeParams),

    /// Acknowledgement of a successful `Initialize`.
    Initialized,

    /// Request to execute a named tool.
    #[serde(rename = "tools/call")]
    CallTool(CallToolParams),

    /// Result of a tool execution.
    #[serde(rename = "tools/callResult")]
    CallToolResponse(CallToolResult),

    /// Request for the list of available tools.
    #[serde(rename = "tools/list")]
    ListTools,

    /// The list of available tools.
    #[serde(rename = "tools/listResult")]
    ListToolsResponse(ListToolsResult),

    /// Liveness probe.
    Ping,

    /// Response to a liveness probe.
    PingResponse,

    /// Protocol-level failure (unknown method, unsupported version, ...).
    Error(ErrorData),

    /// Catch-all for methods this server does not know.
    #[serde(other)]
    Unknown,
}

/// Parameters of an `initialize` request.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InitializeParams {
    #[serde(rename = "protocolVersion")]
    pub protocol_version: String,
}

/// Parameters of a `tools/call` request.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CallToolParams {
    /// Name of the tool to call.
    pub name: String,

    /// Arguments matching the tool's declared input schema.
    pub arguments: Option<Value>,
}

/// Result of a tool execution.
///
/// `is_error` is set when the tool converted a domain failure into a
/// human-readable error report; the content is still valid output.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CallToolResult {
    pub content: Vec<Content>,
    #[serde(rename = "isError")]
    pub is_error: bool,
}

/// One content item of a tool response.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum Content {
    Text(TextContent),
    Image(ImageContent),
    Resource(ResourceContent),
}

/// Plain text content.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TextContent {
    pub text: String,
}

/// Image content referencing an externally fetchable URL.
///
/// Map tools return tile URLs this way; the image itself is never fetched by
/// the server.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ImageContent {
    pub data: String,
    #[serde(rename = "mimeType")]
    pub mime_type: String,
}

/// Generic resource content.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ResourceContent {
    pub url: String,
    #[serde(rename = "mimeType")]
    pub mime_type: Option<String>,
}

/// Payload of a protocol-level error message.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorData {
    pub code: i32,
    pub message: String,
    pub data: Option<Value>,
}

/// Payload of a `tools/listResult` message.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ListToolsResult {
    pub tools: Vec<ToolDefinition>,
}

/// Advertised metadata for one registered tool.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ToolDefinition {
    pub name: String,
    pub description: String,
    #[serde(rename = "inputSchema")]
    pub input_schema: Value,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn serialize_initialize() {
        let message = McpMessage::Initialize(InitializeParams {
            protocol_version: "2024-11-05".to_string(),
        });

        let json = serde_json::to_string(&message).unwrap();
        assert!(json.contains("initialize"));
        assert!(json.contains("protocolVersion"));
    }

    #[test]
    fn deserialize_call_tool() {
        let json = r#"{"method":"tools/call","params":{"name":"get_current_weather","arguments":{"city":"London"}}}"#;
        let message: McpMessage = serde_json::from_str(json).unwrap();

        match message {
            McpMessage::CallTool(params) => {
                assert_eq!(params.name, "get_current_weather");
                assert!(params.arguments.is_some());
            }
            _ => panic!("expected CallTool message"),
        }
    }

    #[test]
    fn unknown_method_falls_through() {
        let json = r#"{"method":"resources/subscribe","params":{}}"#;
        let message: McpMessage = serde_json::from_str(json).unwrap();
        assert!(matches!(message, McpMessage::Unknown));
    }

    #[test]
    fn image_content_carries_mime_type() {
        let content = Content::Image(ImageContent {
            data: "https://tile.openweathermap.org/map/temp_new/1/0/0.png".to_string(),
            mime_type: "image/png".to_string(),
        });

        let json = serde_json::to_string(&content).unwrap();
        assert!(json.contains("\"mimeType\":\"image/png\""));
    }
}

//! HTTP serving layer.
//!
//! Clients POST MCP messages to `/api/message` and may additionally follow
//! `/api/events` to observe every response as a Server-Sent Event. Message
//! handling is stateless per request; the only shared state is the tool
//! registry and the SSE broadcast sender.

use std::sync::Arc;

use axum::{
    Json, Router,
    extract::State,
    routing::{get, post},
};
use eyre::{Result, WrapErr};
use tower_http::cors::CorsLayer;
use tracing::{debug, error, info};

use crate::message::{CallToolParams, ErrorData, InitializeParams, ListToolsResult, McpMessage};
use crate::tool::ToolRegistry;
use crate::transport::SseTransport;

/// Server identity and bind address.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub name: String,
    pub version: String,
    pub protocol_version: String,
    pub host: String,
    pub port: u16,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            name: "weather-mcp".to_string(),
            version: env!("CARGO_PKG_VERSION").to_string(),
            protocol_version: "2024-11-05".to_string(),
            host: "127.0.0.1".to_string(),
            port: 3000,
        }
    }
}

/// MCP server bundling a configuration, a tool registry, and the SSE
/// broadcast transport.
pub struct McpServer {
    config: ServerConfig,
    registry: Arc<ToolRegistry>,
    transport: SseTransport,
}

impl McpServer {
    #[must_use]
    pub fn new(config: ServerConfig, registry: ToolRegistry) -> Self {
        Self {
            config,
            registry: Arc::new(registry),
            transport: SseTransport::new(100),
        }
    }

    /// Bind and serve until shut down.
    pub async fn start(&self) -> Result<()> {
        let transport_sender = self.transport.sender();

        let app = Router::new()
            .route("/api/message", post(Self::handle_message))
            .route(
                "/api/events",
                get({
                    let tx = transport_sender.clone();
                    move || async move {
                        let transport = SseTransport::new_with_sender(tx.clone());
                        transport.sse_handler()
                    }
                }),
            )
            .layer(CorsLayer::permissive())
            .with_state(AppState {
                config: self.config.clone(),
                registry: self.registry.clone(),
                transport: transport_sender,
            });

        let addr = format!("{}:{}", self.config.host, self.config.port)
            .parse::<std::net::SocketAddr>()
            .wrap_err("failed to parse server address")?;

        info!(%addr, server = %self.config.name, "MCP server listening");

        axum::serve(tokio::net::TcpListener::bind(addr).await?, app)
            .await
            .wrap_err("server error")?;

        Ok(())
    }

    async fn handle_message(
        State(state): State<AppState>,
        Json(message): Json<McpMessage>,
    ) -> Json<McpMessage> {
        debug!(?message, "received message");

        let response = match message {
            McpMessage::Initialize(params) => Self::handle_initialize(&state, &params),
            McpMessage::CallTool(params) => Self::handle_call_tool(&state, params).await,
            McpMessage::ListTools => Self::handle_list_tools(&state),
            McpMessage::Ping => McpMessage::PingResponse,
            other => {
                error!(?other, "unsupported message type");
                McpMessage::Error(ErrorData {
                    code: -32601,
                    message: "Method not supported".to_string(),
                    data: None,
                })
            }
        };

        // Mirror the response to SSE subscribers; no subscribers is fine.
        if state.transport.send(response.clone()).is_err() {
            debug!("no SSE subscribers for response");
        }

        Json(response)
    }

    fn handle_initialize(state: &AppState, params: &InitializeParams) -> McpMessage {
        info!(version = %params.protocol_version, "initializing session");

        if params.protocol_version == state.config.protocol_version {
            McpMessage::Initialized
        } else {
            McpMessage::Error(ErrorData {
                code: -32000,
                message: format!(
                    "Unsupported protocol version: {}. Server supports: {}",
                    params.protocol_version, state.config.protocol_version
                ),
                data: None,
            })
        }
    }

    async fn handle_call_tool(state: &AppState, params: CallToolParams) -> McpMessage {
        info!(tool = %params.name, "calling tool");

        match state
            .registry
            .call_tool(&params.name, params.arguments)
            .await
        {
            Ok(result) => McpMessage::CallToolResponse(result),
            Err(e) => {
                error!(tool = %params.name, "tool call error: {e}");
                McpMessage::Error(ErrorData {
                    code: -32000,
                    message: format!("Tool call error: {e}"),
                    data: None,
                })
            }
        }
    }

    fn handle_list_tools(state: &AppState) -> McpMessage {
        let tools = state.registry.list_tools();
        McpMessage::ListToolsResponse(ListToolsResult { tools })
    }
}

#[derive(Clone)]
struct AppState {
    config: ServerConfig,
    registry: Arc<ToolRegistry>,
    transport: tokio::sync::broadcast::Sender<McpMessage>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::message::{CallToolResult, Content};
    use crate::tool::{Tool, text_content};
    use async_trait::async_trait;
    use eyre::Result;
    use serde_json::Value;

    struct FixedReportTool;

    #[async_trait]
    impl Tool for FixedReportTool {
        fn name(&self) -> &str {
            "report"
        }

        fn description(&self) -> &str {
            "Returns a fixed weather report"
        }

        fn input_schema(&self) -> Value {
            serde_json::json!({
                "type": "object",
                "properties": { "city": { "type": "string" } }
            })
        }

        async fn call(&self, args: Value) -> Result<CallToolResult> {
            let city = args
                .get("city")
                .and_then(|v| v.as_str())
                .unwrap_or("nowhere");

            Ok(CallToolResult {
                content: vec![text_content(format!("Weather in {city}: clear"))],
                is_error: false,
            })
        }
    }

    fn test_state(registry: ToolRegistry) -> AppState {
        AppState {
            config: ServerConfig::default(),
            registry: Arc::new(registry),
            transport: tokio::sync::broadcast::channel(10).0,
        }
    }

    #[test]
    fn initialize_checks_protocol_version() {
        let state = test_state(ToolRegistry::new());

        let ok = McpServer::handle_initialize(
            &state,
            &InitializeParams {
                protocol_version: state.config.protocol_version.clone(),
            },
        );
        assert!(matches!(ok, McpMessage::Initialized));

        let bad = McpServer::handle_initialize(
            &state,
            &InitializeParams {
                protocol_version: "1999-01-01".to_string(),
            },
        );
        assert!(matches!(bad, McpMessage::Error(_)));
    }

    #[tokio::test]
    async fn call_tool_dispatches_and_reports_missing_tools() {
        let mut registry = ToolRegistry::new();
        registry.register(FixedReportTool);
        let state = test_state(registry);

        let params = CallToolParams {
            name: "report".to_string(),
            arguments: Some(serde_json::json!({ "city": "Oslo" })),
        };
        let response = McpServer::handle_call_tool(&state, params).await;

        match response {
            McpMessage::CallToolResponse(result) => match &result.content[0] {
                Content::Text(text) => assert_eq!(text.text, "Weather in Oslo: clear"),
                _ => panic!("expected text content"),
            },
            _ => panic!("expected CallToolResponse"),
        }

        let missing = CallToolParams {
            name: "nonexistent".to_string(),
            arguments: None,
        };
        let response = McpServer::handle_call_tool(&state, missing).await;
        assert!(matches!(response, McpMessage::Error(_)));
    }

    #[test]
    fn list_tools_lists_registered_tools() {
        let mut registry = ToolRegistry::new();
        registry.register(FixedReportTool);
        let state = test_state(registry);

        match McpServer::handle_list_tools(&state) {
            McpMessage::ListToolsResponse(result) => {
                assert_eq!(result.tools.len(), 1);
                assert_eq!(result.tools[0].name, "report");
            }
            _ => panic!("expected ListToolsResponse"),
        }
    }
}

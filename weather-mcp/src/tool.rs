//! Tool abstraction and registry.
//!
//! A [`Tool`] exposes a name, a description, a JSON schema for its input,
//! and an async `call`. The [`ToolRegistry`] holds every registered tool and
//! dispatches `tools/call` requests by name.

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use eyre::Result;
use serde_json::Value;

use crate::message::{
    CallToolResult, Content, ImageContent, TextContent, ToolDefinition,
};

/// A callable unit exposed over MCP.
///
/// Implementations must not let domain failures escape `call` for anything
/// the caller can plausibly trigger: those are converted into an
/// `is_error: true` report so the protocol layer never sees an unrecovered
/// fault.
#[async_trait]
pub trait Tool: Send + Sync {
    /// Unique tool name, as advertised in `tools/list`.
    fn name(&self) -> &str;

    /// Human-readable description of what the tool does.
    fn description(&self) -> &str;

    /// JSON schema of the tool's input arguments.
    fn input_schema(&self) -> Value;

    /// Execute the tool with JSON arguments.
    async fn call(&self, args: Value) -> Result<CallToolResult>;
}

/// Registry of all tools available on this server.
pub struct ToolRegistry {
    tools: HashMap<String, Arc<dyn Tool>>,
}

impl ToolRegistry {
    #[must_use]
    pub fn new() -> Self {
        Self {
            tools: HashMap::new(),
        }
    }

    /// Register a tool. A tool with the same name is replaced.
    pub fn register<T: Tool + 'static>(&mut self, tool: T) {
        let name = tool.name().to_string();
        self.tools.insert(name, Arc::new(tool));
    }

    /// Call a tool by name.
    ///
    /// Fails if no tool with that name is registered; tool-level failures
    /// are reported inside the returned [`CallToolResult`] instead.
    pub async fn call_tool(&self, name: &str, args: Option<Value>) -> Result<CallToolResult> {
        let tool = self
            .tools
            .get(name)
            .ok_or_else(|| eyre::eyre!("tool not found: {name}"))?;

        tool.call(args.unwrap_or(Value::Null)).await
    }

    /// Definitions of every registered tool, for `tools/list`.
    pub fn list_tools(&self) -> Vec<ToolDefinition> {
        self.tools
            .values()
            .map(|tool| ToolDefinition {
                name: tool.name().to_string(),
                description: tool.description().to_string(),
                input_schema: tool.input_schema(),
            })
            .collect()
    }
}

impl Default for ToolRegistry {
    fn default() -> Self {
        Self::new()
    }
}

/// Create text content for a tool response.
#[must_use]
pub fn text_content(text: impl Into<String>) -> Content {
    Content::Text(TextContent { text: text.into() })
}

/// Create image content referencing a URL.
#[must_use]
pub fn image_content(data: impl Into<String>, mime_type: impl Into<String>) -> Content {
    Content::Image(ImageContent {
        data: data.into(),
        mime_type: mime_type.into(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use schemars::JsonSchema;
    use serde::Deserialize;

    #[derive(Deserialize, JsonSchema)]
    struct EchoInput {
        message: String,
    }

    struct EchoTool;

    #[async_trait]
    impl Tool for EchoTool {
        fn name(&self) -> &str {
            "echo"
        }

        fn description(&self) -> &str {
            "Echoes back the input message"
        }

        fn input_schema(&self) -> Value {
            serde_json::to_value(schemars::schema_for!(EchoInput)).unwrap()
        }

        async fn call(&self, args: Value) -> Result<CallToolResult> {
            let input: EchoInput = serde_json::from_value(args)?;
            Ok(CallToolResult {
                content: vec![text_content(input.message)],
                is_error: false,
            })
        }
    }

    #[tokio::test]
    async fn registry_dispatches_by_name() {
        let mut registry = ToolRegistry::new();
        registry.register(EchoTool);

        let args = serde_json::json!({ "message": "clear skies" });
        let result = registry.call_tool("echo", Some(args)).await.unwrap();

        match &result.content[0] {
            Content::Text(text) => assert_eq!(text.text, "clear skies"),
            _ => panic!("expected text content"),
        }
    }

    #[tokio::test]
    async fn unknown_tool_is_an_error() {
        let registry = ToolRegistry::new();
        assert!(registry.call_tool("missing", None).await.is_err());
    }

    #[test]
    fn list_tools_reports_definitions() {
        let mut registry = ToolRegistry::new();
        registry.register(EchoTool);

        let tools = registry.list_tools();
        assert_eq!(tools.len(), 1);
        assert_eq!(tools[0].name, "echo");
        assert!(tools[0].input_schema.is_object());
    }
}

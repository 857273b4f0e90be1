//! MCP server handler backed by [`ToolRegistry`].

use rmcp::model as m;
use rmcp::service::RequestContext;
use rmcp::{RoleServer, ServerHandler};
use serde_json::Value as Json;
use stats_tools_core::{
    ContentBlock, Execution, ResponseEnvelope, ToolContext, ToolError, ToolRegistry,
};
use std::collections::HashSet;
use std::str::FromStr;
use std::sync::Arc;
use tracing::debug;

/// Output mode for tool results.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum OutputMode {
    /// Rendered report text only. Default.
    #[default]
    Text,
    /// Text plus structured data:
    /// - `list_tools` publishes `output_schema`
    /// - `call_tool` populates `structured_content` on success
    Structured,
}

impl FromStr for OutputMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "text" => Ok(Self::Text),
            "structured" => Ok(Self::Structured),
            other => Err(format!("unknown output mode: {other} (expected text or structured)")),
        }
    }
}

/// MCP server handler backed by a [`ToolRegistry`].
///
/// Every registered tool is published in registration order, filtered by
/// the optional allowlist. Calls never fail at the protocol level: tool
/// failures, unknown names and names outside the allowlist all come back
/// as a `CallToolResult` with `isError` set.
///
/// # Example
///
/// ```ignore
/// use stats_tools_mcp::{OutputMode, RegistryServer, ServiceExt, stdio};
///
/// let server = RegistryServer::new(Arc::new(registry))
///     .with_allowlist(["mining_get_price".to_string()])
///     .with_output_mode(OutputMode::Structured);
/// server.serve(stdio()).await?.waiting().await?;
/// ```
pub struct RegistryServer {
    registry: Arc<ToolRegistry>,
    allowlist: Option<HashSet<String>>,
    output_mode: OutputMode,
    context: ToolContext,
    name: String,
    version: String,
}

impl RegistryServer {
    /// Create a new server from a registry.
    pub fn new(registry: Arc<ToolRegistry>) -> Self {
        Self {
            registry,
            allowlist: None,
            output_mode: OutputMode::default(),
            context: ToolContext::default(),
            name: "stats-tools".to_string(),
            version: env!("CARGO_PKG_VERSION").to_string(),
        }
    }

    /// Only tools in this list will be visible and callable.
    #[must_use]
    pub fn with_allowlist(mut self, allowlist: impl IntoIterator<Item = String>) -> Self {
        self.allowlist = Some(allowlist.into_iter().collect());
        self
    }

    #[must_use]
    pub fn with_output_mode(mut self, mode: OutputMode) -> Self {
        self.output_mode = mode;
        self
    }

    /// Context handed to every tool call.
    #[must_use]
    pub fn with_context(mut self, context: ToolContext) -> Self {
        self.context = context;
        self
    }

    /// Set the server name and version.
    #[must_use]
    pub fn with_info(mut self, name: &str, version: &str) -> Self {
        self.name = name.to_string();
        self.version = version.to_string();
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn version(&self) -> &str {
        &self.version
    }

    pub const fn output_mode(&self) -> OutputMode {
        self.output_mode
    }

    /// Names of the published tools, in registration order.
    pub fn effective_tool_names(&self) -> Vec<String> {
        self.registry
            .list_names()
            .into_iter()
            .filter(|n| self.is_allowed(n))
            .map(str::to_string)
            .collect()
    }

    /// Tool list as published by `list_tools`.
    pub fn tools(&self) -> Vec<m::Tool> {
        self.registry
            .iter_erased()
            .filter(|t| self.is_allowed(t.name()))
            .map(|t| {
                let descriptor = t.descriptor();
                let output_schema = if self.output_mode == OutputMode::Structured {
                    t.output_schema().as_ref().and_then(object_schema)
                } else {
                    None
                };
                m::Tool {
                    name: descriptor.name.into(),
                    title: Some(descriptor.name.to_string()),
                    description: Some(descriptor.description.into()),
                    input_schema: object_schema(&descriptor.input_schema).unwrap_or_default(),
                    annotations: None,
                    output_schema,
                    icons: None,
                    meta: None,
                }
            })
            .collect()
    }

    /// Run one call through the registry and convert the outcome.
    pub async fn invoke(&self, name: &str, args: Option<m::JsonObject>) -> m::CallToolResult {
        if !self.is_allowed(name) {
            debug!(tool = name, "tool not enabled");
            let err = ToolError::Validation {
                subject: "tool name".to_string(),
                violations: vec![format!("tool not enabled on this server: {name}")],
            };
            return to_call_result(
                Execution {
                    envelope: ResponseEnvelope::error(&err),
                    data: None,
                },
                false,
            );
        }

        let args = args.map_or(Json::Null, Json::Object);
        let execution = self.registry.execute(name, args, &self.context).await;
        to_call_result(execution, self.output_mode == OutputMode::Structured)
    }

    fn is_allowed(&self, name: &str) -> bool {
        self.allowlist.as_ref().is_none_or(|set| set.contains(name))
    }
}

/// Convert an [`Execution`] into the MCP result shape.
///
/// Structured content is attached only on success, and only when the report
/// serializes to a JSON object.
pub fn to_call_result(execution: Execution, structured: bool) -> m::CallToolResult {
    let Execution { envelope, data } = execution;
    let content = envelope
        .content
        .into_iter()
        .map(|block| match block {
            ContentBlock::Text { text } => m::Content::text(text),
        })
        .collect();
    let structured_content = if structured && !envelope.is_error {
        data.filter(Json::is_object)
    } else {
        None
    };

    m::CallToolResult {
        content,
        structured_content,
        is_error: Some(envelope.is_error),
        meta: None,
    }
}

/// MCP requires an object at the root of every published schema.
fn object_schema(schema: &Json) -> Option<Arc<m::JsonObject>> {
    schema
        .as_object()
        .filter(|o| o.get("type").and_then(Json::as_str) == Some("object"))
        .cloned()
        .map(Arc::new)
}

#[expect(
    clippy::manual_async_fn,
    reason = "the trait declares `impl Future + Send` return types"
)]
impl ServerHandler for RegistryServer {
    fn initialize(
        &self,
        _params: m::InitializeRequestParam,
        _ctx: RequestContext<RoleServer>,
    ) -> impl std::future::Future<Output = Result<m::InitializeResult, m::ErrorData>> + Send + '_
    {
        async move {
            Ok(m::InitializeResult {
                server_info: m::Implementation {
                    name: self.name.clone(),
                    title: Some(self.name.clone()),
                    version: self.version.clone(),
                    website_url: None,
                    icons: None,
                },
                capabilities: m::ServerCapabilities::builder().enable_tools().build(),
                ..Default::default()
            })
        }
    }

    fn list_tools(
        &self,
        _req: Option<m::PaginatedRequestParam>,
        _ctx: RequestContext<RoleServer>,
    ) -> impl std::future::Future<Output = Result<m::ListToolsResult, m::ErrorData>> + Send + '_
    {
        async move {
            Ok(m::ListToolsResult {
                tools: self.tools(),
                next_cursor: None,
                meta: None,
            })
        }
    }

    fn call_tool(
        &self,
        req: m::CallToolRequestParam,
        _ctx: RequestContext<RoleServer>,
    ) -> impl std::future::Future<Output = Result<m::CallToolResult, m::ErrorData>> + Send + '_
    {
        async move { Ok(self.invoke(&req.name, req.arguments).await) }
    }

    fn ping(
        &self,
        _ctx: RequestContext<RoleServer>,
    ) -> impl std::future::Future<Output = Result<(), m::ErrorData>> + Send + '_ {
        async { Ok(()) }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use stats_tools_core::FAILURE_MARKER;

    fn empty_server() -> RegistryServer {
        RegistryServer::new(Arc::new(ToolRegistry::builder().finish()))
    }

    #[test]
    fn allowlist_filters_names() {
        let server =
            empty_server().with_allowlist(["tool_a".to_string(), "tool_b".to_string()]);
        assert!(server.is_allowed("tool_a"));
        assert!(server.is_allowed("tool_b"));
        assert!(!server.is_allowed("tool_c"));
    }

    #[test]
    fn no_allowlist_allows_everything() {
        assert!(empty_server().is_allowed("any_tool"));
    }

    #[test]
    fn info_and_default_mode() {
        let server = empty_server().with_info("mining-mcp", "1.0.0");
        assert_eq!(server.name(), "mining-mcp");
        assert_eq!(server.version(), "1.0.0");
        assert_eq!(server.output_mode(), OutputMode::Text);
    }

    #[test]
    fn output_mode_parses_case_insensitively() {
        assert_eq!("Structured".parse(), Ok(OutputMode::Structured));
        assert_eq!(" text ".parse(), Ok(OutputMode::Text));
        assert!("json".parse::<OutputMode>().is_err());
    }

    #[test]
    fn object_schema_rejects_non_object_roots() {
        let obj = serde_json::json!({ "type": "object", "properties": {} });
        assert!(object_schema(&obj).is_some());
        assert!(object_schema(&serde_json::json!({ "type": "array" })).is_none());
        assert!(object_schema(&serde_json::json!(true)).is_none());
    }

    #[test]
    fn failed_execution_never_carries_structured_content() {
        let err = ToolError::upstream(503, "/api/v1/prices", "Service Unavailable");
        let result = to_call_result(
            Execution {
                envelope: ResponseEnvelope::error(&err),
                data: Some(serde_json::json!({ "stale": true })),
            },
            true,
        );
        assert_eq!(result.is_error, Some(true));
        assert!(result.structured_content.is_none());
        assert_eq!(result.content.len(), 1);
        let text = result.content[0].raw.as_text().map(|t| t.text.clone());
        assert!(text.is_some_and(|t| t.starts_with(FAILURE_MARKER)));
    }

    #[tokio::test]
    async fn unknown_tool_is_an_error_result() {
        let result = empty_server().invoke("nope", None).await;
        assert_eq!(result.is_error, Some(true));
    }
}

//! Integration tests for the MCP server surface.
//!
//! These exercise `RegistryServer` without a transport: discovery goes
//! through `tools()` and invocation through `invoke()`, the same paths the
//! `ServerHandler` methods delegate to.

use futures::future::BoxFuture;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use serde_json::json;
use stats_tools_core::{
    FAILURE_MARKER, FieldSpec, InputSchema, TextFormat, TextOptions, Tool, ToolContext,
    ToolError, ToolInput, ToolRegistry,
};
use stats_tools_mcp::{OutputMode, RegistryServer};
use std::sync::Arc;

// =============================================================================
// Test tool definitions
// =============================================================================

#[derive(Debug, Deserialize)]
struct FeeInput {
    target_blocks: u32,
}

impl ToolInput for FeeInput {
    fn schema() -> InputSchema {
        InputSchema::new().field(
            FieldSpec::integer("target_blocks", "Confirmation target")
                .min(1.0)
                .max(6.0)
                .default_value(1),
        )
    }
}

#[derive(Debug, Serialize, JsonSchema)]
struct FeeQuote {
    target_blocks: u32,
    sat_per_vb: u32,
}

impl TextFormat for FeeQuote {
    fn fmt_text(&self, opts: &TextOptions) -> String {
        format!(
            "{}\n- Next {} blocks: {} sat/vB",
            opts.heading("Fee Quote"),
            self.target_blocks,
            self.sat_per_vb
        )
    }
}

#[derive(Clone)]
struct FeeTool;

impl Tool for FeeTool {
    type Input = FeeInput;
    type Output = FeeQuote;
    const NAME: &'static str = "quote_fee";
    const DESCRIPTION: &'static str = "Quote a fee rate for a confirmation target";

    fn call(
        &self,
        input: FeeInput,
        _ctx: &ToolContext,
    ) -> BoxFuture<'static, Result<FeeQuote, ToolError>> {
        Box::pin(async move {
            Ok(FeeQuote {
                target_blocks: input.target_blocks,
                sat_per_vb: 12 / input.target_blocks,
            })
        })
    }
}

#[derive(Clone)]
struct OfflineTool;

impl Tool for OfflineTool {
    type Input = stats_tools_core::NoInput;
    type Output = FeeQuote;
    const NAME: &'static str = "offline";
    const DESCRIPTION: &'static str = "Always fails with a network error";

    fn call(
        &self,
        _input: stats_tools_core::NoInput,
        _ctx: &ToolContext,
    ) -> BoxFuture<'static, Result<FeeQuote, ToolError>> {
        Box::pin(async move {
            Err(ToolError::network(
                "request to /api/v1/fees/recommended timed out",
                Some("operation timed out".to_string()),
            ))
        })
    }
}

fn registry() -> Arc<ToolRegistry> {
    Arc::new(
        ToolRegistry::builder()
            .register(FeeTool)
            .register(OfflineTool)
            .finish(),
    )
}

fn first_text(result: &rmcp::model::CallToolResult) -> String {
    result
        .content
        .first()
        .and_then(|c| c.raw.as_text())
        .map(|t| t.text.clone())
        .unwrap_or_default()
}

// =============================================================================
// Discovery
// =============================================================================

#[test]
fn lists_every_tool_in_registration_order() {
    let server = RegistryServer::new(registry());
    assert_eq!(server.effective_tool_names(), vec!["quote_fee", "offline"]);

    let tools = server.tools();
    assert_eq!(tools.len(), 2);
    assert_eq!(tools[0].name, "quote_fee");
    assert_eq!(
        tools[0].input_schema["properties"]["target_blocks"]["maximum"],
        json!(6)
    );
}

#[test]
fn allowlist_hides_tools() {
    let server = RegistryServer::new(registry()).with_allowlist(["offline".to_string()]);
    assert_eq!(server.effective_tool_names(), vec!["offline"]);
    assert_eq!(server.tools().len(), 1);
}

#[test]
fn output_schema_only_in_structured_mode() {
    let text = RegistryServer::new(registry());
    assert!(text.tools().iter().all(|t| t.output_schema.is_none()));

    let structured = RegistryServer::new(registry()).with_output_mode(OutputMode::Structured);
    let tools = structured.tools();
    let schema = tools[0].output_schema.as_ref();
    assert!(schema.is_some_and(|s| s.get("type") == Some(&json!("object"))));
}

// =============================================================================
// Invocation
// =============================================================================

#[tokio::test]
async fn success_in_text_mode_has_no_structured_content() {
    let server = RegistryServer::new(registry());
    let args = json!({ "target_blocks": 3 }).as_object().cloned();

    let result = server.invoke("quote_fee", args).await;
    assert_eq!(result.is_error, Some(false));
    assert_eq!(result.content.len(), 1);
    assert_eq!(first_text(&result), "## Fee Quote\n- Next 3 blocks: 4 sat/vB");
    assert!(result.structured_content.is_none());
}

#[tokio::test]
async fn success_in_structured_mode_carries_data() {
    let server = RegistryServer::new(registry()).with_output_mode(OutputMode::Structured);

    let result = server.invoke("quote_fee", None).await;
    assert_eq!(result.is_error, Some(false));
    assert_eq!(
        result.structured_content,
        Some(json!({ "target_blocks": 1, "sat_per_vb": 12 }))
    );
}

#[tokio::test]
async fn invalid_arguments_are_reported_not_raised() {
    let server = RegistryServer::new(registry());
    let args = json!({ "target_blocks": 0 }).as_object().cloned();

    let result = server.invoke("quote_fee", args).await;
    assert_eq!(result.is_error, Some(true));
    let text = first_text(&result);
    assert!(text.starts_with(FAILURE_MARKER));
    assert!(text.contains("target_blocks: must be >= 1 (got 0)"));
}

#[tokio::test]
async fn tool_failure_becomes_error_result() {
    let server = RegistryServer::new(registry()).with_output_mode(OutputMode::Structured);

    let result = server.invoke("offline", None).await;
    assert_eq!(result.is_error, Some(true));
    assert!(result.structured_content.is_none());
    assert!(first_text(&result).contains("timed out"));
}

#[tokio::test]
async fn names_outside_the_allowlist_are_rejected() {
    let server = RegistryServer::new(registry()).with_allowlist(["offline".to_string()]);

    let result = server.invoke("quote_fee", None).await;
    assert_eq!(result.is_error, Some(true));
    assert!(first_text(&result).contains("tool not enabled on this server: quote_fee"));
}

#[tokio::test]
async fn unknown_names_are_rejected() {
    let server = RegistryServer::new(registry());

    let result = server.invoke("mining_get_weather", None).await;
    assert_eq!(result.is_error, Some(true));
    assert!(first_text(&result).contains("unknown tool: mining_get_weather"));
}

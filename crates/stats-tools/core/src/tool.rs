//! Core tool traits.

use crate::context::ToolContext;
use crate::error::ToolError;
use crate::fmt::TextFormat;
use crate::schema::InputSchema;
use futures::future::BoxFuture;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::Value as Json;

/// Closed, typed input record of a tool.
///
/// The declarative [`InputSchema`] runs first and reports every violation;
/// only a validated, default-filled map is ever deserialized into `Self`.
pub trait ToolInput: DeserializeOwned + Send + 'static {
    fn schema() -> InputSchema;

    fn parse(raw: &Json) -> Result<Self, ToolError> {
        let validated = Self::schema().validate(raw)?;
        serde_json::from_value(Json::Object(validated))
            .map_err(|e| ToolError::invalid_input([format!("input: {e}")]))
    }
}

/// Input of tools that take no parameters.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
pub struct NoInput {}

impl ToolInput for NoInput {
    fn schema() -> InputSchema {
        InputSchema::new()
    }
}

/// A named, self-describing data-retrieval operation.
///
/// # Example
///
/// ```ignore
/// use stats_tools_core::{BoxFuture, NoInput, Tool, ToolContext, ToolError};
///
/// #[derive(Clone)]
/// struct PriceTool { client: Arc<Client> }
///
/// impl Tool for PriceTool {
///     type Input = NoInput;
///     type Output = PriceReport;
///     const NAME: &'static str = "mining_get_price";
///     const DESCRIPTION: &'static str = "Current bitcoin price";
///
///     fn call(&self, _input: NoInput, _ctx: &ToolContext)
///         -> BoxFuture<'static, Result<PriceReport, ToolError>>
///     {
///         let client = Arc::clone(&self.client);
///         Box::pin(async move { Ok(PriceReport::from(client.prices().await?)) })
///     }
/// }
/// ```
pub trait Tool: Send + Sync + 'static {
    /// Validated input record.
    type Input: ToolInput;

    /// Report data; rendered to text for the envelope and serialized for
    /// structured output.
    type Output: TextFormat + Serialize + schemars::JsonSchema + Send + 'static;

    /// Unique name identifying the tool.
    const NAME: &'static str;

    /// Human-readable description of what the tool does.
    const DESCRIPTION: &'static str;

    /// Fetch and assemble the report for a validated input.
    fn call(
        &self,
        input: Self::Input,
        ctx: &ToolContext,
    ) -> BoxFuture<'static, Result<Self::Output, ToolError>>;
}

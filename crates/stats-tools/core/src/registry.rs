//! Tool registry: discovery and never-failing invocation.

use crate::context::ToolContext;
use crate::envelope::ResponseEnvelope;
use crate::error::{ErrorKind, Fault, ToolError, classify};
use crate::fmt::TextFormat;
use crate::schema::output_schema_for;
use crate::tool::{Tool, ToolInput};
use futures::FutureExt;
use futures::future::BoxFuture;
use serde::Serialize;
use serde_json::Value as Json;
use std::collections::{HashMap, HashSet};
use std::panic::AssertUnwindSafe;
use std::sync::Arc;
use tracing::{Instrument, debug, info_span, warn};

/// Immutable identity of a tool, published during discovery.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ToolDescriptor {
    pub name: &'static str,
    pub description: &'static str,
    pub input_schema: Json,
}

/// Outcome of one invocation.
#[derive(Debug, Clone)]
pub struct Execution {
    /// The envelope handed back to the host.
    pub envelope: ResponseEnvelope,
    /// Serialized report data; `None` when the call failed.
    pub data: Option<Json>,
}

impl Execution {
    fn failed(err: &ToolError) -> Self {
        Self {
            envelope: ResponseEnvelope::error(err),
            data: None,
        }
    }
}

/// Stage of a call, recorded when it fails.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    Validating,
    Fetching,
    Formatting,
}

impl Stage {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Validating => "validating",
            Self::Fetching => "fetching",
            Self::Formatting => "formatting",
        }
    }
}

/// Type-erased tool for dynamic dispatch.
pub trait ErasedTool: Send + Sync {
    fn name(&self) -> &'static str;

    fn descriptor(&self) -> &ToolDescriptor;

    /// JSON schema of the structured output.
    fn output_schema(&self) -> Option<Json>;

    /// Validate, fetch and format. Never fails: every fault, including a
    /// panic in tool code, comes back as an error envelope.
    fn execute(&self, args: Json, ctx: &ToolContext) -> BoxFuture<'static, Execution>;
}

struct Registered<T: Tool + Clone> {
    tool: T,
    descriptor: ToolDescriptor,
}

impl<T: Tool + Clone> ErasedTool for Registered<T> {
    fn name(&self) -> &'static str {
        T::NAME
    }

    fn descriptor(&self) -> &ToolDescriptor {
        &self.descriptor
    }

    fn output_schema(&self) -> Option<Json> {
        output_schema_for::<T::Output>()
    }

    fn execute(&self, args: Json, ctx: &ToolContext) -> BoxFuture<'static, Execution> {
        let tool = self.tool.clone();
        let ctx = ctx.clone();
        let span = info_span!("tool_call", tool = T::NAME);

        async move {
            match AssertUnwindSafe(run_stages(tool, args, ctx))
                .catch_unwind()
                .await
            {
                Ok(Ok(execution)) => {
                    debug!("tool call succeeded");
                    execution
                }
                Ok(Err((stage, err))) => report(Some(stage), Fault::Tool(err)),
                Err(payload) => report(None, Fault::Panic(payload)),
            }
        }
        .instrument(span)
        .boxed()
    }
}

async fn run_stages<T: Tool>(
    tool: T,
    args: Json,
    ctx: ToolContext,
) -> Result<Execution, (Stage, ToolError)> {
    debug!(stage = Stage::Validating.as_str());
    let input = T::Input::parse(&args).map_err(|e| (Stage::Validating, e))?;

    debug!(stage = Stage::Fetching.as_str());
    let output = tool
        .call(input, &ctx)
        .await
        .map_err(|e| (Stage::Fetching, e))?;

    debug!(stage = Stage::Formatting.as_str());
    let text = output.fmt_text(ctx.text_options());
    let data = serde_json::to_value(&output)
        .map_err(|e| (Stage::Formatting, ToolError::internal(e)))?;

    Ok(Execution {
        envelope: ResponseEnvelope::success(text),
        data: Some(data),
    })
}

/// The tool-boundary handler: classify, log, wrap.
fn report(stage: Option<Stage>, fault: Fault) -> Execution {
    let err = classify(fault);
    let stage = stage.map_or("panicked", Stage::as_str);
    if err.kind() == ErrorKind::UnexpectedInternal {
        warn!(stage, kind = err.kind().as_str(), error = %err, "tool call failed");
    } else {
        debug!(stage, kind = err.kind().as_str(), error = %err, "tool call failed");
    }
    Execution::failed(&err)
}

/// Registry of tools, in registration order.
#[derive(Clone, Default)]
pub struct ToolRegistry {
    tools: Vec<Arc<dyn ErasedTool>>,
    index: HashMap<&'static str, usize>,
}

impl ToolRegistry {
    /// Create a new registry builder.
    pub fn builder() -> ToolRegistryBuilder {
        ToolRegistryBuilder::default()
    }

    /// Descriptors of every registered tool.
    pub fn descriptors(&self) -> Vec<ToolDescriptor> {
        self.tools.iter().map(|t| t.descriptor().clone()).collect()
    }

    pub fn list_names(&self) -> Vec<&'static str> {
        self.tools.iter().map(|t| t.name()).collect()
    }

    pub fn get(&self, name: &str) -> Option<&Arc<dyn ErasedTool>> {
        self.index.get(name).and_then(|&i| self.tools.get(i))
    }

    pub fn contains(&self, name: &str) -> bool {
        self.index.contains_key(name)
    }

    pub fn len(&self) -> usize {
        self.tools.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tools.is_empty()
    }

    pub fn iter_erased(&self) -> impl Iterator<Item = &Arc<dyn ErasedTool>> {
        self.tools.iter()
    }

    /// Create a subset registry containing only the specified tools.
    ///
    /// Names not found in the registry are silently ignored.
    pub fn subset<'a>(&self, names: impl IntoIterator<Item = &'a str>) -> Self {
        let allowed: HashSet<&str> = names.into_iter().collect();
        self.tools
            .iter()
            .filter(|t| allowed.contains(t.name()))
            .fold(Self::builder(), |b, t| b.register_erased(Arc::clone(t)))
            .finish()
    }

    /// Invoke a tool by name. Unknown names produce an error envelope.
    pub async fn execute(&self, name: &str, args: Json, ctx: &ToolContext) -> Execution {
        match self.get(name) {
            Some(tool) => tool.execute(args, ctx).await,
            None => {
                let err = unknown_tool(name);
                debug!(tool = name, error = %err, "unknown tool");
                Execution::failed(&err)
            }
        }
    }

    /// [`execute`](Self::execute), keeping only the envelope.
    pub async fn call(&self, name: &str, args: Json, ctx: &ToolContext) -> ResponseEnvelope {
        self.execute(name, args, ctx).await.envelope
    }
}

fn unknown_tool(name: &str) -> ToolError {
    ToolError::Validation {
        subject: "tool name".to_string(),
        violations: vec![format!("unknown tool: {name}")],
    }
}

/// Builder for constructing a [`ToolRegistry`].
#[derive(Default)]
pub struct ToolRegistryBuilder {
    items: Vec<Arc<dyn ErasedTool>>,
}

impl ToolRegistryBuilder {
    /// Register a tool. Its descriptor is built once, here.
    #[must_use]
    pub fn register<T>(self, tool: T) -> Self
    where
        T: Tool + Clone,
    {
        let descriptor = ToolDescriptor {
            name: T::NAME,
            description: T::DESCRIPTION,
            input_schema: T::Input::schema().to_json(),
        };
        self.register_erased(Arc::new(Registered { tool, descriptor }))
    }

    #[must_use]
    pub fn register_erased(mut self, erased: Arc<dyn ErasedTool>) -> Self {
        self.items.push(erased);
        self
    }

    /// Build the registry. A later registration replaces an earlier one
    /// with the same name, keeping the earlier position.
    pub fn finish(self) -> ToolRegistry {
        let mut registry = ToolRegistry::default();
        for erased in self.items {
            let name = erased.name();
            if let Some(&i) = registry.index.get(name) {
                registry.tools[i] = erased;
            } else {
                registry.index.insert(name, registry.tools.len());
                registry.tools.push(erased);
            }
        }
        registry
    }
}

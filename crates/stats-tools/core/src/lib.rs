//! Core traits and types for the stats-tools library family.
//!
//! This crate provides:
//! - [`Tool`] trait: typed tool definition with a declarative [`InputSchema`]
//! - [`ToolRegistry`]: discovery and never-failing invocation
//! - [`settle_all`]: concurrent multi-source fetches with partial-failure tolerance
//! - [`TextFormat`] trait and the shared formatting rules in [`fmt`]
//! - [`ToolError`] taxonomy and the uniform [`ResponseEnvelope`]

pub mod aggregate;
pub mod context;
pub mod envelope;
pub mod error;
pub mod fmt;
pub mod registry;
pub mod schema;
pub mod tool;

pub use aggregate::{EndpointResult, settle, settle_all};
pub use context::ToolContext;
pub use envelope::{ContentBlock, FAILURE_MARKER, ResponseEnvelope};
pub use error::{ErrorKind, ToolError};
pub use fmt::{TextFormat, TextOptions, TextStyle};
pub use registry::{ErasedTool, Execution, ToolDescriptor, ToolRegistry, ToolRegistryBuilder};
pub use schema::{FieldSpec, InputSchema};
pub use tool::{NoInput, Tool, ToolInput};

// Re-exported so tool crates can name the return type without depending on futures
pub use futures::future::BoxFuture;

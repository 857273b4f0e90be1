//! MCP server integration for the stats-tools library family.
//!
//! This crate provides [`RegistryServer`], an rmcp-backed server handler
//! that wraps a [`ToolRegistry`](stats_tools_core::ToolRegistry) with
//! optional allowlist filtering.

mod server;

pub use server::{OutputMode, RegistryServer, to_call_result};

// Re-export rmcp types for convenience
pub use rmcp::transport::stdio;
pub use rmcp::{ServerHandler, service::ServiceExt};

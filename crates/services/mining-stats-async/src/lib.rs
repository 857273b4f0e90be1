#![warn(missing_docs)]

//! Async client for a mempool.space-compatible mining statistics API.
//!
//! One method per upstream resource, one GET per call, typed responses and a
//! single bounded timeout per request. There are no retries.

/// HTTP client implementation
pub mod client;
/// Configuration types for the client
pub mod config;
/// Error types
pub mod error;
/// API resource implementations
pub mod resources;
/// Test support utilities (for use in tests)
#[doc(hidden)]
pub mod test_support;
/// Response types
pub mod types;

pub use crate::client::Client;
pub use crate::config::{Config, MiningStatsConfig};
pub use crate::error::MiningStatsError;

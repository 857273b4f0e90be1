//! Mining statistics tools.
//!
//! Each tool wraps one or more calls on a shared [`Client`] with a declarative
//! input schema and a report formatter. [`build_registry`] assembles the full
//! catalogue for a host.

pub mod models;
pub mod profitability;
pub mod tools;

pub use mining_stats_async::Client;
pub use tools::{TOOL_NAMES, build_registry};

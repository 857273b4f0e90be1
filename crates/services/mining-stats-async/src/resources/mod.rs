//! API resource implementations, one GET per method.

/// Block list
pub mod blocks;
/// Prices and fee recommendations
pub mod market;
/// Hashrate, difficulty and pool statistics
pub mod mining;

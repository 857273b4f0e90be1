//! Response types, one module per API area.

/// Block summaries
pub mod blocks;
/// Fee recommendations
pub mod fees;
/// Hashrate, difficulty and pool statistics
pub mod mining;
/// Exchange-rate snapshot
pub mod prices;

pub use blocks::{BlockExtras, BlockPool, BlockSummary};
pub use fees::RecommendedFees;
pub use mining::{
    DifficultyAdjustment, DifficultyAdjustmentPoint, DifficultyPoint, HashratePoint,
    HashrateSummary, PoolStats, PoolsSummary,
};
pub use prices::Prices;

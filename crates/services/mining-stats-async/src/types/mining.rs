use serde::{Deserialize, Serialize};

/// `GET /api/v1/mining/hashrate/{period}`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HashrateSummary {
    /// Daily average hashrate samples, oldest first
    pub hashrates: Vec<HashratePoint>,
    /// Difficulty epochs within the period
    pub difficulty: Vec<DifficultyPoint>,
    /// Current estimate in H/s
    pub current_hashrate: f64,
    /// Current difficulty
    pub current_difficulty: f64,
}

/// One hashrate sample
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HashratePoint {
    /// Unix seconds
    pub timestamp: i64,
    /// Average in H/s
    pub avg_hashrate: f64,
}

/// One difficulty epoch within a hashrate window
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DifficultyPoint {
    /// Unix seconds
    pub time: i64,
    /// Height of the first block of the epoch
    pub height: u64,
    /// Difficulty of the epoch
    pub difficulty: f64,
    /// Ratio to the previous epoch
    pub adjustment: f64,
}

/// Progress toward the next retarget, `GET /api/v1/difficulty-adjustment`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DifficultyAdjustment {
    /// Percent of the current epoch already mined
    pub progress_percent: f64,
    /// Estimated change at the retarget, in percent
    pub difficulty_change: f64,
    /// Unix milliseconds of the estimated retarget
    pub estimated_retarget_date: i64,
    /// Blocks left in the epoch
    pub remaining_blocks: u64,
    /// Milliseconds left in the epoch
    pub remaining_time: i64,
    /// Change applied at the previous retarget, in percent
    pub previous_retarget: f64,
    /// Height of the next retarget
    pub next_retarget_height: u64,
    /// Average block interval of the epoch, in milliseconds
    pub time_avg: i64,
}

/// One row of `GET /api/v1/mining/difficulty-adjustments/{interval}`
///
/// The wire form is a positional array
/// `[timestamp, height, difficulty, adjustment_ratio]`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(from = "(i64, u64, f64, f64)")]
pub struct DifficultyAdjustmentPoint {
    /// Unix seconds
    pub timestamp: i64,
    /// Retarget height
    pub height: u64,
    /// Difficulty after the retarget
    pub difficulty: f64,
    /// New difficulty over the previous one
    pub adjustment: f64,
}

impl From<(i64, u64, f64, f64)> for DifficultyAdjustmentPoint {
    fn from((timestamp, height, difficulty, adjustment): (i64, u64, f64, f64)) -> Self {
        Self {
            timestamp,
            height,
            difficulty,
            adjustment,
        }
    }
}

/// `GET /api/v1/mining/pools/{period}`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PoolsSummary {
    /// Pools ranked by blocks found
    pub pools: Vec<PoolStats>,
    /// Blocks found by every pool in the period
    pub block_count: u64,
    /// Network hashrate estimate in H/s
    pub last_estimated_hashrate: f64,
}

/// One pool's share of a period
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PoolStats {
    /// Numeric pool id
    pub pool_id: u64,
    /// Display name
    pub name: String,
    /// Blocks found in the period
    pub block_count: u64,
    /// 1-based rank
    pub rank: u32,
    /// Blocks without transactions
    pub empty_blocks: u64,
    /// URL slug
    pub slug: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn adjustment_rows_decode_from_arrays() {
        let rows: Vec<DifficultyAdjustmentPoint> =
            serde_json::from_str("[[1713571767, 840000, 86388558925171.02, 1.0099]]").unwrap();
        assert_eq!(rows[0].height, 840_000);
        assert!((rows[0].adjustment - 1.0099).abs() < 1e-12);
    }

    #[test]
    fn short_adjustment_row_is_rejected() {
        let res: Result<Vec<DifficultyAdjustmentPoint>, _> =
            serde_json::from_str("[[1713571767, 840000]]");
        assert!(res.is_err());
    }
}

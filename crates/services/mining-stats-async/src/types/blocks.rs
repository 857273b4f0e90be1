use serde::{Deserialize, Serialize};

/// One block from `GET /api/v1/blocks[/{start_height}]`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BlockSummary {
    /// Block hash
    pub id: String,
    /// Block height
    pub height: u64,
    /// Unix seconds from the header
    pub timestamp: i64,
    /// Number of transactions
    pub tx_count: u64,
    /// Serialized size in bytes
    pub size: u64,
    /// Difficulty the block was mined at
    pub difficulty: f64,
    /// Indexer extras; absent on deployments without mining indexing
    #[serde(default)]
    pub extras: Option<BlockExtras>,
}

impl BlockSummary {
    /// Mining pool name, when known
    #[must_use]
    pub fn pool_name(&self) -> Option<&str> {
        self.extras
            .as_ref()
            .and_then(|x| x.pool.as_ref())
            .map(|p| p.name.as_str())
    }
}

/// Indexer extras of a block
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BlockExtras {
    /// Subsidy plus fees, in satoshis
    pub reward: u64,
    /// Fees only, in satoshis
    pub total_fees: u64,
    /// Attributed pool
    #[serde(default)]
    pub pool: Option<BlockPool>,
}

/// Pool attribution of a block
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BlockPool {
    /// Display name
    pub name: String,
}

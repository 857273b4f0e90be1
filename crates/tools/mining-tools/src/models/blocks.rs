use super::{field, sats_to_btc};
use mining_stats_async::types::{BlockSummary, PoolsSummary};
use schemars::JsonSchema;
use serde::Serialize;
use stats_tools_core::fmt::{
    Table, hashrate_ehs, percent_of, ratio_percent, relative_time_unix, small_magnitude,
    thousands, truncate,
};
use stats_tools_core::{TextFormat, TextOptions};

const UNKNOWN_POOL: &str = "Unknown";

#[derive(Debug, Clone, PartialEq, Serialize, JsonSchema)]
pub struct BlockRow {
    pub height: u64,
    pub hash: String,
    pub timestamp: i64,
    pub tx_count: u64,
    pub size_bytes: u64,
    pub pool: Option<String>,
    pub reward_btc: Option<f64>,
    pub fees_btc: Option<f64>,
}

impl From<BlockSummary> for BlockRow {
    fn from(b: BlockSummary) -> Self {
        let pool = b.pool_name().map(str::to_string);
        Self {
            height: b.height,
            hash: b.id,
            timestamp: b.timestamp,
            tx_count: b.tx_count,
            size_bytes: b.size,
            pool,
            reward_btc: b.extras.as_ref().map(|x| sats_to_btc(x.reward)),
            fees_btc: b.extras.as_ref().map(|x| sats_to_btc(x.total_fees)),
        }
    }
}

fn btc(v: Option<f64>) -> String {
    v.map_or_else(|| "N/A".to_string(), |v| format!("{} BTC", small_magnitude(v, 4)))
}

/// Block table capped at `cap` rows, newest first as received.
pub(crate) fn block_table(rows: &[BlockRow], cap: usize, opts: &TextOptions) -> Vec<String> {
    let (shown, footer) = truncate(rows, cap);
    let now = opts.now();
    let mut table = Table::new(["Height", "Mined", "Pool", "Txs", "Size", "Reward", "Fees"]);
    for b in shown {
        table.row([
            thousands(b.height as f64, 0),
            relative_time_unix(b.timestamp, now),
            b.pool.clone().unwrap_or_else(|| UNKNOWN_POOL.to_string()),
            thousands(b.tx_count as f64, 0),
            format!("{:.2} MB", b.size_bytes as f64 / 1e6),
            btc(b.reward_btc),
            btc(b.fees_btc),
        ]);
    }
    let mut lines = vec![table.render(opts)];
    lines.extend(footer);
    lines
}

#[derive(Debug, Clone, PartialEq, Serialize, JsonSchema)]
pub struct RecentBlocksReport {
    pub start_height: Option<u64>,
    pub limit: usize,
    /// Newest first, as returned upstream
    pub blocks: Vec<BlockRow>,
}

impl RecentBlocksReport {
    pub fn new(blocks: Vec<BlockSummary>, start_height: Option<u64>, limit: usize) -> Self {
        Self {
            start_height,
            limit,
            blocks: blocks.into_iter().map(BlockRow::from).collect(),
        }
    }
}

impl TextFormat for RecentBlocksReport {
    fn fmt_text(&self, opts: &TextOptions) -> String {
        let title = match self.start_height {
            Some(h) => format!("Blocks up to {}", thousands(h as f64, 0)),
            None => "Recent Blocks".to_string(),
        };
        let mut lines = vec![opts.heading(&title)];
        if self.blocks.is_empty() {
            lines.push("No blocks returned.".to_string());
        } else {
            lines.push(String::new());
            lines.extend(block_table(&self.blocks, opts.row_cap(self.limit), opts));
        }
        lines.join("\n")
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, JsonSchema)]
pub struct PoolShare {
    pub rank: u32,
    pub name: String,
    pub blocks: u64,
    pub empty_blocks: u64,
    /// `None` when the period has no blocks
    pub share_percent: Option<f64>,
}

#[derive(Debug, Clone, PartialEq, Serialize, JsonSchema)]
pub struct PoolDistributionReport {
    pub period: String,
    pub total_blocks: u64,
    /// H/s
    pub network_hashrate: f64,
    pub limit: usize,
    /// Ordered by rank
    pub pools: Vec<PoolShare>,
}

impl PoolDistributionReport {
    pub fn new(period: &str, summary: PoolsSummary, limit: usize) -> Self {
        let total = summary.block_count;
        let mut pools: Vec<PoolShare> = summary
            .pools
            .into_iter()
            .map(|p| PoolShare {
                share_percent: percent_of(p.block_count as f64, total as f64),
                rank: p.rank,
                name: p.name,
                blocks: p.block_count,
                empty_blocks: p.empty_blocks,
            })
            .collect();
        pools.sort_by_key(|p| p.rank);
        Self {
            period: period.to_string(),
            total_blocks: total,
            network_hashrate: summary.last_estimated_hashrate,
            limit,
            pools,
        }
    }
}

impl TextFormat for PoolDistributionReport {
    fn fmt_text(&self, opts: &TextOptions) -> String {
        let mut lines = vec![
            opts.heading(&format!("Mining Pool Distribution ({})", self.period)),
            field("Blocks in period", thousands(self.total_blocks as f64, 0)),
            field("Estimated network hashrate", hashrate_ehs(self.network_hashrate)),
        ];
        if self.pools.is_empty() {
            lines.push("No pools reported for this period.".to_string());
            return lines.join("\n");
        }

        let (shown, footer) = truncate(&self.pools, opts.row_cap(self.limit));
        let mut table = Table::new(["Rank", "Pool", "Blocks", "Share", "Empty"]);
        for p in shown {
            table.row([
                p.rank.to_string(),
                p.name.clone(),
                thousands(p.blocks as f64, 0),
                ratio_percent(p.blocks as f64, self.total_blocks as f64),
                p.empty_blocks.to_string(),
            ]);
        }
        lines.push(String::new());
        lines.push(table.render(opts));
        lines.extend(footer);
        lines.join("\n")
    }
}

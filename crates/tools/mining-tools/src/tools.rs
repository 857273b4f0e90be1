//! Tool wrappers over the statistics client.
//!
//! Each tool holds a shared [`Client`] and delegates to one or more of its
//! endpoint methods, then hands the data to a report model.

use crate::models::{
    DifficultyAdjustmentReport, DifficultyHistoryReport, FeeReport, HashrateReport,
    NetworkOverviewReport, PoolDistributionReport, PriceReport, ProfitabilityReport,
    RecentBlocksReport, SourceData,
};
use crate::profitability::{MinerParams, estimate};
use mining_stats_async::Client;
use serde::Deserialize;
use serde_json::{Map, Value as Json};
use stats_tools_core::aggregate::{EndpointResult, settle_all};
use stats_tools_core::schema::{FieldSpec, InputSchema};
use stats_tools_core::{
    BoxFuture, NoInput, Tool, ToolContext, ToolError, ToolInput, ToolRegistry,
};
use std::sync::Arc;
use tracing::debug;

/// Window used for the hashrate tool.
const HASHRATE_PERIOD: &str = "1w";
/// Window used to estimate network hashrate for profitability.
const PROFITABILITY_PERIOD: &str = "3d";

/// Names of every tool [`build_registry`] registers, in order.
pub const TOOL_NAMES: [&str; 9] = [
    PriceTool::NAME,
    HashrateTool::NAME,
    DifficultyAdjustmentTool::NAME,
    FeeEstimatesTool::NAME,
    RecentBlocksTool::NAME,
    PoolDistributionTool::NAME,
    DifficultyHistoryTool::NAME,
    ProfitabilityTool::NAME,
    NetworkOverviewTool::NAME,
];

// ============================================================================
// Price Tool
// ============================================================================

/// Tool for the current BTC price.
#[derive(Clone)]
pub struct PriceTool {
    client: Arc<Client>,
}

impl PriceTool {
    pub fn new(client: Arc<Client>) -> Self {
        Self { client }
    }
}

impl Tool for PriceTool {
    type Input = NoInput;
    type Output = PriceReport;
    const NAME: &'static str = "mining_get_price";
    const DESCRIPTION: &'static str =
        "Get the current Bitcoin price in USD, EUR, GBP, CAD, CHF, AUD and JPY";

    fn call(
        &self,
        _input: NoInput,
        _ctx: &ToolContext,
    ) -> BoxFuture<'static, Result<Self::Output, ToolError>> {
        let client = Arc::clone(&self.client);
        Box::pin(async move { Ok(PriceReport::from(client.prices().await?)) })
    }
}

// ============================================================================
// Hashrate Tool
// ============================================================================

/// Tool for the network hashrate over the last week.
#[derive(Clone)]
pub struct HashrateTool {
    client: Arc<Client>,
}

impl HashrateTool {
    pub fn new(client: Arc<Client>) -> Self {
        Self { client }
    }
}

impl Tool for HashrateTool {
    type Input = NoInput;
    type Output = HashrateReport;
    const NAME: &'static str = "mining_get_hashrate";
    const DESCRIPTION: &'static str =
        "Get the current network hashrate and difficulty with daily averages for the past week";

    fn call(
        &self,
        _input: NoInput,
        _ctx: &ToolContext,
    ) -> BoxFuture<'static, Result<Self::Output, ToolError>> {
        let client = Arc::clone(&self.client);
        Box::pin(async move {
            let summary = client.hashrate(HASHRATE_PERIOD).await?;
            Ok(HashrateReport::new(HASHRATE_PERIOD, summary))
        })
    }
}

// ============================================================================
// DifficultyAdjustment Tool
// ============================================================================

/// Tool for progress toward the next difficulty retarget.
#[derive(Clone)]
pub struct DifficultyAdjustmentTool {
    client: Arc<Client>,
}

impl DifficultyAdjustmentTool {
    pub fn new(client: Arc<Client>) -> Self {
        Self { client }
    }
}

impl Tool for DifficultyAdjustmentTool {
    type Input = NoInput;
    type Output = DifficultyAdjustmentReport;
    const NAME: &'static str = "mining_get_difficulty_adjustment";
    const DESCRIPTION: &'static str =
        "Get progress of the current difficulty epoch and the estimated next adjustment";

    fn call(
        &self,
        _input: NoInput,
        _ctx: &ToolContext,
    ) -> BoxFuture<'static, Result<Self::Output, ToolError>> {
        let client = Arc::clone(&self.client);
        Box::pin(async move {
            Ok(DifficultyAdjustmentReport::from(
                client.difficulty_adjustment().await?,
            ))
        })
    }
}

// ============================================================================
// FeeEstimates Tool
// ============================================================================

/// Tool for recommended transaction fee rates.
#[derive(Clone)]
pub struct FeeEstimatesTool {
    client: Arc<Client>,
}

impl FeeEstimatesTool {
    pub fn new(client: Arc<Client>) -> Self {
        Self { client }
    }
}

impl Tool for FeeEstimatesTool {
    type Input = NoInput;
    type Output = FeeReport;
    const NAME: &'static str = "mining_get_fee_estimates";
    const DESCRIPTION: &'static str =
        "Get recommended fee rates in sat/vB from next-block to minimum relay priority";

    fn call(
        &self,
        _input: NoInput,
        _ctx: &ToolContext,
    ) -> BoxFuture<'static, Result<Self::Output, ToolError>> {
        let client = Arc::clone(&self.client);
        Box::pin(async move { Ok(FeeReport::from(client.recommended_fees().await?)) })
    }
}

// ============================================================================
// RecentBlocks Tool
// ============================================================================

/// Input for mining_get_recent_blocks.
#[derive(Debug, Clone, Deserialize)]
pub struct RecentBlocksInput {
    pub limit: usize,
    pub start_height: Option<u64>,
}

impl ToolInput for RecentBlocksInput {
    fn schema() -> InputSchema {
        InputSchema::new()
            .field(
                FieldSpec::integer("limit", "Number of blocks to show (1-15)")
                    .min(1.0)
                    .max(15.0)
                    .default_value(10),
            )
            .field(
                FieldSpec::integer(
                    "start_height",
                    "Show blocks at and below this height instead of the chain tip",
                )
                .min(0.0),
            )
    }
}

/// Tool for the latest mined blocks.
#[derive(Clone)]
pub struct RecentBlocksTool {
    client: Arc<Client>,
}

impl RecentBlocksTool {
    pub fn new(client: Arc<Client>) -> Self {
        Self { client }
    }
}

impl Tool for RecentBlocksTool {
    type Input = RecentBlocksInput;
    type Output = RecentBlocksReport;
    const NAME: &'static str = "mining_get_recent_blocks";
    const DESCRIPTION: &'static str =
        "List recently mined blocks with pool, transaction count, size, reward and fees";

    fn call(
        &self,
        input: RecentBlocksInput,
        _ctx: &ToolContext,
    ) -> BoxFuture<'static, Result<Self::Output, ToolError>> {
        let client = Arc::clone(&self.client);
        Box::pin(async move {
            let blocks = client.blocks(input.start_height).await?;
            Ok(RecentBlocksReport::new(
                blocks,
                input.start_height,
                input.limit,
            ))
        })
    }
}

// ============================================================================
// PoolDistribution Tool
// ============================================================================

/// Input for mining_get_pool_distribution.
#[derive(Debug, Clone, Deserialize)]
pub struct PoolDistributionInput {
    pub period: String,
    pub limit: usize,
}

impl ToolInput for PoolDistributionInput {
    fn schema() -> InputSchema {
        InputSchema::new()
            .field(
                FieldSpec::string(
                    "period",
                    "Time window: 24h, 3d, 1w, 1m, 3m, 6m, 1y, 2y, 3y or all",
                )
                .pattern("^(24h|3d|1w|1m|3m|6m|1y|2y|3y|all)$")
                .default_value("1w"),
            )
            .field(
                FieldSpec::integer("limit", "Number of pools to show (1-50)")
                    .min(1.0)
                    .max(50.0)
                    .default_value(10),
            )
    }
}

/// Tool for block share by mining pool.
#[derive(Clone)]
pub struct PoolDistributionTool {
    client: Arc<Client>,
}

impl PoolDistributionTool {
    pub fn new(client: Arc<Client>) -> Self {
        Self { client }
    }
}

impl Tool for PoolDistributionTool {
    type Input = PoolDistributionInput;
    type Output = PoolDistributionReport;
    const NAME: &'static str = "mining_get_pool_distribution";
    const DESCRIPTION: &'static str =
        "Rank mining pools by blocks found and share of the network over a time window";

    fn call(
        &self,
        input: PoolDistributionInput,
        _ctx: &ToolContext,
    ) -> BoxFuture<'static, Result<Self::Output, ToolError>> {
        let client = Arc::clone(&self.client);
        Box::pin(async move {
            let summary = client.pools(&input.period).await?;
            Ok(PoolDistributionReport::new(
                &input.period,
                summary,
                input.limit,
            ))
        })
    }
}

// ============================================================================
// DifficultyHistory Tool
// ============================================================================

/// Input for mining_get_difficulty_history.
#[derive(Debug, Clone, Deserialize)]
pub struct DifficultyHistoryInput {
    pub interval: String,
    pub limit: usize,
    pub from_height: Option<u64>,
    pub to_height: Option<u64>,
}

fn heights_ordered(m: &Map<String, Json>) -> bool {
    match (
        m.get("from_height").and_then(Json::as_u64),
        m.get("to_height").and_then(Json::as_u64),
    ) {
        (Some(from), Some(to)) => from <= to,
        _ => true,
    }
}

impl ToolInput for DifficultyHistoryInput {
    fn schema() -> InputSchema {
        InputSchema::new()
            .field(
                FieldSpec::string("interval", "Time window: 3m, 6m, 1y, 2y, 3y or all")
                    .pattern("^(3m|6m|1y|2y|3y|all)$")
                    .default_value("1y"),
            )
            .field(
                FieldSpec::integer("limit", "Number of adjustments to show (1-100)")
                    .min(1.0)
                    .max(100.0)
                    .default_value(10),
            )
            .field(FieldSpec::integer("from_height", "Lowest block height to include").min(0.0))
            .field(FieldSpec::integer("to_height", "Highest block height to include").min(0.0))
            .refine(
                &["from_height", "to_height"],
                "from_height must be less than or equal to to_height",
                heights_ordered,
            )
    }
}

/// Tool for past difficulty retargets.
#[derive(Clone)]
pub struct DifficultyHistoryTool {
    client: Arc<Client>,
}

impl DifficultyHistoryTool {
    pub fn new(client: Arc<Client>) -> Self {
        Self { client }
    }
}

impl Tool for DifficultyHistoryTool {
    type Input = DifficultyHistoryInput;
    type Output = DifficultyHistoryReport;
    const NAME: &'static str = "mining_get_difficulty_history";
    const DESCRIPTION: &'static str =
        "List past difficulty adjustments with the percent change of each retarget";

    fn call(
        &self,
        input: DifficultyHistoryInput,
        _ctx: &ToolContext,
    ) -> BoxFuture<'static, Result<Self::Output, ToolError>> {
        let client = Arc::clone(&self.client);
        Box::pin(async move {
            let points = client.difficulty_adjustments(&input.interval).await?;
            Ok(DifficultyHistoryReport::new(
                &input.interval,
                &points,
                input.from_height,
                input.to_height,
                input.limit,
            ))
        })
    }
}

// ============================================================================
// Profitability Tool
// ============================================================================

/// Input for mining_calculate_profitability.
#[derive(Debug, Clone, Deserialize)]
pub struct ProfitabilityInput {
    pub electricity_cost_kwh: f64,
    pub hardware_efficiency_jth: f64,
    pub hashrate_ths: f64,
    pub pool_fee_percent: f64,
    pub block_reward_btc: f64,
    pub hardware_cost_usd: Option<f64>,
}

impl ToolInput for ProfitabilityInput {
    fn schema() -> InputSchema {
        InputSchema::new()
            .field(
                FieldSpec::number("electricity_cost_kwh", "Electricity price in USD per kWh")
                    .required()
                    .min(0.0),
            )
            .field(
                FieldSpec::number("hardware_efficiency_jth", "Miner efficiency in J/TH")
                    .required()
                    .exclusive_min(0.0),
            )
            .field(
                FieldSpec::number("hashrate_ths", "Miner hashrate in TH/s")
                    .exclusive_min(0.0)
                    .default_value(100),
            )
            .field(
                FieldSpec::number("pool_fee_percent", "Pool fee in percent")
                    .min(0.0)
                    .exclusive_max(100.0)
                    .default_value(2),
            )
            .field(
                FieldSpec::number("block_reward_btc", "Block subsidy in BTC")
                    .exclusive_min(0.0)
                    .max(50.0)
                    .default_value(3.125),
            )
            .field(
                FieldSpec::number(
                    "hardware_cost_usd",
                    "Hardware price in USD; enables the return-on-investment section",
                )
                .exclusive_min(0.0),
            )
    }
}

impl From<&ProfitabilityInput> for MinerParams {
    fn from(i: &ProfitabilityInput) -> Self {
        Self {
            hashrate_ths: i.hashrate_ths,
            hardware_efficiency_jth: i.hardware_efficiency_jth,
            electricity_cost_kwh: i.electricity_cost_kwh,
            pool_fee_percent: i.pool_fee_percent,
            block_reward_btc: i.block_reward_btc,
            hardware_cost_usd: i.hardware_cost_usd,
        }
    }
}

/// Tool for estimating mining revenue, costs, break-even and ROI.
#[derive(Clone)]
pub struct ProfitabilityTool {
    client: Arc<Client>,
}

impl ProfitabilityTool {
    pub fn new(client: Arc<Client>) -> Self {
        Self { client }
    }
}

impl Tool for ProfitabilityTool {
    type Input = ProfitabilityInput;
    type Output = ProfitabilityReport;
    const NAME: &'static str = "mining_calculate_profitability";
    const DESCRIPTION: &'static str = "Estimate daily mining revenue, electricity cost, profit, break-even points and optional ROI from current price and network hashrate";

    fn call(
        &self,
        input: ProfitabilityInput,
        _ctx: &ToolContext,
    ) -> BoxFuture<'static, Result<Self::Output, ToolError>> {
        let client = Arc::clone(&self.client);
        Box::pin(async move {
            // Both sources are required; the first failure wins
            let (prices, hashrate) = futures::try_join!(
                client.prices(),
                client.hashrate(PROFITABILITY_PERIOD)
            )?;
            let params = MinerParams::from(&input);
            Ok(ProfitabilityReport {
                params,
                estimate: estimate(&params, prices.usd, hashrate.current_hashrate),
            })
        })
    }
}

// ============================================================================
// NetworkOverview Tool
// ============================================================================

/// Input for mining_get_network_overview.
#[derive(Debug, Clone, Deserialize)]
pub struct NetworkOverviewInput {
    pub block_count: usize,
    pub include_recent_blocks: bool,
}

impl ToolInput for NetworkOverviewInput {
    fn schema() -> InputSchema {
        InputSchema::new()
            .field(
                FieldSpec::integer("block_count", "Number of recent blocks to show (1-15)")
                    .min(1.0)
                    .max(15.0)
                    .default_value(5),
            )
            .field(
                FieldSpec::boolean("include_recent_blocks", "Include the recent blocks table")
                    .default_value(true),
            )
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum OverviewSource {
    Hashrate,
    Price,
    Difficulty,
    Blocks,
}

impl OverviewSource {
    fn label(self) -> &'static str {
        match self {
            Self::Hashrate => "Hashrate",
            Self::Price => "Price",
            Self::Difficulty => "Difficulty",
            Self::Blocks => "Blocks",
        }
    }

    fn fetch(self, client: Arc<Client>) -> BoxFuture<'static, Result<SourceData, ToolError>> {
        Box::pin(async move {
            Ok(match self {
                Self::Hashrate => SourceData::Hashrate(client.hashrate(HASHRATE_PERIOD).await?),
                Self::Price => SourceData::Price(client.prices().await?),
                Self::Difficulty => SourceData::Difficulty(client.difficulty_adjustment().await?),
                Self::Blocks => SourceData::Blocks(client.blocks(None).await?),
            })
        })
    }
}

/// Composite tool: hashrate, price, difficulty and recent blocks fetched
/// concurrently, rendered with whatever succeeded.
#[derive(Clone)]
pub struct NetworkOverviewTool {
    client: Arc<Client>,
}

impl NetworkOverviewTool {
    pub fn new(client: Arc<Client>) -> Self {
        Self { client }
    }
}

impl Tool for NetworkOverviewTool {
    type Input = NetworkOverviewInput;
    type Output = NetworkOverviewReport;
    const NAME: &'static str = "mining_get_network_overview";
    const DESCRIPTION: &'static str = "Get a combined snapshot of hashrate, price, difficulty adjustment and recent blocks; sources that fail are reported without failing the whole overview";

    fn call(
        &self,
        input: NetworkOverviewInput,
        _ctx: &ToolContext,
    ) -> BoxFuture<'static, Result<Self::Output, ToolError>> {
        let client = Arc::clone(&self.client);
        Box::pin(async move {
            let mut sources = vec![
                OverviewSource::Hashrate,
                OverviewSource::Price,
                OverviewSource::Difficulty,
            ];
            if input.include_recent_blocks {
                sources.push(OverviewSource::Blocks);
            }

            let results = settle_all(
                sources
                    .iter()
                    .map(|s| s.fetch(Arc::clone(&client)))
                    .collect(),
            )
            .await;

            let mut report =
                NetworkOverviewReport::new(input.block_count, input.include_recent_blocks);
            for (source, result) in sources.into_iter().zip(results) {
                match result {
                    EndpointResult::Fulfilled(data) => report.absorb(data),
                    EndpointResult::Rejected(err) => {
                        debug!(source = source.label(), error = %err, "overview source failed");
                        report.mark_missing(source.label(), &err);
                    }
                }
            }
            Ok(report)
        })
    }
}

// ============================================================================
// Registry Builder
// ============================================================================

/// Build a registry containing every mining tool.
pub fn build_registry(client: Arc<Client>) -> ToolRegistry {
    ToolRegistry::builder()
        .register(PriceTool::new(Arc::clone(&client)))
        .register(HashrateTool::new(Arc::clone(&client)))
        .register(DifficultyAdjustmentTool::new(Arc::clone(&client)))
        .register(FeeEstimatesTool::new(Arc::clone(&client)))
        .register(RecentBlocksTool::new(Arc::clone(&client)))
        .register(PoolDistributionTool::new(Arc::clone(&client)))
        .register(DifficultyHistoryTool::new(Arc::clone(&client)))
        .register(ProfitabilityTool::new(Arc::clone(&client)))
        .register(NetworkOverviewTool::new(client))
        .finish()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use stats_tools_core::ErrorKind;

    fn violations(err: ToolError) -> Vec<String> {
        match err {
            ToolError::Validation { violations, .. } => violations,
            other => panic!("expected validation error, got {other:?}"),
        }
    }

    #[test]
    fn difficulty_history_refinement() {
        let err = DifficultyHistoryInput::parse(&json!({"from_height": 900, "to_height": 800}))
            .unwrap_err();
        assert_eq!(
            violations(err),
            vec!["from_height, to_height: from_height must be less than or equal to to_height"]
        );

        let ok = DifficultyHistoryInput::parse(&json!({"from_height": 800})).unwrap();
        assert_eq!(ok.interval, "1y");
        assert_eq!(ok.limit, 10);
        assert_eq!(ok.to_height, None);
    }

    #[test]
    fn profitability_lists_every_violation() {
        let err = ProfitabilityInput::parse(&json!({
            "hardware_efficiency_jth": 0,
            "pool_fee_percent": 100,
            "block_reward_btc": 51
        }))
        .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Validation);
        let v = violations(err);
        assert_eq!(v.len(), 4);
        assert!(v.iter().any(|m| m.starts_with("electricity_cost_kwh: is required")));
        assert!(v.iter().any(|m| m.starts_with("hardware_efficiency_jth: must be > 0")));
        assert!(v.iter().any(|m| m.starts_with("pool_fee_percent: must be < 100")));
        assert!(v.iter().any(|m| m.starts_with("block_reward_btc: must be <= 50")));
    }

    #[test]
    fn profitability_defaults() {
        let input = ProfitabilityInput::parse(&json!({
            "electricity_cost_kwh": 0.05,
            "hardware_efficiency_jth": 20
        }))
        .unwrap();
        assert!((input.hashrate_ths - 100.0).abs() < f64::EPSILON);
        assert!((input.pool_fee_percent - 2.0).abs() < f64::EPSILON);
        assert!((input.block_reward_btc - 3.125).abs() < f64::EPSILON);
        assert!(input.hardware_cost_usd.is_none());
    }

    #[test]
    fn pool_period_pattern() {
        let err = PoolDistributionInput::parse(&json!({"period": "5y", "limit": 0})).unwrap_err();
        assert_eq!(violations(err).len(), 2);
        assert_eq!(
            PoolDistributionInput::parse(&json!({"period": "all"}))
                .unwrap()
                .period,
            "all"
        );
    }

    #[test]
    fn overview_defaults() {
        let input = NetworkOverviewInput::parse(&Json::Null).unwrap();
        assert_eq!(input.block_count, 5);
        assert!(input.include_recent_blocks);
    }

    #[test]
    fn registry_has_every_tool_once() {
        let client = Arc::new(Client::new().unwrap());
        let registry = build_registry(client);
        assert_eq!(registry.list_names(), TOOL_NAMES.to_vec());
        assert!(TOOL_NAMES.iter().all(|n| n.starts_with("mining_")));
    }
}

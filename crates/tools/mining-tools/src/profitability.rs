//! Mining revenue and cost model.

use schemars::JsonSchema;
use serde::Serialize;
use stats_tools_core::fmt::{percent_of, ratio_percent};

/// Blocks the network targets per day.
pub const BLOCKS_PER_DAY: f64 = 144.0;

/// Miner-side parameters, already validated.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, JsonSchema)]
pub struct MinerParams {
    pub hashrate_ths: f64,
    pub hardware_efficiency_jth: f64,
    pub electricity_cost_kwh: f64,
    pub pool_fee_percent: f64,
    pub block_reward_btc: f64,
    pub hardware_cost_usd: Option<f64>,
}

/// Daily figures for one miner at current network conditions.
#[derive(Debug, Clone, PartialEq, Serialize, JsonSchema)]
pub struct ProfitabilityEstimate {
    pub btc_price_usd: f64,
    pub network_hashrate_ths: f64,
    /// Fraction of the network, 0 when the network hashrate is 0.
    pub network_share: f64,
    pub btc_per_day: f64,
    pub revenue_usd: f64,
    pub pool_fee_usd: f64,
    pub power_kw: f64,
    pub energy_kwh_per_day: f64,
    pub electricity_usd: f64,
    pub profit_usd: f64,
    /// `None` when no BTC is earned after fees.
    pub break_even_btc_price: Option<f64>,
    pub break_even_electricity_kwh: Option<f64>,
    /// Present only when a hardware cost was given.
    pub roi: Option<RoiEstimate>,
}

#[derive(Debug, Clone, PartialEq, Serialize, JsonSchema)]
pub struct RoiEstimate {
    pub hardware_cost_usd: f64,
    /// `None` when the daily profit is not positive.
    pub payback_days: Option<f64>,
    /// Daily profit as a percentage of the hardware cost.
    pub daily_recovery_percent: Option<f64>,
}

impl ProfitabilityEstimate {
    pub fn network_share_percent(&self) -> f64 {
        self.network_share * 100.0
    }

    /// Rendered share of revenue kept after the pool fee and electricity.
    pub fn margin(&self) -> String {
        ratio_percent(self.profit_usd, self.revenue_usd)
    }
}

/// Estimate daily profitability from the current BTC price (USD) and the
/// network hashrate (H/s).
pub fn estimate(
    params: &MinerParams,
    btc_price_usd: f64,
    network_hashrate_hs: f64,
) -> ProfitabilityEstimate {
    let network_hashrate_ths = network_hashrate_hs / 1e12;
    let network_share = if network_hashrate_ths > 0.0 {
        params.hashrate_ths / network_hashrate_ths
    } else {
        0.0
    };

    let fee_fraction = params.pool_fee_percent / 100.0;
    let btc_per_day = network_share * BLOCKS_PER_DAY * params.block_reward_btc;
    let revenue_usd = btc_per_day * btc_price_usd;
    let pool_fee_usd = revenue_usd * fee_fraction;

    let power_kw = params.hashrate_ths * params.hardware_efficiency_jth / 1000.0;
    let energy_kwh_per_day = power_kw * 24.0;
    let electricity_usd = energy_kwh_per_day * params.electricity_cost_kwh;
    let profit_usd = revenue_usd - pool_fee_usd - electricity_usd;

    let net_btc_per_day = btc_per_day * (1.0 - fee_fraction);
    let break_even_btc_price = (net_btc_per_day > 0.0).then(|| electricity_usd / net_btc_per_day);
    let break_even_electricity_kwh =
        (energy_kwh_per_day > 0.0).then(|| (revenue_usd - pool_fee_usd) / energy_kwh_per_day);

    let roi = params.hardware_cost_usd.map(|cost| RoiEstimate {
        hardware_cost_usd: cost,
        payback_days: (profit_usd > 0.0).then(|| cost / profit_usd),
        daily_recovery_percent: percent_of(profit_usd, cost),
    });

    ProfitabilityEstimate {
        btc_price_usd,
        network_hashrate_ths,
        network_share,
        btc_per_day,
        revenue_usd,
        pool_fee_usd,
        power_kw,
        energy_kwh_per_day,
        electricity_usd,
        profit_usd,
        break_even_btc_price,
        break_even_electricity_kwh,
        roi,
    }
}

use super::field;
use crate::profitability::{MinerParams, ProfitabilityEstimate};
use schemars::JsonSchema;
use serde::Serialize;
use stats_tools_core::fmt::{
    currency, hashrate_ehs, percent, signed_percent_opt, small_magnitude, thousands,
};
use stats_tools_core::{TextFormat, TextOptions};

#[derive(Debug, Clone, PartialEq, Serialize, JsonSchema)]
pub struct ProfitabilityReport {
    pub params: MinerParams,
    pub estimate: ProfitabilityEstimate,
}

fn per_kwh(v: f64) -> String {
    format!("${} per kWh", small_magnitude(v, 4))
}

impl TextFormat for ProfitabilityReport {
    fn fmt_text(&self, opts: &TextOptions) -> String {
        let p = &self.params;
        let e = &self.estimate;

        let mut sections = vec![opts.heading("Mining Profitability Estimate")];

        sections.push(
            [
                opts.heading("Your Setup"),
                field("Hashrate", format!("{} TH/s", thousands(p.hashrate_ths, 2))),
                field(
                    "Efficiency",
                    format!("{} J/TH", thousands(p.hardware_efficiency_jth, 2)),
                ),
                field("Power draw", format!("{} kW", thousands(e.power_kw, 2))),
                field("Electricity", per_kwh(p.electricity_cost_kwh)),
                field("Pool fee", percent(p.pool_fee_percent)),
                field("Block reward", format!("{} BTC", small_magnitude(p.block_reward_btc, 4))),
            ]
            .join("\n"),
        );

        sections.push(
            [
                opts.heading("Network"),
                field("BTC price", currency(e.btc_price_usd)),
                field("Network hashrate", hashrate_ehs(e.network_hashrate_ths * 1e12)),
                field(
                    "Your share",
                    format!("{}%", small_magnitude(e.network_share_percent(), 4)),
                ),
            ]
            .join("\n"),
        );

        sections.push(
            [
                opts.heading("Daily Estimate"),
                field("BTC mined", format!("{} BTC", small_magnitude(e.btc_per_day, 4))),
                field("Revenue", currency(e.revenue_usd)),
                field("Pool fee", currency(-e.pool_fee_usd)),
                field(
                    "Electricity",
                    format!(
                        "{} ({} kWh)",
                        currency(-e.electricity_usd),
                        thousands(e.energy_kwh_per_day, 2)
                    ),
                ),
                field("Net profit", currency(e.profit_usd)),
                field("Margin", e.margin()),
                field("Monthly profit (30d)", currency(e.profit_usd * 30.0)),
                field("Yearly profit (365d)", currency(e.profit_usd * 365.0)),
            ]
            .join("\n"),
        );

        sections.push(
            [
                opts.heading("Break-even"),
                field(
                    "BTC price",
                    e.break_even_btc_price
                        .map_or_else(|| "N/A".to_string(), currency),
                ),
                field(
                    "Electricity cost",
                    e.break_even_electricity_kwh
                        .map_or_else(|| "N/A".to_string(), per_kwh),
                ),
            ]
            .join("\n"),
        );

        if let Some(roi) = &e.roi {
            let payback = roi.payback_days.map_or_else(
                || "not reachable at current profit".to_string(),
                |days| format!("{} days ({:.1} years)", thousands(days, 1), days / 365.0),
            );
            sections.push(
                [
                    opts.heading("Return on Investment"),
                    field("Hardware cost", currency(roi.hardware_cost_usd)),
                    field("Payback period", payback),
                    field(
                        "Daily recovery",
                        format!("{} of hardware cost", signed_percent_opt(roi.daily_recovery_percent)),
                    ),
                ]
                .join("\n"),
            );
        }

        sections.join("\n\n")
    }
}

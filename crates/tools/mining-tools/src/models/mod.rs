//! Report models and their text formatting.
//!
//! Every report is built from validated gateway data, serializes as the
//! tool's structured output, and renders through [`TextFormat`].
//!
//! [`TextFormat`]: stats_tools_core::TextFormat

mod blocks;
mod market;
mod network;
mod overview;
mod profitability;

pub use blocks::{BlockRow, PoolDistributionReport, PoolShare, RecentBlocksReport};
pub use market::{CurrencyRate, FeeReport, PriceReport};
pub use network::{
    DifficultyAdjustmentReport, DifficultyEntry, DifficultyHistoryReport, HashrateReport,
    HashrateSample,
};
pub use overview::{HashrateSnapshot, NetworkOverviewReport, PriceSnapshot, SourceNotice};
pub(crate) use overview::SourceData;
pub use profitability::ProfitabilityReport;

use stats_tools_core::fmt::{Trend, signed_percent, signed_percent_opt};
use stats_tools_core::{TextOptions, TextStyle};

const SATS_PER_BTC: f64 = 100_000_000.0;

fn sats_to_btc(sats: u64) -> f64 {
    sats as f64 / SATS_PER_BTC
}

/// `▲ +1.23%` in humanized style, `+1.23% (up)` in plain style.
fn trend_change(change: f64, opts: &TextOptions) -> String {
    let trend = Trend::from_change(change);
    match opts.style {
        TextStyle::Humanized => format!("{} {}", trend.symbol(), signed_percent(change)),
        TextStyle::Plain => format!("{} ({})", signed_percent(change), trend.label()),
    }
}

/// [`trend_change`] for a change that may be undefined.
fn trend_change_opt(change: Option<f64>, opts: &TextOptions) -> String {
    change.map_or_else(|| signed_percent_opt(None), |c| trend_change(c, opts))
}

/// `- label: value` lines in both styles.
fn field(label: &str, value: impl std::fmt::Display) -> String {
    format!("- {label}: {value}")
}

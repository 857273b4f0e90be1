use super::field;
use mining_stats_async::types::{Prices, RecommendedFees};
use schemars::JsonSchema;
use serde::Serialize;
use stats_tools_core::fmt::{Table, currency, relative_time_unix, thousands, utc_date};
use stats_tools_core::{TextFormat, TextOptions};

#[derive(Debug, Clone, PartialEq, Serialize, JsonSchema)]
pub struct CurrencyRate {
    pub code: String,
    pub rate: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, JsonSchema)]
pub struct PriceReport {
    /// Unix seconds of the snapshot
    pub time: i64,
    pub rates: Vec<CurrencyRate>,
}

impl From<Prices> for PriceReport {
    fn from(p: Prices) -> Self {
        Self {
            time: p.time,
            rates: p
                .rates()
                .into_iter()
                .map(|(code, rate)| CurrencyRate {
                    code: code.to_string(),
                    rate,
                })
                .collect(),
        }
    }
}

fn price_in(code: &str, rate: f64) -> String {
    if code == "USD" {
        currency(rate)
    } else {
        format!("{} {code}", thousands(rate, 2))
    }
}

impl TextFormat for PriceReport {
    fn fmt_text(&self, opts: &TextOptions) -> String {
        let mut table = Table::new(["Currency", "Price"]);
        for r in &self.rates {
            table.row([r.code.clone(), price_in(&r.code, r.rate)]);
        }
        format!(
            "{}\n{}\n\n{}",
            opts.heading("Bitcoin Price"),
            field(
                "Updated",
                format!(
                    "{} ({})",
                    utc_date(self.time),
                    relative_time_unix(self.time, opts.now())
                )
            ),
            table.render(opts)
        )
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, JsonSchema)]
pub struct FeeReport {
    pub fastest_fee: f64,
    pub half_hour_fee: f64,
    pub hour_fee: f64,
    pub economy_fee: f64,
    pub minimum_fee: f64,
}

impl From<RecommendedFees> for FeeReport {
    fn from(f: RecommendedFees) -> Self {
        Self {
            fastest_fee: f.fastest_fee,
            half_hour_fee: f.half_hour_fee,
            hour_fee: f.hour_fee,
            economy_fee: f.economy_fee,
            minimum_fee: f.minimum_fee,
        }
    }
}

/// Whole rates without decimals, fractional rates with two.
fn fee_rate(v: f64) -> String {
    let decimals = if v.fract() == 0.0 { 0 } else { 2 };
    format!("{} sat/vB", thousands(v, decimals))
}

impl TextFormat for FeeReport {
    fn fmt_text(&self, opts: &TextOptions) -> String {
        let mut table = Table::new(["Priority", "Target", "Fee rate"]);
        for (priority, target, rate) in [
            ("Fastest", "next block", self.fastest_fee),
            ("Half hour", "~30 minutes", self.half_hour_fee),
            ("Hour", "~60 minutes", self.hour_fee),
            ("Economy", "no deadline", self.economy_fee),
            ("Minimum", "relay floor", self.minimum_fee),
        ] {
            table.row([priority.to_string(), target.to_string(), fee_rate(rate)]);
        }
        format!("{}\n\n{}", opts.heading("Fee Estimates"), table.render(opts))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn opts() -> TextOptions {
        TextOptions::new().with_reference_time(chrono::Utc.with_ymd_and_hms(2025, 1, 10, 12, 0, 0).unwrap())
    }

    #[test]
    fn price_report_text() {
        let report = PriceReport {
            time: 1_736_510_100,
            rates: vec![
                CurrencyRate { code: "USD".into(), rate: 94_000.0 },
                CurrencyRate { code: "EUR".into(), rate: 91_250.5 },
            ],
        };
        let text = report.fmt_text(&opts());
        assert!(text.starts_with("## Bitcoin Price"));
        assert!(text.contains("- Updated: 2025-01-10 11:55 UTC (5m ago)"));
        assert!(text.contains("| USD | $94,000.00 |"));
        assert!(text.contains("| EUR | 91,250.50 EUR |"));
    }

    #[test]
    fn fee_rates_keep_fractions() {
        assert_eq!(fee_rate(12.0), "12 sat/vB");
        assert_eq!(fee_rate(1.5), "1.50 sat/vB");
    }
}

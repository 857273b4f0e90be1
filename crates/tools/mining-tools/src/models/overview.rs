use super::blocks::block_table;
use super::{BlockRow, DifficultyAdjustmentReport, field};
use mining_stats_async::types::{BlockSummary, DifficultyAdjustment, HashrateSummary, Prices};
use schemars::JsonSchema;
use serde::Serialize;
use stats_tools_core::fmt::{currency, hashrate_ehs, large_magnitude, utc_date};
use stats_tools_core::{TextFormat, TextOptions, ToolError};

const PLACEHOLDER: &str = "(not retrieved)";

/// Data delivered by one overview source.
#[derive(Debug, Clone)]
pub(crate) enum SourceData {
    Hashrate(HashrateSummary),
    Price(Prices),
    Difficulty(DifficultyAdjustment),
    Blocks(Vec<BlockSummary>),
}

/// A source that failed, rendered in the Data Availability section.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, JsonSchema)]
pub struct SourceNotice {
    pub source: String,
    pub reason: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, JsonSchema)]
pub struct HashrateSnapshot {
    /// H/s
    pub current_hashrate: f64,
    pub current_difficulty: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, JsonSchema)]
pub struct PriceSnapshot {
    pub time: i64,
    pub usd: f64,
}

/// Composite report; every section is optional and missing ones are
/// listed in `notices`.
#[derive(Debug, Clone, PartialEq, Serialize, JsonSchema)]
pub struct NetworkOverviewReport {
    pub block_count: usize,
    pub include_recent_blocks: bool,
    pub hashrate: Option<HashrateSnapshot>,
    pub price: Option<PriceSnapshot>,
    pub difficulty: Option<DifficultyAdjustmentReport>,
    pub blocks: Option<Vec<BlockRow>>,
    pub notices: Vec<SourceNotice>,
}

impl NetworkOverviewReport {
    pub fn new(block_count: usize, include_recent_blocks: bool) -> Self {
        Self {
            block_count,
            include_recent_blocks,
            hashrate: None,
            price: None,
            difficulty: None,
            blocks: None,
            notices: Vec::new(),
        }
    }

    pub(crate) fn absorb(&mut self, data: SourceData) {
        match data {
            SourceData::Hashrate(h) => {
                self.hashrate = Some(HashrateSnapshot {
                    current_hashrate: h.current_hashrate,
                    current_difficulty: h.current_difficulty,
                });
            }
            SourceData::Price(p) => {
                self.price = Some(PriceSnapshot {
                    time: p.time,
                    usd: p.usd,
                });
            }
            SourceData::Difficulty(d) => self.difficulty = Some(d.into()),
            SourceData::Blocks(b) => {
                self.blocks = Some(b.into_iter().map(BlockRow::from).collect());
            }
        }
    }

    pub(crate) fn mark_missing(&mut self, source: &str, err: &ToolError) {
        self.notices.push(SourceNotice {
            source: source.to_string(),
            reason: notice_reason(err),
        });
    }
}

/// Short failure reason for a notice. Upstream errors drop the reason
/// phrase, which can itself read "Service Unavailable".
fn notice_reason(err: &ToolError) -> String {
    match err {
        ToolError::UpstreamApi {
            status, endpoint, ..
        } => format!("upstream API error {status} from {endpoint}"),
        other => other.to_string(),
    }
}

impl TextFormat for NetworkOverviewReport {
    fn fmt_text(&self, opts: &TextOptions) -> String {
        let mut sections = vec![opts.heading("Bitcoin Network Overview")];

        let mut hashrate = vec![opts.heading("Hashrate")];
        match &self.hashrate {
            Some(h) => {
                hashrate.push(field("Current hashrate", hashrate_ehs(h.current_hashrate)));
                hashrate.push(field("Difficulty", large_magnitude(h.current_difficulty)));
            }
            None => hashrate.push(PLACEHOLDER.to_string()),
        }
        sections.push(hashrate.join("\n"));

        let mut price = vec![opts.heading("Price")];
        match &self.price {
            Some(p) => {
                price.push(field("BTC/USD", currency(p.usd)));
                price.push(field("As of", utc_date(p.time)));
            }
            None => price.push(PLACEHOLDER.to_string()),
        }
        sections.push(price.join("\n"));

        let mut difficulty = vec![opts.heading("Difficulty Adjustment")];
        match &self.difficulty {
            Some(d) => difficulty.extend(d.summary_lines(opts)),
            None => difficulty.push(PLACEHOLDER.to_string()),
        }
        sections.push(difficulty.join("\n"));

        if self.include_recent_blocks {
            let mut blocks = vec![opts.heading("Recent Blocks")];
            match &self.blocks {
                Some(rows) if rows.is_empty() => blocks.push("No blocks returned.".to_string()),
                Some(rows) => blocks.extend(block_table(rows, self.block_count, opts)),
                None => blocks.push(PLACEHOLDER.to_string()),
            }
            sections.push(blocks.join("\n"));
        }

        if !self.notices.is_empty() {
            let mut availability = vec![opts.heading("Data Availability")];
            availability.extend(
                self.notices
                    .iter()
                    .map(|n| format!("- {} data unavailable ({})", n.source, n.reason)),
            );
            sections.push(availability.join("\n"));
        }

        sections.join("\n\n")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_sources_get_placeholder_and_one_notice_each() {
        let mut report = NetworkOverviewReport::new(5, true);
        report.absorb(SourceData::Price(Prices {
            time: 1_736_510_400,
            usd: 94_000.0,
            eur: 0.0,
            gbp: 0.0,
            cad: 0.0,
            chf: 0.0,
            aud: 0.0,
            jpy: 0.0,
        }));
        report.mark_missing(
            "Difficulty",
            &ToolError::upstream(429, "/api/v1/difficulty-adjustment", "Too Many Requests"),
        );
        report.mark_missing("Hashrate", &ToolError::network("request timed out", None));

        let text = report.fmt_text(&TextOptions::default());
        assert_eq!(text.matches("unavailable").count(), 2);
        assert!(text.contains("- BTC/USD: $94,000.00"));
        assert!(text.contains(
            "- Difficulty data unavailable (upstream API error 429 from /api/v1/difficulty-adjustment)"
        ));
        assert_eq!(text.matches(PLACEHOLDER).count(), 3);
    }

    #[test]
    fn service_unavailable_counts_as_one_notice() {
        let mut report = NetworkOverviewReport::new(5, true);
        report.mark_missing(
            "Blocks",
            &ToolError::upstream(503, "/api/v1/blocks", "Service Unavailable"),
        );

        let text = report.fmt_text(&TextOptions::default());
        assert_eq!(text.to_lowercase().matches("unavailable").count(), 1);
        assert!(text.contains("- Blocks data unavailable (upstream API error 503 from /api/v1/blocks)"));
    }

    #[test]
    fn blocks_section_can_be_skipped() {
        let report = NetworkOverviewReport::new(5, false);
        let text = report.fmt_text(&TextOptions::default());
        assert!(!text.contains("Recent Blocks"));
        assert!(!text.contains("Data Availability"));
    }
}

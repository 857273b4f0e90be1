use super::{field, trend_change, trend_change_opt};
use mining_stats_async::types::{DifficultyAdjustment, DifficultyAdjustmentPoint, HashrateSummary};
use schemars::JsonSchema;
use serde::Serialize;
use stats_tools_core::fmt::{
    Table, approx_duration, hashrate_ehs, large_magnitude, percent, percent_change, thousands,
    truncate, utc_date,
};
use stats_tools_core::{TextFormat, TextOptions};

/// Daily samples shown in the hashrate table.
const HASHRATE_ROWS: usize = 7;

#[derive(Debug, Clone, PartialEq, Serialize, JsonSchema)]
pub struct HashrateSample {
    pub timestamp: i64,
    pub avg_hashrate: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, JsonSchema)]
pub struct HashrateReport {
    pub period: String,
    /// H/s
    pub current_hashrate: f64,
    pub current_difficulty: f64,
    /// Change from the oldest to the newest sample, in percent
    pub change_percent: Option<f64>,
    /// Newest first
    pub samples: Vec<HashrateSample>,
}

impl HashrateReport {
    pub fn new(period: &str, summary: HashrateSummary) -> Self {
        let change_percent = match (summary.hashrates.first(), summary.hashrates.last()) {
            (Some(oldest), Some(newest)) if summary.hashrates.len() > 1 => {
                percent_change(newest.avg_hashrate, oldest.avg_hashrate)
            }
            _ => None,
        };
        let samples = summary
            .hashrates
            .iter()
            .rev()
            .map(|h| HashrateSample {
                timestamp: h.timestamp,
                avg_hashrate: h.avg_hashrate,
            })
            .collect();
        Self {
            period: period.to_string(),
            current_hashrate: summary.current_hashrate,
            current_difficulty: summary.current_difficulty,
            change_percent,
            samples,
        }
    }
}

impl TextFormat for HashrateReport {
    fn fmt_text(&self, opts: &TextOptions) -> String {
        let mut lines = vec![
            opts.heading(&format!("Network Hashrate ({})", self.period)),
            field("Current hashrate", hashrate_ehs(self.current_hashrate)),
            field("Current difficulty", large_magnitude(self.current_difficulty)),
            field(
                &format!("Change over {}", self.period),
                trend_change_opt(self.change_percent, opts),
            ),
        ];

        if !self.samples.is_empty() {
            let (shown, footer) = truncate(&self.samples, opts.row_cap(HASHRATE_ROWS));
            let mut table = Table::new(["Date", "Average hashrate"]);
            for s in shown {
                table.row([utc_date(s.timestamp), hashrate_ehs(s.avg_hashrate)]);
            }
            lines.push(String::new());
            lines.push(table.render(opts));
            lines.extend(footer);
        }
        lines.join("\n")
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, JsonSchema)]
pub struct DifficultyAdjustmentReport {
    pub progress_percent: f64,
    pub difficulty_change: f64,
    pub previous_retarget: f64,
    pub remaining_blocks: u64,
    pub next_retarget_height: u64,
    /// Unix seconds
    pub estimated_retarget_time: i64,
    pub remaining_seconds: i64,
    pub average_block_seconds: f64,
}

impl From<DifficultyAdjustment> for DifficultyAdjustmentReport {
    fn from(d: DifficultyAdjustment) -> Self {
        Self {
            progress_percent: d.progress_percent,
            difficulty_change: d.difficulty_change,
            previous_retarget: d.previous_retarget,
            remaining_blocks: d.remaining_blocks,
            next_retarget_height: d.next_retarget_height,
            estimated_retarget_time: d.estimated_retarget_date / 1000,
            remaining_seconds: d.remaining_time / 1000,
            average_block_seconds: d.time_avg as f64 / 1000.0,
        }
    }
}

impl DifficultyAdjustmentReport {
    /// Body lines without a heading, shared with the network overview.
    pub(crate) fn summary_lines(&self, opts: &TextOptions) -> Vec<String> {
        vec![
            field("Epoch progress", percent(self.progress_percent)),
            field("Estimated change", trend_change(self.difficulty_change, opts)),
            field(
                "Next retarget",
                format!(
                    "block {} ({} blocks left)",
                    thousands(self.next_retarget_height as f64, 0),
                    thousands(self.remaining_blocks as f64, 0)
                ),
            ),
            field(
                "Estimated date",
                format!(
                    "{} (in about {})",
                    utc_date(self.estimated_retarget_time),
                    approx_duration(self.remaining_seconds)
                ),
            ),
        ]
    }
}

impl TextFormat for DifficultyAdjustmentReport {
    fn fmt_text(&self, opts: &TextOptions) -> String {
        let mut lines = vec![opts.heading("Difficulty Adjustment")];
        lines.extend(self.summary_lines(opts));
        lines.push(field(
            "Previous retarget",
            trend_change(self.previous_retarget, opts),
        ));
        lines.push(field(
            "Average block time",
            format!("{:.1} min", self.average_block_seconds / 60.0),
        ));
        lines.join("\n")
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, JsonSchema)]
pub struct DifficultyEntry {
    pub height: u64,
    pub timestamp: i64,
    pub difficulty: f64,
    /// Change from the previous retarget, `None` when it had zero difficulty
    /// or is outside the interval
    pub change_percent: Option<f64>,
}

#[derive(Debug, Clone, PartialEq, Serialize, JsonSchema)]
pub struct DifficultyHistoryReport {
    pub interval: String,
    pub from_height: Option<u64>,
    pub to_height: Option<u64>,
    pub limit: usize,
    /// Newest first, already filtered by height
    pub entries: Vec<DifficultyEntry>,
}

impl DifficultyHistoryReport {
    /// `points` arrive newest first; each change is computed against the
    /// next older retarget before the height filter is applied.
    pub fn new(
        interval: &str,
        points: &[DifficultyAdjustmentPoint],
        from_height: Option<u64>,
        to_height: Option<u64>,
        limit: usize,
    ) -> Self {
        let entries = points
            .iter()
            .enumerate()
            .map(|(i, p)| DifficultyEntry {
                height: p.height,
                timestamp: p.timestamp,
                difficulty: p.difficulty,
                change_percent: points
                    .get(i + 1)
                    .and_then(|prev| percent_change(p.difficulty, prev.difficulty)),
            })
            .filter(|e| from_height.is_none_or(|from| e.height >= from))
            .filter(|e| to_height.is_none_or(|to| e.height <= to))
            .collect();
        Self {
            interval: interval.to_string(),
            from_height,
            to_height,
            limit,
            entries,
        }
    }
}

impl TextFormat for DifficultyHistoryReport {
    fn fmt_text(&self, opts: &TextOptions) -> String {
        let mut lines = vec![opts.heading(&format!("Difficulty History ({})", self.interval))];
        match (self.from_height, self.to_height) {
            (None, None) => {}
            (from, to) => lines.push(field(
                "Heights",
                format!(
                    "{} to {}",
                    from.map_or_else(|| "start".to_string(), |h| thousands(h as f64, 0)),
                    to.map_or_else(|| "latest".to_string(), |h| thousands(h as f64, 0)),
                ),
            )),
        }

        if self.entries.is_empty() {
            lines.push("No difficulty adjustments match the requested range.".to_string());
            return lines.join("\n");
        }

        let (shown, footer) = truncate(&self.entries, opts.row_cap(self.limit));
        let mut table = Table::new(["Height", "Date", "Difficulty", "Change"]);
        for e in shown {
            table.row([
                thousands(e.height as f64, 0),
                utc_date(e.timestamp),
                large_magnitude(e.difficulty),
                trend_change_opt(e.change_percent, opts),
            ]);
        }
        lines.push(String::new());
        lines.push(table.render(opts));
        lines.extend(footer);
        lines.join("\n")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn point(height: u64, difficulty: f64) -> DifficultyAdjustmentPoint {
        DifficultyAdjustmentPoint {
            timestamp: 1_700_000_000 + height as i64,
            height,
            difficulty,
            adjustment: 1.0,
        }
    }

    #[test]
    fn change_is_against_older_neighbour() {
        let points = [point(3, 150.0), point(2, 100.0), point(1, 0.0)];
        let report = DifficultyHistoryReport::new("1y", &points, None, None, 10);
        assert_eq!(report.entries[0].change_percent, Some(50.0));
        // previous difficulty of zero
        assert_eq!(report.entries[1].change_percent, None);
        // oldest has no neighbour
        assert_eq!(report.entries[2].change_percent, None);

        let text = report.fmt_text(&TextOptions::default());
        assert!(text.contains("▲ +50.00%"));
        assert!(text.contains("| N/A |"));
    }

    #[test]
    fn height_filter_and_truncation() {
        let points: Vec<_> = (1..=20).rev().map(|h| point(h, 100.0 + h as f64)).collect();
        let report = DifficultyHistoryReport::new("all", &points, Some(5), Some(16), 3);
        assert_eq!(report.entries.len(), 12);
        assert_eq!(report.entries[0].height, 16);

        let text = report.fmt_text(&TextOptions::default());
        assert!(text.contains("- Heights: 5 to 16"));
        assert!(text.ends_with("Showing 3 of 12"));
    }

    #[test]
    fn empty_range() {
        let report = DifficultyHistoryReport::new("3m", &[point(1, 1.0)], Some(10), None, 10);
        assert!(report.fmt_text(&TextOptions::default()).contains("No difficulty adjustments"));
    }

    #[test]
    fn hashrate_change_and_scientific_difficulty() {
        let summary: HashrateSummary = serde_json::from_value(serde_json::json!({
            "hashrates": [
                { "timestamp": 1_736_000_000, "avgHashrate": 5.0e20 },
                { "timestamp": 1_736_086_400, "avgHashrate": 4.0e20 }
            ],
            "difficulty": [],
            "currentHashrate": 4.1e20,
            "currentDifficulty": 1.0e15
        }))
        .unwrap();
        let report = HashrateReport::new("1w", summary);
        assert_eq!(report.samples[0].timestamp, 1_736_086_400);

        let text = report.fmt_text(&TextOptions::default());
        assert!(text.contains("- Current hashrate: 410.00 EH/s"));
        assert!(text.contains("- Current difficulty: 1.00e+15 (1.00 P)"));
        assert!(text.contains("- Change over 1w: ▼ -20.00%"));
    }
}

//! Transport-agnostic text formatting for tool outputs.
//!
//! Implement [`TextFormat`] for tool output types to render the report that
//! ends up in the response envelope:
//!
//! ```ignore
//! use stats_tools_core::fmt::{TextFormat, TextOptions};
//!
//! struct PriceReport {
//!     usd: f64,
//! }
//!
//! impl TextFormat for PriceReport {
//!     fn fmt_text(&self, _opts: &TextOptions) -> String {
//!         format!("# Price\n{}", stats_tools_core::fmt::currency(self.usd))
//!     }
//! }
//! ```
//!
//! The submodules hold the shared rendering rules every report follows.

pub mod number;
pub mod table;
pub mod time;

pub use number::{
    Trend, currency, hashrate_ehs, large_magnitude, percent, percent_change, percent_of,
    ratio_percent, scientific, signed_percent, signed_percent_opt, small_magnitude, thousands,
};
pub use table::{Table, truncate, truncation_footer};
pub use time::{approx_duration, relative_time, relative_time_unix, utc_date};

use chrono::{DateTime, Utc};

/// Text rendering style.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub enum TextStyle {
    /// Markdown headings, tables and trend symbols.
    #[default]
    Humanized,
    /// Plain text without special formatting.
    Plain,
}

/// Options controlling text formatting behavior.
#[derive(Clone, Debug, Default)]
pub struct TextOptions {
    /// The rendering style to use.
    pub style: TextStyle,
    /// Maximum number of table rows to display; reports fall back to their own cap.
    pub max_items: Option<usize>,
    /// Clock used for relative times. `None` means the current time.
    pub reference_time: Option<DateTime<Utc>>,
}

impl TextOptions {
    /// Create new text options with default settings.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the text style.
    #[must_use]
    pub fn with_style(mut self, style: TextStyle) -> Self {
        self.style = style;
        self
    }

    /// Set the maximum number of items to display.
    #[must_use]
    pub fn with_max_items(mut self, max_items: Option<usize>) -> Self {
        self.max_items = max_items;
        self
    }

    /// Pin the clock used for relative times.
    #[must_use]
    pub fn with_reference_time(mut self, now: DateTime<Utc>) -> Self {
        self.reference_time = Some(now);
        self
    }

    pub fn now(&self) -> DateTime<Utc> {
        self.reference_time.unwrap_or_else(Utc::now)
    }

    /// Row cap for a table, honoring `max_items` when it is smaller.
    pub fn row_cap(&self, default_cap: usize) -> usize {
        self.max_items.map_or(default_cap, |m| m.clamp(1, default_cap))
    }

    /// `## title` in humanized style, `title` underlined in plain style.
    pub fn heading(&self, title: &str) -> String {
        match self.style {
            TextStyle::Humanized => format!("## {title}"),
            TextStyle::Plain => format!("{title}\n{}", "-".repeat(title.chars().count())),
        }
    }
}

/// Transport-agnostic text formatting for tool outputs.
///
/// Implementations must be pure: the same value and options always produce
/// the same text.
pub trait TextFormat {
    /// Format the value as human-readable text.
    fn fmt_text(&self, opts: &TextOptions) -> String;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_text_options_default() {
        let opts = TextOptions::default();
        assert_eq!(opts.style, TextStyle::Humanized);
        assert!(opts.max_items.is_none());
        assert!(opts.reference_time.is_none());
    }

    #[test]
    fn test_row_cap() {
        let opts = TextOptions::new();
        assert_eq!(opts.row_cap(15), 15);
        assert_eq!(opts.clone().with_max_items(Some(5)).row_cap(15), 5);
        assert_eq!(opts.clone().with_max_items(Some(50)).row_cap(15), 15);
        assert_eq!(opts.with_max_items(Some(0)).row_cap(15), 1);
    }

    #[test]
    fn test_heading_styles() {
        let opts = TextOptions::new();
        assert_eq!(opts.heading("Price"), "## Price");
        let plain = TextOptions::new().with_style(TextStyle::Plain);
        assert_eq!(plain.heading("Price"), "Price\n-----");
    }
}

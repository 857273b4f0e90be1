//! Tables with a display cap.

use super::{TextOptions, TextStyle};

/// Keep the first `cap` items in their existing order.
///
/// Returns the visible slice and, when anything was cut, the
/// `Showing N of M` footer that must accompany it.
pub fn truncate<T>(items: &[T], cap: usize) -> (&[T], Option<String>) {
    if items.len() > cap {
        (&items[..cap], Some(truncation_footer(cap, items.len())))
    } else {
        (items, None)
    }
}

pub fn truncation_footer(shown: usize, total: usize) -> String {
    format!("Showing {shown} of {total}")
}

/// Simple row/column table rendered as markdown or aligned plain text.
#[derive(Debug, Clone, Default)]
pub struct Table {
    headers: Vec<String>,
    rows: Vec<Vec<String>>,
}

impl Table {
    pub fn new<I, S>(headers: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            headers: headers.into_iter().map(Into::into).collect(),
            rows: Vec::new(),
        }
    }

    pub fn row<I, S>(&mut self, cells: I)
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.rows.push(cells.into_iter().map(Into::into).collect());
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn render(&self, opts: &TextOptions) -> String {
        match opts.style {
            TextStyle::Humanized => self.render_markdown(),
            TextStyle::Plain => self.render_plain(),
        }
    }

    fn render_markdown(&self) -> String {
        let mut lines = Vec::with_capacity(self.rows.len() + 2);
        lines.push(format!("| {} |", self.headers.join(" | ")));
        lines.push(format!(
            "|{}|",
            self.headers
                .iter()
                .map(|_| "---")
                .collect::<Vec<_>>()
                .join("|")
        ));
        for row in &self.rows {
            lines.push(format!("| {} |", row.join(" | ")));
        }
        lines.join("\n")
    }

    fn render_plain(&self) -> String {
        let mut widths: Vec<usize> = self.headers.iter().map(|h| h.chars().count()).collect();
        for row in &self.rows {
            for (i, cell) in row.iter().enumerate() {
                if let Some(w) = widths.get_mut(i) {
                    *w = (*w).max(cell.chars().count());
                }
            }
        }
        let fmt_row = |cells: &[String]| {
            cells
                .iter()
                .enumerate()
                .map(|(i, c)| {
                    let w = widths.get(i).copied().unwrap_or(0);
                    format!("{c:<w$}")
                })
                .collect::<Vec<_>>()
                .join("  ")
                .trim_end()
                .to_string()
        };
        let mut lines = vec![fmt_row(&self.headers)];
        lines.extend(self.rows.iter().map(|r| fmt_row(r)));
        lines.join("\n")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn truncate_adds_footer_only_when_cut() {
        let items: Vec<u32> = (1..=20).collect();
        let (shown, footer) = truncate(&items, 15);
        assert_eq!(shown.len(), 15);
        assert_eq!(shown[0], 1);
        assert_eq!(footer.as_deref(), Some("Showing 15 of 20"));

        let (shown, footer) = truncate(&items[..5], 15);
        assert_eq!(shown.len(), 5);
        assert!(footer.is_none());
    }

    #[test]
    fn markdown_table() {
        let mut t = Table::new(["Height", "Pool"]);
        t.row(["840000", "ViaBTC"]);
        let text = t.render(&TextOptions::default());
        assert_eq!(text, "| Height | Pool |\n|---|---|\n| 840000 | ViaBTC |");
        assert_eq!(t.len(), 1);
    }

    #[test]
    fn plain_table_aligns_columns() {
        let mut t = Table::new(["H", "Pool"]);
        t.row(["840000", "ViaBTC"]);
        let text = t.render(&TextOptions::new().with_style(TextStyle::Plain));
        assert_eq!(text, "H       Pool\n840000  ViaBTC");
    }
}

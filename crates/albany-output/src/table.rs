//! ASCII and Markdown tables.
//!
//! A type implements [`TableFormat`] by describing its title, column headers
//! and rows of pre-formatted cells; rendering is shared.

use albany_data::TimeSeries;
use albany_regression::{AnnualizedRecord, RollingResult};
use std::fmt::Write;

const MIN_COLUMN_WIDTH: usize = 12;

/// Render a value with four decimals, or `NaN` when missing.
pub fn format_value(value: f64) -> String {
    if value.is_nan() {
        "NaN".to_string()
    } else {
        format!("{value:.4}")
    }
}

/// Tabular rendering for terminal and documentation output.
pub trait TableFormat {
    /// Table title
    fn title(&self) -> String;

    /// Column headers, the first one labelling the row key
    fn headers(&self) -> Vec<String>;

    /// Rows of cells, one cell per header
    fn rows(&self) -> Vec<Vec<String>>;

    /// Format as ASCII table for terminal display.
    fn to_ascii_table(&self) -> String {
        let headers = self.headers();
        let rows = self.rows();
        let widths: Vec<usize> = headers
            .iter()
            .enumerate()
            .map(|(j, h)| {
                rows.iter()
                    .filter_map(|row| row.get(j))
                    .map(String::len)
                    .chain([h.len(), MIN_COLUMN_WIDTH])
                    .max()
                    .unwrap_or(MIN_COLUMN_WIDTH)
            })
            .collect();
        let total = widths.iter().sum::<usize>() + widths.len().saturating_sub(1);

        let mut output = String::new();
        let _ = writeln!(output, "\n{}", self.title());
        output.push_str(&"=".repeat(total));
        output.push('\n');
        output.push_str(&ascii_row(&headers, &widths));
        output.push_str(&"-".repeat(total));
        output.push('\n');
        for row in &rows {
            output.push_str(&ascii_row(row, &widths));
        }
        output.push_str(&"=".repeat(total));
        output.push('\n');
        output
    }

    /// Format as Markdown table for documentation.
    fn to_markdown(&self) -> String {
        let headers = self.headers();
        let mut output = format!("# {}\n\n", self.title());
        let _ = writeln!(output, "| {} |", headers.join(" | "));
        let _ = writeln!(
            output,
            "|{}|",
            headers
                .iter()
                .map(|h| "-".repeat(h.len() + 2))
                .collect::<Vec<_>>()
                .join("|")
        );
        for row in self.rows() {
            let _ = writeln!(output, "| {} |", row.join(" | "));
        }
        output
    }
}

/// First column left aligned, the rest right aligned.
fn ascii_row(cells: &[String], widths: &[usize]) -> String {
    let mut line = String::new();
    for (j, (cell, width)) in cells.iter().zip(widths).enumerate() {
        if j == 0 {
            let _ = write!(line, "{cell:<width$}");
        } else {
            let _ = write!(line, " {cell:>width$}");
        }
    }
    line.push('\n');
    line
}

impl TableFormat for RollingResult {
    fn title(&self) -> String {
        if self.regressors().is_empty() {
            "Rolling Alpha".to_string()
        } else {
            format!("Rolling Alpha and Betas ({})", self.regressors().join(", "))
        }
    }

    fn headers(&self) -> Vec<String> {
        std::iter::once("Date".to_string())
            .chain(self.field_names())
            .collect()
    }

    fn rows(&self) -> Vec<Vec<String>> {
        self.records()
            .iter()
            .map(|record| {
                std::iter::once(record.date.to_string())
                    .chain(std::iter::once(format_value(record.alpha)))
                    .chain(record.betas.iter().map(|b| format_value(*b)))
                    .collect()
            })
            .collect()
    }
}

impl TableFormat for TimeSeries {
    fn title(&self) -> String {
        self.name().to_string()
    }

    fn headers(&self) -> Vec<String> {
        vec!["Date".to_string(), self.name().to_string()]
    }

    fn rows(&self) -> Vec<Vec<String>> {
        self.iter()
            .map(|(date, value)| vec![date.to_string(), format_value(value)])
            .collect()
    }
}

/// Rolling annualized statistics of a named series.
#[derive(Debug, Clone, Copy)]
pub struct AnnualizedTable<'a> {
    /// Name of the summarized series
    pub name: &'a str,
    /// One record per complete window
    pub records: &'a [AnnualizedRecord],
}

impl<'a> AnnualizedTable<'a> {
    /// Create a table view over annualized records
    pub const fn new(name: &'a str, records: &'a [AnnualizedRecord]) -> Self {
        Self { name, records }
    }
}

impl TableFormat for AnnualizedTable<'_> {
    fn title(&self) -> String {
        format!("Rolling Annualized Statistics: {}", self.name)
    }

    fn headers(&self) -> Vec<String> {
        ["Date", "Mean", "Std Dev", "Sharpe"]
            .map(String::from)
            .to_vec()
    }

    fn rows(&self) -> Vec<Vec<String>> {
        self.records
            .iter()
            .map(|r| {
                vec![
                    r.date.to_string(),
                    format_value(r.mean),
                    format_value(r.std_dev),
                    format_value(r.sharpe),
                ]
            })
            .collect()
    }
}

//! Descriptive summaries of series and rolling results.
//!
//! Missing observations are counted but otherwise skipped, so a rolling
//! result whose first windows are degenerate still summarizes the rest.

use crate::table::{TableFormat, format_value};
use albany_data::{Panel, TimeSeries};
use albany_regression::RollingResult;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Summary statistics of one series.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct SeriesSummary {
    /// Series name
    pub name: String,

    /// First observation date
    pub start: Option<NaiveDate>,

    /// Last observation date
    pub end: Option<NaiveDate>,

    /// Number of non-missing observations
    pub count: usize,

    /// Number of missing observations
    pub missing: usize,

    /// Smallest value
    pub min: f64,

    /// Largest value
    pub max: f64,

    /// Arithmetic mean
    pub mean: f64,

    /// Most recent non-missing value
    pub last: f64,
}

impl SeriesSummary {
    /// Summarize a series, skipping missing values.
    ///
    /// Statistics of a series with no valid observation are `NaN`.
    pub fn from_series(series: &TimeSeries) -> Self {
        let valid: Vec<f64> = series
            .values()
            .iter()
            .copied()
            .filter(|v| !v.is_nan())
            .collect();
        let count = valid.len();

        let (min, max, mean) = if valid.is_empty() {
            (f64::NAN, f64::NAN, f64::NAN)
        } else {
            (
                valid.iter().copied().fold(f64::INFINITY, f64::min),
                valid.iter().copied().fold(f64::NEG_INFINITY, f64::max),
                valid.iter().sum::<f64>() / count as f64,
            )
        };

        Self {
            name: series.name().to_string(),
            start: series.first_date(),
            end: series.last_date(),
            count,
            missing: series.len() - count,
            min,
            max,
            mean,
            last: valid.last().copied().unwrap_or(f64::NAN),
        }
    }
}

impl fmt::Display for SeriesSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}: n={} (missing {}), mean {}, min {}, max {}, last {}",
            self.name,
            self.count,
            self.missing,
            format_value(self.mean),
            format_value(self.min),
            format_value(self.max),
            format_value(self.last)
        )
    }
}

/// Summarize every column of a panel, in column order.
pub fn summarize_panel(panel: &Panel) -> albany_data::Result<Vec<SeriesSummary>> {
    panel
        .column_names()
        .iter()
        .map(|name| panel.series(name).map(|s| SeriesSummary::from_series(&s)))
        .collect()
}

/// Summarize the alpha and beta fields of a rolling regression.
pub fn summarize_result(result: &RollingResult) -> albany_data::Result<Vec<SeriesSummary>> {
    summarize_panel(&result.to_panel()?)
}

impl TableFormat for [SeriesSummary] {
    fn title(&self) -> String {
        "Summary".to_string()
    }

    fn headers(&self) -> Vec<String> {
        ["Series", "Count", "Missing", "Mean", "Min", "Max", "Last"]
            .map(String::from)
            .to_vec()
    }

    fn rows(&self) -> Vec<Vec<String>> {
        self.iter()
            .map(|s| {
                vec![
                    s.name.clone(),
                    s.count.to_string(),
                    s.missing.to_string(),
                    format_value(s.mean),
                    format_value(s.min),
                    format_value(s.max),
                    format_value(s.last),
                ]
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn series(values: Vec<f64>) -> TimeSeries {
        let dates = (1..=values.len() as u32)
            .map(|m| NaiveDate::from_ymd_opt(2023, m, 1).unwrap())
            .collect();
        TimeSeries::new("beta_SMB", dates, values).unwrap()
    }

    #[test]
    fn test_summary_skips_missing() {
        let summary = SeriesSummary::from_series(&series(vec![f64::NAN, 0.5, -0.5, 1.0, f64::NAN]));

        assert_eq!(summary.count, 3);
        assert_eq!(summary.missing, 2);
        assert_eq!(summary.min, -0.5);
        assert_eq!(summary.max, 1.0);
        assert!((summary.mean - 1.0 / 3.0).abs() < 1e-12);
        assert_eq!(summary.last, 1.0);
        assert_eq!(summary.start, NaiveDate::from_ymd_opt(2023, 1, 1));
    }

    #[test]
    fn test_summary_all_missing() {
        let summary = SeriesSummary::from_series(&series(vec![f64::NAN, f64::NAN]));
        assert_eq!(summary.count, 0);
        assert!(summary.mean.is_nan());
        assert!(summary.last.is_nan());
        assert!(summary.to_string().contains("mean NaN"));
    }

    #[test]
    fn test_summary_table() {
        let summaries = vec![SeriesSummary::from_series(&series(vec![0.25, 0.75]))];
        let markdown = summaries.to_markdown();
        assert!(markdown.contains("| beta_SMB | 2 | 0 | 0.5000 | 0.2500 | 0.7500 | 0.7500 |"));
    }
}

//! Series transforms used to turn raw prices and rates into excess returns.
//!
//! These cover the wrangling steps of a factor study: simple returns from
//! price levels, excess returns over the risk-free rate, long-short spreads,
//! percent-to-decimal scaling, lags and index alignment.

use crate::error::{DataError, Result};
use crate::series::TimeSeries;
use chrono::{Datelike, NaiveDate};
use ndarray::Array1;
use std::collections::BTreeSet;

impl TimeSeries {
    /// Simple period-over-period returns `v_t / v_{t-1} - 1`.
    ///
    /// The first observation has no prior value and is dropped.
    pub fn pct_change(&self) -> Self {
        if self.len() < 2 {
            return Self::from_parts(self.name().to_string(), Vec::new(), Array1::zeros(0));
        }

        let values = self.values();
        let returns: Array1<f64> = (1..self.len())
            .map(|i| values[i] / values[i - 1] - 1.0)
            .collect();
        Self::from_parts(self.name().to_string(), self.dates()[1..].to_vec(), returns)
    }

    /// Element-wise difference `self - other` on an identical index.
    ///
    /// Used for excess returns (`r - rf`), long-short spreads and the
    /// 10Y-2Y term spread. The result keeps `self`'s name.
    ///
    /// # Errors
    /// Returns [`DataError::Misaligned`] if the indexes differ.
    pub fn subtract(&self, other: &Self) -> Result<Self> {
        if self.dates() != other.dates() {
            return Err(DataError::Misaligned(format!(
                "cannot subtract '{}' from '{}': indexes differ",
                other.name(),
                self.name()
            )));
        }
        let values = self.values() - other.values();
        Ok(Self::from_parts(
            self.name().to_string(),
            self.dates().to_vec(),
            values,
        ))
    }

    /// Multiply every value by `factor` (e.g. `0.01` for percent to decimal).
    pub fn scale(&self, factor: f64) -> Self {
        Self::from_parts(
            self.name().to_string(),
            self.dates().to_vec(),
            self.values() * factor,
        )
    }

    /// Shift values forward by `periods`, keeping the index.
    ///
    /// The first `periods` observations become missing.
    pub fn lag(&self, periods: usize) -> Self {
        let n = self.len();
        let values = self.values();
        let lagged: Array1<f64> = (0..n)
            .map(|i| if i >= periods { values[i - periods] } else { f64::NAN })
            .collect();
        Self::from_parts(self.name().to_string(), self.dates().to_vec(), lagged)
    }

    /// Keep only the observations whose date is in `dates`.
    pub fn restrict_to(&self, dates: &[NaiveDate]) -> Self {
        let keep: BTreeSet<NaiveDate> = dates.iter().copied().collect();
        let (kept_dates, kept_values): (Vec<NaiveDate>, Vec<f64>) =
            self.iter().filter(|(d, _)| keep.contains(d)).unzip();
        Self::from_parts(
            self.name().to_string(),
            kept_dates,
            Array1::from_vec(kept_values),
        )
    }

    /// Drop missing observations.
    pub fn drop_missing(&self) -> Self {
        let (dates, values): (Vec<NaiveDate>, Vec<f64>) =
            self.iter().filter(|(_, v)| !v.is_nan()).unzip();
        Self::from_parts(self.name().to_string(), dates, Array1::from_vec(values))
    }

    /// Downsample to one observation per calendar month.
    ///
    /// Each month is stamped with its first day and carries the last
    /// non-missing value observed in that month (missing if none).
    pub fn resample_month_start_last(&self) -> Result<Self> {
        let mut dates: Vec<NaiveDate> = Vec::new();
        let mut values: Vec<f64> = Vec::new();

        for (date, value) in self.iter() {
            let month_start = NaiveDate::from_ymd_opt(date.year(), date.month(), 1)
                .ok_or_else(|| DataError::Parse(format!("invalid month for {date}")))?;

            if dates.last() == Some(&month_start) {
                if let Some(last) = values.last_mut().filter(|_| !value.is_nan()) {
                    *last = value;
                }
            } else {
                dates.push(month_start);
                values.push(value);
            }
        }

        Ok(Self::from_parts(
            self.name().to_string(),
            dates,
            Array1::from_vec(values),
        ))
    }
}

/// Dates present in every series, in ascending order.
pub fn intersect_dates(series: &[&TimeSeries]) -> Vec<NaiveDate> {
    let Some((first, rest)) = series.split_first() else {
        return Vec::new();
    };

    let mut common: BTreeSet<NaiveDate> = first.dates().iter().copied().collect();
    for s in rest {
        let dates: BTreeSet<NaiveDate> = s.dates().iter().copied().collect();
        common = common.intersection(&dates).copied().collect();
    }
    common.into_iter().collect()
}

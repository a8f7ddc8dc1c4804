//! Rolling and annualized return statistics.
//!
//! Unlike the regression engine, these statistics include the current
//! observation: the value at `t_i` summarizes `t_{i-w+1} ..= t_i`. Output
//! starts at the first complete window, and any window containing a
//! missing value is `NaN`.

use crate::error::{RegressionError, Result};
use albany_data::TimeSeries;
use chrono::NaiveDate;
use ndarray::ArrayView1;
use serde::{Deserialize, Serialize};

/// Observations per year for monthly data
pub const MONTHS_PER_YEAR: f64 = 12.0;

/// Rolling statistics configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct RollingStatsConfig {
    /// Observations per window (default: 12)
    pub window: usize,

    /// Sampling frequency used to annualize (default: 12, monthly)
    pub periods_per_year: f64,
}

impl Default for RollingStatsConfig {
    fn default() -> Self {
        Self {
            window: 12,
            periods_per_year: MONTHS_PER_YEAR,
        }
    }
}

/// Annualized mean, volatility and Sharpe ratio.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct AnnualizedStats {
    /// Annualized mean return
    pub mean: f64,
    /// Annualized standard deviation
    pub std_dev: f64,
    /// `mean / std_dev`, `NaN` when volatility is zero
    pub sharpe: f64,
}

/// Annualized statistics of the window ending at `date`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct AnnualizedRecord {
    /// Last date of the window
    pub date: NaiveDate,
    /// Annualized mean return
    pub mean: f64,
    /// Annualized standard deviation
    pub std_dev: f64,
    /// Sharpe ratio
    pub sharpe: f64,
}

/// Annualize monthly moments.
pub fn annualize(monthly_mean: f64, monthly_std: f64) -> AnnualizedStats {
    annualize_with_periods(monthly_mean, monthly_std, MONTHS_PER_YEAR)
}

/// Annualize per-period moments sampled `periods_per_year` times a year.
pub fn annualize_with_periods(mean: f64, std_dev: f64, periods_per_year: f64) -> AnnualizedStats {
    let mean = mean * periods_per_year;
    let std_dev = std_dev * periods_per_year.sqrt();
    let sharpe = if std_dev == 0.0 { f64::NAN } else { mean / std_dev };
    AnnualizedStats {
        mean,
        std_dev,
        sharpe,
    }
}

/// Trailing mean over `window` observations.
pub fn rolling_mean(series: &TimeSeries, window: usize) -> Result<TimeSeries> {
    rolling_apply(series, window, &format!("{}_mean", series.name()), |w| {
        moments(w).map_or(f64::NAN, |(mean, _)| mean)
    })
}

/// Trailing sample standard deviation (divisor `window - 1`).
///
/// A window of 1 has no degrees of freedom and yields `NaN`.
pub fn rolling_std_dev(series: &TimeSeries, window: usize) -> Result<TimeSeries> {
    rolling_apply(series, window, &format!("{}_std", series.name()), |w| {
        moments(w).map_or(f64::NAN, |(_, var)| var.sqrt())
    })
}

/// Rolling annualized mean, volatility and Sharpe ratio.
pub fn rolling_annualized_stats(
    series: &TimeSeries,
    config: &RollingStatsConfig,
) -> Result<Vec<AnnualizedRecord>> {
    check_window(config.window)?;
    if !(config.periods_per_year.is_finite() && config.periods_per_year > 0.0) {
        return Err(RegressionError::InvalidParameter(format!(
            "periods_per_year must be positive, got {}",
            config.periods_per_year
        )));
    }

    let values = series.values();
    let records = (config.window.saturating_sub(1)..series.len())
        .map(|i| {
            let window = values.slice(ndarray::s![i + 1 - config.window..=i]);
            let (mean, var) = moments(window).unwrap_or((f64::NAN, f64::NAN));
            let stats = annualize_with_periods(mean, var.sqrt(), config.periods_per_year);
            AnnualizedRecord {
                date: series.dates()[i],
                mean: stats.mean,
                std_dev: stats.std_dev,
                sharpe: stats.sharpe,
            }
        })
        .collect();
    Ok(records)
}

/// Trailing Pearson correlation of two series on the same index.
///
/// `NaN` where either window has zero variance or a missing value.
///
/// # Errors
/// Returns [`RegressionError::InvalidParameter`] if `window` is zero or the
/// series do not share the same dates.
pub fn rolling_correlation(a: &TimeSeries, b: &TimeSeries, window: usize) -> Result<TimeSeries> {
    check_window(window)?;
    if a.dates() != b.dates() {
        return Err(RegressionError::InvalidParameter(format!(
            "rolling correlation requires aligned series, '{}' and '{}' differ",
            a.name(),
            b.name()
        )));
    }

    let (xs, ys) = (a.values(), b.values());
    let start = window - 1;
    let values = (start..a.len())
        .map(|i| {
            let rows = i + 1 - window..=i;
            pearson(
                xs.slice(ndarray::s![rows.clone()]).iter().copied(),
                ys.slice(ndarray::s![rows]).iter().copied(),
            )
        })
        .collect();

    let name = format!("corr({},{})", a.name(), b.name());
    Ok(TimeSeries::new(name, a.dates()[start.min(a.len())..].to_vec(), values)?)
}

/// Full-sample Pearson correlation over pairwise-complete observations.
///
/// Pairs are matched by date; a pair is skipped when either side is
/// missing. Returns `NaN` with fewer than two pairs or zero variance.
pub fn correlation(a: &TimeSeries, b: &TimeSeries) -> f64 {
    let (xs, ys): (Vec<f64>, Vec<f64>) = a
        .iter()
        .filter_map(|(date, x)| b.get(date).map(|y| (x, y)))
        .filter(|(x, y)| !x.is_nan() && !y.is_nan())
        .unzip();
    pearson(xs.into_iter(), ys.into_iter())
}

fn check_window(window: usize) -> Result<()> {
    if window == 0 {
        return Err(RegressionError::InvalidParameter(
            "window must be at least 1".to_string(),
        ));
    }
    Ok(())
}

fn rolling_apply(
    series: &TimeSeries,
    window: usize,
    name: &str,
    stat: impl Fn(ArrayView1<'_, f64>) -> f64,
) -> Result<TimeSeries> {
    check_window(window)?;
    let start = (window - 1).min(series.len());
    let values = series.values();
    let out = (start..series.len())
        .map(|i| stat(values.slice(ndarray::s![i + 1 - window..=i])))
        .collect();
    Ok(TimeSeries::new(name, series.dates()[start..].to_vec(), out)?)
}

/// Mean and sample variance; `None` if any value is missing.
///
/// A single observation has `NaN` variance. Variance that is pure rounding
/// noise relative to the magnitude of the data snaps to zero.
fn moments(values: ArrayView1<'_, f64>) -> Option<(f64, f64)> {
    if values.iter().any(|v| v.is_nan()) {
        return None;
    }
    let n = values.len();
    let mean = values.sum() / n as f64;
    if n < 2 {
        return Some((mean, f64::NAN));
    }
    let (ss_dev, ss_raw) = values.iter().fold((0.0, 0.0), |(dev, raw), v| {
        (dev + (v - mean) * (v - mean), raw + v * v)
    });
    let ss_dev = if is_noise(ss_dev, ss_raw, n) { 0.0 } else { ss_dev };
    Some((mean, ss_dev / (n - 1) as f64))
}

const fn is_noise(ss_dev: f64, ss_raw: f64, n: usize) -> bool {
    let eps = n as f64 * f64::EPSILON;
    ss_dev <= ss_raw * eps * eps
}

fn pearson(xs: impl Iterator<Item = f64>, ys: impl Iterator<Item = f64>) -> f64 {
    let pairs: Vec<(f64, f64)> = xs.zip(ys).collect();
    let n = pairs.len();
    if n < 2 || pairs.iter().any(|(x, y)| x.is_nan() || y.is_nan()) {
        return f64::NAN;
    }

    let mean_x = pairs.iter().map(|(x, _)| x).sum::<f64>() / n as f64;
    let mean_y = pairs.iter().map(|(_, y)| y).sum::<f64>() / n as f64;

    let (mut sxx, mut syy, mut sxy, mut raw_x, mut raw_y) = (0.0, 0.0, 0.0, 0.0, 0.0);
    for (x, y) in &pairs {
        let (dx, dy) = (x - mean_x, y - mean_y);
        sxx += dx * dx;
        syy += dy * dy;
        sxy += dx * dy;
        raw_x += x * x;
        raw_y += y * y;
    }
    if is_noise(sxx, raw_x, n) || is_noise(syy, raw_y, n) {
        return f64::NAN;
    }

    (sxy / (sxx.sqrt() * syy.sqrt())).clamp(-1.0, 1.0)
}

//! Portfolio return construction from constituent panels.
//!
//! Constituent panels are pivoted the usual way: one row per date, one column
//! per security identifier. A security that is not an index member on a date
//! carries a missing value there.

use crate::error::{DataError, Result};
use crate::panel::Panel;
use crate::series::TimeSeries;
use ndarray::Array1;

/// Market capitalisation `|price| * shares_outstanding` per security.
///
/// Prices can be negative in some vendor feeds (bid/ask midpoints), hence the
/// absolute value. Both panels must share dates and column layout.
pub fn market_caps(prices: &Panel, shares: &Panel) -> Result<Panel> {
    check_same_layout(prices, shares)?;

    let caps = prices.values().mapv(f64::abs) * shares.values();
    let columns = prices
        .column_names()
        .iter()
        .enumerate()
        .map(|(idx, name)| (name.clone(), caps.column(idx).to_vec()))
        .collect();
    Panel::new(prices.dates().to_vec(), columns)
}

/// Equal-weight portfolio return for each date.
///
/// Averages the available (non-missing) constituent returns; dates with no
/// available constituent are missing.
pub fn equal_weight_returns(returns: &Panel, name: impl Into<String>) -> Result<TimeSeries> {
    let values: Vec<f64> = returns
        .values()
        .rows()
        .into_iter()
        .map(|row| {
            let (sum, count) = row
                .iter()
                .filter(|v| v.is_finite())
                .fold((0.0, 0usize), |(s, c), v| (s + v, c + 1));
            if count == 0 { f64::NAN } else { sum / count as f64 }
        })
        .collect();

    TimeSeries::new(name, returns.dates().to_vec(), values)
}

/// Cap-weighted portfolio return for each date.
///
/// Weights for date `t` come from market caps at `t-1`, so the first date has
/// no return and is dropped. A constituent contributes only when both its
/// return at `t` and its cap at `t-1` are available and the cap is positive.
pub fn cap_weighted_returns(
    returns: &Panel,
    caps: &Panel,
    name: impl Into<String>,
) -> Result<TimeSeries> {
    check_same_layout(returns, caps)?;

    let n = returns.len();
    if n < 2 {
        return TimeSeries::new(name, Vec::new(), Vec::new());
    }

    let r = returns.values();
    let w = caps.values();
    let values: Array1<f64> = (1..n)
        .map(|t| {
            let (weighted, total) = r
                .row(t)
                .iter()
                .zip(w.row(t - 1).iter())
                .filter(|(ret, cap)| ret.is_finite() && cap.is_finite() && **cap > 0.0)
                .fold((0.0, 0.0), |(acc, tot), (ret, cap)| (acc + ret * cap, tot + cap));
            if total > 0.0 {
                weighted / total
            } else {
                f64::NAN
            }
        })
        .collect();

    TimeSeries::new(name, returns.dates()[1..].to_vec(), values.to_vec())
}

/// Long-short spread `long - short` on the common index.
///
/// Dates missing from either leg are dropped.
pub fn long_short(
    long: &TimeSeries,
    short: &TimeSeries,
    name: impl Into<String>,
) -> Result<TimeSeries> {
    let common = crate::transform::intersect_dates(&[long, short]);
    let spread = long
        .restrict_to(&common)
        .subtract(&short.restrict_to(&common))?;
    Ok(spread.renamed(name))
}

fn check_same_layout(a: &Panel, b: &Panel) -> Result<()> {
    if a.dates() != b.dates() {
        return Err(DataError::Misaligned(
            "constituent panels have different dates".to_string(),
        ));
    }
    if a.column_names() != b.column_names() {
        return Err(DataError::Misaligned(
            "constituent panels have different columns".to_string(),
        ));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use chrono::NaiveDate;

    fn dates(n: usize) -> Vec<NaiveDate> {
        (0..n)
            .map(|i| NaiveDate::from_ymd_opt(2020, i as u32 + 1, 1).unwrap())
            .collect()
    }

    fn constituents(a: Vec<f64>, b: Vec<f64>) -> Panel {
        let n = a.len();
        Panel::new(
            dates(n),
            vec![("10107".to_string(), a), ("14593".to_string(), b)],
        )
        .unwrap()
    }

    #[test]
    fn test_equal_weight_skips_missing() {
        let returns = constituents(vec![0.02, 0.01], vec![0.04, f64::NAN]);
        let ew = equal_weight_returns(&returns, "SPE").unwrap();

        assert_relative_eq!(ew.values()[0], 0.03, epsilon = 1e-12);
        assert_relative_eq!(ew.values()[1], 0.01, epsilon = 1e-12);
    }

    #[test]
    fn test_cap_weighted_uses_lagged_caps() {
        let returns = constituents(vec![0.0, 0.10], vec![0.0, -0.10]);
        let caps = constituents(vec![300.0, 1.0], vec![100.0, 1.0]);
        let cw = cap_weighted_returns(&returns, &caps, "SPC").unwrap();

        assert_eq!(cw.len(), 1);
        assert_eq!(cw.dates()[0], dates(2)[1]);
        // (0.10 * 300 - 0.10 * 100) / 400
        assert_relative_eq!(cw.values()[0], 0.05, epsilon = 1e-12);
    }

    #[test]
    fn test_market_caps_uses_absolute_price() {
        let prices = constituents(vec![-10.0], vec![20.0]);
        let shares = constituents(vec![5.0], vec![2.0]);
        let caps = market_caps(&prices, &shares).unwrap();

        assert_relative_eq!(caps.column("10107").unwrap()[0], 50.0);
        assert_relative_eq!(caps.column("14593").unwrap()[0], 40.0);
    }

    #[test]
    fn test_long_short_on_common_dates() {
        let long = TimeSeries::new("SPC", dates(3), vec![0.03, 0.02, 0.01]).unwrap();
        let short = TimeSeries::new("SPE", dates(3)[1..].to_vec(), vec![0.01, 0.02]).unwrap();
        let spread = long_short(&long, &short, "Innovation").unwrap();

        assert_eq!(spread.name(), "Innovation");
        assert_eq!(spread.len(), 2);
        assert_relative_eq!(spread.values()[0], 0.01, epsilon = 1e-12);
        assert_relative_eq!(spread.values()[1], -0.01, epsilon = 1e-12);
    }

    #[test]
    fn test_layout_mismatch() {
        let a = constituents(vec![1.0], vec![1.0]);
        let b = Panel::new(dates(1), vec![("10107".to_string(), vec![1.0])]).unwrap();
        assert!(matches!(market_caps(&a, &b), Err(DataError::Misaligned(_))));
    }
}

//! Rolling factor regression engine
//!
//! For every index `i` in `window..T` the dependent series is regressed on an
//! intercept plus the selected factor columns over rows `[i - window, i)`.
//! The coefficients are reported under date `t_i`, so each estimate only
//! uses information available before the period it describes.
//!
//! Windows are independent. A window with a missing value or a
//! rank-deficient design matrix yields `NaN` for every coefficient and the
//! run continues with the next window.

use super::result::{RollingRecord, RollingResult};
use crate::error::{RegressionError, Result};
use crate::factors::FactorSelection;
use crate::ols::{DEFAULT_RANK_TOLERANCE, least_squares};
use albany_data::Panel;
use ndarray::{Array1, Array2, s};
use serde::{Deserialize, Serialize};
use tracing::debug;

/// Rolling regression configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct RollingRegressionConfig {
    /// Number of trailing observations per fit (default: 12 months)
    pub window: usize,

    /// Factors to include as regressors (default: SMB, HML)
    pub factors: FactorSelection,

    /// Relative tolerance for rank-deficiency detection (default: 1e-10)
    pub rank_tolerance: f64,
}

impl Default for RollingRegressionConfig {
    fn default() -> Self {
        Self {
            window: 12,
            factors: FactorSelection::default(),
            rank_tolerance: DEFAULT_RANK_TOLERANCE,
        }
    }
}

/// Rolling OLS estimator of alpha and factor betas
#[derive(Debug, Clone)]
pub struct RollingRegression {
    config: RollingRegressionConfig,
}

impl RollingRegression {
    /// Create a new estimator with the given configuration
    pub fn new(config: RollingRegressionConfig) -> Result<Self> {
        if config.window == 0 {
            return Err(RegressionError::InvalidParameter(
                "window must be at least 1".to_string(),
            ));
        }
        if !config.rank_tolerance.is_finite() || config.rank_tolerance < 0.0 {
            return Err(RegressionError::InvalidParameter(format!(
                "rank_tolerance must be a non-negative number, got {}",
                config.rank_tolerance
            )));
        }
        Ok(Self { config })
    }

    /// Create with default configuration.
    ///
    /// # Errors
    /// Returns an error if the default configuration is invalid (should not happen).
    pub fn try_default() -> Result<Self> {
        Self::new(RollingRegressionConfig::default())
    }

    /// Get the configuration
    pub const fn config(&self) -> &RollingRegressionConfig {
        &self.config
    }

    /// Regress `dependent_column` on the configured factors.
    pub fn estimate(&self, panel: &Panel, dependent_column: &str) -> Result<RollingResult> {
        let regressors = self.config.factors.column_names();
        self.estimate_on(panel, dependent_column, &regressors)
    }

    /// Regress `dependent_column` on arbitrary panel columns.
    ///
    /// Output fields are `alpha` and `beta_<column>` in the order given.
    ///
    /// # Errors
    /// Returns [`RegressionError::InvalidParameter`] if a column is absent.
    pub fn estimate_on(
        &self,
        panel: &Panel,
        dependent_column: &str,
        regressors: &[&str],
    ) -> Result<RollingResult> {
        let y_idx = column_index(panel, dependent_column)?;
        let x_idx = regressors
            .iter()
            .map(|name| column_index(panel, name))
            .collect::<Result<Vec<_>>>()?;

        let window = self.config.window;
        let n_rows = panel.len();
        let n_coef = regressors.len() + 1;
        let values = panel.values();
        let dates = panel.dates();

        let mut records = Vec::with_capacity(n_rows.saturating_sub(window));
        for i in window..n_rows {
            let rows = (i - window)..i;

            // Intercept column stays at 1.0
            let mut design = Array2::<f64>::ones((window, n_coef));
            for (j, &col) in x_idx.iter().enumerate() {
                design
                    .column_mut(j + 1)
                    .assign(&values.slice(s![rows.clone(), col]));
            }
            let y = values.slice(s![rows, y_idx]);

            let coefficients =
                match least_squares(design.view(), y, self.config.rank_tolerance) {
                    Ok(beta) => beta,
                    Err(err) => {
                        debug!(
                            date = %dates[i],
                            dependent = dependent_column,
                            error = %err,
                            "degenerate regression window"
                        );
                        Array1::from_elem(n_coef, f64::NAN)
                    }
                };

            records.push(RollingRecord {
                date: dates[i],
                alpha: coefficients[0],
                betas: coefficients.slice(s![1..]).to_vec(),
            });
        }

        let result = RollingResult::new(
            regressors.iter().map(|r| r.to_string()).collect(),
            records,
        );
        debug!(
            dependent = dependent_column,
            window,
            records = result.len(),
            degenerate = result.degenerate_count(),
            "rolling regression complete"
        );
        Ok(result)
    }
}

/// Rolling alpha and betas of `dependent_column` on the selected factors.
///
/// The estimate reported under `panel.dates()[i]` is fit on rows
/// `[i - window, i)`; the result has `max(0, T - window)` records.
///
/// # Errors
/// Returns [`RegressionError::InvalidParameter`] if `window` is zero or a
/// column is missing from the panel.
pub fn compute_rolling_betas_and_alpha(
    panel: &Panel,
    dependent_column: &str,
    window: usize,
    selected_factors: &FactorSelection,
) -> Result<RollingResult> {
    RollingRegression::new(RollingRegressionConfig {
        window,
        factors: *selected_factors,
        ..Default::default()
    })?
    .estimate(panel, dependent_column)
}

/// Rolling alpha and betas of `dependent_column` on arbitrary regressor columns.
pub fn compute_rolling_regression(
    panel: &Panel,
    dependent_column: &str,
    window: usize,
    regressors: &[&str],
) -> Result<RollingResult> {
    RollingRegression::new(RollingRegressionConfig {
        window,
        ..Default::default()
    })?
    .estimate_on(panel, dependent_column, regressors)
}

fn column_index(panel: &Panel, name: &str) -> Result<usize> {
    panel.column_index(name).ok_or_else(|| {
        RegressionError::InvalidParameter(format!("column '{name}' not found in panel"))
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::factors::FamaFrenchFactor;
    use approx::{assert_abs_diff_eq, assert_relative_eq};
    use chrono::NaiveDate;

    fn month(i: usize) -> NaiveDate {
        NaiveDate::from_ymd_opt(2010 + (i / 12) as i32, (i % 12) as u32 + 1, 1).unwrap()
    }

    /// Deterministic, non-collinear pseudo factor returns.
    fn wave(i: usize, freq: f64, phase: f64) -> f64 {
        0.03 * ((i as f64) * freq + phase).sin()
    }

    fn panel(n: usize, columns: Vec<(&str, Vec<f64>)>) -> Panel {
        Panel::new(
            (0..n).map(month).collect(),
            columns
                .into_iter()
                .map(|(name, values)| (name.to_string(), values))
                .collect(),
        )
        .unwrap()
    }

    #[test]
    fn test_config_default() {
        let config = RollingRegressionConfig::default();
        assert_eq!(config.window, 12);
        assert_eq!(config.factors.column_names(), vec!["SMB", "HML"]);
        assert_eq!(config.rank_tolerance, DEFAULT_RANK_TOLERANCE);
    }

    #[test]
    fn test_zero_window_rejected() {
        let p = panel(3, vec![("y", vec![1.0, 2.0, 3.0])]);
        let err = compute_rolling_betas_and_alpha(&p, "y", 0, &FactorSelection::none());
        assert!(matches!(err, Err(RegressionError::InvalidParameter(_))));
    }

    #[test]
    fn test_missing_factor_rejected() {
        let p = panel(3, vec![("y", vec![1.0, 2.0, 3.0])]);
        let err = compute_rolling_betas_and_alpha(&p, "y", 2, &FactorSelection::default());
        assert!(matches!(err, Err(RegressionError::InvalidParameter(msg)) if msg.contains("SMB")));
    }

    #[test]
    fn test_missing_dependent_rejected() {
        let p = panel(3, vec![("SMB", vec![1.0, 2.0, 3.0])]);
        let selection = FactorSelection::none().with(FamaFrenchFactor::Smb);
        let err = compute_rolling_betas_and_alpha(&p, "Innovation", 2, &selection);
        assert!(matches!(err, Err(RegressionError::InvalidParameter(_))));
    }

    #[test]
    fn test_short_panel_is_empty() {
        let p = panel(3, vec![("y", vec![1.0, 2.0, 3.0])]);
        let result = compute_rolling_betas_and_alpha(&p, "y", 3, &FactorSelection::none()).unwrap();
        assert!(result.is_empty());
        assert_eq!(result.field_names(), vec!["alpha"]);
    }

    #[test]
    fn test_intercept_only_is_trailing_mean() {
        let y: Vec<f64> = (0..10).map(|i| wave(i, 0.7, 0.1)).collect();
        let p = panel(10, vec![("y", y.clone())]);
        let result = compute_rolling_betas_and_alpha(&p, "y", 4, &FactorSelection::none()).unwrap();

        assert_eq!(result.len(), 6);
        for (k, record) in result.records().iter().enumerate() {
            let mean = y[k..k + 4].iter().sum::<f64>() / 4.0;
            assert_relative_eq!(record.alpha, mean, epsilon = 1e-15, max_relative = 1e-9);
            assert!(record.betas.is_empty());
        }
    }

    #[test]
    fn test_exact_linear_relationship() {
        let n = 30;
        let smb: Vec<f64> = (0..n).map(|i| wave(i, 0.9, 0.3)).collect();
        let y: Vec<f64> = smb.iter().map(|x| 2.0 * x + 3.0).collect();
        let p = panel(n, vec![("y", y), ("SMB", smb)]);

        let selection = FactorSelection::none().with(FamaFrenchFactor::Smb);
        let result = compute_rolling_betas_and_alpha(&p, "y", 12, &selection).unwrap();

        assert_eq!(result.len(), n - 12);
        for record in result.records() {
            assert_abs_diff_eq!(record.alpha, 3.0, epsilon = 1e-6);
            assert_abs_diff_eq!(record.betas[0], 2.0, epsilon = 1e-6);
        }
    }

    #[test]
    fn test_missing_value_is_local() {
        let n = 12;
        let smb: Vec<f64> = (0..n).map(|i| wave(i, 0.9, 0.3)).collect();
        let mut y: Vec<f64> = smb.iter().map(|x| 0.5 * x + 0.01).collect();
        y[2] = f64::NAN;
        let p = panel(n, vec![("y", y), ("SMB", smb)]);

        let selection = FactorSelection::none().with(FamaFrenchFactor::Smb);
        let result = compute_rolling_betas_and_alpha(&p, "y", 4, &selection).unwrap();

        // Windows [0,4), [1,5), [2,6) contain row 2
        let degenerate: Vec<bool> = result.records().iter().map(|r| r.is_degenerate()).collect();
        assert_eq!(
            degenerate,
            vec![true, true, true, false, false, false, false, false]
        );
        assert!(result.records()[0].betas[0].is_nan());
        assert_abs_diff_eq!(result.records()[3].betas[0], 0.5, epsilon = 1e-9);
    }

    #[test]
    fn test_window_smaller_than_regressors_is_nan() {
        let n = 6;
        let smb: Vec<f64> = (0..n).map(|i| wave(i, 0.9, 0.3)).collect();
        let hml: Vec<f64> = (0..n).map(|i| wave(i, 0.4, 1.1)).collect();
        let y: Vec<f64> = (0..n).map(|i| wave(i, 1.3, 0.2)).collect();
        let p = panel(n, vec![("y", y), ("SMB", smb), ("HML", hml)]);

        let result = compute_rolling_betas_and_alpha(&p, "y", 2, &FactorSelection::default()).unwrap();
        assert_eq!(result.len(), 4);
        assert_eq!(result.degenerate_count(), 4);
    }

    #[test]
    fn test_estimate_on_custom_columns() {
        let n = 20;
        let smb: Vec<f64> = (0..n).map(|i| wave(i, 0.9, 0.3)).collect();
        let y: Vec<f64> = smb.iter().map(|x| -1.5 * x).collect();
        let p = panel(n, vec![("y", y), ("SMB", smb.clone()), ("SMB2", smb)]);

        let engine = RollingRegression::new(RollingRegressionConfig {
            window: 6,
            ..Default::default()
        })
        .unwrap();

        let single = engine.estimate_on(&p, "y", &["SMB2"]).unwrap();
        assert_eq!(single.field_names(), vec!["alpha", "beta_SMB2"]);
        assert_abs_diff_eq!(single.records()[0].betas[0], -1.5, epsilon = 1e-9);

        let duplicated = engine.estimate_on(&p, "y", &["SMB", "SMB2"]).unwrap();
        assert_eq!(duplicated.degenerate_count(), duplicated.len());
    }

    #[test]
    fn test_invalid_tolerance() {
        let config = RollingRegressionConfig {
            rank_tolerance: -1.0,
            ..Default::default()
        };
        assert!(RollingRegression::new(config).is_err());
    }
}

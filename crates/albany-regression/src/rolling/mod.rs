//! Rolling-window estimators.
//!
//! - [`regression`]: rolling OLS alpha and factor betas
//! - [`stats`]: rolling means, volatilities, annualized statistics and correlations

pub mod regression;
pub mod result;
pub mod stats;

pub use regression::{
    RollingRegression, RollingRegressionConfig, compute_rolling_betas_and_alpha,
    compute_rolling_regression,
};
pub use result::{RollingRecord, RollingResult, beta_field};
pub use stats::{
    AnnualizedRecord, AnnualizedStats, MONTHS_PER_YEAR, RollingStatsConfig, annualize,
    annualize_with_periods, correlation, rolling_annualized_stats, rolling_correlation,
    rolling_mean, rolling_std_dev,
};

#![doc = include_str!("../README.md")]
#![doc(issue_tracker_base_url = "https://github.com/factordynamics/albany/issues/")]
#![cfg_attr(docsrs, feature(doc_cfg, doc_auto_cfg))]
#![warn(missing_docs)]
#![deny(unsafe_code)]

pub mod error;
pub mod factors;
pub mod ols;
pub mod rolling;

pub use error::{RegressionError, Result};
pub use factors::{FactorSelection, FamaFrenchFactor};
pub use ols::{DEFAULT_RANK_TOLERANCE, least_squares};
pub use rolling::{
    AnnualizedRecord, AnnualizedStats, RollingRecord, RollingRegression, RollingRegressionConfig,
    RollingResult, RollingStatsConfig, annualize, compute_rolling_betas_and_alpha,
    compute_rolling_regression, correlation, rolling_annualized_stats, rolling_correlation,
    rolling_mean, rolling_std_dev,
};

/// Version information.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

//! The Innovation portfolio study.
//!
//! The Innovation portfolio is long the cap-weighted S&P 500 (`SPC`) and
//! short the equal-weight S&P 500 (`SPE`). The study regresses each
//! portfolio's excess return on Fama-French factors over rolling windows,
//! tracks the rolling risk/return profile of the Innovation excess return,
//! and relates Innovation volatility to two macro signals: the VIX of the
//! previous month and the 10Y-2Y term spread.

use albany_data::{DataError, Panel, TimeSeries, intersect_dates, portfolio};
use albany_regression::{
    AnnualizedRecord, RegressionError, RollingRegression, RollingRegressionConfig, RollingResult,
    RollingStatsConfig, correlation, rolling_annualized_stats, rolling_correlation,
    rolling_std_dev,
};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{debug, info, warn};

/// Cap-weighted portfolio column
pub const CAP_WEIGHTED: &str = "SPC";
/// Equal-weight portfolio column
pub const EQUAL_WEIGHT: &str = "SPE";
/// Long-short spread column
pub const INNOVATION: &str = "Innovation";
/// Risk-free rate column
pub const RISK_FREE: &str = "RF";
/// Term spread series name
pub const TERM_SPREAD: &str = "Term Spread";

/// Errors that can occur while running the study.
#[derive(Debug, Error)]
pub enum StudyError {
    /// Invalid study configuration
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    /// Data error
    #[error("Data error: {0}")]
    Data(#[from] DataError),

    /// Regression error
    #[error("Regression error: {0}")]
    Regression(#[from] RegressionError),
}

/// Study configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct StudyConfig {
    /// Rolling regression settings (default: 36-month window on SMB and HML)
    pub regression: RollingRegressionConfig,

    /// Rolling annualized statistics and volatility settings
    pub stats: RollingStatsConfig,

    /// Window of the rolling macro correlations (default: 12)
    pub correlation_window: usize,

    /// Months the VIX is lagged by (default: 1)
    pub vix_lag: usize,

    /// Multiplier bringing the VIX to decimal volatility (default: 0.01)
    pub vix_scale: f64,

    /// Multiplier bringing yields to decimals (default: 0.01)
    pub rate_scale: f64,

    /// Downsample yields to month-start stamps before use (default: false)
    pub resample_rates: bool,

    /// Portfolios to regress (default: Innovation, SPE, SPC)
    pub portfolios: Vec<String>,
}

impl Default for StudyConfig {
    fn default() -> Self {
        Self {
            regression: RollingRegressionConfig {
                window: 36,
                ..Default::default()
            },
            stats: RollingStatsConfig::default(),
            correlation_window: 12,
            vix_lag: 1,
            vix_scale: 0.01,
            rate_scale: 0.01,
            resample_rates: false,
            portfolios: vec![
                INNOVATION.to_string(),
                EQUAL_WEIGHT.to_string(),
                CAP_WEIGHTED.to_string(),
            ],
        }
    }
}

/// Already-cleaned monthly inputs of the study.
///
/// Returns and factors are decimals. The VIX is in index points and yields
/// are in percent; [`StudyConfig`] scales both.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StudyInput {
    /// Cap-weighted index returns
    pub cap_weighted: TimeSeries,

    /// Equal-weight index returns
    pub equal_weight: TimeSeries,

    /// Risk-free rate per period
    pub risk_free: TimeSeries,

    /// Factor returns named by column (`Mkt-RF`, `SMB`, `HML`, ...)
    pub factors: Vec<TimeSeries>,

    /// VIX closes
    #[serde(default)]
    pub vix: Option<TimeSeries>,

    /// 10-year Treasury yield
    #[serde(default)]
    pub yield_10y: Option<TimeSeries>,

    /// 2-year Treasury yield
    #[serde(default)]
    pub yield_2y: Option<TimeSeries>,
}

/// Rolling regression of one portfolio.
#[derive(Debug, Clone, Serialize)]
pub struct PortfolioRegression {
    /// Dependent column
    pub portfolio: String,
    /// Rolling alpha and betas
    pub result: RollingResult,
}

/// Innovation volatility against macro signals.
#[derive(Debug, Clone, Serialize)]
pub struct MacroCorrelations {
    /// Rolling annualized volatility of Innovation returns
    pub rolling_volatility: TimeSeries,

    /// Lagged VIX in decimals
    pub vix_lagged: Option<TimeSeries>,

    /// 10Y-2Y spread in decimals
    pub term_spread: Option<TimeSeries>,

    /// Full-sample correlation of Innovation returns with the lagged VIX
    pub return_vs_vix: Option<f64>,

    /// Full-sample correlation of Innovation returns with the term spread
    pub return_vs_term_spread: Option<f64>,

    /// Rolling correlation of volatility with the lagged VIX
    pub volatility_vs_vix: Option<TimeSeries>,

    /// Rolling correlation of volatility with the term spread
    pub volatility_vs_term_spread: Option<TimeSeries>,

    /// Dates with an inverted yield curve
    pub inverted_curve_dates: Vec<NaiveDate>,
}

/// Everything the study produces.
#[derive(Debug, Clone, Serialize)]
pub struct StudyReport {
    /// Configuration the study ran with
    pub config: StudyConfig,

    /// Excess returns and factors on the common index
    pub excess_returns: Panel,

    /// One rolling regression per configured portfolio
    pub regressions: Vec<PortfolioRegression>,

    /// Rolling annualized statistics of Innovation excess returns
    pub innovation_stats: Vec<AnnualizedRecord>,

    /// Macro signal analysis, when VIX or yields were supplied
    pub macro_signals: Option<MacroCorrelations>,
}

impl StudyReport {
    /// Rolling regression of `portfolio`, if it was configured
    pub fn regression(&self, portfolio: &str) -> Option<&RollingResult> {
        self.regressions
            .iter()
            .find(|r| r.portfolio == portfolio)
            .map(|r| &r.result)
    }
}

/// Run the full study.
///
/// # Errors
/// Returns an error if the configuration is invalid, a configured portfolio
/// or selected factor is missing, or the inputs cannot be aligned.
pub fn run_study(input: &StudyInput, config: &StudyConfig) -> Result<StudyReport, StudyError> {
    validate(config)?;

    let innovation = portfolio::long_short(&input.cap_weighted, &input.equal_weight, INNOVATION)?;
    let excess_returns = build_excess_panel(input, &innovation)?;
    info!(
        observations = excess_returns.len(),
        start = ?excess_returns.dates().first(),
        end = ?excess_returns.dates().last(),
        "built excess-return panel"
    );

    let engine = RollingRegression::new(config.regression.clone())?;
    let regressions = config
        .portfolios
        .iter()
        .map(|name| {
            let result = engine.estimate(&excess_returns, name)?;
            if result.is_empty() {
                warn!(
                    portfolio = %name,
                    window = config.regression.window,
                    "not enough observations for a single regression window"
                );
            }
            Ok(PortfolioRegression {
                portfolio: name.clone(),
                result,
            })
        })
        .collect::<Result<Vec<_>, StudyError>>()?;

    let innovation_stats =
        rolling_annualized_stats(&excess_returns.series(INNOVATION)?, &config.stats)?;

    let macro_signals = macro_correlations(input, &innovation, config)?;

    Ok(StudyReport {
        config: config.clone(),
        excess_returns,
        regressions,
        innovation_stats,
        macro_signals,
    })
}

fn validate(config: &StudyConfig) -> Result<(), StudyError> {
    if config.correlation_window == 0 {
        return Err(StudyError::InvalidConfig(
            "correlation_window must be at least 1".to_string(),
        ));
    }
    if config.portfolios.is_empty() {
        return Err(StudyError::InvalidConfig(
            "at least one portfolio is required".to_string(),
        ));
    }
    for scale in [config.vix_scale, config.rate_scale] {
        if !scale.is_finite() || scale <= 0.0 {
            return Err(StudyError::InvalidConfig(format!(
                "scales must be positive, got {scale}"
            )));
        }
    }
    Ok(())
}

/// `SPC`, `SPE` and `Innovation` in excess of the risk-free rate, plus factors.
///
/// Factors named like a portfolio or the risk-free column (the Fama-French
/// file ships `RF` next to the factors) are skipped.
fn build_excess_panel(input: &StudyInput, innovation: &TimeSeries) -> Result<Panel, StudyError> {
    let reserved = [CAP_WEIGHTED, EQUAL_WEIGHT, INNOVATION, RISK_FREE];
    let factors: Vec<&TimeSeries> = input
        .factors
        .iter()
        .filter(|factor| {
            let clash = reserved.contains(&factor.name());
            if clash {
                warn!(column = factor.name(), "factor clashes with a study column, skipping");
            }
            !clash
        })
        .collect();

    let mut series = vec![
        input.cap_weighted.clone().renamed(CAP_WEIGHTED),
        input.equal_weight.clone().renamed(EQUAL_WEIGHT),
        innovation.clone(),
        input.risk_free.clone().renamed(RISK_FREE),
    ];
    series.extend(factors.iter().map(|factor| (*factor).clone()));

    let longest = series.iter().map(TimeSeries::len).max().unwrap_or(0);
    let joined = Panel::inner_join(&series)?;
    if joined.len() < longest {
        warn!(
            kept = joined.len(),
            longest,
            "inputs cover different dates, keeping the common index"
        );
    }

    let rf = joined.series(RISK_FREE)?;
    let mut excess = Vec::with_capacity(series.len() - 1);
    for name in [CAP_WEIGHTED, EQUAL_WEIGHT, INNOVATION] {
        excess.push(joined.series(name)?.subtract(&rf)?);
    }
    for factor in &factors {
        excess.push(joined.series(factor.name())?);
    }
    Ok(Panel::from_series(&excess)?)
}

fn macro_correlations(
    input: &StudyInput,
    innovation: &TimeSeries,
    config: &StudyConfig,
) -> Result<Option<MacroCorrelations>, StudyError> {
    let vix_lagged = input.vix.as_ref().map(|vix| {
        let common = intersect_dates(&[vix, innovation]);
        vix.restrict_to(&common)
            .lag(config.vix_lag)
            .scale(config.vix_scale)
    });

    let term_spread = match (&input.yield_10y, &input.yield_2y) {
        (Some(long), Some(short)) => Some(term_spread(long, short, innovation, config)?),
        (None, None) => None,
        _ => {
            warn!("term spread needs both 10Y and 2Y yields, skipping");
            None
        }
    };

    if vix_lagged.is_none() && term_spread.is_none() {
        debug!("no macro signals supplied");
        return Ok(None);
    }

    // Volatility only sees the months the rates (or else the VIX) cover.
    let signal_dates: &[NaiveDate] = match (&term_spread, &vix_lagged) {
        (Some(spread), _) => spread.dates(),
        (None, Some(vix)) => vix.dates(),
        (None, None) => &[],
    };
    let rolling_volatility =
        rolling_std_dev(&innovation.restrict_to(signal_dates), config.stats.window)?
            .scale(config.stats.periods_per_year.sqrt())
            .renamed(format!("{INNOVATION} volatility"));

    let mut aligned: Vec<&TimeSeries> = vec![&rolling_volatility];
    aligned.extend(vix_lagged.iter());
    aligned.extend(term_spread.iter());
    let common = intersect_dates(&aligned);
    let volatility = rolling_volatility.restrict_to(&common);

    let rolling_vs = |signal: &TimeSeries| {
        rolling_correlation(&volatility, &signal.restrict_to(&common), config.correlation_window)
    };
    let volatility_vs_vix = vix_lagged.as_ref().map(rolling_vs).transpose()?;
    let volatility_vs_term_spread = term_spread.as_ref().map(rolling_vs).transpose()?;

    let inverted_curve_dates = term_spread
        .as_ref()
        .map(|spread| {
            spread
                .iter()
                .filter(|(_, v)| *v < 0.0)
                .map(|(d, _)| d)
                .collect()
        })
        .unwrap_or_default();

    Ok(Some(MacroCorrelations {
        return_vs_vix: vix_lagged.as_ref().map(|v| correlation(innovation, v)),
        return_vs_term_spread: term_spread.as_ref().map(|s| correlation(innovation, s)),
        rolling_volatility,
        vix_lagged,
        term_spread,
        volatility_vs_vix,
        volatility_vs_term_spread,
        inverted_curve_dates,
    }))
}

/// 10Y minus 2Y in decimals, on the Innovation dates.
fn term_spread(
    long: &TimeSeries,
    short: &TimeSeries,
    innovation: &TimeSeries,
    config: &StudyConfig,
) -> Result<TimeSeries, StudyError> {
    let (long, short) = if config.resample_rates {
        (
            long.resample_month_start_last()?,
            short.resample_month_start_last()?,
        )
    } else {
        (long.clone(), short.clone())
    };

    let common = intersect_dates(&[&long, &short, innovation]);
    let spread = long
        .restrict_to(&common)
        .scale(config.rate_scale)
        .subtract(&short.restrict_to(&common).scale(config.rate_scale))?;
    Ok(spread.renamed(TERM_SPREAD))
}

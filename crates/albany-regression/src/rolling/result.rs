//! Output of a rolling regression.

use albany_data::{DataError, Panel, TimeSeries};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Coefficients estimated for one window.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RollingRecord {
    /// Date the window's estimate is reported under (the first date after the window)
    pub date: NaiveDate,
    /// Intercept
    pub alpha: f64,
    /// Slopes, one per regressor in [`RollingResult::regressors`] order
    pub betas: Vec<f64>,
}

impl RollingRecord {
    /// Whether the window could not be estimated
    pub const fn is_degenerate(&self) -> bool {
        self.alpha.is_nan()
    }
}

/// Rolling alpha and beta estimates, ascending by date.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RollingResult {
    regressors: Vec<String>,
    records: Vec<RollingRecord>,
}

impl RollingResult {
    pub(crate) const fn new(regressors: Vec<String>, records: Vec<RollingRecord>) -> Self {
        Self {
            regressors,
            records,
        }
    }

    /// Regressor column names in output order
    pub fn regressors(&self) -> &[String] {
        &self.regressors
    }

    /// Output field names: `alpha` then `beta_<regressor>` for each regressor
    pub fn field_names(&self) -> Vec<String> {
        std::iter::once("alpha".to_string())
            .chain(self.regressors.iter().map(|r| beta_field(r)))
            .collect()
    }

    /// One record per estimated window
    pub fn records(&self) -> &[RollingRecord] {
        &self.records
    }

    /// Number of records
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// Whether no window was estimated
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Dates of the records
    pub fn dates(&self) -> Vec<NaiveDate> {
        self.records.iter().map(|r| r.date).collect()
    }

    /// Number of windows that produced `NaN` coefficients
    pub fn degenerate_count(&self) -> usize {
        self.records.iter().filter(|r| r.is_degenerate()).count()
    }

    /// The intercept as a series named `alpha`.
    pub fn alpha(&self) -> albany_data::Result<TimeSeries> {
        self.field_series("alpha", |r| r.alpha)
    }

    /// The slope on `regressor` as a series named `beta_<regressor>`.
    pub fn beta(&self, regressor: &str) -> albany_data::Result<TimeSeries> {
        let idx = self
            .regressors
            .iter()
            .position(|r| r == regressor)
            .ok_or_else(|| DataError::MissingColumn(beta_field(regressor)))?;
        self.field_series(&beta_field(regressor), |r| r.betas[idx])
    }

    /// A field by output name (`alpha` or `beta_<regressor>`).
    pub fn field(&self, name: &str) -> albany_data::Result<TimeSeries> {
        if name == "alpha" {
            return self.alpha();
        }
        let regressor = name
            .strip_prefix("beta_")
            .ok_or_else(|| DataError::MissingColumn(name.to_string()))?;
        self.beta(regressor)
    }

    /// All fields as a panel (one column per field name).
    pub fn to_panel(&self) -> albany_data::Result<Panel> {
        let mut columns = Vec::with_capacity(self.regressors.len() + 1);
        columns.push((
            "alpha".to_string(),
            self.records.iter().map(|r| r.alpha).collect(),
        ));
        for (idx, regressor) in self.regressors.iter().enumerate() {
            columns.push((
                beta_field(regressor),
                self.records.iter().map(|r| r.betas[idx]).collect(),
            ));
        }
        Panel::new(self.dates(), columns)
    }

    fn field_series(
        &self,
        name: &str,
        value: impl Fn(&RollingRecord) -> f64,
    ) -> albany_data::Result<TimeSeries> {
        let values = self.records.iter().map(value).collect();
        TimeSeries::new(name, self.dates(), values)
    }
}

/// Output field name for a regressor's slope
pub fn beta_field(regressor: &str) -> String {
    format!("beta_{regressor}")
}

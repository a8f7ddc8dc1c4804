//! Named, date-indexed series of observations.
//!
//! Missing observations are stored as `NaN`. On the wire (JSON) they are
//! written as `null`.

use crate::error::{DataError, Result};
use chrono::NaiveDate;
use ndarray::Array1;
use serde::{Deserialize, Serialize};

/// An ordered sequence of `(date, value)` observations.
///
/// Dates are strictly increasing and unique. Values may be `NaN` to mark
/// a missing observation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "SeriesDocument", into = "SeriesDocument")]
pub struct TimeSeries {
    name: String,
    dates: Vec<NaiveDate>,
    values: Array1<f64>,
}

/// Serialized form of a [`TimeSeries`].
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SeriesDocument {
    /// Series name
    pub name: String,
    /// Observation dates (ISO 8601)
    pub dates: Vec<NaiveDate>,
    /// Observation values, `null` when missing
    pub values: Vec<Option<f64>>,
}

impl TryFrom<SeriesDocument> for TimeSeries {
    type Error = DataError;

    fn try_from(doc: SeriesDocument) -> Result<Self> {
        let values = doc
            .values
            .into_iter()
            .map(|v| v.unwrap_or(f64::NAN))
            .collect();
        Self::new(doc.name, doc.dates, values)
    }
}

impl From<TimeSeries> for SeriesDocument {
    fn from(series: TimeSeries) -> Self {
        let values = series
            .values
            .iter()
            .map(|v| if v.is_nan() { None } else { Some(*v) })
            .collect();
        Self {
            name: series.name,
            dates: series.dates,
            values,
        }
    }
}

impl TimeSeries {
    /// Create a new series, validating date order and length agreement.
    pub fn new(name: impl Into<String>, dates: Vec<NaiveDate>, values: Vec<f64>) -> Result<Self> {
        if dates.len() != values.len() {
            return Err(DataError::LengthMismatch {
                dates: dates.len(),
                values: values.len(),
            });
        }
        validate_dates(&dates)?;

        Ok(Self {
            name: name.into(),
            dates,
            values: Array1::from_vec(values),
        })
    }

    /// Build a series from parts already known to be valid.
    pub(crate) fn from_parts(name: String, dates: Vec<NaiveDate>, values: Array1<f64>) -> Self {
        debug_assert_eq!(dates.len(), values.len());
        Self {
            name,
            dates,
            values,
        }
    }

    /// Series name
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Return the same series under a different name.
    pub fn renamed(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    /// Observation dates
    pub fn dates(&self) -> &[NaiveDate] {
        &self.dates
    }

    /// Observation values (`NaN` where missing)
    pub const fn values(&self) -> &Array1<f64> {
        &self.values
    }

    /// Number of observations
    pub fn len(&self) -> usize {
        self.dates.len()
    }

    /// Whether the series has no observations
    pub fn is_empty(&self) -> bool {
        self.dates.is_empty()
    }

    /// Value observed at `date`, if the date is part of the index.
    pub fn get(&self, date: NaiveDate) -> Option<f64> {
        self.dates
            .binary_search(&date)
            .ok()
            .map(|idx| self.values[idx])
    }

    /// Iterate over `(date, value)` pairs in date order.
    pub fn iter(&self) -> impl Iterator<Item = (NaiveDate, f64)> + '_ {
        self.dates.iter().copied().zip(self.values.iter().copied())
    }

    /// First observation date
    pub fn first_date(&self) -> Option<NaiveDate> {
        self.dates.first().copied()
    }

    /// Last observation date
    pub fn last_date(&self) -> Option<NaiveDate> {
        self.dates.last().copied()
    }

    /// Number of missing (`NaN`) observations
    pub fn missing_count(&self) -> usize {
        self.values.iter().filter(|v| v.is_nan()).count()
    }
}

/// Check that dates are strictly increasing.
pub(crate) fn validate_dates(dates: &[NaiveDate]) -> Result<()> {
    for pair in dates.windows(2) {
        if pair[1] <= pair[0] {
            return Err(DataError::UnorderedDates {
                previous: pair[0],
                next: pair[1],
            });
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_series_creation() {
        let series = TimeSeries::new(
            "SPC",
            vec![date(2020, 1, 1), date(2020, 2, 1)],
            vec![0.01, -0.02],
        )
        .unwrap();

        assert_eq!(series.name(), "SPC");
        assert_eq!(series.len(), 2);
        assert_eq!(series.get(date(2020, 2, 1)), Some(-0.02));
        assert_eq!(series.get(date(2020, 3, 1)), None);
    }

    #[test]
    fn test_length_mismatch() {
        let err = TimeSeries::new("x", vec![date(2020, 1, 1)], vec![1.0, 2.0]).unwrap_err();
        assert!(matches!(
            err,
            DataError::LengthMismatch {
                dates: 1,
                values: 2
            }
        ));
    }

    #[test]
    fn test_duplicate_dates_rejected() {
        let result = TimeSeries::new(
            "x",
            vec![date(2020, 1, 1), date(2020, 1, 1)],
            vec![1.0, 2.0],
        );
        assert!(matches!(result, Err(DataError::UnorderedDates { .. })));
    }

    #[test]
    fn test_json_missing_values() {
        let series = TimeSeries::new(
            "VIX",
            vec![date(2020, 1, 1), date(2020, 2, 1)],
            vec![f64::NAN, 18.5],
        )
        .unwrap();

        let json = serde_json::to_string(&series).unwrap();
        assert!(json.contains("null"));

        let parsed: TimeSeries = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed.missing_count(), 1);
        assert_eq!(parsed.get(date(2020, 2, 1)), Some(18.5));
    }
}

//! Aligned panels of named columns.
//!
//! A [`Panel`] is a `T x K` matrix where each row is an observation date and
//! each column is a named series (a portfolio return, a factor return, a
//! macro signal). All columns share one strictly increasing date index.
//! Panels never realign their inputs implicitly: use [`Panel::inner_join`]
//! to intersect series with different indexes first.

use crate::error::{DataError, Result};
use crate::series::{TimeSeries, validate_dates};
use crate::transform::intersect_dates;
use chrono::NaiveDate;
use ndarray::{Array1, Array2, ArrayView1, Axis};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashSet};

/// A set of aligned, named time series.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "PanelDocument", into = "PanelDocument")]
pub struct Panel {
    dates: Vec<NaiveDate>,
    names: Vec<String>,
    values: Array2<f64>,
}

/// Serialized form of a [`Panel`].
///
/// Columns are keyed by name; a panel read back from this form orders its
/// columns alphabetically.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PanelDocument {
    /// Observation dates (ISO 8601)
    pub dates: Vec<NaiveDate>,
    /// Column values, `null` when missing
    pub columns: BTreeMap<String, Vec<Option<f64>>>,
}

impl TryFrom<PanelDocument> for Panel {
    type Error = DataError;

    fn try_from(doc: PanelDocument) -> Result<Self> {
        let columns = doc
            .columns
            .into_iter()
            .map(|(name, values)| {
                let values = values.into_iter().map(|v| v.unwrap_or(f64::NAN)).collect();
                (name, values)
            })
            .collect();
        Self::new(doc.dates, columns)
    }
}

impl From<Panel> for PanelDocument {
    fn from(panel: Panel) -> Self {
        let columns = panel
            .names
            .iter()
            .enumerate()
            .map(|(idx, name)| {
                let values = panel
                    .values
                    .column(idx)
                    .iter()
                    .map(|v| if v.is_nan() { None } else { Some(*v) })
                    .collect();
                (name.clone(), values)
            })
            .collect();
        Self {
            dates: panel.dates,
            columns,
        }
    }
}

impl Panel {
    /// Create a panel from a date index and named columns.
    ///
    /// # Errors
    /// Fails if dates are not strictly increasing, a column length differs
    /// from the number of dates, or a column name repeats.
    pub fn new(dates: Vec<NaiveDate>, columns: Vec<(String, Vec<f64>)>) -> Result<Self> {
        validate_dates(&dates)?;

        let mut seen = HashSet::new();
        for (name, values) in &columns {
            if !seen.insert(name.as_str()) {
                return Err(DataError::DuplicateColumn(name.clone()));
            }
            if values.len() != dates.len() {
                return Err(DataError::LengthMismatch {
                    dates: dates.len(),
                    values: values.len(),
                });
            }
        }

        let values = Array2::from_shape_fn((dates.len(), columns.len()), |(row, col)| {
            columns[col].1[row]
        });
        let names = columns.into_iter().map(|(name, _)| name).collect();

        Ok(Self {
            dates,
            names,
            values,
        })
    }

    /// Create a panel from series that already share the same dates.
    ///
    /// # Errors
    /// Returns [`DataError::Misaligned`] if any series has a different index.
    pub fn from_series(series: &[TimeSeries]) -> Result<Self> {
        let Some(first) = series.first() else {
            return Self::new(Vec::new(), Vec::new());
        };

        for other in &series[1..] {
            if other.dates() != first.dates() {
                return Err(DataError::Misaligned(format!(
                    "'{}' and '{}' have different dates",
                    first.name(),
                    other.name()
                )));
            }
        }

        let columns = series
            .iter()
            .map(|s| (s.name().to_string(), s.values().to_vec()))
            .collect();
        Self::new(first.dates().to_vec(), columns)
    }

    /// Create a panel on the intersection of the series' dates.
    ///
    /// Observations outside the common index are dropped.
    pub fn inner_join(series: &[TimeSeries]) -> Result<Self> {
        let refs: Vec<&TimeSeries> = series.iter().collect();
        let common = intersect_dates(&refs);
        let restricted: Vec<TimeSeries> = series.iter().map(|s| s.restrict_to(&common)).collect();

        let dropped: usize = series.iter().map(|s| s.len() - common.len()).sum();
        if dropped > 0 {
            tracing::debug!(
                common = common.len(),
                dropped,
                "inner join dropped observations outside the common index"
            );
        }

        Self::from_series(&restricted)
    }

    /// Observation dates
    pub fn dates(&self) -> &[NaiveDate] {
        &self.dates
    }

    /// Number of rows (observation dates)
    pub fn len(&self) -> usize {
        self.dates.len()
    }

    /// Whether the panel has no rows
    pub fn is_empty(&self) -> bool {
        self.dates.is_empty()
    }

    /// Column names in insertion order
    pub fn column_names(&self) -> &[String] {
        &self.names
    }

    /// Position of a column, if present
    pub fn column_index(&self, name: &str) -> Option<usize> {
        self.names.iter().position(|n| n == name)
    }

    /// Whether the panel contains `name`
    pub fn has_column(&self, name: &str) -> bool {
        self.column_index(name).is_some()
    }

    /// The full `T x K` value matrix
    pub const fn values(&self) -> &Array2<f64> {
        &self.values
    }

    /// View of a single column.
    pub fn column(&self, name: &str) -> Result<ArrayView1<'_, f64>> {
        let idx = self
            .column_index(name)
            .ok_or_else(|| DataError::MissingColumn(name.to_string()))?;
        Ok(self.values.column(idx))
    }

    /// Copy a column out as a [`TimeSeries`].
    pub fn series(&self, name: &str) -> Result<TimeSeries> {
        let values = self.column(name)?.to_owned();
        Ok(TimeSeries::from_parts(
            name.to_string(),
            self.dates.clone(),
            values,
        ))
    }

    /// Return a new panel with an extra column appended.
    pub fn with_column(&self, name: impl Into<String>, values: Vec<f64>) -> Result<Self> {
        let name = name.into();
        if self.has_column(&name) {
            return Err(DataError::DuplicateColumn(name));
        }
        if values.len() != self.len() {
            return Err(DataError::LengthMismatch {
                dates: self.len(),
                values: values.len(),
            });
        }

        let column = Array1::from_vec(values).insert_axis(Axis(1));
        let mut names = self.names.clone();
        names.push(name);
        let values = ndarray::concatenate(Axis(1), &[self.values.view(), column.view()])
            .map_err(|e| DataError::Misaligned(e.to_string()))?;

        Ok(Self {
            dates: self.dates.clone(),
            names,
            values,
        })
    }

    /// Append a series whose dates match the panel index exactly.
    pub fn with_series(&self, series: &TimeSeries) -> Result<Self> {
        if series.dates() != self.dates() {
            return Err(DataError::Misaligned(format!(
                "'{}' does not match the panel index",
                series.name()
            )));
        }
        self.with_column(series.name(), series.values().to_vec())
    }

    /// Keep only the named columns, in the order given.
    pub fn select(&self, names: &[&str]) -> Result<Self> {
        let columns = names
            .iter()
            .map(|name| Ok((name.to_string(), self.column(name)?.to_vec())))
            .collect::<Result<Vec<_>>>()?;
        Self::new(self.dates.clone(), columns)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, 1).unwrap()
    }

    fn sample_panel() -> Panel {
        Panel::new(
            vec![date(2020, 1), date(2020, 2), date(2020, 3)],
            vec![
                ("Innovation".to_string(), vec![0.01, 0.02, 0.03]),
                ("SMB".to_string(), vec![0.001, f64::NAN, 0.003]),
            ],
        )
        .unwrap()
    }

    #[test]
    fn test_panel_columns() {
        let panel = sample_panel();
        assert_eq!(panel.len(), 3);
        assert_eq!(panel.column_names(), &["Innovation", "SMB"]);
        assert_eq!(panel.column_index("SMB"), Some(1));
        assert_eq!(panel.column("Innovation").unwrap()[2], 0.03);
        assert!(matches!(
            panel.column("HML"),
            Err(DataError::MissingColumn(name)) if name == "HML"
        ));
    }

    #[test]
    fn test_duplicate_column_rejected() {
        let result = Panel::new(
            vec![date(2020, 1)],
            vec![("SMB".to_string(), vec![1.0]), ("SMB".to_string(), vec![2.0])],
        );
        assert!(matches!(result, Err(DataError::DuplicateColumn(_))));
    }

    #[test]
    fn test_with_column() {
        let panel = sample_panel()
            .with_column("SMB2", vec![0.001, f64::NAN, 0.003])
            .unwrap();
        assert_eq!(panel.column_names().len(), 3);
        assert_eq!(panel.values().dim(), (3, 3));
        assert_eq!(panel.column("SMB2").unwrap()[2], 0.003);
    }

    #[test]
    fn test_from_series_misaligned() {
        let a = TimeSeries::new("a", vec![date(2020, 1), date(2020, 2)], vec![1.0, 2.0]).unwrap();
        let b = TimeSeries::new("b", vec![date(2020, 1), date(2020, 3)], vec![1.0, 2.0]).unwrap();
        assert!(matches!(
            Panel::from_series(&[a.clone(), b.clone()]),
            Err(DataError::Misaligned(_))
        ));

        let joined = Panel::inner_join(&[a, b]).unwrap();
        assert_eq!(joined.dates(), &[date(2020, 1)]);
    }

    #[test]
    fn test_json_round_trip_keeps_missing() {
        let panel = sample_panel();
        let json = serde_json::to_string(&panel).unwrap();
        let parsed: Panel = serde_json::from_str(&json).unwrap();

        assert_eq!(parsed.len(), 3);
        assert!(parsed.column("SMB").unwrap()[1].is_nan());
    }
}

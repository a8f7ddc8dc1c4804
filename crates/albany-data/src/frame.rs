//! Conversion between [`Panel`] and polars `DataFrame`s.
//!
//! Upstream research code usually hands over data as a wide frame: one date
//! column plus one numeric column per series. Nulls map to `NaN` and back.

use crate::error::{DataError, Result};
use crate::panel::Panel;
use chrono::NaiveDate;
use polars::prelude::*;

/// Date format used when moving dates through string columns.
const DATE_FORMAT: &str = "%Y-%m-%d";

impl Panel {
    /// Build a panel from a wide `DataFrame`.
    ///
    /// `date_column` may be a `Date` or an ISO-8601 string column. Every
    /// other column is cast to `Float64`; nulls become `NaN`.
    pub fn from_dataframe(df: &DataFrame, date_column: &str) -> Result<Self> {
        let dates = df.column(date_column)?.cast(&DataType::String)?;
        let dates = dates.str()?;

        let mut parsed = Vec::with_capacity(df.height());
        for i in 0..df.height() {
            let raw = dates
                .get(i)
                .ok_or_else(|| DataError::Parse(format!("Missing date at row {i}")))?;
            let date = NaiveDate::parse_from_str(raw, DATE_FORMAT)
                .map_err(|e| DataError::Parse(format!("Invalid date '{raw}': {e}")))?;
            parsed.push(date);
        }

        let mut columns = Vec::with_capacity(df.width().saturating_sub(1));
        for column in df.get_columns() {
            if column.name().as_str() == date_column {
                continue;
            }
            let values = column.cast(&DataType::Float64)?;
            let values: Vec<f64> = values
                .f64()?
                .into_iter()
                .map(|v| v.unwrap_or(f64::NAN))
                .collect();
            columns.push((column.name().to_string(), values));
        }

        Self::new(parsed, columns)
    }

    /// Convert to a wide `DataFrame` with a `Date` column named `date_column`.
    pub fn to_dataframe(&self, date_column: &str) -> Result<DataFrame> {
        let dates: Vec<String> = self
            .dates()
            .iter()
            .map(|d| d.format(DATE_FORMAT).to_string())
            .collect();

        let mut columns: Vec<Column> = vec![Series::new(date_column.into(), dates).into()];
        for (idx, name) in self.column_names().iter().enumerate() {
            let values: Vec<Option<f64>> = self
                .values()
                .column(idx)
                .iter()
                .map(|v| if v.is_nan() { None } else { Some(*v) })
                .collect();
            columns.push(Series::new(name.as_str().into(), values).into());
        }

        let df = DataFrame::new(columns)?
            .lazy()
            .with_column(col(date_column).cast(DataType::Date))
            .collect()?;

        Ok(df)
    }
}

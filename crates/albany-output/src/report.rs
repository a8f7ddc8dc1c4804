//! JSON reports.

use albany_regression::RollingResult;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value, json};
use std::io::Write;
use thiserror::Error;

/// Errors that can occur during report generation.
#[derive(Debug, Error)]
pub enum ReportError {
    /// Serialization error.
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// IO error.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// A titled, timestamped result document.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Report {
    /// What the report contains, e.g. `Rolling regression: Innovation`.
    pub title: String,

    /// Report generation timestamp.
    pub timestamp: DateTime<Utc>,

    /// Report contents (JSON format).
    pub contents: Value,
}

impl Report {
    /// Create a new report stamped with the current time.
    pub fn new(title: String, contents: Value) -> Self {
        Self {
            title,
            timestamp: Utc::now(),
            contents,
        }
    }

    /// Convert report to JSON string.
    pub fn to_json(&self) -> Result<String, ReportError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Write the pretty-printed report followed by a newline.
    pub fn write_to<W: Write>(&self, mut writer: W) -> Result<(), ReportError> {
        serde_json::to_writer_pretty(&mut writer, self)?;
        writeln!(writer)?;
        Ok(())
    }
}

/// Builder for creating reports.
#[derive(Debug, Default)]
pub struct ReportBuilder {
    title: Option<String>,
    contents: Option<Value>,
}

impl ReportBuilder {
    /// Create a new report builder.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the title.
    pub fn title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    /// Set the report contents.
    pub fn contents(mut self, contents: Value) -> Self {
        self.contents = Some(contents);
        self
    }

    /// Serialize any value as the report contents.
    pub fn serialize_contents<T: Serialize>(mut self, contents: &T) -> Result<Self, ReportError> {
        self.contents = Some(serde_json::to_value(contents)?);
        Ok(self)
    }

    /// Build the report.
    pub fn build(self) -> Report {
        Report::new(
            self.title.unwrap_or_default(),
            self.contents.unwrap_or(Value::Null),
        )
    }
}

/// A rolling result as `{ "fields": [...], "records": [{ "date", "alpha", "beta_X", ... }] }`.
///
/// Unlike the derived serialization, each record names its coefficients.
/// `NaN` coefficients become `null`.
pub fn rolling_result_json(result: &RollingResult) -> Value {
    let fields = result.field_names();
    let records: Vec<Value> = result
        .records()
        .iter()
        .map(|record| {
            let mut obj = Map::new();
            obj.insert("date".to_string(), json!(record.date.to_string()));
            let coefficients = std::iter::once(record.alpha).chain(record.betas.iter().copied());
            for (field, value) in fields.iter().zip(coefficients) {
                obj.insert(field.clone(), json!(value));
            }
            Value::Object(obj)
        })
        .collect();

    json!({
        "fields": fields,
        "records": records,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_report_creation() {
        let report = Report::new("Innovation".to_string(), json!({"test": "data"}));

        assert_eq!(report.title, "Innovation");
        assert_eq!(report.contents["test"], "data");
    }

    #[test]
    fn test_report_builder() {
        let report = ReportBuilder::new()
            .title("Rolling statistics")
            .serialize_contents(&vec![1.0, f64::NAN])
            .unwrap()
            .build();

        assert_eq!(report.title, "Rolling statistics");
        assert_eq!(report.contents, json!([1.0, null]));
    }

    #[test]
    fn test_write_to() {
        let report = ReportBuilder::new().title("empty").build();
        let mut buffer = Vec::new();
        report.write_to(&mut buffer).unwrap();

        let text = String::from_utf8(buffer).unwrap();
        assert!(text.ends_with("}\n"));
        let parsed: Report = serde_json::from_str(&text).unwrap();
        assert_eq!(parsed.title, "empty");
        assert!(parsed.contents.is_null());
    }
}

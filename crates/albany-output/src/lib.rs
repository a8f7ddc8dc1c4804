#![doc = include_str!("../README.md")]
#![doc(issue_tracker_base_url = "https://github.com/factordynamics/albany/issues/")]
#![cfg_attr(docsrs, feature(doc_cfg, doc_auto_cfg))]
#![warn(missing_docs)]
#![forbid(unsafe_code)]

pub mod report;
pub mod summary;
pub mod table;

pub use report::{Report, ReportBuilder, ReportError, rolling_result_json};
pub use summary::{SeriesSummary, summarize_panel, summarize_result};
pub use table::{AnnualizedTable, TableFormat, format_value};

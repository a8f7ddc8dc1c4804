#![doc = include_str!("../README.md")]
#![doc(issue_tracker_base_url = "https://github.com/factordynamics/albany/issues/")]
#![cfg_attr(docsrs, feature(doc_cfg, doc_auto_cfg))]
#![warn(missing_docs)]
#![forbid(unsafe_code)]

pub mod error;
pub mod frame;
pub mod panel;
pub mod portfolio;
pub mod series;
pub mod transform;

pub use error::{DataError, Result};
pub use panel::{Panel, PanelDocument};
pub use series::{SeriesDocument, TimeSeries};
pub use transform::intersect_dates;

/// Version information.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

//! Output rendering for the CLI.

use albany_output::{Report, ReportBuilder, ReportError, TableFormat};
use clap::ValueEnum;
use serde::Serialize;
use std::io::Write;

/// Output format
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub(crate) enum OutputFormat {
    /// ASCII tables
    #[default]
    Text,
    /// Markdown tables
    Markdown,
    /// JSON report
    Json,
}

impl OutputFormat {
    /// Render a table in the text formats.
    pub(crate) fn table<T: TableFormat + ?Sized>(self, table: &T) -> String {
        match self {
            Self::Markdown => table.to_markdown(),
            Self::Text | Self::Json => table.to_ascii_table(),
        }
    }
}

/// Wrap serializable contents in a titled report.
pub(crate) fn report<T: Serialize>(title: &str, contents: &T) -> Result<Report, ReportError> {
    Ok(ReportBuilder::new()
        .title(title)
        .serialize_contents(contents)?
        .build())
}

/// Write a report to standard output.
pub(crate) fn print_report(report: &Report) -> Result<(), ReportError> {
    let stdout = std::io::stdout();
    let mut lock = stdout.lock();
    report.write_to(&mut lock)?;
    lock.flush()?;
    Ok(())
}

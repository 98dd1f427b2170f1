//! Output: serialize a report and write it to disk.
//!
//! This module handles the last stage of the pipeline. It provides:
//!
//! - **JSON**: the canonical, field-exact machine-readable report
//! - **LOCTable**: headers, rows and footer as strings, rendered as text,
//!   CSV or Markdown
//! - **Artifacts**: one file per requested format at
//!   `<output_dir>/<output_name>.<extension>`
//!
//! Every format is a projection of the same [`Report`]; none changes counts.

pub mod json;
pub mod table;

use std::fs;
use std::path::PathBuf;

use log::{info, warn};

use crate::data::stats::Report;
use crate::error::PolylocError;
use crate::query::{ReportFormat, ScanConfig};
use crate::Result;

pub use json::{to_json, JsonFileRow, JsonLanguageRow, JsonReport, JsonResults};
pub use table::{LOCTable, TableRow};

/// Render a report in one format.
pub fn render(report: &Report, format: ReportFormat) -> Result<String> {
    match format {
        ReportFormat::Json => to_json(report),
        ReportFormat::Table => Ok(LOCTable::from_report(report).to_text()),
        ReportFormat::Csv => Ok(LOCTable::from_report(report).to_csv()),
        ReportFormat::Markdown => Ok(LOCTable::from_report(report).to_markdown()),
    }
}

/// Write every format the configuration requests, in order.
///
/// A failing format does not stop the others. If any fails, the error is
/// [`PolylocError::ReportsIncomplete`], which still lists the paths that were
/// written. The report itself is not affected.
pub fn write_reports(report: &Report, config: &ScanConfig) -> Result<Vec<PathBuf>> {
    let mut written = Vec::with_capacity(config.formats.len());
    let mut failures = Vec::new();

    for &format in &config.formats {
        match write_report(report, config, format) {
            Ok(path) => {
                info!("wrote {} report to {}", format, path.display());
                written.push(path);
            }
            Err(e) => {
                warn!("{}", e);
                failures.push(e);
            }
        }
    }

    if failures.is_empty() {
        Ok(written)
    } else {
        Err(PolylocError::ReportsIncomplete { written, failures })
    }
}

fn write_report(report: &Report, config: &ScanConfig, format: ReportFormat) -> Result<PathBuf> {
    let path = config.artifact_path(format);
    let body = render(report, format)?;
    fs::write(&path, body).map_err(|source| PolylocError::ReportWrite {
        path: path.clone(),
        source,
    })?;
    Ok(path)
}

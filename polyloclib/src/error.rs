//! Error types for polyloclib

use std::path::PathBuf;
use thiserror::Error;

use crate::query::options::SortKey;

/// Errors that can occur while configuring a scan, scanning, or writing reports.
///
/// Per-file problems (unreadable, binary, unknown language, bad encoding) are
/// not errors: they end up in [`crate::Report::skipped`].
#[derive(Error, Debug)]
pub enum PolylocError {
    /// Failed to read a file
    #[error("failed to read file '{path}': {source}")]
    FileRead {
        path: PathBuf,
        source: std::io::Error,
    },

    /// Invalid glob pattern
    #[error("invalid glob pattern '{pattern}': {message}")]
    InvalidGlob { pattern: String, message: String },

    /// Path does not exist
    #[error("path does not exist: {0}")]
    PathNotFound(PathBuf),

    /// Scan root is not a directory
    #[error("not a directory: {0}")]
    NotADirectory(PathBuf),

    /// Generic configuration problem
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),

    /// More than one sort selector was enabled
    #[error("conflicting sort keys: {0:?} (select at most one)")]
    ConflictingSortKeys(Vec<SortKey>),

    /// Sort direction string other than ASC/DESC
    #[error("invalid sort direction '{0}' (expected ASC or DESC)")]
    InvalidSortDirection(String),

    /// Report format identifier that is not supported
    #[error("unknown report format '{0}'")]
    UnknownReportFormat(String),

    /// Output directory cannot be used for writing reports
    #[error("output directory '{path}' is not usable: {message}")]
    OutputDirectory { path: PathBuf, message: String },

    /// The acquisition collaborator could not provide a scan root
    #[error("failed to acquire '{location}': {message}")]
    Acquisition { location: String, message: String },

    /// Worker pool could not be created
    #[error("failed to build worker pool: {0}")]
    ThreadPool(String),

    /// Report artifact could not be written
    #[error("failed to write report '{path}': {source}")]
    ReportWrite {
        path: PathBuf,
        source: std::io::Error,
    },

    /// Some requested artifacts could not be written
    #[error(
        "{} of {} reports could not be written: {}",
        .failures.len(),
        .failures.len() + .written.len(),
        .failures.iter().map(ToString::to_string).collect::<Vec<_>>().join("; ")
    )]
    ReportsIncomplete {
        /// Artifacts that were written
        written: Vec<PathBuf>,
        /// One error per failed format
        failures: Vec<PolylocError>,
    },

    /// JSON serialization error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

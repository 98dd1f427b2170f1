//! # polyloclib
//!
//! A multi-language lines of code counter library that classifies every line
//! of a source tree as blank, comment, or code.
//!
//! ## Overview
//!
//! Each file is run through a small lexical state machine for its language.
//! The machine tracks string literals, line comments and (optionally nested)
//! block comments across line boundaries, so that:
//!
//! - a line with code and a trailing comment counts as **code**
//! - comment markers inside strings do not start comments
//! - lines inside an open block comment count as **comments**
//! - a shebang on the first line counts as a **comment**
//!
//! Results are aggregated per language and in total, sorted deterministically
//! and serialized to JSON (plus text, CSV and Markdown tables).
//!
//! ## Pipeline
//!
//! - [`source`]: acquisition, filtering and walking of the scan root
//! - [`data`]: languages, line classification, parallel counting, aggregation
//! - [`query`]: scan configuration and row ordering
//! - [`output`]: report formats and artifact writing
//!
//! ## Example
//!
//! ```rust
//! use polyloclib::{scan, LanguageRegistry, Ordering, ScanConfig};
//! use std::fs;
//! use tempfile::tempdir;
//!
//! let dir = tempdir().unwrap();
//! fs::write(dir.path().join("main.go"), "package main\n\n// entry\nfunc main() {}\n").unwrap();
//! fs::write(dir.path().join("util.c"), "/* helper */\nint x;\n").unwrap();
//!
//! let config = ScanConfig::new(dir.path())
//!     .ordering(Ordering::by_language())
//!     .without_reports();
//! let report = scan(&config, &LanguageRegistry::builtin()).unwrap();
//!
//! assert_eq!(report.file_count, 2);
//! assert_eq!(report.languages[0].language, "C");
//! assert_eq!(report.total.code, 3);
//! assert_eq!(report.total.comments, 2);
//! assert_eq!(report.total.blank, 1);
//! ```

pub mod data;
pub mod error;
pub mod output;
pub mod query;
pub mod source;

pub use data::{
    classify_line, count_file, parse_string, process_file, run, run_provisioned, scan,
    Aggregator, FileOutcome, FileRecord, LanguageAggregate, LanguageDef, LanguageRegistry,
    LineKind, Locs, Report, RunOutcome, ScanState, SkipReason, SkippedFile, Visitor,
};
pub use error::PolylocError;
pub use output::{render, write_reports, LOCTable, TableRow};
pub use query::{
    sort_report, Ordering, ReportFormat, ScanConfig, SortDirection, SortKey, SortSelectors,
};
pub use source::{
    Candidate, ExclusionList, FilterConfig, LocalProvisioner, Provider, Provisioner, RepoRef,
    Walker,
};

/// Result type for polyloclib operations
pub type Result<T> = std::result::Result<T, PolylocError>;

//! Data collection: classify lines and collect statistics.
//!
//! This module handles the second stage of the pipeline. It provides:
//!
//! - **Languages**: the registry of per-language lexical rules
//! - **Classification**: a per-line state machine over those rules
//! - **Statistics**: `Locs`, `FileRecord`, `LanguageAggregate`, `Report`
//! - **Counting**: the parallel scan (`scan`, `run`) and its aggregator
//!
//! ## Example
//!
//! ```rust,no_run
//! use polyloclib::data::{scan, LanguageRegistry};
//! use polyloclib::query::ScanConfig;
//!
//! let registry = LanguageRegistry::builtin();
//! let report = scan(&ScanConfig::new("."), &registry)?;
//! println!("Total code lines: {}", report.total.code);
//! # Ok::<(), polyloclib::PolylocError>(())
//! ```

pub mod aggregate;
pub mod counter;
pub mod languages;
pub mod stats;
pub mod visitor;

pub use aggregate::{Aggregator, FileOutcome};
pub use counter::{count_file, process_file, run, run_provisioned, scan, RunOutcome};
pub use languages::{BlockComment, LanguageDef, LanguageRegistry, Quote};
pub use stats::{
    FileRecord, LanguageAggregate, LineKind, Locs, Report, SkipReason, SkippedFile,
};
pub use visitor::{classify_line, parse_string, ScanState, Visitor};

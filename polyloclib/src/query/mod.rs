//! Query stage: scan configuration and row ordering.
//!
//! - **Options**: [`ScanConfig`] and the sort and format types it carries
//! - **Sorting**: stable, tie-broken ordering of report rows
//!
//! ## Example
//!
//! ```rust,no_run
//! use polyloclib::query::{Ordering, ReportFormat, ScanConfig};
//!
//! let config = ScanConfig::new("./checkout")
//!     .per_file(true)
//!     .exclude_path("vendor")?
//!     .ordering(Ordering::by_language())
//!     .formats([ReportFormat::Json, ReportFormat::Markdown]);
//! # Ok::<(), polyloclib::PolylocError>(())
//! ```

pub mod options;
pub mod queryset;

pub use options::{
    Ordering, ReportFormat, ScanConfig, SortDirection, SortKey, SortSelectors,
    DEFAULT_OUTPUT_NAME,
};
pub use queryset::{sort_report, sort_rows, SortableRow};

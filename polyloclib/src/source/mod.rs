//! Source discovery: find files to count.
//!
//! This module handles the first stage of the pipeline. It provides:
//!
//! - **Acquisition**: turn a location into a local scan root ([`Provisioner`])
//! - **File filtering**: include/exclude rules with prefixes and globs
//! - **Walking**: lazy enumeration of eligible files under the root
//! - **Exclusion files**: `.clocignore`-style lists applied to a configuration
//!
//! ## Example
//!
//! ```rust,no_run
//! use polyloclib::source::{FilterConfig, Walker};
//!
//! let filter = FilterConfig::new()
//!     .exclude_path("**/generated/**")?
//!     .include_extension("go");
//! for candidate in Walker::new("./checkout", &filter) {
//!     println!("{}", candidate.relative);
//! }
//! # Ok::<(), polyloclib::PolylocError>(())
//! ```

pub mod exclusion;
pub mod filter;
pub mod provision;
pub mod walker;

pub use exclusion::ExclusionList;
pub use filter::{normalize_extension, FilterConfig, PathPattern};
pub use provision::{LocalProvisioner, Provider, Provisioner, RepoRef};
pub use walker::{relative_path, Candidate, Walker};

//! Scan configuration: what to count, how to order it, where to write it.
//!
//! [`ScanConfig`] is built once per invocation with consuming builder
//! methods and validated before any worker starts.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};
use std::str::FromStr;

use crate::error::PolylocError;
use crate::source::FilterConfig;
use crate::Result;

/// Field to order result rows by.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum SortKey {
    /// Language name (lexicographical)
    Language,
    /// Number of files
    FileCount,
    /// Total physical lines
    TotalLines,
    /// Blank lines
    BlankLines,
    /// Comment lines
    CommentLines,
    /// Code lines
    #[default]
    CodeLines,
}

impl fmt::Display for SortKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            SortKey::Language => "language",
            SortKey::FileCount => "files",
            SortKey::TotalLines => "lines",
            SortKey::BlankLines => "blank",
            SortKey::CommentLines => "comment",
            SortKey::CodeLines => "code",
        };
        f.write_str(name)
    }
}

impl FromStr for SortKey {
    type Err = PolylocError;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_lowercase().as_str() {
            "language" | "lang" | "name" => Ok(SortKey::Language),
            "files" | "file" => Ok(SortKey::FileCount),
            "lines" | "line" | "total" => Ok(SortKey::TotalLines),
            "blank" | "blanks" => Ok(SortKey::BlankLines),
            "comment" | "comments" => Ok(SortKey::CommentLines),
            "code" => Ok(SortKey::CodeLines),
            _ => Err(PolylocError::InvalidConfig(format!(
                "unknown sort key: {}",
                s
            ))),
        }
    }
}

/// Sort direction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum SortDirection {
    /// Smallest first (A-Z)
    Ascending,
    /// Largest first (Z-A)
    #[default]
    Descending,
}

impl FromStr for SortDirection {
    type Err = PolylocError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_uppercase().as_str() {
            "ASC" => Ok(SortDirection::Ascending),
            "DESC" => Ok(SortDirection::Descending),
            _ => Err(PolylocError::InvalidSortDirection(s.to_string())),
        }
    }
}

/// Ordering configuration for result rows.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Ordering {
    /// Field to order by
    pub key: SortKey,
    /// Sort direction
    pub direction: SortDirection,
}

impl Ordering {
    pub fn new(key: SortKey, direction: SortDirection) -> Self {
        Self { key, direction }
    }

    /// Order by language name, A-Z.
    pub fn by_language() -> Self {
        Self::new(SortKey::Language, SortDirection::Ascending)
    }

    /// Order by code lines, largest first.
    pub fn by_code() -> Self {
        Self::new(SortKey::CodeLines, SortDirection::Descending)
    }

    /// Order by total lines, largest first.
    pub fn by_total() -> Self {
        Self::new(SortKey::TotalLines, SortDirection::Descending)
    }

    pub fn ascending(mut self) -> Self {
        self.direction = SortDirection::Ascending;
        self
    }

    pub fn descending(mut self) -> Self {
        self.direction = SortDirection::Descending;
        self
    }
}

/// The boolean sort selectors of the configuration surface.
///
/// At most one may be set. None set means [`SortKey::CodeLines`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct SortSelectors {
    pub by_language: bool,
    pub by_files: bool,
    pub by_lines: bool,
    pub by_blank: bool,
    pub by_comment: bool,
    pub by_code: bool,
}

impl SortSelectors {
    /// Collapse the selectors into one effective key.
    pub fn resolve(&self) -> Result<SortKey> {
        let selected: Vec<SortKey> = [
            (self.by_language, SortKey::Language),
            (self.by_files, SortKey::FileCount),
            (self.by_lines, SortKey::TotalLines),
            (self.by_blank, SortKey::BlankLines),
            (self.by_comment, SortKey::CommentLines),
            (self.by_code, SortKey::CodeLines),
        ]
        .into_iter()
        .filter_map(|(set, key)| set.then_some(key))
        .collect();

        match selected.as_slice() {
            [] => Ok(SortKey::default()),
            [key] => Ok(*key),
            _ => Err(PolylocError::ConflictingSortKeys(selected)),
        }
    }
}

/// A report serialization.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum ReportFormat {
    /// Canonical machine-readable format
    Json,
    /// Padded text table
    Table,
    /// Comma-separated values
    Csv,
    /// Markdown table
    Markdown,
}

impl ReportFormat {
    /// File extension of the written artifact.
    pub fn extension(&self) -> &'static str {
        match self {
            ReportFormat::Json => "json",
            ReportFormat::Table => "txt",
            ReportFormat::Csv => "csv",
            ReportFormat::Markdown => "md",
        }
    }
}

impl fmt::Display for ReportFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ReportFormat::Json => "json",
            ReportFormat::Table => "table",
            ReportFormat::Csv => "csv",
            ReportFormat::Markdown => "markdown",
        };
        f.write_str(name)
    }
}

impl FromStr for ReportFormat {
    type Err = PolylocError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_lowercase().as_str() {
            "json" => Ok(ReportFormat::Json),
            "table" | "txt" | "text" => Ok(ReportFormat::Table),
            "csv" => Ok(ReportFormat::Csv),
            "markdown" | "md" => Ok(ReportFormat::Markdown),
            _ => Err(PolylocError::UnknownReportFormat(s.to_string())),
        }
    }
}

/// Default base name of written artifacts.
pub const DEFAULT_OUTPUT_NAME: &str = "polyloc";

/// Configuration for one scan.
#[derive(Debug, Clone)]
pub struct ScanConfig {
    /// Directory to scan
    pub root: PathBuf,
    /// Branch reference, passed through to the report untouched
    pub branch: Option<String>,
    /// Keep one row per file in the report
    pub per_file: bool,
    /// File eligibility rules
    pub filter: FilterConfig,
    /// Presentation order of rows
    pub ordering: Ordering,
    /// Base name of written artifacts
    pub output_name: String,
    /// Directory artifacts are written to
    pub output_dir: PathBuf,
    /// Formats to write; empty means nothing is written
    pub formats: Vec<ReportFormat>,
    /// Worker pool size; `None` uses available parallelism
    pub threads: Option<usize>,
}

impl ScanConfig {
    /// Create a configuration with defaults: aggregate rows ordered by code
    /// lines descending, JSON written to the current directory.
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self {
            root: root.into(),
            branch: None,
            per_file: false,
            filter: FilterConfig::new(),
            ordering: Ordering::default(),
            output_name: DEFAULT_OUTPUT_NAME.to_string(),
            output_dir: PathBuf::from("."),
            formats: vec![ReportFormat::Json],
            threads: None,
        }
    }

    pub fn branch(mut self, branch: impl Into<String>) -> Self {
        self.branch = Some(branch.into());
        self
    }

    pub fn per_file(mut self, per_file: bool) -> Self {
        self.per_file = per_file;
        self
    }

    /// Replace the whole filter.
    pub fn filter(mut self, filter: FilterConfig) -> Self {
        self.filter = filter;
        self
    }

    /// Add an exclude-path pattern (prefix or glob).
    pub fn exclude_path(mut self, pattern: &str) -> Result<Self> {
        self.filter = self.filter.exclude_path(pattern)?;
        Ok(self)
    }

    pub fn exclude_extension(mut self, extension: &str) -> Self {
        self.filter = self.filter.exclude_extension(extension);
        self
    }

    pub fn include_extension(mut self, extension: &str) -> Self {
        self.filter = self.filter.include_extension(extension);
        self
    }

    pub fn ordering(mut self, ordering: Ordering) -> Self {
        self.ordering = ordering;
        self
    }

    pub fn sort_key(mut self, key: SortKey) -> Self {
        self.ordering.key = key;
        self
    }

    /// Set the sort key from the boolean selectors.
    pub fn sort_selectors(mut self, selectors: SortSelectors) -> Result<Self> {
        self.ordering.key = selectors.resolve()?;
        Ok(self)
    }

    pub fn direction(mut self, direction: SortDirection) -> Self {
        self.ordering.direction = direction;
        self
    }

    /// Set the sort direction from `"ASC"` or `"DESC"`.
    pub fn direction_str(self, direction: &str) -> Result<Self> {
        Ok(self.direction(direction.parse()?))
    }

    pub fn output_name(mut self, name: impl Into<String>) -> Self {
        self.output_name = name.into();
        self
    }

    pub fn output_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.output_dir = dir.into();
        self
    }

    /// Replace the requested formats. Duplicates are dropped.
    pub fn formats(mut self, formats: impl IntoIterator<Item = ReportFormat>) -> Self {
        self.formats.clear();
        for format in formats {
            if !self.formats.contains(&format) {
                self.formats.push(format);
            }
        }
        self
    }

    /// Skip writing artifacts; the report is only returned.
    pub fn without_reports(mut self) -> Self {
        self.formats.clear();
        self
    }

    pub fn threads(mut self, threads: usize) -> Self {
        self.threads = Some(threads);
        self
    }

    /// Path of the artifact for a format.
    pub fn artifact_path(&self, format: ReportFormat) -> PathBuf {
        self.output_dir
            .join(format!("{}.{}", self.output_name, format.extension()))
    }

    /// Check everything that can fail before scanning starts, including the
    /// output directory when formats are requested.
    ///
    /// The output directory is created if missing.
    pub fn validate(&self) -> Result<()> {
        self.validate_scan()?;
        self.validate_output()
    }

    /// Check the scan inputs only. Nothing is created on disk.
    pub fn validate_scan(&self) -> Result<()> {
        if !self.root.exists() {
            return Err(PolylocError::PathNotFound(self.root.clone()));
        }
        if !self.root.is_dir() {
            return Err(PolylocError::NotADirectory(self.root.clone()));
        }
        if fs::read_dir(&self.root).is_err() {
            return Err(PolylocError::InvalidConfig(format!(
                "root is not readable: {}",
                self.root.display()
            )));
        }
        if self.threads == Some(0) {
            return Err(PolylocError::InvalidConfig(
                "thread count must be at least 1".to_string(),
            ));
        }
        Ok(())
    }

    /// Check that every requested artifact can be written.
    ///
    /// A no-op when no format is requested.
    pub fn validate_output(&self) -> Result<()> {
        if self.formats.is_empty() {
            return Ok(());
        }
        if self.output_name.trim().is_empty() || self.output_name.contains(['/', '\\']) {
            return Err(PolylocError::InvalidConfig(format!(
                "invalid output name: {:?}",
                self.output_name
            )));
        }
        validate_output_dir(&self.output_dir)
    }
}

/// Create the directory if needed, then prove it is writable by creating
/// (and dropping) a scratch file in it.
fn validate_output_dir(dir: &Path) -> Result<()> {
    let output_error = |message: String| PolylocError::OutputDirectory {
        path: dir.to_path_buf(),
        message,
    };

    if dir.exists() && !dir.is_dir() {
        return Err(output_error("not a directory".to_string()));
    }
    fs::create_dir_all(dir).map_err(|e| output_error(e.to_string()))?;

    tempfile::Builder::new()
        .prefix(".polyloc-")
        .tempfile_in(dir)
        .map_err(|e| output_error(format!("not writable: {}", e)))?;
    Ok(())
}

//! Core data structures for line statistics

use serde::{Deserialize, Serialize};
use std::ops::{Add, AddAssign};
use std::path::PathBuf;

/// Classification of a single physical line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum LineKind {
    Blank,
    Comment,
    Code,
}

/// Line counts for a file, a language, or a whole scan.
///
/// The total is always derived, so `total == blank + comments + code` holds
/// by construction.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Locs {
    /// Blank lines (whitespace only)
    pub blank: u64,
    /// Comment-only lines
    pub comments: u64,
    /// Lines carrying code (including lines with a trailing comment)
    pub code: u64,
}

impl Locs {
    /// Create a new Locs with all zeros
    pub fn new() -> Self {
        Self::default()
    }

    /// Total physical lines
    pub fn total(&self) -> u64 {
        self.blank + self.comments + self.code
    }

    /// Count one classified line.
    pub fn record(&mut self, kind: LineKind) {
        match kind {
            LineKind::Blank => self.blank += 1,
            LineKind::Comment => self.comments += 1,
            LineKind::Code => self.code += 1,
        }
    }
}

impl Add for Locs {
    type Output = Self;

    fn add(self, other: Self) -> Self {
        Self {
            blank: self.blank + other.blank,
            comments: self.comments + other.comments,
            code: self.code + other.code,
        }
    }
}

impl AddAssign for Locs {
    fn add_assign(&mut self, other: Self) {
        self.blank += other.blank;
        self.comments += other.comments;
        self.code += other.code;
    }
}

/// Per-file classification result.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FileRecord {
    /// Path relative to the scan root, `/`-separated
    pub path: String,
    /// Display name of the file's language
    pub language: String,
    /// Line counts for this file
    pub stats: Locs,
}

impl FileRecord {
    pub fn new(path: impl Into<String>, language: impl Into<String>, stats: Locs) -> Self {
        Self {
            path: path.into(),
            language: language.into(),
            stats,
        }
    }
}

/// Totals for one language across all of its files.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LanguageAggregate {
    pub language: String,
    pub file_count: u64,
    pub stats: Locs,
}

impl LanguageAggregate {
    pub fn new(language: impl Into<String>) -> Self {
        Self {
            language: language.into(),
            file_count: 0,
            stats: Locs::new(),
        }
    }

    /// Fold a file's counts into this language.
    pub fn add_file(&mut self, record: &FileRecord) {
        self.file_count += 1;
        self.stats += record.stats;
    }
}

/// Why a file contributed nothing to the report.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum SkipReason {
    /// The file could not be opened or read
    Unreadable(String),
    /// A null byte was found in the first 8 KiB
    Binary,
    /// No language is registered for the file name
    UnrecognizedLanguage,
    /// The content is not valid UTF-8
    Encoding,
}

impl std::fmt::Display for SkipReason {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SkipReason::Unreadable(message) => write!(f, "unreadable: {message}"),
            SkipReason::Binary => write!(f, "binary content"),
            SkipReason::UnrecognizedLanguage => write!(f, "unrecognized language"),
            SkipReason::Encoding => write!(f, "invalid UTF-8"),
        }
    }
}

/// An entry of the non-fatal skip log.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SkippedFile {
    pub path: String,
    pub reason: SkipReason,
}

/// The result of one scan.
///
/// `languages` is always populated; `files` only when per-file output was
/// requested. Rows are in presentation order once the scan returns.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Report {
    /// Scan root the report was produced from
    pub root: PathBuf,
    /// Opaque branch reference passed through from the configuration
    pub branch: Option<String>,
    /// Number of counted files
    pub file_count: u64,
    /// Grand totals across all languages
    pub total: Locs,
    /// Per-language rows
    pub languages: Vec<LanguageAggregate>,
    /// Per-file rows (per-file mode only)
    pub files: Vec<FileRecord>,
    /// Whether per-file output was requested
    pub per_file: bool,
    /// Files that were skipped and why
    pub skipped: Vec<SkippedFile>,
}

impl Report {
    /// Create a new empty report for a root.
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self {
            root: root.into(),
            ..Self::default()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_locs_default() {
        let locs = Locs::new();
        assert_eq!(locs.blank, 0);
        assert_eq!(locs.comments, 0);
        assert_eq!(locs.code, 0);
        assert_eq!(locs.total(), 0);
    }

    #[test]
    fn test_locs_total() {
        let locs = Locs {
            blank: 10,
            comments: 5,
            code: 100,
        };
        assert_eq!(locs.total(), 115);
    }

    #[test]
    fn test_locs_record() {
        let mut locs = Locs::new();
        locs.record(LineKind::Code);
        locs.record(LineKind::Code);
        locs.record(LineKind::Comment);
        locs.record(LineKind::Blank);

        assert_eq!(locs.code, 2);
        assert_eq!(locs.comments, 1);
        assert_eq!(locs.blank, 1);
        assert_eq!(locs.total(), 4);
    }

    #[test]
    fn test_locs_add() {
        let a = Locs {
            blank: 10,
            comments: 5,
            code: 100,
        };
        let b = Locs {
            blank: 5,
            comments: 2,
            code: 50,
        };
        let sum = a + b;
        assert_eq!(sum.blank, 15);
        assert_eq!(sum.comments, 7);
        assert_eq!(sum.code, 150);

        let mut acc = a;
        acc += b;
        assert_eq!(acc, sum);
    }

    #[test]
    fn test_language_aggregate_add_file() {
        let mut go = LanguageAggregate::new("Go");
        go.add_file(&FileRecord::new(
            "a.go",
            "Go",
            Locs {
                blank: 1,
                comments: 2,
                code: 3,
            },
        ));
        go.add_file(&FileRecord::new(
            "b.go",
            "Go",
            Locs {
                blank: 0,
                comments: 0,
                code: 4,
            },
        ));

        assert_eq!(go.file_count, 2);
        assert_eq!(go.stats.code, 7);
        assert_eq!(go.stats.total(), 10);
    }

    #[test]
    fn test_skip_reason_display() {
        assert_eq!(SkipReason::Binary.to_string(), "binary content");
        assert_eq!(
            SkipReason::Unreadable("permission denied".into()).to_string(),
            "unreadable: permission denied"
        );
    }
}
